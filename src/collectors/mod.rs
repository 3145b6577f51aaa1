//! Collectors module for kernel statistics files.
//!
//! This module contains one collector per file layout:
//! - `stat`: positional fields of `/proc/<pid>/stat`
//! - `meminfo`: `Key: value` pairs of `/proc/meminfo`
//! - `netdev`: per-interface counter rows of `/proc/net/dev`
//! - `snmp`: header/data line pairs of `/proc/net/snmp` and `/proc/net/netstat`

pub mod meminfo;
pub mod netdev;
pub mod snmp;
pub mod stat;

pub use meminfo::{read_memory_info, read_memory_info_raw, MemoryInfo};
pub use netdev::{read_device_counters, read_device_table, DeviceStats, DeviceTable, KeyStyle};
pub use snmp::{
    read_extended_protocol_table, read_protocol_table, AlternationMismatch, ProtocolTable,
};
pub use stat::{read_process_status, read_process_status_raw, ProcessStatus};
