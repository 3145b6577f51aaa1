//! proc-parse Library
//!
//! Typed parsers for Linux kernel statistics files. Each file layout has its
//! own collector, and every collector produces a raw, file-ordered mapping
//! that can be projected onto a fixed-shape record.
//!
//! # Features
//!
//! - **Positional fields**: `/proc/<pid>/stat` via a 52-entry schema table
//! - **Key-value pairs**: `/proc/meminfo`
//! - **Counter rows**: `/proc/net/dev`, with PascalCase or kebab-case keys
//! - **Header/data pairs**: `/proc/net/snmp` and `/proc/net/netstat`
//! - **Lenient parsing**: malformed tokens are zero-filled or skipped, never fatal
//!
//! # Usage
//!
//! ```rust
//! use proc_parse::collectors::{meminfo, snmp};
//! use proc_parse::record::FromRaw;
//!
//! let raw = meminfo::parse_meminfo("MemTotal: 2048 kB\nMemFree: 512 kB\n".as_bytes()).unwrap();
//! let info = meminfo::MemoryInfo::from_raw(&raw);
//! assert_eq!(info.mem_total, 2048);
//!
//! let table = snmp::parse_protocol_stats("Ip: Forwarding InHdrErrors\nIp: 1 5\n".as_bytes()).unwrap();
//! assert_eq!(table["Ip"]["InHdrErrors"], 5);
//! ```
//!
//! Reading the live files goes through [`SourcePaths`], which carries the
//! optional per-source path overrides:
//!
//! ```no_run
//! use proc_parse::{collectors, SourcePaths};
//!
//! let paths = SourcePaths::from_env();
//! let info = collectors::read_memory_info(&paths).unwrap_or_default();
//! println!("Memory available: {} kB", info.mem_available);
//! ```

pub mod collectors;
pub mod error;
pub mod numeric;
pub mod record;
pub mod render;
pub mod source;

// Re-export main types for convenience
pub use error::ProcError;
pub use numeric::{FieldKind, Value};
pub use record::{Counters, FromRaw, OrderedMap, RawRecord};
pub use render::{render, RenderError, RenderFormat};
pub use source::{Source, SourcePaths};
