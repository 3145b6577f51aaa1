//! Network interface statistics collector.
//!
//! Reads `/proc/net/dev`. The two column-header lines contain `|` and are
//! skipped; every other line is `name: <16 counters>`. Counters are positional,
//! so a malformed or missing counter reads as zero rather than dropping the
//! interface.

use serde::{Deserialize, Serialize};
use std::io::{self, BufRead};
use tracing::debug;

use crate::error::Result;
use crate::numeric::parse_counter;
use crate::record::{Counters, OrderedMap};
use crate::source::{lossy_lines, read_source, Source, SourcePaths};

/// Counter columns in file order, as (PascalCase, kebab-case) names.
pub static DEVICE_COLUMNS: [(&str, &str); 16] = [
    ("ReceiveBytes", "receive-bytes"),
    ("ReceivePackets", "receive-packets"),
    ("ReceiveErrs", "receive-errs"),
    ("ReceiveDrop", "receive-drop"),
    ("ReceiveFifo", "receive-fifo"),
    ("ReceiveFrame", "receive-frame"),
    ("ReceiveCompressed", "receive-compressed"),
    ("ReceiveMulticast", "receive-multicast"),
    ("TransmitBytes", "transmit-bytes"),
    ("TransmitPackets", "transmit-packets"),
    ("TransmitErrs", "transmit-errs"),
    ("TransmitDrop", "transmit-drop"),
    ("TransmitFifo", "transmit-fifo"),
    ("TransmitColls", "transmit-colls"),
    ("TransmitCarrier", "transmit-carrier"),
    ("TransmitCompressed", "transmit-compressed"),
];

/// Key naming convention for the counter-map view of a device.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeyStyle {
    /// `ReceiveBytes`
    #[default]
    Pascal,
    /// `receive-bytes`
    Kebab,
}

impl KeyStyle {
    pub fn column_names(self) -> impl Iterator<Item = &'static str> {
        DEVICE_COLUMNS.iter().map(move |(pascal, kebab)| match self {
            KeyStyle::Pascal => *pascal,
            KeyStyle::Kebab => *kebab,
        })
    }
}

/// Counters of one network interface.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeviceStats {
    pub receive_bytes: u64,
    pub receive_packets: u64,
    pub receive_errs: u64,
    pub receive_drop: u64,
    pub receive_fifo: u64,
    pub receive_frame: u64,
    pub receive_compressed: u64,
    pub receive_multicast: u64,
    pub transmit_bytes: u64,
    pub transmit_packets: u64,
    pub transmit_errs: u64,
    pub transmit_drop: u64,
    pub transmit_fifo: u64,
    pub transmit_colls: u64,
    pub transmit_carrier: u64,
    pub transmit_compressed: u64,
}

/// Interface name to counters, in file order.
pub type DeviceTable = OrderedMap<DeviceStats>;

impl DeviceStats {
    pub fn from_values(v: [u64; 16]) -> Self {
        DeviceStats {
            receive_bytes: v[0],
            receive_packets: v[1],
            receive_errs: v[2],
            receive_drop: v[3],
            receive_fifo: v[4],
            receive_frame: v[5],
            receive_compressed: v[6],
            receive_multicast: v[7],
            transmit_bytes: v[8],
            transmit_packets: v[9],
            transmit_errs: v[10],
            transmit_drop: v[11],
            transmit_fifo: v[12],
            transmit_colls: v[13],
            transmit_carrier: v[14],
            transmit_compressed: v[15],
        }
    }

    /// Counters in [`DEVICE_COLUMNS`] order.
    pub fn values(&self) -> [u64; 16] {
        [
            self.receive_bytes,
            self.receive_packets,
            self.receive_errs,
            self.receive_drop,
            self.receive_fifo,
            self.receive_frame,
            self.receive_compressed,
            self.receive_multicast,
            self.transmit_bytes,
            self.transmit_packets,
            self.transmit_errs,
            self.transmit_drop,
            self.transmit_fifo,
            self.transmit_colls,
            self.transmit_carrier,
            self.transmit_compressed,
        ]
    }

    /// Counter map with keys in the requested style.
    pub fn to_counters(&self, style: KeyStyle) -> Counters {
        style.column_names().zip(self.values()).collect()
    }
}

/// Nested-map view of a device table: interface → column → counter.
pub fn device_table_counters(table: &DeviceTable, style: KeyStyle) -> OrderedMap<Counters> {
    table
        .iter()
        .map(|(name, stats)| (name, stats.to_counters(style)))
        .collect()
}

/// Parses one interface line. Column-header lines and lines without a
/// `name:` prefix yield `None`.
pub fn parse_net_dev_line(line: &str) -> Option<(&str, DeviceStats)> {
    if line.contains('|') {
        return None;
    }
    let (name, rest) = line.split_once(':')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }

    let tokens: Vec<&str> = rest.split_whitespace().collect();
    if tokens.len() < DEVICE_COLUMNS.len() {
        debug!(
            "Interface {} has {} counters, zero-filling the remaining {}",
            name,
            tokens.len(),
            DEVICE_COLUMNS.len() - tokens.len()
        );
    }

    let mut values = [0u64; 16];
    for (idx, token) in tokens.iter().take(values.len()).enumerate() {
        values[idx] = parse_counter(token).unwrap_or_else(|| {
            debug!(
                "Interface {}: unparseable {} {:?}, using zero",
                name, DEVICE_COLUMNS[idx].0, token
            );
            0
        });
    }

    Some((name, DeviceStats::from_values(values)))
}

/// Parses `/proc/net/dev` content.
pub fn parse_net_dev<R: BufRead>(reader: R) -> io::Result<DeviceTable> {
    let mut table = DeviceTable::new();
    for line in lossy_lines(reader) {
        let line = line?;
        if let Some((name, stats)) = parse_net_dev_line(&line) {
            table.insert(name, stats);
        }
    }
    debug!("Parsed {} network interfaces", table.len());
    Ok(table)
}

pub fn read_device_table(paths: &SourcePaths) -> Result<DeviceTable> {
    let path = paths.resolve(Source::DeviceStats, 0);
    read_source(&path, parse_net_dev)
}

/// Reads the device table as nested counter maps keyed in `style`.
pub fn read_device_counters(
    paths: &SourcePaths,
    style: KeyStyle,
) -> Result<OrderedMap<Counters>> {
    read_device_table(paths).map(|table| device_table_counters(&table, style))
}

#[cfg(test)]
mod tests {
    use super::*;

    const NET_DEV: &str = "\
Inter-|   Receive                                                |  Transmit
 face |bytes    packets errs drop fifo frame compressed multicast|bytes    packets errs drop fifo colls carrier compressed
    lo: 1234 10 0 0 0 0 0 0 5678 10 0 0 0 0 0 0
  eth0: 987654321 812345 1 2 3 4 5 6 123456789 654321 7 8 9 10 11 12
";

    #[test]
    fn test_parse_loopback_line() {
        let (name, stats) =
            parse_net_dev_line("  lo: 1234 10 0 0 0 0 0 0 5678 10 0 0 0 0 0 0").unwrap();
        assert_eq!(name, "lo");
        assert_eq!(stats.receive_bytes, 1234);
        assert_eq!(stats.transmit_bytes, 5678);
        assert_eq!(stats.receive_packets, 10);
        assert_eq!(stats.transmit_packets, 10);
    }

    #[test]
    fn test_header_lines_skipped() {
        let table = parse_net_dev(NET_DEV.as_bytes()).unwrap();
        let names: Vec<&str> = table.keys().collect();
        assert_eq!(names, vec!["lo", "eth0"]);
    }

    #[test]
    fn test_all_columns_in_order() {
        let table = parse_net_dev(NET_DEV.as_bytes()).unwrap();
        let eth0 = &table["eth0"];
        assert_eq!(
            eth0.values(),
            [987654321, 812345, 1, 2, 3, 4, 5, 6, 123456789, 654321, 7, 8, 9, 10, 11, 12]
        );
        assert_eq!(eth0.receive_multicast, 6);
        assert_eq!(eth0.transmit_compressed, 12);
    }

    #[test]
    fn test_name_glued_to_first_counter() {
        let (name, stats) =
            parse_net_dev_line("eth1:4294967296 1 0 0 0 0 0 0 2 3 0 0 0 0 0 0").unwrap();
        assert_eq!(name, "eth1");
        assert_eq!(stats.receive_bytes, 4294967296);
        assert_eq!(stats.transmit_bytes, 2);
    }

    #[test]
    fn test_malformed_and_missing_counters_are_zero() {
        let (_, stats) = parse_net_dev_line("  wlan0: 100 bad 3").unwrap();
        assert_eq!(stats.receive_bytes, 100);
        assert_eq!(stats.receive_packets, 0);
        assert_eq!(stats.receive_errs, 3);
        assert_eq!(stats.transmit_bytes, 0);
    }

    #[test]
    fn test_lines_without_name_skipped() {
        assert!(parse_net_dev_line("").is_none());
        assert!(parse_net_dev_line("garbage without colon").is_none());
        assert!(parse_net_dev_line("   : 1 2 3").is_none());
    }

    #[test]
    fn test_key_styles() {
        let table = parse_net_dev(NET_DEV.as_bytes()).unwrap();

        let kebab = device_table_counters(&table, KeyStyle::Kebab);
        assert_eq!(kebab["lo"]["receive-bytes"], 1234);
        assert_eq!(kebab["lo"]["transmit-bytes"], 5678);

        let pascal = device_table_counters(&table, KeyStyle::Pascal);
        assert_eq!(pascal["lo"]["ReceiveBytes"], 1234);
        assert_eq!(pascal["eth0"]["TransmitCarrier"], 11);
        assert_eq!(pascal["eth0"].len(), 16);
    }

    #[test]
    fn test_typed_serialization_matches_pascal_view() {
        let table = parse_net_dev(NET_DEV.as_bytes()).unwrap();
        let typed = serde_json::to_value(&table["eth0"]).unwrap();
        let view = serde_json::to_value(table["eth0"].to_counters(KeyStyle::Pascal)).unwrap();
        assert_eq!(typed, view);
    }
}
