//! Protocol statistics collector.
//!
//! Reads `/proc/net/snmp` and `/proc/net/netstat`. Both files carry one block
//! per protocol as a pair of lines: a header naming the columns, then a data
//! line with the values, each starting with the same `Proto:` label.
//!
//! ```text
//! Ip: Forwarding DefaultTTL InReceives ...
//! Ip: 1 64 123456 ...
//! ```
//!
//! Nothing marks a line as header or data except its position, so the parser
//! is a two-state machine that flips on every non-blank line. It does not try
//! to resynchronise: after two consecutive header lines every later block is
//! read shifted by one line. When a data line's label differs from its
//! header's, an [`AlternationMismatch`] is reported and logged, but the values
//! are still stored under the header's label.

use std::io::{self, BufRead};
use tracing::{debug, warn};

use crate::error::Result;
use crate::numeric::{parse_counter, strip_label};
use crate::record::{Counters, OrderedMap};
use crate::source::{lossy_lines, read_source, Source, SourcePaths};

/// Protocol label → column → counter, in file order.
pub type ProtocolTable = OrderedMap<Counters>;

/// A data line whose leading label differs from the preceding header's.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlternationMismatch {
    /// 1-based line number of the data line.
    pub line: usize,
    pub header_label: String,
    pub data_label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expect {
    Header,
    Data,
}

/// Parses header/data content, also returning label mismatches found on the way.
pub fn parse_protocol_stats_with_diagnostics<R: BufRead>(
    reader: R,
) -> io::Result<(ProtocolTable, Vec<AlternationMismatch>)> {
    let mut table = ProtocolTable::new();
    let mut mismatches = Vec::new();
    let mut state = Expect::Header;
    let mut header: Vec<String> = Vec::new();
    let mut label = String::new();

    for (idx, line) in lossy_lines(reader).enumerate() {
        let line = line?;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some(first) = tokens.first() else {
            continue;
        };

        match state {
            Expect::Header => {
                label = strip_label(first).to_string();
                header = tokens.iter().map(|t| t.to_string()).collect();
                table.insert(label.as_str(), Counters::new());
                state = Expect::Data;
            }
            Expect::Data => {
                let data_label = strip_label(first);
                if data_label != label {
                    warn!(
                        "Line {}: data label {:?} does not match header label {:?}",
                        idx + 1,
                        data_label,
                        label
                    );
                    mismatches.push(AlternationMismatch {
                        line: idx + 1,
                        header_label: label.clone(),
                        data_label: data_label.to_string(),
                    });
                }

                if let Some(counters) = table.get_mut(&label) {
                    for (col, token) in tokens.iter().enumerate().skip(1) {
                        let Some(column) = header.get(col) else {
                            debug!(
                                "{}: {} values beyond the header's {} columns dropped",
                                label,
                                tokens.len() - col,
                                header.len() - 1
                            );
                            break;
                        };
                        match parse_counter(token) {
                            Some(value) => {
                                counters.insert(column.as_str(), value);
                            }
                            None => debug!("{}: dropping {} = {:?}", label, column, token),
                        }
                    }
                }
                state = Expect::Header;
            }
        }
    }

    debug!("Parsed {} protocol blocks", table.len());
    Ok((table, mismatches))
}

/// Parses header/data content into a protocol table.
pub fn parse_protocol_stats<R: BufRead>(reader: R) -> io::Result<ProtocolTable> {
    parse_protocol_stats_with_diagnostics(reader).map(|(table, _)| table)
}

/// Reads `/proc/net/snmp` (or its override).
pub fn read_protocol_table(paths: &SourcePaths) -> Result<ProtocolTable> {
    let path = paths.resolve(Source::ProtocolStats, 0);
    read_source(&path, parse_protocol_stats)
}

/// Reads `/proc/net/netstat` (or its override).
pub fn read_extended_protocol_table(paths: &SourcePaths) -> Result<ProtocolTable> {
    let path = paths.resolve(Source::ExtendedProtocolStats, 0);
    read_source(&path, parse_protocol_stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SNMP: &str = "\
Ip: Forwarding DefaultTTL InReceives InHdrErrors
Ip: 1 64 2882145 5
Icmp: InMsgs InErrors
Icmp: 45 0
Tcp: RtoAlgorithm RtoMin RtoMax MaxConn ActiveOpens
Tcp: 1 200 120000 -1 4321
Udp: InDatagrams NoPorts InErrors OutDatagrams
Udp: 153112 40 0 154000
";

    #[test]
    fn test_single_block() {
        let table =
            parse_protocol_stats("Ip: Forwarding InHdrErrors\nIp: 1 5\n".as_bytes()).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table["Ip"].len(), 2);
        assert_eq!(table["Ip"]["Forwarding"], 1);
        assert_eq!(table["Ip"]["InHdrErrors"], 5);
        assert_eq!(
            serde_json::to_string(&table).unwrap(),
            r#"{"Ip":{"Forwarding":1,"InHdrErrors":5}}"#
        );
    }

    #[test]
    fn test_blocks_in_file_order() {
        let table = parse_protocol_stats(SNMP.as_bytes()).unwrap();
        let labels: Vec<&str> = table.keys().collect();
        assert_eq!(labels, vec!["Ip", "Icmp", "Tcp", "Udp"]);
        assert_eq!(table["Udp"]["OutDatagrams"], 154000);

        let columns: Vec<&str> = table["Ip"].keys().collect();
        assert_eq!(
            columns,
            vec!["Forwarding", "DefaultTTL", "InReceives", "InHdrErrors"]
        );
    }

    #[test]
    fn test_unparseable_value_dropped() {
        let table = parse_protocol_stats(SNMP.as_bytes()).unwrap();
        let tcp = &table["Tcp"];
        // MaxConn is -1, which is not a valid counter
        assert!(!tcp.contains_key("MaxConn"));
        assert_eq!(tcp["RtoMax"], 120000);
        assert_eq!(tcp["ActiveOpens"], 4321);
        assert_eq!(tcp.len(), 4);
    }

    #[test]
    fn test_extra_values_dropped() {
        let table = parse_protocol_stats("Udp: InDatagrams\nUdp: 7 8 9\n".as_bytes()).unwrap();
        assert_eq!(table["Udp"].len(), 1);
        assert_eq!(table["Udp"]["InDatagrams"], 7);
    }

    #[test]
    fn test_blank_lines_do_not_flip_state() {
        let table =
            parse_protocol_stats("\nIp: Forwarding\n\nIp: 2\n\n".as_bytes()).unwrap();
        assert_eq!(table["Ip"]["Forwarding"], 2);
    }

    #[test]
    fn test_trailing_header_without_data() {
        let table = parse_protocol_stats("Ip: Forwarding\nIp: 1\nIcmp: InMsgs\n".as_bytes())
            .unwrap();
        assert_eq!(table.len(), 2);
        assert!(table["Icmp"].is_empty());
    }

    #[test]
    fn test_mismatch_reported_but_not_corrected() {
        let input = "Ip: Forwarding InReceives\nTcp: 1 2\n";
        let (table, mismatches) =
            parse_protocol_stats_with_diagnostics(input.as_bytes()).unwrap();

        // Values land under the header's label regardless
        assert_eq!(table["Ip"]["Forwarding"], 1);
        assert_eq!(table["Ip"]["InReceives"], 2);
        assert!(!table.contains_key("Tcp"));
        assert_eq!(
            mismatches,
            vec![AlternationMismatch {
                line: 2,
                header_label: "Ip".into(),
                data_label: "Tcp".into(),
            }]
        );
    }

    #[test]
    fn test_desynchronised_input_stays_shifted() {
        // A missing data line makes every later header be read as data.
        let input = "Ip: Forwarding\nIcmp: InMsgs\nIcmp: 45\nUdp: NoPorts\nUdp: 3\n";
        let (table, mismatches) =
            parse_protocol_stats_with_diagnostics(input.as_bytes()).unwrap();

        assert!(table["Ip"].is_empty());
        // "Icmp: 45" was taken as a header with column "45", and so on
        assert!(table["Icmp"].is_empty());
        assert!(table["Udp"].is_empty());

        let lines: Vec<usize> = mismatches.iter().map(|m| m.line).collect();
        assert_eq!(lines, vec![2, 4]);
        assert_eq!(mismatches[1].header_label, "Icmp");
        assert_eq!(mismatches[1].data_label, "Udp");
    }

    #[test]
    fn test_clean_input_has_no_mismatches() {
        let (_, mismatches) = parse_protocol_stats_with_diagnostics(SNMP.as_bytes()).unwrap();
        assert!(mismatches.is_empty());
    }

    #[test]
    fn test_repeated_label_replaces_block() {
        let input = "Ip: A\nIp: 1\nIp: B\nIp: 2\n";
        let table = parse_protocol_stats(input.as_bytes()).unwrap();
        assert_eq!(table.len(), 1);
        assert!(!table["Ip"].contains_key("A"));
        assert_eq!(table["Ip"]["B"], 2);
    }
}
