//! Memory information collector.
//!
//! Reads `/proc/meminfo`, one `Label:   value [kB]` pair per line. The unit
//! token is ignored. Lines whose value does not parse are skipped, so a label
//! missing from the raw record means the kernel did not report it (or reported
//! it unreadably), not that it was zero.

use serde::{Deserialize, Serialize};
use std::io::{self, BufRead};
use tracing::debug;

use crate::error::Result;
use crate::numeric::{parse_counter, strip_label, Value};
use crate::record::{FromRaw, RawRecord};
use crate::source::{lossy_lines, read_source, Source, SourcePaths};

/// Parsed `/proc/meminfo`. Values are in the file's units (kB except for the
/// `HugePages_*` page counts).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MemoryInfo {
    pub mem_total: u64,
    pub mem_free: u64,
    pub mem_available: u64,
    pub buffers: u64,
    pub cached: u64,
    pub swap_cached: u64,
    pub active: u64,
    pub inactive: u64,
    #[serde(rename = "Active_anon")]
    pub active_anon: u64,
    #[serde(rename = "Inactive_anon")]
    pub inactive_anon: u64,
    #[serde(rename = "Active_file")]
    pub active_file: u64,
    #[serde(rename = "Inactive_file")]
    pub inactive_file: u64,
    pub unevictable: u64,
    pub mlocked: u64,
    pub high_total: u64,
    pub high_free: u64,
    pub low_total: u64,
    pub low_free: u64,
    pub mmap_copy: u64,
    pub swap_total: u64,
    pub swap_free: u64,
    pub dirty: u64,
    pub writeback: u64,
    pub anon_pages: u64,
    pub mapped: u64,
    pub shmem: u64,
    pub slab: u64,
    pub s_reclaimable: u64,
    pub s_unreclaim: u64,
    pub kernel_stack: u64,
    pub page_tables: u64,
    pub quicklists: u64,
    #[serde(rename = "NFS_Unstable")]
    pub nfs_unstable: u64,
    pub bounce: u64,
    pub writeback_tmp: u64,
    pub commit_limit: u64,
    #[serde(rename = "Committed_AS")]
    pub committed_as: u64,
    pub vmalloc_total: u64,
    pub vmalloc_used: u64,
    pub vmalloc_chunk: u64,
    pub hardware_corrupted: u64,
    pub anon_huge_pages: u64,
    pub shmem_huge_pages: u64,
    pub shmem_pmd_mapped: u64,
    pub cma_total: u64,
    pub cma_free: u64,
    #[serde(rename = "HugePages_Total")]
    pub huge_pages_total: u64,
    #[serde(rename = "HugePages_Free")]
    pub huge_pages_free: u64,
    #[serde(rename = "HugePages_Rsvd")]
    pub huge_pages_rsvd: u64,
    #[serde(rename = "HugePages_Surp")]
    pub huge_pages_surp: u64,
    pub hugepagesize: u64,
    #[serde(rename = "DirectMap4k")]
    pub direct_map_4k: u64,
    #[serde(rename = "DirectMap4M")]
    pub direct_map_4m: u64,
    #[serde(rename = "DirectMap2M")]
    pub direct_map_2m: u64,
    #[serde(rename = "DirectMap1G")]
    pub direct_map_1g: u64,
}

impl MemoryInfo {
    /// Field backing a kernel label. Matching is exact and case-sensitive.
    fn slot_mut(&mut self, label: &str) -> Option<&mut u64> {
        let slot = match label {
            "MemTotal" => &mut self.mem_total,
            "MemFree" => &mut self.mem_free,
            "MemAvailable" => &mut self.mem_available,
            "Buffers" => &mut self.buffers,
            "Cached" => &mut self.cached,
            "SwapCached" => &mut self.swap_cached,
            "Active" => &mut self.active,
            "Inactive" => &mut self.inactive,
            "Active(anon)" => &mut self.active_anon,
            "Inactive(anon)" => &mut self.inactive_anon,
            "Active(file)" => &mut self.active_file,
            "Inactive(file)" => &mut self.inactive_file,
            "Unevictable" => &mut self.unevictable,
            "Mlocked" => &mut self.mlocked,
            "HighTotal" => &mut self.high_total,
            "HighFree" => &mut self.high_free,
            "LowTotal" => &mut self.low_total,
            "LowFree" => &mut self.low_free,
            "MmapCopy" => &mut self.mmap_copy,
            "SwapTotal" => &mut self.swap_total,
            "SwapFree" => &mut self.swap_free,
            "Dirty" => &mut self.dirty,
            "Writeback" => &mut self.writeback,
            "AnonPages" => &mut self.anon_pages,
            "Mapped" => &mut self.mapped,
            "Shmem" => &mut self.shmem,
            "Slab" => &mut self.slab,
            "SReclaimable" => &mut self.s_reclaimable,
            "SUnreclaim" => &mut self.s_unreclaim,
            "KernelStack" => &mut self.kernel_stack,
            "PageTables" => &mut self.page_tables,
            "Quicklists" => &mut self.quicklists,
            "NFS_Unstable" => &mut self.nfs_unstable,
            "Bounce" => &mut self.bounce,
            "WritebackTmp" => &mut self.writeback_tmp,
            "CommitLimit" => &mut self.commit_limit,
            "Committed_AS" => &mut self.committed_as,
            "VmallocTotal" => &mut self.vmalloc_total,
            "VmallocUsed" => &mut self.vmalloc_used,
            "VmallocChunk" => &mut self.vmalloc_chunk,
            "HardwareCorrupted" => &mut self.hardware_corrupted,
            "AnonHugePages" => &mut self.anon_huge_pages,
            "ShmemHugePages" => &mut self.shmem_huge_pages,
            "ShmemPmdMapped" => &mut self.shmem_pmd_mapped,
            "CmaTotal" => &mut self.cma_total,
            "CmaFree" => &mut self.cma_free,
            "HugePages_Total" => &mut self.huge_pages_total,
            "HugePages_Free" => &mut self.huge_pages_free,
            "HugePages_Rsvd" => &mut self.huge_pages_rsvd,
            "HugePages_Surp" => &mut self.huge_pages_surp,
            "Hugepagesize" => &mut self.hugepagesize,
            "DirectMap4k" => &mut self.direct_map_4k,
            "DirectMap4M" => &mut self.direct_map_4m,
            "DirectMap2M" => &mut self.direct_map_2m,
            "DirectMap1G" => &mut self.direct_map_1g,
            _ => return None,
        };
        Some(slot)
    }

    /// True if `label` maps onto a typed field.
    pub fn is_known_label(label: &str) -> bool {
        MemoryInfo::default().slot_mut(label).is_some()
    }
}

impl FromRaw for MemoryInfo {
    fn from_raw(raw: &RawRecord) -> Self {
        let mut info = MemoryInfo::default();
        for (label, value) in raw.iter() {
            if let Some(slot) = info.slot_mut(label) {
                *slot = value.to_u64().unwrap_or(0);
            }
        }
        info
    }
}

/// Splits one meminfo line into label and value.
///
/// Returns `None` for blank lines, lines without a value token, and values
/// that are not unsigned integers.
pub fn parse_meminfo_line(line: &str) -> Option<(&str, u64)> {
    let mut tokens = line.split_whitespace();
    let label = strip_label(tokens.next()?);
    let token = tokens.next()?;
    match parse_counter(token) {
        Some(value) => Some((label, value)),
        None => {
            debug!("Skipping meminfo label {}: unparseable value {:?}", label, token);
            None
        }
    }
}

/// Parses meminfo content into a raw record in file order.
pub fn parse_meminfo<R: BufRead>(reader: R) -> io::Result<RawRecord> {
    let mut raw = RawRecord::new();
    for line in lossy_lines(reader) {
        let line = line?;
        if let Some((label, value)) = parse_meminfo_line(&line) {
            raw.insert(label, Value::U64(value));
        }
    }
    debug!("Parsed {} meminfo labels", raw.len());
    Ok(raw)
}

pub fn read_memory_info_raw(paths: &SourcePaths) -> Result<RawRecord> {
    let path = paths.resolve(Source::MemoryInfo, 0);
    read_source(&path, parse_meminfo)
}

pub fn read_memory_info(paths: &SourcePaths) -> Result<MemoryInfo> {
    read_memory_info_raw(paths).map(|raw| MemoryInfo::from_raw(&raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MEMINFO: &str = "\
MemTotal:       16314412 kB
MemFree:         1204724 kB
MemAvailable:    9411448 kB
Buffers:          512340 kB
Cached:          7601224 kB
SwapCached:            0 kB
Active(anon):    4242424 kB
Inactive(anon):   131072 kB
Active(file):    3000000 kB
Inactive(file):  2000000 kB
KReclaimable:     412340 kB
Committed_AS:   12345678 kB
HugePages_Total:       0
HugePages_Free:        0
Hugepagesize:       2048 kB
DirectMap4k:      534080 kB
DirectMap2M:    15009792 kB
DirectMap1G:     2097152 kB
";

    #[test]
    fn test_parse_meminfo_line() {
        assert_eq!(
            parse_meminfo_line("MemTotal:       16314412 kB"),
            Some(("MemTotal", 16314412))
        );
        assert_eq!(parse_meminfo_line("HugePages_Total:   4"), Some(("HugePages_Total", 4)));
        assert_eq!(parse_meminfo_line(""), None);
        assert_eq!(parse_meminfo_line("MemTotal:"), None);
        assert_eq!(parse_meminfo_line("MemTotal: lots kB"), None);
    }

    #[test]
    fn test_typed_projection() {
        let raw = parse_meminfo(MEMINFO.as_bytes()).unwrap();
        let info = MemoryInfo::from_raw(&raw);

        assert_eq!(info.mem_total, 16314412);
        assert_eq!(info.mem_available, 9411448);
        assert_eq!(info.active_anon, 4242424);
        assert_eq!(info.inactive_anon, 131072);
        assert_eq!(info.active_file, 3000000);
        assert_eq!(info.inactive_file, 2000000);
        assert_eq!(info.committed_as, 12345678);
        assert_eq!(info.hugepagesize, 2048);
        assert_eq!(info.direct_map_4k, 534080);
        assert_eq!(info.direct_map_1g, 2097152);
        // Not present in the input
        assert_eq!(info.swap_total, 0);
        assert_eq!(info.direct_map_4m, 0);
    }

    #[test]
    fn test_absent_label_absent_from_raw() {
        let raw = parse_meminfo(MEMINFO.as_bytes()).unwrap();
        assert!(!raw.contains_key("SwapTotal"));
        assert!(!raw.contains_key("Active"));
        assert_eq!(MemoryInfo::from_raw(&raw).active, 0);
    }

    #[test]
    fn test_unknown_labels_kept_in_raw_only() {
        let raw = parse_meminfo(MEMINFO.as_bytes()).unwrap();
        assert_eq!(raw["KReclaimable"], Value::U64(412340));
        assert!(!MemoryInfo::is_known_label("KReclaimable"));
    }

    #[test]
    fn test_raw_preserves_file_order() {
        let raw = parse_meminfo(MEMINFO.as_bytes()).unwrap();
        let keys: Vec<&str> = raw.keys().take(4).collect();
        assert_eq!(keys, vec!["MemTotal", "MemFree", "MemAvailable", "Buffers"]);
        assert_eq!(raw.len(), 18);
    }

    #[test]
    fn test_label_matching_is_case_sensitive() {
        let raw = parse_meminfo("memtotal: 10 kB\nActive(Anon): 5 kB\n".as_bytes()).unwrap();
        let info = MemoryInfo::from_raw(&raw);
        assert_eq!(info.mem_total, 0);
        assert_eq!(info.active_anon, 0);
        assert_eq!(raw.len(), 2);
    }

    #[test]
    fn test_malformed_value_omits_only_that_label() {
        let input = MEMINFO.replace("Buffers:          512340 kB", "Buffers:          5x2340 kB");
        let raw = parse_meminfo(input.as_bytes()).unwrap();

        assert!(!raw.contains_key("Buffers"));
        assert_eq!(raw.len(), 17);
        assert_eq!(raw["Cached"], Value::U64(7601224));
        assert_eq!(MemoryInfo::from_raw(&raw).buffers, 0);
    }

    #[test]
    fn test_serialized_names() {
        let info = MemoryInfo {
            active_anon: 1,
            committed_as: 2,
            huge_pages_total: 3,
            direct_map_4m: 4,
            s_reclaimable: 5,
            ..Default::default()
        };
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["Active_anon"], 1);
        assert_eq!(json["Committed_AS"], 2);
        assert_eq!(json["HugePages_Total"], 3);
        assert_eq!(json["DirectMap4M"], 4);
        assert_eq!(json["SReclaimable"], 5);
        assert_eq!(json["MemTotal"], 0);
    }
}
