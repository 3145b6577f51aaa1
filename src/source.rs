//! Source selection and scoped reading of kernel files.
//!
//! Each extractor reads one file whose location is fixed by convention but can
//! be overridden per source. Overrides travel in an explicit [`SourcePaths`]
//! value; the environment is only consulted by [`SourcePaths::from_env`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{ProcError, Result};

/// Read buffer size for kernel files. They are small and produced in one go.
pub const READ_BUFFER_KB: usize = 16;

/// The kernel files this crate knows how to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// `/proc/<pid>/stat`
    ProcessStatus,
    /// `/proc/meminfo`
    MemoryInfo,
    /// `/proc/net/dev`
    DeviceStats,
    /// `/proc/net/snmp`
    ProtocolStats,
    /// `/proc/net/netstat`
    ExtendedProtocolStats,
}

impl Source {
    pub const ALL: [Source; 5] = [
        Source::ProcessStatus,
        Source::MemoryInfo,
        Source::DeviceStats,
        Source::ProtocolStats,
        Source::ExtendedProtocolStats,
    ];

    /// Environment variable that overrides this source's path.
    pub fn env_var(self) -> &'static str {
        match self {
            Source::ProcessStatus => "PROC_PID_STAT",
            Source::MemoryInfo => "PROC_MEMINFO",
            Source::DeviceStats => "PROC_NET_DEV",
            Source::ProtocolStats => "PROC_NET_SNMP",
            Source::ExtendedProtocolStats => "PROC_NET_NETSTAT",
        }
    }

    /// Default location. `pid` only matters for [`Source::ProcessStatus`].
    pub fn default_path(self, pid: u32) -> PathBuf {
        match self {
            Source::ProcessStatus => PathBuf::from(format!("/proc/{pid}/stat")),
            Source::MemoryInfo => PathBuf::from("/proc/meminfo"),
            Source::DeviceStats => PathBuf::from("/proc/net/dev"),
            Source::ProtocolStats => PathBuf::from("/proc/net/snmp"),
            Source::ExtendedProtocolStats => PathBuf::from("/proc/net/netstat"),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Source::ProcessStatus => "stat",
            Source::MemoryInfo => "meminfo",
            Source::DeviceStats => "netdev",
            Source::ProtocolStats => "snmp",
            Source::ExtendedProtocolStats => "netstat",
        };
        f.write_str(name)
    }
}

/// Optional path override per source.
///
/// An override for the process-status source replaces the whole
/// `/proc/<pid>/stat` path, so the pid is ignored once it is set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourcePaths {
    #[serde(default, alias = "proc-pid-stat", skip_serializing_if = "Option::is_none")]
    pub pid_stat: Option<PathBuf>,
    #[serde(default, alias = "proc-meminfo", skip_serializing_if = "Option::is_none")]
    pub meminfo: Option<PathBuf>,
    #[serde(default, alias = "proc-net-dev", skip_serializing_if = "Option::is_none")]
    pub net_dev: Option<PathBuf>,
    #[serde(default, alias = "proc-net-snmp", skip_serializing_if = "Option::is_none")]
    pub net_snmp: Option<PathBuf>,
    #[serde(default, alias = "proc-net-netstat", skip_serializing_if = "Option::is_none")]
    pub net_netstat: Option<PathBuf>,
}

impl SourcePaths {
    /// Overrides taken from `PROC_PID_STAT`, `PROC_MEMINFO`, `PROC_NET_DEV`,
    /// `PROC_NET_SNMP` and `PROC_NET_NETSTAT`. Empty variables count as unset.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var_os(name).map(PathBuf::from))
    }

    /// Same as [`SourcePaths::from_env`] with a caller-supplied lookup.
    pub fn from_lookup(mut lookup: impl FnMut(&str) -> Option<PathBuf>) -> Self {
        let mut paths = SourcePaths::default();
        for source in Source::ALL {
            let value = lookup(source.env_var()).filter(|p| !p.as_os_str().is_empty());
            *paths.slot_mut(source) = value;
        }
        paths
    }

    fn slot_mut(&mut self, source: Source) -> &mut Option<PathBuf> {
        match source {
            Source::ProcessStatus => &mut self.pid_stat,
            Source::MemoryInfo => &mut self.meminfo,
            Source::DeviceStats => &mut self.net_dev,
            Source::ProtocolStats => &mut self.net_snmp,
            Source::ExtendedProtocolStats => &mut self.net_netstat,
        }
    }

    pub fn get(&self, source: Source) -> Option<&Path> {
        let slot = match source {
            Source::ProcessStatus => &self.pid_stat,
            Source::MemoryInfo => &self.meminfo,
            Source::DeviceStats => &self.net_dev,
            Source::ProtocolStats => &self.net_snmp,
            Source::ExtendedProtocolStats => &self.net_netstat,
        };
        slot.as_deref()
    }

    pub fn set(&mut self, source: Source, path: impl Into<PathBuf>) -> &mut Self {
        *self.slot_mut(source) = Some(path.into());
        self
    }

    /// Fills every unset override from `fallback`; values already set win.
    pub fn or(mut self, fallback: &SourcePaths) -> Self {
        for source in Source::ALL {
            let slot = self.slot_mut(source);
            if slot.is_none() {
                *slot = fallback.get(source).map(Path::to_path_buf);
            }
        }
        self
    }

    /// Effective path for `source`: the override if set, otherwise the default.
    pub fn resolve(&self, source: Source, pid: u32) -> PathBuf {
        self.get(source)
            .map(Path::to_path_buf)
            .unwrap_or_else(|| source.default_path(pid))
    }
}

/// Opens `path`, hands a buffered reader to `parse`, and closes the file
/// before returning on every path.
pub fn read_source<T>(path: &Path, parse: impl FnOnce(BufReader<File>) -> io::Result<T>) -> Result<T> {
    debug!("Opening {}", path.display());
    let file = File::open(path).map_err(|e| ProcError::unavailable(path, e))?;
    let reader = BufReader::with_capacity(READ_BUFFER_KB * 1024, file);
    parse(reader).map_err(|e| ProcError::unavailable(path, e))
}

/// Line iterator that tolerates invalid UTF-8 by replacing bad bytes.
pub struct LossyLines<R> {
    reader: R,
    buf: Vec<u8>,
}

pub fn lossy_lines<R: BufRead>(reader: R) -> LossyLines<R> {
    LossyLines {
        reader,
        buf: Vec::new(),
    }
}

impl<R: BufRead> Iterator for LossyLines<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => None,
            Ok(_) => {
                while matches!(self.buf.last(), Some(b'\n' | b'\r')) {
                    self.buf.pop();
                }
                Some(Ok(String::from_utf8_lossy(&self.buf).into_owned()))
            }
            Err(e) => Some(Err(e)),
        }
    }
}
