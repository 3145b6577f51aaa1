//! Dump command implementation.
//!
//! Reads one source (or all of them) and prints the typed record, or the raw
//! label mapping with `--raw`, in the configured format.

use anyhow::{bail, Result};
use proc_parse::collectors::{self, KeyStyle};
use proc_parse::{render, ProcError, RenderFormat, Source, SourcePaths};
use serde::Serialize;
use tracing::warn;

use crate::config::Config;

/// How records are printed.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputOptions {
    pub format: RenderFormat,
    pub pretty: bool,
    pub raw: bool,
}

impl OutputOptions {
    pub fn from_config(config: &Config, raw: bool) -> Self {
        Self {
            format: config.render_format(),
            pretty: config.pretty.unwrap_or(false),
            raw,
        }
    }
}

/// A single source together with its per-source parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Stat { pid: u32 },
    Meminfo,
    Netdev { keys: KeyStyle },
    Snmp,
    Netstat,
}

impl Target {
    pub fn source(&self) -> Source {
        match self {
            Target::Stat { .. } => Source::ProcessStatus,
            Target::Meminfo => Source::MemoryInfo,
            Target::Netdev { .. } => Source::DeviceStats,
            Target::Snmp => Source::ProtocolStats,
            Target::Netstat => Source::ExtendedProtocolStats,
        }
    }

    fn pid(&self) -> u32 {
        match self {
            Target::Stat { pid } => *pid,
            _ => 0,
        }
    }
}

/// Rendered output of one source, plus the read error when the source was
/// unavailable and the zero-valued record was rendered instead.
#[derive(Debug)]
pub struct Dump {
    pub text: String,
    pub error: Option<ProcError>,
}

fn emit<T: Serialize + Default>(
    result: proc_parse::error::Result<T>,
    options: &OutputOptions,
) -> Result<Dump> {
    let (value, error) = match result {
        Ok(value) => (value, None),
        Err(e) => (T::default(), Some(e)),
    };
    let text = render(&value, options.format, options.pretty)?;
    Ok(Dump { text, error })
}

/// Reads and renders one source.
pub fn dump_source(target: &Target, paths: &SourcePaths, options: &OutputOptions) -> Result<Dump> {
    match (*target, options.raw) {
        (Target::Stat { pid }, false) => emit(collectors::read_process_status(paths, pid), options),
        (Target::Stat { pid }, true) => emit(collectors::read_process_status_raw(paths, pid), options),
        (Target::Meminfo, false) => emit(collectors::read_memory_info(paths), options),
        (Target::Meminfo, true) => emit(collectors::read_memory_info_raw(paths), options),
        (Target::Netdev { .. }, false) => emit(collectors::read_device_table(paths), options),
        (Target::Netdev { keys }, true) => emit(collectors::read_device_counters(paths, keys), options),
        // Protocol tables have no typed form beyond the nested mapping
        (Target::Snmp, _) => emit(collectors::read_protocol_table(paths), options),
        (Target::Netstat, _) => emit(collectors::read_extended_protocol_table(paths), options),
    }
}

/// Prints one source. An unavailable source prints its zero-valued record and
/// fails the command.
pub fn command_dump(target: &Target, paths: &SourcePaths, options: &OutputOptions) -> Result<()> {
    let dump = dump_source(target, paths, options)?;
    println!("{}", dump.text);

    match dump.error {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}

/// Prints every source behind a banner naming its path.
pub fn command_all(
    pid: u32,
    keys: KeyStyle,
    paths: &SourcePaths,
    options: &OutputOptions,
) -> Result<()> {
    let targets = [
        Target::Stat { pid },
        Target::Meminfo,
        Target::Netdev { keys },
        Target::Snmp,
        Target::Netstat,
    ];

    let mut failed = 0;
    for target in &targets {
        let path = paths.resolve(target.source(), target.pid());
        println!("---------- {} ----------", path.display());

        let dump = dump_source(target, paths, options)?;
        println!("{}", dump.text);

        if let Some(e) = dump.error {
            warn!("{}: {}", target.source(), e);
            eprintln!("❌ {e}");
            failed += 1;
        }
    }

    if failed > 0 {
        bail!("{} of {} sources unavailable", failed, targets.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const MEMINFO: &str = "MemTotal: 2048 kB\nMemFree: 512 kB\nActive(anon): 64 kB\n";

    fn options(raw: bool) -> OutputOptions {
        OutputOptions {
            format: RenderFormat::Json,
            pretty: false,
            raw,
        }
    }

    #[test]
    fn test_typed_and_raw_meminfo() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("meminfo");
        fs::write(&path, MEMINFO).unwrap();
        let mut paths = SourcePaths::default();
        paths.set(Source::MemoryInfo, &path);

        let typed = dump_source(&Target::Meminfo, &paths, &options(false)).unwrap();
        assert!(typed.error.is_none());
        let json: serde_json::Value = serde_json::from_str(&typed.text).unwrap();
        assert_eq!(json["MemTotal"], 2048);
        assert_eq!(json["Active_anon"], 64);
        assert_eq!(json["SwapTotal"], 0);

        let raw = dump_source(&Target::Meminfo, &paths, &options(true)).unwrap();
        assert_eq!(
            raw.text,
            r#"{"MemTotal":2048,"MemFree":512,"Active(anon)":64}"#
        );
    }

    #[test]
    fn test_netdev_raw_kebab() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dev");
        fs::write(&path, "  lo: 1234 10 0 0 0 0 0 0 5678 10 0 0 0 0 0 0\n").unwrap();
        let mut paths = SourcePaths::default();
        paths.set(Source::DeviceStats, &path);

        let target = Target::Netdev {
            keys: KeyStyle::Kebab,
        };
        let dump = dump_source(&target, &paths, &options(true)).unwrap();
        let json: serde_json::Value = serde_json::from_str(&dump.text).unwrap();
        assert_eq!(json["lo"]["receive-bytes"], 1234);
        assert_eq!(json["lo"]["transmit-bytes"], 5678);
    }

    #[test]
    fn test_unavailable_source_renders_zero_record() {
        let dir = tempdir().unwrap();
        let mut paths = SourcePaths::default();
        paths.set(Source::ProcessStatus, dir.path().join("missing"));

        let dump = dump_source(&Target::Stat { pid: 1 }, &paths, &options(false)).unwrap();
        assert!(dump.error.as_ref().is_some_and(ProcError::is_source_unavailable));
        let json: serde_json::Value = serde_json::from_str(&dump.text).unwrap();
        assert_eq!(json["pid"], 0);
        assert_eq!(json["comm"], "");

        assert!(command_dump(&Target::Stat { pid: 1 }, &paths, &options(false)).is_err());
    }

    #[test]
    fn test_all_fails_when_any_source_missing() {
        let dir = tempdir().unwrap();
        let meminfo = dir.path().join("meminfo");
        fs::write(&meminfo, MEMINFO).unwrap();

        let mut paths = SourcePaths::default();
        for source in Source::ALL {
            paths.set(source, dir.path().join("missing"));
        }
        paths.set(Source::MemoryInfo, &meminfo);

        let err = command_all(1, KeyStyle::Pascal, &paths, &options(false)).unwrap_err();
        assert!(err.to_string().contains("4 of 5"));
    }
}
