//! Process status collector.
//!
//! Reads `/proc/<pid>/stat`: a single line of whitespace-separated fields whose
//! meaning is purely positional. Field names and kinds follow proc(5).
//!
//! The line is split on whitespace only, so a `comm` containing spaces shifts
//! every later field. Malformed tokens become the field's zero; a line with
//! fewer than [`STAT_FIELD_COUNT`] tokens yields an all-zero record.

use serde::{Deserialize, Serialize};
use std::io::{self, BufRead};
use tracing::{debug, warn};

use crate::error::Result;
use crate::numeric::FieldKind;
use crate::record::{FromRaw, RawRecord};
use crate::source::{lossy_lines, read_source, Source, SourcePaths};

/// Number of fields understood by this collector.
pub const STAT_FIELD_COUNT: usize = 52;

/// Field name and kind for every position of the stat line, in order.
pub const STAT_SCHEMA: [(&str, FieldKind); STAT_FIELD_COUNT] = [
    ("pid", FieldKind::I32),
    ("comm", FieldKind::Str),
    ("state", FieldKind::Str),
    ("ppid", FieldKind::I32),
    ("pgrp", FieldKind::I32),
    ("session", FieldKind::I32),
    ("tty_nr", FieldKind::I32),
    ("tpgid", FieldKind::I32),
    ("flags", FieldKind::U32),
    ("minflt", FieldKind::U64),
    ("cminflt", FieldKind::U64),
    ("majflt", FieldKind::U64),
    ("cmajflt", FieldKind::U64),
    ("utime", FieldKind::U64),
    ("stime", FieldKind::U64),
    ("cutime", FieldKind::I64),
    ("cstime", FieldKind::I64),
    ("priority", FieldKind::I64),
    ("nice", FieldKind::I64),
    ("num_threads", FieldKind::I64),
    ("itrealvalue", FieldKind::I64),
    ("starttime", FieldKind::U64),
    ("vsize", FieldKind::U64),
    ("rss", FieldKind::I64),
    ("rsslim", FieldKind::U64),
    ("startcode", FieldKind::U64),
    ("endcode", FieldKind::U64),
    ("startstack", FieldKind::U64),
    ("kstkesp", FieldKind::U64),
    ("kstkeip", FieldKind::U64),
    ("signal", FieldKind::U64),
    ("blocked", FieldKind::U64),
    ("sigignore", FieldKind::U64),
    ("sigcatch", FieldKind::U64),
    ("wchan", FieldKind::U64),
    ("nswap", FieldKind::U64),
    ("cnswap", FieldKind::U64),
    ("exit_signal", FieldKind::I32),
    ("processor", FieldKind::I32),
    ("rt_priority", FieldKind::U32),
    ("policy", FieldKind::U32),
    ("delayacct_blkio_ticks", FieldKind::U64),
    ("guest_time", FieldKind::U64),
    ("cguest_time", FieldKind::I64),
    ("start_data", FieldKind::U64),
    ("end_data", FieldKind::U64),
    ("start_brk", FieldKind::U64),
    ("arg_start", FieldKind::U64),
    ("arg_end", FieldKind::U64),
    ("env_start", FieldKind::U64),
    ("env_end", FieldKind::U64),
    ("exit_code", FieldKind::I32),
];

/// Parsed `/proc/<pid>/stat`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessStatus {
    pub pid: i32,
    pub comm: String,
    pub state: String,
    pub ppid: i32,
    pub pgrp: i32,
    pub session: i32,
    pub tty_nr: i32,
    pub tpgid: i32,
    pub flags: u32,
    pub minflt: u64,
    pub cminflt: u64,
    pub majflt: u64,
    pub cmajflt: u64,
    pub utime: u64,
    pub stime: u64,
    pub cutime: i64,
    pub cstime: i64,
    pub priority: i64,
    pub nice: i64,
    pub num_threads: i64,
    pub itrealvalue: i64,
    pub starttime: u64,
    pub vsize: u64,
    pub rss: i64,
    pub rsslim: u64,
    pub startcode: u64,
    pub endcode: u64,
    pub startstack: u64,
    pub kstkesp: u64,
    pub kstkeip: u64,
    pub signal: u64,
    pub blocked: u64,
    pub sigignore: u64,
    pub sigcatch: u64,
    pub wchan: u64,
    pub nswap: u64,
    pub cnswap: u64,
    pub exit_signal: i32,
    pub processor: i32,
    pub rt_priority: u32,
    pub policy: u32,
    pub delayacct_blkio_ticks: u64,
    pub guest_time: u64,
    pub cguest_time: i64,
    pub start_data: u64,
    pub end_data: u64,
    pub start_brk: u64,
    pub arg_start: u64,
    pub arg_end: u64,
    pub env_start: u64,
    pub env_end: u64,
    pub exit_code: i32,
}

impl FromRaw for ProcessStatus {
    fn from_raw(raw: &RawRecord) -> Self {
        ProcessStatus {
            pid: raw.i32_or_zero("pid"),
            comm: raw.str_or_empty("comm"),
            state: raw.str_or_empty("state"),
            ppid: raw.i32_or_zero("ppid"),
            pgrp: raw.i32_or_zero("pgrp"),
            session: raw.i32_or_zero("session"),
            tty_nr: raw.i32_or_zero("tty_nr"),
            tpgid: raw.i32_or_zero("tpgid"),
            flags: raw.u32_or_zero("flags"),
            minflt: raw.u64_or_zero("minflt"),
            cminflt: raw.u64_or_zero("cminflt"),
            majflt: raw.u64_or_zero("majflt"),
            cmajflt: raw.u64_or_zero("cmajflt"),
            utime: raw.u64_or_zero("utime"),
            stime: raw.u64_or_zero("stime"),
            cutime: raw.i64_or_zero("cutime"),
            cstime: raw.i64_or_zero("cstime"),
            priority: raw.i64_or_zero("priority"),
            nice: raw.i64_or_zero("nice"),
            num_threads: raw.i64_or_zero("num_threads"),
            itrealvalue: raw.i64_or_zero("itrealvalue"),
            starttime: raw.u64_or_zero("starttime"),
            vsize: raw.u64_or_zero("vsize"),
            rss: raw.i64_or_zero("rss"),
            rsslim: raw.u64_or_zero("rsslim"),
            startcode: raw.u64_or_zero("startcode"),
            endcode: raw.u64_or_zero("endcode"),
            startstack: raw.u64_or_zero("startstack"),
            kstkesp: raw.u64_or_zero("kstkesp"),
            kstkeip: raw.u64_or_zero("kstkeip"),
            signal: raw.u64_or_zero("signal"),
            blocked: raw.u64_or_zero("blocked"),
            sigignore: raw.u64_or_zero("sigignore"),
            sigcatch: raw.u64_or_zero("sigcatch"),
            wchan: raw.u64_or_zero("wchan"),
            nswap: raw.u64_or_zero("nswap"),
            cnswap: raw.u64_or_zero("cnswap"),
            exit_signal: raw.i32_or_zero("exit_signal"),
            processor: raw.i32_or_zero("processor"),
            rt_priority: raw.u32_or_zero("rt_priority"),
            policy: raw.u32_or_zero("policy"),
            delayacct_blkio_ticks: raw.u64_or_zero("delayacct_blkio_ticks"),
            guest_time: raw.u64_or_zero("guest_time"),
            cguest_time: raw.i64_or_zero("cguest_time"),
            start_data: raw.u64_or_zero("start_data"),
            end_data: raw.u64_or_zero("end_data"),
            start_brk: raw.u64_or_zero("start_brk"),
            arg_start: raw.u64_or_zero("arg_start"),
            arg_end: raw.u64_or_zero("arg_end"),
            env_start: raw.u64_or_zero("env_start"),
            env_end: raw.u64_or_zero("env_end"),
            exit_code: raw.i32_or_zero("exit_code"),
        }
    }
}

/// Record with every schema field present and zero-valued.
pub fn zero_stat_record() -> RawRecord {
    STAT_SCHEMA
        .iter()
        .map(|(name, kind)| (*name, kind.zero()))
        .collect()
}

/// Maps the tokens of one stat line onto [`STAT_SCHEMA`].
pub fn parse_stat_line(line: &str) -> RawRecord {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < STAT_FIELD_COUNT {
        warn!(
            "stat line has {} fields, expected at least {} - zero-filling record",
            tokens.len(),
            STAT_FIELD_COUNT
        );
        return zero_stat_record();
    }
    if tokens.len() > STAT_FIELD_COUNT {
        debug!(
            "Ignoring {} trailing stat fields",
            tokens.len() - STAT_FIELD_COUNT
        );
    }

    STAT_SCHEMA
        .iter()
        .zip(tokens)
        .map(|((name, kind), token)| (*name, kind.parse_or_zero(name, token)))
        .collect()
}

/// Parses stat content. The first non-blank line is the data line; an input
/// without one yields the zero record.
pub fn parse_stat<R: BufRead>(reader: R) -> io::Result<RawRecord> {
    for line in lossy_lines(reader) {
        let line = line?;
        if !line.trim().is_empty() {
            return Ok(parse_stat_line(&line));
        }
    }
    debug!("stat source contained no data line");
    Ok(zero_stat_record())
}

/// Reads the raw stat record of process `pid`.
pub fn read_process_status_raw(paths: &SourcePaths, pid: u32) -> Result<RawRecord> {
    let path = paths.resolve(Source::ProcessStatus, pid);
    read_source(&path, parse_stat)
}

/// Reads and projects the stat record of process `pid`.
pub fn read_process_status(paths: &SourcePaths, pid: u32) -> Result<ProcessStatus> {
    read_process_status_raw(paths, pid).map(|raw| ProcessStatus::from_raw(&raw))
}
