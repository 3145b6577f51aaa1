//! CLI arguments and subcommands for proc-parse.
//!
//! This module defines the command-line interface structure using the clap library,
//! including all flags, options, and subcommands.

use clap::{Parser, Subcommand, ValueEnum};
use proc_parse::collectors::KeyStyle;
use proc_parse::{RenderFormat, Source, SourcePaths};
use std::path::PathBuf;

/// Log level options for CLI parsing
#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Configuration format options for output
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

/// Record output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
}

impl From<OutputFormat> for RenderFormat {
    fn from(f: OutputFormat) -> Self {
        match f {
            OutputFormat::Json => RenderFormat::Json,
            OutputFormat::Yaml => RenderFormat::Yaml,
        }
    }
}

/// Key naming for the raw /proc/net/dev view
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KeyStyleArg {
    Pascal,
    Kebab,
}

impl From<KeyStyleArg> for KeyStyle {
    fn from(k: KeyStyleArg) -> Self {
        match k {
            KeyStyleArg::Pascal => KeyStyle::Pascal,
            KeyStyleArg::Kebab => KeyStyle::Kebab,
        }
    }
}

/// Main CLI arguments structure
#[derive(Parser, Debug)]
#[command(
    name = "proc-parse",
    about = "Parse Linux /proc status, memory and network statistics into typed records",
    long_about = "Parse Linux /proc status, memory and network statistics into typed records.\n\n\
                  Reads /proc/<pid>/stat, /proc/meminfo, /proc/net/dev, /proc/net/snmp and \
                  /proc/net/netstat once and prints them as JSON or YAML. Every source path can \
                  be overridden by flag, environment variable or config file.",
    version,
    propagate_version = true
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Log level (logs go to stderr)
    #[arg(long, value_enum, default_value = "warn", global = true)]
    pub log_level: LogLevel,

    /// Config file (YAML/JSON/TOML)
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Disable all config file loading
    #[arg(long)]
    pub no_config: bool,

    /// Print effective merged config and exit
    #[arg(long)]
    pub show_config: bool,

    /// Validate config and exit (return code 1 on error)
    #[arg(long)]
    pub check_config: bool,

    /// Output format for --show-config
    #[arg(long, value_enum, default_value = "yaml")]
    pub config_format: ConfigFormat,

    /// Record output format [default: json]
    #[arg(short = 'f', long, value_enum, global = true)]
    pub format: Option<OutputFormat>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Print the raw label mapping instead of the typed record
    #[arg(long, global = true)]
    pub raw: bool,

    /// Override path of /proc/<pid>/stat (env: PROC_PID_STAT)
    #[arg(long)]
    pub pid_stat_path: Option<PathBuf>,

    /// Override path of /proc/meminfo (env: PROC_MEMINFO)
    #[arg(long)]
    pub meminfo_path: Option<PathBuf>,

    /// Override path of /proc/net/dev (env: PROC_NET_DEV)
    #[arg(long)]
    pub net_dev_path: Option<PathBuf>,

    /// Override path of /proc/net/snmp (env: PROC_NET_SNMP)
    #[arg(long)]
    pub net_snmp_path: Option<PathBuf>,

    /// Override path of /proc/net/netstat (env: PROC_NET_NETSTAT)
    #[arg(long)]
    pub net_netstat_path: Option<PathBuf>,
}

impl Args {
    /// Path overrides given on the command line.
    pub fn source_overrides(&self) -> SourcePaths {
        let mut paths = SourcePaths::default();
        let flags = [
            (Source::ProcessStatus, &self.pid_stat_path),
            (Source::MemoryInfo, &self.meminfo_path),
            (Source::DeviceStats, &self.net_dev_path),
            (Source::ProtocolStats, &self.net_snmp_path),
            (Source::ExtendedProtocolStats, &self.net_netstat_path),
        ];
        for (source, path) in flags {
            if let Some(path) = path {
                paths.set(source, path.clone());
            }
        }
        paths
    }
}

/// Subcommands, one per source plus `all` and `check`
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Parse /proc/<pid>/stat
    Stat {
        /// Process id (default: this process)
        #[arg(short = 'p', long)]
        pid: Option<u32>,
    },

    /// Parse /proc/meminfo
    Meminfo,

    /// Parse /proc/net/dev
    Netdev {
        /// Key style for --raw output
        #[arg(long, value_enum)]
        keys: Option<KeyStyleArg>,
    },

    /// Parse /proc/net/snmp
    Snmp,

    /// Parse /proc/net/netstat
    Netstat,

    /// Parse every source (default when no subcommand is given)
    All {
        /// Process id for the stat source (default: this process)
        #[arg(short = 'p', long)]
        pid: Option<u32>,
    },

    /// Check that every configured source can be read
    Check {
        /// Process id for the stat source (default: this process)
        #[arg(short = 'p', long)]
        pid: Option<u32>,
    },

    /// Generate a configuration file template
    Config {
        /// Output file path (use '-' for stdout)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Template format
        #[arg(long, value_enum, default_value = "yaml")]
        template_format: ConfigFormat,

        /// Prefix the YAML template with documentation comments
        #[arg(long)]
        commented: bool,
    },
}
