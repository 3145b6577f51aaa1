//! proc-parse - version 0.1.0
//!
//! Command-line front end for the proc-parse library with tracing logging.
//! This is the main entry point that resolves configuration and dispatches subcommands.

mod cli;
mod commands;
mod config;

use anyhow::{Context, Result};
use clap::Parser;
use proc_parse::collectors::KeyStyle;
use tracing::debug;
use tracing::level_filters::LevelFilter;

use cli::{Args, Commands, LogLevel};
use commands::{command_all, command_check, command_config, command_dump, OutputOptions, Target};
use config::{resolve_config, show_config, validate_effective_config};

/// Initializes tracing logging subsystem with configured log level.
///
/// Logs go to stderr; stdout carries the records.
fn setup_logging(args: &Args) {
    let log_level = match args.log_level {
        LogLevel::Off => LevelFilter::OFF,
        LogLevel::Error => LevelFilter::ERROR,
        LogLevel::Warn => LevelFilter::WARN,
        LogLevel::Info => LevelFilter::INFO,
        LogLevel::Debug => LevelFilter::DEBUG,
        LogLevel::Trace => LevelFilter::TRACE,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {e}");
    }

    debug!("Logging initialized with level: {:?}", args.log_level);
}

/// Main application entry point.
fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(&args);

    // Template generation does not depend on the effective config
    if let Some(Commands::Config {
        output,
        template_format,
        commented,
    }) = &args.command
    {
        return command_config(output.clone(), *template_format, *commented);
    }

    let config = resolve_config(&args)?;

    if args.check_config {
        if let Err(e) = validate_effective_config(&config) {
            eprintln!("❌ Configuration invalid: {}", e);
            std::process::exit(1);
        }
        println!("✅ Configuration is valid");
        return Ok(());
    }

    if args.show_config {
        return show_config(&config, args.config_format);
    }

    validate_effective_config(&config).context("Configuration invalid")?;

    let options = OutputOptions::from_config(&config, args.raw);
    let own_pid = std::process::id();
    let paths = &config.sources;

    match args.command.clone().unwrap_or(Commands::All { pid: None }) {
        Commands::Stat { pid } => command_dump(
            &Target::Stat {
                pid: pid.unwrap_or(own_pid),
            },
            paths,
            &options,
        ),
        Commands::Meminfo => command_dump(&Target::Meminfo, paths, &options),
        Commands::Netdev { keys } => {
            let keys = keys.map(KeyStyle::from).unwrap_or_else(|| config.key_style());
            command_dump(&Target::Netdev { keys }, paths, &options)
        }
        Commands::Snmp => command_dump(&Target::Snmp, paths, &options),
        Commands::Netstat => command_dump(&Target::Netstat, paths, &options),
        Commands::All { pid } => command_all(
            pid.unwrap_or(own_pid),
            config.key_style(),
            paths,
            &options,
        ),
        Commands::Check { pid } => command_check(pid.unwrap_or(own_pid), &config),
        Commands::Config { .. } => unreachable!("Config handled above"),
    }
}
