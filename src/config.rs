//! Configuration management for proc-parse.
//!
//! This module handles loading, merging, and validating configuration from files,
//! environment variables and CLI arguments. It supports YAML, JSON, and TOML formats.

use anyhow::{bail, ensure, Context, Result};
use proc_parse::collectors::KeyStyle;
use proc_parse::{RenderFormat, Source, SourcePaths};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::cli::{Args, ConfigFormat, OutputFormat};

// Default configuration constants
pub const DEFAULT_FORMAT: &str = "json";
pub const DEFAULT_NETDEV_KEYS: &str = "pascal";

/// Default config file locations, searched in order.
pub const DEFAULT_CONFIG_PATHS: [&str; 4] = [
    "/etc/proc-parse/config.yaml",
    "./proc-parse.yaml",
    "./proc-parse.json",
    "./proc-parse.toml",
];

/// Effective configuration.
///
/// `sources` stays the last field: TOML requires plain values before tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Record output format: "json" or "yaml"
    pub format: Option<String>,

    /// Pretty-print JSON output
    pub pretty: Option<bool>,

    /// Key style for raw /proc/net/dev output: "pascal" or "kebab"
    pub netdev_keys: Option<String>,

    /// Per-source path overrides
    #[serde(default)]
    pub sources: SourcePaths,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            format: Some(DEFAULT_FORMAT.to_string()),
            pretty: Some(false),
            netdev_keys: Some(DEFAULT_NETDEV_KEYS.to_string()),
            sources: SourcePaths::default(),
        }
    }
}

impl Config {
    /// Output format, falling back to JSON for unset or unknown values.
    pub fn render_format(&self) -> RenderFormat {
        match self.format.as_deref() {
            Some("yaml") => RenderFormat::Yaml,
            _ => RenderFormat::Json,
        }
    }

    pub fn key_style(&self) -> KeyStyle {
        match self.netdev_keys.as_deref() {
            Some("kebab") => KeyStyle::Kebab,
            _ => KeyStyle::Pascal,
        }
    }
}

/// Validate effective config (used by --check-config and at startup)
pub fn validate_effective_config(cfg: &Config) -> Result<()> {
    if let Some(format) = cfg.format.as_deref() {
        ensure!(
            matches!(format, "json" | "yaml"),
            "Invalid format '{}', expected 'json' or 'yaml'",
            format
        );
    }

    if let Some(keys) = cfg.netdev_keys.as_deref() {
        ensure!(
            matches!(keys, "pascal" | "kebab"),
            "Invalid netdev_keys '{}', expected 'pascal' or 'kebab'",
            keys
        );
    }

    for source in Source::ALL {
        if let Some(path) = cfg.sources.get(source) {
            ensure!(
                !path.as_os_str().is_empty(),
                "Path override for {} ({}) must not be empty",
                source,
                source.env_var()
            );
        }
    }

    Ok(())
}

/// Resolves configuration from CLI args, environment, config file, and defaults.
/// This enforces precedence: CLI (if provided) > environment > config file > default.
pub fn resolve_config(args: &Args) -> Result<Config> {
    resolve_config_with_env(args, &SourcePaths::from_env())
}

/// Same as [`resolve_config`] with the environment overrides already collected.
pub fn resolve_config_with_env(args: &Args, env: &SourcePaths) -> Result<Config> {
    let mut config = if args.no_config {
        Config::default()
    } else {
        load_config(args.config.as_deref())?
    };

    // Source paths: CLI > env > file
    config.sources = args.source_overrides().or(env).or(&config.sources);

    if let Some(format) = args.format {
        config.format = Some(
            match format {
                OutputFormat::Json => "json",
                OutputFormat::Yaml => "yaml",
            }
            .to_string(),
        );
    }

    // --pretty can only switch pretty printing on
    if args.pretty {
        config.pretty = Some(true);
    }

    debug!("Effective source overrides: {:?}", config.sources);
    Ok(config)
}

/// Loads configuration from `path`, or from the first existing default location.
///
/// An explicit path that does not exist is an error; when no default location
/// exists the built-in defaults are used.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let path = match path {
        Some(p) => {
            if !p.exists() {
                bail!("Config file not found: {}", p.display());
            }
            p.to_path_buf()
        }
        None => match DEFAULT_CONFIG_PATHS
            .iter()
            .map(PathBuf::from)
            .find(|p| p.exists())
        {
            Some(p) => p,
            None => return Ok(Config::default()),
        },
    };

    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;

    match path.extension().and_then(|s| s.to_str()) {
        Some("json") => {
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Invalid JSON in {}", path.display()))?;
            info!("Loaded JSON configuration from: {}", path.display());
            Ok(config)
        }
        Some("toml") => {
            let config: Config = toml::from_str(&content)
                .with_context(|| format!("Invalid TOML in {}", path.display()))?;
            info!("Loaded TOML configuration from: {}", path.display());
            Ok(config)
        }
        _ => {
            // Default to YAML
            let config: Config = serde_yaml::from_str(&content)
                .with_context(|| format!("Invalid YAML in {}", path.display()))?;
            info!("Loaded YAML configuration from: {}", path.display());
            Ok(config)
        }
    }
}

/// Serializes configuration in the requested format.
pub fn format_config(config: &Config, format: ConfigFormat) -> Result<String> {
    let output = match format {
        ConfigFormat::Json => serde_json::to_string_pretty(config)?,
        ConfigFormat::Toml => toml::to_string_pretty(config)?,
        ConfigFormat::Yaml => serde_yaml::to_string(config)?,
    };
    Ok(output)
}

/// Shows configuration in requested format
pub fn show_config(config: &Config, format: ConfigFormat) -> Result<()> {
    println!("{}", format_config(config, format)?);
    Ok(())
}
