//! Config command implementation.
//!
//! Generates configuration files in various formats.

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

use crate::cli::ConfigFormat;
use crate::config::{format_config, Config};

/// Generates configuration files.
pub fn command_config(
    output: Option<PathBuf>,
    format: ConfigFormat,
    commented: bool,
) -> Result<()> {
    let output = output.unwrap_or_else(|| match format {
        ConfigFormat::Yaml => PathBuf::from("proc-parse.yaml"),
        ConfigFormat::Json => PathBuf::from("proc-parse.json"),
        ConfigFormat::Toml => PathBuf::from("proc-parse.toml"),
    });

    let content = render_template(format, commented)?;

    if output.to_string_lossy() == "-" {
        print!("{}", content);
    } else {
        fs::write(&output, content)
            .with_context(|| format!("Failed to write {}", output.display()))?;
        println!("✅ Configuration written to: {}", output.display());
    }

    Ok(())
}

/// Default configuration in `format`, optionally with a YAML comment header.
pub fn render_template(format: ConfigFormat, commented: bool) -> Result<String> {
    let mut content = format_config(&Config::default(), format)?;
    if commented && matches!(format, ConfigFormat::Yaml) {
        content = add_config_comments(content);
    }
    Ok(content)
}

/// Adds comments to YAML configuration.
fn add_config_comments(yaml: String) -> String {
    let comments = r#"# proc-parse Configuration
# ========================
#
# Output
# ------
# format: "json"               # json or yaml
# pretty: false                # Pretty-print JSON
# netdev_keys: "pascal"        # Raw /proc/net/dev keys: pascal (ReceiveBytes) or kebab (receive-bytes)
#
# Source Paths
# ------------
# Unset entries use the kernel default. Environment variables override
# this file, CLI flags override both.
#
# sources:
#   pid_stat: /proc/self/stat          # PROC_PID_STAT, replaces /proc/<pid>/stat
#   meminfo: /proc/meminfo             # PROC_MEMINFO
#   net_dev: /proc/net/dev             # PROC_NET_DEV
#   net_snmp: /proc/net/snmp           # PROC_NET_SNMP
#   net_netstat: /proc/net/netstat     # PROC_NET_NETSTAT
"#;

    format!("{comments}\n{yaml}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config;
    use tempfile::tempdir;

    #[test]
    fn test_written_templates_load_back() {
        let dir = tempdir().unwrap();
        for (format, name) in [
            (ConfigFormat::Yaml, "proc-parse.yaml"),
            (ConfigFormat::Json, "proc-parse.json"),
            (ConfigFormat::Toml, "proc-parse.toml"),
        ] {
            let path = dir.path().join(name);
            command_config(Some(path.clone()), format, true).unwrap();
            let loaded = load_config(Some(&path)).unwrap();
            assert_eq!(loaded, Config::default());
        }
    }

    #[test]
    fn test_comments_only_on_yaml() {
        let yaml = render_template(ConfigFormat::Yaml, true).unwrap();
        assert!(yaml.starts_with("# proc-parse Configuration"));

        let json = render_template(ConfigFormat::Json, true).unwrap();
        assert!(json.starts_with('{'));
    }
}
