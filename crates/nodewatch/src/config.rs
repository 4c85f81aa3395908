//! CLI-side configuration: layers global flags over the shared config.
//!
//! Precedence is flag > `NODEWATCH_*` env > config file > default. Core
//! never sees these types; it receives a pre-built `ClientConfig`.

use std::path::PathBuf;
use std::time::Duration;

use clap::ValueEnum;

use nodewatch_config::Config;
use nodewatch_core::ClientConfig;

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;

/// The config file this invocation reads and writes.
pub fn config_path(global: &GlobalOpts) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(nodewatch_config::config_path)
}

/// Load the config file (plus env) and apply flag overrides.
pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    let mut cfg = nodewatch_config::load_config_from(&config_path(global))?;

    if let Some(ref url) = global.api_url {
        cfg.set("api_url", url)?;
    }
    if let Some(timeout) = global.timeout {
        cfg.timeout_secs = timeout;
    }
    if global.insecure {
        cfg.insecure = true;
    }
    Ok(cfg)
}

/// Build the core client config, with an optional refresh override.
pub fn client_config(cfg: &Config, refresh_secs: Option<u64>) -> Result<ClientConfig, CliError> {
    let mut client = cfg.to_client_config()?;
    if let Some(secs) = refresh_secs {
        client.refresh_interval = Duration::from_secs(secs);
    }
    Ok(client)
}

/// Effective output format: flag, else config, else table.
pub fn output_format(cfg: &Config, global: &GlobalOpts) -> OutputFormat {
    global
        .output
        .or_else(|| OutputFormat::from_str(&cfg.output, true).ok())
        .unwrap_or(OutputFormat::Table)
}

/// Effective color mode: flag, else config, else auto.
pub fn color_mode(cfg: &Config, global: &GlobalOpts) -> ColorMode {
    global
        .color
        .or_else(|| ColorMode::from_str(&cfg.color, true).ok())
        .unwrap_or(ColorMode::Auto)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["nodewatch"];
        argv.extend_from_slice(args);
        argv.push("health");
        Cli::try_parse_from(argv).unwrap().global
    }

    #[test]
    fn flags_beat_config_values() {
        let cfg = Config {
            output: "yaml".into(),
            color: "never".into(),
            ..Config::default()
        };
        assert_eq!(output_format(&cfg, &global(&[])), OutputFormat::Yaml);
        assert_eq!(
            output_format(&cfg, &global(&["-o", "json"])),
            OutputFormat::Json
        );
        assert_eq!(color_mode(&cfg, &global(&[])), ColorMode::Never);
    }

    #[test]
    fn unknown_config_format_falls_back_to_table() {
        let cfg = Config {
            output: "xml".into(),
            ..Config::default()
        };
        assert_eq!(output_format(&cfg, &global(&[])), OutputFormat::Table);
        assert_eq!(
            output_format(
                &Config {
                    output: "json-compact".into(),
                    ..Config::default()
                },
                &global(&[])
            ),
            OutputFormat::JsonCompact
        );
    }

    #[test]
    fn refresh_override_replaces_config_interval() {
        let client = client_config(&Config::default(), Some(3)).unwrap();
        assert_eq!(client.refresh_interval, Duration::from_secs(3));
        let client = client_config(&Config::default(), None).unwrap();
        assert_eq!(client.refresh_interval, Duration::from_millis(7000));
    }
}
