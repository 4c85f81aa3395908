//! Config subcommand handlers.

use nodewatch_config::Config;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

fn detail(cfg: &Config) -> String {
    [
        format!("api_url             = {}", cfg.api_url),
        format!("network             = {}", cfg.network),
        format!("auto_refresh        = {}", cfg.auto_refresh),
        format!("refresh_interval_ms = {}", cfg.refresh_interval_ms),
        format!("timeout_secs        = {}", cfg.timeout_secs),
        format!("page_limit          = {}", cfg.page_limit),
        format!("output              = {}", cfg.output),
        format!("color               = {}", cfg.color),
        format!("insecure            = {}", cfg.insecure),
    ]
    .join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let path = config::config_path(global);

    match args.command {
        // ── Show: effective values, flags and env included ──────────
        ConfigCommand::Show => {
            let cfg = config::load(global)?;
            let format = config::output_format(&cfg, global);
            let out = output::render_single(format, &cfg, detail, |c| c.api_url.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&path.display().to_string(), global.quiet);
            Ok(())
        }

        // ── Init: write defaults ────────────────────────────────────
        ConfigCommand::Init { force } => {
            if path.exists() && !force {
                return Err(CliError::ConfigExists {
                    path: path.display().to_string(),
                });
            }
            nodewatch_config::save_config_to(&Config::default(), &path)?;
            if !global.quiet {
                eprintln!("Configuration written to {}", path.display());
            }
            Ok(())
        }

        // ── Set: file values only, env never leaks in ───────────────
        ConfigCommand::Set { key, value } => {
            let mut cfg = nodewatch_config::load_config_file(&path)?;
            cfg.set(&key, &value)?;
            nodewatch_config::save_config_to(&cfg, &path)?;
            if !global.quiet {
                eprintln!("Set {key} = {value} in {}", path.display());
            }
            Ok(())
        }
    }
}
