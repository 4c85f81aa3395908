//! Command handlers and dispatch.

pub mod config_cmd;
pub mod health;
pub mod nodes;
pub mod stats;

use nodewatch_config::Config;

use crate::cli::{Command, GlobalOpts, OutputFormat};
use crate::config;
use crate::error::CliError;
use crate::output::Painter;

/// Everything a handler needs besides its own arguments.
#[derive(Debug)]
pub struct Context {
    pub cfg: Config,
    pub output: OutputFormat,
    pub painter: Painter,
    pub quiet: bool,
}

impl Context {
    pub fn new(cfg: Config, global: &GlobalOpts) -> Self {
        Self {
            output: config::output_format(&cfg, global),
            painter: Painter::new(config::color_mode(&cfg, global)),
            quiet: global.quiet,
            cfg,
        }
    }
}

/// Route a backend-facing command to its handler.
pub async fn dispatch(cmd: Command, ctx: &Context) -> Result<(), CliError> {
    match cmd {
        Command::Nodes(args) => nodes::handle(args, ctx).await,
        Command::Health => health::handle(ctx).await,
        Command::Stats => stats::handle(ctx).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
