//! Clap derive structures for the `nodewatch` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use nodewatch_core::{NodeStatus, SortField, SortOrder};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// nodewatch -- terminal dashboard for storage-node networks
#[derive(Debug, Parser)]
#[command(
    name = "nodewatch",
    version,
    about = "Inspect a storage-node network from the command line",
    long_about = "Lists, filters and watches the nodes reported by a dashboard backend.\n\n\
        Duplicate listings of the same node (one per address it was seen at)\n\
        are merged into a single record before display.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config file to use instead of the default location
    #[arg(long, env = "NODEWATCH_CONFIG", global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Dashboard backend URL (overrides config)
    #[arg(long, short = 'u', global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Output format [default: table]
    #[arg(long, short = 'o', global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output [default: auto]
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List, inspect and watch storage nodes
    #[command(alias = "n")]
    Nodes(NodesArgs),

    /// Check backend health and version
    Health,

    /// Show network-wide health and storage capacity
    Stats,

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  NODES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct NodesArgs {
    #[command(subcommand)]
    pub command: NodesCommand,
}

#[derive(Debug, Subcommand)]
pub enum NodesCommand {
    /// List one page of nodes
    #[command(alias = "ls")]
    List(NodeListArgs),

    /// Show a single node
    Get {
        /// Node public key
        pubkey: String,
    },

    /// Re-render the node list every time it refreshes (Ctrl-C to stop)
    Watch(WatchArgs),
}

/// Paging, filtering and sorting shared by `list` and `watch`.
#[derive(Debug, Clone, Args)]
pub struct NodeListArgs {
    /// Page number (1-based)
    #[arg(long, short = 'P', default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
    pub page: u32,

    /// Nodes per page (overrides config)
    #[arg(long, short = 'l', value_parser = clap::value_parser!(u32).range(1..))]
    pub limit: Option<u32>,

    /// Only nodes with this status
    #[arg(long, short = 's', value_parser = parse_status)]
    pub status: Option<NodeStatus>,

    /// Sort field (storage, uptime, latency, score, credits, performance)
    #[arg(long, value_parser = parse_sort)]
    pub sort: Option<SortField>,

    /// Sort order (asc, desc)
    #[arg(long, value_parser = parse_order)]
    pub order: Option<SortOrder>,

    /// Leave offline nodes out of the listing
    #[arg(long)]
    pub exclude_offline: bool,
}

#[derive(Debug, Args)]
pub struct WatchArgs {
    #[command(flatten)]
    pub list: NodeListArgs,

    /// Refresh period in seconds (overrides config)
    #[arg(long, short = 'i', value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: Option<u64>,
}

fn parse_status(s: &str) -> Result<NodeStatus, String> {
    match s.parse::<NodeStatus>() {
        Ok(NodeStatus::Unknown) | Err(_) => Err(format!(
            "expected one of: active, inactive, syncing, online, offline, delinquent, warning (got '{s}')"
        )),
        Ok(status) => Ok(status),
    }
}

fn parse_sort(s: &str) -> Result<SortField, String> {
    s.parse().map_err(|_| {
        format!("expected one of: storage, uptime, latency, score, credits, performance (got '{s}')")
    })
}

fn parse_order(s: &str) -> Result<SortOrder, String> {
    s.parse()
        .map_err(|_| format!("expected asc or desc (got '{s}')"))
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,

    /// Print the config file path
    Path,

    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Set a single configuration value
    Set {
        /// Config key (e.g. api_url, page_limit, refresh_interval_ms)
        key: String,

        /// New value
        value: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
