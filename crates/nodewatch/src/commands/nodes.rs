//! Node command handlers: list, get, watch.

use std::io::{self, IsTerminal, Write};
use std::time::Duration;

use chrono::{DateTime, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use tabled::Tabled;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use nodewatch_config::Network;
use nodewatch_core::{
    ClientConfig, NodeFetcher, NodeQuery, NodeRecord, QueryUpdate, RefreshOutcome,
    RegistrySnapshot, RegistryStore, lookup_node,
};

use super::Context;
use crate::cli::{NodeListArgs, NodesArgs, NodesCommand, OutputFormat, WatchArgs};
use crate::config;
use crate::error::CliError;
use crate::fmt;
use crate::output::{self, Painter};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct NodeRow {
    #[tabled(rename = "Pubkey")]
    pubkey: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "Storage")]
    storage: String,
    #[tabled(rename = "Uptime")]
    uptime: String,
    #[tabled(rename = "Latency")]
    latency: String,
    #[tabled(rename = "Credits")]
    credits: String,
    #[tabled(rename = "Version")]
    version: String,
    #[tabled(rename = "Last Seen")]
    last_seen: String,
}

impl NodeRow {
    fn new(r: &NodeRecord, network: Network, now: DateTime<Utc>) -> Self {
        let t = &r.telemetry;
        Self {
            pubkey: fmt::truncate_pubkey(&r.pubkey),
            status: r.status.to_string(),
            address: address_summary(r),
            storage: fmt::storage_usage(t.storage_used_bytes(), t.storage_capacity_bytes()),
            uptime: fmt::optional(t.uptime_percentage(), fmt::uptime),
            latency: fmt::optional(t.latency_ms(), fmt::latency),
            credits: fmt::optional(credits(r, network), |c| format!("{c:.0}")),
            version: t.version().unwrap_or("-").to_owned(),
            last_seen: fmt::last_seen(r.last_seen, now),
        }
    }
}

/// Primary address, with a count of the others.
fn address_summary(r: &NodeRecord) -> String {
    match r.addresses.as_slice() {
        [] => "-".into(),
        [only] => only.clone(),
        [first, rest @ ..] => format!("{first} (+{})", rest.len()),
    }
}

/// Credits for the configured network, falling back to the plain field.
fn credits(r: &NodeRecord, network: Network) -> Option<f64> {
    r.telemetry
        .number(&format!("{network}_credits"))
        .or_else(|| r.telemetry.credits())
}

fn detail(r: &NodeRecord, painter: Painter, network: Network, now: DateTime<Utc>) -> String {
    let t = &r.telemetry;
    let mut lines = vec![
        format!("Pubkey:    {}", r.pubkey),
        format!("Name:      {}", t.name().unwrap_or("-")),
        format!("Status:    {}", painter.status(r.status)),
        format!("Version:   {}", t.version().unwrap_or("-")),
        format!(
            "Storage:   {}",
            fmt::storage_usage(t.storage_used_bytes(), t.storage_capacity_bytes())
        ),
        format!("Uptime:    {}", fmt::optional(t.uptime_percentage(), fmt::uptime)),
        format!("Latency:   {}", fmt::optional(t.latency_ms(), fmt::latency)),
        format!(
            "Credits:   {}",
            fmt::optional(credits(r, network), |c| format!("{c:.0}"))
        ),
        format!(
            "Score:     {}",
            fmt::optional(t.performance_score(), |s| format!("{s:.2}"))
        ),
        format!("Last seen: {}", fmt::last_seen(r.last_seen, now)),
    ];

    if r.addresses.is_empty() {
        lines.push("Addresses: -".into());
    } else {
        lines.push("Addresses:".into());
        lines.extend(r.addresses.iter().map(|a| format!("  {a}")));
    }
    lines.join("\n")
}

// ── Query building ──────────────────────────────────────────────────

fn filter_update(args: &NodeListArgs) -> QueryUpdate {
    let update = QueryUpdate::new()
        .status(args.status)
        .sort(args.sort)
        .order(args.order)
        .include_offline(!args.exclude_offline);
    match args.limit {
        Some(limit) => update.limit(limit),
        None => update,
    }
}

/// The query a `list` or `watch` starts from: configured page size, the
/// requested filters, then the requested page.
fn list_query(client: &ClientConfig, args: &NodeListArgs) -> NodeQuery {
    let mut query = client.initial_query();
    filter_update(args).apply_to(&mut query);
    query.page = args.page;
    query
}

// ── Rendering ───────────────────────────────────────────────────────

fn render_records(snap: &RegistrySnapshot, ctx: &Context, now: DateTime<Utc>) -> String {
    let network = ctx.cfg.network;
    let mut out = output::render_list(
        ctx.output,
        &snap.records[..],
        |r| NodeRow::new(r, network, now),
        |r| r.pubkey.clone(),
    );
    if ctx.output == OutputFormat::Table {
        if let Some(footer) = footer(snap) {
            out.push('\n');
            out.push_str(&ctx.painter.dim(&footer));
        }
    }
    out
}

fn footer(snap: &RegistrySnapshot) -> Option<String> {
    let p = snap.pagination.as_ref()?;
    let mut footer = format!(
        "Page {} of {} · {} nodes",
        p.page,
        p.total_pages.max(1),
        p.total_items
    );
    if p.has_previous() {
        footer.push_str(&format!(" · prev: --page {}", p.page - 1));
    }
    if p.has_next() {
        footer.push_str(&format!(" · next: --page {}", p.page + 1));
    }
    Some(footer)
}

fn spinner(ctx: &Context) -> ProgressBar {
    if ctx.quiet || ctx.output != OutputFormat::Table {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        bar.set_style(style);
    }
    bar.set_message("Fetching nodes...");
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn handle(args: NodesArgs, ctx: &Context) -> Result<(), CliError> {
    match args.command {
        NodesCommand::List(list) => list_nodes(&list, ctx).await,
        NodesCommand::Get { pubkey } => get_node(&pubkey, ctx).await,
        NodesCommand::Watch(watch) => watch_nodes(&watch, ctx).await,
    }
}

async fn list_nodes(args: &NodeListArgs, ctx: &Context) -> Result<(), CliError> {
    let client_cfg = config::client_config(&ctx.cfg, None)?;
    let store = RegistryStore::with_query(client_cfg.build_client()?, list_query(&client_cfg, args));

    let bar = spinner(ctx);
    let outcome = store.fetch().await;
    bar.finish_and_clear();

    match outcome {
        RefreshOutcome::Published => {}
        RefreshOutcome::Failed(err) => return Err(err.into()),
        // Nothing else issues fetches on this store.
        RefreshOutcome::Superseded => debug!("list fetch superseded"),
    }

    let out = render_records(&store.snapshot(), ctx, Utc::now());
    output::print_output(&out, ctx.quiet);
    Ok(())
}

async fn get_node(pubkey: &str, ctx: &Context) -> Result<(), CliError> {
    let client = config::client_config(&ctx.cfg, None)?.build_client()?;
    let record = lookup_node(&client, pubkey).await?;

    let now = Utc::now();
    let network = ctx.cfg.network;
    let out = output::render_single(
        ctx.output,
        &record,
        |r| detail(r, ctx.painter, network, now),
        |r| r.pubkey.clone(),
    );
    output::print_output(&out, ctx.quiet);
    Ok(())
}

async fn watch_nodes(args: &WatchArgs, ctx: &Context) -> Result<(), CliError> {
    let client_cfg = config::client_config(&ctx.cfg, args.interval)?;
    let store = RegistryStore::with_query(
        client_cfg.build_client()?,
        list_query(&client_cfg, &args.list),
    );

    let first = store.fetch().await;

    let cancel = CancellationToken::new();
    let Some(refresher) = store.spawn_auto_refresh(client_cfg.refresh_interval, cancel) else {
        // No refresher will retry; a failed first fetch is the result
        if let RefreshOutcome::Failed(err) = first {
            return Err(err.into());
        }
        draw(&store.snapshot(), ctx);
        eprintln!(
            "{}",
            ctx.painter
                .dim("Auto-refresh is off; set auto_refresh = true or pass --interval.")
        );
        return Ok(());
    };

    draw(&store.snapshot(), ctx);
    watch_loop(&store, ctx).await;
    refresher.stop().await;
    Ok(())
}

/// Redraw on every settled snapshot until Ctrl-C.
async fn watch_loop<F: NodeFetcher>(store: &RegistryStore<F>, ctx: &Context) {
    let mut sub = store.subscribe();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => break,
            snap = sub.changed() => match snap {
                Some(snap) if snap.loading => {}
                Some(snap) => draw(&snap, ctx),
                None => break,
            },
        }
    }
    debug!("watch stopped");
}

fn draw(snap: &RegistrySnapshot, ctx: &Context) {
    if ctx.output == OutputFormat::Table && io::stdout().is_terminal() {
        let mut stdout = io::stdout().lock();
        let _ = write!(stdout, "\x1b[2J\x1b[H");
        let _ = stdout.flush();
    }

    if let Some(ref error) = snap.error {
        eprintln!("{}", ctx.painter.error(&format!("Error: {error}")));
        return;
    }

    let now = Utc::now();
    let mut out = render_records(snap, ctx, now);
    if ctx.output == OutputFormat::Table {
        if let Some(at) = snap.last_updated {
            out.push('\n');
            out.push_str(&ctx.painter.dim(&format!(
                "Updated {} · Ctrl-C to stop",
                fmt::relative_time(at, now)
            )));
        }
    }
    output::print_output(&out, ctx.quiet);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::Parser;
    use nodewatch_core::{NodeObservation, NodeStatus, Pagination, SortField};

    use super::*;
    use crate::cli::{Cli, Command};

    fn list_args(argv: &[&str]) -> NodeListArgs {
        let mut full = vec!["nodewatch", "nodes", "list"];
        full.extend_from_slice(argv);
        match Cli::try_parse_from(full).unwrap().command {
            Command::Nodes(NodesArgs {
                command: NodesCommand::List(list),
            }) => list,
            other => panic!("unexpected command: {other:?}"),
        }
    }

    fn client() -> ClientConfig {
        let mut cfg = ClientConfig::new("http://127.0.0.1:8000".parse().unwrap());
        cfg.page_limit = 25;
        cfg
    }

    #[test]
    fn list_query_keeps_requested_page_and_config_limit() {
        let query = list_query(
            &client(),
            &list_args(&["--page", "3", "--status", "online", "--sort", "uptime"]),
        );
        assert_eq!(query.page, 3);
        assert_eq!(query.limit, 25);
        assert_eq!(query.status, Some(NodeStatus::Online));
        assert_eq!(query.sort, Some(SortField::Uptime));
        assert!(query.include_offline);
    }

    #[test]
    fn limit_flag_and_exclude_offline_override_defaults() {
        let query = list_query(&client(), &list_args(&["-l", "10", "--exclude-offline"]));
        assert_eq!(query.page, 1);
        assert_eq!(query.limit, 10);
        assert!(!query.include_offline);
    }

    #[test]
    fn address_summary_counts_extra_addresses() {
        let mut record = NodeRecord::from(
            NodeObservation::new("A", NodeStatus::Online).with_address("1.1.1.1:9001"),
        );
        assert_eq!(address_summary(&record), "1.1.1.1:9001");
        record.addresses.push("2.2.2.2:9001".into());
        record.addresses.push("3.3.3.3:9001".into());
        assert_eq!(address_summary(&record), "1.1.1.1:9001 (+2)");
        record.addresses.clear();
        assert_eq!(address_summary(&record), "-");
    }

    #[test]
    fn credits_prefer_network_specific_field() {
        let record = NodeRecord::from(
            NodeObservation::new("A", NodeStatus::Online)
                .with_field("credits", 5)
                .with_field("devnet_credits", 12),
        );
        assert_eq!(credits(&record, Network::Devnet), Some(12.0));
        assert_eq!(credits(&record, Network::Mainnet), Some(5.0));
    }

    #[test]
    fn footer_points_at_neighbour_pages() {
        let mut snap = RegistrySnapshot {
            loading: false,
            error: None,
            last_updated: None,
            records: Vec::<NodeRecord>::new().into(),
            pagination: Some(Pagination {
                total_items: 120,
                total_pages: 3,
                page: 2,
                limit: 50,
            }),
            query: NodeQuery::default(),
        };
        assert_eq!(
            footer(&snap).unwrap(),
            "Page 2 of 3 · 120 nodes · prev: --page 1 · next: --page 3"
        );
        snap.pagination = Some(Pagination {
            page: 1,
            ..snap.pagination.unwrap()
        });
        assert_eq!(footer(&snap).unwrap(), "Page 1 of 3 · 120 nodes · next: --page 3");
        snap.pagination = None;
        assert!(footer(&snap).is_none());
    }

    #[test]
    fn detail_lists_every_address() {
        let mut record = NodeRecord::from(
            NodeObservation::new("A", NodeStatus::Offline)
                .with_address("1.1.1.1:9001")
                .with_field("version", "0.7.3"),
        );
        record.addresses.push("2.2.2.2:9001".into());
        let painter = Painter::new(crate::cli::ColorMode::Never);
        let out = detail(&record, painter, Network::Mainnet, Utc::now());
        assert!(out.contains("Status:    offline"));
        assert!(out.contains("Version:   0.7.3"));
        assert!(out.contains("  1.1.1.1:9001\n  2.2.2.2:9001"));
        assert!(out.contains("Last seen: never"));
    }
}
