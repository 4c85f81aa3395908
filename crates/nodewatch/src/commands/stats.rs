//! Network statistics handler.

use serde::Serialize;

use nodewatch_core::{CoreError, NetworkStats};

use super::Context;
use crate::config;
use crate::error::CliError;
use crate::fmt;
use crate::output::{self, Painter};

#[derive(Debug, Serialize)]
struct StatsReport {
    network_health: f64,
    online_nodes: u64,
    total_nodes: u64,
    used_storage_bytes: f64,
    total_storage_bytes: f64,
    total_pods: Option<u64>,
    average_uptime_secs: Option<f64>,
}

impl From<NetworkStats> for StatsReport {
    fn from(s: NetworkStats) -> Self {
        Self {
            average_uptime_secs: s
                .extra
                .get("average_uptime_seconds")
                .and_then(serde_json::Value::as_f64),
            network_health: s.network_health,
            online_nodes: s.online_nodes,
            total_nodes: s.total_nodes,
            used_storage_bytes: s.used_storage_bytes,
            total_storage_bytes: s.total_storage_bytes,
            total_pods: s.total_pods,
        }
    }
}

fn detail(r: &StatsReport, painter: Painter) -> String {
    [
        painter.heading("Network"),
        format!("Health:   {:.1}%", r.network_health),
        format!("Nodes:    {} / {} online", r.online_nodes, r.total_nodes),
        format!(
            "Storage:  {}",
            fmt::storage_usage(Some(r.used_storage_bytes), Some(r.total_storage_bytes))
        ),
        format!("Pods:     {}", fmt::optional(r.total_pods, |p| format!("{p}"))),
        format!(
            "Uptime:   {}",
            fmt::optional(r.average_uptime_secs, fmt::duration_secs)
        ),
    ]
    .join("\n")
}

pub async fn handle(ctx: &Context) -> Result<(), CliError> {
    let client = config::client_config(&ctx.cfg, None)?.build_client()?;
    let report = StatsReport::from(client.network_stats().await.map_err(CoreError::from)?);

    let out = output::render_single(
        ctx.output,
        &report,
        |r| detail(r, ctx.painter),
        |r| format!("{:.1}", r.network_health),
    );
    output::print_output(&out, ctx.quiet);
    Ok(())
}
