//! Backend health handler.

use serde::Serialize;
use tracing::debug;

use nodewatch_core::CoreError;

use super::Context;
use crate::config;
use crate::error::CliError;
use crate::fmt;
use crate::output::{self, Painter};

#[derive(Debug, Serialize)]
struct HealthReport {
    api_url: String,
    health: String,
    status: Option<String>,
    version: Option<String>,
    uptime_secs: Option<f64>,
}

fn detail(r: &HealthReport, painter: Painter) -> String {
    [
        painter.heading("Backend"),
        format!("URL:      {}", r.api_url),
        format!("Health:   {}", r.health),
        format!("Status:   {}", r.status.as_deref().unwrap_or("-")),
        format!("Version:  {}", r.version.as_deref().unwrap_or("-")),
        format!("Uptime:   {}", fmt::optional(r.uptime_secs, fmt::duration_secs)),
    ]
    .join("\n")
}

pub async fn handle(ctx: &Context) -> Result<(), CliError> {
    let client = config::client_config(&ctx.cfg, None)?.build_client()?;

    let (health, status) = tokio::join!(client.health(), client.backend_status());
    let health = health.map_err(CoreError::from)?;

    // Older backends only expose /health.
    let status = match status {
        Ok(status) => Some(status),
        Err(e) => {
            debug!(error = %e, "backend status unavailable");
            None
        }
    };

    let report = HealthReport {
        api_url: client.base_url().to_string(),
        health: health.status,
        status: status.as_ref().map(|s| s.status.clone()),
        version: status.as_ref().and_then(|s| s.version.clone()),
        uptime_secs: status.as_ref().and_then(|s| s.uptime),
    };

    let out = output::render_single(
        ctx.output,
        &report,
        |r| detail(r, ctx.painter),
        |r| r.health.clone(),
    );
    output::print_output(&out, ctx.quiet);
    Ok(())
}
