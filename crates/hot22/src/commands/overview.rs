//! Health check and the overview dashboard.

use serde::Serialize;
use tabled::Tabled;

use hot22_core::{CollectionsReport, Dashboard, ErrorLogStats, HealthStatus};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct CollectionRow {
    #[tabled(rename = "Collection")]
    name: String,
    #[tabled(rename = "Documents")]
    count: u64,
    #[tabled(rename = "Status")]
    status: String,
}

#[derive(Serialize)]
struct Overview {
    stats: Option<ErrorLogStats>,
    health: Option<HealthStatus>,
    collections: Option<CollectionsReport>,
}

fn health_lines(health: &HealthStatus, color: bool) -> Vec<(&'static str, String)> {
    vec![
        ("Status", output::status(&health.status, color)),
        (
            "Uptime",
            output::opt(health.uptime.map(|secs| {
                // whole seconds are enough here
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::as_conversions)]
                let secs = secs.max(0.0) as u64;
                humantime::format_duration(std::time::Duration::from_secs(secs)).to_string()
            })),
        ),
        ("Database", output::opt(health.database.as_deref())),
        ("Checked", output::opt(health.timestamp.as_deref())),
    ]
}

pub async fn health(dashboard: &Dashboard, global: &GlobalOpts) -> Result<(), CliError> {
    let color = output::should_color(global.color);
    let health = dashboard.load_health().await?;
    let out = output::render_single(
        global.output,
        health.as_ref(),
        |h| output::detail_block(&health_lines(h, color)),
        |h| h.status.clone(),
    )?;
    output::print_output(&out, global.quiet);
    if health.is_healthy() {
        Ok(())
    } else {
        Err(CliError::Unhealthy {
            status: health.status.clone(),
        })
    }
}

fn overview_detail(overview: &Overview, color: bool) -> String {
    let mut sections = Vec::new();
    if let Some(health) = &overview.health {
        sections.push(output::detail_block(&health_lines(health, color)));
    }
    if let Some(stats) = &overview.stats {
        sections.push(output::detail_block(&[
            ("Error logs", stats.total_logs.to_string()),
            ("Errors", stats.total_errors.to_string()),
            (
                "Error rate",
                output::opt(stats.error_rate.map(|r| format!("{r:.2}%"))),
            ),
        ]));
    }
    if let Some(report) = &overview.collections {
        let rows: Vec<CollectionRow> = report
            .collections
            .iter()
            .map(|c| CollectionRow {
                name: c.name.clone(),
                count: c.count,
                status: c
                    .status
                    .as_deref()
                    .map_or_else(|| "-".into(), |s| output::status(s, color)),
            })
            .collect();
        if !rows.is_empty() {
            sections.push(
                tabled::Table::new(rows)
                    .with(tabled::settings::Style::rounded())
                    .to_string(),
            );
        }
    }
    sections.join("\n\n")
}

/// Print every section that loaded, then surface the first failure.
pub async fn handle(dashboard: &Dashboard, global: &GlobalOpts) -> Result<(), CliError> {
    let color = output::should_color(global.color);
    let outcome = dashboard.load_overview().await;
    let overview = dashboard.overview().read(|s| Overview {
        stats: s.stats.data.clone(),
        health: s.health.data.clone(),
        collections: s.collections.data.clone(),
    });
    let out = output::render_single(
        global.output,
        &overview,
        |o| overview_detail(o, color),
        |o| {
            o.health
                .as_ref()
                .map_or_else(|| "unknown".into(), |h| h.status.clone())
        },
    )?;
    output::print_output(&out, global.quiet);
    outcome.map_err(CliError::from)
}
