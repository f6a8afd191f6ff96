//! Error-log command handlers.

use tabled::Tabled;

use hot22_core::domains::error_logs::{ErrorLogResourceAction, ErrorLogsAction};
use hot22_core::{Dashboard, ErrorLog, ErrorLogFilter, ErrorLogStats, RealtimeSnapshot};

use crate::cli::{ErrorFilterArgs, ErrorsArgs, ErrorsCommand, GlobalOpts, ListArgs};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct ErrorLogRow {
    #[tabled(rename = "Upload")]
    upload_id: String,
    #[tabled(rename = "File")]
    file_name: String,
    #[tabled(rename = "Record")]
    record_type: String,
    #[tabled(rename = "Error type")]
    error_type: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Errors")]
    errors: String,
    #[tabled(rename = "Created")]
    created_at: String,
}

impl ErrorLogRow {
    fn new(log: &ErrorLog, color: bool) -> Self {
        Self {
            upload_id: log.upload_id.clone(),
            file_name: output::opt(log.file_name.as_deref()),
            record_type: output::opt(log.record_type.as_deref()),
            error_type: output::opt(log.error_type.as_deref()),
            status: log
                .status
                .as_deref()
                .map_or_else(|| "-".into(), |s| output::status(s, color)),
            errors: output::opt(log.error_count),
            created_at: output::opt(log.created_at.as_deref()),
        }
    }
}

#[derive(Tabled)]
struct CountRow {
    #[tabled(rename = "Breakdown")]
    group: String,
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Count")]
    count: u64,
}

fn log_detail(log: &ErrorLog) -> String {
    output::detail_block(&[
        ("Upload", log.upload_id.clone()),
        ("File", output::opt(log.file_name.as_deref())),
        ("Record type", output::opt(log.record_type.as_deref())),
        ("Error type", output::opt(log.error_type.as_deref())),
        ("Status", output::opt(log.status.as_deref())),
        ("Errors", output::opt(log.error_count)),
        ("Records", output::opt(log.total_records)),
        ("Created", output::opt(log.created_at.as_deref())),
    ])
}

fn stats_detail(stats: &ErrorLogStats) -> String {
    let summary = output::detail_block(&[
        ("Logs", stats.total_logs.to_string()),
        ("Errors", stats.total_errors.to_string()),
        (
            "Error rate",
            output::opt(stats.error_rate.map(|r| format!("{r:.2}%"))),
        ),
    ]);
    let rows: Vec<CountRow> = stats
        .by_record_type
        .iter()
        .map(|(k, v)| ("record type", k, *v))
        .chain(stats.by_error_type.iter().map(|(k, v)| ("error type", k, *v)))
        .map(|(group, key, count)| CountRow {
            group: group.into(),
            key: key.clone(),
            count,
        })
        .collect();
    if rows.is_empty() {
        return summary;
    }
    let table = tabled::Table::new(rows)
        .with(tabled::settings::Style::rounded())
        .to_string();
    format!("{summary}\n\n{table}")
}

fn realtime_line(snap: &RealtimeSnapshot) -> String {
    format!(
        "{}  errors/h={}  active uploads={}  recent={}",
        snap.timestamp
            .clone()
            .unwrap_or_else(|| chrono::Utc::now().to_rfc3339()),
        snap.errors_last_hour,
        snap.active_uploads,
        snap.recent_errors.len()
    )
}

// ── Filters ─────────────────────────────────────────────────────────

fn filter_changes(filters: ErrorFilterArgs) -> Result<Vec<ErrorLogFilter>, CliError> {
    let (start, end) = util::parse_range(&filters.dates)?;
    Ok(vec![
        ErrorLogFilter::RecordType(filters.record_type),
        ErrorLogFilter::ErrorType(filters.error_type),
        ErrorLogFilter::Status(filters.status),
        ErrorLogFilter::HasErrors(filters.has_errors),
        ErrorLogFilter::DateRange(start, end),
        ErrorLogFilter::Search(filters.search),
    ])
}

fn apply_filters(
    dashboard: &Dashboard,
    filters: ErrorFilterArgs,
    list: Option<&ListArgs>,
) -> Result<(), CliError> {
    let mut changes = filter_changes(filters)?;
    let actions: Vec<ErrorLogResourceAction> = match list {
        Some(list) => {
            if let Some(sort) = util::sort(list) {
                changes.push(ErrorLogFilter::Sort(sort));
            }
            util::list_actions(changes, list)
        }
        None => changes
            .into_iter()
            .map(ErrorLogResourceAction::SetFilter)
            .collect(),
    };
    for action in actions {
        dashboard
            .error_logs()
            .dispatch(ErrorLogsAction::Resource(action));
    }
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
pub async fn handle(
    dashboard: &Dashboard,
    args: ErrorsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(global.color);
    match args.command {
        ErrorsCommand::List {
            list,
            filters,
            by_type,
        } => {
            apply_filters(dashboard, filters, Some(&list))?;
            let page = match by_type {
                Some(error_type) => dashboard.load_error_logs_by_type(&error_type).await?,
                None => dashboard.load_error_logs().await?,
            };
            let out = output::render_list(
                global.output,
                &page.data,
                |l| ErrorLogRow::new(l, color),
                |l| l.upload_id.clone(),
            )?;
            output::print_output(&out, global.quiet);
            output::print_pagination(global.output, &page.pagination, global.quiet);
            Ok(())
        }

        ErrorsCommand::Get { upload_id } => {
            let log = dashboard.load_error_log(&upload_id).await?;
            let out = output::render_single(global.output, log.as_ref(), log_detail, |l| {
                l.upload_id.clone()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ErrorsCommand::Stats { filters } => {
            apply_filters(dashboard, filters, None)?;
            let stats = dashboard.load_error_log_stats().await?;
            let out = output::render_single(global.output, stats.as_ref(), stats_detail, |s| {
                s.total_errors.to_string()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ErrorsCommand::Summary => {
            let summary = dashboard.load_error_log_dashboard().await?;
            let out = output::render_single(
                global.output,
                summary.as_ref(),
                |v| serde_json::to_string_pretty(v).unwrap_or_default(),
                ToString::to_string,
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ErrorsCommand::Realtime => {
            let snap = dashboard.load_realtime().await?;
            print_snapshot(&snap, global, color)
        }

        ErrorsCommand::Monitor { interval } => {
            let interval = interval
                .as_deref()
                .map(|i| util::parse_interval("interval", i))
                .transpose()?;
            monitor(dashboard, interval, global, color).await
        }

        ErrorsCommand::Export { filters, dir } => {
            apply_filters(dashboard, filters, None)?;
            let path = dashboard.export_error_logs(dir.as_deref()).await?;
            output::print_output(&path.display().to_string(), global.quiet);
            Ok(())
        }

        ErrorsCommand::BulkDelete { upload_ids } => {
            let count = upload_ids.len();
            if !util::confirm(
                &format!("Delete {count} error log(s)? This cannot be undone."),
                "errors bulk-delete",
                global.yes,
            )? {
                return Ok(());
            }
            let result = dashboard.bulk_delete_error_logs(upload_ids).await?;
            report_operation(&result, &format!("Deleted {count} error log(s)"), global)
        }

        ErrorsCommand::BulkExport { upload_ids } => {
            let count = upload_ids.len();
            let result = dashboard.bulk_export_error_logs(upload_ids).await?;
            report_operation(&result, &format!("Export requested for {count} log(s)"), global)
        }

        ErrorsCommand::Cleanup { days } => {
            let age = days.map_or_else(
                || "older than the server default".to_owned(),
                |d| format!("older than {d} day(s)"),
            );
            if !util::confirm(
                &format!("Delete every error log {age}?"),
                "errors cleanup",
                global.yes,
            )? {
                return Ok(());
            }
            let result = dashboard.cleanup_error_logs(days).await?;
            report_operation(&result, "Cleanup finished", global)
        }
    }
}

fn print_snapshot(
    snap: &RealtimeSnapshot,
    global: &GlobalOpts,
    color: bool,
) -> Result<(), CliError> {
    let out = output::render_single(
        global.output,
        snap,
        |s| {
            let header = realtime_line(s);
            if s.recent_errors.is_empty() {
                return header;
            }
            let rows: Vec<ErrorLogRow> = s
                .recent_errors
                .iter()
                .map(|l| ErrorLogRow::new(l, color))
                .collect();
            let table = tabled::Table::new(rows)
                .with(tabled::settings::Style::rounded())
                .to_string();
            format!("{header}\n{table}")
        },
        |s| s.errors_last_hour.to_string(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

/// Run real-time mode until Ctrl-C, printing each new snapshot.
async fn monitor(
    dashboard: &Dashboard,
    interval: Option<std::time::Duration>,
    global: &GlobalOpts,
    color: bool,
) -> Result<(), CliError> {
    let mut updates = dashboard.error_logs().subscribe();
    dashboard.set_realtime(true, interval).await;
    let every = dashboard.error_logs().read(|s| s.realtime_settings.interval);
    if !global.quiet {
        eprintln!(
            "Monitoring every {} (Ctrl-C to stop)",
            humantime::format_duration(every)
        );
    }

    let mut last_seen = None;
    let mut last_error = None;
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    loop {
        tokio::select! {
            biased;
            _ = &mut ctrl_c => break,
            state = updates.changed() => {
                let Some(state) = state else { break };
                let slice = &state.realtime;
                if slice.loading {
                    continue;
                }
                if slice.error != last_error {
                    if let Some(err) = &slice.error {
                        tracing::warn!(error = %err.message, "real-time refresh failed");
                    }
                    last_error.clone_from(&slice.error);
                }
                if slice.last_updated != last_seen {
                    last_seen = slice.last_updated;
                    if let Some(snap) = &slice.data {
                        print_snapshot(snap, global, color)?;
                    }
                }
            }
        }
    }

    dashboard.set_realtime(false, None).await;
    Ok(())
}

fn report_operation(
    result: &hot22_core::OperationResult,
    fallback: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if global.output == crate::cli::OutputFormat::Table {
        if !global.quiet {
            eprintln!("{}", result.message.as_deref().unwrap_or(fallback));
        }
        return Ok(());
    }
    let out = output::render_single(
        global.output,
        result,
        |_| String::new(),
        |r| output::opt(r.affected),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
