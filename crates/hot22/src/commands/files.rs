//! HOT22 file and processed-record command handlers.

use std::path::Path;
use std::sync::Arc;

use bytesize::ByteSize;
use indicatif::{ProgressBar, ProgressStyle};
use tabled::Tabled;

use hot22_core::query::endpoints::ProgressFn;
use hot22_core::{Dashboard, FileStats, UploadResult};

use crate::cli::{FilesArgs, FilesCommand, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Rendering ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct RecordTypeRow {
    #[tabled(rename = "Record type")]
    record_type: String,
    #[tabled(rename = "Records")]
    count: u64,
}

fn stats_detail(stats: &FileStats) -> String {
    let summary = output::detail_block(&[
        ("Records", stats.total_records.to_string()),
        ("Last upload", output::opt(stats.last_upload.as_deref())),
    ]);
    if stats.by_record_type.is_empty() {
        return summary;
    }
    let rows: Vec<RecordTypeRow> = stats
        .by_record_type
        .iter()
        .map(|(k, v)| RecordTypeRow {
            record_type: k.clone(),
            count: *v,
        })
        .collect();
    let table = tabled::Table::new(rows)
        .with(tabled::settings::Style::rounded())
        .to_string();
    format!("{summary}\n\n{table}")
}

fn upload_detail(result: &UploadResult) -> String {
    output::detail_block(&[
        ("Upload", output::opt(result.upload_id.as_deref())),
        ("File", output::opt(result.file_name.as_deref())),
        ("Records", output::opt(result.total_records)),
        ("Processed", output::opt(result.processed_records)),
        ("Errors", output::opt(result.error_count)),
        ("Message", output::opt(result.message.as_deref())),
    ])
}

/// Best identifier a processed record carries.
fn record_id(record: &serde_json::Value) -> String {
    ["_id", "id", "TRNN", "uploadId"]
        .iter()
        .find_map(|k| record.get(k))
        .map_or_else(
            || record.to_string(),
            |v| v.as_str().map_or_else(|| v.to_string(), str::to_owned),
        )
}

fn progress_bar(file: &Path, global: &GlobalOpts) -> ProgressBar {
    if global.quiet || global.output != OutputFormat::Table {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(100);
    let style = ProgressStyle::with_template("{msg} [{bar:40.cyan/blue}] {pos:>3}%")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ");
    bar.set_style(style);
    let size = std::fs::metadata(file).map(|m| m.len()).unwrap_or(0);
    bar.set_message(format!(
        "{} ({})",
        file.file_name()
            .map_or_else(|| file.display().to_string(), |n| n.to_string_lossy().into_owned()),
        ByteSize::b(size)
    ));
    bar
}

// ── Handler ─────────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
pub async fn handle(
    dashboard: &Dashboard,
    args: FilesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        FilesCommand::Upload { path } => {
            if !path.is_file() {
                return Err(CliError::Validation {
                    field: "path".into(),
                    reason: format!("{} is not a readable file", path.display()),
                });
            }
            let bar = progress_bar(&path, global);
            let sink_bar = bar.clone();
            let on_progress: ProgressFn = Arc::new(move |pct| sink_bar.set_position(u64::from(pct)));

            let result = dashboard.upload_hot22(&path, Some(on_progress)).await;
            match &result {
                Ok(_) => bar.finish(),
                Err(_) => bar.abandon(),
            }
            let result = result?;
            let out = output::render_single(global.output, &result, upload_detail, |r| {
                output::opt(r.upload_id.as_deref())
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        FilesCommand::Stats { watch: None } => {
            let stats = dashboard.load_file_stats().await?;
            print_stats(&stats, global)
        }

        FilesCommand::Stats {
            watch: Some(interval),
        } => {
            let interval = util::parse_interval("watch", &interval)?;
            let mut sub = dashboard.watch_file_stats(interval).await?;
            if let Some(stats) = sub.current() {
                print_stats(&stats, global)?;
            }
            let ctrl_c = tokio::signal::ctrl_c();
            tokio::pin!(ctrl_c);
            loop {
                tokio::select! {
                    biased;
                    _ = &mut ctrl_c => break,
                    alive = sub.changed() => {
                        if !alive {
                            break;
                        }
                        if let Some(err) = sub.error() {
                            tracing::warn!(error = %err.message, "stats refresh failed");
                        } else if let Some(stats) = sub.current() {
                            print_stats(&stats, global)?;
                        }
                    }
                }
            }
            Ok(())
        }

        FilesCommand::Records { record_type, page } => {
            let records = dashboard.load_records(&record_type, page).await?;
            let out = match global.output {
                OutputFormat::Table => output::json_table(&records.data),
                OutputFormat::Plain => records
                    .data
                    .iter()
                    .map(record_id)
                    .collect::<Vec<_>>()
                    .join("\n"),
                format => output::render_single(
                    format,
                    records.data.as_slice(),
                    |_| String::new(),
                    |_| String::new(),
                )?,
            };
            output::print_output(&out, global.quiet);
            output::print_pagination(global.output, &records.pagination, global.quiet);
            Ok(())
        }

        FilesCommand::Purge => {
            if !util::confirm(
                "Delete every processed record? This cannot be undone.",
                "files purge",
                global.yes,
            )? {
                return Ok(());
            }
            let result = dashboard.delete_all_records().await?;
            if !global.quiet {
                eprintln!(
                    "{}",
                    result
                        .message
                        .as_deref()
                        .unwrap_or("Deleted all processed records")
                );
            }
            Ok(())
        }
    }
}

fn print_stats(stats: &FileStats, global: &GlobalOpts) -> Result<(), CliError> {
    let out = output::render_single(global.output, stats, stats_detail, |s| {
        s.total_records.to_string()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn record_id_prefers_known_keys() {
        assert_eq!(record_id(&json!({ "_id": "a1", "TRNN": "9" })), "a1");
        assert_eq!(record_id(&json!({ "TRNN": 42 })), "42");
        assert_eq!(record_id(&json!({ "x": 1 })), r#"{"x":1}"#);
    }
}
