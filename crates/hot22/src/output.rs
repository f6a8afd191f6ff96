//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits one identifier per line.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use serde_json::Value;
use tabled::{Table, Tabled, builder::Builder, settings::Style};

use hot22_core::Pagination;

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

// ── Color helpers ───────────────────────────────────────────────────

pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none(),
    }
}

/// Color a status word: healthy green, failing red, anything else yellow.
pub fn status(value: &str, color: bool) -> String {
    if !color {
        return value.to_owned();
    }
    match value.to_ascii_lowercase().as_str() {
        "ok" | "healthy" | "up" | "active" | "connected" | "processed" | "success" => {
            value.green().to_string()
        }
        "error" | "failed" | "down" | "unhealthy" | "disconnected" => value.red().to_string(),
        _ => value.yellow().to_string(),
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serde-serializable + tabled items in the chosen format.
pub fn render_list<T, R>(
    format: OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            Ok(render_table(&rows))
        }
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => Ok(data.iter().map(&id_fn).collect::<Vec<_>>().join("\n")),
    }
}

/// Render a single item. Tables use `detail_fn`, since detail views are
/// key/value blocks rather than `Tabled` rows.
pub fn render_single<T>(
    format: OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize + ?Sized,
{
    match format {
        OutputFormat::Table => Ok(detail_fn(data)),
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => Ok(id_fn(data)),
    }
}

/// `key: value` lines with the keys padded to one column.
pub fn detail_block(pairs: &[(&str, String)]) -> String {
    let width = pairs.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    pairs
        .iter()
        .map(|(k, v)| format!("{k:<width$}  {v}"))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

/// Page footer on stderr, table output only, so piped data stays clean.
pub fn print_pagination(format: OutputFormat, pagination: &Pagination, quiet: bool) {
    if quiet || format != OutputFormat::Table {
        return;
    }
    eprintln!("{}", pagination_line(pagination));
}

pub fn pagination_line(p: &Pagination) -> String {
    let mut line = format!(
        "Page {} of {} ({} records)",
        p.current_page, p.total_pages, p.total_records
    );
    if p.has_next_page {
        line.push_str(&format!(" -- next: --page {}", p.current_page + 1));
    }
    line
}

/// Objects as a table keyed by the first row's fields; anything else
/// as pretty JSON.
pub fn json_table(rows: &[Value]) -> String {
    let Some(Value::Object(first)) = rows.first() else {
        return serde_json::to_string_pretty(rows).unwrap_or_default();
    };
    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(headers.clone());
    for row in rows {
        builder.push_record(headers.iter().map(|h| cell(row.get(h))));
    }
    builder.build().with(Style::rounded()).to_string()
}

/// Reports arrive as either a bare array or `{ data: [...] , ... }`.
pub fn json_view(value: &Value) -> String {
    match value {
        Value::Array(rows) => json_table(rows),
        Value::Object(map) => match map.get("data") {
            Some(Value::Array(rows)) if !rows.is_empty() => json_table(rows),
            _ => serde_json::to_string_pretty(value).unwrap_or_default(),
        },
        _ => value.to_string(),
    }
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "-".into(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// `Some(v)` as text, `None` as `-`.
pub fn opt<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "-".into(), |v| v.to_string())
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> Result<String, CliError> {
    let out = if compact {
        serde_json::to_string(data)?
    } else {
        serde_json::to_string_pretty(data)?
    };
    Ok(out)
}

fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> Result<String, CliError> {
    serde_yaml::to_string(data).map_err(|e| CliError::Internal {
        message: format!("YAML serialization failed: {e}"),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde::Serialize;

    use super::*;

    #[derive(Serialize)]
    struct Item {
        code: &'static str,
        city: &'static str,
    }

    #[derive(Tabled)]
    struct ItemRow {
        #[tabled(rename = "Code")]
        code: String,
        #[tabled(rename = "City")]
        city: String,
    }

    fn items() -> Vec<Item> {
        vec![
            Item {
                code: "1000001",
                city: "Madrid",
            },
            Item {
                code: "2000001",
                city: "Sevilla",
            },
        ]
    }

    fn render(format: OutputFormat) -> String {
        render_list(
            format,
            &items(),
            |i| ItemRow {
                code: i.code.into(),
                city: i.city.into(),
            },
            |i| i.code.into(),
        )
        .unwrap()
    }

    #[test]
    fn table_output() {
        insta::assert_snapshot!(render(OutputFormat::Table), @r"
        ╭─────────┬─────────╮
        │ Code    │ City    │
        ├─────────┼─────────┤
        │ 1000001 │ Madrid  │
        │ 2000001 │ Sevilla │
        ╰─────────┴─────────╯
        ");
    }

    #[test]
    fn compact_json_and_plain() {
        insta::assert_snapshot!(
            render(OutputFormat::JsonCompact),
            @r#"[{"code":"1000001","city":"Madrid"},{"code":"2000001","city":"Sevilla"}]"#
        );
        assert_eq!(render(OutputFormat::Plain), "1000001\n2000001");
    }

    #[test]
    fn pagination_footer_points_at_next_page() {
        let p = Pagination {
            current_page: 1,
            total_pages: 4,
            total_records: 180,
            has_next_page: true,
            has_prev_page: false,
            limit: 50,
        };
        assert_eq!(
            pagination_line(&p),
            "Page 1 of 4 (180 records) -- next: --page 2"
        );
    }

    #[test]
    fn detail_block_aligns_keys() {
        let out = detail_block(&[("AGTN", "1000001".into()), ("City", "Madrid".into())]);
        assert_eq!(out, "AGTN  1000001\nCity  Madrid");
    }

    #[test]
    fn json_rows_become_columns() {
        let report = serde_json::json!({
            "data": [
                { "agent": "1000001", "revenue": 1200.5 },
                { "agent": "2000001", "revenue": null },
            ]
        });
        insta::assert_snapshot!(json_view(&report), @r"
        ╭─────────┬─────────╮
        │ agent   │ revenue │
        ├─────────┼─────────┤
        │ 1000001 │ 1200.5  │
        │ 2000001 │ -       │
        ╰─────────┴─────────╯
        ");
    }

    #[test]
    fn status_without_color_is_untouched() {
        assert_eq!(status("ok", false), "ok");
    }
}
