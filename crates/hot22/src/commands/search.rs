//! Global search and quick lookup, with history persisted between runs.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tabled::Tabled;

use hot22_core::domains::search::SearchAction;
use hot22_core::{Dashboard, LookupKind, SearchHistoryEntry, SearchResult};

use crate::cli::{GlobalOpts, LookupArg, LookupArgs, SearchArgs};
use crate::error::CliError;
use crate::output;

// ── History file ────────────────────────────────────────────────────

/// On-disk form of both histories, newest first.
#[derive(Debug, Default, Serialize, Deserialize)]
struct SavedHistory {
    #[serde(default)]
    search: Vec<SearchHistoryEntry>,
    #[serde(default)]
    lookup: Vec<SearchHistoryEntry>,
}

fn history_path() -> PathBuf {
    hot22_config::data_dir().join("search-history.json")
}

/// Unreadable or corrupt history starts empty.
fn load_history() -> SavedHistory {
    let path = history_path();
    match std::fs::read_to_string(&path) {
        Ok(text) => serde_json::from_str(&text).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "ignoring corrupt search history");
            SavedHistory::default()
        }),
        Err(_) => SavedHistory::default(),
    }
}

fn write_history(history: &SavedHistory) -> Result<(), CliError> {
    let path = history_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, serde_json::to_string_pretty(history)?)?;
    Ok(())
}

fn restore(dashboard: &Dashboard) {
    let saved = load_history();
    dashboard.restore_search_history(saved.search, saved.lookup);
}

/// Saving is best effort: a read-only data dir must not fail the search.
fn persist(dashboard: &Dashboard) {
    let (search, lookup) = dashboard.search_history();
    if let Err(e) = write_history(&SavedHistory { search, lookup }) {
        tracing::warn!(error = %e, "could not save search history");
    }
}

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct ResultRow {
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Summary")]
    summary: String,
}

impl From<&SearchResult> for ResultRow {
    fn from(r: &SearchResult) -> Self {
        Self {
            kind: output::opt(r.kind.as_deref()),
            id: output::opt(r.id.as_deref()),
            summary: output::opt(r.summary.as_deref()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Tabled)]
struct HistoryRow {
    #[tabled(rename = "Source")]
    source: &'static str,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "When")]
    timestamp: String,
}

fn history_rows(saved: SavedHistory) -> Vec<HistoryRow> {
    let row = |source| {
        move |e: SearchHistoryEntry| HistoryRow {
            source,
            kind: e.kind,
            value: e.value,
            timestamp: e.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    };
    saved
        .search
        .into_iter()
        .map(row("search"))
        .chain(saved.lookup.into_iter().map(row("lookup")))
        .collect()
}

fn lookup_kind(arg: LookupArg) -> LookupKind {
    match arg {
        LookupArg::Ticket => LookupKind::Ticket,
        LookupArg::Transaction => LookupKind::Transaction,
        LookupArg::Agent => LookupKind::Agent,
        LookupArg::Passenger => LookupKind::Passenger,
    }
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn handle(
    dashboard: &Dashboard,
    args: SearchArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if args.clear_history {
        write_history(&SavedHistory::default())?;
        if !global.quiet {
            eprintln!("Search history cleared");
        }
        return Ok(());
    }
    if args.history {
        let rows = history_rows(load_history());
        let out = output::render_list(
            global.output,
            &rows,
            HistoryRow::clone,
            |r| r.value.clone(),
        )?;
        output::print_output(&out, global.quiet);
        return Ok(());
    }

    let query = args.query.unwrap_or_default();
    restore(dashboard);
    if let Some(limit) = args.limit {
        dashboard.search().dispatch(SearchAction::SetLimit(limit));
    }

    let result = if args.page <= 1 {
        dashboard.global_search(&query, args.kind).await
    } else {
        dashboard.search().dispatch(SearchAction::SetQuery(query));
        dashboard.search().dispatch(SearchAction::SetKind(args.kind));
        dashboard.search_page(args.page).await
    };
    persist(dashboard);
    let page = result?;

    let out = output::render_list(
        global.output,
        &page.data,
        |r| ResultRow::from(r),
        |r| r.id.clone().unwrap_or_default(),
    )?;
    output::print_output(&out, global.quiet);
    output::print_pagination(global.output, &page.pagination, global.quiet);
    Ok(())
}

pub async fn lookup(
    dashboard: &Dashboard,
    args: LookupArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    restore(dashboard);
    let result = dashboard.lookup(lookup_kind(args.kind), &args.value).await;
    persist(dashboard);
    let value = result?;

    let out = output::render_single(
        global.output,
        value.as_ref(),
        output::json_view,
        ToString::to_string,
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
