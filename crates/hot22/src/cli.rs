//! Clap derive structures for the `hot22` CLI.
//!
//! Defines the command tree, global flags, and shared argument groups.
//! Kept free of workspace crates so `build.rs` can render man pages from it.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// hot22 -- back-office console for HOT22 BSP ticketing data
#[derive(Debug, Parser)]
#[command(
    name = "hot22",
    version,
    about = "Browse and manage HOT22 back-office data from the command line",
    long_about = "Query travel-agency offices, passenger transactions, analytics and\n\
        file-processing error logs served by the HOT22 back-office API.\n\n\
        Upload HOT22 files, export or clean up error logs, and watch\n\
        processing in real time.",
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
    /// Configuration profile to use
    #[arg(long, short = 'p', env = "HOT22_PROFILE", global = true)]
    pub profile: Option<String>,

    /// API base URL (overrides profile)
    #[arg(long, short = 'u', env = "HOT22_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Config file to read instead of the platform default
    #[arg(long, env = "HOT22_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "HOT22_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Log every API request and response
    #[arg(long, env = "HOT22_DEV_MODE", global = true)]
    pub dev: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "HOT22_TIMEOUT", global = true)]
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
    /// Browse travel-agency offices
    #[command(alias = "of")]
    Offices(OfficesArgs),

    /// Browse passenger transactions
    #[command(alias = "pax")]
    Passengers(PassengersArgs),

    /// Inspect and manage file-processing error logs
    #[command(alias = "err")]
    Errors(ErrorsArgs),

    /// Upload HOT22 files and inspect processed records
    Files(FilesArgs),

    /// Run analytics reports
    Analytics(AnalyticsArgs),

    /// Global search across every entity type
    Search(SearchArgs),

    /// Quick lookup by ticket, transaction, agent, or passenger
    Lookup(LookupArgs),

    /// Check API health
    Health,

    /// Overview: statistics, health, and collections
    #[command(alias = "overview")]
    Dashboard,

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared List Arguments ────────────────────────────────────────────

/// Pagination and sorting shared by every list command.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Page to fetch (1-based)
    #[arg(long, default_value = "1")]
    pub page: u32,

    /// Page size (defaults to the profile's page_size)
    #[arg(long, short = 'l')]
    pub limit: Option<u32>,

    /// Column the server sorts by
    #[arg(long)]
    pub sort_by: Option<String>,

    /// Sort direction
    #[arg(long)]
    pub order: Option<SortOrderArg>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortOrderArg {
    Asc,
    Desc,
}

/// Inclusive date window, `YYYY-MM-DD`.
#[derive(Debug, Args)]
pub struct DateRangeArgs {
    /// Start date (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,

    /// End date (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<String>,
}

// ── Offices ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct OfficesArgs {
    #[command(subcommand)]
    pub command: OfficesCommand,
}

#[derive(Debug, Subcommand)]
pub enum OfficesCommand {
    /// List offices
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        list: ListArgs,

        /// Free-text search
        #[arg(long, short = 's')]
        search: Option<String>,

        #[arg(long)]
        city: Option<String>,

        #[arg(long)]
        country: Option<String>,

        #[arg(long)]
        status: Option<String>,
    },

    /// Show one office by agent code (AGTN)
    Get { agent_code: String },
}

// ── Passengers ───────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct PassengersArgs {
    #[command(subcommand)]
    pub command: PassengersCommand,
}

#[derive(Debug, Subcommand)]
pub enum PassengersCommand {
    /// List passenger transactions
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        list: ListArgs,

        #[command(flatten)]
        dates: DateRangeArgs,

        /// Free-text search
        #[arg(long, short = 's')]
        search: Option<String>,

        /// Issuing agent code (AGTN)
        #[arg(long)]
        agent: Option<String>,

        /// Ticket/document number
        #[arg(long)]
        ticket: Option<String>,
    },

    /// Show one transaction by TRNN
    Get { transaction_number: String },

    /// Record history of one transaction
    History { transaction_number: String },
}

// ── Error logs ───────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ErrorsArgs {
    #[command(subcommand)]
    pub command: ErrorsCommand,
}

/// Criteria shared by listing, statistics, and export.
#[derive(Debug, Args)]
pub struct ErrorFilterArgs {
    /// HOT22 record type (e.g. BKS24)
    #[arg(long)]
    pub record_type: Option<String>,

    #[arg(long)]
    pub error_type: Option<String>,

    #[arg(long)]
    pub status: Option<String>,

    /// Only logs with (true) or without (false) errors
    #[arg(long)]
    pub has_errors: Option<bool>,

    #[command(flatten)]
    pub dates: DateRangeArgs,

    /// Free-text search (routes to the search endpoint)
    #[arg(long, short = 's')]
    pub search: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum ErrorsCommand {
    /// List error logs
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        list: ListArgs,

        #[command(flatten)]
        filters: ErrorFilterArgs,

        /// List only logs of this error type via /by-type
        #[arg(long, conflicts_with = "error_type")]
        by_type: Option<String>,
    },

    /// Show one log by upload id
    Get { upload_id: String },

    /// Statistics for the given criteria
    Stats {
        #[command(flatten)]
        filters: ErrorFilterArgs,
    },

    /// Server-computed error dashboard
    Summary,

    /// One live snapshot of recent processing
    Realtime,

    /// Poll the live snapshot until Ctrl-C
    Monitor {
        /// Polling interval (e.g. 10s, 1m)
        #[arg(long, short = 'i')]
        interval: Option<String>,
    },

    /// Download a CSV export for the given criteria
    Export {
        #[command(flatten)]
        filters: ErrorFilterArgs,

        /// Directory to write into (defaults to the profile's download_dir)
        #[arg(long, short = 'd')]
        dir: Option<PathBuf>,
    },

    /// Delete logs by upload id
    BulkDelete {
        #[arg(required = true)]
        upload_ids: Vec<String>,
    },

    /// Start a server-side export of logs by upload id
    BulkExport {
        #[arg(required = true)]
        upload_ids: Vec<String>,
    },

    /// Delete logs older than N days
    Cleanup {
        /// Age threshold in days (server default when omitted)
        #[arg(long)]
        days: Option<u32>,
    },
}

// ── Files ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct FilesArgs {
    #[command(subcommand)]
    pub command: FilesCommand,
}

#[derive(Debug, Subcommand)]
pub enum FilesCommand {
    /// Upload and process a HOT22 file
    Upload { path: PathBuf },

    /// Processed-record statistics
    Stats {
        /// Keep polling at this interval (e.g. 30s) until Ctrl-C
        #[arg(long, short = 'w')]
        watch: Option<String>,
    },

    /// Page through processed records of one type
    Records {
        /// HOT22 record type (e.g. BKS24)
        record_type: String,

        #[arg(long, default_value = "1")]
        page: u32,
    },

    /// Delete every processed record
    Purge,
}

// ── Analytics ────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct AnalyticsArgs {
    /// Report to run; every report when omitted
    pub report: Option<ReportArg>,

    #[command(flatten)]
    pub dates: DateRangeArgs,

    /// Time bucket
    #[arg(long)]
    pub group_by: Option<GroupByArg>,

    /// Restrict to one agent code
    #[arg(long)]
    pub agent: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportArg {
    Revenue,
    Commission,
    Performance,
    TravelPatterns,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GroupByArg {
    Day,
    Week,
    Month,
    Year,
}

// ── Search ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Text to search for
    #[arg(required_unless_present_any = ["history", "clear_history"])]
    pub query: Option<String>,

    /// Restrict to one entity type
    #[arg(long = "type", short = 't')]
    pub kind: Option<String>,

    #[arg(long, default_value = "1")]
    pub page: u32,

    #[arg(long, short = 'l')]
    pub limit: Option<u32>,

    /// Show recent searches and lookups instead of searching
    #[arg(long, conflicts_with = "clear_history")]
    pub history: bool,

    /// Forget recent searches and lookups
    #[arg(long)]
    pub clear_history: bool,
}

#[derive(Debug, Args)]
pub struct LookupArgs {
    pub kind: LookupArg,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LookupArg {
    Ticket,
    Transaction,
    Agent,
    Passenger,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Interactive profile setup
    Init,

    /// Print the merged configuration
    Show,

    /// Print the config file location
    Path,

    /// List profiles
    Profiles,

    /// Add or replace a profile
    SetProfile {
        name: String,

        #[arg(long)]
        api_url: String,

        #[arg(long)]
        timeout: Option<u64>,

        #[arg(long)]
        page_size: Option<u32>,

        #[arg(long)]
        realtime_interval: Option<u64>,

        #[arg(long)]
        download_dir: Option<PathBuf>,

        /// Make this the default profile
        #[arg(long)]
        default: bool,
    },

    /// Select the default profile
    Use { name: String },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    pub shell: clap_complete::Shell,
}
