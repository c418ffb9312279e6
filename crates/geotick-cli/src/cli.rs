//! CLI argument definitions for geotick.
//!
//! The CLI is the stand-in for the dashboard's UI shell: every command
//! maps a set of flags onto selection-state transitions and prints the
//! resulting chart models.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `snapshot` | Fetch and enrich the world-index snapshot |
//! | `dashboard` | Run a full render for one selection |
//! | `trend` | Index growth-trend series |
//! | `compare` | Stock comparison series |
//! | `statements` | Income and balance-sheet panels |
//! | `countries` | Country dropdown options |
//! | `stocks` | Stock dropdown options for a country |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `json` | Output format (json, table) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--strict` | `false` | Treat warnings as errors |
//! | `--offline` | `false` | Deterministic fixture data, no network |
//! | `--catalog` | builtin | Ticker catalog CSV path |
//! | `--timeout-ms` | `10000` | Upstream request timeout |

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Geotick - world stock-market dashboard core
///
/// Fetches world-index snapshots and stock financials, and prepares the
/// map, line-chart, and statement-panel models the dashboard renders.
#[derive(Debug, Parser)]
#[command(
    name = "geotick",
    author,
    version,
    about = "World stock-market dashboard core"
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Treat warnings and errors as failures (exit code 5).
    #[arg(long, global = true, default_value_t = false)]
    pub strict: bool,

    /// Use deterministic fixture data instead of the network.
    #[arg(long, global = true, default_value_t = false)]
    pub offline: bool,

    /// Ticker catalog CSV (Ticker,Name,Country,Exchange). Falls back to
    /// the built-in fixture catalog.
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    /// Upstream request timeout budget in milliseconds.
    #[arg(long, global = true, default_value_t = 10_000)]
    pub timeout_ms: u64,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// ASCII table format for terminal display.
    Table,
    /// Single JSON object output.
    Json,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch the world-index snapshot, enrich it, and build the map model.
    Snapshot,

    /// Run a full dashboard render for one selection.
    ///
    /// Flags mirror the dashboard controls; omitted flags keep their
    /// session defaults (first index, USA, 1 year, yearly).
    Dashboard(DashboardArgs),

    /// Growth-trend series for selected indices (default: the first
    /// snapshot row) over the fixed five-year window.
    Trend(TrendArgs),

    /// Adjusted-close comparison series for one or two stocks.
    Compare(CompareArgs),

    /// Income and balance-sheet panels for one or two stocks.
    Statements(StatementsArgs),

    /// List the country dropdown options.
    Countries,

    /// List the stock dropdown options for a country.
    Stocks(StocksArgs),
}

/// Arguments for the `dashboard` command.
#[derive(Debug, Args)]
pub struct DashboardArgs {
    /// Index symbols to chart (e.g., ^GSPC ^FTSE).
    #[arg(long, num_args = 1..)]
    pub indices: Vec<String>,

    /// Simulate a map click on a country code (e.g., USA); applied after
    /// --indices, as a click replaces the selection.
    #[arg(long)]
    pub click_country: Option<String>,

    /// Country feeding the stock dropdown.
    #[arg(long)]
    pub country: Option<String>,

    /// Stocks to compare (limit 2; extra entries are dropped).
    #[arg(long, num_args = 1..)]
    pub tickers: Vec<String>,

    /// Comparison lookback in days (30, 90, 180, 365, 1095, 1825).
    #[arg(long)]
    pub duration_days: Option<u32>,

    /// Statement granularity (yearly, quarterly).
    #[arg(long)]
    pub period: Option<String>,
}

/// Arguments for the `trend` command.
#[derive(Debug, Args)]
pub struct TrendArgs {
    /// Index symbols in selection order.
    #[arg(num_args = 0..)]
    pub symbols: Vec<String>,
}

/// Arguments for the `compare` command.
#[derive(Debug, Args)]
pub struct CompareArgs {
    /// Stock tickers in selection order (limit 2; extra entries are
    /// dropped, first two win).
    #[arg(required = true, num_args = 1..)]
    pub tickers: Vec<String>,

    /// Lookback window in days (30, 90, 180, 365, 1095, 1825).
    #[arg(long, default_value_t = 365)]
    pub duration_days: u32,
}

/// Arguments for the `statements` command.
#[derive(Debug, Args)]
pub struct StatementsArgs {
    /// Stock tickers in selection order (limit 2).
    #[arg(required = true, num_args = 1..)]
    pub tickers: Vec<String>,

    /// Statement granularity (yearly, quarterly).
    #[arg(long, default_value = "yearly")]
    pub period: String,
}

/// Arguments for the `stocks` command.
#[derive(Debug, Args)]
pub struct StocksArgs {
    /// Country name as it appears in the ticker catalog.
    #[arg(long)]
    pub country: String,
}
