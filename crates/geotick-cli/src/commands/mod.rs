mod compare;
mod dashboard;
mod options;
mod snapshot;
mod statements;
mod trend;

use std::time::Instant;

use geotick_core::{
    Envelope, EnvelopeMeta, IndexCatalog, MarketDataSource, Symbol, TickerCatalog, YahooAdapter,
};
use serde_json::Value;

use crate::cli::{Cli, Command};
use crate::error::CliError;

/// Everything a command needs: the data source and both catalogs, loaded
/// once per invocation.
pub struct CommandContext {
    pub source: YahooAdapter,
    pub index_catalog: IndexCatalog,
    pub ticker_catalog: TickerCatalog,
}

pub struct CommandResult {
    pub data: Value,
    pub warnings: Vec<String>,
}

impl CommandResult {
    pub fn ok(data: Value) -> Self {
        Self {
            data,
            warnings: Vec::new(),
        }
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings.extend(warnings);
        self
    }
}

pub async fn run(cli: &Cli) -> Result<Envelope<Value>, CliError> {
    let source = if cli.offline {
        YahooAdapter::offline()
    } else {
        YahooAdapter::live(cli.timeout_ms)
    };

    let ticker_catalog = match &cli.catalog {
        Some(path) => TickerCatalog::from_path(path)?,
        None => TickerCatalog::fixture(),
    };

    let context = CommandContext {
        source,
        index_catalog: IndexCatalog::world(),
        ticker_catalog,
    };

    let started = Instant::now();
    let mut result = match &cli.command {
        Command::Snapshot => snapshot::run(&context).await?,
        Command::Dashboard(args) => dashboard::run(args, &context).await?,
        Command::Trend(args) => trend::run(args, &context).await?,
        Command::Compare(args) => compare::run(args, &context).await?,
        Command::Statements(args) => statements::run(args, &context).await?,
        Command::Countries => options::countries(&context)?,
        Command::Stocks(args) => options::stocks(args, &context)?,
    };
    let latency_ms = started.elapsed().as_millis() as u64;

    if cli.offline {
        result
            .warnings
            .push(String::from("offline mode returns deterministic fixture data"));
    }

    let mut meta = EnvelopeMeta::new(context.source.id(), latency_ms);
    for warning in result.warnings {
        meta.push_warning(warning);
    }

    Ok(Envelope::success(meta, result.data))
}

/// Parse raw CLI symbols, preserving the order given.
pub fn parse_symbols(raw: &[String]) -> Result<Vec<Symbol>, CliError> {
    raw.iter()
        .map(|value| Symbol::parse(value).map_err(CliError::from))
        .collect()
}

/// One warning per empty series, so `--strict` surfaces degraded fetches.
pub fn empty_series_warnings(series: &[geotick_dashboard::ChartSeries]) -> Vec<String> {
    series
        .iter()
        .filter(|entry| entry.points.is_empty())
        .map(|entry| format!("series '{}' is empty", entry.legend))
        .collect()
}
