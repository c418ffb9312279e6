use serde::Serialize;

use geotick_core::UtcDateTime;
use geotick_dashboard::{build_index_trend_series, fetch_snapshot, ChartSeries, SelectionState};

use crate::cli::TrendArgs;
use crate::error::CliError;

use super::{empty_series_warnings, parse_symbols, CommandContext, CommandResult};

#[derive(Debug, Serialize)]
struct TrendResponseData {
    series: Vec<ChartSeries>,
}

pub async fn run(args: &TrendArgs, context: &CommandContext) -> Result<CommandResult, CliError> {
    let rows = fetch_snapshot(&context.index_catalog, &context.source).await?;

    let mut state = SelectionState::default_for_snapshot(&rows);
    if !args.symbols.is_empty() {
        state = state.select_indices(&parse_symbols(&args.symbols)?);
    }

    let series = build_index_trend_series(
        &rows,
        &state.selected_indices,
        &context.source,
        UtcDateTime::now(),
    )
    .await;

    let warnings = empty_series_warnings(&series);
    let data = serde_json::to_value(TrendResponseData { series })?;

    Ok(CommandResult::ok(data).with_warnings(warnings))
}
