use serde::Serialize;

use geotick_core::UtcDateTime;
use geotick_dashboard::{
    build_comparison_series, ChartSeries, SelectionState, MAX_COMPARED_TICKERS,
};

use crate::cli::CompareArgs;
use crate::error::CliError;

use super::{empty_series_warnings, parse_symbols, CommandContext, CommandResult};

#[derive(Debug, Serialize)]
struct CompareResponseData {
    series: Vec<ChartSeries>,
}

pub async fn run(args: &CompareArgs, context: &CommandContext) -> Result<CommandResult, CliError> {
    let requested = parse_symbols(&args.tickers)?;
    let state = SelectionState::default()
        .select_tickers(&requested)
        .select_duration(args.duration_days)?;

    let mut warnings = Vec::new();
    if requested.len() > MAX_COMPARED_TICKERS {
        warnings.push(format!(
            "stock selection is limited to {MAX_COMPARED_TICKERS}; keeping the first {MAX_COMPARED_TICKERS}"
        ));
    }

    let series = build_comparison_series(
        &state.selected_tickers,
        state.duration,
        &context.source,
        UtcDateTime::now(),
    )
    .await;

    warnings.extend(empty_series_warnings(&series));
    let data = serde_json::to_value(CompareResponseData { series })?;

    Ok(CommandResult::ok(data).with_warnings(warnings))
}
