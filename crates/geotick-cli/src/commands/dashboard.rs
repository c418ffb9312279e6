use geotick_core::UtcDateTime;
use geotick_dashboard::{fetch_snapshot, render, SelectionState};

use crate::cli::DashboardArgs;
use crate::error::CliError;

use super::{empty_series_warnings, parse_symbols, CommandContext, CommandResult};

pub async fn run(
    args: &DashboardArgs,
    context: &CommandContext,
) -> Result<CommandResult, CliError> {
    let rows = fetch_snapshot(&context.index_catalog, &context.source).await?;

    // Apply the flags as the UI would dispatch events, in control order.
    let mut state = SelectionState::default_for_snapshot(&rows);
    if !args.indices.is_empty() {
        state = state.select_indices(&parse_symbols(&args.indices)?);
    }
    if let Some(code) = &args.click_country {
        state = state.click_map_point(code, &rows);
    }
    if let Some(country) = &args.country {
        state = state.select_country(country);
    }
    if !args.tickers.is_empty() {
        state = state.select_tickers(&parse_symbols(&args.tickers)?);
    }
    if let Some(days) = args.duration_days {
        state = state.select_duration(days)?;
    }
    if let Some(period) = &args.period {
        state = state.select_statement_period(period)?;
    }

    let view = render(
        &state,
        &rows,
        &context.ticker_catalog,
        &context.source,
        UtcDateTime::now(),
    )
    .await;

    let mut warnings = empty_series_warnings(&view.trend);
    warnings.extend(empty_series_warnings(&view.comparison));
    let data = serde_json::to_value(&view)?;

    Ok(CommandResult::ok(data).with_warnings(warnings))
}
