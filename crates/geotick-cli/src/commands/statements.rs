use serde::Serialize;

use geotick_core::StatementKind;
use geotick_dashboard::{
    build_statement_panels, PanelPairSpec, SelectionState, StatementPanels, MAX_COMPARED_TICKERS,
};

use crate::cli::StatementsArgs;
use crate::error::CliError;

use super::{parse_symbols, CommandContext, CommandResult};

#[derive(Debug, Serialize)]
struct StatementsResponseData {
    income: StatementPanels,
    balance_sheet: StatementPanels,
}

pub async fn run(
    args: &StatementsArgs,
    context: &CommandContext,
) -> Result<CommandResult, CliError> {
    let requested = parse_symbols(&args.tickers)?;
    let state = SelectionState::default()
        .select_tickers(&requested)
        .select_statement_period(&args.period)?;

    let mut warnings = Vec::new();
    if requested.len() > MAX_COMPARED_TICKERS {
        warnings.push(format!(
            "stock selection is limited to {MAX_COMPARED_TICKERS}; keeping the first {MAX_COMPARED_TICKERS}"
        ));
    }

    let income_spec = PanelPairSpec::income();
    let balance_sheet_spec = PanelPairSpec::balance_sheet();
    let (income, balance_sheet) = tokio::join!(
        build_statement_panels(
            &state.selected_tickers,
            state.statement_period,
            StatementKind::Income,
            &income_spec,
            &context.source,
        ),
        build_statement_panels(
            &state.selected_tickers,
            state.statement_period,
            StatementKind::BalanceSheet,
            &balance_sheet_spec,
            &context.source,
        ),
    );

    for panels in [&income, &balance_sheet] {
        for panel in [&panels.primary, &panels.secondary] {
            for series in &panel.series {
                if series.bars.is_empty() {
                    warnings.push(format!(
                        "panel '{}' has no bars for '{}'",
                        panel.title, series.legend
                    ));
                }
            }
        }
    }

    let data = serde_json::to_value(StatementsResponseData {
        income,
        balance_sheet,
    })?;

    Ok(CommandResult::ok(data).with_warnings(warnings))
}
