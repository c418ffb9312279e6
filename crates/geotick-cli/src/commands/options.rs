use serde::Serialize;

use geotick_dashboard::{country_options, stock_options, OptionItem};

use crate::cli::StocksArgs;
use crate::error::CliError;

use super::{CommandContext, CommandResult};

#[derive(Debug, Serialize)]
struct OptionsResponseData {
    options: Vec<OptionItem>,
}

pub fn countries(context: &CommandContext) -> Result<CommandResult, CliError> {
    let options = country_options(&context.ticker_catalog);
    let data = serde_json::to_value(OptionsResponseData { options })?;
    Ok(CommandResult::ok(data))
}

pub fn stocks(args: &StocksArgs, context: &CommandContext) -> Result<CommandResult, CliError> {
    let options = stock_options(&context.ticker_catalog, &args.country);

    let result = CommandResult::ok(serde_json::to_value(OptionsResponseData {
        options: options.clone(),
    })?);

    if options.is_empty() {
        return Ok(
            result.with_warning(format!("no tickers listed for country '{}'", args.country))
        );
    }

    Ok(result)
}
