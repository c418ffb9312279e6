use serde::Serialize;

use geotick_core::IndexRow;
use geotick_dashboard::{
    build_map_model, fetch_snapshot, index_options, MapModel, OptionItem, SelectionState,
};

use crate::error::CliError;

use super::{CommandContext, CommandResult};

#[derive(Debug, Serialize)]
struct SnapshotResponseData {
    rows: Vec<IndexRow>,
    map: MapModel,
    index_options: Vec<OptionItem>,
}

pub async fn run(context: &CommandContext) -> Result<CommandResult, CliError> {
    let rows = fetch_snapshot(&context.index_catalog, &context.source).await?;
    let state = SelectionState::default_for_snapshot(&rows);
    let map = build_map_model(&rows, &state.selected_indices);
    let index_options = index_options(&rows);

    let data = serde_json::to_value(SnapshotResponseData {
        rows,
        map,
        index_options,
    })?;

    Ok(CommandResult::ok(data))
}
