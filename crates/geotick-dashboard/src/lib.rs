//! # Geotick Dashboard
//!
//! Selection state and chart assembly for the geotick world-market
//! dashboard.
//!
//! The UI shell owns the event loop; this crate owns the semantics. Every
//! user event maps to one pure [`SelectionState`] transition, and every
//! accepted transition is followed by one [`render`] call that rebuilds
//! all chart models from scratch — no incremental updates, no caching
//! across renders.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`assembler`] | Map, line-series, and statement-panel builders |
//! | [`render`] | The `render(state, catalogs, source)` entry point |
//! | [`state`] | SelectionState and its transitions |

pub mod assembler;
pub mod render;
pub mod state;

pub use assembler::{
    build_comparison_series, build_index_trend_series, build_map_model, build_statement_panels,
    BarColor, BarSeries, ChangeTone, ChartPoint, ChartSeries, HoverCard, MapModel, MapRegion,
    Panel, PanelPairSpec, PanelSpec, StatementPanels, TREND_WINDOW_DAYS,
};
pub use render::{
    country_options, fetch_snapshot, index_options, render, selected_stock_rows, stock_options,
    DashboardView, OptionItem, SnapshotError,
};
pub use state::{SelectionError, SelectionState, MAX_COMPARED_TICKERS};
