//! End-to-end dashboard journeys: snapshot through render.

use geotick_core::{TickerCatalog, YahooAdapter};
use geotick_dashboard::{
    build_index_trend_series, fetch_snapshot, render, stock_options, SelectionState,
    TREND_WINDOW_DAYS,
};
use geotick_tests::{
    enriched, raw_snapshot, symbol, test_now, IndexCatalog, RecordingSource,
};

#[tokio::test]
async fn a_map_click_drives_one_five_year_fetch_with_the_enriched_label() {
    // Given: a one-row snapshot for the S&P 500
    let catalog = IndexCatalog::world();
    let snapshot = raw_snapshot(&[("^GSPC", "S&P 500", 5_000.0, 10.0)]);

    // When: the snapshot is enriched
    let rows = catalog.enrich(&snapshot).expect("covered snapshot");
    assert_eq!(rows[0].country_code, "USA");

    // And: the user clicks the USA region
    let state = SelectionState::default_for_snapshot(&rows).click_map_point("USA", &rows);
    assert_eq!(state.selected_indices, [symbol("^GSPC")]);

    // Then: the trend build issues exactly one fetch over the fixed window
    let source = RecordingSource::default();
    let series =
        build_index_trend_series(&rows, &state.selected_indices, &source, test_now()).await;

    let requests = source.history_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].symbol, symbol("^GSPC"));
    assert_eq!(requests[0].start, test_now().minus_days(TREND_WINDOW_DAYS));
    assert_eq!(requests[0].end, test_now());

    assert_eq!(series.len(), 1);
    assert_eq!(series[0].legend, "S&P 500(USD)");
}

#[tokio::test]
async fn a_country_change_rebuilds_the_stock_options_from_the_catalog() {
    let tickers = TickerCatalog::fixture();
    let state = SelectionState::default();

    let usa = stock_options(&tickers, &state.selected_country);
    assert!(usa.iter().any(|option| option.value == "AAPL"));

    let state = state.select_country("Canada");
    let canada = stock_options(&tickers, &state.selected_country);
    assert!(canada.iter().all(|option| option.value != "AAPL"));
    assert!(canada.iter().any(|option| option.value == "SHOP.TO"));
}

#[tokio::test]
async fn a_full_offline_render_fills_every_dashboard_section() {
    let source = YahooAdapter::offline();
    let index_catalog = IndexCatalog::world();
    let tickers = TickerCatalog::fixture();

    let rows = fetch_snapshot(&index_catalog, &source)
        .await
        .expect("fixture snapshot enriches");
    assert_eq!(rows.len(), index_catalog.len());

    let state = SelectionState::default_for_snapshot(&rows)
        .select_tickers(&[symbol("AAPL"), symbol("MSFT"), symbol("GOOGL")]);
    assert_eq!(state.selected_tickers.len(), 2);

    let view = render(&state, &rows, &tickers, &source, test_now()).await;

    assert!(!view.map.regions.is_empty());
    assert_eq!(view.index_options.len(), rows.len());
    assert_eq!(view.trend.len(), 1);
    assert!(!view.trend[0].points.is_empty());
    assert_eq!(view.comparison.len(), 2);
    assert_eq!(view.selected_stocks.len(), 2);
    assert_eq!(view.income.primary.series.len(), 2);
    assert_eq!(view.income.secondary.series.len(), 2);
    assert_eq!(view.balance_sheet.primary.series.len(), 2);
    assert!(view
        .country_options
        .iter()
        .any(|option| option.value == "USA"));
}

#[tokio::test]
async fn rendering_an_empty_index_selection_yields_an_empty_trend_chart() {
    let rows = enriched(&[("^GSPC", "S&P 500", 5_000.0, 10.0)]);
    let source = RecordingSource::default();

    let state = SelectionState::default_for_snapshot(&rows).select_indices(&[]);
    let series =
        build_index_trend_series(&rows, &state.selected_indices, &source, test_now()).await;

    assert!(series.is_empty());
    assert!(source.history_requests().is_empty());
}

#[tokio::test]
async fn a_snapshot_refresh_replaces_rows_and_stale_selections_skip_silently() {
    let source = RecordingSource::default();

    // First snapshot: Japan leads the table and gets selected.
    let old_rows = enriched(&[("^N225", "Nikkei 225", 38_000.0, 1.0)]);
    let state = SelectionState::default_for_snapshot(&old_rows);

    // Refresh: the new snapshot no longer carries ^N225.
    let new_rows = enriched(&[("^GSPC", "S&P 500", 5_000.0, 10.0)]);

    let series =
        build_index_trend_series(&new_rows, &state.selected_indices, &source, test_now()).await;
    assert!(series.is_empty(), "stale identity is skipped, not fetched");
    assert!(source.history_requests().is_empty());
}
