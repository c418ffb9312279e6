//! Behavior-driven tests for chart assembly.

use geotick_core::{DurationDays, StatementPeriod};
use geotick_dashboard::{
    build_comparison_series, build_map_model, build_index_trend_series, build_statement_panels,
    ChangeTone, PanelPairSpec, TREND_WINDOW_DAYS,
};
use geotick_tests::{enriched, symbol, test_now, RecordingSource, StatementKind};

#[test]
fn map_coloring_treats_zero_change_as_negative() {
    let rows = enriched(&[
        ("^GSPC", "S&P 500", 5_000.0, 0.0),
        ("^FTSE", "FTSE 100", 7_500.0, -0.01),
        ("^N225", "Nikkei 225", 38_000.0, 0.01),
    ]);

    let model = build_map_model(&rows, &[]);

    assert_eq!(model.regions[0].tone, ChangeTone::Negative);
    assert_eq!(model.regions[1].tone, ChangeTone::Negative);
    assert_eq!(model.regions[2].tone, ChangeTone::Positive);
}

#[test]
fn map_model_has_one_region_per_distinct_country_code() {
    let rows = enriched(&[
        ("^GSPC", "S&P 500", 5_000.0, 10.0),
        ("^DJI", "Dow Jones Industrial Average", 39_000.0, -20.0),
        ("^IXIC", "NASDAQ Composite", 17_000.0, 5.0),
        ("^FTSE", "FTSE 100", 7_500.0, 4.0),
    ]);

    let model = build_map_model(&rows, &[]);

    assert_eq!(model.regions.len(), 2);
    // First row per code carries the hover payload.
    assert_eq!(model.regions[0].hover.symbol.as_str(), "^GSPC");
    assert_eq!(model.regions[1].hover.symbol.as_str(), "^FTSE");
}

#[tokio::test]
async fn identical_display_names_get_copy_suffixed_legends() {
    // ^STOXX50E and ^N100 both render as European indices in EUR; a third
    // clone forces the marker to stack.
    let rows = enriched(&[
        ("^STOXX50E", "EURO STOXX Index", 4_900.0, 1.0),
        ("^N100", "EURO STOXX Index", 1_400.0, 2.0),
        ("^BFX", "EURO STOXX Index", 3_800.0, 3.0),
    ]);
    let source = RecordingSource::default();

    let series = build_index_trend_series(
        &rows,
        &[symbol("^STOXX50E"), symbol("^N100"), symbol("^BFX")],
        &source,
        test_now(),
    )
    .await;

    let legends: Vec<&str> = series.iter().map(|entry| entry.legend.as_str()).collect();
    assert_eq!(
        legends,
        [
            "EURO STOXX Index(EUR)",
            "EURO STOXX Index(EUR) (Copy)",
            "EURO STOXX Index(EUR) (Copy) (Copy)",
        ]
    );
}

#[tokio::test]
async fn trend_fetches_use_the_fixed_five_year_window_not_the_duration() {
    let rows = enriched(&[("^GSPC", "S&P 500", 5_000.0, 10.0)]);
    let source = RecordingSource::default();

    build_index_trend_series(&rows, &[symbol("^GSPC")], &source, test_now()).await;

    let requests = source.history_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].start, test_now().minus_days(TREND_WINDOW_DAYS));
    assert_eq!(requests[0].end, test_now());
}

#[tokio::test(start_paused = true)]
async fn comparison_series_order_follows_selection_order_not_completion_order() {
    // The first ticker's fetch completes long after the second's.
    let source = RecordingSource {
        history_delays_ms: vec![(symbol("AAPL"), 5_000)],
        ..RecordingSource::default()
    };

    let series = build_comparison_series(
        &[symbol("AAPL"), symbol("MSFT")],
        DurationDays::D90,
        &source,
        test_now(),
    )
    .await;

    assert_eq!(series[0].legend, "AAPL Price");
    assert_eq!(series[1].legend, "MSFT Price");
}

#[tokio::test]
async fn comparison_with_zero_tickers_is_an_empty_model_not_an_error() {
    let source = RecordingSource::default();

    let series = build_comparison_series(&[], DurationDays::D1825, &source, test_now()).await;

    assert!(series.is_empty());
    assert!(source.history_requests().is_empty());
}

#[tokio::test]
async fn comparison_windows_match_the_selected_duration() {
    let source = RecordingSource::default();

    build_comparison_series(&[symbol("AAPL")], DurationDays::D180, &source, test_now()).await;

    let requests = source.history_requests();
    assert_eq!(requests[0].start, test_now().minus_days(180));
}

#[tokio::test]
async fn statement_colors_follow_selection_order_not_ticker_identity() {
    let source = RecordingSource::default();
    let spec = PanelPairSpec::income();

    let forward = build_statement_panels(
        &[symbol("AAPL"), symbol("MSFT")],
        StatementPeriod::Yearly,
        StatementKind::Income,
        &spec,
        &source,
    )
    .await;
    let reversed = build_statement_panels(
        &[symbol("MSFT"), symbol("AAPL")],
        StatementPeriod::Yearly,
        StatementKind::Income,
        &spec,
        &source,
    )
    .await;

    // Slot one keeps its color even though the ticker changed.
    assert_eq!(
        forward.primary.series[0].color,
        reversed.primary.series[0].color
    );
    assert_eq!(forward.primary.series[0].legend, "AAPL Revenue");
    assert_eq!(reversed.primary.series[0].legend, "MSFT Revenue");
}

#[tokio::test]
async fn statement_panels_carry_the_original_subplot_titles() {
    let source = RecordingSource::default();

    let income = build_statement_panels(
        &[symbol("AAPL")],
        StatementPeriod::Yearly,
        StatementKind::Income,
        &PanelPairSpec::income(),
        &source,
    )
    .await;
    let balance = build_statement_panels(
        &[symbol("AAPL")],
        StatementPeriod::Yearly,
        StatementKind::BalanceSheet,
        &PanelPairSpec::balance_sheet(),
        &source,
    )
    .await;

    assert_eq!(income.primary.title, "Revenue Statement");
    assert_eq!(income.secondary.title, "Net Income Statement");
    assert_eq!(balance.primary.title, "Total Assets");
    assert_eq!(
        balance.secondary.title,
        "Total Liabilities Net Minority Interest"
    );
}
