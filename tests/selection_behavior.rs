//! Behavior-driven tests for selection-state transitions.
//!
//! These verify that every user event maps to a pure, total transition:
//! invalid inputs are rejected before mutation and the prior state stays
//! visible.

use geotick_dashboard::{build_index_trend_series, SelectionState};
use geotick_tests::{enriched, symbol, test_now, RecordingSource};

fn two_country_rows() -> Vec<geotick_tests::IndexRow> {
    enriched(&[
        ("^GSPC", "S&P 500", 5_000.0, 10.0),
        ("^DJI", "Dow Jones Industrial Average", 39_000.0, -20.0),
        ("^FTSE", "FTSE 100", 7_500.0, 4.0),
    ])
}

#[test]
fn when_the_session_starts_the_first_snapshot_row_is_selected() {
    let rows = two_country_rows();
    let state = SelectionState::default_for_snapshot(&rows);

    assert_eq!(state.selected_indices, [symbol("^GSPC")]);
    assert_eq!(state.selected_country, "USA");
}

#[test]
fn when_an_index_is_selected_twice_the_selection_keeps_one_copy() {
    let state = SelectionState::default();
    let next = state.select_indices(&[symbol("^GSPC"), symbol("^GSPC"), symbol("^FTSE")]);

    assert_eq!(
        next.selected_indices,
        state
            .select_indices(&[symbol("^GSPC"), symbol("^FTSE")])
            .selected_indices
    );
}

#[tokio::test]
async fn duplicated_selection_yields_the_same_chart_series_as_the_deduplicated_one() {
    let rows = two_country_rows();
    let source = RecordingSource::default();

    let duplicated = SelectionState::default()
        .select_indices(&[symbol("^GSPC"), symbol("^GSPC"), symbol("^FTSE")]);
    let series_a =
        build_index_trend_series(&rows, &duplicated.selected_indices, &source, test_now()).await;

    let deduplicated =
        SelectionState::default().select_indices(&[symbol("^GSPC"), symbol("^FTSE")]);
    let series_b =
        build_index_trend_series(&rows, &deduplicated.selected_indices, &source, test_now()).await;

    assert_eq!(series_a, series_b);
}

#[test]
fn when_a_map_click_matches_two_rows_the_first_snapshot_row_wins() {
    let rows = two_country_rows();
    let state = SelectionState::default_for_snapshot(&rows).select_indices(&[symbol("^FTSE")]);

    // Both ^GSPC and ^DJI carry country code USA; snapshot order decides.
    let next = state.click_map_point("USA", &rows);
    assert_eq!(next.selected_indices, [symbol("^GSPC")]);
}

#[test]
fn when_a_map_click_matches_nothing_the_state_is_unchanged() {
    let rows = two_country_rows();
    let state = SelectionState::default_for_snapshot(&rows);

    let next = state.click_map_point("ATA", &rows);
    assert_eq!(next, state);
}

#[test]
fn selecting_three_tickers_keeps_the_first_two() {
    let state = SelectionState::default();

    let truncated = state.select_tickers(&[symbol("AAPL"), symbol("MSFT"), symbol("GOOGL")]);
    let direct = state.select_tickers(&[symbol("AAPL"), symbol("MSFT")]);

    assert_eq!(truncated, direct);
}

#[test]
fn rejected_duration_leaves_the_prior_state_visible() {
    let state = SelectionState::default().select_duration(90).expect("in set");

    assert!(state.select_duration(91).is_err());
    assert_eq!(u32::from(state.duration), 90);
}

#[test]
fn rejected_statement_period_leaves_the_prior_state_visible() {
    let state = SelectionState::default()
        .select_statement_period("quarterly")
        .expect("known period");

    assert!(state.select_statement_period("weekly").is_err());
    assert_eq!(state.statement_period.as_str(), "quarterly");
}

#[tokio::test]
async fn stale_ticker_identities_survive_a_country_change_without_crashing() {
    let rows = two_country_rows();
    let source = RecordingSource::default();

    // AAPL was picked while USA was selected; the country then changes.
    let state = SelectionState::default_for_snapshot(&rows)
        .select_tickers(&[symbol("AAPL")])
        .select_country("Japan");

    // Rendering with the stale identity must degrade, not panic.
    let series = geotick_dashboard::build_comparison_series(
        &state.selected_tickers,
        state.duration,
        &source,
        test_now(),
    )
    .await;
    assert_eq!(series.len(), 1);
}
