//! The explicit render entry point.
//!
//! The UI collaborator calls [`render`] after every accepted selection
//! transition and gets back every chart model and option list in one
//! value. All reads are against the immutable state snapshot passed in;
//! nothing here mutates selection state.

use serde::{Deserialize, Serialize};

use geotick_core::{
    IndexRow, MarketDataSource, SnapshotRequest, SourceError, StatementKind, Symbol,
    TickerCatalog, TickerRow, UtcDateTime,
};

use crate::assembler::{
    build_comparison_series, build_index_trend_series, build_map_model, build_statement_panels,
    ChartSeries, MapModel, PanelPairSpec, StatementPanels,
};
use crate::state::SelectionState;

/// One dropdown entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionItem {
    pub label: String,
    pub value: String,
}

/// Everything one render produces for the UI shell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardView {
    pub map: MapModel,
    pub index_options: Vec<OptionItem>,
    pub trend: Vec<ChartSeries>,
    pub country_options: Vec<OptionItem>,
    pub stock_options: Vec<OptionItem>,
    pub selected_stocks: Vec<TickerRow>,
    pub comparison: Vec<ChartSeries>,
    pub income: StatementPanels,
    pub balance_sheet: StatementPanels,
}

/// Index dropdown entries in snapshot order: `"{name}({country})"`.
pub fn index_options(rows: &[IndexRow]) -> Vec<OptionItem> {
    rows.iter()
        .map(|row| OptionItem {
            label: format!("{}({})", row.display_name, row.country_name),
            value: row.symbol.as_str().to_owned(),
        })
        .collect()
}

/// Country dropdown entries in first-appearance order.
pub fn country_options(catalog: &TickerCatalog) -> Vec<OptionItem> {
    catalog
        .countries()
        .into_iter()
        .map(|country| OptionItem {
            label: country.to_owned(),
            value: country.to_owned(),
        })
        .collect()
}

/// Stock dropdown entries for one country: `"{name} - {exchange}"`.
pub fn stock_options(catalog: &TickerCatalog, country: &str) -> Vec<OptionItem> {
    if country.is_empty() {
        return Vec::new();
    }

    catalog
        .for_country(country)
        .into_iter()
        .map(|row| OptionItem {
            label: format!("{} - {}", row.name, row.exchange),
            value: row.ticker.as_str().to_owned(),
        })
        .collect()
}

/// The selected-stocks table rows, in catalog order. Stale identities not
/// present in the catalog simply contribute no row.
pub fn selected_stock_rows(catalog: &TickerCatalog, selected: &[Symbol]) -> Vec<TickerRow> {
    catalog
        .rows()
        .iter()
        .filter(|row| selected.contains(&row.ticker))
        .cloned()
        .collect()
}

/// Fetch and enrich a fresh snapshot. The new rows replace any previous
/// snapshot wholesale; the update is explicit, never timer-driven.
pub async fn fetch_snapshot(
    catalog: &geotick_core::IndexCatalog,
    source: &dyn MarketDataSource,
) -> Result<Vec<IndexRow>, SnapshotError> {
    let request = SnapshotRequest::new(catalog.symbols())?;
    let raw = source.snapshot(request).await?;
    Ok(catalog.enrich(&raw)?)
}

/// Snapshot fetch-and-enrich failures. Unlike per-series fetches these are
/// fatal to the render that needed them.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Catalog(#[from] geotick_core::CatalogError),
}

/// Produce every chart model and option list for the given state.
///
/// Sibling chart builds run concurrently and join in a fixed order; each
/// degrades independently on fetch failure.
pub async fn render(
    state: &SelectionState,
    rows: &[IndexRow],
    tickers: &TickerCatalog,
    source: &dyn MarketDataSource,
    now: UtcDateTime,
) -> DashboardView {
    let map = build_map_model(rows, &state.selected_indices);

    let income_spec = PanelPairSpec::income();
    let balance_sheet_spec = PanelPairSpec::balance_sheet();
    let (trend, comparison, income, balance_sheet) = tokio::join!(
        build_index_trend_series(rows, &state.selected_indices, source, now),
        build_comparison_series(&state.selected_tickers, state.duration, source, now),
        build_statement_panels(
            &state.selected_tickers,
            state.statement_period,
            StatementKind::Income,
            &income_spec,
            source,
        ),
        build_statement_panels(
            &state.selected_tickers,
            state.statement_period,
            StatementKind::BalanceSheet,
            &balance_sheet_spec,
            source,
        ),
    );

    DashboardView {
        map,
        index_options: index_options(rows),
        trend,
        country_options: country_options(tickers),
        stock_options: stock_options(tickers, &state.selected_country),
        selected_stocks: selected_stock_rows(tickers, &state.selected_tickers),
        comparison,
        income,
        balance_sheet,
    }
}

#[cfg(test)]
mod tests {
    use geotick_core::{IndexCatalog, IndexQuote, Symbol, YahooAdapter};

    use super::*;

    fn symbol(raw: &str) -> Symbol {
        Symbol::parse(raw).expect("valid symbol")
    }

    fn rows() -> Vec<IndexRow> {
        let catalog = IndexCatalog::world();
        let snapshot = vec![
            IndexQuote::new(symbol("^GSPC"), "S&P 500", 5_000.0, 10.0, 0.2).expect("quote"),
            IndexQuote::new(symbol("^FTSE"), "FTSE 100", 7_500.0, -3.0, -0.04).expect("quote"),
        ];
        catalog.enrich(&snapshot).expect("covered symbols")
    }

    #[test]
    fn index_options_use_name_and_country() {
        let options = index_options(&rows());
        assert_eq!(options[0].label, "S&P 500(USA)");
        assert_eq!(options[0].value, "^GSPC");
        assert_eq!(options[1].label, "FTSE 100(UK)");
    }

    #[test]
    fn stock_options_use_name_and_exchange() {
        let catalog = TickerCatalog::fixture();
        let options = stock_options(&catalog, "USA");
        assert_eq!(options[0].label, "Apple Inc. - NASDAQ");
        assert_eq!(options[0].value, "AAPL");
    }

    #[test]
    fn empty_country_yields_no_stock_options() {
        let catalog = TickerCatalog::fixture();
        assert!(stock_options(&catalog, "").is_empty());
    }

    #[test]
    fn selected_stock_rows_follow_catalog_order() {
        let catalog = TickerCatalog::fixture();
        let table = selected_stock_rows(&catalog, &[symbol("MSFT"), symbol("AAPL")]);

        let tickers: Vec<&str> = table.iter().map(|row| row.ticker.as_str()).collect();
        assert_eq!(tickers, ["AAPL", "MSFT"]);
    }

    #[tokio::test]
    async fn render_produces_every_section_against_the_fixture_source() {
        let source = YahooAdapter::offline();
        let tickers = TickerCatalog::fixture();
        let rows = rows();
        let state = SelectionState::default_for_snapshot(&rows)
            .select_tickers(&[symbol("AAPL"), symbol("MSFT")]);
        let now = UtcDateTime::parse("2025-08-01T00:00:00Z").expect("timestamp");

        let view = render(&state, &rows, &tickers, &source, now).await;

        assert_eq!(view.map.regions.len(), 2);
        assert_eq!(view.trend.len(), 1);
        assert_eq!(view.trend[0].legend, "S&P 500(USD)");
        assert_eq!(view.comparison.len(), 2);
        assert_eq!(view.income.primary.series.len(), 2);
        assert_eq!(view.balance_sheet.secondary.series.len(), 2);
        assert_eq!(view.selected_stocks.len(), 2);
        assert!(!view.country_options.is_empty());
    }
}
