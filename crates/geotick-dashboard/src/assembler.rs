//! Chart assembly: prepared records + selection state in, chart-ready
//! series out.
//!
//! Everything here is recomputed from scratch per render. Fetch failures
//! degrade to an empty series for the affected trace only; sibling traces
//! in the same render are never blanked.

use serde::{Deserialize, Serialize};
use tracing::warn;

use geotick_core::{
    DurationDays, HistoryRequest, IndexRow, MarketDataSource, PriceHistory, StatementKind,
    StatementPeriod, StatementRequest, StatementTable, Symbol, UtcDateTime,
};

/// Fixed lookback for the index growth-trend chart: five years of daily
/// closes regardless of the comparison duration.
pub const TREND_WINDOW_DAYS: u32 = 1825;

/// Marker appended to a colliding legend until it is unique.
const LEGEND_COPY_MARKER: &str = " (Copy)";

/// Binary map-coloring class.
///
/// `change == 0` classifies as `Negative`; the boundary is part of the
/// observed product behavior and must not drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeTone {
    Positive,
    Negative,
}

impl ChangeTone {
    pub fn from_change(change: f64) -> Self {
        if change > 0.0 {
            Self::Positive
        } else {
            Self::Negative
        }
    }
}

/// Hover payload for one map region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoverCard {
    pub country_name: String,
    pub symbol: Symbol,
    pub display_name: String,
    pub last_price: f64,
    pub change: f64,
    pub percent_change: f64,
}

/// One colored region of the world map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapRegion {
    pub country_code: String,
    pub tone: ChangeTone,
    pub hover: HoverCard,
}

/// World-map chart model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapModel {
    pub regions: Vec<MapRegion>,
    /// Selected index identities present in the rendered rows, for the UI
    /// shell to outline.
    pub highlighted: Vec<Symbol>,
}

/// One (x, y) chart sample. `x` is an ISO date for price series and a
/// period label for statement bars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub x: String,
    pub y: f64,
}

/// One named line-chart trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub legend: String,
    pub points: Vec<ChartPoint>,
}

/// Bar colors from the fixed per-panel-family palettes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BarColor {
    RoyalBlue,
    Green,
    Blue,
    Orange,
}

impl BarColor {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RoyalBlue => "royalblue",
            Self::Green => "green",
            Self::Blue => "blue",
            Self::Orange => "orange",
        }
    }
}

/// One grouped-bar trace. Color is assigned by selection order, not ticker
/// identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarSeries {
    pub legend: String,
    pub color: BarColor,
    pub bars: Vec<ChartPoint>,
}

/// One statement subplot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Panel {
    pub title: String,
    pub series: Vec<BarSeries>,
}

/// The two stacked statement subplots for one statement family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementPanels {
    pub primary: Panel,
    pub secondary: Panel,
}

/// What one statement panel extracts and how it labels it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelSpec {
    pub title: String,
    pub line_item: String,
    pub legend_label: String,
}

/// The two fixed line items a statement chart plots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelPairSpec {
    pub primary: PanelSpec,
    pub secondary: PanelSpec,
}

impl PanelPairSpec {
    /// Revenue / net income, as the income chart plots them.
    pub fn income() -> Self {
        Self {
            primary: PanelSpec {
                title: String::from("Revenue Statement"),
                line_item: String::from("Total Revenue"),
                legend_label: String::from("Revenue"),
            },
            secondary: PanelSpec {
                title: String::from("Net Income Statement"),
                line_item: String::from("Net Income"),
                legend_label: String::from("Net Income"),
            },
        }
    }

    /// Assets / liabilities, as the balance-sheet chart plots them.
    pub fn balance_sheet() -> Self {
        Self {
            primary: PanelSpec {
                title: String::from("Total Assets"),
                line_item: String::from("Total Assets"),
                legend_label: String::from("Total Assets"),
            },
            secondary: PanelSpec {
                title: String::from("Total Liabilities Net Minority Interest"),
                line_item: String::from("Total Liabilities Net Minority Interest"),
                legend_label: String::from("Total Liabilities Net Minority Interest"),
            },
        }
    }
}

const fn statement_palette(kind: StatementKind) -> [BarColor; 2] {
    match kind {
        StatementKind::Income => [BarColor::RoyalBlue, BarColor::Green],
        StatementKind::BalanceSheet => [BarColor::Blue, BarColor::Orange],
    }
}

/// Build the world-map model: one region per distinct country code, first
/// snapshot row per code wins (matching map-click resolution).
pub fn build_map_model(rows: &[IndexRow], highlighted: &[Symbol]) -> MapModel {
    let mut regions: Vec<MapRegion> = Vec::new();

    for row in rows {
        if regions
            .iter()
            .any(|region| region.country_code == row.country_code)
        {
            continue;
        }

        regions.push(MapRegion {
            country_code: row.country_code.clone(),
            tone: ChangeTone::from_change(row.change),
            hover: HoverCard {
                country_name: row.country_name.clone(),
                symbol: row.symbol.clone(),
                display_name: row.display_name.clone(),
                last_price: row.last_price,
                change: row.change,
                percent_change: row.percent_change,
            },
        });
    }

    let highlighted = highlighted
        .iter()
        .filter(|id| rows.iter().any(|row| row.symbol == **id))
        .cloned()
        .collect();

    MapModel {
        regions,
        highlighted,
    }
}

/// Build the growth-trend series for the selected indices, in selection
/// order, over the fixed five-year window.
///
/// A selection identity with no matching row (stale after a snapshot
/// refresh) is skipped; a duplicate identity is fetched and plotted once.
pub async fn build_index_trend_series(
    rows: &[IndexRow],
    selected: &[Symbol],
    source: &dyn MarketDataSource,
    now: UtcDateTime,
) -> Vec<ChartSeries> {
    let start = now.minus_days(TREND_WINDOW_DAYS);
    let mut plotted: Vec<Symbol> = Vec::new();
    let mut assigned_legends: Vec<String> = Vec::new();
    let mut series = Vec::new();

    for id in selected {
        if plotted.contains(id) {
            continue;
        }
        let Some(row) = rows.iter().find(|row| &row.symbol == id) else {
            warn!(symbol = %id, "selected index not present in snapshot; skipping");
            continue;
        };
        plotted.push(id.clone());

        let legend = disambiguate_legend(
            format!("{}({})", row.display_name, row.currency_code),
            &assigned_legends,
        );
        assigned_legends.push(legend.clone());

        let points = fetch_points(source, id, start, now, PriceField::Close).await;
        series.push(ChartSeries { legend, points });
    }

    series
}

/// Build the comparison series for up to two tickers over the selected
/// duration, adjusted close, legend `"{ticker} Price"`.
///
/// The two fetches run concurrently; output order follows selection order,
/// never completion order. Zero tickers is an explicitly empty chart.
pub async fn build_comparison_series(
    tickers: &[Symbol],
    duration: DurationDays,
    source: &dyn MarketDataSource,
    now: UtcDateTime,
) -> Vec<ChartSeries> {
    let start = now.minus_days(duration.as_days());

    match tickers {
        [] => Vec::new(),
        [only] => vec![comparison_series(only, start, now, source).await],
        [first, second, ..] => {
            let (first_series, second_series) = tokio::join!(
                comparison_series(first, start, now, source),
                comparison_series(second, start, now, source),
            );
            vec![first_series, second_series]
        }
    }
}

async fn comparison_series(
    ticker: &Symbol,
    start: UtcDateTime,
    end: UtcDateTime,
    source: &dyn MarketDataSource,
) -> ChartSeries {
    ChartSeries {
        legend: format!("{ticker} Price"),
        points: fetch_points(source, ticker, start, end, PriceField::AdjClose).await,
    }
}

/// Build the two-panel statement chart for up to two tickers.
///
/// Each ticker's statement is fetched once and feeds both panels. Colors
/// come from the statement family's fixed palette by selection order. A
/// failed fetch or missing line item yields an empty bar series for that
/// ticker/panel pair only.
pub async fn build_statement_panels(
    tickers: &[Symbol],
    period: StatementPeriod,
    kind: StatementKind,
    spec: &PanelPairSpec,
    source: &dyn MarketDataSource,
) -> StatementPanels {
    let palette = statement_palette(kind);

    let tables: Vec<(&Symbol, Option<StatementTable>)> = match tickers {
        [] => Vec::new(),
        [only] => vec![(only, fetch_statement(source, only, kind, period).await)],
        [first, second, ..] => {
            let (first_table, second_table) = tokio::join!(
                fetch_statement(source, first, kind, period),
                fetch_statement(source, second, kind, period),
            );
            vec![(first, first_table), (second, second_table)]
        }
    };

    let mut primary = Panel {
        title: spec.primary.title.clone(),
        series: Vec::new(),
    };
    let mut secondary = Panel {
        title: spec.secondary.title.clone(),
        series: Vec::new(),
    };

    for (index, (ticker, table)) in tables.iter().enumerate() {
        let color = palette[index % palette.len()];
        primary
            .series
            .push(bar_series(ticker, color, table.as_ref(), &spec.primary));
        secondary
            .series
            .push(bar_series(ticker, color, table.as_ref(), &spec.secondary));
    }

    StatementPanels { primary, secondary }
}

/// Append the copy marker until the legend is unique within this render.
fn disambiguate_legend(base: String, assigned: &[String]) -> String {
    let mut legend = base;
    while assigned.contains(&legend) {
        legend.push_str(LEGEND_COPY_MARKER);
    }
    legend
}

#[derive(Debug, Clone, Copy)]
enum PriceField {
    Close,
    AdjClose,
}

async fn fetch_points(
    source: &dyn MarketDataSource,
    symbol: &Symbol,
    start: UtcDateTime,
    end: UtcDateTime,
    field: PriceField,
) -> Vec<ChartPoint> {
    let request = match HistoryRequest::new(symbol.clone(), start, end) {
        Ok(request) => request,
        Err(error) => {
            warn!(symbol = %symbol, %error, "invalid history window; rendering empty series");
            return Vec::new();
        }
    };

    match source.history(request).await {
        Ok(history) => history_points(&history, field),
        Err(error) => {
            warn!(symbol = %symbol, %error, "history fetch failed; rendering empty series");
            Vec::new()
        }
    }
}

fn history_points(history: &PriceHistory, field: PriceField) -> Vec<ChartPoint> {
    history
        .points
        .iter()
        .map(|point| ChartPoint {
            x: point.ts.format_date(),
            y: match field {
                PriceField::Close => point.close,
                PriceField::AdjClose => point.adj_close,
            },
        })
        .collect()
}

async fn fetch_statement(
    source: &dyn MarketDataSource,
    ticker: &Symbol,
    kind: StatementKind,
    period: StatementPeriod,
) -> Option<StatementTable> {
    let request = StatementRequest::new(ticker.clone(), kind, period);
    match source.statement(request).await {
        Ok(table) => Some(table),
        Err(error) => {
            warn!(ticker = %ticker, %kind, %error, "statement fetch failed; rendering empty panel");
            None
        }
    }
}

fn bar_series(
    ticker: &Symbol,
    color: BarColor,
    table: Option<&StatementTable>,
    spec: &PanelSpec,
) -> BarSeries {
    let bars = table
        .and_then(|table| table.line_item(&spec.line_item))
        .map(|item| {
            item.values
                .iter()
                .map(|value| ChartPoint {
                    x: value.period.clone(),
                    y: value.value,
                })
                .collect()
        })
        .unwrap_or_default();

    BarSeries {
        legend: format!("{ticker} {}", spec.legend_label),
        color,
        bars,
    }
}
