//! Reference catalogs loaded once at startup.
//!
//! [`IndexCatalog`] maps every world-index symbol the snapshot source can
//! return to its country name, currency code, and map location code, and
//! enriches raw snapshot rows into [`IndexRow`]s. [`TickerCatalog`] is the
//! read-only table of tradable tickers behind the country and stock
//! dropdowns.
//!
//! Both catalogs treat gaps as configuration bugs: an unmapped snapshot
//! symbol fails enrichment, and a malformed ticker row fails the load.

use std::io;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::{IndexQuote, IndexRow, Symbol, TickerRow, ValidationError};

/// Catalog loading and enrichment errors.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("snapshot symbol '{symbol}' has no index-catalog entry")]
    UnknownSymbol { symbol: Symbol },

    #[error("ticker catalog row {row}: {source}")]
    InvalidRow {
        row: usize,
        source: ValidationError,
    },

    #[error("ticker catalog parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct IndexCatalogEntry {
    symbol: Symbol,
    country_name: &'static str,
    currency_code: &'static str,
    country_code: &'static str,
}

/// In-memory table of world-index metadata keyed by symbol.
#[derive(Debug, Clone)]
pub struct IndexCatalog {
    entries: Vec<IndexCatalogEntry>,
}

/// `(symbol, country name, currency code, map location code)` for every
/// index the snapshot source lists. Must stay exhaustive for that source.
const WORLD_INDICES: &[(&str, &str, &str, &str)] = &[
    ("^GSPC", "USA", "USD", "USA"),
    ("^DJI", "USA", "USD", "USA"),
    ("^IXIC", "USA", "USD", "USA"),
    ("^NYA", "USA", "USD", "USA"),
    ("^XAX", "Canada", "CAD", "CAN"),
    ("^BUK100P", "UK", "GBP", "GBR"),
    ("^RUT", "USA", "USD", "USA"),
    ("^VIX", "USA", "USD", "USA"),
    ("^FTSE", "UK", "GBP", "GBR"),
    ("^GDAXI", "Germany", "EUR", "DEU"),
    ("^FCHI", "France", "EUR", "FRA"),
    ("^STOXX50E", "Europe", "EUR", "EU"),
    ("^N100", "Europe", "EUR", "EU"),
    ("^BFX", "Belgium", "EUR", "BEL"),
    ("IMOEX.ME", "Russia", "RUB", "RUS"),
    ("^N225", "Japan", "JPY", "JPN"),
    ("^HSI", "Hong Kong", "HKD", "HKG"),
    ("000001.SS", "China", "CNY", "CHN"),
    ("399001.SZ", "China", "CNY", "CHN"),
    ("^STI", "Singapore", "SGD", "SGP"),
    ("^AXJO", "Australia", "AUD", "AUS"),
    ("^AORD", "Australia", "AUD", "AUS"),
    ("^BSESN", "India", "INR", "IND"),
    ("^JKSE", "Indonesia", "IDR", "IDN"),
    ("^KLSE", "Malaysia", "MYR", "MYS"),
    ("^NZ50", "New Zealand", "NZD", "NZL"),
    ("^KS11", "South Korea", "KRW", "KOR"),
    ("^TWII", "Taiwan", "TWD", "TWN"),
    ("^GSPTSE", "Canada", "CAD", "CAN"),
    ("^BVSP", "Brazil", "BRL", "BRA"),
    ("^MXX", "Mexico", "MXN", "MEX"),
    ("^IPSA", "Chile", "CLP", "CHL"),
    ("^MERV", "Argentina", "ARS", "ARG"),
    ("^TA125.TA", "Israel", "ILS", "ISR"),
    ("^CASE30", "Egypt", "EGP", "EGY"),
    ("^JN0U.JO", "South Africa", "ZAR", "ZAF"),
];

impl IndexCatalog {
    /// The built-in world-index table.
    pub fn world() -> Self {
        let entries = WORLD_INDICES
            .iter()
            .map(
                |&(symbol, country_name, currency_code, country_code)| IndexCatalogEntry {
                    symbol: Symbol::parse(symbol).expect("catalog symbols are valid"),
                    country_name,
                    currency_code,
                    country_code,
                },
            )
            .collect();

        Self { entries }
    }

    /// Catalog symbols in table order. Drives the snapshot fetch request.
    pub fn symbols(&self) -> Vec<Symbol> {
        self.entries
            .iter()
            .map(|entry| entry.symbol.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn get(&self, symbol: &Symbol) -> Option<&IndexCatalogEntry> {
        self.entries.iter().find(|entry| &entry.symbol == symbol)
    }

    /// Attach country and currency metadata to a raw snapshot.
    ///
    /// Total for fully covered snapshots; preserves row count and order.
    /// The first unmapped symbol fails the whole enrichment — a partial
    /// mapping is a configuration bug, not a row to drop.
    pub fn enrich(&self, snapshot: &[IndexQuote]) -> Result<Vec<IndexRow>, CatalogError> {
        snapshot
            .iter()
            .map(|quote| {
                let entry =
                    self.get(&quote.symbol)
                        .ok_or_else(|| CatalogError::UnknownSymbol {
                            symbol: quote.symbol.clone(),
                        })?;

                IndexRow::new(
                    quote.clone(),
                    entry.country_name,
                    entry.currency_code,
                    entry.country_code,
                )
                .map_err(CatalogError::from)
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct RawTickerRecord {
    #[serde(rename = "Ticker")]
    ticker: String,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Country", default)]
    country: String,
    #[serde(rename = "Exchange", default)]
    exchange: String,
}

/// Read-only reference table of tradable tickers.
#[derive(Debug, Clone)]
pub struct TickerCatalog {
    rows: Vec<TickerRow>,
}

impl TickerCatalog {
    /// Load from CSV with `Ticker,Name,Country,Exchange` columns.
    pub fn from_csv_reader(reader: impl io::Read) -> Result<Self, CatalogError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut rows = Vec::new();

        for (index, record) in csv_reader.deserialize::<RawTickerRecord>().enumerate() {
            let record = record?;
            let ticker = Symbol::parse(&record.ticker)
                .map_err(|source| CatalogError::InvalidRow {
                    // header is line 1
                    row: index + 2,
                    source,
                })?;

            rows.push(TickerRow {
                ticker,
                name: record.name.trim().to_owned(),
                country: record.country.trim().to_owned(),
                exchange: record.exchange.trim().to_owned(),
            });
        }

        Ok(Self { rows })
    }

    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let file = std::fs::File::open(path)?;
        Self::from_csv_reader(file)
    }

    /// Small built-in catalog backing offline mode and tests.
    pub fn fixture() -> Self {
        let rows = [
            ("AAPL", "Apple Inc.", "USA", "NASDAQ"),
            ("MSFT", "Microsoft Corporation", "USA", "NASDAQ"),
            ("GOOGL", "Alphabet Inc.", "USA", "NASDAQ"),
            ("JPM", "JPMorgan Chase & Co.", "USA", "NYSE"),
            ("SHOP.TO", "Shopify Inc.", "Canada", "TSX"),
            ("RY.TO", "Royal Bank of Canada", "Canada", "TSX"),
            ("HSBA.L", "HSBC Holdings plc", "UK", "LSE"),
            ("SAP.DE", "SAP SE", "Germany", "XETRA"),
            ("7203.T", "Toyota Motor Corporation", "Japan", "TSE"),
        ]
        .into_iter()
        .map(|(ticker, name, country, exchange)| TickerRow {
            ticker: Symbol::parse(ticker).expect("fixture tickers are valid"),
            name: name.to_owned(),
            country: country.to_owned(),
            exchange: exchange.to_owned(),
        })
        .collect();

        Self { rows }
    }

    pub fn rows(&self) -> &[TickerRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, ticker: &Symbol) -> Option<&TickerRow> {
        self.rows.iter().find(|row| &row.ticker == ticker)
    }

    /// Distinct non-empty countries in order of first appearance.
    pub fn countries(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for row in &self.rows {
            if row.country.is_empty() {
                continue;
            }
            if !seen.contains(&row.country.as_str()) {
                seen.push(row.country.as_str());
            }
        }
        seen
    }

    /// Rows for one country, in catalog order.
    pub fn for_country(&self, country: &str) -> Vec<&TickerRow> {
        self.rows
            .iter()
            .filter(|row| row.country == country)
            .collect()
    }
}
