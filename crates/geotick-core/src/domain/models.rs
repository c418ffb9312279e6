use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Symbol, UtcDateTime, ValidationError};

/// Raw world-index quote row as the snapshot source returns it.
///
/// Rows keep source order; enrichment preserves it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexQuote {
    pub symbol: Symbol,
    pub name: String,
    pub last_price: f64,
    pub change: f64,
    pub percent_change: f64,
}

impl IndexQuote {
    pub fn new(
        symbol: Symbol,
        name: impl Into<String>,
        last_price: f64,
        change: f64,
        percent_change: f64,
    ) -> Result<Self, ValidationError> {
        validate_non_negative("last_price", last_price)?;
        validate_finite("change", change)?;
        validate_finite("percent_change", percent_change)?;

        Ok(Self {
            symbol,
            name: name.into(),
            last_price,
            change,
            percent_change,
        })
    }
}

/// Snapshot row enriched with country and currency metadata.
///
/// Identity is the symbol; the row is immutable after enrichment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexRow {
    pub symbol: Symbol,
    pub display_name: String,
    pub last_price: f64,
    pub change: f64,
    pub percent_change: f64,
    pub country_name: String,
    pub currency_code: String,
    pub country_code: String,
}

impl IndexRow {
    pub fn new(
        quote: IndexQuote,
        country_name: impl Into<String>,
        currency_code: impl AsRef<str>,
        country_code: impl AsRef<str>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            symbol: quote.symbol,
            display_name: quote.name,
            last_price: quote.last_price,
            change: quote.change,
            percent_change: quote.percent_change,
            country_name: country_name.into(),
            currency_code: validate_currency_code(currency_code.as_ref())?,
            country_code: validate_country_code(country_code.as_ref())?,
        })
    }
}

/// One tradable-ticker reference row from the ticker catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerRow {
    pub ticker: Symbol,
    pub name: String,
    pub country: String,
    pub exchange: String,
}

/// One daily history sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub ts: UtcDateTime,
    pub close: f64,
    pub adj_close: f64,
}

impl PricePoint {
    pub fn new(ts: UtcDateTime, close: f64, adj_close: f64) -> Result<Self, ValidationError> {
        validate_non_negative("close", close)?;
        validate_non_negative("adj_close", adj_close)?;

        Ok(Self {
            ts,
            close,
            adj_close,
        })
    }
}

/// Daily price history for one symbol, ascending by date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceHistory {
    pub symbol: Symbol,
    pub points: Vec<PricePoint>,
}

impl PriceHistory {
    pub fn new(symbol: Symbol, points: Vec<PricePoint>) -> Self {
        Self { symbol, points }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// One statement column: a reported period and its value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementValue {
    pub period: String,
    pub value: f64,
}

/// One statement row: a named line item and its reported columns.
///
/// Periods with no reported value are absent, not null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItemSeries {
    pub name: String,
    pub values: Vec<StatementValue>,
}

/// Financial-statement table keyed by line-item display name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementTable {
    pub symbol: Symbol,
    pub kind: StatementKind,
    pub period: StatementPeriod,
    pub line_items: Vec<LineItemSeries>,
}

impl StatementTable {
    pub fn new(symbol: Symbol, kind: StatementKind, period: StatementPeriod) -> Self {
        Self {
            symbol,
            kind,
            period,
            line_items: Vec::new(),
        }
    }

    pub fn push_line_item(&mut self, name: impl Into<String>, values: Vec<StatementValue>) {
        self.line_items.push(LineItemSeries {
            name: name.into(),
            values,
        });
    }

    pub fn line_item(&self, name: &str) -> Option<&LineItemSeries> {
        self.line_items.iter().find(|item| item.name == name)
    }
}

/// Enumerated comparison-chart lookback windows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum DurationDays {
    D30,
    D90,
    D180,
    #[default]
    D365,
    D1095,
    D1825,
}

impl DurationDays {
    pub const ALL: [Self; 6] = [
        Self::D30,
        Self::D90,
        Self::D180,
        Self::D365,
        Self::D1095,
        Self::D1825,
    ];

    /// Out-of-set day counts are rejected, never clamped.
    pub fn from_days(days: u32) -> Result<Self, ValidationError> {
        match days {
            30 => Ok(Self::D30),
            90 => Ok(Self::D90),
            180 => Ok(Self::D180),
            365 => Ok(Self::D365),
            1095 => Ok(Self::D1095),
            1825 => Ok(Self::D1825),
            _ => Err(ValidationError::InvalidDuration { days }),
        }
    }

    pub const fn as_days(self) -> u32 {
        match self {
            Self::D30 => 30,
            Self::D90 => 90,
            Self::D180 => 180,
            Self::D365 => 365,
            Self::D1095 => 1095,
            Self::D1825 => 1825,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::D30 => "1 Month",
            Self::D90 => "3 Months",
            Self::D180 => "6 Months",
            Self::D365 => "1 Year",
            Self::D1095 => "3 Years",
            Self::D1825 => "5 Years",
        }
    }
}

impl TryFrom<u32> for DurationDays {
    type Error = ValidationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::from_days(value)
    }
}

impl From<DurationDays> for u32 {
    fn from(value: DurationDays) -> Self {
        value.as_days()
    }
}

/// Statement reporting granularity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatementPeriod {
    #[default]
    Yearly,
    Quarterly,
}

impl StatementPeriod {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Yearly => "yearly",
            Self::Quarterly => "quarterly",
        }
    }
}

impl Display for StatementPeriod {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatementPeriod {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "yearly" => Ok(Self::Yearly),
            "quarterly" => Ok(Self::Quarterly),
            other => Err(ValidationError::InvalidStatementPeriod {
                value: other.to_owned(),
            }),
        }
    }
}

/// Statement table family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatementKind {
    Income,
    BalanceSheet,
}

impl StatementKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::BalanceSheet => "balance-sheet",
        }
    }
}

impl Display for StatementKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatementKind {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "balance-sheet" | "balance_sheet" => Ok(Self::BalanceSheet),
            other => Err(ValidationError::InvalidStatementKind {
                value: other.to_owned(),
            }),
        }
    }
}

/// Validate and normalize currency to uppercase 3-letter code.
pub fn validate_currency_code(input: &str) -> Result<String, ValidationError> {
    let normalized = input.trim().to_ascii_uppercase();
    let is_valid = normalized.len() == 3 && normalized.chars().all(|ch| ch.is_ascii_alphabetic());

    if !is_valid {
        return Err(ValidationError::InvalidCurrency {
            value: input.to_owned(),
        });
    }

    Ok(normalized)
}

/// Validate a map-location code: ISO3, or the 2-letter region codes the
/// index catalog carries (`EU`).
pub fn validate_country_code(input: &str) -> Result<String, ValidationError> {
    let normalized = input.trim().to_ascii_uppercase();
    let is_valid = (2..=3).contains(&normalized.len())
        && normalized.chars().all(|ch| ch.is_ascii_alphabetic());

    if !is_valid {
        return Err(ValidationError::InvalidCountryCode {
            value: input.to_owned(),
        });
    }

    Ok(normalized)
}

fn validate_finite(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    Ok(())
}

fn validate_non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    validate_finite(field, value)?;
    if value < 0.0 {
        return Err(ValidationError::NegativeValue { field });
    }
    Ok(())
}
