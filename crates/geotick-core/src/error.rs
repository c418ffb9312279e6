use thiserror::Error;

/// Validation and contract errors exposed by `geotick-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("symbol must start with a letter, digit, or '^': '{ch}'")]
    SymbolInvalidStart { ch: char },
    #[error("symbol contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },

    #[error("invalid duration '{days}' days, expected one of 30, 90, 180, 365, 1095, 1825")]
    InvalidDuration { days: u32 },
    #[error("invalid statement period '{value}', expected 'yearly' or 'quarterly'")]
    InvalidStatementPeriod { value: String },
    #[error("invalid statement kind '{value}', expected 'income' or 'balance-sheet'")]
    InvalidStatementKind { value: String },
    #[error("invalid provider '{value}', expected one of yahoo, fixture")]
    InvalidProvider { value: String },

    #[error("timestamp must be RFC3339 UTC (suffix Z): '{value}'")]
    TimestampNotUtc { value: String },
    #[error("timestamp out of representable range: {seconds}")]
    TimestampOutOfRange { seconds: i64 },

    #[error("currency must be a 3-letter uppercase ISO code: '{value}'")]
    InvalidCurrency { value: String },
    #[error("country code must be 2-3 uppercase ASCII letters: '{value}'")]
    InvalidCountryCode { value: String },

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
    #[error("field '{field}' must be non-negative")]
    NegativeValue { field: &'static str },
}

/// Top-level error type for core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
