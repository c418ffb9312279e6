//! Market-data source contract and request/response types.
//!
//! [`MarketDataSource`] is the boundary between the dashboard core and
//! whatever upstream provides quotes. Three operations cover the whole
//! dashboard:
//!
//! | Operation | Request | Response |
//! |-----------|---------|----------|
//! | Snapshot | [`SnapshotRequest`] | `Vec<IndexQuote>` |
//! | History | [`HistoryRequest`] | [`PriceHistory`] |
//! | Statement | [`StatementRequest`] | [`StatementTable`] |
//!
//! Request constructors validate their inputs so adapters never see a
//! malformed request. Calls are independent, read-only, and side-effect
//! free; callers may run them concurrently within one render.

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use crate::{
    IndexQuote, PriceHistory, ProviderId, StatementKind, StatementPeriod, StatementTable, Symbol,
    UtcDateTime,
};

/// Source-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    Unavailable,
    RateLimited,
    InvalidRequest,
    Internal,
}

/// Structured source error surfaced by adapter calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
    retryable: bool,
}

impl SourceError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Unavailable,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::RateLimited,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::InvalidRequest,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Internal,
            message: message.into(),
            retryable: false,
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::RateLimited => "source.rate_limited",
            SourceErrorKind::InvalidRequest => "source.invalid_request",
            SourceErrorKind::Internal => "source.internal",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

/// Request payload for the world-index snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotRequest {
    pub symbols: Vec<Symbol>,
}

impl SnapshotRequest {
    pub fn new(symbols: Vec<Symbol>) -> Result<Self, SourceError> {
        if symbols.is_empty() {
            return Err(SourceError::invalid_request(
                "snapshot request must include at least one symbol",
            ));
        }
        Ok(Self { symbols })
    }
}

/// Request payload for daily price history over a date window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRequest {
    pub symbol: Symbol,
    pub start: UtcDateTime,
    pub end: UtcDateTime,
}

impl HistoryRequest {
    pub fn new(symbol: Symbol, start: UtcDateTime, end: UtcDateTime) -> Result<Self, SourceError> {
        if start >= end {
            return Err(SourceError::invalid_request(
                "history window start must precede end",
            ));
        }
        Ok(Self { symbol, start, end })
    }
}

/// Request payload for a financial-statement table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementRequest {
    pub symbol: Symbol,
    pub kind: StatementKind,
    pub period: StatementPeriod,
}

impl StatementRequest {
    pub fn new(symbol: Symbol, kind: StatementKind, period: StatementPeriod) -> Self {
        Self {
            symbol,
            kind,
            period,
        }
    }
}

/// Market-data source contract.
///
/// Implementations must be `Send + Sync`; the renderer may issue sibling
/// calls concurrently and joins results in selection order.
pub trait MarketDataSource: Send + Sync {
    /// Returns the provider identifier used in envelopes and logs.
    fn id(&self) -> ProviderId;

    /// Fetches current quotes for the requested index symbols.
    ///
    /// The response preserves request order; a symbol the upstream cannot
    /// quote is an error, not a silently shorter table.
    fn snapshot<'a>(
        &'a self,
        req: SnapshotRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<IndexQuote>, SourceError>> + Send + 'a>>;

    /// Fetches daily close/adjusted-close history for one symbol.
    fn history<'a>(
        &'a self,
        req: HistoryRequest,
    ) -> Pin<Box<dyn Future<Output = Result<PriceHistory, SourceError>> + Send + 'a>>;

    /// Fetches an income or balance-sheet statement table.
    fn statement<'a>(
        &'a self,
        req: StatementRequest,
    ) -> Pin<Box<dyn Future<Output = Result<StatementTable, SourceError>> + Send + 'a>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_request_requires_symbols() {
        let err = SnapshotRequest::new(Vec::new()).expect_err("must fail");
        assert_eq!(err.kind(), SourceErrorKind::InvalidRequest);
        assert!(!err.retryable());
    }

    #[test]
    fn history_request_rejects_inverted_window() {
        let start = UtcDateTime::parse("2024-02-01T00:00:00Z").expect("timestamp");
        let end = UtcDateTime::parse("2024-01-01T00:00:00Z").expect("timestamp");

        let err = HistoryRequest::new(Symbol::parse("AAPL").expect("symbol"), start, end)
            .expect_err("must fail");
        assert_eq!(err.code(), "source.invalid_request");
    }
}
