//! # Geotick Core
//!
//! Domain contracts and data preparation for the geotick world-market
//! dashboard.
//!
//! ## Overview
//!
//! This crate provides the foundational components for geotick:
//!
//! - **Canonical domain models** for index quotes, enriched index rows,
//!   ticker references, price history, and statement tables
//! - **Reference catalogs** (world-index metadata, tradable tickers)
//! - **Market-data source trait** with snapshot/history/statement
//!   operations
//! - **Yahoo adapter** with real and deterministic fixture modes
//! - **Response envelope** with metadata and structured errors
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Market-data adapters (Yahoo, fixture mode) |
//! | [`catalog`] | IndexCatalog enrichment and TickerCatalog loading |
//! | [`circuit_breaker`] | Circuit breaker for upstream calls |
//! | [`data_source`] | Source trait and request/response types |
//! | [`domain`] | Domain models and validated newtypes |
//! | [`envelope`] | Response envelope with metadata |
//! | [`error`] | Core error types |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`source`] | Provider identifiers |
//!
//! ## Error Handling
//!
//! Catalog gaps are configuration bugs and fail loudly at enrichment;
//! per-fetch failures carry a [`SourceError`] that callers degrade to an
//! empty series at render granularity:
//!
//! ```rust
//! use geotick_core::{SourceError, SourceErrorKind};
//!
//! fn handle_error(error: SourceError) {
//!     match error.kind() {
//!         SourceErrorKind::RateLimited => {
//!             // back off and re-render later
//!         }
//!         SourceErrorKind::Unavailable => {
//!             // render that series empty
//!         }
//!         SourceErrorKind::InvalidRequest => {
//!             // report to the caller
//!         }
//!         _ => {}
//!     }
//! }
//! ```

pub mod adapters;
pub mod catalog;
pub mod circuit_breaker;
pub mod data_source;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod http_client;
pub mod source;

// Re-export commonly used types at crate root for convenience

pub use adapters::{YahooAdapter, YahooCrumbManager};

pub use catalog::{CatalogError, IndexCatalog, TickerCatalog};

pub use circuit_breaker::{CircuitBreaker, CircuitBreakerConfig, CircuitState};

pub use data_source::{
    HistoryRequest, MarketDataSource, SnapshotRequest, SourceError, SourceErrorKind,
    StatementRequest,
};

pub use domain::{
    validate_country_code, validate_currency_code, DurationDays, IndexQuote, IndexRow,
    LineItemSeries, PriceHistory, PricePoint, StatementKind, StatementPeriod, StatementTable,
    StatementValue, Symbol, TickerRow, UtcDateTime,
};

pub use envelope::{Envelope, EnvelopeError, EnvelopeMeta};

pub use error::{CoreError, ValidationError};

pub use http_client::{
    HttpAuth, HttpClient, HttpError, HttpRequest, HttpResponse, NoopHttpClient, ReqwestHttpClient,
};

pub use source::ProviderId;
