// Shared fixtures for the geotick behavioral test suites.

use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;
use std::time::Duration;

pub use geotick_core::{
    CatalogError, HistoryRequest, IndexCatalog, IndexQuote, IndexRow, MarketDataSource,
    PriceHistory, PricePoint, ProviderId, SnapshotRequest, SourceError, StatementKind,
    StatementRequest, StatementTable, StatementValue, Symbol, TickerCatalog, UtcDateTime,
};

pub fn symbol(raw: &str) -> Symbol {
    Symbol::parse(raw).expect("valid symbol")
}

pub fn test_now() -> UtcDateTime {
    UtcDateTime::parse("2025-08-01T00:00:00Z").expect("timestamp")
}

/// Build a raw snapshot from `(symbol, name, last_price, change)` rows.
pub fn raw_snapshot(rows: &[(&str, &str, f64, f64)]) -> Vec<IndexQuote> {
    rows.iter()
        .map(|&(raw_symbol, name, last_price, change)| {
            IndexQuote::new(symbol(raw_symbol), name, last_price, change, change / 10.0)
                .expect("valid quote")
        })
        .collect()
}

/// Enrich a raw snapshot through the world catalog.
pub fn enriched(rows: &[(&str, &str, f64, f64)]) -> Vec<IndexRow> {
    IndexCatalog::world()
        .enrich(&raw_snapshot(rows))
        .expect("snapshot symbols are catalog-covered")
}

/// Scripted market-data source: canned data, recorded requests, optional
/// per-symbol failures and delays.
#[derive(Default)]
pub struct RecordingSource {
    pub snapshot_rows: Vec<IndexQuote>,
    pub fail_history_for: Vec<Symbol>,
    pub fail_statement_for: Vec<Symbol>,
    /// Per-symbol artificial latency, for completion-order scenarios.
    pub history_delays_ms: Vec<(Symbol, u64)>,
    pub history_requests: Mutex<Vec<HistoryRequest>>,
    pub statement_requests: Mutex<Vec<StatementRequest>>,
}

impl RecordingSource {
    pub fn with_snapshot(rows: Vec<IndexQuote>) -> Self {
        Self {
            snapshot_rows: rows,
            ..Self::default()
        }
    }

    pub fn history_requests(&self) -> Vec<HistoryRequest> {
        self.history_requests
            .lock()
            .expect("request store should not be poisoned")
            .clone()
    }
}

impl MarketDataSource for RecordingSource {
    fn id(&self) -> ProviderId {
        ProviderId::Fixture
    }

    fn snapshot<'a>(
        &'a self,
        req: SnapshotRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<IndexQuote>, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            let _ = req;
            Ok(self.snapshot_rows.clone())
        })
    }

    fn history<'a>(
        &'a self,
        req: HistoryRequest,
    ) -> Pin<Box<dyn Future<Output = Result<PriceHistory, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            self.history_requests
                .lock()
                .expect("request store should not be poisoned")
                .push(req.clone());

            if let Some((_, delay)) = self
                .history_delays_ms
                .iter()
                .find(|(delayed, _)| delayed == &req.symbol)
            {
                tokio::time::sleep(Duration::from_millis(*delay)).await;
            }

            if self.fail_history_for.contains(&req.symbol) {
                return Err(SourceError::unavailable("scripted history outage"));
            }

            let points = (0..5)
                .map(|day| {
                    let ts = req.end.minus_days(5 - day);
                    PricePoint::new(ts, 100.0 + day as f64, 99.0 + day as f64)
                        .expect("scripted point")
                })
                .collect();
            Ok(PriceHistory::new(req.symbol, points))
        })
    }

    fn statement<'a>(
        &'a self,
        req: StatementRequest,
    ) -> Pin<Box<dyn Future<Output = Result<StatementTable, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            self.statement_requests
                .lock()
                .expect("request store should not be poisoned")
                .push(req.clone());

            if self.fail_statement_for.contains(&req.symbol) {
                return Err(SourceError::unavailable("scripted statement outage"));
            }

            let names = match req.kind {
                StatementKind::Income => ["Total Revenue", "Net Income"],
                StatementKind::BalanceSheet => {
                    ["Total Assets", "Total Liabilities Net Minority Interest"]
                }
            };

            let mut table = StatementTable::new(req.symbol.clone(), req.kind, req.period);
            for name in names {
                table.push_line_item(
                    name,
                    vec![
                        StatementValue {
                            period: String::from("2023-12-31"),
                            value: 1_000_000.0,
                        },
                        StatementValue {
                            period: String::from("2024-12-31"),
                            value: 1_250_000.0,
                        },
                    ],
                );
            }
            Ok(table)
        })
    }
}
