use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use serde::Deserialize;
use tracing::debug;

use crate::circuit_breaker::CircuitBreaker;
use crate::data_source::{
    HistoryRequest, MarketDataSource, SnapshotRequest, SourceError, StatementRequest,
};
use crate::http_client::{HttpClient, HttpRequest, NoopHttpClient, ReqwestHttpClient};
use crate::{
    IndexQuote, PriceHistory, PricePoint, ProviderId, StatementKind, StatementPeriod,
    StatementTable, StatementValue, Symbol, UtcDateTime, ValidationError,
};

const QUOTE_FIELDS: &str =
    "shortName,regularMarketPrice,regularMarketChange,regularMarketChangePercent";

/// `(api key suffix, display name)` for the income-statement rows the
/// dashboard plots.
const INCOME_LINE_ITEMS: &[(&str, &str)] =
    &[("TotalRevenue", "Total Revenue"), ("NetIncome", "Net Income")];

const BALANCE_LINE_ITEMS: &[(&str, &str)] = &[
    ("TotalAssets", "Total Assets"),
    (
        "TotalLiabilitiesNetMinorityInterest",
        "Total Liabilities Net Minority Interest",
    ),
];

// ============================================================================
// Crumb manager - Yahoo cookie/crumb authentication
// ============================================================================

/// Manages the crumb token Yahoo's unofficial API requires.
///
/// The session cookie lives in the transport's cookie jar; the crumb is
/// fetched from `getcrumb` once the cookie exists and is appended to data
/// URLs as a query parameter.
pub struct YahooCrumbManager {
    crumb: Mutex<Option<String>>,
    last_refresh: Mutex<Option<Instant>>,
    refreshing: AtomicBool,
    ttl_secs: u64,
}

impl Default for YahooCrumbManager {
    fn default() -> Self {
        Self {
            crumb: Mutex::new(None),
            last_refresh: Mutex::new(None),
            refreshing: AtomicBool::new(false),
            ttl_secs: 3600,
        }
    }
}

impl YahooCrumbManager {
    fn is_valid(&self) -> bool {
        let crumb = self.crumb.lock().expect("crumb lock is not poisoned");
        let last_refresh = self
            .last_refresh
            .lock()
            .expect("refresh lock is not poisoned");

        crumb.is_some()
            && last_refresh
                .map(|last| last.elapsed().as_secs() < self.ttl_secs)
                .unwrap_or(false)
    }

    pub async fn get_crumb(
        &self,
        http_client: &Arc<dyn HttpClient>,
    ) -> Result<String, SourceError> {
        if self.is_valid() {
            if let Some(crumb) = self.crumb.lock().expect("crumb lock is not poisoned").clone() {
                return Ok(crumb);
            }
        }

        self.refresh(http_client).await?;

        self.crumb
            .lock()
            .expect("crumb lock is not poisoned")
            .clone()
            .ok_or_else(|| SourceError::unavailable("failed to obtain yahoo crumb"))
    }

    async fn refresh(&self, http_client: &Arc<dyn HttpClient>) -> Result<(), SourceError> {
        if self
            .refreshing
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::Relaxed)
            .is_err()
        {
            // Another task is refreshing; give it a moment before rechecking.
            tokio::time::sleep(std::time::Duration::from_millis(100)).await;
            if self.is_valid() {
                return Ok(());
            }
        }

        let result = self.do_refresh(http_client).await;
        self.refreshing.store(false, Ordering::SeqCst);
        result
    }

    async fn do_refresh(&self, http_client: &Arc<dyn HttpClient>) -> Result<(), SourceError> {
        // Seed the session cookie jar first.
        let cookie_request = HttpRequest::get("https://fc.yahoo.com")
            .with_header("referer", "https://finance.yahoo.com/");

        let _ = http_client.execute(cookie_request).await.map_err(|e| {
            SourceError::unavailable(format!("failed to fetch yahoo cookie: {}", e.message()))
        })?;

        let crumb_endpoints = [
            "https://query1.finance.yahoo.com/v1/test/getcrumb",
            "https://query2.finance.yahoo.com/v1/test/getcrumb",
        ];

        for endpoint in crumb_endpoints {
            let request = HttpRequest::get(endpoint)
                .with_header("referer", "https://finance.yahoo.com/");

            match http_client.execute(request).await {
                Ok(response) if response.is_success() && !response.body.is_empty() => {
                    let body = response.body.trim();

                    if body.contains("<html") || body.contains("<!DOCTYPE") {
                        continue;
                    }
                    if body.to_ascii_lowercase().contains("too many requests") {
                        return Err(SourceError::rate_limited(
                            "yahoo rate limited while fetching crumb",
                        ));
                    }
                    if !body.is_empty() && body.len() < 100 && !body.contains(' ') {
                        *self.crumb.lock().expect("crumb lock is not poisoned") =
                            Some(body.to_owned());
                        *self
                            .last_refresh
                            .lock()
                            .expect("refresh lock is not poisoned") = Some(Instant::now());
                        return Ok(());
                    }
                }
                _ => continue,
            }
        }

        Err(SourceError::unavailable(
            "failed to fetch yahoo crumb from all endpoints",
        ))
    }

    pub fn invalidate(&self) {
        *self.crumb.lock().expect("crumb lock is not poisoned") = None;
        *self
            .last_refresh
            .lock()
            .expect("refresh lock is not poisoned") = None;
    }
}

// ============================================================================
// Yahoo adapter
// ============================================================================

/// Yahoo market-data adapter with real and fixture modes.
///
/// Mode is keyed off the injected transport: a mock transport switches the
/// adapter to deterministic seeded data so every dashboard operation works
/// offline.
#[derive(Clone)]
pub struct YahooAdapter {
    http_client: Arc<dyn HttpClient>,
    circuit_breaker: Arc<CircuitBreaker>,
    crumb_manager: Arc<YahooCrumbManager>,
    use_real_api: bool,
    timeout_ms: u64,
}

impl Default for YahooAdapter {
    fn default() -> Self {
        Self::offline()
    }
}

impl YahooAdapter {
    /// Deterministic fixture adapter over the no-op transport.
    pub fn offline() -> Self {
        Self::with_http_client(Arc::new(NoopHttpClient))
    }

    /// Live adapter over reqwest.
    pub fn live(timeout_ms: u64) -> Self {
        let mut adapter = Self::with_http_client(Arc::new(ReqwestHttpClient::new()));
        adapter.timeout_ms = timeout_ms;
        adapter
    }

    pub fn with_http_client(http_client: Arc<dyn HttpClient>) -> Self {
        let use_real_api = !http_client.is_mock();
        Self {
            http_client,
            circuit_breaker: Arc::new(CircuitBreaker::default()),
            crumb_manager: Arc::new(YahooCrumbManager::default()),
            use_real_api,
            timeout_ms: 10_000,
        }
    }

    pub fn with_circuit_breaker(mut self, circuit_breaker: Arc<CircuitBreaker>) -> Self {
        self.circuit_breaker = circuit_breaker;
        self
    }

    /// Execute one upstream GET with crumb auth, refreshing the crumb and
    /// retrying once on 401/429. Returns the response body.
    async fn fetch_with_auth_retry(
        &self,
        build_endpoint: impl Fn(&str) -> String,
    ) -> Result<String, SourceError> {
        if !self.circuit_breaker.allow_request() {
            return Err(SourceError::unavailable(
                "yahoo circuit breaker is open; skipping upstream call",
            ));
        }

        let crumb = self.crumb_manager.get_crumb(&self.http_client).await?;
        let request = HttpRequest::get(build_endpoint(&crumb))
            .with_header("referer", "https://finance.yahoo.com/")
            .with_timeout_ms(self.timeout_ms);

        let response = self.http_client.execute(request).await.map_err(|e| {
            self.circuit_breaker.record_failure();
            SourceError::unavailable(format!("yahoo transport error: {}", e.message()))
        })?;

        if response.status == 401 || response.status == 429 {
            debug!(status = response.status, "yahoo auth rejected; refreshing crumb");
            self.crumb_manager.invalidate();

            let crumb = self.crumb_manager.get_crumb(&self.http_client).await?;
            let retry_request = HttpRequest::get(build_endpoint(&crumb))
                .with_header("referer", "https://finance.yahoo.com/")
                .with_timeout_ms(self.timeout_ms);

            let retry_response = self.http_client.execute(retry_request).await.map_err(|e| {
                self.circuit_breaker.record_failure();
                SourceError::unavailable(format!(
                    "yahoo transport error on retry: {}",
                    e.message()
                ))
            })?;

            if !retry_response.is_success() {
                self.circuit_breaker.record_failure();
                return Err(SourceError::unavailable(format!(
                    "yahoo returned status {} after auth refresh",
                    retry_response.status
                )));
            }

            self.circuit_breaker.record_success();
            return Ok(retry_response.body);
        }

        if !response.is_success() {
            self.circuit_breaker.record_failure();
            return Err(SourceError::unavailable(format!(
                "yahoo returned status {}",
                response.status
            )));
        }

        self.circuit_breaker.record_success();
        Ok(response.body)
    }

    /// Fixture-mode transport touch so breaker behavior stays observable
    /// with failing mock transports.
    async fn fixture_probe(&self, endpoint: &str) -> Result<(), SourceError> {
        if !self.circuit_breaker.allow_request() {
            return Err(SourceError::unavailable(
                "yahoo circuit breaker is open; skipping upstream call",
            ));
        }

        let request = HttpRequest::get(endpoint).with_timeout_ms(self.timeout_ms);
        let response = self.http_client.execute(request).await.map_err(|error| {
            self.circuit_breaker.record_failure();
            if error.retryable() {
                SourceError::unavailable(format!("yahoo transport error: {}", error.message()))
            } else {
                SourceError::internal(format!("yahoo transport error: {}", error.message()))
            }
        })?;

        if !response.is_success() {
            self.circuit_breaker.record_failure();
            return Err(SourceError::unavailable(format!(
                "yahoo upstream returned status {}",
                response.status
            )));
        }

        self.circuit_breaker.record_success();
        Ok(())
    }
}

impl MarketDataSource for YahooAdapter {
    fn id(&self) -> ProviderId {
        if self.use_real_api {
            ProviderId::Yahoo
        } else {
            ProviderId::Fixture
        }
    }

    fn snapshot<'a>(
        &'a self,
        req: SnapshotRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<IndexQuote>, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            if self.use_real_api {
                self.fetch_real_snapshot(&req).await
            } else {
                self.fetch_fixture_snapshot(&req).await
            }
        })
    }

    fn history<'a>(
        &'a self,
        req: HistoryRequest,
    ) -> Pin<Box<dyn Future<Output = Result<PriceHistory, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            if self.use_real_api {
                self.fetch_real_history(&req).await
            } else {
                self.fetch_fixture_history(&req).await
            }
        })
    }

    fn statement<'a>(
        &'a self,
        req: StatementRequest,
    ) -> Pin<Box<dyn Future<Output = Result<StatementTable, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            if self.use_real_api {
                self.fetch_real_statement(&req).await
            } else {
                self.fetch_fixture_statement(&req).await
            }
        })
    }
}

// Real API implementation
impl YahooAdapter {
    async fn fetch_real_snapshot(
        &self,
        req: &SnapshotRequest,
    ) -> Result<Vec<IndexQuote>, SourceError> {
        let symbols_param = req
            .symbols
            .iter()
            .map(Symbol::as_str)
            .collect::<Vec<_>>()
            .join(",");

        let body = self
            .fetch_with_auth_retry(|crumb| {
                format!(
                    "https://query1.finance.yahoo.com/v7/finance/quote?symbols={}&fields={}&crumb={}",
                    urlencoding::encode(&symbols_param),
                    QUOTE_FIELDS,
                    urlencoding::encode(crumb)
                )
            })
            .await?;

        let parsed: QuoteResponse = serde_json::from_str(&body)
            .map_err(|e| SourceError::internal(format!("failed to parse yahoo quotes: {e}")))?;

        if let Some(error) = &parsed.quote_response.error {
            if !error.is_null() {
                return Err(SourceError::unavailable(format!(
                    "yahoo quote API error: {error}"
                )));
            }
        }

        let mut by_symbol: BTreeMap<String, QuoteData> = BTreeMap::new();
        for quote in parsed.quote_response.result {
            by_symbol.insert(quote.symbol.to_ascii_uppercase(), quote);
        }

        // Response rows follow the request order, not upstream order.
        req.symbols
            .iter()
            .map(|symbol| {
                let quote = by_symbol.get(symbol.as_str()).ok_or_else(|| {
                    SourceError::unavailable(format!("yahoo returned no quote for '{symbol}'"))
                })?;

                IndexQuote::new(
                    symbol.clone(),
                    quote
                        .short_name
                        .clone()
                        .unwrap_or_else(|| symbol.as_str().to_owned()),
                    quote.regular_market_price.unwrap_or(0.0),
                    quote.regular_market_change.unwrap_or(0.0),
                    quote.regular_market_change_percent.unwrap_or(0.0),
                )
                .map_err(validation_to_error)
            })
            .collect()
    }

    async fn fetch_real_history(&self, req: &HistoryRequest) -> Result<PriceHistory, SourceError> {
        let symbol = req.symbol.clone();
        let (period1, period2) = (req.start.unix_seconds(), req.end.unix_seconds());

        let body = self
            .fetch_with_auth_retry(|crumb| {
                format!(
                    "https://query1.finance.yahoo.com/v8/finance/chart/{}?period1={}&period2={}&interval=1d&events=div%7Csplit&crumb={}",
                    urlencoding::encode(symbol.as_str()),
                    period1,
                    period2,
                    urlencoding::encode(crumb)
                )
            })
            .await?;

        let parsed: ChartResponse = serde_json::from_str(&body)
            .map_err(|e| SourceError::internal(format!("failed to parse yahoo chart: {e}")))?;

        if let Some(error) = &parsed.chart.error {
            if !error.is_null() {
                return Err(SourceError::unavailable(format!(
                    "yahoo chart API error: {error}"
                )));
            }
        }

        let result = parsed
            .chart
            .result
            .first()
            .ok_or_else(|| SourceError::internal("no chart data in response"))?;

        let timestamps = result
            .timestamp
            .as_deref()
            .ok_or_else(|| SourceError::internal("no timestamp data"))?;
        let quote = result
            .indicators
            .quote
            .first()
            .ok_or_else(|| SourceError::internal("no quote data"))?;
        let adjclose = result
            .indicators
            .adjclose
            .as_ref()
            .and_then(|series| series.first());

        let mut points = Vec::with_capacity(timestamps.len());
        for (index, &ts_value) in timestamps.iter().enumerate() {
            let Some(Some(close)) = quote.close.get(index) else {
                // Null sample (market holiday padding); drop it.
                continue;
            };

            let adj = adjclose
                .and_then(|series| series.adjclose.get(index).copied().flatten())
                .unwrap_or(*close);

            let ts = UtcDateTime::from_unix_seconds(ts_value).map_err(validation_to_error)?;
            points.push(PricePoint::new(ts, *close, adj).map_err(validation_to_error)?);
        }

        Ok(PriceHistory::new(symbol, points))
    }

    async fn fetch_real_statement(
        &self,
        req: &StatementRequest,
    ) -> Result<StatementTable, SourceError> {
        let symbol = req.symbol.clone();
        let prefix = match req.period {
            StatementPeriod::Yearly => "annual",
            StatementPeriod::Quarterly => "quarterly",
        };
        let line_items = statement_line_items(req.kind);
        let types = line_items
            .iter()
            .map(|(key, _)| format!("{prefix}{key}"))
            .collect::<Vec<_>>()
            .join(",");

        // The timeseries endpoint wants an explicit window; five years
        // covers both granularities.
        let period2 = UtcDateTime::now();
        let period1 = period2.minus_days(1825);

        let body = self
            .fetch_with_auth_retry(|crumb| {
                format!(
                    "https://query1.finance.yahoo.com/ws/fundamentals-timeseries/v1/finance/timeseries/{}?symbol={}&type={}&period1={}&period2={}&crumb={}",
                    urlencoding::encode(symbol.as_str()),
                    urlencoding::encode(symbol.as_str()),
                    types,
                    period1.unix_seconds(),
                    period2.unix_seconds(),
                    urlencoding::encode(crumb)
                )
            })
            .await?;

        let parsed: TimeseriesResponse = serde_json::from_str(&body)
            .map_err(|e| SourceError::internal(format!("failed to parse yahoo timeseries: {e}")))?;

        if let Some(error) = &parsed.timeseries.error {
            if !error.is_null() {
                return Err(SourceError::unavailable(format!(
                    "yahoo timeseries API error: {error}"
                )));
            }
        }

        let mut table = StatementTable::new(symbol, req.kind, req.period);

        for (key, display_name) in line_items {
            let api_key = format!("{prefix}{key}");
            let Some(result) = parsed
                .timeseries
                .result
                .iter()
                .find(|result| result.meta.types.iter().any(|t| t == &api_key))
            else {
                continue;
            };

            let Some(raw_series) = result.series.get(&api_key) else {
                continue;
            };

            let entries: Vec<Option<TimeseriesEntry>> =
                serde_json::from_value(raw_series.clone()).map_err(|e| {
                    SourceError::internal(format!("failed to parse '{api_key}' series: {e}"))
                })?;

            let values = entries
                .into_iter()
                .flatten()
                .filter_map(|entry| {
                    let value = entry.reported_value.and_then(|v| v.raw)?;
                    Some(StatementValue {
                        period: entry.as_of_date,
                        value,
                    })
                })
                .collect::<Vec<_>>();

            if !values.is_empty() {
                table.push_line_item(*display_name, values);
            }
        }

        Ok(table)
    }
}

// Fixture implementation
impl YahooAdapter {
    async fn fetch_fixture_snapshot(
        &self,
        req: &SnapshotRequest,
    ) -> Result<Vec<IndexQuote>, SourceError> {
        self.fixture_probe("https://query1.finance.yahoo.com/v7/finance/quote")
            .await?;

        req.symbols
            .iter()
            .map(|symbol| {
                let seed = symbol_seed(symbol);
                let last_price = 800.0 + (seed % 40_000) as f64 / 10.0;
                let change = ((seed % 41) as f64 - 20.0) * 0.75;
                let percent_change = change / last_price * 100.0;

                IndexQuote::new(
                    symbol.clone(),
                    fixture_index_name(symbol),
                    last_price,
                    change,
                    percent_change,
                )
                .map_err(validation_to_error)
            })
            .collect()
    }

    async fn fetch_fixture_history(
        &self,
        req: &HistoryRequest,
    ) -> Result<PriceHistory, SourceError> {
        self.fixture_probe("https://query1.finance.yahoo.com/v8/finance/chart")
            .await?;

        let seed = symbol_seed(&req.symbol);
        let total_days = ((req.end.unix_seconds() - req.start.unix_seconds()) / 86_400) as u32;
        let mut points = Vec::with_capacity(total_days as usize);

        for day in 0..total_days {
            let ts = req.end.minus_days(total_days - day);
            let base = 90.0 + ((seed + day as u64) % 350) as f64 / 10.0;
            points.push(
                PricePoint::new(ts, base, (base - 0.35).max(0.0)).map_err(validation_to_error)?,
            );
        }

        Ok(PriceHistory::new(req.symbol.clone(), points))
    }

    async fn fetch_fixture_statement(
        &self,
        req: &StatementRequest,
    ) -> Result<StatementTable, SourceError> {
        self.fixture_probe("https://query1.finance.yahoo.com/ws/fundamentals-timeseries")
            .await?;

        let seed = symbol_seed(&req.symbol);
        let periods: &[&str] = match req.period {
            StatementPeriod::Yearly => &["2021-12-31", "2022-12-31", "2023-12-31", "2024-12-31"],
            StatementPeriod::Quarterly => {
                &["2024-09-30", "2024-12-31", "2025-03-31", "2025-06-30"]
            }
        };

        let mut table = StatementTable::new(req.symbol.clone(), req.kind, req.period);

        for (item_index, (_, display_name)) in statement_line_items(req.kind).iter().enumerate() {
            let scale = 1_000_000.0 * (1.0 + item_index as f64);
            let values = periods
                .iter()
                .enumerate()
                .map(|(period_index, period)| StatementValue {
                    period: (*period).to_owned(),
                    value: ((seed % 900) + 100) as f64 * scale
                        + period_index as f64 * 50.0 * scale,
                })
                .collect();

            table.push_line_item(*display_name, values);
        }

        Ok(table)
    }
}

const fn statement_line_items(kind: StatementKind) -> &'static [(&'static str, &'static str)] {
    match kind {
        StatementKind::Income => INCOME_LINE_ITEMS,
        StatementKind::BalanceSheet => BALANCE_LINE_ITEMS,
    }
}

fn fixture_index_name(symbol: &Symbol) -> String {
    format!("{} Index", symbol.as_str().trim_start_matches('^'))
}

fn symbol_seed(symbol: &Symbol) -> u64 {
    symbol.as_str().bytes().fold(0_u64, |acc, byte| {
        acc.wrapping_mul(33).wrapping_add(byte as u64)
    })
}

fn validation_to_error(error: ValidationError) -> SourceError {
    SourceError::internal(error.to_string())
}

// Yahoo API payload structures
#[derive(Debug, Deserialize)]
struct QuoteResponse {
    #[serde(rename = "quoteResponse")]
    quote_response: QuoteResponseData,
}

#[derive(Debug, Deserialize)]
struct QuoteResponseData {
    result: Vec<QuoteData>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    symbol: String,
    #[serde(rename = "shortName")]
    short_name: Option<String>,
    #[serde(rename = "regularMarketPrice")]
    regular_market_price: Option<f64>,
    #[serde(rename = "regularMarketChange")]
    regular_market_change: Option<f64>,
    #[serde(rename = "regularMarketChangePercent")]
    regular_market_change_percent: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartData,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    result: Vec<ChartResult>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    timestamp: Option<Vec<i64>>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    quote: Vec<ChartQuote>,
    #[serde(default)]
    adjclose: Option<Vec<ChartAdjClose>>,
}

#[derive(Debug, Deserialize)]
struct ChartQuote {
    close: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct ChartAdjClose {
    adjclose: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct TimeseriesResponse {
    timeseries: TimeseriesData,
}

#[derive(Debug, Deserialize)]
struct TimeseriesData {
    result: Vec<TimeseriesResult>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct TimeseriesResult {
    meta: TimeseriesMeta,
    /// The value arrays arrive under dynamic keys (`annualTotalRevenue`,
    /// `quarterlyNetIncome`, ...).
    #[serde(flatten)]
    series: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct TimeseriesMeta {
    #[serde(rename = "type")]
    types: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct TimeseriesEntry {
    #[serde(rename = "asOfDate")]
    as_of_date: String,
    #[serde(rename = "reportedValue")]
    reported_value: Option<ReportedValue>,
}

#[derive(Debug, Deserialize)]
struct ReportedValue {
    #[serde(default)]
    raw: Option<f64>,
}
