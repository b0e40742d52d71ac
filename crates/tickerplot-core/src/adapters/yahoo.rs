use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;
use tracing::debug;

use crate::data_source::{DownloadRequest, MarketDataSource, SourceError};
use crate::http_client::{HttpClient, HttpRequest, HttpResponse, DEFAULT_TIMEOUT_MS};
use crate::{ColumnKey, Field, ObservationTable, TradingDate};

pub const YAHOO_BASE_URL: &str = "https://query1.finance.yahoo.com";

/// Daily history from the Yahoo Finance chart API.
#[derive(Clone)]
pub struct YahooSource {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
    timeout_ms: u64,
}

impl YahooSource {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            base_url: String::from(YAHOO_BASE_URL),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_owned();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    fn chart_url(&self, symbol: &str, start: TradingDate, end: TradingDate) -> String {
        format!(
            "{}/v8/finance/chart/{}?period1={}&period2={}&interval=1d&events=history&includeAdjustedClose=true",
            self.base_url,
            urlencoding::encode(symbol),
            start.midnight_unix_timestamp(),
            end.midnight_unix_timestamp(),
        )
    }

    async fn fetch_history(&self, req: &DownloadRequest) -> Result<ObservationTable, SourceError> {
        let [ticker] = req.symbols.as_slice() else {
            return Err(SourceError::invalid_request(
                "yahoo chart downloads take exactly one symbol",
            ));
        };

        // Yahoo rejects an empty or inverted span; there is nothing to return for it.
        if req.start >= req.end {
            debug!(%ticker, start = %req.start, end = %req.end, "empty date span, skipping download");
            return Ok(ObservationTable::empty(req.group_by));
        }

        let symbol = ticker.as_str().to_ascii_uppercase();
        let endpoint = self.chart_url(&symbol, req.start, req.end);
        debug!(%endpoint, "requesting yahoo chart");

        let request = HttpRequest::get(endpoint)
            .with_header("referer", "https://finance.yahoo.com/")
            .with_header("accept", "application/json")
            .with_timeout_ms(self.timeout_ms);

        let response = self.http_client.execute(request).await.map_err(|e| {
            if e.timed_out() {
                SourceError::unavailable(format!("yahoo request timed out: {}", e.message()))
            } else {
                SourceError::unavailable(format!("yahoo transport error: {}", e.message()))
            }
        })?;

        parse_chart_response(&response, &symbol, req)
    }
}

impl MarketDataSource for YahooSource {
    fn name(&self) -> &'static str {
        "yahoo"
    }

    fn download<'a>(
        &'a self,
        req: &'a DownloadRequest,
    ) -> Pin<Box<dyn Future<Output = Result<ObservationTable, SourceError>> + Send + 'a>> {
        Box::pin(async move { self.fetch_history(req).await })
    }
}

fn parse_chart_response(
    response: &HttpResponse,
    symbol: &str,
    req: &DownloadRequest,
) -> Result<ObservationTable, SourceError> {
    // Unknown symbols and rejected spans come back as 404/400 with a chart error body.
    let client_error = matches!(response.status, 400 | 404);
    if !response.is_success() && !client_error {
        return Err(SourceError::unavailable(format!(
            "yahoo returned status {}",
            response.status
        )));
    }

    let chart: YahooChartResponse = match serde_json::from_str(&response.body) {
        Ok(chart) => chart,
        Err(_) if client_error => {
            debug!(status = response.status, %symbol, "yahoo rejected request without chart body");
            return Ok(ObservationTable::empty(req.group_by));
        }
        Err(e) => {
            return Err(SourceError::invalid_response(format!(
                "failed to parse yahoo chart: {e}"
            )))
        }
    };

    if let Some(error) = chart.chart.error {
        debug!(
            code = %error.code,
            description = error.description.as_deref().unwrap_or_default(),
            %symbol,
            "yahoo chart error, treating as no data"
        );
        return Ok(ObservationTable::empty(req.group_by));
    }

    let Some(result) = chart.chart.result.and_then(|results| results.into_iter().next()) else {
        return Ok(ObservationTable::empty(req.group_by));
    };

    build_table(result, symbol, req)
}

fn build_table(
    result: YahooChartResult,
    symbol: &str,
    req: &DownloadRequest,
) -> Result<ObservationTable, SourceError> {
    let timestamps = result.timestamp.unwrap_or_default();
    if timestamps.is_empty() {
        return Ok(ObservationTable::empty(req.group_by));
    }

    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();
    let adjclose = result
        .indicators
        .adjclose
        .into_iter()
        .next()
        .and_then(|series| series.adjclose);

    let series: Vec<(Field, Vec<Option<f64>>)> = [
        (Field::Open, quote.open),
        (Field::High, quote.high),
        (Field::Low, quote.low),
        (Field::Close, quote.close),
        (Field::AdjClose, adjclose),
        (Field::Volume, quote.volume),
    ]
    .into_iter()
    .filter_map(|(field, values)| values.map(|values| (field, values)))
    .collect();

    let gmtoffset = result.meta.gmtoffset;
    let mut index: Vec<TradingDate> = Vec::with_capacity(timestamps.len());
    let mut rows: Vec<Vec<f64>> = Vec::with_capacity(timestamps.len());

    for (i, &ts) in timestamps.iter().enumerate() {
        let row: Vec<Option<f64>> = series
            .iter()
            .map(|(_, values)| values.get(i).copied().flatten())
            .collect();
        if row.iter().all(Option::is_none) {
            continue;
        }

        let date = TradingDate::from_unix_timestamp(ts, gmtoffset).ok_or_else(|| {
            SourceError::invalid_response(format!(
                "invalid timestamp {ts} at offset {gmtoffset}s"
            ))
        })?;
        let row: Vec<f64> = row.into_iter().map(|value| value.unwrap_or(f64::NAN)).collect();

        // A live session can repeat the last trading day; keep the newest row for it.
        if index.last() == Some(&date) {
            if let Some(last) = rows.last_mut() {
                *last = row;
            }
            continue;
        }
        index.push(date);
        rows.push(row);
    }

    let mut table = ObservationTable::new(req.group_by, index);
    for (position, (field, _)) in series.iter().enumerate() {
        let values = rows.iter().map(|row| row[position]).collect();
        table
            .insert_column(ColumnKey::new(symbol, *field), values)
            .map_err(|e| SourceError::invalid_response(e.to_string()))?;
    }

    Ok(table)
}

// ============================================================================
// Yahoo chart payload
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
struct YahooChartResponse {
    chart: YahooChartData,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartData {
    #[serde(default)]
    result: Option<Vec<YahooChartResult>>,
    #[serde(default)]
    error: Option<YahooChartError>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartError {
    code: String,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartResult {
    #[serde(default)]
    meta: YahooMeta,
    #[serde(default)]
    timestamp: Option<Vec<i64>>,
    #[serde(default)]
    indicators: YahooChartIndicators,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct YahooMeta {
    /// Exchange offset from UTC in seconds.
    #[serde(default)]
    gmtoffset: i32,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct YahooChartIndicators {
    #[serde(default)]
    quote: Vec<YahooChartQuote>,
    #[serde(default)]
    adjclose: Vec<YahooAdjClose>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct YahooChartQuote {
    #[serde(default)]
    open: Option<Vec<Option<f64>>>,
    #[serde(default)]
    high: Option<Vec<Option<f64>>>,
    #[serde(default)]
    low: Option<Vec<Option<f64>>>,
    #[serde(default)]
    close: Option<Vec<Option<f64>>>,
    #[serde(default)]
    volume: Option<Vec<Option<f64>>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct YahooAdjClose {
    #[serde(default)]
    adjclose: Option<Vec<Option<f64>>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_source::SourceErrorKind;
    use crate::http_client::HttpError;
    use crate::{GroupBy, Ticker};
    use std::sync::Mutex;

    const CHART_BODY: &str = r#"{
        "chart": {
            "result": [{
                "meta": {"currency": "USD", "symbol": "AAPL", "gmtoffset": -18000},
                "timestamp": [1577975400, 1578061800, 1578321000, 1578407400],
                "indicators": {
                    "quote": [{
                        "open":   [74.06, 74.29, null, 74.96],
                        "high":   [75.15, 75.14, null, 75.22],
                        "low":    [73.80, 74.13, null, 74.37],
                        "close":  [75.09, 74.36, null, 74.95],
                        "volume": [135480400, 146322800, null, 108872000]
                    }],
                    "adjclose": [{"adjclose": [72.88, 72.17, null, 72.74]}]
                }
            }],
            "error": null
        }
    }"#;

    const NOT_FOUND_BODY: &str = r#"{
        "chart": {
            "result": null,
            "error": {"code": "Not Found", "description": "No data found, symbol may be delisted"}
        }
    }"#;

    struct RecordingHttpClient {
        response: Result<HttpResponse, HttpError>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl RecordingHttpClient {
        fn responding(response: Result<HttpResponse, HttpError>) -> Arc<Self> {
            Arc::new(Self {
                response,
                requests: Mutex::new(Vec::new()),
            })
        }

        fn recorded_requests(&self) -> Vec<HttpRequest> {
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .clone()
        }
    }

    impl HttpClient for RecordingHttpClient {
        fn execute<'a>(
            &'a self,
            request: HttpRequest,
        ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .push(request);
            let response = self.response.clone();
            Box::pin(async move { response })
        }
    }

    fn request(symbol: &str, start: &str, end: &str) -> DownloadRequest {
        DownloadRequest::single(
            Ticker::parse(symbol).expect("valid ticker"),
            TradingDate::parse(start).expect("valid start"),
            TradingDate::parse(end).expect("valid end"),
        )
    }

    #[tokio::test]
    async fn builds_documented_chart_url() {
        let client = RecordingHttpClient::responding(Ok(HttpResponse::ok_json(CHART_BODY)));
        let source = YahooSource::new(client.clone())
            .with_base_url("https://yahoo.test/")
            .with_timeout_ms(1_500);

        source
            .download(&request("aapl", "2020-01-01", "2020-02-01"))
            .await
            .expect("download should succeed");

        let requests = client.recorded_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].url,
            "https://yahoo.test/v8/finance/chart/AAPL?period1=1577836800&period2=1580515200&interval=1d&events=history&includeAdjustedClose=true"
        );
        assert_eq!(requests[0].timeout_ms, 1_500);
    }

    #[tokio::test]
    async fn parses_chart_into_symbol_grouped_table() {
        let client = RecordingHttpClient::responding(Ok(HttpResponse::ok_json(CHART_BODY)));
        let source = YahooSource::new(client);

        let table = source
            .download(&request("AAPL", "2020-01-01", "2020-02-01"))
            .await
            .expect("download should succeed");

        assert_eq!(table.group_by(), GroupBy::Ticker);
        let dates: Vec<String> = table.index().iter().map(ToString::to_string).collect();
        assert_eq!(dates, ["2020-01-02", "2020-01-03", "2020-01-07"]);

        let flat = table.flatten();
        assert_eq!(
            flat.column("AAPL_Close").expect("close"),
            &[75.09, 74.36, 74.95]
        );
        assert_eq!(
            flat.column("AAPL_Volume").expect("volume"),
            &[135_480_400.0, 146_322_800.0, 108_872_000.0]
        );
        assert!(flat.contains("AAPL_Adj Close"));
    }

    #[tokio::test]
    async fn missing_volume_series_produces_no_volume_column() {
        let body = CHART_BODY.replace(
            r#""volume": [135480400, 146322800, null, 108872000]"#,
            r#""unused": []"#,
        );
        let client = RecordingHttpClient::responding(Ok(HttpResponse::ok_json(body)));
        let source = YahooSource::new(client);

        let flat = source
            .download(&request("AAPL", "2020-01-01", "2020-02-01"))
            .await
            .expect("download should succeed")
            .flatten();

        assert!(flat.contains("AAPL_Close"));
        assert!(!flat.contains("AAPL_Volume"));
    }

    #[tokio::test]
    async fn unknown_symbol_yields_empty_table() {
        let client = RecordingHttpClient::responding(Ok(HttpResponse::with_status(
            404,
            NOT_FOUND_BODY,
        )));
        let source = YahooSource::new(client);

        let table = source
            .download(&request("NOPE", "2020-01-01", "2020-02-01"))
            .await
            .expect("not found is not an error");
        assert!(table.is_empty());
    }

    #[tokio::test]
    async fn inverted_span_skips_the_network() {
        let client = RecordingHttpClient::responding(Ok(HttpResponse::ok_json(CHART_BODY)));
        let source = YahooSource::new(client.clone());

        let table = source
            .download(&request("AAPL", "2020-02-01", "2020-01-01"))
            .await
            .expect("inverted span is not an error");

        assert!(table.is_empty());
        assert!(client.recorded_requests().is_empty());
    }

    #[tokio::test]
    async fn server_error_is_unavailable() {
        let client =
            RecordingHttpClient::responding(Ok(HttpResponse::with_status(500, "oops")));
        let source = YahooSource::new(client);

        let err = source
            .download(&request("AAPL", "2020-01-01", "2020-02-01"))
            .await
            .expect_err("500 must fail");
        assert_eq!(err.kind(), SourceErrorKind::Unavailable);
        assert_eq!(err.message(), "yahoo returned status 500");
    }

    #[tokio::test]
    async fn transport_failure_is_unavailable() {
        let client = RecordingHttpClient::responding(Err(HttpError::timeout("deadline elapsed")));
        let source = YahooSource::new(client);

        let err = source
            .download(&request("AAPL", "2020-01-01", "2020-02-01"))
            .await
            .expect_err("timeout must fail");
        assert_eq!(err.kind(), SourceErrorKind::Unavailable);
        assert!(err.message().contains("timed out"));
    }

    #[tokio::test]
    async fn garbage_body_is_invalid_response() {
        let client = RecordingHttpClient::responding(Ok(HttpResponse::ok_json("<html>")));
        let source = YahooSource::new(client);

        let err = source
            .download(&request("AAPL", "2020-01-01", "2020-02-01"))
            .await
            .expect_err("html must fail");
        assert_eq!(err.kind(), SourceErrorKind::InvalidResponse);
    }

    #[tokio::test]
    async fn repeated_trading_day_keeps_the_newest_row() {
        // 1577998800 is 2020-01-02 16:00 in New York, same session as 1577975400.
        let body = r#"{
            "chart": {
                "result": [{
                    "meta": {"currency": "USD", "symbol": "AAPL", "gmtoffset": -18000},
                    "timestamp": [1577975400, 1577998800],
                    "indicators": {
                        "quote": [{
                            "close":  [75.09, 75.50],
                            "volume": [135480400, 140000000]
                        }]
                    }
                }],
                "error": null
            }
        }"#;
        let client = RecordingHttpClient::responding(Ok(HttpResponse::ok_json(body)));
        let source = YahooSource::new(client);

        let flat = source
            .download(&request("AAPL", "2020-01-01", "2020-02-01"))
            .await
            .expect("download should succeed")
            .flatten();

        let dates: Vec<String> = flat.index().iter().map(ToString::to_string).collect();
        assert_eq!(dates, ["2020-01-02"]);
        assert_eq!(flat.column("AAPL_Close").expect("close"), &[75.50]);
        assert_eq!(
            flat.column("AAPL_Volume").expect("volume"),
            &[140_000_000.0]
        );
    }

    #[tokio::test]
    async fn timestamp_past_the_calendar_is_invalid_response() {
        let body = r#"{
            "chart": {
                "result": [{
                    "meta": {"currency": "USD", "symbol": "AAPL", "gmtoffset": 3600},
                    "timestamp": [253402300799],
                    "indicators": {"quote": [{"close": [1.0]}]}
                }],
                "error": null
            }
        }"#;
        let client = RecordingHttpClient::responding(Ok(HttpResponse::ok_json(body)));
        let source = YahooSource::new(client);

        let err = source
            .download(&request("AAPL", "2020-01-01", "2020-02-01"))
            .await
            .expect_err("out-of-range local time must fail");
        assert_eq!(err.kind(), SourceErrorKind::InvalidResponse);
    }
}
