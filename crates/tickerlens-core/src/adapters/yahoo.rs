use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, info};

use crate::data_source::{SeriesFetcher, SeriesRequest, SourceError, SourceErrorKind};
use crate::http_client::{HttpClient, HttpRequest, ReqwestHttpClient};
use crate::retry::{execute_with_retry, RetryConfig};
use crate::{
    CanonicalSymbol, ProviderId, RawBar, RawSeries, SeriesMetadata, ServiceConfig, UtcDateTime,
};

const CHART_ENDPOINT: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
const REFERER: &str = "https://finance.yahoo.com/";

/// Weekly history from the Yahoo Finance chart API.
///
/// Bars are passed through as delivered: a `null` in any quote column becomes
/// a missing field on that bar and is left for the validator to judge.
#[derive(Clone)]
pub struct YahooAdapter {
    http_client: Arc<dyn HttpClient>,
    retry: RetryConfig,
    timeout_ms: u64,
}

impl YahooAdapter {
    pub fn new(config: &ServiceConfig) -> Self {
        Self::with_http_client(Arc::new(ReqwestHttpClient::new()))
            .with_timeout_ms(config.http_timeout_ms)
    }

    pub fn with_http_client(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            retry: RetryConfig::default(),
            timeout_ms: crate::config::DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    async fn fetch_chart(&self, req: &SeriesRequest) -> Result<RawSeries, SourceError> {
        let endpoint = format!(
            "{CHART_ENDPOINT}/{}",
            urlencoding::encode(req.symbol.as_str())
        );
        let request = HttpRequest::get(endpoint)
            .with_query("range", req.lookback.range)
            .with_query("interval", req.lookback.interval)
            .with_header("referer", REFERER)
            .with_timeout_ms(self.timeout_ms);

        let response = execute_with_retry(self.http_client.as_ref(), request, &self.retry)
            .await
            .map_err(|e| {
                SourceError::unavailable(format!("yahoo transport error: {}", e.message()))
            })?;

        // Unknown symbols come back as 404 with a chart error body.
        if !response.is_success() && response.status != 404 {
            return Err(SourceError::from_status(ProviderId::Yahoo, response.status));
        }

        let series = match parse_chart(&req.symbol, &response.body) {
            Err(error) if response.status == 404 && error.kind() != SourceErrorKind::NotFound => {
                return Err(SourceError::not_found(format!("no data for '{}'", req.symbol)));
            }
            parsed => parsed?,
        };
        info!(
            symbol = %req.symbol,
            bars = series.bars.len(),
            "yahoo chart fetched"
        );
        Ok(series)
    }
}

impl SeriesFetcher for YahooAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Yahoo
    }

    fn fetch<'a>(
        &'a self,
        req: SeriesRequest,
    ) -> Pin<Box<dyn Future<Output = Result<RawSeries, SourceError>> + Send + 'a>> {
        Box::pin(async move { self.fetch_chart(&req).await })
    }
}

/// Convert a chart API body into an unvalidated series.
pub(crate) fn parse_chart(symbol: &CanonicalSymbol, body: &str) -> Result<RawSeries, SourceError> {
    let chart: YahooChartResponse = serde_json::from_str(body)
        .map_err(|e| SourceError::internal(format!("failed to parse yahoo chart: {e}")))?;

    if let Some(error) = chart.chart.error {
        debug!(symbol = %symbol, code = %error.code, "yahoo chart error");
        return Err(SourceError::not_found(format!(
            "no data for '{symbol}': {}",
            error.description.unwrap_or(error.code)
        )));
    }

    let Some(result) = chart.chart.result.and_then(|results| results.into_iter().next()) else {
        return Err(SourceError::not_found(format!("no data for '{symbol}'")));
    };
    let Some(timestamps) = result.timestamp.filter(|ts| !ts.is_empty()) else {
        return Err(SourceError::not_found(format!(
            "no price history for '{symbol}'"
        )));
    };

    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();
    let column = |values: &[Option<f64>], index: usize| values.get(index).copied().flatten();

    let bars = timestamps
        .iter()
        .enumerate()
        .map(|(index, &seconds)| RawBar {
            ts: seconds.and_then(|seconds| UtcDateTime::from_unix_timestamp(seconds).ok()),
            open: column(&quote.open, index),
            high: column(&quote.high, index),
            low: column(&quote.low, index),
            close: column(&quote.close, index),
            volume: quote
                .volume
                .get(index)
                .copied()
                .flatten()
                .and_then(|volume| u64::try_from(volume).ok()),
        })
        .collect();

    let metadata = SeriesMetadata {
        long_name: result.meta.long_name,
        short_name: result.meta.short_name,
        currency: result.meta.currency,
    };

    Ok(RawSeries::new(symbol.clone(), bars, metadata))
}

#[derive(Debug, Deserialize)]
struct YahooChartResponse {
    chart: YahooChartData,
}

#[derive(Debug, Deserialize)]
struct YahooChartData {
    #[serde(default)]
    result: Option<Vec<YahooChartResult>>,
    #[serde(default)]
    error: Option<YahooChartError>,
}

#[derive(Debug, Deserialize)]
struct YahooChartError {
    code: String,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct YahooChartResult {
    #[serde(default)]
    meta: YahooChartMeta,
    #[serde(default)]
    timestamp: Option<Vec<Option<i64>>>,
    #[serde(default)]
    indicators: YahooChartIndicators,
}

#[derive(Debug, Default, Deserialize)]
struct YahooChartMeta {
    #[serde(rename = "longName", default)]
    long_name: Option<String>,
    #[serde(rename = "shortName", default)]
    short_name: Option<String>,
    #[serde(default)]
    currency: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct YahooChartIndicators {
    #[serde(default)]
    quote: Vec<YahooChartQuote>,
}

#[derive(Debug, Default, Deserialize)]
struct YahooChartQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<i64>>,
}
