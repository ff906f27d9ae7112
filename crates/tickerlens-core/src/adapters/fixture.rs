//! Deterministic offline collaborators behind `--mock`.
//!
//! Every value is derived from the requested symbol or query, so repeated
//! runs render identical dashboards without network access.

use std::future::Future;
use std::pin::Pin;

use crate::completion::{Completion, CompletionClient, CompletionRequest, Role};
use crate::data_source::{SeriesFetcher, SeriesRequest, SourceError};
use crate::news::{Article, NewsRequest, NewsSource};
use crate::{
    CanonicalSymbol, ProviderId, RawBar, RawSeries, SeriesMetadata, UtcDateTime,
    DOMESTIC_SUFFIXES,
};

/// Monday 2024-12-30 00:00 UTC, the newest fixture bar.
const ANCHOR_UNIX: i64 = 1_735_516_800;
const WEEK_SECONDS: i64 = 7 * 24 * 60 * 60;

const COMPANY_NAMES: &[(&str, &str)] = &[
    ("RELIANCE", "Reliance Industries Limited"),
    ("TCS", "Tata Consultancy Services Limited"),
    ("HDFCBANK", "HDFC Bank Limited"),
    ("INFY", "Infosys Limited"),
    ("ICICIBANK", "ICICI Bank Limited"),
    ("BHARTIARTL", "Bharti Airtel Limited"),
    ("WIPRO", "Wipro Limited"),
    ("ZOMATO", "Zomato Limited"),
    ("PAYTM", "One 97 Communications Limited"),
    ("JIOFIN", "Jio Financial Services Limited"),
    ("AAPL", "Apple Inc."),
    ("GOOGL", "Alphabet Inc."),
    ("MSFT", "Microsoft Corporation"),
    ("AMZN", "Amazon.com, Inc."),
    ("TSLA", "Tesla, Inc."),
    ("META", "Meta Platforms, Inc."),
    ("NVDA", "NVIDIA Corporation"),
    ("NFLX", "Netflix, Inc."),
    ("JPM", "JPMorgan Chase & Co."),
    ("V", "Visa Inc."),
];

fn seed(text: &str) -> u64 {
    // FNV-1a
    text.bytes().fold(0xcbf2_9ce4_8422_2325, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(0x0100_0000_01b3)
    })
}

fn base_ticker(symbol: &CanonicalSymbol) -> &str {
    let value = symbol.as_str();
    DOMESTIC_SUFFIXES
        .iter()
        .find_map(|suffix| value.strip_suffix(suffix))
        .unwrap_or(value)
}

/// Weekly bars on a seeded random walk.
#[derive(Debug, Clone)]
pub struct FixtureSeriesFetcher {
    weeks: usize,
}

impl Default for FixtureSeriesFetcher {
    fn default() -> Self {
        Self { weeks: 52 }
    }
}

impl FixtureSeriesFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_weeks(weeks: usize) -> Self {
        Self { weeks }
    }

    fn series(&self, symbol: &CanonicalSymbol) -> Result<RawSeries, SourceError> {
        let ticker = base_ticker(symbol);
        if ticker.trim().is_empty() {
            return Err(SourceError::not_found(format!("no data for '{symbol}'")));
        }

        let mut rng = fastrand::Rng::with_seed(seed(symbol.as_str()));
        let mut close = 50.0 + rng.f64() * 2_950.0;
        let first = ANCHOR_UNIX - WEEK_SECONDS * (self.weeks.saturating_sub(1) as i64);

        let bars = (0..self.weeks)
            .map(|week| {
                let open = close;
                close = (open * (1.0 + (rng.f64() - 0.48) * 0.08)).max(1.0);
                let high = open.max(close) * (1.0 + rng.f64() * 0.02);
                let low = open.min(close) * (1.0 - rng.f64() * 0.02);
                RawBar {
                    ts: UtcDateTime::from_unix_timestamp(first + WEEK_SECONDS * week as i64).ok(),
                    open: Some(round_cents(open)),
                    high: Some(round_cents(high)),
                    low: Some(round_cents(low)),
                    close: Some(round_cents(close)),
                    volume: Some(rng.u64(500_000..20_000_000)),
                }
            })
            .collect();

        let long_name = COMPANY_NAMES
            .iter()
            .find(|(known, _)| *known == ticker)
            .map(|(_, name)| (*name).to_owned());

        Ok(RawSeries::new(
            symbol.clone(),
            bars,
            SeriesMetadata {
                long_name,
                short_name: Some(ticker.to_ascii_uppercase()),
                currency: Some(symbol.market().currency().code().to_owned()),
            },
        ))
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl SeriesFetcher for FixtureSeriesFetcher {
    fn id(&self) -> ProviderId {
        ProviderId::Fixture
    }

    fn fetch<'a>(
        &'a self,
        req: SeriesRequest,
    ) -> Pin<Box<dyn Future<Output = Result<RawSeries, SourceError>> + Send + 'a>> {
        Box::pin(async move { self.series(&req.symbol) })
    }
}

/// Three canned headlines mentioning the query.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureNewsSource;

impl NewsSource for FixtureNewsSource {
    fn id(&self) -> ProviderId {
        ProviderId::Fixture
    }

    fn search<'a>(
        &'a self,
        req: NewsRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Article>, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            let slug = req
                .query
                .chars()
                .filter(char::is_ascii_alphanumeric)
                .collect::<String>()
                .to_ascii_lowercase();
            let templates = [
                ("{} shares move on sector rotation", Some("Fixture Wire")),
                ("Analysts revisit targets for {}", None),
                ("What the latest quarter means for {}", Some("Fixture Daily")),
            ];

            let articles = templates
                .iter()
                .enumerate()
                .take(req.max_results)
                .map(|(index, (template, source))| {
                    let mut article = Article::new(
                        template.replace("{}", &req.query),
                        format!("https://news.fixture.invalid/{slug}/{index}"),
                    );
                    article.source = source.map(str::to_owned);
                    article.date = UtcDateTime::from_unix_timestamp(
                        ANCHOR_UNIX - 3_600 * (index as i64 + 1),
                    )
                    .ok();
                    if index == 0 {
                        article.body = Some(format!("Offline summary for {}.", req.query));
                    }
                    article
                })
                .collect();
            Ok(articles)
        })
    }
}

/// Answers with a fixed acknowledgement of the last user message.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureCompletionClient;

impl CompletionClient for FixtureCompletionClient {
    fn id(&self) -> ProviderId {
        ProviderId::Fixture
    }

    fn complete<'a>(
        &'a self,
        req: CompletionRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Completion, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            let question = req
                .messages
                .iter()
                .rev()
                .find(|message| message.role == Role::User)
                .and_then(|message| {
                    message
                        .content
                        .lines()
                        .find_map(|line| line.strip_prefix("User Question:"))
                })
                .map(str::trim)
                .unwrap_or("");

            Ok(Completion {
                text: format!(
                    "Offline mode: no model was consulted for \"{question}\". \
                     Review the key statistics and RSI above before acting."
                ),
                model: req.model,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_source::SourceErrorKind;
    use crate::{normalize, validate, Market};

    #[tokio::test]
    async fn series_is_deterministic_and_valid() {
        let fetcher = FixtureSeriesFetcher::new();
        let request = SeriesRequest::new(normalize("INFY", Market::Domestic));

        let first = fetcher.fetch(request.clone()).await.expect("fixture");
        let second = fetcher.fetch(request).await.expect("fixture");
        assert_eq!(first, second);

        let series = validate(Some(first)).expect("complete bars");
        assert_eq!(series.len(), 52);
        assert_eq!(series.metadata().display_name(), Some("Infosys Limited"));
        assert_eq!(series.metadata().currency.as_deref(), Some("INR"));
        assert_eq!(
            series.last().map(|bar| bar.ts.unix_timestamp()),
            Some(ANCHOR_UNIX)
        );
    }

    #[tokio::test]
    async fn empty_symbol_is_not_found() {
        let error = FixtureSeriesFetcher::new()
            .fetch(SeriesRequest::new(normalize("", Market::Foreign)))
            .await
            .expect_err("nothing to fetch");
        assert_eq!(error.kind(), SourceErrorKind::NotFound);
    }

    #[tokio::test]
    async fn news_respects_cap() {
        let articles = FixtureNewsSource
            .search(NewsRequest::new("Apple Inc.", 2).expect("valid"))
            .await
            .expect("fixture");
        assert_eq!(articles.len(), 2);
        assert!(articles[0].title.contains("Apple Inc."));
    }
}
