//! Behavior-driven tests for collaborator failures
//!
//! These tests verify HOW failures surface: core pipeline failures abort the
//! request with a typed error, while news and answer failures only degrade
//! their own dashboard section.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tickerlens_core::{
    AnalysisError, Analyzer, Article, Completion, CompletionClient, CompletionRequest,
    ConfigError, DashboardRequest, FixtureCompletionClient, FixtureNewsSource,
    FixtureSeriesFetcher, GroqAdapter, Market, NewsRequest, NewsSource, ProviderId, RawBar,
    RawSeries, Section, SeriesError, SeriesFetcher, SeriesMetadata, SeriesRequest,
    ServiceConfig, SourceError, SourceErrorKind, UtcDateTime, ValidationError,
};

// =============================================================================
// Failing collaborators
// =============================================================================

/// Fetcher that fails every call with the given error.
struct FailingFetcher {
    error: SourceError,
}

impl SeriesFetcher for FailingFetcher {
    fn id(&self) -> ProviderId {
        ProviderId::Yahoo
    }

    fn fetch<'a>(
        &'a self,
        _req: SeriesRequest,
    ) -> Pin<Box<dyn Future<Output = Result<RawSeries, SourceError>> + Send + 'a>> {
        Box::pin(async move { Err(self.error.clone()) })
    }
}

/// Fetcher whose second bar has no volume.
struct GappyFetcher;

impl SeriesFetcher for GappyFetcher {
    fn id(&self) -> ProviderId {
        ProviderId::Yahoo
    }

    fn fetch<'a>(
        &'a self,
        req: SeriesRequest,
    ) -> Pin<Box<dyn Future<Output = Result<RawSeries, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            let bars = (0..3_i64)
                .map(|week| RawBar {
                    ts: UtcDateTime::from_unix_timestamp(1_704_067_200 + week * 604_800).ok(),
                    open: Some(10.0),
                    high: Some(11.0),
                    low: Some(9.0),
                    close: Some(10.5),
                    volume: (week != 1).then_some(100),
                })
                .collect();
            Ok(RawSeries::new(req.symbol, bars, SeriesMetadata::default()))
        })
    }
}

struct FailingNews;

impl NewsSource for FailingNews {
    fn id(&self) -> ProviderId {
        ProviderId::Duckduckgo
    }

    fn search<'a>(
        &'a self,
        _req: NewsRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Article>, SourceError>> + Send + 'a>> {
        Box::pin(async { Err(SourceError::rate_limited("too many searches")) })
    }
}

#[derive(Default)]
struct FailingCompletion {
    calls: AtomicUsize,
}

impl CompletionClient for FailingCompletion {
    fn id(&self) -> ProviderId {
        ProviderId::Groq
    }

    fn complete<'a>(
        &'a self,
        _req: CompletionRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Completion, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(SourceError::unauthorized("invalid api key"))
        })
    }
}

fn with_fetcher(fetcher: Arc<dyn SeriesFetcher>) -> Analyzer {
    Analyzer::new(fetcher, Arc::new(FixtureNewsSource), &ServiceConfig::default())
}

fn fixture_analyzer(news: Arc<dyn NewsSource>) -> Analyzer {
    Analyzer::new(
        Arc::new(FixtureSeriesFetcher::new()),
        news,
        &ServiceConfig::default(),
    )
}

// =============================================================================
// Core Pipeline Failures
// =============================================================================

#[tokio::test]
async fn when_provider_has_no_data_symbol_not_found_is_reported() {
    // Given: A provider that does not know the symbol
    let analyzer = with_fetcher(Arc::new(FailingFetcher {
        error: SourceError::not_found("No data found, symbol may be delisted"),
    }));

    // When: Analysing it
    let error = analyzer
        .analyze("NOPE", Market::Domestic)
        .await
        .expect_err("unknown symbol");

    // Then: The error names the canonical symbol and is not retryable
    match &error {
        AnalysisError::SymbolNotFound { symbol, source } => {
            assert_eq!(symbol, "NOPE.NS");
            assert_eq!(source.kind(), SourceErrorKind::NotFound);
        }
        other => panic!("expected SymbolNotFound, got {other:?}"),
    }
    assert_eq!(error.code(), "analysis.symbol_not_found");
    assert!(!error.retryable());
}

#[tokio::test]
async fn when_provider_is_unreachable_fetch_failure_is_distinct_from_not_found() {
    let analyzer = with_fetcher(Arc::new(FailingFetcher {
        error: SourceError::unavailable("connection reset"),
    }));

    let error = analyzer
        .dashboard(&DashboardRequest::new("AAPL", Market::Foreign))
        .await
        .expect_err("transport failure aborts the request");

    assert!(matches!(error, AnalysisError::Fetch { .. }));
    assert_eq!(error.code(), "analysis.fetch_failed");
    assert!(error.retryable());
}

#[tokio::test]
async fn when_a_bar_is_incomplete_analysis_reports_missing_fields() {
    let analyzer = with_fetcher(Arc::new(GappyFetcher));

    let error = analyzer
        .analyze("TCS", Market::Domestic)
        .await
        .expect_err("incomplete series");

    match error {
        AnalysisError::Series(SeriesError::MissingFields { index, field }) => {
            assert_eq!(index, 1);
            assert_eq!(field, "volume");
        }
        other => panic!("expected MissingFields, got {other:?}"),
    }
}

#[tokio::test]
async fn when_fixture_symbol_is_blank_provider_reports_not_found() {
    let analyzer = fixture_analyzer(Arc::new(FixtureNewsSource));

    let error = analyzer
        .analyze("  ", Market::Foreign)
        .await
        .expect_err("blank symbol");

    assert!(matches!(error, AnalysisError::SymbolNotFound { .. }));
}

// =============================================================================
// Side Branch Degradation
// =============================================================================

#[tokio::test]
async fn when_news_search_fails_statistics_are_still_shown() {
    // Given: A working price provider and a failing news provider
    let analyzer = fixture_analyzer(Arc::new(FailingNews));

    // When: Requesting the dashboard
    let dashboard = analyzer
        .dashboard(&DashboardRequest::new("INFY", Market::Domestic))
        .await
        .expect("statistics survive news failure");

    // Then: Only the news section is degraded
    assert!(!dashboard.analysis.series.is_empty());
    let failure = dashboard.news.failure().expect("news failed");
    assert_eq!(failure.code, "analysis.search_failed");
    assert!(failure.retryable);
    assert_eq!(dashboard.answer, Section::Skipped);

    let degraded = dashboard.degraded();
    assert_eq!(degraded.len(), 1);
    assert_eq!(degraded[0].0, "news");
}

#[tokio::test]
async fn when_completion_fails_only_answer_section_degrades() {
    let completion = Arc::new(FailingCompletion::default());
    let analyzer =
        fixture_analyzer(Arc::new(FixtureNewsSource)).with_completion(completion.clone());

    let request = DashboardRequest::new("AAPL", Market::Foreign).with_question("Buy or sell?");
    let dashboard = analyzer.dashboard(&request).await.expect("dashboard");

    assert_eq!(completion.calls.load(Ordering::SeqCst), 1);
    assert!(dashboard.news.ready().is_some());
    let failure = dashboard.answer.failure().expect("answer failed");
    assert_eq!(failure.code, "analysis.completion_failed");
    assert!(!failure.retryable);
    assert_eq!(dashboard.degraded()[0].0, "answer");
}

#[tokio::test]
async fn when_news_fails_question_is_still_answered_without_headlines() {
    let analyzer = fixture_analyzer(Arc::new(FailingNews))
        .with_completion(Arc::new(FixtureCompletionClient));

    let request = DashboardRequest::new("MSFT", Market::Foreign).with_question("Outlook?");
    let dashboard = analyzer.dashboard(&request).await.expect("dashboard");

    assert!(dashboard.news.failure().is_some());
    let answer = dashboard.answer.ready().expect("answered");
    assert!(answer.contains("Outlook?"));
}

// =============================================================================
// Configuration and Input Errors
// =============================================================================

#[test]
fn when_api_key_is_missing_completion_adapter_cannot_be_built() {
    let error = GroqAdapter::new(&ServiceConfig::default()).expect_err("no key");

    assert_eq!(
        error,
        ConfigError::MissingCredential {
            name: "GROQ_API_KEY"
        }
    );
}

#[tokio::test]
async fn when_no_completion_client_is_configured_ask_reports_config_error() {
    let analyzer = fixture_analyzer(Arc::new(FixtureNewsSource));
    let analysis = analyzer
        .analyze("RELIANCE", Market::Domestic)
        .await
        .expect("analysis");

    let error = analyzer
        .ask(&analysis, &[], "Is it overbought?")
        .await
        .expect_err("no completion client");

    assert!(matches!(
        error,
        AnalysisError::Config(ConfigError::MissingCredential { .. })
    ));
}

#[tokio::test]
async fn when_question_is_blank_ask_rejects_it_before_calling_the_model() {
    let completion = Arc::new(FailingCompletion::default());
    let analyzer =
        fixture_analyzer(Arc::new(FixtureNewsSource)).with_completion(completion.clone());
    let analysis = analyzer
        .analyze("TSLA", Market::Foreign)
        .await
        .expect("analysis");

    let error = analyzer
        .ask(&analysis, &[], " \t ")
        .await
        .expect_err("blank question");

    assert!(matches!(
        error,
        AnalysisError::Validation(ValidationError::EmptyQuestion)
    ));
    assert_eq!(completion.calls.load(Ordering::SeqCst), 0);
}
