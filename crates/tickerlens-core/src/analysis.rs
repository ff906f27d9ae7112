//! Request orchestration.
//!
//! [`Analyzer`] runs the core pipeline (normalize, fetch, validate, compute,
//! format) and the two side branches that consume its output: news search
//! and question answering. Side-branch failures never touch the computed
//! statistics; they only degrade their own [`Section`].

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::completion::{ChatMessage, CompletionClient, CompletionRequest};
use crate::config::GROQ_API_KEY_VAR;
use crate::data_source::{SeriesFetcher, SeriesRequest, SourceError, SourceErrorKind};
use crate::format::{format_currency, format_percent_change, format_volume, NOT_AVAILABLE};
use crate::indicators::{compute, IndicatorSet};
use crate::news::{Article, NewsRequest, NewsSource};
use crate::{
    normalize, validate, CanonicalSymbol, ConfigError, CurrencyContext, Market, PriceSeries,
    ProviderId, SeriesError, ServiceConfig, ValidationError,
};

pub const SYSTEM_PERSONA: &str =
    "You are a professional stock market analyst with expertise in both Indian and US markets.";

const CLOSING_INSTRUCTION: &str =
    "Please provide a detailed and informative answer based on the available data.";

/// Headlines quoted in the prompt.
pub const PROMPT_HEADLINES: usize = 5;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("no data found for '{symbol}': {source}")]
    SymbolNotFound { symbol: String, source: SourceError },

    #[error("failed to fetch data for '{symbol}': {source}")]
    Fetch { symbol: String, source: SourceError },

    #[error(transparent)]
    Series(#[from] SeriesError),

    #[error("news search failed: {0}")]
    Search(SourceError),

    #[error("answer generation failed: {0}")]
    Completion(SourceError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl AnalysisError {
    pub const fn code(&self) -> &'static str {
        match self {
            Self::SymbolNotFound { .. } => "analysis.symbol_not_found",
            Self::Fetch { .. } => "analysis.fetch_failed",
            Self::Series(error) => error.code(),
            Self::Search(_) => "analysis.search_failed",
            Self::Completion(_) => "analysis.completion_failed",
            Self::Config(_) => "config.invalid",
            Self::Validation(_) => "validation.invalid_input",
        }
    }

    pub const fn retryable(&self) -> bool {
        match self {
            Self::Fetch { source, .. } | Self::Search(source) | Self::Completion(source) => {
                source.retryable()
            }
            _ => false,
        }
    }
}

/// Formatted key statistics, ready for display and prompts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub latest_price: String,
    pub change_percent: String,
    pub period_high: String,
    pub period_low: String,
    pub mean_volume: String,
    pub sma_short: Option<String>,
    pub sma_long: Option<String>,
    pub latest_rsi: Option<String>,
}

impl Summary {
    fn new(indicators: &IndicatorSet, currency: CurrencyContext) -> Self {
        Self {
            latest_price: format_currency(indicators.latest_close, currency),
            change_percent: indicators
                .change
                .map(|change| format_percent_change(change.percent))
                .unwrap_or_else(|| NOT_AVAILABLE.to_owned()),
            period_high: format_currency(indicators.period_high, currency),
            period_low: format_currency(indicators.period_low, currency),
            mean_volume: format_volume(indicators.mean_volume),
            sma_short: indicators
                .sma_short
                .map(|average| format_currency(average.value, currency)),
            sma_long: indicators
                .sma_long
                .map(|average| format_currency(average.value, currency)),
            latest_rsi: indicators.latest_rsi().map(|value| format!("{value:.2}")),
        }
    }

    /// `low - high`, as quoted in prompts.
    pub fn period_range(&self) -> String {
        format!("{} - {}", self.period_low, self.period_high)
    }
}

/// Result of the core pipeline for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    /// Symbol as the user selected it, before normalization.
    pub requested: String,
    pub symbol: CanonicalSymbol,
    pub market: Market,
    pub currency: CurrencyContext,
    pub display_name: Option<String>,
    pub series: PriceSeries,
    pub indicators: IndicatorSet,
    pub summary: Summary,
}

impl Analysis {
    /// News query: long name, then short name, then the selected symbol.
    pub fn news_query(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.requested)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionFailure {
    pub code: String,
    pub message: String,
    pub retryable: bool,
}

impl From<&AnalysisError> for SectionFailure {
    fn from(error: &AnalysisError) -> Self {
        Self {
            code: error.code().to_owned(),
            message: error.to_string(),
            retryable: error.retryable(),
        }
    }
}

/// Outcome of an optional dashboard branch.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Section<T> {
    Ready(T),
    Failed(SectionFailure),
    Skipped,
}

impl<T> Section<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&SectionFailure> {
        match self {
            Self::Failed(failure) => Some(failure),
            _ => None,
        }
    }

    fn from_result(result: Result<T, AnalysisError>) -> Self {
        match result {
            Ok(value) => Self::Ready(value),
            Err(error) => Self::Failed(SectionFailure::from(&error)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardRequest {
    pub symbol: String,
    pub market: Market,
    pub question: Option<String>,
    pub include_news: bool,
}

impl DashboardRequest {
    pub fn new(symbol: impl Into<String>, market: Market) -> Self {
        Self {
            symbol: symbol.into(),
            market,
            question: None,
            include_news: true,
        }
    }

    pub fn with_question(mut self, question: impl Into<String>) -> Self {
        self.question = Some(question.into());
        self
    }

    pub fn without_news(mut self) -> Self {
        self.include_news = false;
        self
    }
}

/// Full single-symbol view: statistics plus optional news and answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub analysis: Analysis,
    pub news: Section<Vec<Article>>,
    pub answer: Section<String>,
    #[serde(skip)]
    pub providers: Vec<ProviderId>,
}

impl Dashboard {
    /// `(section, failure)` for every degraded branch.
    pub fn degraded(&self) -> Vec<(&'static str, &SectionFailure)> {
        [("news", self.news.failure()), ("answer", self.answer.failure())]
            .into_iter()
            .filter_map(|(section, failure)| failure.map(|failure| (section, failure)))
            .collect()
    }
}

/// Pipeline orchestrator with injected collaborators.
#[derive(Clone)]
pub struct Analyzer {
    fetcher: Arc<dyn SeriesFetcher>,
    news: Arc<dyn NewsSource>,
    completion: Option<Arc<dyn CompletionClient>>,
    model: String,
    temperature: f32,
    news_region: String,
    news_max_results: usize,
}

impl Analyzer {
    pub fn new(
        fetcher: Arc<dyn SeriesFetcher>,
        news: Arc<dyn NewsSource>,
        config: &ServiceConfig,
    ) -> Self {
        Self {
            fetcher,
            news,
            completion: None,
            model: config.completion_model.clone(),
            temperature: config.temperature,
            news_region: config.news_region.clone(),
            news_max_results: config.news_max_results,
        }
    }

    pub fn with_completion(mut self, completion: Arc<dyn CompletionClient>) -> Self {
        self.completion = Some(completion);
        self
    }

    pub fn series_provider(&self) -> ProviderId {
        self.fetcher.id()
    }

    pub fn news_provider(&self) -> ProviderId {
        self.news.id()
    }

    pub fn completion_provider(&self) -> Option<ProviderId> {
        self.completion.as_ref().map(|completion| completion.id())
    }

    /// Normalize, fetch, validate, compute and format one symbol.
    pub async fn analyze(&self, raw_symbol: &str, market: Market) -> Result<Analysis, AnalysisError> {
        let requested = raw_symbol.trim().to_owned();
        let symbol = normalize(raw_symbol, market);
        info!(requested = %requested, symbol = %symbol, market = %market, "analysis started");

        let raw = self
            .fetcher
            .fetch(SeriesRequest::new(symbol.clone()))
            .await
            .map_err(|source| {
                warn!(symbol = %symbol, error = %source, "series fetch failed");
                match source.kind() {
                    SourceErrorKind::NotFound => AnalysisError::SymbolNotFound {
                        symbol: symbol.to_string(),
                        source,
                    },
                    _ => AnalysisError::Fetch {
                        symbol: symbol.to_string(),
                        source,
                    },
                }
            })?;

        let series = validate(Some(raw))?;
        let indicators = compute(&series);
        let currency = market.currency();
        let summary = Summary::new(&indicators, currency);
        info!(
            symbol = %symbol,
            bars = series.len(),
            rsi_points = indicators.rsi.len(),
            "analysis complete"
        );

        Ok(Analysis {
            requested,
            display_name: series.metadata().display_name().map(str::to_owned),
            symbol,
            market,
            currency,
            series,
            indicators,
            summary,
        })
    }

    /// Recent headlines about the analysed company.
    pub async fn news(&self, analysis: &Analysis) -> Result<Vec<Article>, AnalysisError> {
        let request = NewsRequest::new(analysis.news_query(), self.news_max_results)?
            .with_region(self.news_region.clone());
        let mut articles = self
            .news
            .search(request)
            .await
            .map_err(AnalysisError::Search)?;
        articles.truncate(self.news_max_results);
        Ok(articles)
    }

    /// Answer `question` grounded on the analysis and headlines.
    pub async fn ask(
        &self,
        analysis: &Analysis,
        articles: &[Article],
        question: &str,
    ) -> Result<String, AnalysisError> {
        if question.trim().is_empty() {
            return Err(ValidationError::EmptyQuestion.into());
        }
        let completion = self.completion.as_ref().ok_or(ConfigError::MissingCredential {
            name: GROQ_API_KEY_VAR,
        })?;

        let request = CompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(SYSTEM_PERSONA),
                ChatMessage::user(build_prompt(analysis, articles, question.trim())),
            ],
            temperature: self.temperature,
        };

        let answer = completion
            .complete(request)
            .await
            .map_err(AnalysisError::Completion)?;
        Ok(answer.text)
    }

    /// Run the whole request. Only core pipeline failures are returned as
    /// errors; news and answer failures are recorded in their sections.
    pub async fn dashboard(&self, request: &DashboardRequest) -> Result<Dashboard, AnalysisError> {
        let analysis = self.analyze(&request.symbol, request.market).await?;
        let mut providers = vec![self.series_provider()];

        let news = if request.include_news {
            providers.push(self.news_provider());
            Section::from_result(self.news(&analysis).await)
        } else {
            Section::Skipped
        };
        if let Some(failure) = news.failure() {
            warn!(code = %failure.code, "news section degraded");
        }

        let question = request
            .question
            .as_deref()
            .map(str::trim)
            .filter(|question| !question.is_empty());
        let answer = match question {
            Some(question) => {
                providers.extend(self.completion_provider());
                let articles = news.ready().map(Vec::as_slice).unwrap_or_default();
                Section::from_result(self.ask(&analysis, articles, question).await)
            }
            None => Section::Skipped,
        };
        if let Some(failure) = answer.failure() {
            warn!(code = %failure.code, "answer section degraded");
        }

        Ok(Dashboard {
            analysis,
            news,
            answer,
            providers,
        })
    }
}

/// Prompt bundle sent with the user's question.
pub fn build_prompt(analysis: &Analysis, articles: &[Article], question: &str) -> String {
    let headlines = articles
        .iter()
        .take(PROMPT_HEADLINES)
        .map(|article| article.title.as_str())
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Stock: {symbol}\n\
         Market: {market}\n\
         Latest Price: {price}\n\
         52-Week Range: {range}\n\
         \n\
         News: {count} articles found\n\
         {headlines}\n\
         \n\
         User Question: {question}\n\
         \n\
         {CLOSING_INSTRUCTION}\n",
        symbol = analysis.requested,
        market = analysis.market.label(),
        price = analysis.summary.latest_price,
        range = analysis.summary.period_range(),
        count = articles.len(),
    )
}
