//! News search contract.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize, Serializer};

use crate::data_source::SourceError;
use crate::{ProviderId, UtcDateTime, ValidationError};

pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/150";
pub const UNKNOWN_SOURCE: &str = "Unknown";
pub const MISSING_SUMMARY: &str = "No summary available.";

/// Default number of articles shown per request.
pub const DEFAULT_NEWS_LIMIT: usize = 5;

/// Safe-search level passed to the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SafeSearch {
    Strict,
    Moderate,
    Off,
}

/// Recency window for news results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeLimit {
    Day,
    Week,
    Month,
}

impl TimeLimit {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Day => "d",
            Self::Week => "w",
            Self::Month => "m",
        }
    }
}

/// News search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsRequest {
    pub query: String,
    pub region: String,
    pub safesearch: SafeSearch,
    pub time_limit: TimeLimit,
    pub max_results: usize,
}

impl NewsRequest {
    /// Worldwide, moderate, last day, capped at `max_results`.
    pub fn new(query: impl Into<String>, max_results: usize) -> Result<Self, ValidationError> {
        let query = query.into();
        if query.trim().is_empty() {
            return Err(ValidationError::EmptyQuery);
        }
        if max_results == 0 {
            return Err(ValidationError::ZeroResultCap);
        }

        Ok(Self {
            query,
            region: String::from("wt-wt"),
            safesearch: SafeSearch::Moderate,
            time_limit: TimeLimit::Day,
            max_results,
        })
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }
}

/// Single news result. Only title and url are guaranteed.
///
/// Serializes with placeholders in place of a missing body, source or image.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Article {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub date: Option<UtcDateTime>,
    #[serde(default)]
    pub image: Option<String>,
}

impl Article {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            body: None,
            source: None,
            date: None,
            image: None,
        }
    }

    pub fn body_or_placeholder(&self) -> &str {
        non_blank(self.body.as_deref()).unwrap_or(MISSING_SUMMARY)
    }

    pub fn source_or_unknown(&self) -> &str {
        non_blank(self.source.as_deref()).unwrap_or(UNKNOWN_SOURCE)
    }

    pub fn image_or_placeholder(&self) -> &str {
        non_blank(self.image.as_deref()).unwrap_or(PLACEHOLDER_IMAGE)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.trim().is_empty())
}

#[derive(Serialize)]
struct DisplayedArticle<'a> {
    title: &'a str,
    url: &'a str,
    body: &'a str,
    source: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    date: Option<UtcDateTime>,
    image: &'a str,
}

impl Serialize for Article {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        DisplayedArticle {
            title: &self.title,
            url: &self.url,
            body: self.body_or_placeholder(),
            source: self.source_or_unknown(),
            date: self.date,
            image: self.image_or_placeholder(),
        }
        .serialize(serializer)
    }
}

/// News provider contract.
pub trait NewsSource: Send + Sync {
    fn id(&self) -> ProviderId;

    /// Returns at most `req.max_results` articles, newest first when the
    /// provider orders them.
    fn search<'a>(
        &'a self,
        req: NewsRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Article>, SourceError>> + Send + 'a>>;
}
