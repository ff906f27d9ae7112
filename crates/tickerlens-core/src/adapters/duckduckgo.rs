use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, info};

use crate::data_source::SourceError;
use crate::http_client::{HttpClient, HttpRequest, ReqwestHttpClient};
use crate::news::{Article, NewsRequest, NewsSource, SafeSearch};
use crate::retry::{execute_with_retry, RetryConfig};
use crate::{ProviderId, ServiceConfig, UtcDateTime};

const LANDING_ENDPOINT: &str = "https://duckduckgo.com/";
const NEWS_ENDPOINT: &str = "https://duckduckgo.com/news.js";

/// Recent headlines from DuckDuckGo's news endpoint.
///
/// Each search is two GETs: the landing page, which carries the `vqd` token
/// the news endpoint requires, then `news.js` itself.
#[derive(Clone)]
pub struct DuckDuckGoAdapter {
    http_client: Arc<dyn HttpClient>,
    retry: RetryConfig,
    timeout_ms: u64,
}

impl DuckDuckGoAdapter {
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

    async fn get(&self, request: HttpRequest) -> Result<String, SourceError> {
        let request = request.with_timeout_ms(self.timeout_ms);
        let response = execute_with_retry(self.http_client.as_ref(), request, &self.retry)
            .await
            .map_err(|e| {
                SourceError::unavailable(format!("duckduckgo transport error: {}", e.message()))
            })?;

        if !response.is_success() {
            return Err(SourceError::from_status(
                ProviderId::Duckduckgo,
                response.status,
            ));
        }
        Ok(response.body)
    }

    async fn vqd_token(&self, query: &str) -> Result<String, SourceError> {
        let html = self
            .get(HttpRequest::get(LANDING_ENDPOINT).with_query("q", query))
            .await?;
        extract_vqd(&html).ok_or_else(|| {
            SourceError::unavailable(format!("duckduckgo returned no vqd token for '{query}'"))
        })
    }

    async fn search_news(&self, req: &NewsRequest) -> Result<Vec<Article>, SourceError> {
        let vqd = self.vqd_token(&req.query).await?;
        debug!(query = %req.query, "duckduckgo vqd acquired");

        let request = HttpRequest::get(NEWS_ENDPOINT)
            .with_query("l", req.region.as_str())
            .with_query("o", "json")
            .with_query("noamp", "1")
            .with_query("q", req.query.as_str())
            .with_query("vqd", vqd)
            .with_query("p", safesearch_param(req.safesearch))
            .with_query("df", req.time_limit.as_str());

        let body = self.get(request).await?;
        let articles = parse_news(&body, req.max_results)?;
        info!(query = %req.query, articles = articles.len(), "duckduckgo news fetched");
        Ok(articles)
    }
}

impl NewsSource for DuckDuckGoAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Duckduckgo
    }

    fn search<'a>(
        &'a self,
        req: NewsRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Article>, SourceError>> + Send + 'a>> {
        Box::pin(async move { self.search_news(&req).await })
    }
}

const fn safesearch_param(level: SafeSearch) -> &'static str {
    match level {
        SafeSearch::Strict => "1",
        SafeSearch::Moderate => "-1",
        SafeSearch::Off => "-2",
    }
}

/// Pull the `vqd` token out of the landing page markup.
fn extract_vqd(html: &str) -> Option<String> {
    for (open, close) in [("vqd=\"", '"'), ("vqd='", '\''), ("vqd=", '&')] {
        let Some(start) = html.find(open).map(|index| index + open.len()) else {
            continue;
        };
        let rest = &html[start..];
        if let Some(end) = rest.find(close) {
            let token = &rest[..end];
            if !token.is_empty() {
                return Some(token.to_owned());
            }
        }
    }
    None
}

fn parse_news(body: &str, max_results: usize) -> Result<Vec<Article>, SourceError> {
    let payload: NewsPayload = serde_json::from_str(body)
        .map_err(|e| SourceError::internal(format!("failed to parse duckduckgo news: {e}")))?;

    let mut seen = HashSet::new();
    let articles = payload
        .results
        .into_iter()
        .filter(|row| !row.title.trim().is_empty() && seen.insert(row.url.clone()))
        .take(max_results)
        .map(|row| Article {
            title: strip_tags(&row.title),
            url: row.url,
            body: row.excerpt.map(|excerpt| strip_tags(&excerpt)),
            source: row.source,
            date: row
                .date
                .and_then(|seconds| UtcDateTime::from_unix_timestamp(seconds).ok()),
            image: row.image,
        })
        .collect();

    Ok(articles)
}

/// Drop the highlight markup DuckDuckGo wraps around matched terms.
fn strip_tags(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_tag = false;
    for ch in text.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out.replace("&amp;", "&")
        .replace("&quot;", "\"")
        .replace("&#x27;", "'")
        .replace("&#39;", "'")
}

#[derive(Debug, Deserialize)]
struct NewsPayload {
    #[serde(default)]
    results: Vec<NewsRow>,
}

#[derive(Debug, Deserialize)]
struct NewsRow {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    excerpt: Option<String>,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    date: Option<i64>,
    #[serde(default)]
    image: Option<String>,
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use super::*;
    use crate::data_source::SourceErrorKind;
    use crate::http_client::{HttpError, HttpResponse};

    const LANDING_HTML: &str =
        r#"<html><script>DDG.deep.initialize('/d.js?q=Apple&vqd="4-1234567890"&p=1');</script></html>"#;

    const NEWS_BODY: &str = r#"{
        "results": [
            {"date": 1717171200, "title": "<b>Apple</b> unveils new chips", "url": "https://news.test/a",
             "excerpt": "Apple &amp; partners", "source": "Reuters", "image": "https://img.test/a.png"},
            {"date": 1717167600, "title": "Apple earnings preview", "url": "https://news.test/b"},
            {"date": 1717164000, "title": "Duplicate link", "url": "https://news.test/a"},
            {"date": 1717160400, "title": "Third story", "url": "https://news.test/c"}
        ]
    }"#;

    /// Serves the landing page first, then the news payload.
    struct SequencedHttpClient {
        responses: Mutex<Vec<Result<HttpResponse, HttpError>>>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl SequencedHttpClient {
        fn new(mut responses: Vec<Result<HttpResponse, HttpError>>) -> Self {
            responses.reverse();
            Self {
                responses: Mutex::new(responses),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn recorded_requests(&self) -> Vec<HttpRequest> {
            self.requests.lock().expect("lock").clone()
        }
    }

    impl HttpClient for SequencedHttpClient {
        fn execute<'a>(
            &'a self,
            request: HttpRequest,
        ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
            self.requests.lock().expect("lock").push(request);
            let next = self
                .responses
                .lock()
                .expect("lock")
                .pop()
                .unwrap_or_else(|| Err(HttpError::non_retryable("no scripted response")));
            Box::pin(async move { next })
        }
    }

    fn adapter(client: Arc<SequencedHttpClient>) -> DuckDuckGoAdapter {
        DuckDuckGoAdapter::with_http_client(client).with_retry(RetryConfig::fixed(Duration::ZERO, 0))
    }

    #[test]
    fn extracts_quoted_vqd_token() {
        assert_eq!(extract_vqd(LANDING_HTML).as_deref(), Some("4-1234567890"));
        assert_eq!(
            extract_vqd("...vqd=4-999&kl=wt-wt").as_deref(),
            Some("4-999")
        );
        assert_eq!(extract_vqd("<html></html>"), None);
    }

    #[tokio::test]
    async fn search_sends_dashboard_parameters_and_caps_results() {
        let client = Arc::new(SequencedHttpClient::new(vec![
            Ok(HttpResponse::ok_json(LANDING_HTML)),
            Ok(HttpResponse::ok_json(NEWS_BODY)),
        ]));
        let request = NewsRequest::new("Apple Inc.", 2).expect("valid");

        let articles = adapter(Arc::clone(&client))
            .search(request)
            .await
            .expect("search succeeds");

        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title, "Apple unveils new chips");
        assert_eq!(articles[0].body.as_deref(), Some("Apple & partners"));
        assert_eq!(articles[0].source_or_unknown(), "Reuters");
        assert_eq!(
            articles[0].date.map(|date| date.format_rfc3339()).as_deref(),
            Some("2024-05-31T16:00:00Z")
        );
        assert_eq!(articles[1].image_or_placeholder(), crate::news::PLACEHOLDER_IMAGE);

        let requests = client.recorded_requests();
        let news_url = requests[1].full_url();
        assert!(news_url.starts_with(NEWS_ENDPOINT));
        assert!(news_url.contains("q=Apple%20Inc."));
        assert!(news_url.contains("l=wt-wt"));
        assert!(news_url.contains("p=-1"));
        assert!(news_url.contains("df=d"));
        assert!(news_url.contains("vqd=4-1234567890"));
    }

    #[test]
    fn duplicate_urls_are_dropped() {
        let articles = parse_news(NEWS_BODY, 10).expect("parses");
        let urls = articles.iter().map(|a| a.url.as_str()).collect::<Vec<_>>();
        assert_eq!(
            urls,
            vec!["https://news.test/a", "https://news.test/b", "https://news.test/c"]
        );
    }

    #[tokio::test]
    async fn missing_token_is_unavailable() {
        let client = Arc::new(SequencedHttpClient::new(vec![Ok(HttpResponse::ok_json(
            "<html>blocked</html>",
        ))]));

        let error = adapter(client)
            .search(NewsRequest::new("Apple", 5).expect("valid"))
            .await
            .expect_err("no token");

        assert_eq!(error.kind(), SourceErrorKind::Unavailable);
    }

    #[tokio::test]
    async fn rate_limit_is_reported() {
        let client = Arc::new(SequencedHttpClient::new(vec![Ok(HttpResponse::with_status(
            429, "",
        ))]));

        let error = adapter(client)
            .search(NewsRequest::new("Apple", 5).expect("valid"))
            .await
            .expect_err("rate limited");

        assert_eq!(error.kind(), SourceErrorKind::RateLimited);
    }
}
