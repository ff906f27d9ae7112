//! Collaborator error type and the historical series contract.
//!
//! The pipeline never talks to a provider directly: it holds a
//! [`SeriesFetcher`] (and, for the side branches, a
//! [`NewsSource`](crate::NewsSource) and a
//! [`CompletionClient`](crate::CompletionClient)), so providers can be swapped
//! or replaced by stubs in tests.
//!
//! ```rust,ignore
//! use tickerlens_core::{normalize, Market, SeriesFetcher, SeriesRequest, YahooAdapter};
//!
//! async fn fetch(adapter: &YahooAdapter) -> Result<(), SourceError> {
//!     let request = SeriesRequest::new(normalize("INFY", Market::Domestic));
//!     let raw = adapter.fetch(request).await?;
//!     println!("{} bars", raw.bars.len());
//!     Ok(())
//! }
//! ```

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use crate::{CanonicalSymbol, Lookback, ProviderId, RawSeries};

/// Collaborator-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    /// The provider answered but has nothing for the request.
    NotFound,
    Unavailable,
    RateLimited,
    Unauthorized,
    InvalidRequest,
    Internal,
}

/// Structured error returned by every collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
    retryable: bool,
}

impl SourceError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::NotFound,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Unavailable,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::RateLimited,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Unauthorized,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::InvalidRequest,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Internal,
            message: message.into(),
            retryable: false,
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::NotFound => "source.not_found",
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::RateLimited => "source.rate_limited",
            SourceErrorKind::Unauthorized => "source.unauthorized",
            SourceErrorKind::InvalidRequest => "source.invalid_request",
            SourceErrorKind::Internal => "source.internal",
        }
    }

    /// Classify an HTTP status returned by a provider.
    pub fn from_status(provider: ProviderId, status: u16) -> Self {
        let message = format!("{provider} returned status {status}");
        match status {
            401 | 403 => Self::unauthorized(message),
            404 => Self::not_found(message),
            429 => Self::rate_limited(message),
            400..=499 => Self::invalid_request(message),
            _ => Self::unavailable(message),
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

/// Request for one symbol's trailing history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesRequest {
    pub symbol: CanonicalSymbol,
    pub lookback: Lookback,
}

impl SeriesRequest {
    pub fn new(symbol: CanonicalSymbol) -> Self {
        Self {
            symbol,
            lookback: Lookback::ONE_YEAR_WEEKLY,
        }
    }
}

/// Historical data provider contract.
///
/// Implementations return bars exactly as delivered (fields may be missing)
/// and signal an unknown symbol with [`SourceErrorKind::NotFound`], distinct
/// from transport failures.
pub trait SeriesFetcher: Send + Sync {
    fn id(&self) -> ProviderId;

    fn fetch<'a>(
        &'a self,
        req: SeriesRequest,
    ) -> Pin<Box<dyn Future<Output = Result<RawSeries, SourceError>> + Send + 'a>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_http_status() {
        assert_eq!(
            SourceError::from_status(ProviderId::Yahoo, 404).kind(),
            SourceErrorKind::NotFound
        );
        assert_eq!(
            SourceError::from_status(ProviderId::Groq, 401).kind(),
            SourceErrorKind::Unauthorized
        );
        let limited = SourceError::from_status(ProviderId::Duckduckgo, 429);
        assert_eq!(limited.kind(), SourceErrorKind::RateLimited);
        assert!(limited.retryable());
        assert_eq!(
            SourceError::from_status(ProviderId::Yahoo, 503).code(),
            "source.unavailable"
        );
    }

    #[test]
    fn series_request_uses_weekly_year() {
        let request = SeriesRequest::new(crate::normalize("AAPL", crate::Market::Foreign));
        assert_eq!(request.lookback.range, "1y");
        assert_eq!(request.lookback.interval, "1wk");
    }
}
