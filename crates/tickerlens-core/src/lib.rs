//! # Tickerlens Core
//!
//! Market-data normalization and technical-indicator pipeline for the
//! `tickerlens` equity dashboard.
//!
//! ## Overview
//!
//! - **Symbol normalization** per market (NSE/BSE suffix rules)
//! - **Series validation** of raw provider bars
//! - **Indicators**: latest change, period extremes, mean volume, SMA, RSI
//! - **Presentation formatting** for rupee and dollar amounts
//! - **Collaborator traits** for market data, news and chat completion
//! - **Orchestration** of a full dashboard request with graceful degradation
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Yahoo, DuckDuckGo, Groq and offline fixture adapters |
//! | [`analysis`] | Request orchestrator and dashboard sections |
//! | [`completion`] | Chat completion contract |
//! | [`config`] | Service configuration from `.env` and environment |
//! | [`data_source`] | Series fetch contract and collaborator errors |
//! | [`domain`] | Markets, symbols, bars and series |
//! | [`envelope`] | Response envelope with metadata |
//! | [`error`] | Core error types |
//! | [`format`] | Currency, percentage and volume formatting |
//! | [`http_client`] | HTTP client abstraction |
//! | [`indicators`] | Technical indicator engine |
//! | [`news`] | News search contract |
//! | [`retry`] | Backoff and retry for idempotent requests |
//! | [`source`] | Provider identifiers |
//! | [`validator`] | Raw series validation |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tickerlens_core::{Analyzer, DuckDuckGoAdapter, Market, ServiceConfig, YahooAdapter};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ServiceConfig::from_env()?;
//!     let analyzer = Analyzer::new(
//!         Arc::new(YahooAdapter::new(&config)),
//!         Arc::new(DuckDuckGoAdapter::new(&config)),
//!         &config,
//!     );
//!
//!     let analysis = analyzer.analyze("INFY", Market::Domestic).await?;
//!     println!("{} {}", analysis.symbol, analysis.summary.latest_price);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  CLI / User     │
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │  Analyzer       │────▶│ News / Chat      │
//! └────────┬────────┘     │ (side branches)  │
//!          │              └──────────────────┘
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ Series Fetcher  │────▶│ HTTP Client      │
//! │ (Adapter Trait) │     │ + retry          │
//! └────────┬────────┘     └──────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ Validator       │────▶│ Indicators       │
//! └─────────────────┘     │ + formatting     │
//!                         └──────────────────┘
//! ```
//!
//! ## Error Handling
//!
//! Collaborators report [`SourceError`]; the orchestrator lifts them into
//! [`AnalysisError`]:
//!
//! ```rust
//! use tickerlens_core::{SourceError, SourceErrorKind};
//!
//! fn describe(error: &SourceError) -> &'static str {
//!     match error.kind() {
//!         SourceErrorKind::NotFound => "unknown symbol",
//!         SourceErrorKind::RateLimited | SourceErrorKind::Unavailable => "try again later",
//!         _ => "request failed",
//!     }
//! }
//! ```
//!
//! ## Security
//!
//! - The Groq API key is read once into [`ServiceConfig`] and never logged
//! - Debug output of configs and adapters redacts credentials

pub mod adapters;
pub mod analysis;
pub mod completion;
pub mod config;
pub mod data_source;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod format;
pub mod http_client;
pub mod indicators;
pub mod news;
pub mod retry;
pub mod source;
pub mod validator;

pub use adapters::{
    DuckDuckGoAdapter, FixtureCompletionClient, FixtureNewsSource, FixtureSeriesFetcher,
    GroqAdapter, YahooAdapter,
};
pub use analysis::{
    build_prompt, Analysis, AnalysisError, Analyzer, Dashboard, DashboardRequest, Section,
    SectionFailure, Summary, SYSTEM_PERSONA,
};
pub use completion::{ChatMessage, Completion, CompletionClient, CompletionRequest, Role};
pub use config::ServiceConfig;
pub use data_source::{SeriesFetcher, SeriesRequest, SourceError, SourceErrorKind};
pub use domain::*;
pub use envelope::{Envelope, EnvelopeError, EnvelopeMeta, SCHEMA_VERSION};
pub use error::{ConfigError, InsufficientHistory, SeriesError, ValidationError};
pub use format::{format_currency, format_percent_change, format_volume, NOT_AVAILABLE};
pub use indicators::{
    compute, price_change, rsi, sma, IndicatorSet, MovingAverage, PriceChange, RsiPoint,
    LONG_SMA_WINDOW, RSI_PERIOD, SHORT_SMA_WINDOW,
};
pub use news::{
    Article, NewsRequest, NewsSource, SafeSearch, TimeLimit, MISSING_SUMMARY, PLACEHOLDER_IMAGE,
    UNKNOWN_SOURCE,
};
pub use source::ProviderId;
pub use validator::validate;
