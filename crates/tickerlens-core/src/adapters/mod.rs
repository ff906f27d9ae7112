//! Collaborator adapters.
//!
//! | Adapter | Contract | Endpoint |
//! |---------|----------|----------|
//! | [`YahooAdapter`] | [`SeriesFetcher`](crate::SeriesFetcher) | Yahoo Finance v8 chart |
//! | [`DuckDuckGoAdapter`] | [`NewsSource`](crate::NewsSource) | DuckDuckGo `news.js` |
//! | [`GroqAdapter`] | [`CompletionClient`](crate::CompletionClient) | Groq chat completions |
//! | `Fixture*` | all three | none (deterministic offline data) |

pub mod duckduckgo;
pub mod fixture;
pub mod groq;
pub mod yahoo;

pub use duckduckgo::DuckDuckGoAdapter;
pub use fixture::{FixtureCompletionClient, FixtureNewsSource, FixtureSeriesFetcher};
pub use groq::GroqAdapter;
pub use yahoo::YahooAdapter;
