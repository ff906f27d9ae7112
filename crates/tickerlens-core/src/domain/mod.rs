//! # Domain Models
//!
//! Canonical domain types for tickerlens market data.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Market`] | Market selector (domestic / foreign) |
//! | [`CurrencyContext`] | Display currency picked by market |
//! | [`CanonicalSymbol`] | Provider-ready ticker after suffix rules |
//! | [`RawSeries`] | Unvalidated provider payload |
//! | [`PriceBar`] | Complete OHLCV observation |
//! | [`PriceSeries`] | Validated, ascending bar series |
//! | [`Lookback`] | Fetch range and sampling interval |
//! | [`UtcDateTime`] | UTC timestamp |
//!
//! Raw provider data enters as [`RawSeries`], where every field is optional.
//! Only the validator turns it into a [`PriceSeries`]:
//!
//! ```rust,ignore
//! use tickerlens_core::{normalize, validate, Market};
//!
//! let symbol = normalize("INFY", Market::Domestic); // INFY.NS
//! let series = validate(Some(raw))?;
//! ```

mod market;
mod series;
mod symbol;
mod timestamp;

pub use market::{CurrencyContext, Market, DEFAULT_DOMESTIC_SUFFIX, DOMESTIC_SUFFIXES};
pub use series::{Lookback, PriceBar, PriceSeries, RawBar, RawSeries, SeriesMetadata};
pub use symbol::{normalize, CanonicalSymbol};
pub use timestamp::UtcDateTime;
