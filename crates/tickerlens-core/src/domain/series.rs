use serde::{Deserialize, Serialize};

use super::{CanonicalSymbol, UtcDateTime};

/// Provider range/interval pair for historical fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Lookback {
    pub range: &'static str,
    pub interval: &'static str,
}

impl Lookback {
    /// One trailing year sampled weekly; indicator windows count these samples.
    pub const ONE_YEAR_WEEKLY: Self = Self {
        range: "1y",
        interval: "1wk",
    };
}

impl Default for Lookback {
    fn default() -> Self {
        Self::ONE_YEAR_WEEKLY
    }
}

/// Bar as delivered by a provider, any field possibly absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawBar {
    pub ts: Option<UtcDateTime>,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<u64>,
}

/// Descriptive instrument fields returned next to the bars.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesMetadata {
    pub long_name: Option<String>,
    pub short_name: Option<String>,
    pub currency: Option<String>,
}

impl SeriesMetadata {
    /// Company name for display and news lookup: long name, then short name.
    pub fn display_name(&self) -> Option<&str> {
        [self.long_name.as_deref(), self.short_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|name| !name.is_empty())
    }
}

/// Unvalidated fetch result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSeries {
    pub symbol: CanonicalSymbol,
    pub bars: Vec<RawBar>,
    pub metadata: SeriesMetadata,
}

impl RawSeries {
    pub fn new(symbol: CanonicalSymbol, bars: Vec<RawBar>, metadata: SeriesMetadata) -> Self {
        Self {
            symbol,
            bars,
            metadata,
        }
    }
}

/// One complete OHLCV observation.
///
/// `low <= open, close <= high` is expected but not enforced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub ts: UtcDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Validated series, ascending by timestamp and never empty.
///
/// Only the validator constructs one; there are no mutating accessors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    symbol: CanonicalSymbol,
    metadata: SeriesMetadata,
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    pub(crate) fn from_sorted(
        symbol: CanonicalSymbol,
        metadata: SeriesMetadata,
        bars: Vec<PriceBar>,
    ) -> Self {
        debug_assert!(!bars.is_empty());
        Self {
            symbol,
            metadata,
            bars,
        }
    }

    pub fn symbol(&self) -> &CanonicalSymbol {
        &self.symbol
    }

    pub fn metadata(&self) -> &SeriesMetadata {
        &self.metadata
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|bar| bar.close).collect()
    }

    pub fn last(&self) -> Option<&PriceBar> {
        self.bars.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_prefers_long_name() {
        let metadata = SeriesMetadata {
            long_name: Some(String::from("Apple Inc.")),
            short_name: Some(String::from("Apple")),
            currency: None,
        };
        assert_eq!(metadata.display_name(), Some("Apple Inc."));
    }

    #[test]
    fn display_name_skips_blank_long_name() {
        let metadata = SeriesMetadata {
            long_name: Some(String::from("  ")),
            short_name: Some(String::from("Apple")),
            currency: None,
        };
        assert_eq!(metadata.display_name(), Some("Apple"));
        assert_eq!(SeriesMetadata::default().display_name(), None);
    }
}
