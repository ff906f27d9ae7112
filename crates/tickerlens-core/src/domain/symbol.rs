use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use super::market::{Market, DEFAULT_DOMESTIC_SUFFIX, DOMESTIC_SUFFIXES};

/// Ticker in the form the data provider expects for its market.
///
/// Built only through [`CanonicalSymbol::normalize`], so every value obeys
/// the market's suffix rules.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CanonicalSymbol {
    value: String,
    market: Market,
}

impl CanonicalSymbol {
    /// Apply the market's suffix rules to a user-supplied ticker.
    ///
    /// Total and idempotent: any string is accepted, including an empty one,
    /// and normalizing a canonical value yields the same value.
    pub fn normalize(raw: &str, market: Market) -> Self {
        let trimmed = raw.trim();
        let value = match market {
            Market::Domestic => {
                if has_domestic_suffix(trimmed) {
                    trimmed.to_owned()
                } else {
                    format!("{trimmed}{DEFAULT_DOMESTIC_SUFFIX}")
                }
            }
            Market::Foreign => strip_domestic_suffixes(trimmed).to_owned(),
        };

        Self { value, market }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub const fn market(&self) -> Market {
        self.market
    }
}

impl Display for CanonicalSymbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Convenience wrapper over [`CanonicalSymbol::normalize`].
pub fn normalize(raw: &str, market: Market) -> CanonicalSymbol {
    CanonicalSymbol::normalize(raw, market)
}

fn has_domestic_suffix(value: &str) -> bool {
    DOMESTIC_SUFFIXES
        .iter()
        .any(|suffix| value.ends_with(suffix))
}

// Stacked suffixes ("X.NS.BO") are removed until none is left.
fn strip_domestic_suffixes(mut value: &str) -> &str {
    while let Some(stripped) = DOMESTIC_SUFFIXES
        .iter()
        .find_map(|suffix| value.strip_suffix(suffix))
    {
        value = stripped;
    }
    value
}
