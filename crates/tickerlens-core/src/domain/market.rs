use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Exchange suffixes recognized for the domestic (Indian) market.
pub const DOMESTIC_SUFFIXES: [&str; 2] = [".NS", ".BO"];

/// Suffix appended to bare domestic tickers (National Stock Exchange).
pub const DEFAULT_DOMESTIC_SUFFIX: &str = ".NS";

const DOMESTIC_PRESETS: [&str; 10] = [
    "RELIANCE.NS",
    "TCS.NS",
    "HDFCBANK.NS",
    "INFY.NS",
    "ICICIBANK.NS",
    "BHARTIARTL.NS",
    "WIPRO.NS",
    "ZOMATO.NS",
    "PAYTM.NS",
    "JIOFIN.NS",
];

const FOREIGN_PRESETS: [&str; 10] = [
    "AAPL", "GOOGL", "MSFT", "AMZN", "TSLA", "META", "NVDA", "NFLX", "JPM", "V",
];

/// Market selector deciding suffix rules and display currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Market {
    /// Indian exchanges (NSE / BSE).
    Domestic,
    /// US exchanges.
    Foreign,
}

impl Market {
    pub const ALL: [Self; 2] = [Self::Domestic, Self::Foreign];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Domestic => "domestic",
            Self::Foreign => "foreign",
        }
    }

    /// Human-facing label used in prompts and headers.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Domestic => "Indian Stocks",
            Self::Foreign => "US Stocks",
        }
    }

    pub const fn currency(self) -> CurrencyContext {
        match self {
            Self::Domestic => CurrencyContext::Rupee,
            Self::Foreign => CurrencyContext::Dollar,
        }
    }

    /// Curated symbols offered for quick selection, first entry is the default.
    pub const fn presets(self) -> &'static [&'static str] {
        match self {
            Self::Domestic => &DOMESTIC_PRESETS,
            Self::Foreign => &FOREIGN_PRESETS,
        }
    }

    pub const fn default_symbol(self) -> &'static str {
        self.presets()[0]
    }
}

impl Display for Market {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Market {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "domestic" | "in" | "india" => Ok(Self::Domestic),
            "foreign" | "us" => Ok(Self::Foreign),
            other => Err(ValidationError::InvalidMarket {
                value: other.to_owned(),
            }),
        }
    }
}

/// Currency symbol used purely for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurrencyContext {
    Rupee,
    Dollar,
}

impl CurrencyContext {
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Rupee => "₹",
            Self::Dollar => "$",
        }
    }

    /// ISO 4217 code.
    pub const fn code(self) -> &'static str {
        match self {
            Self::Rupee => "INR",
            Self::Dollar => "USD",
        }
    }
}

impl Display for CurrencyContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}
