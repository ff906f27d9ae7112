use thiserror::Error;

/// Validation and contract errors exposed by `tickerlens-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid market '{value}', expected one of domestic, foreign")]
    InvalidMarket { value: String },

    #[error("timestamp must be RFC3339 UTC (suffix Z): '{value}'")]
    TimestampNotUtc { value: String },
    #[error("unix timestamp {value} is out of range")]
    TimestampOutOfRange { value: i64 },

    #[error("question cannot be empty")]
    EmptyQuestion,
    #[error("news query cannot be empty")]
    EmptyQuery,
    #[error("news result cap must be greater than zero")]
    ZeroResultCap,

    #[error("request_id must be at least 8 characters")]
    InvalidRequestId,
    #[error("schema_version must match vMAJOR.MINOR.PATCH: '{value}'")]
    InvalidSchemaVersion { value: String },

    #[error("error code cannot be empty")]
    EmptyErrorCode,
    #[error("error message cannot be empty")]
    EmptyErrorMessage,
}

/// Structural problems that make a raw series unusable.
///
/// A series is accepted or rejected as a whole; single bars are never
/// repaired or dropped.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SeriesError {
    #[error("no price data returned")]
    EmptySeries,
    #[error("bar {index} is missing required field '{field}'")]
    MissingFields { index: usize, field: &'static str },
}

impl SeriesError {
    pub const fn code(&self) -> &'static str {
        match self {
            Self::EmptySeries => "series.empty",
            Self::MissingFields { .. } => "series.missing_fields",
        }
    }
}

/// A metric that needs more observations than the series holds.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("insufficient history: need {required} bars, have {available}")]
pub struct InsufficientHistory {
    pub required: usize,
    pub available: usize,
}

/// Startup configuration errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("credential '{name}' is not set")]
    MissingCredential { name: &'static str },
    #[error("configuration value {name}='{value}' is invalid: {reason}")]
    InvalidValue {
        name: &'static str,
        value: String,
        reason: &'static str,
    },
}
