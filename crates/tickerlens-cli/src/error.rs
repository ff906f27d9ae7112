use thiserror::Error;
use tickerlens_core::{AnalysisError, ConfigError, ValidationError};

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::Analysis(AnalysisError::Validation(_)) => 2,
            Self::Analysis(AnalysisError::Config(_)) => 6,
            Self::Analysis(_) => 3,
            Self::Serialization(_) => 4,
            Self::Config(_) => 6,
            Self::Io(_) => 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use tickerlens_core::{SeriesError, SourceError};

    use super::*;

    #[test]
    fn pipeline_failures_exit_with_three() {
        let not_found = CliError::from(AnalysisError::SymbolNotFound {
            symbol: String::from("NOPE"),
            source: SourceError::not_found("no data"),
        });
        assert_eq!(not_found.exit_code(), 3);
        assert_eq!(
            CliError::from(AnalysisError::from(SeriesError::EmptySeries)).exit_code(),
            3
        );
    }

    #[test]
    fn missing_credential_exits_with_six() {
        let error = CliError::from(ConfigError::MissingCredential {
            name: "GROQ_API_KEY",
        });
        assert_eq!(error.exit_code(), 6);
    }

    #[test]
    fn invalid_input_exits_with_two() {
        let error = CliError::from(AnalysisError::from(ValidationError::EmptyQuestion));
        assert_eq!(error.exit_code(), 2);
    }
}
