use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Identifiers of the external collaborators, used in logs and envelopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    Yahoo,
    Duckduckgo,
    Groq,
    /// Deterministic offline data.
    Fixture,
}

impl ProviderId {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Yahoo => "yahoo",
            Self::Duckduckgo => "duckduckgo",
            Self::Groq => "groq",
            Self::Fixture => "fixture",
        }
    }
}

impl Display for ProviderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
