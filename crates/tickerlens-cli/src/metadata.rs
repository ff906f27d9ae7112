use std::fmt::{Display, Formatter};

use serde::Serialize;
use tickerlens_core::{EnvelopeMeta, ProviderId, ValidationError};
use uuid::Uuid;

/// Request identifier (UUID v4) for end-to-end request tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Display for RequestId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

/// Command metadata collected before the envelope is assembled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    pub request_id: RequestId,
    pub providers: Vec<ProviderId>,
    pub latency_ms: u64,
    pub warnings: Vec<String>,
}

impl Metadata {
    pub fn new(providers: Vec<ProviderId>, latency_ms: u64) -> Self {
        Self {
            request_id: RequestId::new_v4(),
            providers,
            latency_ms,
            warnings: Vec::new(),
        }
    }

    pub fn push_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    pub fn into_envelope_meta(self) -> Result<EnvelopeMeta, ValidationError> {
        let mut meta =
            EnvelopeMeta::new(self.request_id.to_string(), self.providers, self.latency_ms)?;
        for warning in self.warnings {
            meta.push_warning(warning);
        }
        Ok(meta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_id_is_uuid_v4() {
        let request_id = RequestId::new_v4();
        assert_eq!(request_id.0.get_version_num(), 4);
    }

    #[test]
    fn metadata_becomes_valid_envelope_meta() {
        let mut metadata = Metadata::new(vec![ProviderId::Fixture], 12);
        metadata.push_warning("offline data");

        let meta = metadata.into_envelope_meta().expect("valid");
        assert_eq!(meta.request_id.len(), 36);
        assert_eq!(meta.schema_version, tickerlens_core::SCHEMA_VERSION);
        assert_eq!(meta.warnings, vec![String::from("offline data")]);
    }
}
