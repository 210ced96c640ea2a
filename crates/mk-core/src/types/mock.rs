use crate::types::ids::MockId;
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use utoipa::ToSchema;

/// A canned HTTP response stored under its id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MockRecord {
    pub id: MockId,
    pub created_at: DateTime<Utc>,
    pub status: u16,
    pub content_type: String,
    pub charset: String,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    #[serde(with = "base64_body", default)]
    #[schema(value_type = String, format = Byte)]
    pub body: Vec<u8>,
}

impl MockRecord {
    pub fn summary(&self) -> MockRecordSummary {
        MockRecordSummary {
            id: self.id.clone(),
            created_at: self.created_at,
            status: self.status,
            content_type: self.content_type.clone(),
        }
    }
}

/// Listing projection of a [`MockRecord`]. Deserializing a stored record into
/// this type skips the body without decoding it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MockRecordSummary {
    pub id: MockId,
    pub created_at: DateTime<Utc>,
    pub status: u16,
    pub content_type: String,
}

pub const PARAM_STATUS: &str = "status";
pub const PARAM_CONTENT_TYPE: &str = "contentType";
pub const PARAM_CHARSET: &str = "charset";

/// Status code as received from the caller, before it is known to be a valid `u16`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawStatus {
    Code(u16),
    Invalid(String),
}

impl RawStatus {
    pub fn parse(value: &str) -> Self {
        match value.trim().parse::<u16>() {
            Ok(code) => Self::Code(code),
            Err(_) => Self::Invalid(value.to_string()),
        }
    }
}

/// Unvalidated fields of a mock about to be created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockCandidate {
    pub status: RawStatus,
    pub content_type: String,
    pub charset: String,
    pub headers: BTreeMap<String, String>,
    pub body: Vec<u8>,
}

impl MockCandidate {
    /// Splits request parameters into the reserved fields and response headers.
    /// Only the first value of a multi-valued parameter is kept.
    pub fn from_params(params: &HashMap<String, Vec<String>>, body: Vec<u8>) -> Self {
        let mut candidate = MockCandidate {
            status: RawStatus::Invalid(String::new()),
            content_type: String::new(),
            charset: String::new(),
            headers: BTreeMap::new(),
            body,
        };
        for (name, values) in params {
            let first = values.first();
            match name.as_str() {
                PARAM_STATUS => {
                    candidate.status = RawStatus::parse(first.map_or("", String::as_str));
                }
                PARAM_CONTENT_TYPE => {
                    candidate.content_type = first.cloned().unwrap_or_default();
                }
                PARAM_CHARSET => candidate.charset = first.cloned().unwrap_or_default(),
                _ => {
                    if let Some(value) = first {
                        candidate.headers.insert(name.clone(), value.clone());
                    }
                }
            }
        }
        candidate
    }

    pub fn into_record(self, id: MockId, created_at: DateTime<Utc>, status: u16) -> MockRecord {
        MockRecord {
            id,
            created_at,
            status,
            content_type: self.content_type,
            charset: self.charset,
            headers: self.headers,
            body: self.body,
        }
    }
}

/// Creation timestamps are kept at second precision.
pub fn creation_time() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(0)
}

/// Newest first; ids break ties so the order is stable within one listing.
pub fn sort_newest_first(summaries: &mut [MockRecordSummary]) {
    summaries.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}

mod base64_body {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        STANDARD.decode(value).map_err(serde::de::Error::custom)
    }
}
