use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ulid::Ulid;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, ToSchema)]
#[serde(transparent)]
#[schema(as = String)]
pub struct MockId(String);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    InvalidPrefix { expected: &'static str, got: String },
    InvalidUlid { value: String },
    InvalidLength { value: String, len: usize },
}

impl fmt::Display for IdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPrefix { expected, got } => {
                write!(f, "invalid prefix: expected {expected}, got {got}")
            }
            Self::InvalidUlid { value } => write!(f, "invalid ulid: {value}"),
            Self::InvalidLength { value, len } => {
                write!(f, "invalid id length {len}: {value}")
            }
        }
    }
}

impl std::error::Error for IdError {}

impl MockId {
    pub const PREFIX: &'static str = "mock_";
    const ULID_LEN: usize = 26;

    pub fn new(value: String) -> Result<Self, IdError> {
        let Some(rest) = value.strip_prefix(Self::PREFIX) else {
            let got = value.split('_').next().unwrap_or("").to_string();
            return Err(IdError::InvalidPrefix {
                expected: Self::PREFIX,
                got,
            });
        };
        if rest.len() != Self::ULID_LEN {
            let len = value.len();
            return Err(IdError::InvalidLength { value, len });
        }
        Ulid::from_str(rest).map_err(|_| IdError::InvalidUlid {
            value: value.clone(),
        })?;
        Ok(Self(value))
    }

    /// Mints a fresh identifier.
    pub fn generate() -> Self {
        Self(format!("{}{}", Self::PREFIX, Ulid::new()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MockId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

impl<'de> Deserialize<'de> for MockId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::new(value).map_err(serde::de::Error::custom)
    }
}
