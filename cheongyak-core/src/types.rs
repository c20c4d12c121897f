//! Request and response data model for the detail lookup.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Opaque token naming a subscription record, taken from the request path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Identifier(String);

/// Raised when the path segment cannot name a record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Identifier must not be empty")]
pub struct InvalidIdentifier;

impl Identifier {
    /// Creates an identifier from a raw path segment.
    ///
    /// # Errors
    ///
    /// - `InvalidIdentifier` - If `raw` is empty
    pub fn new(raw: impl Into<String>) -> Result<Self, InvalidIdentifier> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(InvalidIdentifier);
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Identifier {
    type Err = InvalidIdentifier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Detail record as returned by the upstream provider.
///
/// The shape belongs to the provider, so the value is carried through
/// untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DetailRecord(serde_json::Value);

impl DetailRecord {
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }

    pub fn into_value(self) -> serde_json::Value {
        self.0
    }
}

impl From<serde_json::Value> for DetailRecord {
    fn from(value: serde_json::Value) -> Self {
        Self(value)
    }
}

/// Uniform JSON wrapper returned by the detail endpoint.
///
/// Exactly one of `data` and `error` is present: `data` when `success` is
/// true, `error` otherwise. The constructors are the only way to build one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseEnvelope {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<DetailRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Envelope payloads that break the `data`/`error` exclusivity rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvelopeError {
    #[error("Successful envelope must carry data and no error")]
    MalformedSuccess,

    #[error("Failed envelope must carry an error and no data")]
    MalformedFailure,
}

impl ResponseEnvelope {
    /// Successful lookup carrying the provider's record.
    pub fn found(record: DetailRecord) -> Self {
        Self {
            success: true,
            data: Some(record),
            error: None,
        }
    }

    /// Failed lookup carrying a caller-facing message.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn data(&self) -> Option<&DetailRecord> {
        self.data.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

#[derive(Deserialize)]
struct RawEnvelope {
    success: bool,
    #[serde(default, deserialize_with = "present_record")]
    data: Option<DetailRecord>,
    #[serde(default)]
    error: Option<String>,
}

/// A `data` key that is present is a record, even when its value is `null`.
/// Only a missing key leaves the field `None`.
fn present_record<'de, D>(deserializer: D) -> Result<Option<DetailRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    DetailRecord::deserialize(deserializer).map(Some)
}

impl TryFrom<RawEnvelope> for ResponseEnvelope {
    type Error = EnvelopeError;

    fn try_from(raw: RawEnvelope) -> Result<Self, Self::Error> {
        match (raw.success, raw.data, raw.error) {
            (true, Some(record), None) => Ok(Self::found(record)),
            (true, _, _) => Err(EnvelopeError::MalformedSuccess),
            (false, None, Some(message)) => Ok(Self::failure(message)),
            (false, _, _) => Err(EnvelopeError::MalformedFailure),
        }
    }
}

impl<'de> Deserialize<'de> for ResponseEnvelope {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawEnvelope::deserialize(deserializer)?;
        Self::try_from(raw).map_err(serde::de::Error::custom)
    }
}
