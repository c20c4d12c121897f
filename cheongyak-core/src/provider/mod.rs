//! Detail providers backing the bunyanggwon lookup.

use async_trait::async_trait;
use thiserror::Error;

use crate::types::{DetailRecord, Identifier};

pub mod applyhome;
pub mod demo;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

pub use applyhome::ApplyhomeProvider;
pub use demo::DemoProvider;
#[cfg(any(test, feature = "test-utils"))]
pub use mock::{FailingProvider, StaticProvider};

/// Errors raised while fetching a detail record from a provider.
///
/// These never reach HTTP callers; the lookup handler logs them and answers
/// with a generic failure envelope.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// Transport-level failure talking to the upstream service.
    #[error("Network error: {reason}")]
    Network { reason: String },

    /// Upstream did not answer within the client timeout.
    #[error("Upstream request timed out: {reason}")]
    Timeout { reason: String },

    /// Upstream answered with a non-success status code.
    #[error("Upstream returned HTTP {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    /// Upstream body could not be decoded.
    #[error("Parse error: {reason}")]
    Parse { reason: String },

    /// Configured endpoint is not a usable URL.
    #[error("Invalid upstream endpoint '{url}': {reason}")]
    InvalidEndpoint { url: String, reason: String },

    /// Production provider was configured without a service key.
    #[error("Upstream service key is not configured")]
    MissingServiceKey,
}

/// Capability to look up a single detail record by identifier.
///
/// Implementations return `Ok(None)` when the identifier names no record and
/// reserve `Err` for failures of the lookup itself.
#[async_trait]
pub trait DetailProvider: Send + Sync + std::fmt::Debug {
    /// Fetches the record named by `identifier`.
    ///
    /// # Errors
    /// - `ProviderError::Network` - Network connectivity issues
    /// - `ProviderError::Timeout` - Upstream too slow
    /// - `ProviderError::UpstreamStatus` - Upstream rejected the request
    /// - `ProviderError::Parse` - Upstream answered with an unreadable body
    async fn get_detail_by_id(
        &self,
        identifier: &Identifier,
    ) -> Result<Option<DetailRecord>, ProviderError>;
}
