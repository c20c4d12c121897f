//! Cheongyak Core - Bunyanggwon detail lookup
//!
//! This crate provides the pieces behind the detail proxy: the request and
//! envelope data model, the provider abstraction over the 청약홈 subscription
//! API, the lookup handler that maps provider outcomes to HTTP statuses, and
//! configuration management.

pub mod config;
pub mod lookup;
pub mod mode;
pub mod provider;
pub mod tracing_setup;
pub mod types;

// Re-export main types for convenient access
pub use config::CheongyakConfig;
pub use lookup::{DetailLookupHandler, FAILURE_MESSAGE, NOT_FOUND_MESSAGE};
pub use mode::RuntimeMode;
pub use provider::{ApplyhomeProvider, DemoProvider, DetailProvider, ProviderError};
pub use types::{DetailRecord, EnvelopeError, Identifier, InvalidIdentifier, ResponseEnvelope};

/// Core errors that can bubble up from any Cheongyak subsystem.
///
/// Request-level failures never reach this type; the lookup handler folds
/// them into envelopes. These are startup and tooling failures.
#[derive(Debug, thiserror::Error)]
pub enum CheongyakError {
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Configuration error: {reason}")]
    Configuration { reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CheongyakError {
    /// Checks if this error is caused by operator-supplied settings.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            CheongyakError::Configuration { .. }
                | CheongyakError::Provider(ProviderError::MissingServiceKey)
        )
    }
}

pub type Result<T> = std::result::Result<T, CheongyakError>;
