//! Provider test doubles.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::{DetailProvider, ProviderError};
use crate::types::{DetailRecord, Identifier};

/// Map-backed provider that counts its invocations.
#[derive(Debug, Default)]
pub struct StaticProvider {
    records: HashMap<String, DetailRecord>,
    calls: AtomicUsize,
}

impl StaticProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a record served for `id`.
    pub fn with_record(mut self, id: impl Into<String>, record: serde_json::Value) -> Self {
        self.records.insert(id.into(), DetailRecord::new(record));
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DetailProvider for StaticProvider {
    async fn get_detail_by_id(
        &self,
        identifier: &Identifier,
    ) -> Result<Option<DetailRecord>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.records.get(identifier.as_str()).cloned())
    }
}

/// Provider whose every lookup fails with the same error.
#[derive(Debug)]
pub struct FailingProvider {
    error: ProviderError,
    calls: AtomicUsize,
}

impl FailingProvider {
    pub fn new(error: ProviderError) -> Self {
        Self {
            error,
            calls: AtomicUsize::new(0),
        }
    }

    /// Fails like a client that hit its deadline.
    pub fn timeout() -> Self {
        Self::new(ProviderError::Timeout {
            reason: "operation timed out".to_string(),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DetailProvider for FailingProvider {
    async fn get_detail_by_id(
        &self,
        _identifier: &Identifier,
    ) -> Result<Option<DetailRecord>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(self.error.clone())
    }
}
