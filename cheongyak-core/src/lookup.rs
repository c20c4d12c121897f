//! Detail lookup: one provider call folded into a response envelope.

use std::sync::Arc;

use http::StatusCode;
use tracing::{debug, error};

use crate::Result;
use crate::config::CheongyakConfig;
use crate::mode::RuntimeMode;
use crate::provider::{ApplyhomeProvider, DemoProvider, DetailProvider};
use crate::types::{Identifier, ResponseEnvelope};

/// Message returned when the provider has no record for the identifier.
pub const NOT_FOUND_MESSAGE: &str = "해당 분양권 정보를 찾을 수 없습니다.";

/// Message returned for any provider failure. Never carries error detail.
pub const FAILURE_MESSAGE: &str = "분양권 상세 정보를 불러오는데 실패했습니다.";

/// Maps provider outcomes to `(envelope, status)` pairs.
///
/// Stateless apart from the shared provider; every call performs exactly one
/// provider lookup, with no retries.
#[derive(Debug, Clone)]
pub struct DetailLookupHandler {
    provider: Arc<dyn DetailProvider>,
}

impl DetailLookupHandler {
    pub fn new(provider: Arc<dyn DetailProvider>) -> Self {
        Self { provider }
    }

    /// Builds the handler with the provider matching the runtime mode.
    ///
    /// # Errors
    ///
    /// - `CheongyakError::Provider` - If the production provider cannot be
    ///   configured (missing service key, bad base URL)
    pub fn from_config(config: &CheongyakConfig) -> Result<Self> {
        let provider: Arc<dyn DetailProvider> = match config.runtime_mode {
            RuntimeMode::Production => Arc::new(ApplyhomeProvider::new(&config.upstream)?),
            RuntimeMode::Development => Arc::new(DemoProvider::new()),
        };
        Ok(Self::new(provider))
    }

    /// Looks up `identifier` and reports the outcome as an envelope.
    ///
    /// Found records answer 200, missing ones 404. Provider errors are logged
    /// and answer 500 with [`FAILURE_MESSAGE`].
    pub async fn handle(&self, identifier: &Identifier) -> (ResponseEnvelope, StatusCode) {
        match self.provider.get_detail_by_id(identifier).await {
            Ok(Some(record)) => (ResponseEnvelope::found(record), StatusCode::OK),
            Ok(None) => {
                debug!(identifier = %identifier, "No bunyanggwon detail for identifier");
                Self::not_found()
            }
            Err(e) => {
                error!(identifier = %identifier, error = %e, "Failed to fetch bunyanggwon detail");
                (
                    ResponseEnvelope::failure(FAILURE_MESSAGE),
                    StatusCode::INTERNAL_SERVER_ERROR,
                )
            }
        }
    }

    /// Envelope and status for a record that does not exist.
    pub fn not_found() -> (ResponseEnvelope, StatusCode) {
        (
            ResponseEnvelope::failure(NOT_FOUND_MESSAGE),
            StatusCode::NOT_FOUND,
        )
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use serde_json::json;

    use super::*;
    use crate::provider::{FailingProvider, ProviderError, StaticProvider};

    fn id(raw: &str) -> Identifier {
        Identifier::new(raw).unwrap()
    }

    fn block_on<F: std::future::Future>(future: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
            .block_on(future)
    }

    #[tokio::test]
    async fn test_existing_identifier_returns_record() {
        let record = json!({"HOUSE_MANAGE_NO": "2024000123", "HOUSE_NM": "래미안"});
        let provider = Arc::new(StaticProvider::new().with_record("2024000123", record.clone()));
        let handler = DetailLookupHandler::new(provider.clone());

        let (envelope, status) = handler.handle(&id("2024000123")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({"success": true, "data": record})
        );
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_missing_identifier_returns_not_found() {
        let handler = DetailLookupHandler::new(Arc::new(StaticProvider::new()));

        let (envelope, status) = handler.handle(&id("nonexistent")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({"success": false, "error": "해당 분양권 정보를 찾을 수 없습니다."})
        );
    }

    #[tokio::test]
    async fn test_timeout_returns_generic_failure_without_retry() {
        let provider = Arc::new(FailingProvider::timeout());
        let handler = DetailLookupHandler::new(provider.clone());

        let (envelope, status) = handler.handle(&id("2024000123")).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({"success": false, "error": "분양권 상세 정보를 불러오는데 실패했습니다."})
        );
        assert_eq!(provider.call_count(), 1);
    }

    /// Shared in-memory sink for formatted log output.
    #[derive(Clone, Default)]
    struct LogBuffer(Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl LogBuffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    #[test]
    fn test_provider_failure_is_logged_with_detail() {
        let logs = LogBuffer::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let handler = DetailLookupHandler::new(Arc::new(FailingProvider::new(
            ProviderError::Network {
                reason: "connection reset by peer".to_string(),
            },
        )));

        let (envelope, status) = tracing::subscriber::with_default(subscriber, || {
            block_on(handler.handle(&id("2024000123")))
        });

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(envelope.error(), Some(FAILURE_MESSAGE));
        assert!(!serde_json::to_string(&envelope).unwrap().contains("connection reset"));

        let output = logs.contents();
        let line = output
            .lines()
            .find(|line| line.contains("ERROR"))
            .unwrap_or_else(|| panic!("no error line in: {output}"));
        assert!(line.contains("2024000123"), "{line}");
        assert!(line.contains("connection reset by peer"), "{line}");
    }

    #[test]
    fn test_not_found_is_not_logged_as_error() {
        let logs = LogBuffer::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let handler = DetailLookupHandler::new(Arc::new(StaticProvider::new()));

        let (_, status) = tracing::subscriber::with_default(subscriber, || {
            block_on(handler.handle(&id("nonexistent")))
        });

        assert_eq!(status, StatusCode::NOT_FOUND);
        let output = logs.contents();
        assert!(!output.contains("ERROR"), "{output}");
        assert!(output.contains("nonexistent"), "{output}");
    }

    #[test]
    fn test_from_config_requires_key_in_production() {
        let mut config = CheongyakConfig::for_testing();
        config.runtime_mode = RuntimeMode::Production;

        let error = DetailLookupHandler::from_config(&config).unwrap_err();
        assert!(error.is_user_error());

        config.upstream.service_key = Some("key".to_string());
        assert!(DetailLookupHandler::from_config(&config).is_ok());
    }

    #[tokio::test]
    async fn test_from_config_uses_demo_provider_in_development() {
        let handler = DetailLookupHandler::from_config(&CheongyakConfig::for_testing()).unwrap();

        let (envelope, status) = handler.handle(&id("2024000123")).await;

        assert_eq!(status, StatusCode::OK);
        assert!(envelope.is_success());
    }

    fn provider_error() -> impl Strategy<Value = ProviderError> {
        let text = ".{0,64}";
        prop_oneof![
            text.prop_map(|reason| ProviderError::Network { reason }),
            text.prop_map(|reason| ProviderError::Timeout { reason }),
            text.prop_map(|reason| ProviderError::Parse { reason }),
            (400u16..600, text).prop_map(|(status, body)| ProviderError::UpstreamStatus { status, body }),
            Just(ProviderError::MissingServiceKey),
        ]
    }

    proptest! {
        #[test]
        fn prop_present_identifiers_answer_ok(raw in ".{1,32}", field in "[A-Z_]{1,12}", value in any::<i64>()) {
            let mut fields = serde_json::Map::new();
            fields.insert(field, json!(value));
            let record = serde_json::Value::Object(fields);
            let handler = DetailLookupHandler::new(Arc::new(
                StaticProvider::new().with_record(raw.clone(), record.clone()),
            ));

            let (envelope, status) = block_on(handler.handle(&id(&raw)));

            prop_assert_eq!(status, StatusCode::OK);
            prop_assert!(envelope.is_success());
            prop_assert_eq!(envelope.data().map(|r| r.as_value()), Some(&record));
            prop_assert!(envelope.error().is_none());
        }

        #[test]
        fn prop_absent_identifiers_answer_not_found(raw in ".{1,32}") {
            let handler = DetailLookupHandler::new(Arc::new(StaticProvider::new()));

            let (envelope, status) = block_on(handler.handle(&id(&raw)));

            prop_assert_eq!(status, StatusCode::NOT_FOUND);
            prop_assert!(!envelope.is_success());
            prop_assert!(envelope.data().is_none());
            prop_assert!(!envelope.error().unwrap_or_default().is_empty());
        }

        #[test]
        fn prop_provider_errors_never_leak(error in provider_error(), raw in ".{1,32}") {
            let handler = DetailLookupHandler::new(Arc::new(FailingProvider::new(error)));

            let (envelope, status) = block_on(handler.handle(&id(&raw)));

            prop_assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            prop_assert!(envelope.data().is_none());
            prop_assert_eq!(envelope.error(), Some(FAILURE_MESSAGE));

            let json = serde_json::to_value(&envelope).unwrap();
            prop_assert_eq!(json.as_object().map(|o| o.len()), Some(2));
        }
    }
}
