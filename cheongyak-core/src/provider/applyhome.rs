//! 청약홈 APT subscription detail provider using the public data portal API.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use super::{DetailProvider, ProviderError};
use crate::config::UpstreamConfig;
use crate::types::{DetailRecord, Identifier};

/// Operation path of the APT subscription announcement detail listing.
pub const DETAIL_OPERATION: &str = "getAPTLttotPblancDetail";

/// Query key filtering the listing on the house management number.
pub const HOUSE_MANAGE_NO_FILTER: &str = "cond[HOUSE_MANAGE_NO::EQ]";

/// Upstream error bodies are truncated to this many characters in errors.
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Page envelope returned by the public data portal listing endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OdcloudPage {
    /// Records on this page
    #[serde(default)]
    pub data: Vec<serde_json::Value>,
    /// Number of records matching the filter
    #[serde(default)]
    pub match_count: Option<u64>,
    /// Number of records on this page
    #[serde(default)]
    pub current_count: Option<u64>,
}

/// Production provider backed by the 청약홈 detail API.
#[derive(Clone)]
pub struct ApplyhomeProvider {
    client: reqwest::Client,
    endpoint: Url,
    service_key: String,
}

impl std::fmt::Debug for ApplyhomeProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApplyhomeProvider")
            .field("endpoint", &self.endpoint.as_str())
            .field("service_key", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl ApplyhomeProvider {
    /// Creates a provider from upstream configuration.
    ///
    /// The configured request timeout becomes the client's total timeout.
    ///
    /// # Errors
    ///
    /// - `ProviderError::MissingServiceKey` - If no service key is configured
    /// - `ProviderError::InvalidEndpoint` - If the base URL does not parse
    /// - `ProviderError::Network` - If the HTTP client cannot be built
    pub fn new(config: &UpstreamConfig) -> Result<Self, ProviderError> {
        let service_key = config
            .service_key
            .clone()
            .ok_or(ProviderError::MissingServiceKey)?;

        let endpoint = detail_endpoint(&config.base_url)?;

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent)
            .build()
            .map_err(|e| ProviderError::Network {
                reason: format!("Failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            endpoint,
            service_key,
        })
    }

    /// Full request URL for one identifier.
    pub fn request_url(&self, identifier: &Identifier) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("page", "1")
            .append_pair("perPage", "1")
            .append_pair(HOUSE_MANAGE_NO_FILTER, identifier.as_str())
            .append_pair("serviceKey", &self.service_key);
        url
    }
}

fn detail_endpoint(base_url: &str) -> Result<Url, ProviderError> {
    let raw = format!("{}/{DETAIL_OPERATION}", base_url.trim_end_matches('/'));
    Url::parse(&raw).map_err(|e| ProviderError::InvalidEndpoint {
        url: base_url.to_string(),
        reason: e.to_string(),
    })
}

/// Converts a client error, dropping the request URL since it carries the
/// service key.
fn transport_error(e: reqwest::Error) -> ProviderError {
    let e = e.without_url();
    if e.is_timeout() {
        ProviderError::Timeout {
            reason: e.to_string(),
        }
    } else {
        ProviderError::Network {
            reason: e.to_string(),
        }
    }
}

/// Picks the record out of an upstream page; an empty page means not found.
pub fn first_record(page: OdcloudPage) -> Option<DetailRecord> {
    page.data.into_iter().next().map(DetailRecord::new)
}

#[async_trait]
impl DetailProvider for ApplyhomeProvider {
    async fn get_detail_by_id(
        &self,
        identifier: &Identifier,
    ) -> Result<Option<DetailRecord>, ProviderError> {
        debug!(identifier = %identifier, "Requesting detail from 청약홈");

        let response = self
            .client
            .get(self.request_url(identifier))
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(transport_error)?;

        if !status.is_success() {
            let body: String = String::from_utf8_lossy(&body)
                .chars()
                .take(MAX_ERROR_BODY_CHARS)
                .collect();
            return Err(ProviderError::UpstreamStatus {
                status: status.as_u16(),
                body,
            });
        }

        let page: OdcloudPage =
            serde_json::from_slice(&body).map_err(|e| ProviderError::Parse {
                reason: format!("JSON parsing failed: {e}"),
            })?;

        debug!(
            identifier = %identifier,
            match_count = ?page.match_count,
            current_count = ?page.current_count,
            "Received detail page"
        );

        Ok(first_record(page))
    }
}
