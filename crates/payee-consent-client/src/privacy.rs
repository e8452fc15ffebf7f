//! Typed client for the privacy/consent assessment engine.
//!
//! ## Endpoints
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | POST   | `/v1.0/privacy/assessment` | Assess access items |
//! | POST   | `/v1.0/privacy/consents/metadata` | Display metadata for consentable items |
//! | POST   | `/v1.0/privacy/consents` | Store consent decisions |
//!
//! Every call carries a caller-supplied bearer: the end user's credential
//! for assessment and metadata, a client-credentials token for storage.

use payee_consent_core::{AccessItem, Assessment, ConsentDecision, ConsentMetadata};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ClientError;
use crate::transport::send_json;

/// API path prefix for the privacy engine.
const API_PREFIX: &str = "v1.0/privacy";

// -- Response types -----------------------------------------------------------

/// Envelope returned by the metadata endpoint.
#[derive(Debug, Clone, Deserialize)]
struct MetadataResponse {
    #[serde(default)]
    metadata: ConsentMetadata,
}

/// Outcome of a consent storage call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConsentsResult {
    /// Engine status string, echoed back to the banking application.
    pub status: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// -- Client -------------------------------------------------------------------

/// Client for the privacy engine.
#[derive(Debug, Clone)]
pub struct PrivacyClient {
    http: reqwest::Client,
    base_url: url::Url,
}

impl PrivacyClient {
    pub(crate) fn new(http: reqwest::Client, base_url: url::Url) -> Self {
        Self { http, base_url }
    }

    /// Assess whether the given access items are permitted.
    ///
    /// Calls `POST {base_url}/v1.0/privacy/assessment`.
    pub async fn assess(&self, bearer: &str, items: &[AccessItem]) -> Result<Assessment, ClientError> {
        let endpoint = "POST /privacy/assessment";
        let url = format!("{}{}/assessment", self.base_url, API_PREFIX);

        send_json(endpoint, self.http.post(&url).bearer_auth(bearer).json(items)).await
    }

    /// Fetch display metadata for the given consentable items.
    ///
    /// Calls `POST {base_url}/v1.0/privacy/consents/metadata`.
    pub async fn consent_metadata(
        &self,
        bearer: &str,
        items: &[AccessItem],
    ) -> Result<ConsentMetadata, ClientError> {
        let endpoint = "POST /privacy/consents/metadata";
        let url = format!("{}{}/consents/metadata", self.base_url, API_PREFIX);

        let resp: MetadataResponse =
            send_json(endpoint, self.http.post(&url).bearer_auth(bearer).json(items)).await?;
        Ok(resp.metadata)
    }

    /// Store the user's consent decisions.
    ///
    /// Calls `POST {base_url}/v1.0/privacy/consents`.
    pub async fn store_consents(
        &self,
        bearer: &str,
        consents: &[ConsentDecision],
    ) -> Result<StoreConsentsResult, ClientError> {
        let endpoint = "POST /privacy/consents";
        let url = format!("{}{}/consents", self.base_url, API_PREFIX);

        send_json(endpoint, self.http.post(&url).bearer_auth(bearer).json(consents)).await
    }
}
