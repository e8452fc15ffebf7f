//! Shared request plumbing for the collaborator clients.

use serde::de::DeserializeOwned;

use crate::error::ClientError;

/// Send a prepared request and decode a 2xx JSON body.
///
/// Non-2xx responses become [`ClientError::Api`] carrying the raw body.
pub(crate) async fn send_json<T: DeserializeOwned>(
    endpoint: &str,
    request: reqwest::RequestBuilder,
) -> Result<T, ClientError> {
    let resp = request.send().await.map_err(|e| ClientError::Http {
        endpoint: endpoint.into(),
        source: e,
    })?;

    if !resp.status().is_success() {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        return Err(ClientError::Api {
            endpoint: endpoint.into(),
            status,
            body,
        });
    }

    resp.json().await.map_err(|e| ClientError::Deserialization {
        endpoint: endpoint.into(),
        source: e,
    })
}
