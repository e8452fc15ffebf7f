//! Typed client for the OAuth 2.0 token service.
//!
//! ## Endpoints
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | POST   | `/v1.0/endpoint/default/introspect` | RFC 7662 token introspection |
//! | POST   | `/v1.0/endpoint/default/token` | Client-credentials grant |
//!
//! Both endpoints take `application/x-www-form-urlencoded` bodies and
//! authenticate the API client with `client_id`/`client_secret` fields.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use zeroize::Zeroizing;

use crate::error::ClientError;
use crate::transport::send_json;

/// Path of the introspection endpoint, relative to the base URL.
const INTROSPECT_PATH: &str = "v1.0/endpoint/default/introspect";

/// Path of the token endpoint, relative to the base URL.
const TOKEN_PATH: &str = "v1.0/endpoint/default/token";

// -- Response types -----------------------------------------------------------

/// Identity behind a bearer credential, as reported by introspection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Introspection {
    /// Whether the credential is currently valid.
    #[serde(default)]
    pub active: bool,
    /// Unique subject identifier of the resource owner.
    #[serde(default, rename = "uniqueSecurityName", skip_serializing_if = "Option::is_none")]
    pub unique_security_name: Option<String>,
    /// Standard RFC 7662 subject, used when `uniqueSecurityName` is absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Application the credential was issued to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
    /// OAuth client the credential was issued to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Introspection {
    /// The subject identifier, preferring `uniqueSecurityName` over `sub`.
    pub fn subject(&self) -> Option<&str> {
        self.unique_security_name
            .as_deref()
            .or(self.sub.as_deref())
    }
}

/// Access token issued by a client-credentials grant.
///
/// Custom `Debug` redacts the token value.
#[derive(Clone, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("access_token", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

// -- Client -------------------------------------------------------------------

/// Client for the OAuth token service.
#[derive(Clone)]
pub struct OAuthClient {
    http: reqwest::Client,
    base_url: url::Url,
    client_id: String,
    client_secret: Zeroizing<String>,
}

impl std::fmt::Debug for OAuthClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthClient")
            .field("base_url", &self.base_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .finish()
    }
}

impl OAuthClient {
    pub(crate) fn new(
        http: reqwest::Client,
        base_url: url::Url,
        client_id: String,
        client_secret: Zeroizing<String>,
    ) -> Self {
        Self {
            http,
            base_url,
            client_id,
            client_secret,
        }
    }

    /// Introspect a bearer credential.
    ///
    /// Calls `POST {base_url}/v1.0/endpoint/default/introspect`. An inactive
    /// credential is a successful call with `active == false`.
    pub async fn introspect(&self, token: &str) -> Result<Introspection, ClientError> {
        let endpoint = "POST /endpoint/default/introspect";
        let url = format!("{}{}", self.base_url, INTROSPECT_PATH);

        let form = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("token", token),
        ];
        let introspection: Introspection =
            send_json(endpoint, self.http.post(&url).form(&form)).await?;

        tracing::debug!(
            active = introspection.active,
            subject = ?introspection.subject(),
            app_id = ?introspection.app_id,
            "token introspected"
        );
        Ok(introspection)
    }

    /// Obtain a service-level token on behalf of a third-party client.
    ///
    /// Calls `POST {base_url}/v1.0/endpoint/default/token` with the
    /// client-credentials grant, scoping the token to `tpp_client_id`.
    pub async fn client_token(&self, tpp_client_id: &str) -> Result<AccessToken, ClientError> {
        let endpoint = "POST /endpoint/default/token";
        let url = format!("{}{}", self.base_url, TOKEN_PATH);

        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("tpp_client_id", tpp_client_id),
        ];
        let token: AccessToken = send_json(endpoint, self.http.post(&url).form(&form)).await?;

        tracing::debug!(tpp_client_id, "client-credentials token issued");
        Ok(token)
    }
}
