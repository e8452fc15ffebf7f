//! # payee-consent-client: Typed clients for the consent collaborators
//!
//! Two external services back the payee consent flow:
//!
//! - **Token service** (OAuth 2.0): bearer introspection and
//!   client-credential tokens, via [`oauth::OAuthClient`].
//! - **Privacy engine**: consent assessment, consent display metadata and
//!   consent storage, via [`privacy::PrivacyClient`].
//!
//! ## Architecture
//!
//! The API layer never holds the concrete clients directly. It depends on
//! the [`TokenService`] and [`ConsentAssessor`] traits so each request path
//! receives its collaborators explicitly and tests can substitute fakes.
//! [`BrokerClient`] wires the concrete implementations from one
//! [`ClientConfig`] and one shared connection pool.
//!
//! No call is retried. A failed collaborator call is surfaced to the
//! caller as a [`ClientError`] naming the endpoint.

pub mod collaborators;
pub mod config;
pub mod error;
pub mod oauth;
pub mod privacy;
mod transport;

pub use collaborators::{ConsentAssessor, TokenService};
pub use config::ClientConfig;
pub use error::ClientError;

use std::time::Duration;

/// Concrete collaborator clients sharing one HTTP connection pool.
#[derive(Debug, Clone)]
pub struct BrokerClient {
    oauth: oauth::OAuthClient,
    privacy: privacy::PrivacyClient,
}

impl BrokerClient {
    /// Create both clients from configuration.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ClientError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;

        Ok(Self {
            oauth: oauth::OAuthClient::new(
                http.clone(),
                config::with_trailing_slash(config.token_service_url),
                config.client_id,
                config.client_secret,
            ),
            privacy: privacy::PrivacyClient::new(
                http,
                config::with_trailing_slash(config.privacy_service_url),
            ),
        })
    }

    /// Access the OAuth token-service client.
    pub fn oauth(&self) -> &oauth::OAuthClient {
        &self.oauth
    }

    /// Access the privacy-engine client.
    pub fn privacy(&self) -> &privacy::PrivacyClient {
        &self.privacy
    }

    /// Split into the two independently shareable clients.
    pub fn into_parts(self) -> (oauth::OAuthClient, privacy::PrivacyClient) {
        (self.oauth, self.privacy)
    }
}
