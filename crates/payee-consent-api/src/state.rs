//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor.
//!
//! The broker owns no data. AppState holds only:
//! - **Configuration**: listen port and consent-token settings.
//! - **Collaborators**: the token service and the privacy engine,
//!   injected as trait objects so tests can drive every path with fakes.
//! - **Consent token signer**: built once from the configured secret.

use std::sync::Arc;

use payee_consent_client::{ConsentAssessor, TokenService};
use zeroize::Zeroizing;

use crate::token::{ConsentTokenSigner, TokenError};

/// Default lifetime of a signed consent token, in seconds.
pub const DEFAULT_CONSENT_TOKEN_TTL_SECS: u64 = 900;

/// Application configuration.
///
/// Custom `Debug` redacts the signing secret.
#[derive(Clone)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// HS256 secret for consent tokens. Zeroed on drop.
    pub consent_token_secret: Zeroizing<String>,
    /// Lifetime of a consent token, in seconds.
    pub consent_token_ttl_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("port", &self.port)
            .field("consent_token_secret", &"[REDACTED]")
            .field("consent_token_ttl_secs", &self.consent_token_ttl_secs)
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `PORT` (default: 8080)
    /// - `CONSENT_TOKEN_SECRET` (required)
    /// - `CONSENT_TOKEN_TTL_SECS` (default: 900)
    pub fn from_env() -> Result<Self, ConfigError> {
        let secret = std::env::var("CONSENT_TOKEN_SECRET")
            .ok()
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::MissingVar("CONSENT_TOKEN_SECRET"))?;

        Ok(Self {
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            consent_token_secret: Zeroizing::new(secret),
            consent_token_ttl_secs: std::env::var("CONSENT_TOKEN_TTL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_CONSENT_TOKEN_TTL_SECS),
        })
    }

    /// Configuration with defaults and the given signing secret.
    pub fn with_secret(secret: &str) -> Self {
        Self {
            port: 8080,
            consent_token_secret: Zeroizing::new(secret.to_string()),
            consent_token_ttl_secs: DEFAULT_CONSENT_TOKEN_TTL_SECS,
        }
    }
}

/// Errors loading [`AppConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    MissingVar(&'static str),
}

/// Shared application state. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub tokens: Arc<dyn TokenService>,
    pub assessor: Arc<dyn ConsentAssessor>,
    pub signer: ConsentTokenSigner,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Build state from configuration and explicitly supplied collaborators.
    ///
    /// Fails when the signing secret is too short to be safe.
    pub fn new(
        config: AppConfig,
        tokens: Arc<dyn TokenService>,
        assessor: Arc<dyn ConsentAssessor>,
    ) -> Result<Self, TokenError> {
        let signer = ConsentTokenSigner::new(
            config.consent_token_secret.as_bytes(),
            config.consent_token_ttl_secs,
        )?;
        Ok(Self {
            config: Arc::new(config),
            tokens,
            assessor,
            signer,
        })
    }
}
