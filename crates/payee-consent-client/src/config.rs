//! Collaborator client configuration.
//!
//! Base URLs and API client credentials for the token service and the
//! privacy engine. Loaded from the environment in production, built
//! explicitly in tests.

use url::Url;
use zeroize::Zeroizing;

/// Configuration for connecting to the consent collaborators.
///
/// Custom `Debug` implementation redacts the `client_secret` field
/// to prevent credential leakage in log output.
#[derive(Clone)]
pub struct ClientConfig {
    /// Base URL of the OAuth token service.
    pub token_service_url: Url,
    /// Base URL of the privacy engine. Usually the same tenant as the
    /// token service.
    pub privacy_service_url: Url,
    /// API client used for introspection and client-credential grants.
    pub client_id: String,
    /// Secret of the API client. Zeroed on drop.
    pub client_secret: Zeroizing<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("token_service_url", &self.token_service_url)
            .field("privacy_service_url", &self.privacy_service_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `TOKEN_SERVICE_URL` (required)
    /// - `PRIVACY_SERVICE_URL` (default: `TOKEN_SERVICE_URL`)
    /// - `API_CLIENT_ID` (required)
    /// - `API_CLIENT_SECRET` (required)
    /// - `BROKER_TIMEOUT_SECS` (default: 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        let token_raw = required_var("TOKEN_SERVICE_URL")?;
        let token_service_url = parse_url("TOKEN_SERVICE_URL", &token_raw)?;
        let privacy_service_url = match std::env::var("PRIVACY_SERVICE_URL") {
            Ok(raw) => parse_url("PRIVACY_SERVICE_URL", &raw)?,
            Err(_) => token_service_url.clone(),
        };

        Ok(Self {
            token_service_url,
            privacy_service_url,
            client_id: required_var("API_CLIENT_ID")?,
            client_secret: Zeroizing::new(required_var("API_CLIENT_SECRET")?),
            timeout_secs: std::env::var("BROKER_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
        })
    }

    /// Create a configuration pointing both collaborators at one local
    /// mock server (for testing).
    pub fn local_mock(base_url: &str, client_id: &str, client_secret: &str) -> Result<Self, ConfigError> {
        let url = parse_url("local_mock", base_url)?;
        Ok(Self {
            token_service_url: url.clone(),
            privacy_service_url: url,
            client_id: client_id.to_string(),
            client_secret: Zeroizing::new(client_secret.to_string()),
            timeout_secs: 5,
        })
    }
}

fn required_var(var: &'static str) -> Result<String, ConfigError> {
    match std::env::var(var) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingVar(var)),
    }
}

fn parse_url(var: &str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw)
        .map(with_trailing_slash)
        .map_err(|e| ConfigError::InvalidUrl(var.to_string(), e.to_string()))
}

/// Treat the base URL as a directory so endpoint paths append to it
/// instead of replacing its last segment.
pub(crate) fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    MissingVar(&'static str),
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
}
