//! # Signed Consent Token
//!
//! Carries the caller's identity and the consent metadata across the
//! redirect to the consent prompt, so the broker keeps no session state.
//!
//! HS256 over `{uid, appId, clientId, metadata, iat, exp}`. Decoding
//! checks signature, algorithm and expiry; a token that fails any of
//! them is rejected as a whole.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use payee_consent_client::oauth::Introspection;
use payee_consent_core::ConsentMetadata;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Shortest accepted HS256 secret, in bytes.
pub const MIN_SECRET_LEN: usize = 32;

/// Clock skew tolerated on `exp`, in seconds.
const LEEWAY_SECS: u64 = 5;

/// Claims embedded in a consent token.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsentClaims {
    /// Subject of the introspected credential.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
    /// Third-party client the consent is granted to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    pub metadata: ConsentMetadata,
    pub iat: i64,
    pub exp: i64,
}

/// Errors producing or checking a consent token.
#[derive(Error, Debug)]
pub enum TokenError {
    #[error("consent token secret must be at least {MIN_SECRET_LEN} bytes, got {len}")]
    WeakSecret { len: usize },

    #[error("consent token lifetime of {0} seconds is out of range")]
    InvalidTtl(u64),

    #[error("failed to sign consent token: {0}")]
    Encode(#[source] jsonwebtoken::errors::Error),

    #[error("invalid consent token: {0}")]
    Invalid(#[source] jsonwebtoken::errors::Error),
}

/// Signs and verifies consent tokens with a shared HS256 secret.
#[derive(Clone)]
pub struct ConsentTokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl std::fmt::Debug for ConsentTokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsentTokenSigner")
            .field("keys", &"[REDACTED]")
            .field("ttl_secs", &self.ttl.num_seconds())
            .finish()
    }
}

impl ConsentTokenSigner {
    pub fn new(secret: &[u8], ttl_secs: u64) -> Result<Self, TokenError> {
        if secret.len() < MIN_SECRET_LEN {
            return Err(TokenError::WeakSecret { len: secret.len() });
        }
        let ttl = i64::try_from(ttl_secs)
            .ok()
            .and_then(Duration::try_seconds)
            .ok_or(TokenError::InvalidTtl(ttl_secs))?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = LEEWAY_SECS;
        validation.set_required_spec_claims(&["exp"]);

        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
        })
    }

    /// Mint a token for the introspected caller carrying `metadata`.
    pub fn sign(
        &self,
        identity: &Introspection,
        metadata: ConsentMetadata,
    ) -> Result<String, TokenError> {
        let now = Utc::now();
        let expires = now
            .checked_add_signed(self.ttl)
            .ok_or(TokenError::InvalidTtl(self.ttl.num_seconds().unsigned_abs()))?;
        let claims = ConsentClaims {
            uid: identity.subject().map(str::to_string),
            app_id: identity.app_id.clone(),
            client_id: identity.client_id.clone(),
            metadata,
            iat: now.timestamp(),
            exp: expires.timestamp(),
        };
        self.encode(&claims)
    }

    fn encode(&self, claims: &ConsentClaims) -> Result<String, TokenError> {
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(TokenError::Encode)
    }

    pub fn verify(&self, token: &str) -> Result<ConsentClaims, TokenError> {
        jsonwebtoken::decode::<ConsentClaims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(TokenError::Invalid)
    }
}
