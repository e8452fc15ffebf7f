//! # Collaborator Traits
//!
//! The seams between the request orchestrator and the external services.
//!
//! Implementations must be `Send + Sync` so they can be shared across
//! async tasks behind an `Arc`. Both traits are object-safe to support
//! runtime selection (live client vs. in-memory fake).

use async_trait::async_trait;
use payee_consent_core::{AccessItem, Assessment, ConsentDecision, ConsentMetadata};

use crate::error::ClientError;
use crate::oauth::{AccessToken, Introspection, OAuthClient};
use crate::privacy::{PrivacyClient, StoreConsentsResult};

/// OAuth token service operations.
#[async_trait]
pub trait TokenService: Send + Sync {
    /// Validate a bearer credential and return the identity behind it.
    async fn introspect(&self, token: &str) -> Result<Introspection, ClientError>;

    /// Obtain a service-level token scoped to a third-party client.
    async fn client_token(&self, tpp_client_id: &str) -> Result<AccessToken, ClientError>;
}

/// Privacy engine operations.
#[async_trait]
pub trait ConsentAssessor: Send + Sync {
    /// Decide whether the items may be accessed.
    async fn assess(&self, bearer: &str, items: &[AccessItem]) -> Result<Assessment, ClientError>;

    /// Display metadata for items requiring consent.
    async fn consent_metadata(
        &self,
        bearer: &str,
        items: &[AccessItem],
    ) -> Result<ConsentMetadata, ClientError>;

    /// Persist the user's consent decisions.
    async fn store_consents(
        &self,
        bearer: &str,
        consents: &[ConsentDecision],
    ) -> Result<StoreConsentsResult, ClientError>;
}

#[async_trait]
impl TokenService for OAuthClient {
    async fn introspect(&self, token: &str) -> Result<Introspection, ClientError> {
        OAuthClient::introspect(self, token).await
    }

    async fn client_token(&self, tpp_client_id: &str) -> Result<AccessToken, ClientError> {
        OAuthClient::client_token(self, tpp_client_id).await
    }
}

#[async_trait]
impl ConsentAssessor for PrivacyClient {
    async fn assess(&self, bearer: &str, items: &[AccessItem]) -> Result<Assessment, ClientError> {
        PrivacyClient::assess(self, bearer, items).await
    }

    async fn consent_metadata(
        &self,
        bearer: &str,
        items: &[AccessItem],
    ) -> Result<ConsentMetadata, ClientError> {
        PrivacyClient::consent_metadata(self, bearer, items).await
    }

    async fn store_consents(
        &self,
        bearer: &str,
        consents: &[ConsentDecision],
    ) -> Result<StoreConsentsResult, ClientError> {
        PrivacyClient::store_consents(self, bearer, consents).await
    }
}
