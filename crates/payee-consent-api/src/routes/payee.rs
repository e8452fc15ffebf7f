//! # Payee Consent Routes
//!
//! ```text
//! POST /payee/authorize   bearer + {items}            → decision or consent link
//! GET  /payee/consent     ?jwt&callbackUri&custom     → consent prompt
//! POST /payee/consents    {tppClientId, consents, ..} → {callbackUri}
//! ```
//!
//! ## Authorize
//!
//! Credential → introspection → assessment. A `consent` decision narrows
//! the assessment to the items that actually need consent, fetches their
//! display metadata, and signs it into a short-lived consent token handed
//! back as a link to the prompt.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use payee_consent_core::{consent_required_items, AccessItem, ConsentDecision, DecisionStatus};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::{IntoParams, ToSchema};

use crate::auth::BearerCredential;
use crate::error::AppError;
use crate::extractors::{extract_validated_json, Validate};
use crate::prompt::{self, PromptView};
use crate::state::AppState;

/// Mount point of the broker routes.
pub const PREFIX: &str = "/payee";

/// Path the consent link points at.
pub const CONSENT_PROMPT_PATH: &str = "/payee/consent";

// -- DTOs ---------------------------------------------------------------------

/// Data access the caller wants assessed.
#[derive(Debug, Deserialize, ToSchema)]
pub struct AuthorizeRequest {
    /// `{purposeId, attributeId?, accessTypeId?, attributeValue?}` entries.
    #[schema(value_type = Vec<Object>)]
    pub items: Vec<AccessItem>,
}

impl Validate for AuthorizeRequest {
    fn validate(&self) -> Result<(), AppError> {
        AccessItem::validate_all(&self.items)?;
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizeResponse {
    /// approved, denied, multistatus, consent or error.
    #[schema(value_type = String)]
    pub status: DecisionStatus,
    /// Consent prompt link, present only for `consent`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_uri: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ConsentQuery {
    /// Signed consent token from the authorize response.
    pub jwt: Option<String>,
    /// Where the user's browser goes once the decisions are stored.
    /// Percent-decoded once by the query extractor and used as is after that.
    pub callback_uri: Option<String>,
    /// JSON object attached to every consent record.
    pub custom: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoreConsentsRequest {
    pub tpp_client_id: String,
    #[schema(value_type = Vec<Object>)]
    pub consents: Vec<ConsentDecision>,
    pub callback_uri: String,
}

impl Validate for StoreConsentsRequest {
    fn validate(&self) -> Result<(), AppError> {
        if self.tpp_client_id.trim().is_empty() {
            return Err(AppError::Validation("tppClientId must not be empty".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoreConsentsResponse {
    pub callback_uri: String,
}

// -- Router -------------------------------------------------------------------

/// Build the payee router, to be nested at [`PREFIX`].
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/authorize", post(authorize))
        .route("/consent", get(consent))
        .route("/consents", post(store_consents))
}

// -- Handlers -----------------------------------------------------------------

/// POST /payee/authorize: Assess the caller's requested data access.
#[utoipa::path(
    post,
    path = "/payee/authorize",
    request_body = AuthorizeRequest,
    params(("token" = Option<String>, Query, description = "Credential when no Authorization header is sent")),
    responses(
        (status = 200, description = "Approved, or consent required (with redirectUri)", body = AuthorizeResponse),
        (status = 401, description = "Missing or inactive credential", body = crate::error::ErrorBody),
        (status = 403, description = "Denied or partially denied", body = AuthorizeResponse),
        (status = 422, description = "Invalid access items", body = crate::error::ErrorBody),
        (status = 500, description = "Assessment failed", body = AuthorizeResponse),
        (status = 502, description = "Collaborator failure", body = crate::error::ErrorBody),
    ),
    tag = "payee"
)]
async fn authorize(
    State(state): State<AppState>,
    BearerCredential(credential): BearerCredential,
    body: Result<Json<AuthorizeRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AuthorizeResponse>), AppError> {
    let Some(credential) = credential else {
        tracing::warn!("authorize without credential");
        return Err(AppError::Unauthorized("Not authorized".into()));
    };

    let identity = state.tokens.introspect(&credential).await?;
    if !identity.active {
        tracing::warn!("authorize with inactive credential");
        return Err(AppError::Unauthorized("Not authorized".into()));
    }

    let req = extract_validated_json(body)?;

    tracing::debug!(
        subject = identity.subject().unwrap_or_default(),
        items = ?req.items,
        "assessment request"
    );
    let decision = state.assessor.assess(&credential, &req.items).await?;
    tracing::debug!(status = %decision.status, assessment = ?decision.assessment, "assessment response");

    let respond = |status: StatusCode,
                   decision: DecisionStatus|
     -> Result<(StatusCode, Json<AuthorizeResponse>), AppError> {
        Ok((
            status,
            Json(AuthorizeResponse {
                status: decision,
                redirect_uri: None,
            }),
        ))
    };

    match decision.status {
        DecisionStatus::Approved => respond(StatusCode::OK, DecisionStatus::Approved),
        status @ (DecisionStatus::Denied | DecisionStatus::Multistatus) => {
            respond(StatusCode::FORBIDDEN, status)
        }
        DecisionStatus::Error => {
            tracing::error!(error = ?decision.error, "consent assessment failed");
            respond(StatusCode::INTERNAL_SERVER_ERROR, DecisionStatus::Error)
        }
        DecisionStatus::Unknown => Err(AppError::upstream(
            "assessment returned an unrecognised status".into(),
        )),
        DecisionStatus::Consent => {
            let items = consent_required_items(&decision);
            tracing::debug!(items = ?items, "consent metadata request");
            let metadata = state.assessor.consent_metadata(&credential, &items).await?;
            tracing::debug!(records = metadata.default.len(), "consent metadata response");

            let token = state.signer.sign(&identity, metadata)?;
            Ok((
                StatusCode::OK,
                Json(AuthorizeResponse {
                    status: DecisionStatus::Consent,
                    redirect_uri: Some(format!("{CONSENT_PROMPT_PATH}?jwt={token}")),
                }),
            ))
        }
    }
}

/// GET /payee/consent: Render the consent prompt for a consent token.
#[utoipa::path(
    get,
    path = "/payee/consent",
    params(ConsentQuery),
    responses(
        (status = 200, description = "Consent prompt (HTML, or JSON view when requested)", content_type = "text/html", body = String),
        (status = 400, description = "Malformed input", content_type = "text/plain", body = String),
    ),
    tag = "payee"
)]
async fn consent(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: Result<Query<ConsentQuery>, QueryRejection>,
) -> Result<Response, AppError> {
    let Query(query) = query.map_err(|e| AppError::MalformedInput(e.body_text()))?;

    let jwt = query
        .jwt
        .ok_or_else(|| AppError::MalformedInput("missing jwt".into()))?;
    let claims = state.signer.verify(&jwt)?;

    let custom = query
        .custom
        .as_deref()
        .map(serde_json::from_str::<Map<String, Value>>)
        .transpose()
        .map_err(|e| AppError::MalformedInput(format!("custom: {e}")))?;

    let view = PromptView::new(claims, query.callback_uri.unwrap_or_default(), custom);

    if wants_json(&headers) {
        return Ok(Json(view).into_response());
    }
    let page = prompt::render_html(&view)
        .map_err(|e| AppError::Internal(format!("serialization error: {e}")))?;
    Ok(Html(page).into_response())
}

/// POST /payee/consents: Store the user's decisions with the privacy engine.
#[utoipa::path(
    post,
    path = "/payee/consents",
    request_body = StoreConsentsRequest,
    responses(
        (status = 200, description = "Decisions stored", body = StoreConsentsResponse),
        (status = 422, description = "Invalid request", body = crate::error::ErrorBody),
        (status = 502, description = "Collaborator failure", body = crate::error::ErrorBody),
    ),
    tag = "payee"
)]
async fn store_consents(
    State(state): State<AppState>,
    body: Result<Json<StoreConsentsRequest>, JsonRejection>,
) -> Result<Json<StoreConsentsResponse>, AppError> {
    let req = extract_validated_json(body)?;

    let token = state.tokens.client_token(&req.tpp_client_id).await?;

    tracing::debug!(
        tpp_client_id = %req.tpp_client_id,
        consents = ?req.consents,
        "store consents"
    );
    let result = state
        .assessor
        .store_consents(&token.access_token, &req.consents)
        .await?;
    tracing::debug!(status = %result.status, "store consents response");

    Ok(Json(StoreConsentsResponse {
        callback_uri: format!("{}?decision={}", req.callback_uri, result.status),
    }))
}

fn wants_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("application/json"))
}
