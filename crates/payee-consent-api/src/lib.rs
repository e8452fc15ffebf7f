//! # payee-consent-api: Consent broker for payee data access
//!
//! Sits between the banking application, the OAuth token service and the
//! privacy engine. Each request is a short sequence of dependent calls:
//! extract the bearer, introspect it, assess the requested data access,
//! and either answer with the decision or hand the user a signed consent
//! prompt link.
//!
//! ## API Surface
//!
//! | Route                    | Module                 | Purpose                        |
//! |--------------------------|------------------------|--------------------------------|
//! | `POST /payee/authorize`  | [`routes::payee`]      | Assess access, mint consent link |
//! | `GET /payee/consent`     | [`routes::payee`]      | Render the consent prompt      |
//! | `POST /payee/consents`   | [`routes::payee`]      | Store the user's decisions     |
//! | `GET /health/*`          | this module            | Liveness / readiness probes    |
//! | `GET /metrics`           | [`middleware::metrics`] | Request counters              |
//! | `GET /openapi.json`      | [`openapi`]            | Generated OpenAPI document     |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → MetricsMiddleware → Handler
//! ```
//!
//! Authentication is per handler: `authorize` introspects the caller's
//! bearer, `consent` verifies the signed consent token.

pub mod auth;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod prompt;
pub mod routes;
pub mod state;
pub mod token;

use axum::middleware::from_fn;
use axum::Router;

use crate::middleware::metrics::ApiMetrics;
use crate::state::AppState;

/// Assemble the full application router with all routes and middleware.
///
/// Health probes and `/metrics` are mounted outside the metrics layer so
/// scrapes do not count themselves.
pub fn app(state: AppState) -> Router {
    let metrics = ApiMetrics::new();

    let api = Router::new()
        .nest(routes::payee::PREFIX, routes::payee::router())
        .merge(openapi::router())
        .layer(from_fn(middleware::metrics::metrics_middleware))
        .layer(axum::Extension(metrics.clone()))
        .with_state(state);

    let probes = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness))
        .route("/metrics", axum::routing::get(middleware::metrics::render))
        .layer(axum::Extension(metrics));

    Router::new()
        .merge(probes)
        .merge(api)
        .layer(middleware::tracing_layer::layer())
}

/// Liveness probe: always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe: returns 200 when the application is ready to serve.
async fn readiness() -> &'static str {
    "ready"
}
