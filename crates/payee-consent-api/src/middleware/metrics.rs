//! # Request Metrics
//!
//! Lightweight request metrics using atomic counters, exposed as plain
//! text at `/metrics`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use axum::Extension;

/// Shared metrics state.
#[derive(Debug, Clone)]
pub struct ApiMetrics {
    pub request_count: Arc<AtomicU64>,
    pub error_count: Arc<AtomicU64>,
}

impl ApiMetrics {
    pub fn new() -> Self {
        Self {
            request_count: Arc::new(AtomicU64::new(0)),
            error_count: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn requests(&self) -> u64 {
        self.request_count.load(Ordering::Relaxed)
    }

    /// Responses with a 4xx or 5xx status.
    pub fn errors(&self) -> u64 {
        self.error_count.load(Ordering::Relaxed)
    }
}

impl Default for ApiMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Middleware that increments request and error counters.
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let metrics = request.extensions().get::<ApiMetrics>().cloned();

    let response = next.run(request).await;

    if let Some(m) = metrics {
        m.request_count.fetch_add(1, Ordering::Relaxed);
        if response.status().is_server_error() || response.status().is_client_error() {
            m.error_count.fetch_add(1, Ordering::Relaxed);
        }
    }

    response
}

/// GET /metrics
pub async fn render(Extension(metrics): Extension<ApiMetrics>) -> String {
    format!(
        "payee_consent_requests_total {}\npayee_consent_errors_total {}\n",
        metrics.requests(),
        metrics.errors()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::middleware::from_fn;
    use axum::routing::get;
    use axum::Router;
    use tower::ServiceExt;

    fn router(metrics: ApiMetrics) -> Router {
        Router::new()
            .route("/ok", get(|| async { "ok" }))
            .route("/fail", get(|| async { StatusCode::BAD_GATEWAY }))
            .layer(from_fn(metrics_middleware))
            .layer(Extension(metrics))
    }

    #[tokio::test]
    async fn counts_requests_and_errors() {
        let metrics = ApiMetrics::new();
        let app = router(metrics.clone());

        for uri in ["/ok", "/ok", "/fail"] {
            app.clone()
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
        }

        assert_eq!(metrics.requests(), 3);
        assert_eq!(metrics.errors(), 1);
    }

    #[tokio::test]
    async fn render_reports_counters() {
        let metrics = ApiMetrics::new();
        metrics.request_count.fetch_add(7, Ordering::Relaxed);
        metrics.error_count.fetch_add(2, Ordering::Relaxed);
        let text = render(Extension(metrics)).await;
        assert!(text.contains("payee_consent_requests_total 7"));
        assert!(text.contains("payee_consent_errors_total 2"));
    }
}
