use super::{Activate, ActivationError, DependencyResolver, HttpHandler};
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use std::sync::{Arc, LazyLock};
use std::time::Instant;

static START_TIME: LazyLock<Instant> = LazyLock::new(Instant::now);

/// Health check response
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    /// Uptime in seconds
    uptime: u64,
    site: String,
}

/// Liveness probe mounted at `/health`.
#[idsrv_derive::exported_type(handler)]
#[derive(Debug)]
pub struct HealthEndpoint {
    site: String,
}

impl Activate for HealthEndpoint {
    fn activate(resolver: &DependencyResolver) -> Result<Self, ActivationError> {
        LazyLock::force(&START_TIME);
        Ok(Self { site: resolver.config.identity.site_name.clone() })
    }
}

impl HttpHandler for HealthEndpoint {
    fn routes(self: Arc<Self>) -> Router {
        Router::new().route("/health", get(health_handler)).with_state(self)
    }
}

async fn health_handler(State(endpoint): State<Arc<HealthEndpoint>>) -> impl IntoResponse {
    let body = HealthResponse {
        status: "up",
        version: env!("CARGO_PKG_VERSION"),
        uptime: START_TIME.elapsed().as_secs(),
        site: endpoint.site.clone(),
    };

    (
        [
            (header::CACHE_CONTROL, "no-store, no-cache, must-revalidate"),
            (header::PRAGMA, "no-cache"),
        ],
        Json(body),
    )
}
