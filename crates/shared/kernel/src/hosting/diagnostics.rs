use super::http_logging::loggable_headers;
use crate::domain::constants::DIAGNOSTICS_TARGET;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response};
use std::time::Duration;
use tower_http::classify::ServerErrorsFailureClass;
use tower_http::trace::TraceLayer;
use tracing::{Span, debug, info, warn};

/// Bridges the framework's per-request tracing into the service log.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DiagnosticsTracing {
    /// Log headers at `DEBUG` instead of `INFO` summaries.
    pub verbose: bool,
}

impl DiagnosticsTracing {
    pub(crate) fn apply(self, router: Router) -> Router {
        let verbose = self.verbose;
        let layer = TraceLayer::new_for_http()
            .make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    target: DIAGNOSTICS_TARGET,
                    "request",
                    method = %request.method(),
                    uri = %request.uri()
                )
            })
            .on_request(move |request: &Request<Body>, _span: &Span| {
                if verbose {
                    debug!(
                        target: DIAGNOSTICS_TARGET,
                        version = ?request.version(),
                        headers = ?loggable_headers(request.headers(), false),
                        "Request started"
                    );
                } else {
                    info!(target: DIAGNOSTICS_TARGET, "Request started");
                }
            })
            .on_response(move |response: &Response<Body>, latency: Duration, _span: &Span| {
                if verbose {
                    debug!(
                        target: DIAGNOSTICS_TARGET,
                        status = response.status().as_u16(),
                        headers = ?loggable_headers(response.headers(), false),
                        latency_ms = latency.as_millis(),
                        "Request finished"
                    );
                } else {
                    info!(
                        target: DIAGNOSTICS_TARGET,
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "Request finished"
                    );
                }
            })
            .on_failure(|failure: ServerErrorsFailureClass, latency: Duration, _span: &Span| {
                warn!(
                    target: DIAGNOSTICS_TARGET,
                    failure = %failure,
                    latency_ms = latency.as_millis(),
                    "Request failed"
                );
            });

        router.layer(layer)
    }
}
