use crate::domain::constants::HTTP_TARGET;
use axum::Router;
use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::http::header::{AUTHORIZATION, COOKIE, PROXY_AUTHORIZATION, SET_COOKIE};
use axum::middleware::{self, Next};
use axum::response::Response;
use std::borrow::Cow;
use std::time::Instant;
use tracing::info;

const REDACTED: &str = "[redacted]";

/// Delegating handlers wrapped around the dispatch table, outermost first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageHandler {
    RequestResponseLogger(RequestResponseLogger),
}

impl MessageHandler {
    pub(crate) fn apply(self, router: Router) -> Router {
        match self {
            Self::RequestResponseLogger(logger) => {
                router.layer(middleware::from_fn_with_state(logger, log_exchange))
            },
        }
    }
}

/// Observes each request and response and writes them to `idsrv::http`.
///
/// Purely observational: the exchange passes through untouched.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RequestResponseLogger {
    pub include_sensitive_data: bool,
}

impl RequestResponseLogger {
    #[must_use]
    pub const fn new(include_sensitive_data: bool) -> Self {
        Self { include_sensitive_data }
    }
}

/// Renders headers for logging, masking credentials unless sensitive data is allowed.
#[must_use]
pub fn loggable_headers(headers: &HeaderMap, include_sensitive_data: bool) -> Vec<(String, Cow<'_, str>)> {
    headers
        .iter()
        .map(|(name, value)| {
            let sensitive = [&AUTHORIZATION, &COOKIE, &SET_COOKIE, &PROXY_AUTHORIZATION].contains(&name);
            let rendered = if sensitive && !include_sensitive_data {
                Cow::Borrowed(REDACTED)
            } else {
                value.to_str().map_or(Cow::Borrowed("<binary>"), Cow::Borrowed)
            };
            (name.as_str().to_owned(), rendered)
        })
        .collect()
}

async fn log_exchange(
    State(logger): State<RequestResponseLogger>,
    request: Request,
    next: Next,
) -> Response {
    let started = Instant::now();
    let method = request.method().clone();
    let uri = request.uri().clone();

    info!(
        target: HTTP_TARGET,
        method = %method,
        uri = %uri,
        version = ?request.version(),
        headers = ?loggable_headers(request.headers(), logger.include_sensitive_data),
        "HTTP request"
    );

    let response = next.run(request).await;

    info!(
        target: HTTP_TARGET,
        method = %method,
        uri = %uri,
        status = response.status().as_u16(),
        headers = ?loggable_headers(response.headers(), logger.include_sensitive_data),
        latency_ms = started.elapsed().as_millis(),
        "HTTP response"
    );

    response
}
