use super::error::{ErrorBody, ExceptionDetail};
use super::exception::{ExceptionLogger, UnhandledRequestException};
use super::formatters::MediaTypeFormatters;
use axum::body::Body;
use axum::extract::{ConnectInfo, Request, State};
use axum::http::{HeaderValue, header};
use axum::middleware::Next;
use axum::response::Response;
use std::net::SocketAddr;
use std::sync::Arc;

/// Controls whether error detail reaches the caller.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum IncludeErrorDetailPolicy {
    /// Host default; behaves like [`Self::LocalOnly`].
    #[default]
    Default,
    LocalOnly,
    Always,
    Never,
}

impl IncludeErrorDetailPolicy {
    #[must_use]
    pub const fn should_include(self, origin: RequestOrigin) -> bool {
        match self {
            Self::Default | Self::LocalOnly => matches!(origin, RequestOrigin::Local),
            Self::Always => true,
            Self::Never => false,
        }
    }
}

/// Where a request came from, judged by the peer address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOrigin {
    Local,
    Remote,
}

impl RequestOrigin {
    /// Loopback peers are local. Requests without connection info are remote.
    #[must_use]
    pub fn of(request: &Request) -> Self {
        match request.extensions().get::<ConnectInfo<SocketAddr>>() {
            Some(ConnectInfo(addr)) if addr.ip().to_canonical().is_loopback() => Self::Local,
            _ => Self::Remote,
        }
    }
}

/// State shared by the error-detail middleware.
#[derive(Debug)]
pub(crate) struct ErrorPipeline {
    pub(crate) policy: IncludeErrorDetailPolicy,
    pub(crate) loggers: Vec<Arc<dyn ExceptionLogger>>,
    pub(crate) formatters: MediaTypeFormatters,
}

pub(crate) async fn apply_error_policy(
    State(pipeline): State<Arc<ErrorPipeline>>,
    request: Request,
    next: Next,
) -> Response {
    let origin = RequestOrigin::of(&request);
    let method = request.method().clone();
    let uri = request.uri().clone();
    let accept = request.headers().get(header::ACCEPT).cloned();

    let response = next.run(request).await;
    let Some(exception) = response.extensions().get::<ExceptionDetail>().cloned() else {
        return response;
    };

    let status = response.status();
    if status.is_server_error() {
        let unhandled =
            UnhandledRequestException { method: &method, uri: &uri, status, exception: &exception };
        for logger in &pipeline.loggers {
            logger.log(&unhandled);
        }
    }

    let include_detail = pipeline.policy.should_include(origin);
    let body = ErrorBody::render(status, &exception, include_detail);
    let formatter = pipeline.formatters.negotiate(accept.as_ref());

    let (mut parts, _) = response.into_parts();
    parts.headers.remove(header::CONTENT_LENGTH);
    parts.headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(formatter.media_type()));
    Response::from_parts(parts, Body::from(formatter.format(&body)))
}
