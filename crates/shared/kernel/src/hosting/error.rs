use crate::domain::constants::GENERIC_ERROR_MESSAGE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::any::Any;

/// Request-level failure raised by handlers.
///
/// The response carries an [`ExceptionDetail`] extension; the error-detail
/// layer re-renders the body according to the host's detail policy and the
/// negotiated formatter.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {message}")]
    Internal { message: String, detail: Option<String> },
}

impl ApiError {
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal { message: message.into(), detail: None }
    }

    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    fn into_detail(self) -> ExceptionDetail {
        let code = self.code();
        match self {
            Self::NotFound(message)
            | Self::BadRequest(message)
            | Self::Unauthorized(message)
            | Self::Forbidden(message) => ExceptionDetail { code, message, detail: None },
            Self::Internal { message, detail } => ExceptionDetail { code, message, detail },
        }
    }
}

/// Error description attached to failed responses as an extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExceptionDetail {
    pub code: &'static str,
    pub message: String,
    /// Diagnostic text (panic payload, source chain); subject to the detail policy.
    pub detail: Option<String>,
}

/// Serialized error envelope: `{"error":{"code","message","detail"?}}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody<'a> {
    pub error: ErrorBodyInner<'a>,
}

#[derive(Debug, Serialize)]
pub struct ErrorBodyInner<'a> {
    pub code: &'a str,
    pub message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<&'a str>,
}

impl<'a> ErrorBody<'a> {
    /// Builds the client-facing envelope.
    ///
    /// Server errors shown without detail get the generic message.
    #[must_use]
    pub fn render(status: StatusCode, exception: &'a ExceptionDetail, include_detail: bool) -> Self {
        let message = if status.is_server_error() && !include_detail {
            GENERIC_ERROR_MESSAGE
        } else {
            exception.message.as_str()
        };
        let detail = if include_detail { exception.detail.as_deref() } else { None };

        Self { error: ErrorBodyInner { code: exception.code, message, detail } }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let exception = self.into_detail();
        // Provisional body without detail, in case no policy layer is installed.
        let body = ErrorBody::render(status, &exception, false);
        let mut response = (status, axum::Json(&body)).into_response();
        response.extensions_mut().insert(exception);
        response
    }
}

/// Converts a captured handler panic into a 500 carrying the panic payload as detail.
pub(crate) fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = payload
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| payload.downcast_ref::<&str>().map(|s| (*s).to_owned()))
        .unwrap_or_else(|| "Unknown panic payload".to_owned());

    ApiError::Internal { message: "Request handler panicked".to_owned(), detail: Some(detail) }
        .into_response()
}

pub(crate) async fn not_found_fallback(uri: axum::http::Uri) -> ApiError {
    ApiError::NotFound(format!("No handler matches '{}'", uri.path()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_response_carries_exception_detail() {
        let response = ApiError::Forbidden("nope".to_owned()).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let detail = response.extensions().get::<ExceptionDetail>().expect("detail extension");
        assert_eq!(detail.code, "FORBIDDEN");
        assert_eq!(detail.message, "nope");
        assert!(detail.detail.is_none());
    }

    #[test]
    fn render_hides_server_error_messages_without_detail() {
        let exception = ExceptionDetail {
            code: "INTERNAL_ERROR",
            message: "db pool exhausted".to_owned(),
            detail: Some("trace".to_owned()),
        };

        let hidden = ErrorBody::render(StatusCode::INTERNAL_SERVER_ERROR, &exception, false);
        assert_eq!(hidden.error.message, GENERIC_ERROR_MESSAGE);
        assert!(hidden.error.detail.is_none());

        let shown = ErrorBody::render(StatusCode::INTERNAL_SERVER_ERROR, &exception, true);
        assert_eq!(shown.error.message, "db pool exhausted");
        assert_eq!(shown.error.detail, Some("trace"));
    }

    #[test]
    fn render_keeps_client_error_messages() {
        let exception =
            ExceptionDetail { code: "NOT_FOUND", message: "missing".to_owned(), detail: None };
        let body = ErrorBody::render(StatusCode::NOT_FOUND, &exception, false);
        assert_eq!(body.error.message, "missing");
    }

    #[test]
    fn panic_payloads_become_detail() {
        let response = panic_response(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let detail = response.extensions().get::<ExceptionDetail>().expect("detail extension");
        assert_eq!(detail.detail.as_deref(), Some("boom"));
    }
}
