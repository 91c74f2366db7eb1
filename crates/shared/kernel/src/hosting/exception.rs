use super::error::ExceptionDetail;
use crate::domain::constants::EXCEPTIONS_TARGET;
use axum::http::{Method, StatusCode, Uri};
use std::fmt::Debug;
use tracing::{error, trace};

/// An unhandled request failure (any 5xx carrying an [`ExceptionDetail`]).
#[derive(Debug)]
pub struct UnhandledRequestException<'a> {
    pub method: &'a Method,
    pub uri: &'a Uri,
    pub status: StatusCode,
    pub exception: &'a ExceptionDetail,
}

/// Sink notified of every unhandled request failure.
pub trait ExceptionLogger: Debug + Send + Sync {
    fn log(&self, exception: &UnhandledRequestException<'_>);
}

/// Framework-level default: records the failure at `TRACE`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TraceExceptionLogger;

impl ExceptionLogger for TraceExceptionLogger {
    fn log(&self, exception: &UnhandledRequestException<'_>) {
        trace!(
            target: EXCEPTIONS_TARGET,
            method = %exception.method,
            uri = %exception.uri,
            status = exception.status.as_u16(),
            code = exception.exception.code,
            "Unhandled request exception"
        );
    }
}

/// Writes unhandled failures, detail included, to the service log at `ERROR`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogExceptionLogger;

impl ExceptionLogger for LogExceptionLogger {
    fn log(&self, exception: &UnhandledRequestException<'_>) {
        error!(
            target: EXCEPTIONS_TARGET,
            method = %exception.method,
            uri = %exception.uri,
            status = exception.status.as_u16(),
            code = exception.exception.code,
            detail = exception.exception.detail.as_deref().unwrap_or_default(),
            "{}",
            exception.exception.message
        );
    }
}
