//! Well-known names shared by the host and its feature slices.

/// Logging target for loader failures reported during handler discovery.
pub const DISCOVERY_TARGET: &str = "idsrv::discovery";
/// Logging target for unhandled request errors.
pub const EXCEPTIONS_TARGET: &str = "idsrv::exceptions";
/// Logging target for the framework request tracing bridge.
pub const DIAGNOSTICS_TARGET: &str = "idsrv::diagnostics";
/// Logging target for the request/response observer.
pub const HTTP_TARGET: &str = "idsrv::http";

/// Environment prefix for configuration overrides (`IDSRV__LOGGING__ENABLE_HTTP_LOGGING`).
pub const ENV_PREFIX: &str = "IDSRV";

pub const JSON_MEDIA_TYPE: &str = "application/json";
pub const XML_MEDIA_TYPE: &str = "application/xml";

/// Message returned to remote callers instead of internal error text.
pub const GENERIC_ERROR_MESSAGE: &str = "An error has occurred.";

