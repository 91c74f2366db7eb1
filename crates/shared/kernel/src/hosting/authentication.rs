use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use tracing::trace;

/// Whether principals established by the hosting layer reach the handlers.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum HostAuthentication {
    #[default]
    Default,
    /// Handlers authenticate on their own; host principals are discarded.
    Suppressed,
}

/// Identity attached to a request by an outer hosting layer (TLS client
/// certificate, reverse-proxy header, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostPrincipal {
    pub name: String,
    pub authentication_type: String,
}

pub(crate) async fn suppress_host_principal(mut request: Request, next: Next) -> Response {
    if let Some(principal) = request.extensions_mut().remove::<HostPrincipal>() {
        trace!(name = %principal.name, "Suppressed host principal");
    }
    next.run(request).await
}
