use super::container::{DependencyResolver, ResolutionError};
use axum::Router;
use std::borrow::Cow;
use std::sync::Arc;

#[idsrv_derive::idsrv_error]
pub enum ActivationError {
    #[error("Dependency resolution failed{}: {source}", format_context(.context))]
    Resolution { source: ResolutionError, context: Option<Cow<'static, str>> },

    #[error("Handler activation failed{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

/// Request-handler capability: a type that contributes routes to the dispatch table.
///
/// Routes are declared by the handler itself and mounted under the route prefix
/// recorded by `#[exported_type(route = "...")]`.
pub trait HttpHandler: Send + Sync + 'static {
    fn routes(self: Arc<Self>) -> Router;
}

/// Construction from the dependency resolver.
pub trait Activate: Sized {
    /// # Errors
    /// Returns an error when a required service is not registered.
    fn activate(resolver: &DependencyResolver) -> Result<Self, ActivationError>;
}
