//! Hosting pipeline assembly.
//!
//! [`configure`] turns the loaded [`ApiConfig`] and the composed
//! [`ServiceContainer`] into a [`HostConfiguration`];
//! [`HostConfiguration::build_router`] activates the discovered handlers and
//! wraps them in the pipeline layers.

mod authentication;
mod diagnostics;
mod error;
mod error_policy;
mod exception;
mod formatters;
mod http_logging;

pub use authentication::{HostAuthentication, HostPrincipal};
pub use diagnostics::DiagnosticsTracing;
pub use error::{ApiError, ErrorBody, ErrorBodyInner, ExceptionDetail};
pub use error_policy::{IncludeErrorDetailPolicy, RequestOrigin};
pub use exception::{
    ExceptionLogger, LogExceptionLogger, TraceExceptionLogger, UnhandledRequestException,
};
pub use formatters::{MediaTypeFormatter, MediaTypeFormatters};
pub use http_logging::{MessageHandler, RequestResponseLogger, loggable_headers};

use crate::discovery::{
    Assembly, AssemblyControllerTypeResolver, DiscoveryError, EmptyControllerTypeResolver,
    HttpControllerTypeResolver,
};
use crate::domain::config::ApiConfig;
use crate::server::{ActivationError, DependencyResolver, ServiceContainer};
use axum::Router;
use axum::middleware;
use error_policy::ErrorPipeline;
use std::borrow::Cow;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tracing::{debug, info};

#[idsrv_derive::idsrv_error]
pub enum HostingError {
    #[error("Handler discovery failed{}: {source}", format_context(.context))]
    Discovery { source: DiscoveryError, context: Option<Cow<'static, str>> },

    #[error("Handler activation failed{}: {source}", format_context(.context))]
    Activation { source: ActivationError, context: Option<Cow<'static, str>> },

    #[error("Invalid host configuration{}: {message}", format_context(.context))]
    Configuration { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

/// Mutable hosting configuration consumed by [`HostConfiguration::build_router`].
#[derive(Debug, Clone)]
pub struct HostConfiguration {
    /// Mount handler-declared routes. Without it no handler is mounted.
    pub attribute_routes: bool,
    pub host_authentication: HostAuthentication,
    pub dependency_resolver: Option<DependencyResolver>,
    pub exception_loggers: Vec<Arc<dyn ExceptionLogger>>,
    pub controller_type_resolver: Arc<dyn HttpControllerTypeResolver>,
    pub formatters: MediaTypeFormatters,
    pub error_detail_policy: IncludeErrorDetailPolicy,
    pub diagnostics: Option<DiagnosticsTracing>,
    /// Outermost first.
    pub message_handlers: Vec<MessageHandler>,
}

impl Default for HostConfiguration {
    fn default() -> Self {
        Self {
            attribute_routes: false,
            host_authentication: HostAuthentication::Default,
            dependency_resolver: None,
            exception_loggers: vec![Arc::new(TraceExceptionLogger)],
            controller_type_resolver: Arc::new(EmptyControllerTypeResolver),
            formatters: MediaTypeFormatters::default(),
            error_detail_policy: IncludeErrorDetailPolicy::Default,
            diagnostics: None,
            message_handlers: Vec::new(),
        }
    }
}

/// Applies the host's configuration steps, in order, to a fresh [`HostConfiguration`].
#[must_use]
pub fn configure(
    config: &ApiConfig,
    container: ServiceContainer,
    assembly: Arc<dyn Assembly>,
) -> HostConfiguration {
    let mut host = HostConfiguration::default();

    host.attribute_routes = true;
    host.host_authentication = HostAuthentication::Suppressed;
    host.dependency_resolver = Some(DependencyResolver::new(config.clone(), container));
    host.exception_loggers.push(Arc::new(LogExceptionLogger));
    host.controller_type_resolver = Arc::new(AssemblyControllerTypeResolver::new(assembly));
    host.formatters.remove(MediaTypeFormatter::Xml);
    host.error_detail_policy = IncludeErrorDetailPolicy::LocalOnly;

    let logging = config.logging;
    if logging.enable_web_api_diagnostics {
        host.diagnostics =
            Some(DiagnosticsTracing { verbose: logging.web_api_diagnostics_is_verbose });
    }
    if logging.enable_http_logging {
        host.message_handlers.push(MessageHandler::RequestResponseLogger(
            RequestResponseLogger::new(logging.include_sensitive_data_in_logs),
        ));
    }

    info!(
        diagnostics = host.diagnostics.is_some(),
        http_logging = logging.enable_http_logging,
        "Host configuration assembled"
    );
    host
}

impl HostConfiguration {
    /// Builds the dispatch table and wraps it in the pipeline, innermost first:
    /// panic capture, error-detail policy, host-auth suppression, message
    /// handlers, diagnostics.
    ///
    /// # Errors
    /// Fails when the hosting assembly is inaccessible or a handler cannot be
    /// activated.
    ///
    /// # Panics
    /// Panics when two handlers declare the same method and path.
    pub fn build_router(&self) -> Result<Router, HostingError> {
        let resolver = self.dependency_resolver.clone().unwrap_or_default();
        let mut router = Router::new();

        if self.attribute_routes {
            let handlers = self.controller_type_resolver.controller_types()?;
            for ty in &handlers {
                let Some(activate) = ty.activator else {
                    return Err(HostingError::Configuration {
                        message: format!("Handler type '{}' has no activator", ty.name).into(),
                        context: None,
                    });
                };
                let routes = activate(&resolver).context(ty.name)?.routes();
                router = match ty.route {
                    Some(prefix) => router.nest(prefix, routes),
                    None => router.merge(routes),
                };
                debug!(handler = ty.name, route = ty.route.unwrap_or("/"), "Mounted handler");
            }
            info!(handlers = handlers.len(), "Dispatch table built");
        } else {
            debug!("Attribute routing disabled; no handlers mounted");
        }

        let pipeline = Arc::new(ErrorPipeline {
            policy: self.error_detail_policy,
            loggers: self.exception_loggers.clone(),
            formatters: self.formatters.clone(),
        });

        let mut router = router
            .fallback(error::not_found_fallback)
            .layer(CatchPanicLayer::custom(error::panic_response))
            .layer(middleware::from_fn_with_state(pipeline, error_policy::apply_error_policy));

        if self.host_authentication == HostAuthentication::Suppressed {
            router = router.layer(middleware::from_fn(authentication::suppress_host_principal));
        }
        for handler in self.message_handlers.iter().rev() {
            router = handler.apply(router);
        }
        if let Some(diagnostics) = self.diagnostics {
            router = diagnostics.apply(router);
        }

        Ok(router)
    }
}
