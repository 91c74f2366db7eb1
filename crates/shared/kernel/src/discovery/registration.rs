use crate::domain::capabilities::{Capabilities, TypeKind};
use crate::server::{Activate, ActivationError, DependencyResolver, HttpHandler};
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Constructs a handler instance from the resolver's registered services.
pub type Activator = fn(&DependencyResolver) -> Result<Arc<dyn HttpHandler>, ActivationError>;

/// Activator used by `#[exported_type(handler)]` for concrete handler classes.
///
/// # Errors
/// Propagates the handler's own activation error.
pub fn activate_handler<T>(resolver: &DependencyResolver) -> Result<Arc<dyn HttpHandler>, ActivationError>
where
    T: Activate + HttpHandler,
{
    T::activate(resolver).map(|handler| Arc::new(handler) as Arc<dyn HttpHandler>)
}

/// Errors raised while loading a single exported type.
#[idsrv_derive::idsrv_error]
pub enum LoaderError {
    #[error("Exported type has an empty identity{}", format_context(.context))]
    EmptyIdentity { context: Option<Cow<'static, str>> },

    #[error("Type '{type_name}' declares an invalid route '{route}'{}", format_context(.context))]
    InvalidRoute {
        type_name: &'static str,
        route: &'static str,
        context: Option<Cow<'static, str>>,
    },

    #[error("Handler type '{type_name}' has no activator{}", format_context(.context))]
    MissingActivator { type_name: &'static str, context: Option<Cow<'static, str>> },

    #[error("Type '{type_name}' is exported more than once{}", format_context(.context))]
    DuplicateType { type_name: &'static str, context: Option<Cow<'static, str>> },
}

impl LoaderError {
    /// Identity of the type that failed to load, when known.
    #[must_use]
    pub const fn type_name(&self) -> Option<&'static str> {
        match self {
            Self::EmptyIdentity { .. } => None,
            Self::InvalidRoute { type_name, .. }
            | Self::MissingActivator { type_name, .. }
            | Self::DuplicateType { type_name, .. } => Some(type_name),
        }
    }
}

/// Static record emitted by `#[exported_type]` into the hosting assembly's table.
#[derive(Clone, Copy)]
pub struct TypeRegistration {
    pub name: &'static str,
    pub kind: TypeKind,
    pub is_abstract: bool,
    pub capabilities: Capabilities,
    pub route: Option<&'static str>,
    pub activator: Option<Activator>,
}

impl TypeRegistration {
    /// Loads the record into a descriptor, validating its metadata.
    ///
    /// # Errors
    /// Returns a [`LoaderError`] when the identity is blank, the route prefix is
    /// malformed, or a concrete handler class lacks an activator.
    pub fn load(&self) -> Result<TypeDescriptor, LoaderError> {
        if self.name.trim().is_empty() {
            return Err(LoaderError::EmptyIdentity { context: None });
        }

        if let Some(route) = self.route
            && !is_valid_route(route)
        {
            return Err(LoaderError::InvalidRoute {
                type_name: self.name,
                route,
                context: Some("route prefixes must start with '/', have a segment and no whitespace".into()),
            });
        }

        let descriptor = TypeDescriptor {
            name: self.name,
            kind: self.kind,
            is_abstract: self.is_abstract,
            capabilities: self.capabilities,
            route: self.route,
            activator: self.activator,
        };

        if descriptor.is_concrete_handler() && descriptor.activator.is_none() {
            return Err(LoaderError::MissingActivator { type_name: self.name, context: None });
        }

        Ok(descriptor)
    }
}

impl fmt::Debug for TypeRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistration")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("is_abstract", &self.is_abstract)
            .field("capabilities", &self.capabilities)
            .field("route", &self.route)
            .field("activator", &self.activator.is_some())
            .finish()
    }
}

/// A route prefix must be mountable with `Router::nest`: rooted, not the root
/// itself, no empty segments and no wildcard captures.
fn is_valid_route(route: &str) -> bool {
    let Some(rest) = route.strip_prefix('/') else {
        return false;
    };
    !rest.is_empty()
        && !route.chars().any(char::is_whitespace)
        && rest.split('/').all(is_valid_segment)
}

/// A segment is either a literal or a single `{name}` capture.
fn is_valid_segment(segment: &str) -> bool {
    if segment.is_empty() || segment.contains('*') {
        return false;
    }
    match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
        Some(name) => {
            !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        },
        None => !segment.contains(['{', '}']),
    }
}

/// A loaded exported type.
#[derive(Clone)]
pub struct TypeDescriptor {
    /// Fully-qualified identity (`crate::module::Type`).
    pub name: &'static str,
    pub kind: TypeKind,
    pub is_abstract: bool,
    pub capabilities: Capabilities,
    /// Mount point of the handler's routes; `None` merges them at the root.
    pub route: Option<&'static str>,
    pub activator: Option<Activator>,
}

impl TypeDescriptor {
    #[must_use]
    pub const fn new(name: &'static str, kind: TypeKind) -> Self {
        Self {
            name,
            kind,
            is_abstract: false,
            capabilities: Capabilities::empty(),
            route: None,
            activator: None,
        }
    }

    #[must_use]
    pub const fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    #[must_use]
    pub const fn abstract_type(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    #[must_use]
    pub const fn with_route(mut self, route: &'static str) -> Self {
        self.route = Some(route);
        self
    }

    #[must_use]
    pub const fn with_activator(mut self, activator: Activator) -> Self {
        self.activator = Some(activator);
        self
    }

    /// Concrete class that declares the request-handler capability.
    #[must_use]
    pub const fn is_concrete_handler(&self) -> bool {
        self.kind.is_class()
            && !self.is_abstract
            && self.capabilities.contains(Capabilities::REQUEST_HANDLER)
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.kind == other.kind
            && self.is_abstract == other.is_abstract
            && self.capabilities == other.capabilities
            && self.route == other.route
    }
}

impl Eq for TypeDescriptor {}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("is_abstract", &self.is_abstract)
            .field("capabilities", &self.capabilities)
            .field("route", &self.route)
            .finish_non_exhaustive()
    }
}
