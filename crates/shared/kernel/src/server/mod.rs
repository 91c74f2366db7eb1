mod container;
mod handler;
mod health;

pub use container::{
    DependencyResolver, DependencyResolverInner, ResolutionError, ServiceContainer,
    ServiceContainerBuilder,
};
pub use handler::{Activate, ActivationError, HttpHandler};
pub use health::HealthEndpoint;

use crate::discovery::TypeRegistration;

/// Types exported by the kernel into the hosting assembly.
pub const EXPORTED_TYPES: &[TypeRegistration] = &[HealthEndpoint::EXPORTED_TYPE];
