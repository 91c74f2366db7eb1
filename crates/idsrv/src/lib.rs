//! Facade crate for the identity server.
//! Re-exports domain/kernel primitives, owns the hosting assembly and composes
//! the service container from every feature slice.
//! Keep this crate thin: it should compose other crates, not implement business logic.
//!
//! ## Adding a slice
//! - Export its handler types in a `pub const EXPORTED_TYPES` table.
//! - Append the table to [`HOST_ASSEMBLY`] and register its services in [`init`].

pub use idsrv_domain as domain;
pub use idsrv_kernel as kernel;

use idsrv_domain::config::ApiConfig;
use idsrv_kernel::discovery::StaticAssembly;
use idsrv_kernel::server::ServiceContainer;

/// Feature slices compiled into the host.
pub mod features {
    pub use idsrv_identity as identity;
}

/// The single assembly handler discovery runs against.
pub static HOST_ASSEMBLY: StaticAssembly = StaticAssembly::new(
    "idsrv",
    &[idsrv_kernel::server::EXPORTED_TYPES, features::identity::EXPORTED_TYPES],
);

/// Composes the service container from every feature slice.
///
/// # Errors
/// Returns an error if any feature initialization fails.
pub fn init(config: &ApiConfig) -> Result<ServiceContainer, Box<dyn std::error::Error + Send + Sync>> {
    let container = ServiceContainer::builder()
        // Identity
        .register(features::identity::init(&config.identity)?)
        .build();

    tracing::info!(services = container.len(), "Services composed");
    Ok(container)
}
