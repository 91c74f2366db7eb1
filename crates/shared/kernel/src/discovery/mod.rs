//! Handler discovery over compile-time type tables.
//!
//! [`StaticAssembly`] lists the types exported with `#[exported_type]`,
//! [`enumerate_types`] tolerates entries that fail to load,
//! [`filter_handler_types`] keeps the concrete request handlers and
//! [`AssemblyControllerTypeResolver`] caches the outcome for the host.

mod assembly;
mod enumerator;
mod filter;
mod registration;
mod resolver;

pub use assembly::{Assembly, AssemblyError, StaticAssembly};
pub use enumerator::{AssemblyTypeSet, LoadFailure, enumerate_types};
pub use filter::{HandlerTypeSet, filter_handler_types, is_handler_type};
pub use registration::{
    Activator, LoaderError, TypeDescriptor, TypeRegistration, activate_handler,
};
pub use resolver::{
    AssemblyControllerTypeResolver, EmptyControllerTypeResolver, HttpControllerTypeResolver,
};

use std::borrow::Cow;

/// Errors surfaced by handler discovery. Partial load failures are absorbed
/// and never appear here.
#[idsrv_derive::idsrv_error]
pub enum DiscoveryError {
    #[error("Assembly access error{}: {source}", format_context(.context))]
    AssemblyAccess { source: AssemblyError, context: Option<Cow<'static, str>> },
}
