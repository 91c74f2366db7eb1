use super::DiscoveryError;
use super::assembly::Assembly;
use super::enumerator::enumerate_types;
use super::filter::{HandlerTypeSet, filter_handler_types};
use crate::domain::constants::DISCOVERY_TARGET;
use std::fmt::Debug;
use std::sync::{Arc, OnceLock};
use tracing::debug;

/// Answers "which handler types exist?" for the dispatch-table builder.
pub trait HttpControllerTypeResolver: Debug + Send + Sync {
    /// # Errors
    /// Fails only when the underlying assembly is inaccessible.
    fn controller_types(&self) -> Result<HandlerTypeSet, DiscoveryError>;
}

/// Resolver used until one is installed: it knows no handlers.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyControllerTypeResolver;

impl HttpControllerTypeResolver for EmptyControllerTypeResolver {
    fn controller_types(&self) -> Result<HandlerTypeSet, DiscoveryError> {
        Ok(HandlerTypeSet::default())
    }
}

/// Resolves handler types from the single hosting assembly and caches the result
/// for the lifetime of the resolver.
///
/// Racing first calls may each enumerate; the first stored set wins and every
/// caller observes an equivalent result. Access failures are not cached.
#[derive(Debug)]
pub struct AssemblyControllerTypeResolver {
    assembly: Arc<dyn Assembly>,
    cache: OnceLock<HandlerTypeSet>,
}

impl AssemblyControllerTypeResolver {
    #[must_use]
    pub fn new(assembly: Arc<dyn Assembly>) -> Self {
        Self { assembly, cache: OnceLock::new() }
    }

    #[must_use]
    pub fn is_cached(&self) -> bool {
        self.cache.get().is_some()
    }
}

impl HttpControllerTypeResolver for AssemblyControllerTypeResolver {
    fn controller_types(&self) -> Result<HandlerTypeSet, DiscoveryError> {
        if let Some(cached) = self.cache.get() {
            return Ok(cached.clone());
        }

        let enumerated = enumerate_types(self.assembly.as_ref())?;
        let handlers = filter_handler_types(&enumerated.types);

        debug!(
            target: DISCOVERY_TARGET,
            assembly = %enumerated.assembly,
            types = enumerated.types.len(),
            handlers = handlers.len(),
            partial = enumerated.is_partial(),
            "Resolved handler types"
        );

        Ok(self.cache.get_or_init(|| handlers).clone())
    }
}
