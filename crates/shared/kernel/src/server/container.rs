use crate::domain::config::ApiConfig;
use crate::domain::registry::{RegisteredService, Service};
use fxhash::FxHashMap;
use std::any::TypeId;
use std::borrow::Cow;
use std::ops::Deref;
use std::sync::Arc;
use tracing::debug;

#[idsrv_derive::idsrv_error]
pub enum ResolutionError {
    #[error("Service is not registered{}: {message}", format_context(.context))]
    MissingService { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

/// Typed composition root: every service the handlers depend on, keyed by type.
#[derive(Debug, Default)]
pub struct ServiceContainer {
    services: FxHashMap<TypeId, RegisteredService>,
}

impl ServiceContainer {
    #[must_use]
    pub fn builder() -> ServiceContainerBuilder {
        ServiceContainerBuilder::default()
    }

    #[must_use]
    pub fn get<T: Service>(&self) -> Option<&T> {
        self.services.get(&TypeId::of::<T>()).and_then(RegisteredService::downcast_ref::<T>)
    }

    #[must_use]
    pub fn contains<T: Service>(&self) -> bool {
        self.services.contains_key(&TypeId::of::<T>())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// Registered service names (for diagnostics).
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.services.values().map(|service| service.name)
    }
}

#[derive(Debug, Default)]
pub struct ServiceContainerBuilder {
    services: FxHashMap<TypeId, RegisteredService>,
}

impl ServiceContainerBuilder {
    /// Registers a service; a later registration of the same type replaces the earlier one.
    #[must_use]
    pub fn register(mut self, service: RegisteredService) -> Self {
        if let Some(previous) = self.services.insert(service.id, service) {
            debug!(service = previous.name, "Replaced service registration");
        }
        self
    }

    /// Registers multiple services at once.
    #[must_use]
    pub fn register_all<I>(self, services: I) -> Self
    where
        I: IntoIterator<Item = RegisteredService>,
    {
        services.into_iter().fold(self, Self::register)
    }

    #[must_use]
    pub fn build(self) -> ServiceContainer {
        ServiceContainer { services: self.services }
    }
}

#[derive(Debug)]
pub struct DependencyResolverInner {
    pub config: ApiConfig,
    container: ServiceContainer,
}

/// Bridges handler construction to the service container.
#[derive(Debug, Clone)]
pub struct DependencyResolver {
    inner: Arc<DependencyResolverInner>,
}

impl DependencyResolver {
    #[must_use]
    pub fn new(config: ApiConfig, container: ServiceContainer) -> Self {
        Self { inner: Arc::new(DependencyResolverInner { config, container }) }
    }

    /// Returns a handle to the service if it is registered.
    #[must_use]
    pub fn resolve<T: Service + Clone>(&self) -> Option<T> {
        self.inner.container.get::<T>().cloned()
    }

    /// Returns a handle to the service.
    ///
    /// # Errors
    /// Returns an error if the service is not registered.
    pub fn try_resolve<T: Service + Clone>(&self) -> Result<T, ResolutionError> {
        self.resolve::<T>().ok_or_else(|| ResolutionError::MissingService {
            message: std::any::type_name::<T>().into(),
            context: None,
        })
    }

    #[must_use]
    pub fn container(&self) -> &ServiceContainer {
        &self.inner.container
    }
}

impl Deref for DependencyResolver {
    type Target = DependencyResolverInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl Default for DependencyResolver {
    fn default() -> Self {
        Self::new(ApiConfig::default(), ServiceContainer::default())
    }
}
