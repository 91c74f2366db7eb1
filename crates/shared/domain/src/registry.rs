//! Service registry for modular features.
//! This provides a minimal type-erased container entry for pre-initialized feature state.

use std::any::{Any, TypeId};
use std::fmt::Debug;

/// Marker trait for service state that can be shared across threads.
pub trait Service: Any + Debug + Send + Sync {
    /// Helper to allow downcasting from the trait object.
    fn as_any(&self) -> &dyn Any;
}

/// A container entry for an initialized service.
#[derive(Debug)]
pub struct RegisteredService {
    pub id: TypeId,
    pub name: &'static str,
    pub state: Box<dyn Service>,
}

impl RegisteredService {
    /// Create a new registration from a concrete state.
    pub fn new<T: Service>(state: T) -> Self {
        Self { id: TypeId::of::<T>(), name: std::any::type_name::<T>(), state: Box::new(state) }
    }

    #[must_use]
    pub fn downcast_ref<T: Service>(&self) -> Option<&T> {
        self.state.as_any().downcast_ref::<T>()
    }
}
