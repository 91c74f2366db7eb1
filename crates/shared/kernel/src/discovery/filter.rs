use super::registration::TypeDescriptor;
use fxhash::FxHashSet;
use std::sync::Arc;

/// Immutable, cheaply cloneable set of request-handler types.
///
/// Unique by identity; iteration follows the order the types were enumerated in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerTypeSet {
    types: Arc<[TypeDescriptor]>,
}

impl HandlerTypeSet {
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TypeDescriptor> {
        self.types.iter()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.types.iter().any(|ty| ty.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.types.iter().map(|ty| ty.name)
    }
}

impl Default for HandlerTypeSet {
    fn default() -> Self {
        Self { types: Arc::from(Vec::new()) }
    }
}

impl FromIterator<TypeDescriptor> for HandlerTypeSet {
    fn from_iter<I: IntoIterator<Item = TypeDescriptor>>(iter: I) -> Self {
        let mut seen = FxHashSet::default();
        let types: Vec<_> = iter.into_iter().filter(|ty| seen.insert(ty.name)).collect();
        Self { types: types.into() }
    }
}

impl<'a> IntoIterator for &'a HandlerTypeSet {
    type Item = &'a TypeDescriptor;
    type IntoIter = std::slice::Iter<'a, TypeDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Keeps concrete classes that declare the request-handler capability.
#[must_use]
pub fn is_handler_type(ty: &TypeDescriptor) -> bool {
    ty.is_concrete_handler()
}

/// Narrows enumerated types to the request handlers among them.
pub fn filter_handler_types<'a, I>(types: I) -> HandlerTypeSet
where
    I: IntoIterator<Item = &'a TypeDescriptor>,
{
    types.into_iter().filter(|ty| is_handler_type(ty)).cloned().collect()
}
