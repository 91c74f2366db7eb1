use super::registration::{LoaderError, TypeDescriptor, TypeRegistration};
use fxhash::FxHashSet;
use std::borrow::Cow;
use std::fmt::Debug;

/// Errors reported by an [`Assembly`] while listing its types.
#[idsrv_derive::idsrv_error]
pub enum AssemblyError {
    /// Some types could not be loaded. `types` keeps one slot per exported type,
    /// `None` where loading failed.
    #[error(
        "Unable to load one or more of the requested types from '{assembly}'{}: {} loader exception(s)",
        format_context(.context),
        .loader_errors.len()
    )]
    TypeLoad {
        assembly: String,
        types: Vec<Option<TypeDescriptor>>,
        loader_errors: Vec<LoaderError>,
        context: Option<Cow<'static, str>>,
    },

    /// The assembly itself cannot be reached.
    #[error("Assembly '{assembly}' is not accessible{}: {message}", format_context(.context))]
    Access { assembly: String, message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

/// A unit of compiled code whose exported types can be listed.
pub trait Assembly: Debug + Send + Sync {
    fn name(&self) -> &str;

    /// Lists every exported type.
    ///
    /// # Errors
    /// [`AssemblyError::TypeLoad`] when only part of the table loads,
    /// [`AssemblyError::Access`] when nothing can be read.
    fn get_types(&self) -> Result<Vec<TypeDescriptor>, AssemblyError>;
}

/// Assembly backed by compile-time registration tables, one per contributing crate.
#[derive(Debug, Clone, Copy)]
pub struct StaticAssembly {
    name: &'static str,
    modules: &'static [&'static [TypeRegistration]],
}

impl StaticAssembly {
    #[must_use]
    pub const fn new(name: &'static str, modules: &'static [&'static [TypeRegistration]]) -> Self {
        Self { name, modules }
    }

    /// Number of exported type records, loadable or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.modules.iter().map(|module| module.len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modules.iter().all(|module| module.is_empty())
    }

    fn registrations(&self) -> impl Iterator<Item = &'static TypeRegistration> {
        self.modules.iter().flat_map(|module| module.iter())
    }
}

impl Assembly for StaticAssembly {
    fn name(&self) -> &str {
        self.name
    }

    fn get_types(&self) -> Result<Vec<TypeDescriptor>, AssemblyError> {
        if self.name.trim().is_empty() {
            return Err(AssemblyError::Access {
                assembly: self.name.to_owned(),
                message: "assembly reference has no name".into(),
                context: None,
            });
        }

        let mut seen = FxHashSet::default();
        let mut types = Vec::with_capacity(self.len());
        let mut loader_errors = Vec::new();

        for registration in self.registrations() {
            let loaded = registration.load().and_then(|descriptor| {
                if seen.insert(descriptor.name) {
                    Ok(descriptor)
                } else {
                    Err(LoaderError::DuplicateType { type_name: descriptor.name, context: None })
                }
            });

            match loaded {
                Ok(descriptor) => types.push(Some(descriptor)),
                Err(err) => {
                    types.push(None);
                    loader_errors.push(err);
                },
            }
        }

        if loader_errors.is_empty() {
            Ok(types.into_iter().flatten().collect())
        } else {
            Err(AssemblyError::TypeLoad {
                assembly: self.name.to_owned(),
                types,
                loader_errors,
                context: None,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::capabilities::{Capabilities, TypeKind};

    const fn class(name: &'static str, route: Option<&'static str>) -> TypeRegistration {
        TypeRegistration {
            name,
            kind: TypeKind::Class,
            is_abstract: false,
            capabilities: Capabilities::SERVICE,
            route,
            activator: None,
        }
    }

    const GOOD: &[TypeRegistration] = &[class("a::One", None), class("a::Two", None)];
    const BROKEN: &[TypeRegistration] = &[class("b::Bad", Some("no-slash")), class("a::One", None)];

    #[test]
    fn loads_all_modules_in_order() {
        let assembly = StaticAssembly::new("host", &[GOOD]);
        let names: Vec<_> = assembly.get_types().unwrap().iter().map(|t| t.name).collect();
        assert_eq!(names, ["a::One", "a::Two"]);
        assert_eq!(assembly.len(), 2);
    }

    #[test]
    fn partial_failure_keeps_slots_and_causes() {
        let assembly = StaticAssembly::new("host", &[GOOD, BROKEN]);
        let Err(AssemblyError::TypeLoad { types, loader_errors, .. }) = assembly.get_types() else {
            panic!("expected a type-load failure");
        };

        assert_eq!(types.len(), 4);
        assert_eq!(types.iter().filter(|slot| slot.is_none()).count(), 2);
        assert_eq!(loader_errors.len(), 2);
        assert!(matches!(loader_errors[0], LoaderError::InvalidRoute { .. }));
        assert!(matches!(loader_errors[1], LoaderError::DuplicateType { type_name: "a::One", .. }));
    }

    #[test]
    fn unnamed_assembly_is_inaccessible() {
        let assembly = StaticAssembly::new("", &[GOOD]);
        assert!(matches!(assembly.get_types(), Err(AssemblyError::Access { .. })));
    }
}
