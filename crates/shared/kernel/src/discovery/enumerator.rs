use super::DiscoveryError;
use super::assembly::{Assembly, AssemblyError};
use super::registration::{LoaderError, TypeDescriptor};
use crate::domain::constants::DISCOVERY_TARGET;
use tracing::{debug, warn};

/// Types that failed to load, with every cause kept for inspection.
#[derive(Debug)]
pub struct LoadFailure {
    /// Aggregate description reported by the assembly.
    pub summary: String,
    pub causes: Vec<LoaderError>,
}

/// Result of enumerating one assembly.
#[derive(Debug)]
pub struct AssemblyTypeSet {
    pub assembly: String,
    /// Loaded types in table order; never contains placeholders.
    pub types: Vec<TypeDescriptor>,
    /// Present when part of the table could not be loaded.
    pub failure: Option<LoadFailure>,
}

impl AssemblyTypeSet {
    #[must_use]
    pub fn is_partial(&self) -> bool {
        self.failure.is_some()
    }
}

/// Lists every type of `assembly`, recovering the loadable subset on partial failure.
///
/// Each failure cause is logged under the `idsrv::discovery` target: the aggregate
/// once, then one entry per loader error.
///
/// # Errors
/// Returns [`DiscoveryError::AssemblyAccess`] when the assembly cannot be read at all.
pub fn enumerate_types(assembly: &dyn Assembly) -> Result<AssemblyTypeSet, DiscoveryError> {
    let name = assembly.name().to_owned();

    match assembly.get_types() {
        Ok(types) => {
            debug!(target: DISCOVERY_TARGET, assembly = %name, count = types.len(), "Enumerated assembly types");
            Ok(AssemblyTypeSet { assembly: name, types, failure: None })
        },
        Err(err) => {
            let summary = err.to_string();
            match err {
                AssemblyError::TypeLoad { types, loader_errors, .. } => {
                    Ok(recover_partial(name, summary, types, loader_errors))
                },
                access @ AssemblyError::Access { .. } => Err(DiscoveryError::AssemblyAccess {
                    source: access,
                    context: Some(format!("enumerating types of '{name}'").into()),
                }),
            }
        },
    }
}

fn recover_partial(
    assembly: String,
    summary: String,
    types: Vec<Option<TypeDescriptor>>,
    causes: Vec<LoaderError>,
) -> AssemblyTypeSet {
    warn!(
        target: DISCOVERY_TARGET,
        assembly = %assembly,
        failed = causes.len(),
        "Assembly type enumeration exception details: {summary}"
    );
    for cause in &causes {
        warn!(
            target: DISCOVERY_TARGET,
            assembly = %assembly,
            type_name = cause.type_name().unwrap_or("<unknown>"),
            kind = cause.kind(),
            "Loader exception details: {cause}"
        );
    }

    let types: Vec<_> = types.into_iter().flatten().collect();
    debug!(target: DISCOVERY_TARGET, assembly = %assembly, count = types.len(), "Recovered loadable types");

    AssemblyTypeSet { assembly, types, failure: Some(LoadFailure { summary, causes }) }
}
