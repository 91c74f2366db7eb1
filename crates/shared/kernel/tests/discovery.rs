use axum::Router;
use axum::routing::get;
use idsrv_derive::exported_type;
use idsrv_kernel::discovery::{
    Assembly, AssemblyControllerTypeResolver, DiscoveryError, HttpControllerTypeResolver,
    LoaderError, StaticAssembly, TypeRegistration, enumerate_types,
};
use idsrv_kernel::server::{Activate, ActivationError, DependencyResolver, HttpHandler};
use std::sync::Arc;
use tracing_test::traced_test;

#[exported_type(handler)]
#[derive(Debug)]
pub struct HandlerA;

impl Activate for HandlerA {
    fn activate(_resolver: &DependencyResolver) -> Result<Self, ActivationError> {
        Ok(Self)
    }
}

impl HttpHandler for HandlerA {
    fn routes(self: Arc<Self>) -> Router {
        Router::new().route("/a", get(|| async { "a" }))
    }
}

#[exported_type(handler, is_abstract)]
#[derive(Debug)]
pub struct AbstractHandlerB;

#[exported_type]
#[derive(Debug)]
pub struct HelperC;

#[exported_type(kind = interface, capabilities(handler))]
#[derive(Debug)]
pub struct HandlerContract;

#[exported_type(route = "broken route")]
#[derive(Debug)]
pub struct BrokenD;

const MIXED: &[TypeRegistration] =
    &[HandlerA::EXPORTED_TYPE, AbstractHandlerB::EXPORTED_TYPE, HelperC::EXPORTED_TYPE];
const WITH_BROKEN: &[TypeRegistration] = &[
    HandlerA::EXPORTED_TYPE,
    BrokenD::EXPORTED_TYPE,
    HelperC::EXPORTED_TYPE,
    HandlerContract::EXPORTED_TYPE,
];

static CLEAN: StaticAssembly = StaticAssembly::new("clean", &[MIXED]);
static PARTIAL: StaticAssembly = StaticAssembly::new("partial", &[WITH_BROKEN]);
static DUPLICATED: StaticAssembly = StaticAssembly::new("duplicated", &[MIXED, MIXED]);
static INACCESSIBLE: StaticAssembly = StaticAssembly::new("  ", &[MIXED]);

fn resolver(assembly: &'static StaticAssembly) -> AssemblyControllerTypeResolver {
    AssemblyControllerTypeResolver::new(Arc::new(*assembly))
}

#[test]
fn exported_identity_is_module_qualified() {
    assert_eq!(HandlerA::EXPORTED_TYPE.name, concat!(module_path!(), "::HandlerA"));
    assert!(HandlerA::EXPORTED_TYPE.activator.is_some());
    assert!(AbstractHandlerB::EXPORTED_TYPE.activator.is_none());
}

#[test]
fn only_concrete_handler_classes_are_resolved() {
    let handlers = resolver(&CLEAN).controller_types().expect("clean assembly resolves");

    assert_eq!(handlers.len(), 1);
    assert!(handlers.contains(HandlerA::EXPORTED_TYPE.name));
    assert!(!handlers.contains(AbstractHandlerB::EXPORTED_TYPE.name));
    assert!(!handlers.contains(HelperC::EXPORTED_TYPE.name));
}

#[test]
#[traced_test]
fn partial_load_keeps_loadable_types_and_logs_each_cause_once() {
    let enumerated = enumerate_types(&PARTIAL).expect("partial load is absorbed");
    let handlers = resolver(&PARTIAL).controller_types().expect("partial load resolves");

    let names: Vec<_> = enumerated.types.iter().map(|t| t.name).collect();
    assert_eq!(
        names,
        vec![
            HandlerA::EXPORTED_TYPE.name,
            HelperC::EXPORTED_TYPE.name,
            HandlerContract::EXPORTED_TYPE.name
        ]
    );

    let failure = enumerated.failure.expect("failure is recorded");
    assert_eq!(failure.causes.len(), 1);
    assert!(matches!(failure.causes[0], LoaderError::InvalidRoute { route: "broken route", .. }));

    assert_eq!(handlers.names().collect::<Vec<_>>(), vec![HandlerA::EXPORTED_TYPE.name]);

    // Two enumerations above: one direct, one through the resolver.
    logs_assert(|lines: &[&str]| {
        let count = |needle: &str| lines.iter().filter(|line| line.contains(needle)).count();
        match (
            count("Assembly type enumeration exception details"),
            count("Loader exception details"),
        ) {
            (2, 2) => Ok(()),
            other => Err(format!("unexpected (aggregate, cause) log counts: {other:?}")),
        }
    });
    assert!(logs_contain("WARN"));
    assert!(logs_contain("idsrv::discovery"));
}

#[test]
fn duplicate_exports_are_reported_and_deduplicated() {
    let enumerated = enumerate_types(&DUPLICATED).expect("duplicates are absorbed");
    let failure = enumerated.failure.as_ref().expect("duplicates are failures");

    assert_eq!(failure.causes.len(), MIXED.len());
    assert!(failure.causes.iter().all(|c| matches!(c, LoaderError::DuplicateType { .. })));
    assert_eq!(enumerated.types.len(), MIXED.len());
}

#[test]
fn resolver_caches_the_first_result() {
    let resolver = resolver(&CLEAN);
    assert!(!resolver.is_cached());

    let first = resolver.controller_types().expect("first call");
    assert!(resolver.is_cached());
    let second = resolver.controller_types().expect("second call");

    assert_eq!(first.names().collect::<Vec<_>>(), second.names().collect::<Vec<_>>());
}

#[test]
fn concurrent_first_calls_agree() {
    let resolver = resolver(&PARTIAL);

    let results: Vec<Vec<&'static str>> = std::thread::scope(|scope| {
        let workers: Vec<_> = (0..8)
            .map(|_| {
                scope.spawn(|| {
                    resolver.controller_types().expect("resolves").names().collect::<Vec<_>>()
                })
            })
            .collect();
        workers.into_iter().map(|w| w.join().expect("worker joins")).collect()
    });

    assert!(results.windows(2).all(|pair| pair[0] == pair[1]));
    assert_eq!(results[0], vec![HandlerA::EXPORTED_TYPE.name]);
}

#[test]
fn inaccessible_assembly_fails_and_is_not_cached() {
    assert!(INACCESSIBLE.get_types().is_err());

    let resolver = resolver(&INACCESSIBLE);
    let err = resolver.controller_types().expect_err("access failure surfaces");

    assert!(matches!(err, DiscoveryError::AssemblyAccess { .. }));
    assert!(!resolver.is_cached());
}
