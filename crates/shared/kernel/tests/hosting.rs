use axum::Router;
use axum::body::{Body, to_bytes};
use axum::extract::{ConnectInfo, Request};
use axum::http::{StatusCode, header};
use axum::routing::get;
use idsrv_derive::{exported_type, idsrv_service};
use idsrv_kernel::discovery::{StaticAssembly, TypeRegistration};
use idsrv_kernel::domain::config::ApiConfig;
use idsrv_kernel::hosting::{
    ApiError, HostAuthentication, HostPrincipal, HostingError, IncludeErrorDetailPolicy,
    MediaTypeFormatter, MessageHandler, configure,
};
use idsrv_kernel::server::{
    Activate, ActivationError, DependencyResolver, HttpHandler, ServiceContainer,
};
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use tower::ServiceExt;
use tracing_test::traced_test;

#[idsrv_service]
pub struct Greeter {
    pub greeting: String,
}

#[exported_type(handler, route = "/v1")]
#[derive(Debug)]
pub struct GreetingEndpoint {
    greeter: Greeter,
}

impl Activate for GreetingEndpoint {
    fn activate(resolver: &DependencyResolver) -> Result<Self, ActivationError> {
        Ok(Self { greeter: resolver.try_resolve::<Greeter>()? })
    }
}

impl HttpHandler for GreetingEndpoint {
    fn routes(self: Arc<Self>) -> Router {
        let greeting = self.greeter.greeting.clone();
        Router::new().route("/ping", get(move || async move { greeting }))
    }
}

#[exported_type(handler)]
#[derive(Debug)]
pub struct FaultyEndpoint;

impl Activate for FaultyEndpoint {
    fn activate(_resolver: &DependencyResolver) -> Result<Self, ActivationError> {
        Ok(Self)
    }
}

impl HttpHandler for FaultyEndpoint {
    fn routes(self: Arc<Self>) -> Router {
        Router::new()
            .route("/fail", get(fail))
            .route("/panic", get(explode))
            .route("/missing", get(|| async { ApiError::NotFound("no such client".to_owned()) }))
            .route("/principal", get(principal))
    }
}

async fn fail() -> Result<&'static str, ApiError> {
    Err(ApiError::Internal {
        message: "database unavailable".to_owned(),
        detail: Some("connection pool exhausted".to_owned()),
    })
}

#[allow(clippy::unused_async)]
async fn explode() -> &'static str {
    panic!("boom")
}

async fn principal(request: Request) -> String {
    request
        .extensions()
        .get::<HostPrincipal>()
        .map_or_else(|| "anonymous".to_owned(), |p| p.name.clone())
}

#[exported_type(handler, route = "/{*rest}")]
#[derive(Debug)]
pub struct CatchAllEndpoint;

impl Activate for CatchAllEndpoint {
    fn activate(_resolver: &DependencyResolver) -> Result<Self, ActivationError> {
        Ok(Self)
    }
}

impl HttpHandler for CatchAllEndpoint {
    fn routes(self: Arc<Self>) -> Router {
        Router::new().route("/", get(|| async { "caught" }))
    }
}

const TYPES: &[TypeRegistration] =
    &[GreetingEndpoint::EXPORTED_TYPE, FaultyEndpoint::EXPORTED_TYPE];
static ASSEMBLY: StaticAssembly = StaticAssembly::new("hosting-tests", &[TYPES]);
const CATCH_ALL: &[TypeRegistration] = &[CatchAllEndpoint::EXPORTED_TYPE];
static WITH_CATCH_ALL: StaticAssembly = StaticAssembly::new("catch-all", &[TYPES, CATCH_ALL]);

fn container() -> ServiceContainer {
    ServiceContainer::builder()
        .register(Greeter::new(GreeterInner { greeting: "pong".to_owned() }).into_registered())
        .build()
}

fn router_with(config: &ApiConfig) -> Router {
    configure(config, container(), Arc::new(ASSEMBLY)).build_router().expect("router builds")
}

fn get_request(uri: &str, peer: Option<[u8; 4]>) -> Request {
    let mut request = axum::http::Request::get(uri).body(Body::empty()).expect("request");
    if let Some(ip) = peer {
        request.extensions_mut().insert(ConnectInfo(SocketAddr::from((Ipv4Addr::from(ip), 40_000))));
    }
    request
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    serde_json::from_slice(&bytes).expect("json body")
}

#[test]
fn configure_applies_every_step() {
    let mut config = ApiConfig::default();
    config.logging.enable_web_api_diagnostics = true;
    config.logging.web_api_diagnostics_is_verbose = true;
    config.logging.enable_http_logging = true;

    let host = configure(&config, container(), Arc::new(ASSEMBLY));

    assert!(host.attribute_routes);
    assert_eq!(host.host_authentication, HostAuthentication::Suppressed);
    assert!(host.dependency_resolver.is_some());
    assert_eq!(host.exception_loggers.len(), 2);
    assert!(!host.formatters.contains(MediaTypeFormatter::Xml));
    assert!(host.formatters.contains(MediaTypeFormatter::Json));
    assert_eq!(host.error_detail_policy, IncludeErrorDetailPolicy::LocalOnly);
    assert!(host.diagnostics.is_some_and(|d| d.verbose));
    assert!(matches!(host.message_handlers.as_slice(), [MessageHandler::RequestResponseLogger(_)]));
    assert_eq!(
        host.controller_type_resolver.controller_types().expect("types").len(),
        TYPES.len()
    );
}

#[test]
fn absent_logging_options_leave_the_pipeline_bare() {
    let host = configure(&ApiConfig::default(), container(), Arc::new(ASSEMBLY));

    assert!(host.diagnostics.is_none());
    assert!(host.message_handlers.is_empty());
}

#[tokio::test]
async fn handlers_are_mounted_under_their_route_prefix() {
    let response = router_with(&ApiConfig::default())
        .oneshot(get_request("/v1/ping", None))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    assert_eq!(&body[..], b"pong");
}

#[tokio::test]
async fn remote_callers_get_a_generic_server_error() {
    let response = router_with(&ApiConfig::default())
        .oneshot(get_request("/fail", Some([198, 51, 100, 4])))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");

    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "INTERNAL_ERROR");
    assert_eq!(body["error"]["message"], "An error has occurred.");
    assert!(body["error"].get("detail").is_none());
}

#[tokio::test]
async fn local_callers_see_error_detail() {
    let response = router_with(&ApiConfig::default())
        .oneshot(get_request("/fail", Some([127, 0, 0, 1])))
        .await
        .expect("response");

    let body = json_body(response).await;
    assert_eq!(body["error"]["message"], "database unavailable");
    assert_eq!(body["error"]["detail"], "connection pool exhausted");
}

#[tokio::test]
async fn unknown_origin_is_treated_as_remote() {
    let response = router_with(&ApiConfig::default())
        .oneshot(get_request("/fail", None))
        .await
        .expect("response");

    let body = json_body(response).await;
    assert!(body["error"].get("detail").is_none());
}

#[tokio::test]
async fn handler_panics_become_server_errors() {
    let response = router_with(&ApiConfig::default())
        .oneshot(get_request("/panic", Some([127, 0, 0, 1])))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert_eq!(body["error"]["detail"], "boom");
}

#[tokio::test]
#[traced_test]
async fn server_errors_reach_the_exception_loggers() {
    router_with(&ApiConfig::default())
        .oneshot(get_request("/fail", None))
        .await
        .expect("response");

    assert!(logs_contain("idsrv::exceptions"));
    assert!(logs_contain("connection pool exhausted"));
}

#[tokio::test]
async fn client_errors_keep_their_message() {
    let response = router_with(&ApiConfig::default())
        .oneshot(get_request("/missing", None))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = json_body(response).await;
    assert_eq!(body["error"]["message"], "no such client");
}

#[tokio::test]
async fn unmatched_paths_get_a_json_not_found() {
    let response = router_with(&ApiConfig::default())
        .oneshot(get_request("/nowhere", None))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn xml_is_not_negotiated_after_configuration() {
    let mut request = get_request("/missing", None);
    request.headers_mut().insert(header::ACCEPT, "application/xml".parse().expect("header"));

    let response = router_with(&ApiConfig::default()).oneshot(request).await.expect("response");

    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
}

#[tokio::test]
async fn host_principals_are_suppressed() {
    let principal = HostPrincipal { name: "alice".to_owned(), authentication_type: "tls".to_owned() };

    let mut request = get_request("/principal", None);
    request.extensions_mut().insert(principal.clone());
    let response = router_with(&ApiConfig::default()).oneshot(request).await.expect("response");
    let body = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    assert_eq!(&body[..], b"anonymous");

    let mut host = configure(&ApiConfig::default(), container(), Arc::new(ASSEMBLY));
    host.host_authentication = HostAuthentication::Default;
    let mut request = get_request("/principal", None);
    request.extensions_mut().insert(principal);
    let response = host.build_router().expect("router").oneshot(request).await.expect("response");
    let body = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    assert_eq!(&body[..], b"alice");
}

#[tokio::test]
#[traced_test]
async fn http_logging_observes_without_altering() {
    let mut config = ApiConfig::default();
    config.logging.enable_http_logging = true;

    let mut request = get_request("/v1/ping", None);
    request.headers_mut().insert(header::AUTHORIZATION, "Bearer top-secret".parse().expect("header"));
    let response = router_with(&config).oneshot(request).await.expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    assert_eq!(&body[..], b"pong");

    assert!(logs_contain("idsrv::http"));
    assert!(logs_contain("[redacted]"));
    assert!(!logs_contain("top-secret"));
}

fn diagnostics_request() -> Request {
    let mut request = get_request("/v1/ping", None);
    request.headers_mut().insert("x-correlation-id", "corr-7f3a".parse().expect("header"));
    request
}

fn line_with<'a>(lines: &[&'a str], needles: &[&str]) -> Option<&'a str> {
    lines.iter().copied().find(|line| needles.iter().all(|needle| line.contains(needle)))
}

#[tokio::test]
#[traced_test]
async fn verbose_diagnostics_log_headers_at_debug() {
    let mut config = ApiConfig::default();
    config.logging.enable_web_api_diagnostics = true;
    config.logging.web_api_diagnostics_is_verbose = true;

    let response = router_with(&config).oneshot(diagnostics_request()).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    logs_assert(|lines: &[&str]| {
        line_with(lines, &["DEBUG", "idsrv::diagnostics", "Request started", "corr-7f3a"])
            .ok_or_else(|| "no DEBUG request line with headers".to_owned())?;
        line_with(lines, &["DEBUG", "idsrv::diagnostics", "Request finished", "status=200"])
            .ok_or_else(|| "no DEBUG response line".to_owned())?;
        Ok(())
    });
}

#[tokio::test]
#[traced_test]
async fn plain_diagnostics_log_info_summaries() {
    let mut config = ApiConfig::default();
    config.logging.enable_web_api_diagnostics = true;

    let response = router_with(&config).oneshot(diagnostics_request()).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    logs_assert(|lines: &[&str]| {
        line_with(lines, &["INFO", "idsrv::diagnostics", "Request started"])
            .ok_or_else(|| "no INFO request line".to_owned())?;
        line_with(lines, &["INFO", "idsrv::diagnostics", "Request finished", "status=200"])
            .ok_or_else(|| "no INFO response line".to_owned())?;
        Ok(())
    });
    assert!(!logs_contain("corr-7f3a"));
}

#[tokio::test]
#[traced_test]
async fn diagnostics_stay_silent_when_disabled() {
    let response =
        router_with(&ApiConfig::default()).oneshot(diagnostics_request()).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    assert!(!logs_contain("idsrv::diagnostics"));
}

#[tokio::test]
#[traced_test]
async fn wildcard_prefixes_are_dropped_at_discovery() {
    let router = configure(&ApiConfig::default(), container(), Arc::new(WITH_CATCH_ALL))
        .build_router()
        .expect("malformed prefix does not abort startup");

    let response = router.oneshot(get_request("/v1/ping", None)).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    assert!(logs_contain("Loader exception details"));
    assert!(logs_contain("{*rest}"));
}

#[tokio::test]
async fn disabled_attribute_routing_mounts_nothing() {
    let mut host = configure(&ApiConfig::default(), container(), Arc::new(ASSEMBLY));
    host.attribute_routes = false;

    let response = host
        .build_router()
        .expect("router")
        .oneshot(get_request("/v1/ping", None))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[test]
fn missing_services_fail_activation() {
    let host = configure(&ApiConfig::default(), ServiceContainer::default(), Arc::new(ASSEMBLY));

    let err = host.build_router().expect_err("activation fails");
    assert!(matches!(err, HostingError::Activation { .. }));
    assert!(err.to_string().contains("GreetingEndpoint"));
}
