use super::ProtocolEndpoint;
use crate::events::{IdentityEvent, IdentityEvents};
use crate::Identity;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use idsrv_kernel::server::{Activate, ActivationError, DependencyResolver, HttpHandler};
use serde::Serialize;
use std::sync::Arc;

/// OpenID Provider metadata document.
#[derive(Debug, Serialize)]
struct ProviderMetadata<'a> {
    issuer: &'a str,
    jwks_uri: String,
    scopes_supported: &'a [String],
    response_types_supported: [&'static str; 1],
    subject_types_supported: [&'static str; 1],
    id_token_signing_alg_values_supported: Vec<&'static str>,
    service_name: &'a str,
}

/// Serves `GET /.well-known/openid-configuration`.
#[idsrv_derive::exported_type(handler)]
#[derive(Debug)]
pub struct DiscoveryEndpoint {
    identity: Identity,
    events: IdentityEvents,
}

impl Activate for DiscoveryEndpoint {
    fn activate(resolver: &DependencyResolver) -> Result<Self, ActivationError> {
        Ok(Self { identity: resolver.try_resolve::<Identity>()?, events: IdentityEvents })
    }
}

impl HttpHandler for DiscoveryEndpoint {
    fn routes(self: Arc<Self>) -> Router {
        Router::new().route(ProtocolEndpoint::DISCOVERY_PATH, get(discovery_document)).with_state(self)
    }
}

async fn discovery_document(State(endpoint): State<Arc<DiscoveryEndpoint>>) -> impl IntoResponse {
    let identity = &endpoint.identity;
    let algorithms = if identity.signing_key.is_some() { vec!["EdDSA"] } else { Vec::new() };

    let metadata = ProviderMetadata {
        issuer: &identity.issuer,
        jwks_uri: ProtocolEndpoint::url(identity, ProtocolEndpoint::JWKS_PATH),
        scopes_supported: &identity.scopes,
        response_types_supported: ["code"],
        subject_types_supported: ["public"],
        id_token_signing_alg_values_supported: algorithms,
        service_name: &identity.site_name,
    };
    let body = Json(&metadata).into_response();

    endpoint.events.publish(IdentityEvent::DiscoveryDocumentServed);
    (ProtocolEndpoint::CACHE_HEADERS, body)
}
