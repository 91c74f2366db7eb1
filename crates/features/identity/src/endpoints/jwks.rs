use super::ProtocolEndpoint;
use crate::events::{IdentityEvent, IdentityEvents};
use crate::keys::Jwk;
use crate::Identity;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use idsrv_kernel::server::{Activate, ActivationError, DependencyResolver, HttpHandler};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
struct KeySet<'a> {
    keys: Vec<Jwk<'a>>,
}

/// Serves `GET /.well-known/jwks`.
#[idsrv_derive::exported_type(handler)]
#[derive(Debug)]
pub struct JwksEndpoint {
    identity: Identity,
    events: IdentityEvents,
}

impl Activate for JwksEndpoint {
    fn activate(resolver: &DependencyResolver) -> Result<Self, ActivationError> {
        Ok(Self { identity: resolver.try_resolve::<Identity>()?, events: IdentityEvents })
    }
}

impl HttpHandler for JwksEndpoint {
    fn routes(self: Arc<Self>) -> Router {
        Router::new().route(ProtocolEndpoint::JWKS_PATH, get(key_set)).with_state(self)
    }
}

async fn key_set(State(endpoint): State<Arc<JwksEndpoint>>) -> impl IntoResponse {
    let keys: Vec<_> = endpoint.identity.signing_key.iter().map(|key| key.to_jwk()).collect();
    endpoint.events.publish(IdentityEvent::KeySetServed { keys: keys.len() });

    (ProtocolEndpoint::CACHE_HEADERS, Json(KeySet { keys }).into_response())
}
