//! Identity feature slice: publishes the provider's protocol metadata.
//!
//! The endpoint types are exported with `#[exported_type]` and listed in
//! [`EXPORTED_TYPES`]; the host discovers and mounts them from there.

mod endpoints;
mod error;
mod events;
mod keys;
mod scope;

pub use crate::endpoints::{DiscoveryEndpoint, JwksEndpoint, ProtocolEndpoint};
pub use crate::error::{IdentityError, IdentityErrorExt};
pub use crate::events::{IdentityEvent, IdentityEvents};
pub use crate::keys::{Jwk, SigningKey};
pub use crate::scope::ScopeParser;

use idsrv_kernel::discovery::TypeRegistration;
use idsrv_kernel::domain::config::IdentityConfig;
use idsrv_kernel::domain::registry::RegisteredService;

/// Identity provider state shared by the protocol endpoints.
#[idsrv_derive::idsrv_service]
pub struct Identity {
    pub site_name: String,
    pub issuer: String,
    /// Origin used to build endpoint URLs, without a trailing slash.
    pub public_origin: String,
    pub scopes: Vec<String>,
    pub signing_key: Option<SigningKey>,
}

/// Types this slice contributes to the hosting assembly.
pub const EXPORTED_TYPES: &[TypeRegistration] = &[
    DiscoveryEndpoint::EXPORTED_TYPE,
    JwksEndpoint::EXPORTED_TYPE,
    ProtocolEndpoint::EXPORTED_TYPE,
    ScopeParser::EXPORTED_TYPE,
    IdentityEvents::EXPORTED_TYPE,
];

/// Initialize the identity feature.
///
/// # Errors
/// Returns an error if the issuer or public origin is blank, a configured scope
/// is malformed, or the signing key is not a base64 Ed25519 public key.
pub fn init(config: &IdentityConfig) -> Result<RegisteredService, IdentityError> {
    let issuer = config.issuer.trim();
    if issuer.is_empty() {
        return Err(IdentityError::Config { message: "issuer is empty".into(), context: None });
    }

    let public_origin = config.public_origin.trim().trim_end_matches('/');
    if public_origin.is_empty() {
        return Err(IdentityError::Config {
            message: "public origin is empty".into(),
            context: None,
        });
    }

    let scopes = ScopeParser::normalize(&config.scopes).context("identity.scopes")?;
    let signing_key = config
        .signing_key
        .as_deref()
        .map(SigningKey::from_base64)
        .transpose()
        .context("identity.signing_key")?;

    tracing::info!(
        issuer,
        scopes = scopes.len(),
        signing_key = signing_key.as_ref().map(|k| k.kid.as_str()),
        "Identity slice initialized"
    );

    let identity = Identity::new(IdentityInner {
        site_name: config.site_name.clone(),
        issuer: issuer.to_owned(),
        public_origin: public_origin.to_owned(),
        scopes,
        signing_key,
    });

    Ok(identity.into_registered())
}
