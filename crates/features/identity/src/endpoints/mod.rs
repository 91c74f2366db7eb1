mod discovery;
mod jwks;

pub use discovery::DiscoveryEndpoint;
pub use jwks::JwksEndpoint;

use crate::Identity;

/// Common base of the protocol endpoints. Abstract: never activated or mounted.
#[idsrv_derive::exported_type(handler, is_abstract)]
#[derive(Debug)]
pub struct ProtocolEndpoint;

impl ProtocolEndpoint {
    pub const DISCOVERY_PATH: &'static str = "/.well-known/openid-configuration";
    pub const JWKS_PATH: &'static str = "/.well-known/jwks";

    /// Metadata documents may be cached by clients for an hour.
    pub(crate) const CACHE_HEADERS: [(&'static str, &'static str); 1] =
        [("cache-control", "public, max-age=3600")];

    /// Absolute URL of a protocol path under the public origin.
    #[must_use]
    pub fn url(identity: &Identity, path: &str) -> String {
        format!("{}{path}", identity.public_origin)
    }
}
