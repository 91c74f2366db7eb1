use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;

/// Top-level host configuration shared across services.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfigInner {
    pub server: ServerConfig,
    pub identity: IdentityConfig,
    pub logging: LoggingOptions,
}

/// Thin Arc-wrapped config for inexpensive cloning into subsystems.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(flatten, default)]
    inner: Arc<ApiConfigInner>,
}

impl Deref for ApiConfig {
    type Target = ApiConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for ApiConfig {
    fn deref_mut(&mut self) -> &mut ApiConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub address: IpAddr,
    pub port: u16,
    pub ssl: Option<SslConfig>,
}

/// TLS certificate/key paths.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SslConfig {
    pub cert: PathBuf,
    pub key: PathBuf,
}

/// Identity provider metadata published by the protocol endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    pub site_name: String,
    pub issuer: String,
    /// Externally visible origin used to build endpoint URLs (no trailing slash).
    pub public_origin: String,
    pub scopes: Vec<String>,
    /// Base64 (standard alphabet) Ed25519 public key published in the JWKS.
    pub signing_key: Option<String>,
}

/// Diagnostic switches for the hosting pipeline.
///
/// Every flag defaults to `false`: an absent option means the feature is disabled.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingOptions {
    /// Bridges the framework request tracing into the service log.
    #[serde(alias = "EnableWebApiDiagnostics")]
    pub enable_web_api_diagnostics: bool,
    /// Emits per-request header detail from the tracing bridge.
    #[serde(alias = "WebApiDiagnosticsIsVerbose")]
    pub web_api_diagnostics_is_verbose: bool,
    /// Inserts the request/response observer into the pipeline.
    #[serde(alias = "EnableHttpLogging")]
    pub enable_http_logging: bool,
    /// Logs credentials-bearing headers in clear text.
    #[serde(alias = "IncludeSensitiveDataInLogs")]
    pub include_sensitive_data_in_logs: bool,
}

// --- Default ---

impl Default for ServerConfig {
    fn default() -> Self {
        Self { address: IpAddr::V4(Ipv4Addr::UNSPECIFIED), port: 4583, ssl: None }
    }
}

impl Default for SslConfig {
    fn default() -> Self {
        Self { cert: PathBuf::from("cert.pem"), key: PathBuf::from("key.pem") }
    }
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            site_name: "idsrv".to_owned(),
            issuer: "https://localhost:4583".to_owned(),
            public_origin: "https://localhost:4583".to_owned(),
            scopes: vec!["openid".to_owned(), "profile".to_owned(), "email".to_owned()],
            signing_key: None,
        }
    }
}
