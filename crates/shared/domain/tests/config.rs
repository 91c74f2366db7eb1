use idsrv_domain::config::{ApiConfig, IdentityConfig, LoggingOptions, ServerConfig};
use serde_json::json;

#[test]
fn config_defaults_are_sane() {
    let server = ServerConfig::default();
    assert_eq!(server.port, 4583);
    assert!(server.ssl.is_none());

    let identity = IdentityConfig::default();
    assert_eq!(identity.site_name, "idsrv");
    assert!(identity.scopes.iter().any(|s| s == "openid"));

    let logging = LoggingOptions::default();
    assert!(!logging.enable_web_api_diagnostics);
    assert!(!logging.web_api_diagnostics_is_verbose);
    assert!(!logging.enable_http_logging);
    assert!(!logging.include_sensitive_data_in_logs);
}

#[test]
fn api_config_deserializes() {
    let raw = json!({
        "server": { "address": "::", "port": 8080 },
        "identity": { "issuer": "https://id.example.com", "public_origin": "https://id.example.com" },
        "logging": { "enable_http_logging": true }
    });

    let cfg: ApiConfig = serde_json::from_value(raw).expect("config deserialize");
    assert_eq!(cfg.server.port, 8080);
    assert_eq!(cfg.identity.issuer, "https://id.example.com");
    assert_eq!(cfg.identity.site_name, "idsrv");
    assert!(cfg.logging.enable_http_logging);
    assert!(!cfg.logging.enable_web_api_diagnostics);
}

#[test]
fn logging_options_accept_legacy_names() {
    let raw = json!({
        "EnableWebApiDiagnostics": true,
        "WebApiDiagnosticsIsVerbose": true
    });

    let opts: LoggingOptions = serde_json::from_value(raw).expect("options deserialize");
    assert!(opts.enable_web_api_diagnostics);
    assert!(opts.web_api_diagnostics_is_verbose);
    assert!(!opts.enable_http_logging);
}

#[test]
fn missing_logging_section_disables_everything() {
    let cfg: ApiConfig = serde_json::from_value(json!({})).expect("empty config");
    assert_eq!(cfg.logging, LoggingOptions::default());
}
