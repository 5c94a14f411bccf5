use runtime::ServerConfig;
use serde::{Deserialize, Serialize};

/// HTTP front door settings, derived from the `server` config section.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ApiIngressConfig {
    pub bind_addr: String,
    #[serde(default)]
    pub enable_docs: bool,
    #[serde(default)]
    pub cors_enabled: bool,
    #[serde(default = "default_timeout_sec")]
    pub timeout_sec: u64,
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
}

fn default_timeout_sec() -> u64 {
    30
}

fn default_body_limit() -> usize {
    16 * 1024 * 1024
}

impl Default for ApiIngressConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            enable_docs: false,
            cors_enabled: false,
            timeout_sec: default_timeout_sec(),
            body_limit_bytes: default_body_limit(),
        }
    }
}

impl From<&ServerConfig> for ApiIngressConfig {
    fn from(server: &ServerConfig) -> Self {
        Self {
            bind_addr: server.bind_addr(),
            enable_docs: server.enable_docs,
            cors_enabled: server.cors_enabled,
            timeout_sec: server.timeout_sec,
            body_limit_bytes: server.body_limit_bytes,
        }
    }
}
