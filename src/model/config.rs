use serde::{Deserialize, Serialize};

/// Default API root of the list server.
pub const DEFAULT_SERVER: &str = "http://localhost:8000/api";

/// Client settings from config.toml
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// API root, e.g. `http://localhost:8000/api`
    #[serde(default = "default_server")]
    pub server: String,
    /// Origin of the web client, used to build share URLs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_url: Option<String>,
    /// Token of the list last created or opened
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            server: default_server(),
            web_url: None,
            token: None,
        }
    }
}

fn default_server() -> String {
    DEFAULT_SERVER.to_string()
}

/// Command-line overrides; these win over environment and file values.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub server: Option<String>,
    pub token: Option<String>,
}
