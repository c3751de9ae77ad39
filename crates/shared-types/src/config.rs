use serde::{Deserialize, Serialize};

/// Feature flags controlling which optional integrations are active.
///
/// Every field defaults to `false` so that a missing or incomplete
/// config file disables all optional features.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct FeatureFlags {
    #[serde(default)]
    pub telemetry: bool,
}

/// Where uploaded files live on disk and how they are served.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MediaConfig {
    /// Directory uploads are written under.
    #[serde(default = "default_media_root")]
    pub root: String,
    /// URL prefix the media directory is served from. May be empty.
    #[serde(default = "default_media_url")]
    pub url: String,
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: u64,
    /// `scheme://host` for absolute media links. Takes priority over request headers.
    #[serde(default)]
    pub public_base_url: Option<String>,
}

fn default_media_root() -> String {
    "media".to_string()
}

fn default_media_url() -> String {
    "/media/".to_string()
}

fn default_max_upload_bytes() -> u64 {
    10 * 1024 * 1024
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            root: default_media_root(),
            url: default_media_url(),
            max_upload_bytes: default_max_upload_bytes(),
            public_base_url: None,
        }
    }
}

/// Top-level config file structure matching `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub features: FeatureFlags,
    #[serde(default)]
    pub media: MediaConfig,
}
