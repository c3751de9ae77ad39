use shared_types::{AppConfig, MediaConfig};
use std::sync::OnceLock;

static CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// Path to the config file, relative to the working directory.
/// `LEGALAID_CONFIG` points somewhere else.
const CONFIG_PATH: &str = "config.toml";

/// Read `config.toml`, apply environment overrides, and store the result in
/// the global `OnceLock`. Safe to call multiple times; only the first call
/// has effect.
///
/// A missing or unparseable file yields the defaults (telemetry off,
/// media under `./media` served at `/media/`).
pub fn load_config() -> &'static AppConfig {
    CONFIG.get_or_init(|| {
        let _ = dotenvy::dotenv();
        let path = std::env::var("LEGALAID_CONFIG").unwrap_or_else(|_| CONFIG_PATH.to_string());

        let mut config = match std::fs::read_to_string(&path) {
            Ok(contents) => parse_config(&contents).unwrap_or_else(|e| {
                tracing::warn!(%path, error = %e, "Failed to parse config; using defaults");
                AppConfig::default()
            }),
            Err(e) => {
                tracing::info!(%path, error = %e, "Config file not found; using defaults");
                AppConfig::default()
            }
        };

        apply_env_overrides(&mut config.media, |key| std::env::var(key).ok());
        tracing::info!(
            telemetry = config.features.telemetry,
            media_root = %config.media.root,
            media_url = %config.media.url,
            "Configuration loaded"
        );
        config
    })
}

pub fn parse_config(contents: &str) -> Result<AppConfig, toml::de::Error> {
    toml::from_str(contents)
}

/// Let `MEDIA_ROOT`, `MEDIA_URL`, `MEDIA_MAX_UPLOAD_BYTES` and
/// `PUBLIC_BASE_URL` override the file. Empty `MEDIA_URL` is honored
/// (bare relative paths); other empty values are ignored.
pub fn apply_env_overrides(media: &mut MediaConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(root) = lookup("MEDIA_ROOT").filter(|v| !v.is_empty()) {
        media.root = root;
    }
    if let Some(url) = lookup("MEDIA_URL") {
        media.url = url;
    }
    if let Some(max) = lookup("MEDIA_MAX_UPLOAD_BYTES").and_then(|v| v.parse().ok()) {
        media.max_upload_bytes = max;
    }
    if let Some(base) = lookup("PUBLIC_BASE_URL").filter(|v| !v.is_empty()) {
        media.public_base_url = Some(base);
    }
}
