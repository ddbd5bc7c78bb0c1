//! Application configuration.
//!
//! The browser has no environment, so the `LEAFSCAN_*` variables are read
//! when the bundle is built (`LEAFSCAN_API_URL=https://... trunk build`).
//! Unset values fall back to the core defaults.

use leafscan::config::{ENV_API_URL, ENV_MAX_UPLOAD_MB, ENV_TIMEOUT_SECS};
use leafscan::ClientConfig;

/// Application title, shown in the tab and the hero.
pub const APP_NAME: &str = "LeafScan";

/// Accepted by the file picker. Intake still checks the media type.
pub const ACCEPT_IMAGES: &str = "image/*";

fn build_time(key: &str) -> Option<String> {
    let value = match key {
        ENV_API_URL => option_env!("LEAFSCAN_API_URL"),
        ENV_TIMEOUT_SECS => option_env!("LEAFSCAN_TIMEOUT_SECS"),
        ENV_MAX_UPLOAD_MB => option_env!("LEAFSCAN_MAX_UPLOAD_MB"),
        _ => None,
    };
    value.map(str::to_string)
}

/// Client configuration baked into this build.
pub fn client_config() -> ClientConfig {
    ClientConfig::from_lookup(build_time).unwrap_or_else(|e| {
        log::error!("❌ Invalid build configuration ({}), using defaults", e);
        ClientConfig::default()
    })
}
