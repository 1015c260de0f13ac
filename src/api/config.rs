use super::fetch_text;
use crate::config::DataConfig;
use crate::constants::CONFIG_PATH;
use crate::logging::debug_log;

/// Load the runtime configuration override, or the compiled defaults when it is
/// missing or invalid
pub async fn load_config() -> DataConfig {
    let text = match fetch_text(CONFIG_PATH).await {
        Ok(text) => text,
        Err(e) => {
            debug_log!("No runtime configuration ({e}), using defaults");
            return DataConfig::default();
        }
    };
    DataConfig::from_json(&text).unwrap_or_else(|e| {
        leptos::logging::warn!("Ignoring invalid {CONFIG_PATH}: {e}");
        DataConfig::default()
    })
}
