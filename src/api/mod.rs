pub mod config;
pub mod reports;
pub mod request;
pub mod routing;

pub use request::{RequestToken, RequestTracker};
pub use routing::{fetch_route, RoutingConfig, RoutingProvider, RoutingRequest, TravelMode};

use crate::error::EditorError;

/// Resolve a site-relative path against the page origin; absolute URLs pass through
#[must_use]
pub fn resolve_url(path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    let origin = leptos::web_sys::window()
        .and_then(|window| window.location().origin().ok())
        .unwrap_or_default();
    format!("{origin}{path}")
}

/// GET `url` and return the body text
///
/// # Errors
///
/// Returns `Network` for transport failures and non-success statuses
pub async fn fetch_text(url: &str) -> Result<String, EditorError> {
    let response = reqwest::get(resolve_url(url))
        .await
        .map_err(|e| EditorError::Network(e.to_string()))?;
    let status = response.status();
    if !status.is_success() {
        return Err(EditorError::Network(format!("HTTP {status}")));
    }
    response.text().await.map_err(|e| EditorError::Network(e.to_string()))
}
