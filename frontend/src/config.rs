use shared::prize::TableVariant;
use web_sys::window;

const OPERATOR_HASH: &str = "#operator";

pub fn get_api_base_url() -> String {
    // Same origin as the page, so the app works behind any host the server is reached on
    if let Some(window) = window() {
        if let Ok(host) = window.location().host() {
            let protocol = window.location().protocol().unwrap_or_else(|_| "http:".to_string());
            return format!("{}//{}", protocol, host);
        }
    }

    "http://127.0.0.1:3000".to_string()
}

pub fn endpoint(path: &str) -> String {
    format!("{}{}", get_api_base_url(), path)
}

/// Weight table baked in at build time with `ROULETTE_VARIANT`.
pub fn table_variant() -> TableVariant {
    option_env!("ROULETTE_VARIANT")
        .map(TableVariant::from_name)
        .unwrap_or_default()
}

/// The debug menu is only rendered for `…/#operator`.
pub fn is_operator_page() -> bool {
    window()
        .and_then(|w| w.location().hash().ok())
        .map(|hash| hash == OPERATOR_HASH)
        .unwrap_or(false)
}

pub fn user_agent() -> String {
    window()
        .and_then(|w| w.navigator().user_agent().ok())
        .unwrap_or_default()
}
