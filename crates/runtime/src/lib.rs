use schemascope_core::config::{ApiKey, BrowserConfig};
use schemascope_core::{DataCommonsClient, SchemaBrowser};
use std::path::PathBuf;
use std::sync::Arc;

pub const ENV_API_KEY: &str = "SCHEMASCOPE_API_KEY";
pub const ENV_API_KEY_FALLBACK: &str = "DC_API_KEY";
pub const ENV_API_BASE: &str = "SCHEMASCOPE_API_BASE";
pub const ENV_ROOT: &str = "SCHEMASCOPE_ROOT";

/// Bootstraps a browser wired to the Data Commons client described by `config`.
///
/// Nothing is fetched here; call `initialize_root` on the result to load the hierarchy.
pub fn build_default_browser(config: &BrowserConfig) -> schemascope_core::Result<SchemaBrowser> {
    config.validate()?;
    let client = DataCommonsClient::new(&config.lookup)?;
    tracing::debug!(
        root = %config.root,
        endpoint = %client.endpoint(),
        api_key = ?config.lookup.api_key,
        "Building browser"
    );
    Ok(SchemaBrowser::from_config(Arc::new(client), config))
}

/// Configuration from the process environment, defaults for anything unset.
pub fn config_from_env() -> BrowserConfig {
    config_from_vars(|name| std::env::var(name).ok())
}

/// Same as [`config_from_env`], reading variables through `var`.
pub fn config_from_vars(var: impl Fn(&str) -> Option<String>) -> BrowserConfig {
    let non_empty = |name: &str| var(name).filter(|v| !v.trim().is_empty());

    let mut config = BrowserConfig::default();
    if let Some(key) = non_empty(ENV_API_KEY).or_else(|| non_empty(ENV_API_KEY_FALLBACK)) {
        config.lookup.api_key = ApiKey::new(key);
    }
    if let Some(base) = non_empty(ENV_API_BASE) {
        config.lookup.base_url = base;
    }
    if let Some(root) = non_empty(ENV_ROOT) {
        config.root = root;
    }
    config
}

/// `~/.schemascope`, or a relative `.schemascope` when there is no home directory.
pub fn base_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".schemascope"))
        .unwrap_or_else(|| PathBuf::from(".schemascope"))
}

pub fn default_log_dir() -> PathBuf {
    base_dir().join("logs")
}

pub fn shell_history_path() -> PathBuf {
    base_dir().join("shell").join("history")
}

/// Initializes the logging system for a specific component.
/// This delegates to the core logging module.
pub fn init_logging(component: &str, to_stderr: bool) -> Option<impl Drop> {
    Some(schemascope_core::logging::init_logging(
        component,
        &default_log_dir(),
        to_stderr,
    ))
}
