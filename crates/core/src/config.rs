use crate::error::{Result, SchemascopeError};
use std::fmt;
use std::time::Duration;

pub const DEFAULT_ROOT: &str = "Thing";
pub const DEFAULT_API_BASE: &str = "https://api.datacommons.org";
pub const DEFAULT_BROWSER_BASE: &str = "https://datacommons.org/browser";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_IN_FLIGHT_PROBES: usize = 16;

/// Access credential for the lookup service. Passed through untouched, never printed.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("ApiKey(<unset>)")
        } else {
            f.write_str("ApiKey(<redacted>)")
        }
    }
}

#[derive(Debug, Clone)]
pub struct LookupConfig {
    pub api_key: ApiKey,
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            api_key: ApiKey::default(),
            base_url: DEFAULT_API_BASE.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BrowserConfig {
    /// Identifier of the hierarchy root
    pub root: String,
    pub lookup: LookupConfig,
    /// Base of the per-node web page links
    pub browser_url: String,
    /// Upper bound on concurrent `has_children` probes within one fetch
    pub max_in_flight_probes: usize,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            root: DEFAULT_ROOT.to_string(),
            lookup: LookupConfig::default(),
            browser_url: DEFAULT_BROWSER_BASE.to_string(),
            max_in_flight_probes: DEFAULT_MAX_IN_FLIGHT_PROBES,
        }
    }
}

impl BrowserConfig {
    pub fn validate(&self) -> Result<()> {
        if self.root.trim().is_empty() {
            return Err(SchemascopeError::Config("root identifier is empty".into()));
        }
        if self.max_in_flight_probes == 0 {
            return Err(SchemascopeError::Config(
                "max_in_flight_probes must be at least 1".into(),
            ));
        }
        url::Url::parse(&self.lookup.base_url)?;
        url::Url::parse(&self.browser_url)?;
        Ok(())
    }

    /// Web page for one node, e.g. `https://datacommons.org/browser/Person`.
    pub fn browser_link(&self, name: &str) -> String {
        format!("{}/{}", self.browser_url.trim_end_matches('/'), name)
    }
}
