//! Process configuration read from the environment.

use std::path::PathBuf;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

pub const BIND_ADDR_VAR: &str = "STOREFRONT_BIND_ADDR";
pub const CATALOG_PATH_VAR: &str = "STOREFRONT_CATALOG_PATH";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub bind_addr: String,
    /// JSON product list to serve; `None` means the built-in demo catalog.
    pub catalog_path: Option<PathBuf>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            catalog_path: None,
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary variable source. Blank values count
    /// as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        Self {
            bind_addr: var(BIND_ADDR_VAR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            catalog_path: var(CATALOG_PATH_VAR).map(PathBuf::from),
        }
    }
}
