//! Registry configuration.

use serde::{Deserialize, Serialize};

/// Runtime configuration for the registry facade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Account ids with the privileged override (e.g. deleting statistics
    /// contributed by another source).
    #[serde(default)]
    pub super_users: Vec<String>,

    /// Page size applied to queries that do not request one.
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,

    /// Upper bound on requested page sizes.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: usize,
}

fn default_page_size() -> usize {
    20
}

fn default_max_page_size() -> usize {
    100
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            super_users: Vec::new(),
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

impl RegistryConfig {
    /// Clamp a requested page size to the configured bounds, falling back
    /// to the default when absent.
    pub fn page_size(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.default_page_size)
            .min(self.max_page_size)
    }
}
