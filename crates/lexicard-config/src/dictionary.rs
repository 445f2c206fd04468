use serde::{Deserialize, Serialize};

fn default_primary() -> String {
    "free".to_string()
}

fn default_secondary() -> String {
    "wikt".to_string()
}

fn default_timeout_seconds() -> u64 {
    10
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct DictionaryConfig {
    /// Dictionary asked when a query carries no dictionary flag
    #[serde(default = "default_primary")]
    pub primary: String,
    /// Fallback when the primary fails, and the second half of `-compare`
    #[serde(default = "default_secondary")]
    pub secondary: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self {
            primary: default_primary(),
            secondary: default_secondary(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}
