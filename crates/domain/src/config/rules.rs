use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RulesConfig {
    /// Apply every matching rewrite rule instead of stopping at the first one
    #[serde(default = "default_true")]
    pub scan_all: bool,

    /// Rule definitions: `KIND ACTION PATTERN [REPLACEMENT] [OPTIONS]`
    #[serde(default)]
    pub proxy_rules: Vec<String>,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            scan_all: true,
            proxy_rules: vec![],
        }
    }
}

fn default_true() -> bool {
    true
}
