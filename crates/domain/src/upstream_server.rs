use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

pub const REGION_ANNOTATION: &str = "region";

/// An upstream resolver, `host:port`, with free-form annotations.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct UpstreamServer {
    pub address: String,

    #[serde(default)]
    pub annotations: HashMap<String, String>,
}

impl UpstreamServer {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            annotations: HashMap::new(),
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.annotations
            .insert(REGION_ANNOTATION.to_string(), region.into());
        self
    }

    /// Region affinity declared by the `region` annotation, if any.
    pub fn region(&self) -> Option<&str> {
        self.annotations
            .get(REGION_ANNOTATION)
            .map(String::as_str)
            .filter(|r| !r.is_empty())
    }
}

impl fmt::Display for UpstreamServer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.address)
    }
}
