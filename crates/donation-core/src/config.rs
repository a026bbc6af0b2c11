//! Flow settings

use crate::prompt::DEFAULT_ACCEPTED_TYPES;
use serde::{Deserialize, Serialize};

/// Settings a flow is created from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowConfig {
    /// Platform whose data is requested
    pub platform: String,
    /// File types offered by the file prompt
    pub accepted_types: String,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            platform: "Twitter".to_string(),
            accepted_types: DEFAULT_ACCEPTED_TYPES.to_string(),
        }
    }
}
