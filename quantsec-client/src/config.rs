//! Client configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the QuantSec service clients.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL for the QuantSec backend (e.g., "https://api.quantsec.example/quantserver").
    pub api_base_url: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000/quantserver".to_string(),
            timeout_secs: 30,
        }
    }
}
