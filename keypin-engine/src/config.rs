//! Engine configuration.
//!
//! Configuration can be built in code or parsed from JSON:
//!
//! ```json
//! {
//!   "storage_path": "/var/cache/app",
//!   "bypass_pinning_for_local_trust_anchors": true,
//!   "public_key_pins": [
//!     {
//!       "host": "example.com",
//!       "pin_sha256": ["sha256/AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA="],
//!       "include_subdomains": true,
//!       "expires_at": "2030-01-01T00:00:00Z"
//!     }
//!   ]
//! }
//! ```
//!
//! `storage_path` is the directory other components may cache into. Pins are
//! never written there.

use crate::error::ConfigResult;
use chrono::{DateTime, Utc};
use keypin_store::PinPolicy;
use keypin_types::{CanonicalHost, PinDigest, PinResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for a pinning engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Storage directory shared with the rest of the client. Unused for pins.
    pub storage_path: Option<PathBuf>,
    /// Skip pin enforcement for chains that end in a locally installed root.
    pub bypass_pinning_for_local_trust_anchors: bool,
    /// Pins applied to every engine created from this configuration.
    pub public_key_pins: Vec<PinConfig>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            storage_path: None,
            bypass_pinning_for_local_trust_anchors: true,
            public_key_pins: Vec::new(),
        }
    }
}

impl EngineConfig {
    /// Parses configuration from a JSON document.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes the configuration to pretty JSON.
    pub fn to_json(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// One pin entry in an [`EngineConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinConfig {
    pub host: String,
    /// Pins in `sha256/<base64>` form.
    pub pin_sha256: Vec<String>,
    #[serde(default)]
    pub include_subdomains: bool,
    pub expires_at: DateTime<Utc>,
}

impl PinConfig {
    /// Validates the entry into a policy.
    pub fn to_policy(&self) -> PinResult<PinPolicy> {
        let host = CanonicalHost::parse(&self.host)?;
        let pins = self
            .pin_sha256
            .iter()
            .map(|pin| PinDigest::parse_pin(pin))
            .collect::<PinResult<Vec<_>>>()?;
        PinPolicy::new(host, pins, self.include_subdomains, self.expires_at)
    }
}
