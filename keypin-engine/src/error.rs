//! Error types for the engine layer.

use keypin_types::{CanonicalHost, PinError};
use thiserror::Error;

/// Network error code reported when no presented key matches a pin.
pub const ERR_SSL_PINNED_KEY_NOT_IN_CERT_CHAIN: i32 = -150;

/// Network error code reported for malformed caller input.
pub const ERR_INVALID_ARGUMENT: i32 = -4;

/// Why a connection must be aborted.
///
/// Returned to the transport layer. A pin failure is kept distinct from
/// generic certificate or transport errors and must never be retried as an
/// unpinned connection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectionError {
    /// None of the chain's keys is pinned for this host.
    #[error("pinned key not in certificate chain for {host} (pinned via {pinned_host})")]
    PinnedKeyNotInCertChain {
        /// Host the connection was made to.
        host: CanonicalHost,
        /// Host of the policy that was enforced.
        pinned_host: CanonicalHost,
    },

    /// The connection's host name could not be canonicalized.
    #[error(transparent)]
    InvalidHost(#[from] PinError),
}

impl ConnectionError {
    /// Returns the network stack error code for this failure.
    #[must_use]
    pub fn net_error_code(&self) -> i32 {
        match self {
            Self::PinnedKeyNotInCertChain { .. } => ERR_SSL_PINNED_KEY_NOT_IN_CERT_CHAIN,
            Self::InvalidHost(_) => ERR_INVALID_ARGUMENT,
        }
    }

    /// Returns true if the failure is a pin mismatch.
    #[must_use]
    pub fn is_pin_failure(&self) -> bool {
        matches!(self, Self::PinnedKeyNotInCertChain { .. })
    }
}

/// Errors raised while loading engine configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration JSON is malformed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A configured pin entry is invalid.
    #[error("invalid pin configuration: {0}")]
    Pin(#[from] PinError),
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;
