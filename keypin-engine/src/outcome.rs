//! Validation results and the per-connection input from the transport.

use crate::error::ConnectionError;
use keypin_store::PinPolicy;
use keypin_types::{CanonicalHost, PinDigest};
use std::sync::Arc;

/// Result of checking a connection against the pin policies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// The connection may proceed.
    ///
    /// `policy` is the policy that was consulted, if any. It may be expired
    /// or may have matched one of the presented keys.
    Allowed { policy: Option<Arc<PinPolicy>> },

    /// An active policy applies and none of the presented keys is pinned.
    PinnedKeyMismatch {
        host: CanonicalHost,
        policy: Arc<PinPolicy>,
    },
}

impl ValidationOutcome {
    /// Returns true if the connection may proceed.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }

    /// Returns true on a pin mismatch.
    #[must_use]
    pub fn is_mismatch(&self) -> bool {
        matches!(self, Self::PinnedKeyMismatch { .. })
    }

    /// Returns the policy that was consulted, if any.
    #[must_use]
    pub fn policy(&self) -> Option<&PinPolicy> {
        match self {
            Self::Allowed { policy } => policy.as_deref(),
            Self::PinnedKeyMismatch { policy, .. } => Some(policy.as_ref()),
        }
    }

    /// Converts a mismatch into the error the transport must abort with.
    pub fn into_result(self) -> Result<Self, ConnectionError> {
        match self {
            Self::PinnedKeyMismatch { host, policy } => {
                Err(ConnectionError::PinnedKeyNotInCertChain {
                    host,
                    pinned_host: policy.host().clone(),
                })
            }
            allowed => Ok(allowed),
        }
    }
}

/// What the transport knows about a connection after chain verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedChain {
    /// Host the connection was made to.
    pub host: String,
    /// SPKI digests of every certificate in the verified chain.
    pub spki_hashes: Vec<PinDigest>,
    /// False if the chain ends in a locally installed trust anchor.
    pub is_issued_by_known_root: bool,
}

impl VerifiedChain {
    /// Creates a chain description for a publicly trusted chain.
    #[must_use]
    pub fn new(host: impl Into<String>, spki_hashes: Vec<PinDigest>) -> Self {
        Self {
            host: host.into(),
            spki_hashes,
            is_issued_by_known_root: true,
        }
    }

    /// Marks the chain as ending in a locally installed trust anchor.
    #[must_use]
    pub fn with_local_trust_anchor(mut self) -> Self {
        self.is_issued_by_known_root = false;
        self
    }
}
