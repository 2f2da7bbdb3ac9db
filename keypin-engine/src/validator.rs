//! Pin enforcement.

use crate::outcome::ValidationOutcome;
use chrono::{DateTime, Utc};
use keypin_store::PinPolicyStore;
use keypin_types::{CanonicalHost, PinDigest, PinResult};
use std::sync::Arc;
use tracing::{debug, warn};

/// Decides whether a connection's keys satisfy the governing pin policy.
#[derive(Debug, Clone)]
pub struct PinValidator {
    store: Arc<PinPolicyStore>,
}

impl PinValidator {
    /// Creates a validator reading from `store`.
    #[must_use]
    pub fn new(store: Arc<PinPolicyStore>) -> Self {
        Self { store }
    }

    /// Validates the key digests presented by a connection to `host`.
    ///
    /// Unpinned hosts and hosts whose policy has expired at `now` are
    /// allowed. Otherwise at least one presented digest must be pinned.
    pub fn validate(
        &self,
        host: &str,
        presented: &[PinDigest],
        now: DateTime<Utc>,
    ) -> PinResult<ValidationOutcome> {
        let host = CanonicalHost::parse(host)?;

        let Some(policy) = self.store.lookup(&host) else {
            return Ok(ValidationOutcome::Allowed { policy: None });
        };

        // Expired pins behave exactly like no pins.
        if !policy.is_active_at(now) {
            debug!(
                %host,
                pinned_host = %policy.host(),
                expires_at = %policy.expires_at(),
                "pin policy expired, not enforced"
            );
            return Ok(ValidationOutcome::Allowed {
                policy: Some(policy),
            });
        }

        if policy.matches_any(presented) {
            debug!(%host, pinned_host = %policy.host(), "pinned key present in chain");
            Ok(ValidationOutcome::Allowed {
                policy: Some(policy),
            })
        } else {
            warn!(
                %host,
                pinned_host = %policy.host(),
                presented = presented.len(),
                "pinned key not in certificate chain"
            );
            Ok(ValidationOutcome::PinnedKeyMismatch { host, policy })
        }
    }
}
