//! The per-engine pin policy index.

use crate::policy::{PinPolicy, PinRequest};
use keypin_types::{CanonicalHost, PinResult};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

/// In-memory map from canonical host to its pin policy.
///
/// Policies are stored behind `Arc` and replaced whole under the write
/// lock, so concurrent readers see either the old or the new policy, never
/// a mix of the two.
#[derive(Debug, Default)]
pub struct PinPolicyStore {
    policies: RwLock<HashMap<CanonicalHost, Arc<PinPolicy>>>,
}

impl PinPolicyStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates a registration request and stores the resulting policy,
    /// replacing any policy already registered for the same host.
    pub fn register(&self, request: PinRequest) -> PinResult<()> {
        let policy = request.into_policy()?;
        self.insert(policy);
        Ok(())
    }

    /// Stores an already validated policy.
    pub fn insert(&self, policy: PinPolicy) {
        debug!(
            host = %policy.host(),
            pins = policy.pins().len(),
            include_subdomains = policy.include_subdomains(),
            expires_at = %policy.expires_at(),
            "registered public key pins"
        );
        let host = policy.host().clone();
        self.write().insert(host, Arc::new(policy));
    }

    /// Finds the policy governing `host`, ignoring expiration.
    ///
    /// An exact match wins regardless of its `include_subdomains` flag.
    /// Otherwise the nearest ancestor whose policy includes subdomains
    /// applies.
    #[must_use]
    pub fn lookup(&self, host: &CanonicalHost) -> Option<Arc<PinPolicy>> {
        let policies = self.read();
        if let Some(policy) = policies.get(host) {
            return Some(Arc::clone(policy));
        }
        host.ancestors().find_map(|ancestor| {
            policies
                .get(ancestor)
                .filter(|policy| policy.covers(host))
                .cloned()
        })
    }

    /// Returns the policy registered for exactly `host`, if any.
    #[must_use]
    pub fn get(&self, host: &CanonicalHost) -> Option<Arc<PinPolicy>> {
        self.read().get(host).cloned()
    }

    /// Returns a snapshot of all policies, sorted by host.
    #[must_use]
    pub fn policies(&self) -> Vec<Arc<PinPolicy>> {
        let mut all: Vec<_> = self.read().values().cloned().collect();
        all.sort_by(|a, b| a.host().cmp(b.host()));
        all
    }

    /// Returns the number of registered hosts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Returns true if no pins are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Drops every policy.
    pub fn clear(&self) {
        self.write().clear();
    }

    // The map only ever holds complete policies, so a poisoned lock is
    // still safe to use.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<CanonicalHost, Arc<PinPolicy>>> {
        self.policies.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<CanonicalHost, Arc<PinPolicy>>> {
        self.policies.write().unwrap_or_else(PoisonError::into_inner)
    }
}
