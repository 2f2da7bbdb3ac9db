//! Pin policies and registration requests.

use chrono::{DateTime, Utc};
use keypin_types::{CanonicalHost, PinDigest, PinError, PinResult};
use serde::Serialize;
use std::collections::BTreeSet;

/// A host-scoped rule restricting the acceptable public keys.
///
/// Always holds at least one pin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PinPolicy {
    host: CanonicalHost,
    pins: BTreeSet<PinDigest>,
    include_subdomains: bool,
    expires_at: DateTime<Utc>,
}

impl PinPolicy {
    /// Creates a policy, rejecting an empty pin set.
    pub fn new(
        host: CanonicalHost,
        pins: impl IntoIterator<Item = PinDigest>,
        include_subdomains: bool,
        expires_at: DateTime<Utc>,
    ) -> PinResult<Self> {
        let pins: BTreeSet<PinDigest> = pins.into_iter().collect();
        if pins.is_empty() {
            return Err(PinError::InvalidPinFormat(format!(
                "no pins given for {host}"
            )));
        }
        Ok(Self {
            host,
            pins,
            include_subdomains,
            expires_at,
        })
    }

    /// Returns the host this policy is registered for.
    #[must_use]
    pub fn host(&self) -> &CanonicalHost {
        &self.host
    }

    /// Returns the pinned digests.
    #[must_use]
    pub fn pins(&self) -> &BTreeSet<PinDigest> {
        &self.pins
    }

    /// Returns true if the policy also covers subdomains of its host.
    #[must_use]
    pub fn include_subdomains(&self) -> bool {
        self.include_subdomains
    }

    /// Returns the instant at which the policy stops being enforced.
    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Returns true if the policy is still enforced at `now`.
    ///
    /// The expiry instant itself is already inactive.
    #[must_use]
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }

    /// Returns true if any presented digest is pinned.
    #[must_use]
    pub fn matches_any<'a>(&self, presented: impl IntoIterator<Item = &'a PinDigest>) -> bool {
        presented.into_iter().any(|d| self.pins.contains(d))
    }

    /// Returns true if this policy governs `host` when it is the best match.
    #[must_use]
    pub fn covers(&self, host: &CanonicalHost) -> bool {
        *host == self.host || (self.include_subdomains && host.is_subdomain_of(&self.host))
    }
}

/// Arguments of a pin registration, as supplied by the caller.
///
/// Host, pin hashes and expiration are mandatory; leaving any of them unset
/// makes registration fail with [`PinError::NullArgument`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PinRequest {
    /// Host name to pin.
    pub host: Option<String>,
    /// Raw SHA-256 digests of the acceptable public keys.
    pub pin_hashes: Option<Vec<Vec<u8>>>,
    /// Whether the pins also apply to subdomains of `host`.
    pub include_subdomains: bool,
    /// When the pins stop being enforced.
    pub expires_at: Option<DateTime<Utc>>,
}

impl PinRequest {
    /// Creates a request with every mandatory argument present.
    #[must_use]
    pub fn new(
        host: impl Into<String>,
        pin_hashes: Vec<Vec<u8>>,
        include_subdomains: bool,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            host: Some(host.into()),
            pin_hashes: Some(pin_hashes),
            include_subdomains,
            expires_at: Some(expires_at),
        }
    }

    /// Validates the request and builds the policy it describes.
    ///
    /// Checks run in order: missing arguments, host syntax, pin format.
    pub fn into_policy(self) -> PinResult<PinPolicy> {
        let host = self.host.ok_or(PinError::NullArgument("host"))?;
        let pin_hashes = self.pin_hashes.ok_or(PinError::NullArgument("pin_hashes"))?;
        let expires_at = self.expires_at.ok_or(PinError::NullArgument("expires_at"))?;

        let host = CanonicalHost::parse(&host)?;
        let pins = pin_hashes
            .iter()
            .map(|hash| PinDigest::from_slice(hash))
            .collect::<PinResult<Vec<_>>>()?;

        PinPolicy::new(host, pins, self.include_subdomains, expires_at)
    }
}
