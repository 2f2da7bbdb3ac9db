//! Engine lifecycle.
//!
//! Each engine owns exactly one pin store, created empty when the engine is
//! built and dropped when it shuts down. Pins are never written to the
//! configured storage path, so a new engine pointed at the same
//! configuration starts with only the pins its builder carries.

use crate::config::EngineConfig;
use crate::error::{ConfigResult, ConnectionError};
use crate::outcome::{ValidationOutcome, VerifiedChain};
use crate::validator::PinValidator;
use chrono::{DateTime, Utc};
use keypin_store::{PinPolicy, PinPolicyStore, PinRequest};
use keypin_types::{CanonicalHost, PinDigest, PinResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Unique identifier of one engine instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EngineId(Uuid);

impl EngineId {
    /// Creates a new time-ordered engine ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for EngineId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EngineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Collects settings and pins before any engine exists.
///
/// Pins are validated when added. Every engine built from the same builder
/// starts with its own copy of the builder's pins.
#[derive(Debug, Clone)]
pub struct EngineBuilder {
    storage_path: Option<PathBuf>,
    bypass_local_trust_anchors: bool,
    pins: Vec<PinPolicy>,
}

impl EngineBuilder {
    /// Creates a builder with default settings and no pins.
    #[must_use]
    pub fn new() -> Self {
        Self::from_validated(EngineConfig::default(), Vec::new())
    }

    /// Creates a builder from configuration, validating its pin entries.
    pub fn from_config(config: EngineConfig) -> ConfigResult<Self> {
        let pins = config
            .public_key_pins
            .iter()
            .map(|pin| pin.to_policy())
            .collect::<PinResult<Vec<_>>>()?;
        Ok(Self::from_validated(config, pins))
    }

    fn from_validated(config: EngineConfig, pins: Vec<PinPolicy>) -> Self {
        Self {
            storage_path: config.storage_path,
            bypass_local_trust_anchors: config.bypass_pinning_for_local_trust_anchors,
            pins,
        }
    }

    /// Sets the storage directory.
    #[must_use]
    pub fn storage_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.storage_path = Some(path.into());
        self
    }

    /// Enables or disables skipping pins for locally installed roots.
    #[must_use]
    pub fn bypass_pinning_for_local_trust_anchors(mut self, bypass: bool) -> Self {
        self.bypass_local_trust_anchors = bypass;
        self
    }

    /// Adds pins for `host`. Fails fast on invalid input.
    pub fn add_public_key_pins(
        &mut self,
        host: &str,
        pin_hashes: Vec<Vec<u8>>,
        include_subdomains: bool,
        expires_at: DateTime<Utc>,
    ) -> PinResult<&mut Self> {
        self.add_pin_request(PinRequest::new(
            host,
            pin_hashes,
            include_subdomains,
            expires_at,
        ))
    }

    /// Adds pins from a request whose arguments may be missing.
    pub fn add_pin_request(&mut self, request: PinRequest) -> PinResult<&mut Self> {
        self.pins.push(request.into_policy()?);
        Ok(self)
    }

    /// Returns the number of pin entries added so far.
    #[must_use]
    pub fn pin_count(&self) -> usize {
        self.pins.len()
    }

    /// Starts a new engine with a fresh store holding the builder's pins.
    #[must_use]
    pub fn build(&self) -> PinningEngine {
        let engine = PinningEngine::start(
            self.storage_path.clone(),
            self.bypass_local_trust_anchors,
        );
        // Later entries for the same host win, as with direct registration.
        for policy in &self.pins {
            engine.store.insert(policy.clone());
        }
        engine
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A pinning engine instance.
///
/// Registration and validation are synchronous and may be called from any
/// number of threads through a shared reference.
#[derive(Debug)]
pub struct PinningEngine {
    id: EngineId,
    storage_path: Option<PathBuf>,
    bypass_local_trust_anchors: bool,
    store: Arc<PinPolicyStore>,
    validator: PinValidator,
}

impl PinningEngine {
    /// Creates an engine from configuration.
    pub fn new(config: EngineConfig) -> ConfigResult<Self> {
        Ok(EngineBuilder::from_config(config)?.build())
    }

    /// Returns a builder with default settings.
    #[must_use]
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    fn start(storage_path: Option<PathBuf>, bypass_local_trust_anchors: bool) -> Self {
        let id = EngineId::new();
        let store = Arc::new(PinPolicyStore::new());
        info!(engine = %id, storage_path = ?storage_path, "pinning engine started");
        Self {
            id,
            storage_path,
            bypass_local_trust_anchors,
            validator: PinValidator::new(Arc::clone(&store)),
            store,
        }
    }

    /// Returns this instance's ID.
    #[must_use]
    pub fn id(&self) -> EngineId {
        self.id
    }

    /// Returns the configured storage directory.
    #[must_use]
    pub fn storage_path(&self) -> Option<&Path> {
        self.storage_path.as_deref()
    }

    /// Returns true if pins are skipped for locally installed roots.
    #[must_use]
    pub fn bypasses_local_trust_anchors(&self) -> bool {
        self.bypass_local_trust_anchors
    }

    /// Returns the engine's pin store.
    #[must_use]
    pub fn store(&self) -> &PinPolicyStore {
        &self.store
    }

    // ── Registration ─────────────────────────────────────────────

    /// Registers pins, replacing any existing pins for the same host.
    pub fn register(&self, request: PinRequest) -> PinResult<()> {
        self.store.register(request)
    }

    /// Registers pins with every argument present.
    pub fn add_public_key_pins(
        &self,
        host: &str,
        pin_hashes: Vec<Vec<u8>>,
        include_subdomains: bool,
        expires_at: DateTime<Utc>,
    ) -> PinResult<()> {
        self.register(PinRequest::new(
            host,
            pin_hashes,
            include_subdomains,
            expires_at,
        ))
    }

    /// Returns the number of hosts with registered pins.
    #[must_use]
    pub fn pin_count(&self) -> usize {
        self.store.len()
    }

    // ── Validation ───────────────────────────────────────────────

    /// Validates presented key digests for `host` at `now`.
    pub fn validate(
        &self,
        host: &str,
        presented: &[PinDigest],
        now: DateTime<Utc>,
    ) -> PinResult<ValidationOutcome> {
        self.validator.validate(host, presented, now)
    }

    /// Validates presented key digests for `host` at the current time.
    pub fn validate_now(
        &self,
        host: &str,
        presented: &[PinDigest],
    ) -> PinResult<ValidationOutcome> {
        self.validate(host, presented, Utc::now())
    }

    /// Checks a verified chain for the transport layer.
    ///
    /// A mismatch is returned as [`ConnectionError::PinnedKeyNotInCertChain`]
    /// so the connection is aborted rather than treated as unpinned.
    pub fn check_connection(
        &self,
        chain: &VerifiedChain,
        now: DateTime<Utc>,
    ) -> Result<ValidationOutcome, ConnectionError> {
        if !chain.is_issued_by_known_root && self.bypass_local_trust_anchors {
            let host = CanonicalHost::parse(&chain.host)?;
            let policy = self.store.lookup(&host);
            if let Some(policy) = policy.as_ref().filter(|p| p.is_active_at(now)) {
                warn!(
                    %host,
                    pinned_host = %policy.host(),
                    "chain ends in a local trust anchor, pins bypassed"
                );
            }
            return Ok(ValidationOutcome::Allowed { policy });
        }

        self.validate(&chain.host, &chain.spki_hashes, now)?
            .into_result()
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// Shuts the engine down, discarding every registered pin.
    pub fn shutdown(self) {
        let discarded = self.store.len();
        self.store.clear();
        info!(engine = %self.id, discarded, "pinning engine shut down");
    }
}
