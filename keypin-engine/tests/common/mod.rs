//! Shared test helpers for engine tests.

#![allow(dead_code)]

use chrono::{DateTime, Duration, Utc};
use keypin_engine::{EngineBuilder, PinningEngine};
use keypin_types::PinDigest;
use sha2::{Digest, Sha256};

pub const SERVER_HOST: &str = "test.example.com";
pub const DOMAIN: &str = "example.com";
pub const INCLUDE_SUBDOMAINS: bool = true;
pub const EXCLUDE_SUBDOMAINS: bool = false;

/// Digest of the key the test server presents.
pub fn server_key() -> PinDigest {
    PinDigest::from_bytes(Sha256::digest(b"test.example.com public key").into())
}

/// A digest that matches no presented key (32 bytes of 58).
pub fn some_sha256() -> Vec<u8> {
    vec![58u8; 32]
}

pub fn distant_future() -> DateTime<Utc> {
    Utc::now() + Duration::days(365 * 50)
}

pub fn seconds_from_now(secs: i64) -> DateTime<Utc> {
    Utc::now() + Duration::seconds(secs)
}

/// Builder with a single pin added.
pub fn builder_with_pin(
    host: &str,
    pin: Vec<u8>,
    include_subdomains: bool,
    expires_at: DateTime<Utc>,
) -> EngineBuilder {
    let mut builder = PinningEngine::builder();
    builder
        .add_public_key_pins(host, vec![pin], include_subdomains, expires_at)
        .unwrap();
    builder
}

/// Installs a test subscriber so engine logs show up with `--nocapture`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
