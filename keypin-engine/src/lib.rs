//! Public key pinning enforcement engine.
//!
//! Applications register, per host, the set of public key digests a TLS
//! chain must contain. After the transport has verified a certificate
//! chain it asks the engine whether the chain's keys satisfy the pins for
//! the connection's host.
//!
//! # Components
//!
//! - **Config**: engine settings and pre-declared pins, loadable from JSON
//! - **Validator**: the allow/deny decision for one connection
//! - **Engine**: owns one pin store per instance; nothing is persisted
//!
//! # Example
//!
//! ```
//! use chrono::{Duration, Utc};
//! use keypin_engine::PinningEngine;
//! use keypin_types::PinDigest;
//!
//! let mut builder = PinningEngine::builder();
//! builder
//!     .add_public_key_pins("example.com", vec![vec![1u8; 32]], true, Utc::now() + Duration::days(60))
//!     .unwrap();
//! let engine = builder.build();
//!
//! let good = PinDigest::from_bytes([1u8; 32]);
//! let bad = PinDigest::from_bytes([2u8; 32]);
//! assert!(engine.validate_now("api.example.com", &[good]).unwrap().is_allowed());
//! assert!(engine.validate_now("api.example.com", &[bad]).unwrap().is_mismatch());
//! ```

mod config;
mod engine;
mod error;
mod outcome;
mod validator;

pub use config::{EngineConfig, PinConfig};
pub use engine::{EngineBuilder, EngineId, PinningEngine};
pub use error::{
    ConfigError, ConfigResult, ConnectionError, ERR_INVALID_ARGUMENT,
    ERR_SSL_PINNED_KEY_NOT_IN_CERT_CHAIN,
};
pub use outcome::{ValidationOutcome, VerifiedChain};
pub use validator::PinValidator;
