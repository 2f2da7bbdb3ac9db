//! Core type definitions for keypin.
//!
//! This crate defines the validated value types shared by the pin store and
//! the enforcement engine:
//! - Canonical host names (the lookup key of every pin policy)
//! - Fixed-length SPKI pin digests
//! - The error taxonomy surfaced to callers registering or validating pins
//!
//! Nothing here touches certificates or the network; callers hand in host
//! strings and digests computed elsewhere.

mod digest;
mod error;
mod host;

pub use digest::{PIN_DIGEST_LEN, PinDigest, SHA256_PIN_PREFIX};
pub use error::{HostNameError, PinError, PinResult};
pub use host::{Ancestors, CanonicalHost, MAX_HOST_LEN, MAX_LABEL_LEN};
