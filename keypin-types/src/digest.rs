//! SPKI pin digests.
//!
//! A pin is the SHA-256 hash of a certificate's Subject Public Key Info.
//! The textual form follows HPKP: `sha256/` followed by the standard
//! base64 encoding of the 32 digest bytes.

use crate::error::{PinError, PinResult};
use base64::{Engine, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Size of a pin digest in bytes (SHA-256).
pub const PIN_DIGEST_LEN: usize = 32;

/// Prefix of the textual pin form.
pub const SHA256_PIN_PREFIX: &str = "sha256/";

/// A SHA-256 digest of a public key, used as the unit of pin comparison.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct PinDigest([u8; PIN_DIGEST_LEN]);

impl PinDigest {
    /// Creates a digest from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; PIN_DIGEST_LEN]) -> Self {
        Self(bytes)
    }

    /// Creates a digest from a byte slice, rejecting any other length.
    ///
    /// SHA-1 sized (20 byte) values are the common mistake this catches.
    pub fn from_slice(bytes: &[u8]) -> PinResult<Self> {
        let arr: [u8; PIN_DIGEST_LEN] = bytes.try_into().map_err(|_| {
            PinError::InvalidPinFormat(format!(
                "expected {PIN_DIGEST_LEN}-byte SHA-256 digest, got {} bytes",
                bytes.len()
            ))
        })?;
        Ok(Self(arr))
    }

    /// Parses the `sha256/<base64>` form.
    pub fn parse_pin(s: &str) -> PinResult<Self> {
        let encoded = s.strip_prefix(SHA256_PIN_PREFIX).ok_or_else(|| {
            PinError::InvalidPinFormat(format!("pin must start with {SHA256_PIN_PREFIX:?}"))
        })?;
        let bytes = STANDARD
            .decode(encoded)
            .map_err(|e| PinError::InvalidPinFormat(format!("invalid base64: {e}")))?;
        Self::from_slice(&bytes)
    }

    /// Returns the digest bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; PIN_DIGEST_LEN] {
        &self.0
    }

    /// Returns the `sha256/<base64>` form.
    #[must_use]
    pub fn to_pin_string(&self) -> String {
        format!("{SHA256_PIN_PREFIX}{}", STANDARD.encode(self.0))
    }
}

impl fmt::Display for PinDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_pin_string())
    }
}

impl fmt::Debug for PinDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PinDigest({})", hex::encode(self.0))
    }
}

impl FromStr for PinDigest {
    type Err = PinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_pin(s)
    }
}

impl TryFrom<&[u8]> for PinDigest {
    type Error = PinError;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        Self::from_slice(value)
    }
}

impl TryFrom<String> for PinDigest {
    type Error = PinError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse_pin(&value)
    }
}

impl From<PinDigest> for String {
    fn from(digest: PinDigest) -> Self {
        digest.to_pin_string()
    }
}

impl From<[u8; PIN_DIGEST_LEN]> for PinDigest {
    fn from(bytes: [u8; PIN_DIGEST_LEN]) -> Self {
        Self(bytes)
    }
}
