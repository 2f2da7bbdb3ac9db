//! Error types for pin registration and host validation.

use thiserror::Error;

/// Result type for pin operations.
pub type PinResult<T> = Result<T, PinError>;

/// Errors raised while registering or validating pins.
///
/// All variants describe caller input problems. A pin mismatch on a live
/// connection is a validation outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PinError {
    /// The host name is syntactically invalid or an IP literal.
    #[error("invalid host name {host:?}: {reason}")]
    InvalidHostName {
        /// The host name as supplied by the caller.
        host: String,
        /// Which rule the host name broke.
        #[source]
        reason: HostNameError,
    },

    /// A pin digest is not a SHA-256 sized value, or the pin set is empty.
    #[error("invalid pin format: {0}")]
    InvalidPinFormat(String),

    /// A mandatory argument was not provided.
    #[error("required argument `{0}` is missing")]
    NullArgument(&'static str),
}

impl PinError {
    /// Returns true if this error was caused by a bad host name.
    #[must_use]
    pub fn is_invalid_host(&self) -> bool {
        matches!(self, Self::InvalidHostName { .. })
    }
}

/// The specific rule a rejected host name violated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostNameError {
    #[error("host name is empty")]
    Empty,

    #[error("host name is {0} characters long (max 255)")]
    TooLong(usize),

    #[error("host name contains an empty label")]
    EmptyLabel,

    #[error("label {label:?} is {len} characters long (max 63)")]
    LabelTooLong { label: String, len: usize },

    #[error("label {0:?} starts with a hyphen")]
    LeadingHyphen(String),

    #[error("label {0:?} ends with a hyphen")]
    TrailingHyphen(String),

    #[error("label {0:?} starts with an underscore")]
    LeadingUnderscore(String),

    #[error("character {0:?} is not allowed in a host name")]
    ForbiddenCharacter(char),

    #[error("IP addresses cannot be pinned")]
    IpAddress,
}
