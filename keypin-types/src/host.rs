//! Host name canonicalization.
//!
//! Pins are keyed by host name, never by address. A raw host string is
//! accepted only if it is a plain DNS-style name: dot-separated labels, no
//! scheme, port or path, and not something that looks like an IP literal.
//! ASCII letters are folded to lower case; non-ASCII labels are kept as-is.

use crate::error::{HostNameError, PinError, PinResult};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

/// Maximum host name length in characters (without the trailing dot).
pub const MAX_HOST_LEN: usize = 255;

/// Maximum length of a single label in characters.
pub const MAX_LABEL_LEN: usize = 63;

/// A validated, case-folded host name.
///
/// Equality and hashing are on the canonical form, so `Example.COM` and
/// `example.com.` name the same host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct CanonicalHost(String);

impl CanonicalHost {
    /// Validates and canonicalizes a raw host name.
    pub fn parse(raw: &str) -> PinResult<Self> {
        canonicalize(raw)
            .map(Self)
            .map_err(|reason| PinError::InvalidHostName {
                host: raw.to_string(),
                reason,
            })
    }

    /// Returns the canonical host string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Iterates over the strict parent domains, nearest first.
    ///
    /// For `a.b.example.com` this yields `b.example.com`, `example.com`
    /// and `com`. A single-label host has no ancestors.
    #[must_use]
    pub fn ancestors(&self) -> Ancestors<'_> {
        Ancestors { rest: &self.0 }
    }

    /// Returns true if `self` is a strict subdomain of `parent`.
    #[must_use]
    pub fn is_subdomain_of(&self, parent: &CanonicalHost) -> bool {
        self.ancestors().any(|a| a == parent.as_str())
    }
}

/// Iterator over the parent domains of a [`CanonicalHost`].
#[derive(Debug, Clone)]
pub struct Ancestors<'a> {
    rest: &'a str,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let (_, parent) = self.rest.split_once('.')?;
        self.rest = parent;
        Some(parent)
    }
}

fn canonicalize(raw: &str) -> Result<String, HostNameError> {
    let host = raw.strip_suffix('.').unwrap_or(raw);
    if host.is_empty() {
        return Err(HostNameError::Empty);
    }

    // Only letters, digits, `-`, `_` and `.` among ASCII. This also keeps
    // out scheme separators, ports, paths, userinfo and wildcards.
    if let Some(c) = host.chars().find(|&c| is_forbidden(c)) {
        return Err(HostNameError::ForbiddenCharacter(c));
    }

    let len = host.chars().count();
    if len > MAX_HOST_LEN {
        return Err(HostNameError::TooLong(len));
    }

    for label in host.split('.') {
        check_label(label)?;
    }

    // Anything made only of digits and dots is treated as an IPv4 literal,
    // including short or out-of-range forms like `127.0.0` or `256.0.0.1`.
    if host.bytes().all(|b| b.is_ascii_digit() || b == b'.') {
        return Err(HostNameError::IpAddress);
    }

    Ok(host.to_ascii_lowercase())
}

fn check_label(label: &str) -> Result<(), HostNameError> {
    let len = label.chars().count();
    if len == 0 {
        return Err(HostNameError::EmptyLabel);
    }
    if len > MAX_LABEL_LEN {
        return Err(HostNameError::LabelTooLong {
            label: label.to_string(),
            len,
        });
    }
    if label.starts_with('-') {
        return Err(HostNameError::LeadingHyphen(label.to_string()));
    }
    if label.ends_with('-') {
        return Err(HostNameError::TrailingHyphen(label.to_string()));
    }
    if label.starts_with('_') {
        return Err(HostNameError::LeadingUnderscore(label.to_string()));
    }
    Ok(())
}

fn is_forbidden(c: char) -> bool {
    if c.is_ascii() {
        !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    } else {
        c.is_whitespace() || c.is_control()
    }
}

impl fmt::Display for CanonicalHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CanonicalHost {
    type Err = PinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for CanonicalHost {
    type Error = PinError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl TryFrom<String> for CanonicalHost {
    type Error = PinError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CanonicalHost> for String {
    fn from(host: CanonicalHost) -> Self {
        host.0
    }
}

impl AsRef<str> for CanonicalHost {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for CanonicalHost {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_dot_is_dropped_once() {
        assert_eq!(canonicalize("example.com.").unwrap(), "example.com");
        assert_eq!(canonicalize("example.com.."), Err(HostNameError::EmptyLabel));
    }

    #[test]
    fn ancestors_of_single_label_is_empty() {
        let host = CanonicalHost::parse("localhost").unwrap();
        assert_eq!(host.ancestors().count(), 0);
    }

    #[test]
    fn forbidden_character_is_reported() {
        assert_eq!(
            canonicalize("domain.com:443"),
            Err(HostNameError::ForbiddenCharacter(':'))
        );
        assert_eq!(
            canonicalize("*.example.com"),
            Err(HostNameError::ForbiddenCharacter('*'))
        );
    }
}
