//! Public key pin policy store.
//!
//! Holds the per-host pin policies registered on one engine instance and
//! answers "which policy governs this host?" using exact-match-first,
//! then nearest `include_subdomains` ancestor.
//!
//! The store is memory only. Expiration is not considered here; an expired
//! policy is still returned by [`PinPolicyStore::lookup`] and it is up to
//! the validator to treat it as inactive.
//!
//! # Example
//!
//! ```
//! use chrono::{Duration, Utc};
//! use keypin_store::{PinPolicyStore, PinRequest};
//! use keypin_types::CanonicalHost;
//!
//! let store = PinPolicyStore::new();
//! store
//!     .register(PinRequest::new(
//!         "example.com",
//!         vec![vec![7u8; 32]],
//!         true,
//!         Utc::now() + Duration::days(30),
//!     ))
//!     .unwrap();
//!
//! let host = CanonicalHost::parse("api.example.com").unwrap();
//! assert!(store.lookup(&host).is_some());
//! ```

mod policy;
mod store;

pub use policy::{PinPolicy, PinRequest};
pub use store::PinPolicyStore;
