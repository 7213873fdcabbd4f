//! Newtype wrapper for listing identities.
//!
//! The full identity is authoritative everywhere; the short form is only a
//! human-readable reference printed on standees and used in file names.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Number of characters in the human-readable short identity.
pub const SHORT_ID_LEN: usize = 8;

/// The stable, never-reused identity of a listing.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListingId(Arc<str>);

impl ListingId {
    /// Creates a new ListingId from a string
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    /// Returns the string representation of this identity
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The first [`SHORT_ID_LEN`] characters of the identity, or the whole
    /// identity when it is shorter.
    ///
    /// Truncation is by character, so a multi-byte code point is never split.
    /// The prefix is not guaranteed to be unique.
    pub fn short(&self) -> &str {
        match self.0.char_indices().nth(SHORT_ID_LEN) {
            Some((byte_idx, _)) => &self.0[..byte_idx],
            None => &self.0,
        }
    }
}

impl Default for ListingId {
    fn default() -> Self {
        ListingId::new("")
    }
}

impl From<String> for ListingId {
    fn from(s: String) -> Self {
        Self(s.into())
    }
}

impl From<&str> for ListingId {
    fn from(s: &str) -> Self {
        Self(s.into())
    }
}

impl AsRef<str> for ListingId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
