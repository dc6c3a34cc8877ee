//! Identifier wrappers for server-issued ids.
//!
//! The server is the sole issuer of identifiers; the client only carries
//! them around. Player ids are opaque strings, round ids are sequential
//! integers. Wrapping them in newtypes prevents accidental mixing at
//! compile time.

use serde::{Deserialize, Serialize};

/// Identifier of a player, assigned by the server at account creation.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub String);

impl PlayerId {
    /// Wrap a raw server-issued identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// View the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the identifier is the empty (unset) value.
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl core::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for PlayerId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Identifier of one president/chancellor round.
///
/// Zero until the first round begins; the server increments it each
/// election cycle. Assertion drafts are confirmed against this id, so it
/// must survive the receive-edit-submit path unmodified.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RoundId(pub i64);

impl RoundId {
    /// Return the inner integer value.
    pub const fn into_inner(self) -> i64 {
        self.0
    }
}

impl core::fmt::Display for RoundId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for RoundId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}
