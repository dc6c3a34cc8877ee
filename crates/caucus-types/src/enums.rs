//! Enumeration types for the game protocol.
//!
//! Wire values are the lowercase strings the server uses; the `Display`
//! impls render the same strings so transcript lines read exactly like
//! the wire vocabulary.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Factions and policies
// ---------------------------------------------------------------------------

/// A party affiliation: the faction a player belongs to, or the faction a
/// player publicly claims someone belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Party {
    /// The liberal faction.
    #[serde(rename = "liberal")]
    Liberal,
    /// The fascist faction.
    #[serde(rename = "fascist")]
    Fascist,
}

impl core::fmt::Display for Party {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Liberal => write!(f, "liberal"),
            Self::Fascist => write!(f, "fascist"),
        }
    }
}

/// A policy card. The server masks cards the local player is not allowed
/// to see, which decode as [`Policy::Hidden`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Policy {
    /// A liberal policy card.
    #[serde(rename = "liberal")]
    Liberal,
    /// A fascist policy card.
    #[serde(rename = "fascist")]
    Fascist,
    /// A face-down card (empty string on the wire).
    #[serde(rename = "")]
    Hidden,
}

impl core::fmt::Display for Policy {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Liberal => write!(f, "liberal"),
            Self::Fascist => write!(f, "fascist"),
            Self::Hidden => write!(f, "unknown"),
        }
    }
}

/// A secret role. Every fascist-party player is either a plain fascist or
/// the hidden leader the liberals are hunting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Liberal role.
    #[serde(rename = "liberal")]
    Liberal,
    /// Plain fascist role.
    #[serde(rename = "fascist")]
    Fascist,
    /// The hidden fascist leader.
    #[serde(rename = "hitler")]
    Hitler,
}

// ---------------------------------------------------------------------------
// Game and round lifecycle
// ---------------------------------------------------------------------------

/// Overall lifecycle state of a game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameState {
    /// Players are joining and readying up.
    #[default]
    #[serde(rename = "lobby")]
    Lobby,
    /// Roles have been dealt; players must acknowledge them.
    #[serde(rename = "init")]
    Init,
    /// Rounds are underway.
    #[serde(rename = "started")]
    Started,
    /// A faction has won.
    #[serde(rename = "finished")]
    Finished,
}

/// Phase of the current round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundState {
    /// The president is choosing a chancellor.
    #[serde(rename = "nominating")]
    Nominating,
    /// Everyone is voting on the proposed government.
    #[serde(rename = "voting")]
    Voting,
    /// President and chancellor are discarding policies.
    #[serde(rename = "legislating")]
    Legislating,
    /// The president owes an executive action.
    #[serde(rename = "executive_action")]
    ExecutiveAction,
    /// The round is complete.
    #[serde(rename = "finished")]
    Finished,
}

/// An executive power unlocked by enacted fascist policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExecutiveAction {
    /// Inspect another player's party membership.
    #[serde(rename = "investigate")]
    Investigate,
    /// Look at the top three cards of the draw pile.
    #[serde(rename = "peek")]
    Peek,
    /// Choose the next presidential candidate.
    #[serde(rename = "special_election")]
    SpecialElection,
    /// Execute another player.
    #[serde(rename = "execute")]
    Execute,
}

impl core::fmt::Display for ExecutiveAction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Investigate => write!(f, "investigate"),
            Self::Peek => write!(f, "peek"),
            Self::SpecialElection => write!(f, "special_election"),
            Self::Execute => write!(f, "execute"),
        }
    }
}

/// Which game context produced a set of policies being claimed about.
///
/// Legislating claims describe cards a player was dealt; peek claims
/// describe cards observed on top of the draw pile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PolicySource {
    /// The policies were dealt during legislation.
    #[serde(rename = "legislating")]
    Legislating,
    /// The policies were peeked via the executive action.
    #[serde(rename = "peek")]
    Peek,
}

// ---------------------------------------------------------------------------
// Client-side discriminators
// ---------------------------------------------------------------------------

/// The kind of a pending server request, derived from the event union.
///
/// Not a wire type: used locally to match a pending request against the
/// command or broadcast event that satisfies it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    /// Acknowledge the dealt party and role.
    Acknowledge,
    /// Nominate a chancellor.
    Nominate,
    /// Vote on the proposed government.
    Vote,
    /// Discard a policy or answer a veto ask.
    Legislate,
    /// Perform an executive action.
    ExecutiveAction,
}

/// The kind of an assertion draft awaiting the local player's input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssertKind {
    /// A claim about another player's party.
    Party,
    /// A claim about dealt or peeked policies.
    Policies,
}
