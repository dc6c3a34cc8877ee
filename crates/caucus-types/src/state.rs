//! Game snapshot structs.
//!
//! A [`Game`] is a complete, authoritative point-in-time description of
//! game state pushed by the server. The client never mutates snapshots;
//! it only appends successive ones to its history. Every field defaults,
//! since the server omits anything the local player is not allowed to
//! see (secret roles, face-down cards).

use serde::{Deserialize, Serialize};

use crate::enums::{GameState, Party, Policy, Role, RoundState};
use crate::ids::{PlayerId, RoundId};

/// One seated player as the server reveals them to the local client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Server-issued player identifier.
    #[serde(default)]
    pub id: PlayerId,
    /// Party affiliation, if known to the local player.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub party: Option<Party>,
    /// Secret role, if known to the local player.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    /// Whether the player has readied up in the lobby.
    #[serde(default)]
    pub ready: bool,
    /// Whether the player has acknowledged their dealt party/role.
    #[serde(default)]
    pub ack: bool,
    /// The president who executed this player, if any.
    #[serde(default, rename = "executedBy", skip_serializing_if = "Option::is_none")]
    pub executed_by: Option<PlayerId>,
}

/// The current president/chancellor cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    /// Sequential round identifier.
    #[serde(default)]
    pub id: RoundId,
    /// The sitting president, once nominated.
    #[serde(default, rename = "presidentID", skip_serializing_if = "Option::is_none")]
    pub president_id: Option<PlayerId>,
    /// The nominated chancellor, once chosen.
    #[serde(default, rename = "chancellorID", skip_serializing_if = "Option::is_none")]
    pub chancellor_id: Option<PlayerId>,
    /// Phase of the round, absent before the game starts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<RoundState>,
    /// Policies currently in play during legislation (masked for
    /// everyone but the holder).
    #[serde(default)]
    pub policies: Vec<Policy>,
}

/// A full game-state snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    /// Server-issued game identifier.
    #[serde(default)]
    pub id: String,
    /// Overall lifecycle state.
    #[serde(default)]
    pub state: GameState,
    /// Seated players, in table order.
    #[serde(default)]
    pub players: Vec<Player>,
    /// Count of enacted liberal policies.
    #[serde(default)]
    pub liberal: u8,
    /// Count of enacted fascist policies.
    #[serde(default)]
    pub fascist: u8,
    /// Consecutive failed elections.
    #[serde(default, rename = "electionTracker")]
    pub election_tracker: u8,
    /// Draw pile; contents masked except where revealed.
    #[serde(default)]
    pub draw: Vec<Policy>,
    /// Discard pile; contents masked except where revealed.
    #[serde(default)]
    pub discard: Vec<Policy>,
    /// The current round.
    #[serde(default)]
    pub round: Round,
    /// The winning faction, once the game is decided.
    #[serde(default, rename = "winningParty", skip_serializing_if = "Option::is_none")]
    pub winning_party: Option<Party>,
}

impl Game {
    /// Find a seated player by id.
    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == *id)
    }
}
