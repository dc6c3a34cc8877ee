//! Shared wire types for the caucus game client.
//!
//! This crate is the single source of truth for everything that crosses
//! the wire between the client and the game server: the tagged event
//! union, the full game-state snapshot, and the enums and identifiers
//! they are built from. Pure data; behavior lives in `caucus-client`.
//!
//! # Modules
//!
//! - [`ids`] -- Newtype wrappers for server-issued identifiers
//! - [`enums`] -- Factions, policies, lifecycle states, discriminators
//! - [`state`] -- Game snapshot structs
//! - [`events`] -- The discriminated event union

pub mod enums;
pub mod events;
pub mod ids;
pub mod state;

// Re-export all public types at crate root for convenience.
pub use enums::{
    AssertKind, ExecutiveAction, GameState, Party, Policy, PolicySource, RequestKind, Role,
    RoundState,
};
pub use events::{
    AssertEvent, Ballot, Event, InformationEvent, PlayerEvent, PlayerLegislateEvent,
    PlayerPlayerEvent, PlayerVoteEvent, RequestEvent, VoteResultEvent,
};
pub use ids::{PlayerId, RoundId};
pub use state::{Game, Player, Round};
