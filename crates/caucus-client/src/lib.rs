//! Client runtime for a hidden-role deduction game.
//!
//! Connects to a game server's line-framed event stream and maintains
//! three things for a frontend to render:
//!
//! - a [`history::HistoryLog`] of full game snapshots with a browsable
//!   cursor;
//! - an obligation [`reducer::ObligationState`]: the one action the
//!   server currently awaits, plus a FIFO queue of honesty claims owed
//!   after private reveals;
//! - a bounded [`transcript::Transcript`] of display lines.
//!
//! [`session::Session`] is the single entry point: it owns all of the
//! above, drains the stream via [`session::Session::pump`], and turns
//! typed [`command::Command`]s into validated wire submissions.
//!
//! The crate is frontend-agnostic: no terminal or rendering code lives
//! here. Obligations and commands are small synchronous state machines;
//! only the stream and the submitter touch the network.

pub mod auth;
pub mod command;
pub mod config;
pub mod error;
pub mod history;
pub mod logging;
pub mod reducer;
pub mod session;
pub mod stream;
pub mod submit;
pub mod transcript;

pub use command::{Command, LegislateChoice};
pub use config::SessionConfig;
pub use error::ClientError;
pub use history::HistoryLog;
pub use reducer::{ObligationState, PendingAssertion, PendingRequest};
pub use session::Session;
pub use stream::{DecodeStats, EventStream, StreamRecord};
pub use submit::Submitter;
pub use transcript::Transcript;
