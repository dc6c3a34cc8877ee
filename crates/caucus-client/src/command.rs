//! Candidate commands and wire-event construction.
//!
//! A [`Command`] is the typed intent the input adapter hands us. Every
//! constructor here validates the command against the current obligation
//! before building a wire event -- a mismatch is rejected locally,
//! before any network call, and never mutates obligation state. Tokens
//! are echoed verbatim from the request that asked for the action.

use caucus_types::{
    AssertKind, Event, ExecutiveAction, Game, GameState, Party, PlayerEvent, PlayerId,
    PlayerLegislateEvent, PlayerPlayerEvent, PlayerVoteEvent, Policy, RequestKind,
};

use crate::error::ClientError;
use crate::reducer::{PendingAssertion, PendingRequest};

/// What to do with the dealt policies during legislation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegislateChoice {
    /// Discard a liberal policy.
    DiscardLiberal,
    /// Discard a fascist policy.
    DiscardFascist,
    /// Request a veto instead of discarding.
    Veto,
}

/// A typed candidate command from the input adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Join the game (lobby).
    Join,
    /// Ready up (lobby).
    Ready,
    /// Acknowledge the dealt party and role (init phase).
    Acknowledge,
    /// Pick the player at this seat index as the target of the pending
    /// nominate or executive-action request. Out-of-range indices clamp
    /// to the last seat.
    SelectPlayer(usize),
    /// Answer the pending vote request.
    Vote(bool),
    /// Answer the pending legislate request.
    Legislate(LegislateChoice),
    /// Set the claimed party on the assertion-queue head and publish it.
    ClaimParty(Party),
    /// Set the claimed liberal-policy count on the queue head and
    /// publish it. Position-sensitive: `n` liberals first, fascists
    /// after.
    ClaimPolicies(u8),
}

/// Clamp a seat index to the seated player range.
pub const fn clamp_target(index: usize, player_count: usize) -> usize {
    let last = player_count.saturating_sub(1);
    if index > last { last } else { index }
}

/// Encode a liberal count as a positional policy list: the first
/// `liberal_count` slots are liberal, the rest fascist.
pub fn liberal_first_policies(len: usize, liberal_count: u8) -> Vec<Policy> {
    (0..len)
        .map(|i| {
            if i < usize::from(liberal_count) {
                Policy::Liberal
            } else {
                Policy::Fascist
            }
        })
        .collect()
}

/// Build the join announcement.
pub fn join_event(me: &PlayerId) -> Event {
    Event::PlayerJoin(PlayerEvent {
        player: caucus_types::Player {
            id: me.clone(),
            ..caucus_types::Player::default()
        },
    })
}

/// Build the ready announcement.
pub fn ready_event(me: &PlayerId) -> Event {
    Event::PlayerReady(PlayerEvent {
        player: caucus_types::Player {
            id: me.clone(),
            ready: true,
            ..caucus_types::Player::default()
        },
    })
}

/// Build the role acknowledgement, echoing the party/role the latest
/// snapshot revealed to us. Only valid while the game is initializing.
pub fn acknowledge_event(game: &Game, me: &PlayerId) -> Result<Event, ClientError> {
    if game.state != GameState::Init {
        return Err(ClientError::ObligationMismatch(
            "game is not awaiting acknowledgements".to_owned(),
        ));
    }
    let seat = game.player(me).ok_or_else(|| {
        ClientError::ObligationMismatch("local player not seated in this game".to_owned())
    })?;
    Ok(Event::PlayerAcknowledge(PlayerEvent {
        player: caucus_types::Player {
            id: me.clone(),
            party: seat.party,
            role: seat.role,
            ..caucus_types::Player::default()
        },
    }))
}

/// Build the wire event satisfying the open pending request.
///
/// # Errors
///
/// Returns [`ClientError::ObligationMismatch`] when the command does not
/// answer the pending request's kind, or when a target is required but
/// the snapshot has no seats.
pub fn action_event(
    command: Command,
    pending: &PendingRequest,
    game: &Game,
    me: &PlayerId,
) -> Result<Event, ClientError> {
    match command {
        Command::SelectPlayer(index) => target_event(index, pending, game, me),
        Command::Vote(ballot) => {
            if pending.kind != RequestKind::Vote {
                return Err(mismatch("vote", pending.kind));
            }
            Ok(Event::PlayerVote(PlayerVoteEvent {
                player_id: me.clone(),
                vote: ballot,
                token: pending.request.token.clone(),
            }))
        }
        Command::Legislate(choice) => {
            if pending.kind != RequestKind::Legislate {
                return Err(mismatch("legislate", pending.kind));
            }
            let (discard, veto) = match choice {
                LegislateChoice::DiscardLiberal => (Some(Policy::Liberal), false),
                LegislateChoice::DiscardFascist => (Some(Policy::Fascist), false),
                LegislateChoice::Veto => (None, true),
            };
            Ok(Event::PlayerLegislate(PlayerLegislateEvent {
                player_id: me.clone(),
                discard,
                veto,
                token: pending.request.token.clone(),
            }))
        }
        Command::Join
        | Command::Ready
        | Command::Acknowledge
        | Command::ClaimParty(_)
        | Command::ClaimPolicies(_) => Err(ClientError::ObligationMismatch(
            "command does not answer a pending request".to_owned(),
        )),
    }
}

/// Resolve a seat selection against the pending request kind.
fn target_event(
    index: usize,
    pending: &PendingRequest,
    game: &Game,
    me: &PlayerId,
) -> Result<Event, ClientError> {
    let clamped = clamp_target(index, game.players.len());
    let target = game.players.get(clamped).ok_or_else(|| {
        ClientError::ObligationMismatch("no players in the current snapshot".to_owned())
    })?;
    let payload = PlayerPlayerEvent {
        player_id: me.clone(),
        other_player_id: target.id.clone(),
        token: pending.request.token.clone(),
    };
    match pending.kind {
        RequestKind::Nominate => Ok(Event::PlayerNominate(payload)),
        RequestKind::ExecutiveAction => match pending.request.executive_action {
            Some(ExecutiveAction::Investigate) => Ok(Event::PlayerInvestigate(payload)),
            Some(ExecutiveAction::SpecialElection) => Ok(Event::PlayerSpecialElection(payload)),
            Some(ExecutiveAction::Execute) => Ok(Event::PlayerExecute(payload)),
            Some(ExecutiveAction::Peek) | None => Err(ClientError::ObligationMismatch(
                "pending executive action takes no target".to_owned(),
            )),
        },
        kind => Err(mismatch("target selection", kind)),
    }
}

/// Edit the assertion-queue head per the claim command and build the
/// publishable event. The edit persists even if the submission later
/// fails, so the draft redisplays as last entered.
pub fn apply_claim(
    head: &mut PendingAssertion,
    command: Command,
) -> Result<Event, ClientError> {
    match (command, head.kind) {
        (Command::ClaimParty(party), AssertKind::Party) => {
            head.claim.party = Some(party);
            Ok(Event::AssertParty(head.claim.clone()))
        }
        (Command::ClaimPolicies(count), AssertKind::Policies) => {
            head.claim.policies = liberal_first_policies(head.claim.policies.len(), count);
            Ok(Event::AssertPolicies(head.claim.clone()))
        }
        (Command::ClaimParty(_), AssertKind::Policies) => Err(ClientError::ObligationMismatch(
            "queue head expects a policy claim, not a party claim".to_owned(),
        )),
        (Command::ClaimPolicies(_), AssertKind::Party) => Err(ClientError::ObligationMismatch(
            "queue head expects a party claim, not a policy claim".to_owned(),
        )),
        _ => Err(ClientError::ObligationMismatch(
            "command is not an assertion edit".to_owned(),
        )),
    }
}

fn mismatch(wanted: &str, have: RequestKind) -> ClientError {
    ClientError::ObligationMismatch(format!(
        "{wanted} command does not match pending {have:?} request"
    ))
}
