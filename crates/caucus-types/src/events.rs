//! The discriminated event union of the game protocol.
//!
//! Every record on the wire carries a `type` tag such as
//! `request.nominate` or `player.vote`. The union is internally tagged so
//! decoding dispatches on that tag and matching over [`Event`] is
//! exhaustive: adding a variant forces every consumer to handle it.
//!
//! Events fall into two roles. Broadcast events (`player.*`, `assert.*`,
//! `game.vote_results`) are relevant to every client. Addressed events
//! (`request.*`, `game.information`) carry a `playerID` naming their
//! recipient and must be filtered before being treated as local
//! obligations.

use serde::{Deserialize, Serialize};

use crate::enums::{ExecutiveAction, Party, Policy, PolicySource, RequestKind};
use crate::ids::{PlayerId, RoundId};
use crate::state::Player;

/// A server ask: the addressed player owes the server an action.
///
/// The token is single-use and must be echoed verbatim in the satisfying
/// submission; the server rejects stale or mismatched tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestEvent {
    /// The player being asked to act.
    #[serde(default, rename = "playerID")]
    pub player_id: PlayerId,
    /// The round this request belongs to.
    #[serde(default, rename = "roundID")]
    pub round_id: RoundId,
    /// Single-use token to echo back on submission.
    #[serde(default)]
    pub token: String,
    /// For legislate requests: whether this ask is itself a veto
    /// confirmation rather than a discard ask.
    #[serde(default)]
    pub veto: bool,
    /// For executive-action requests: which power is pending.
    #[serde(default, rename = "executiveAction", skip_serializing_if = "Option::is_none")]
    pub executive_action: Option<ExecutiveAction>,
    /// For legislate requests: the policies dealt to the player.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub policies: Vec<Policy>,
}

/// A private reveal addressed to one player: another player's party
/// (from an investigation) and/or a set of upcoming policies (from a
/// peek). Either field may be present; each present field obliges the
/// recipient to make a public claim about it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InformationEvent {
    /// The player receiving the private information.
    #[serde(default, rename = "playerID")]
    pub player_id: PlayerId,
    /// The round the information belongs to.
    #[serde(default, rename = "roundID")]
    pub round_id: RoundId,
    /// Token to echo on the follow-up assertion.
    #[serde(default)]
    pub token: String,
    /// The investigated player, when a party is revealed.
    #[serde(default, rename = "otherPlayerID", skip_serializing_if = "Option::is_none")]
    pub other_player_id: Option<PlayerId>,
    /// The revealed party, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub party: Option<Party>,
    /// The peeked policies, if any.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub policies: Vec<Policy>,
}

/// A player's public claim about private information they hold.
///
/// Claims are the social-deduction currency of the game: they may be
/// honest or not. The client drafts one per reveal and the player edits
/// the payload before publishing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertEvent {
    /// The player making the claim.
    #[serde(default, rename = "playerID")]
    pub player_id: PlayerId,
    /// The round the claim belongs to.
    #[serde(default, rename = "roundID")]
    pub round_id: RoundId,
    /// Token echoed from the reveal that obliged this claim.
    #[serde(default)]
    pub token: String,
    /// The player the claim is about, for party claims.
    #[serde(default, rename = "otherPlayerID", skip_serializing_if = "Option::is_none")]
    pub other_player_id: Option<PlayerId>,
    /// The claimed party, for party claims.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub party: Option<Party>,
    /// Which context produced the claimed policies.
    #[serde(default, rename = "policySource", skip_serializing_if = "Option::is_none")]
    pub policy_source: Option<PolicySource>,
    /// The claimed policies, for policy claims.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub policies: Vec<Policy>,
}

/// One player's ballot inside a vote result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ballot {
    /// The voter.
    #[serde(default, rename = "playerID")]
    pub player_id: PlayerId,
    /// `true` for ja, `false` for nein.
    #[serde(default)]
    pub vote: bool,
}

/// Aggregated ballots and the pass/fail outcome of an election.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteResultEvent {
    /// The round that was voted on.
    #[serde(default, rename = "roundID")]
    pub round_id: RoundId,
    /// Every cast ballot.
    #[serde(default)]
    pub votes: Vec<Ballot>,
    /// Whether the government was elected.
    #[serde(default)]
    pub succeeded: bool,
}

/// A lobby-phase action: join, ready, or acknowledge. Carries the
/// player record being announced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerEvent {
    /// The announced player state.
    #[serde(default)]
    pub player: Player,
}

/// An action by one player targeting another: nominate, investigate,
/// special-election, or execute.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerPlayerEvent {
    /// The acting player.
    #[serde(default, rename = "playerID")]
    pub player_id: PlayerId,
    /// The targeted player.
    #[serde(default, rename = "otherPlayerID")]
    pub other_player_id: PlayerId,
    /// Token echoed from the request that asked for this action.
    #[serde(default)]
    pub token: String,
}

/// A cast ballot submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerVoteEvent {
    /// The voting player.
    #[serde(default, rename = "playerID")]
    pub player_id: PlayerId,
    /// `true` for ja, `false` for nein.
    #[serde(default)]
    pub vote: bool,
    /// Token echoed from the vote request.
    #[serde(default)]
    pub token: String,
}

/// A legislation submission: discard one policy, or request a veto.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerLegislateEvent {
    /// The legislating player.
    #[serde(default, rename = "playerID")]
    pub player_id: PlayerId,
    /// The policy being discarded, absent on a veto request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discard: Option<Policy>,
    /// Whether this submission requests a veto instead of discarding.
    #[serde(default)]
    pub veto: bool,
    /// Token echoed from the legislate request.
    #[serde(default)]
    pub token: String,
}

/// The closed union of every event on the wire, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// A player joined the game.
    #[serde(rename = "player.join")]
    PlayerJoin(PlayerEvent),
    /// A player readied up in the lobby.
    #[serde(rename = "player.ready")]
    PlayerReady(PlayerEvent),
    /// A player acknowledged their dealt party and role.
    #[serde(rename = "player.acknowledge")]
    PlayerAcknowledge(PlayerEvent),
    /// The president nominated a chancellor.
    #[serde(rename = "player.nominate")]
    PlayerNominate(PlayerPlayerEvent),
    /// A player cast a ballot.
    #[serde(rename = "player.vote")]
    PlayerVote(PlayerVoteEvent),
    /// A legislator discarded a policy or requested a veto.
    #[serde(rename = "player.legislate")]
    PlayerLegislate(PlayerLegislateEvent),
    /// The president investigated a player's party.
    #[serde(rename = "player.investigate")]
    PlayerInvestigate(PlayerPlayerEvent),
    /// The president called a special election.
    #[serde(rename = "player.special_election")]
    PlayerSpecialElection(PlayerPlayerEvent),
    /// The president executed a player.
    #[serde(rename = "player.execute")]
    PlayerExecute(PlayerPlayerEvent),
    /// The server asks a player to acknowledge their role.
    #[serde(rename = "request.acknowledge")]
    RequestAcknowledge(RequestEvent),
    /// The server asks the president to nominate a chancellor.
    #[serde(rename = "request.nominate")]
    RequestNominate(RequestEvent),
    /// The server asks everyone to vote.
    #[serde(rename = "request.vote")]
    RequestVote(RequestEvent),
    /// The server asks a legislator to discard (or answer a veto).
    #[serde(rename = "request.legislate")]
    RequestLegislate(RequestEvent),
    /// The server asks the president to use an executive power.
    #[serde(rename = "request.executive_action")]
    RequestExecutiveAction(RequestEvent),
    /// A private reveal addressed to one player.
    #[serde(rename = "game.information")]
    GameInformation(InformationEvent),
    /// Aggregated ballots and the election outcome.
    #[serde(rename = "game.vote_results")]
    GameVoteResults(VoteResultEvent),
    /// A published claim about a player's party.
    #[serde(rename = "assert.party")]
    AssertParty(AssertEvent),
    /// A published claim about dealt or peeked policies.
    #[serde(rename = "assert.policies")]
    AssertPolicies(AssertEvent),
}

impl Event {
    /// The wire tag of this event, for logging.
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::PlayerJoin(_) => "player.join",
            Self::PlayerReady(_) => "player.ready",
            Self::PlayerAcknowledge(_) => "player.acknowledge",
            Self::PlayerNominate(_) => "player.nominate",
            Self::PlayerVote(_) => "player.vote",
            Self::PlayerLegislate(_) => "player.legislate",
            Self::PlayerInvestigate(_) => "player.investigate",
            Self::PlayerSpecialElection(_) => "player.special_election",
            Self::PlayerExecute(_) => "player.execute",
            Self::RequestAcknowledge(_) => "request.acknowledge",
            Self::RequestNominate(_) => "request.nominate",
            Self::RequestVote(_) => "request.vote",
            Self::RequestLegislate(_) => "request.legislate",
            Self::RequestExecutiveAction(_) => "request.executive_action",
            Self::GameInformation(_) => "game.information",
            Self::GameVoteResults(_) => "game.vote_results",
            Self::AssertParty(_) => "assert.party",
            Self::AssertPolicies(_) => "assert.policies",
        }
    }

    /// For request events, the kind of ask; `None` otherwise.
    pub const fn request_kind(&self) -> Option<RequestKind> {
        match self {
            Self::RequestAcknowledge(_) => Some(RequestKind::Acknowledge),
            Self::RequestNominate(_) => Some(RequestKind::Nominate),
            Self::RequestVote(_) => Some(RequestKind::Vote),
            Self::RequestLegislate(_) => Some(RequestKind::Legislate),
            Self::RequestExecutiveAction(_) => Some(RequestKind::ExecutiveAction),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_legislate_decodes_by_tag() {
        let json = serde_json::json!({
            "type": "request.legislate",
            "playerID": "p3",
            "roundID": 2,
            "token": "tok-9",
            "policies": ["fascist", "fascist"]
        });
        let event: Result<Event, _> = serde_json::from_value(json);
        assert!(
            matches!(event, Ok(Event::RequestLegislate(_))),
            "expected request.legislate, got {event:?}"
        );
        if let Ok(Event::RequestLegislate(req)) = event {
            assert_eq!(req.player_id, PlayerId::from("p3"));
            assert_eq!(req.round_id, RoundId(2));
            assert_eq!(req.token, "tok-9");
            assert!(!req.veto);
            assert_eq!(req.policies, vec![Policy::Fascist, Policy::Fascist]);
        }
    }

    #[test]
    fn assert_event_roundtrips_with_tag() {
        let original = Event::AssertPolicies(AssertEvent {
            player_id: PlayerId::from("me"),
            round_id: RoundId(5),
            token: "t".to_owned(),
            policy_source: Some(PolicySource::Legislating),
            policies: vec![Policy::Liberal, Policy::Fascist],
            ..AssertEvent::default()
        });
        let json = serde_json::to_value(&original).unwrap_or_default();
        assert_eq!(
            json.get("type").and_then(serde_json::Value::as_str),
            Some("assert.policies")
        );
        let back: Result<Event, _> = serde_json::from_value(json);
        assert_eq!(back.ok(), Some(original));
    }

    #[test]
    fn unknown_tag_is_a_decode_error() {
        let json = serde_json::json!({"type": "game.unknown", "playerID": "p1"});
        let event: Result<Event, _> = serde_json::from_value(json);
        assert!(event.is_err());
    }

    #[test]
    fn vote_results_decode_ballots() {
        let json = serde_json::json!({
            "type": "game.vote_results",
            "votes": [
                {"playerID": "P1", "vote": true},
                {"playerID": "P2", "vote": false}
            ],
            "succeeded": false
        });
        let event: Result<Event, _> = serde_json::from_value(json);
        assert!(
            matches!(event, Ok(Event::GameVoteResults(_))),
            "expected game.vote_results, got {event:?}"
        );
        if let Ok(Event::GameVoteResults(vr)) = event {
            assert_eq!(vr.votes.len(), 2);
            assert!(!vr.succeeded);
        }
    }

    #[test]
    fn request_kind_covers_all_requests() {
        let req = RequestEvent::default();
        assert_eq!(
            Event::RequestVote(req.clone()).request_kind(),
            Some(RequestKind::Vote)
        );
        assert_eq!(
            Event::RequestExecutiveAction(req).request_kind(),
            Some(RequestKind::ExecutiveAction)
        );
        assert_eq!(
            Event::GameVoteResults(VoteResultEvent::default()).request_kind(),
            None
        );
    }
}
