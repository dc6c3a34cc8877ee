//! The obligation reducer: from event stream to "what do I owe".
//!
//! Consumes the event sequence in server-send order and maintains two
//! derived values for the local player:
//!
//! - the single outstanding [`PendingRequest`] -- what the server is
//!   currently waiting on, at most one at a time;
//! - the FIFO [`PendingAssertion`] queue -- honesty declarations the
//!   player owes after private reveals. Only the head is ever editable
//!   or submittable; a head is removed when the player's own published
//!   claim with the matching round id comes back on the broadcast
//!   stream.
//!
//! Transitions never block and never touch the network. Ordering is
//! significant: clearing a pending request exactly once depends on
//! seeing the triggering event before any later one.

use std::collections::VecDeque;

use caucus_types::{
    AssertEvent, AssertKind, Event, InformationEvent, PlayerId, PolicySource, RequestEvent,
    RequestKind, VoteResultEvent,
};
use tracing::debug;

/// The single action the server currently expects from the local player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    /// What kind of ask this is.
    pub kind: RequestKind,
    /// The full request, kept verbatim so the token survives untouched
    /// from receipt to submission.
    pub request: RequestEvent,
}

/// A drafted claim awaiting the local player's edit and submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAssertion {
    /// Whether the draft claims a party or a set of policies.
    pub kind: AssertKind,
    /// The editable draft payload. Round id and token are fixed at
    /// enqueue time; only the claimed party or policies change.
    pub claim: AssertEvent,
}

/// Local obligation state, owned exclusively by the session's consumer
/// loop. One instance per game connection.
#[derive(Debug)]
pub struct ObligationState {
    player_id: PlayerId,
    pending_request: Option<PendingRequest>,
    assertions: VecDeque<PendingAssertion>,
}

impl ObligationState {
    /// Create empty obligation state for the given local player.
    pub const fn new(player_id: PlayerId) -> Self {
        Self {
            player_id,
            pending_request: None,
            assertions: VecDeque::new(),
        }
    }

    /// The local player this state tracks obligations for.
    pub const fn local_player(&self) -> &PlayerId {
        &self.player_id
    }

    /// The outstanding request, if any.
    pub const fn pending_request(&self) -> Option<&PendingRequest> {
        self.pending_request.as_ref()
    }

    /// The editable head of the assertion queue, if any.
    pub fn assertion_head(&self) -> Option<&PendingAssertion> {
        self.assertions.front()
    }

    /// Mutable access to the queue head, for draft edits. Entries
    /// behind the head are never editable.
    pub fn assertion_head_mut(&mut self) -> Option<&mut PendingAssertion> {
        self.assertions.front_mut()
    }

    /// Number of queued assertion drafts.
    pub fn assertion_count(&self) -> usize {
        self.assertions.len()
    }

    /// Clear the pending request after the server accepted a satisfying
    /// submission. Optimistic: the broadcast stream remains
    /// authoritative and a later event may set a new request.
    pub fn clear_request(&mut self) {
        if let Some(pending) = self.pending_request.take() {
            debug!(kind = ?pending.kind, "pending request cleared by local submission");
        }
    }

    /// Advance the state by one event, in stream order.
    ///
    /// Returns transcript lines the event produced (published claims,
    /// vote results); an empty vector for obligation-only transitions.
    pub fn apply(&mut self, event: &Event) -> Vec<String> {
        match event {
            // Acknowledge and vote asks are broadcast to every seated
            // player; the server does not address them individually.
            Event::RequestAcknowledge(req) => {
                self.set_request(RequestKind::Acknowledge, req);
                Vec::new()
            }
            Event::RequestVote(req) => {
                self.set_request(RequestKind::Vote, req);
                Vec::new()
            }
            Event::RequestNominate(req) => {
                if req.player_id == self.player_id {
                    self.set_request(RequestKind::Nominate, req);
                }
                Vec::new()
            }
            Event::RequestLegislate(req) => {
                if req.player_id == self.player_id {
                    self.set_request(RequestKind::Legislate, req);
                    // A discard ask obliges a "what was I dealt" claim.
                    // A veto ask re-presents the same policies and must
                    // not draft a duplicate.
                    if !req.veto {
                        self.enqueue_policy_claim(req, PolicySource::Legislating);
                    }
                }
                Vec::new()
            }
            Event::RequestExecutiveAction(req) => {
                if req.player_id == self.player_id {
                    self.set_request(RequestKind::ExecutiveAction, req);
                }
                Vec::new()
            }
            Event::GameInformation(info) => {
                if info.player_id == self.player_id {
                    self.enqueue_reveal_claims(info);
                }
                Vec::new()
            }
            Event::AssertParty(claim) => {
                self.confirm_assertion(claim);
                vec![format!(
                    "Player {} claims {} party is {}",
                    claim.player_id,
                    claim
                        .other_player_id
                        .as_ref()
                        .map_or("", PlayerId::as_str),
                    claim.party.map_or_else(String::new, |p| p.to_string()),
                )]
            }
            Event::AssertPolicies(claim) => {
                self.confirm_assertion(claim);
                let verb = if claim.policy_source == Some(PolicySource::Legislating) {
                    "they were dealt"
                } else {
                    "they observed"
                };
                vec![format!(
                    "Player {} claims {} {}",
                    claim.player_id,
                    verb,
                    join_policies(&claim.policies),
                )]
            }
            Event::GameVoteResults(results) => {
                // The round moved on whether or not my ballot landed.
                if self
                    .pending_request
                    .as_ref()
                    .is_some_and(|p| p.kind == RequestKind::Vote)
                {
                    self.unset_request("vote results observed");
                }
                vec![vote_result_line(results)]
            }
            // A public phase-completing action clears a matching ask --
            // the server only cares that the phase is over, not that
            // this client was the actor.
            Event::PlayerNominate(_) => {
                self.clear_if_kind(RequestKind::Nominate);
                Vec::new()
            }
            Event::PlayerLegislate(_) => {
                self.clear_if_kind(RequestKind::Legislate);
                Vec::new()
            }
            Event::PlayerInvestigate(_)
            | Event::PlayerSpecialElection(_)
            | Event::PlayerExecute(_) => {
                self.clear_if_kind(RequestKind::ExecutiveAction);
                Vec::new()
            }
            // Lobby traffic carries no obligations.
            Event::PlayerJoin(_) | Event::PlayerReady(_) | Event::PlayerAcknowledge(_)
            | Event::PlayerVote(_) => Vec::new(),
        }
    }

    fn set_request(&mut self, kind: RequestKind, request: &RequestEvent) {
        debug!(kind = ?kind, round = %request.round_id, "pending request set");
        self.pending_request = Some(PendingRequest {
            kind,
            request: request.clone(),
        });
    }

    fn unset_request(&mut self, reason: &str) {
        if let Some(pending) = self.pending_request.take() {
            debug!(kind = ?pending.kind, reason = reason, "pending request cleared");
        }
    }

    fn clear_if_kind(&mut self, kind: RequestKind) {
        if self
            .pending_request
            .as_ref()
            .is_some_and(|p| p.kind == kind)
        {
            self.unset_request("phase completed");
        }
    }

    /// Draft a policy claim from a legislate request's dealt policies.
    fn enqueue_policy_claim(&mut self, req: &RequestEvent, source: PolicySource) {
        debug!(round = %req.round_id, source = ?source, "policy claim drafted");
        self.assertions.push_back(PendingAssertion {
            kind: AssertKind::Policies,
            claim: AssertEvent {
                player_id: self.player_id.clone(),
                round_id: req.round_id,
                token: req.token.clone(),
                policy_source: Some(source),
                policies: req.policies.clone(),
                ..AssertEvent::default()
            },
        });
    }

    /// Draft claims from a private reveal. A party reveal and a policy
    /// reveal each enqueue their own draft; one event may carry both.
    fn enqueue_reveal_claims(&mut self, info: &InformationEvent) {
        if let Some(party) = info.party {
            debug!(round = %info.round_id, "party claim drafted");
            self.assertions.push_back(PendingAssertion {
                kind: AssertKind::Party,
                claim: AssertEvent {
                    player_id: self.player_id.clone(),
                    round_id: info.round_id,
                    token: info.token.clone(),
                    other_player_id: info.other_player_id.clone(),
                    party: Some(party),
                    ..AssertEvent::default()
                },
            });
        }
        if !info.policies.is_empty() {
            debug!(round = %info.round_id, "peeked-policy claim drafted");
            self.assertions.push_back(PendingAssertion {
                kind: AssertKind::Policies,
                claim: AssertEvent {
                    player_id: self.player_id.clone(),
                    round_id: info.round_id,
                    token: info.token.clone(),
                    policy_source: Some(PolicySource::Peek),
                    policies: info.policies.clone(),
                    ..AssertEvent::default()
                },
            });
        }
    }

    /// Dequeue the head when the broadcast confirms our own claim for
    /// the head's round. Strictly FIFO: only the head is ever removed.
    fn confirm_assertion(&mut self, claim: &AssertEvent) {
        if claim.player_id != self.player_id {
            return;
        }
        if self
            .assertions
            .front()
            .is_some_and(|head| head.claim.round_id == claim.round_id)
        {
            debug!(round = %claim.round_id, "assertion head confirmed by broadcast");
            self.assertions.pop_front();
        }
    }
}

/// Render a vote result as a transcript line, naming downvoters (or
/// "nobody") and the outcome.
fn vote_result_line(results: &VoteResultEvent) -> String {
    let downvoters: Vec<&str> = results
        .votes
        .iter()
        .filter(|ballot| !ballot.vote)
        .map(|ballot| ballot.player_id.as_str())
        .collect();
    let downvoters = if downvoters.is_empty() {
        "nobody".to_owned()
    } else {
        downvoters.join(", ")
    };
    let outcome = if results.succeeded {
        "Succeeded"
    } else {
        "Failed"
    };
    format!("Vote {outcome} with {downvoters} downvoting")
}

fn join_policies(policies: &[caucus_types::Policy]) -> String {
    policies
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use caucus_types::{Ballot, Party, Policy, RoundId};

    fn me() -> PlayerId {
        PlayerId::from("me")
    }

    fn state() -> ObligationState {
        ObligationState::new(me())
    }

    fn legislate_request(veto: bool) -> RequestEvent {
        RequestEvent {
            player_id: me(),
            round_id: RoundId(3),
            token: "tok-3".to_owned(),
            veto,
            policies: vec![Policy::Fascist, Policy::Fascist],
            ..RequestEvent::default()
        }
    }

    #[test]
    fn legislate_request_sets_pending_and_drafts_claim() {
        let mut s = state();
        s.apply(&Event::RequestLegislate(legislate_request(false)));

        let pending = s.pending_request();
        assert!(pending.is_some_and(|p| p.kind == RequestKind::Legislate));
        assert!(pending.is_some_and(|p| p.request.token == "tok-3"));

        // Exactly one policy draft, same policies, legislating source.
        assert_eq!(s.assertion_count(), 1);
        let head = s.assertion_head();
        assert!(head.is_some_and(|h| h.kind == AssertKind::Policies));
        assert!(head.is_some_and(
            |h| h.claim.policies == vec![Policy::Fascist, Policy::Fascist]
        ));
        assert!(
            head.is_some_and(|h| h.claim.policy_source == Some(PolicySource::Legislating))
        );
        assert!(head.is_some_and(|h| h.claim.token == "tok-3"));
    }

    #[test]
    fn veto_ask_never_drafts_a_duplicate_claim() {
        let mut s = state();
        s.apply(&Event::RequestLegislate(legislate_request(true)));
        assert!(s.pending_request().is_some());
        assert_eq!(s.assertion_count(), 0);
    }

    #[test]
    fn requests_addressed_elsewhere_are_ignored() {
        let mut s = state();
        let req = RequestEvent {
            player_id: PlayerId::from("someone-else"),
            ..legislate_request(false)
        };
        s.apply(&Event::RequestLegislate(req));
        assert!(s.pending_request().is_none());
        assert_eq!(s.assertion_count(), 0);
    }

    #[test]
    fn vote_request_is_a_broadcast_ask() {
        let mut s = state();
        s.apply(&Event::RequestVote(RequestEvent {
            player_id: PlayerId::from("anyone"),
            token: "v".to_owned(),
            ..RequestEvent::default()
        }));
        assert!(
            s.pending_request()
                .is_some_and(|p| p.kind == RequestKind::Vote)
        );
    }

    #[test]
    fn at_most_one_pending_request() {
        let mut s = state();
        s.apply(&Event::RequestVote(RequestEvent::default()));
        s.apply(&Event::RequestLegislate(legislate_request(false)));
        // The newer ask replaced the older; never two at once.
        assert!(
            s.pending_request()
                .is_some_and(|p| p.kind == RequestKind::Legislate)
        );
    }

    #[test]
    fn information_event_drafts_party_and_policies_independently() {
        let mut s = state();
        s.apply(&Event::GameInformation(InformationEvent {
            player_id: me(),
            round_id: RoundId(5),
            token: "i".to_owned(),
            other_player_id: Some(PlayerId::from("p4")),
            party: Some(Party::Fascist),
            policies: vec![Policy::Liberal, Policy::Fascist, Policy::Fascist],
        }));

        assert_eq!(s.assertion_count(), 2);
        assert!(
            s.assertion_head()
                .is_some_and(|h| h.kind == AssertKind::Party)
        );
    }

    #[test]
    fn information_party_only_drafts_one() {
        let mut s = state();
        s.apply(&Event::GameInformation(InformationEvent {
            player_id: me(),
            round_id: RoundId(5),
            party: Some(Party::Liberal),
            other_player_id: Some(PlayerId::from("p2")),
            ..InformationEvent::default()
        }));
        assert_eq!(s.assertion_count(), 1);
    }

    #[test]
    fn own_published_claim_dequeues_matching_head() {
        let mut s = state();
        s.apply(&Event::RequestLegislate(legislate_request(false)));
        assert_eq!(s.assertion_count(), 1);

        let lines = s.apply(&Event::AssertPolicies(AssertEvent {
            player_id: me(),
            round_id: RoundId(3),
            policy_source: Some(PolicySource::Legislating),
            policies: vec![Policy::Fascist, Policy::Fascist],
            ..AssertEvent::default()
        }));

        assert_eq!(s.assertion_count(), 0);
        assert_eq!(
            lines,
            vec!["Player me claims they were dealt fascist, fascist".to_owned()]
        );
    }

    #[test]
    fn claim_for_a_different_round_leaves_head_queued() {
        let mut s = state();
        s.apply(&Event::RequestLegislate(legislate_request(false)));

        s.apply(&Event::AssertPolicies(AssertEvent {
            player_id: me(),
            round_id: RoundId(99),
            ..AssertEvent::default()
        }));
        assert_eq!(s.assertion_count(), 1);
    }

    #[test]
    fn other_players_claims_only_produce_transcript() {
        let mut s = state();
        s.apply(&Event::RequestLegislate(legislate_request(false)));

        let lines = s.apply(&Event::AssertParty(AssertEvent {
            player_id: PlayerId::from("p9"),
            round_id: RoundId(3),
            other_player_id: Some(PlayerId::from("p2")),
            party: Some(Party::Liberal),
            ..AssertEvent::default()
        }));
        assert_eq!(s.assertion_count(), 1);
        assert_eq!(
            lines,
            vec!["Player p9 claims p2 party is liberal".to_owned()]
        );
    }

    #[test]
    fn vote_results_clear_vote_request_and_name_downvoters() {
        let mut s = state();
        s.apply(&Event::RequestVote(RequestEvent::default()));

        let lines = s.apply(&Event::GameVoteResults(VoteResultEvent {
            round_id: RoundId(2),
            votes: vec![
                Ballot {
                    player_id: PlayerId::from("P1"),
                    vote: true,
                },
                Ballot {
                    player_id: PlayerId::from("P2"),
                    vote: false,
                },
            ],
            succeeded: false,
        }));

        assert!(s.pending_request().is_none());
        assert_eq!(lines, vec!["Vote Failed with P2 downvoting".to_owned()]);
    }

    #[test]
    fn unanimous_vote_reports_nobody() {
        let mut s = state();
        let lines = s.apply(&Event::GameVoteResults(VoteResultEvent {
            votes: vec![Ballot {
                player_id: PlayerId::from("P1"),
                vote: true,
            }],
            succeeded: true,
            ..VoteResultEvent::default()
        }));
        assert_eq!(lines, vec!["Vote Succeeded with nobody downvoting".to_owned()]);
    }

    #[test]
    fn vote_results_leave_non_vote_requests_alone() {
        let mut s = state();
        s.apply(&Event::RequestLegislate(legislate_request(false)));
        s.apply(&Event::GameVoteResults(VoteResultEvent::default()));
        assert!(
            s.pending_request()
                .is_some_and(|p| p.kind == RequestKind::Legislate)
        );
    }

    #[test]
    fn phase_completion_clears_matching_request_from_any_actor() {
        let mut s = state();
        s.apply(&Event::RequestNominate(RequestEvent {
            player_id: me(),
            ..RequestEvent::default()
        }));

        // Another player's nomination still closes the phase.
        s.apply(&Event::PlayerNominate(caucus_types::PlayerPlayerEvent {
            player_id: PlayerId::from("p1"),
            other_player_id: PlayerId::from("p2"),
            ..caucus_types::PlayerPlayerEvent::default()
        }));
        assert!(s.pending_request().is_none());
    }

    #[test]
    fn executive_completions_clear_executive_requests() {
        let mut s = state();
        s.apply(&Event::RequestExecutiveAction(RequestEvent {
            player_id: me(),
            ..RequestEvent::default()
        }));
        s.apply(&Event::PlayerExecute(caucus_types::PlayerPlayerEvent::default()));
        assert!(s.pending_request().is_none());
    }

    #[test]
    fn mismatched_completion_leaves_request_set() {
        let mut s = state();
        s.apply(&Event::RequestLegislate(legislate_request(false)));
        s.apply(&Event::PlayerNominate(caucus_types::PlayerPlayerEvent::default()));
        assert!(
            s.pending_request()
                .is_some_and(|p| p.kind == RequestKind::Legislate)
        );
    }

    #[test]
    fn lobby_traffic_is_obligation_neutral() {
        let mut s = state();
        let lines = s.apply(&Event::PlayerJoin(caucus_types::PlayerEvent::default()));
        assert!(lines.is_empty());
        assert!(s.pending_request().is_none());
        assert_eq!(s.assertion_count(), 0);
    }
}
