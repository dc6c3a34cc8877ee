//! The session facade: single owner of all mutable client state.
//!
//! One background task reads the transport and splits frames into two
//! channels (see [`crate::stream`]); the session's consumer loop drains
//! both via [`Session::pump`], appending snapshots to history and
//! folding events through the obligation reducer. Nothing else mutates
//! session state -- cross-task communication is one-directional
//! message handoff, never shared mutable memory.
//!
//! This is the rendering/input boundary: a frontend renders the history
//! log, the current obligation, the transcript, and the last submission
//! error; it hands back cursor movements and typed [`Command`]s.

use std::sync::Arc;

use caucus_types::{Event, Game, RequestKind};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::info;

use crate::command::{self, Command};
use crate::config::SessionConfig;
use crate::error::ClientError;
use crate::history::HistoryLog;
use crate::reducer::{ObligationState, PendingAssertion, PendingRequest};
use crate::stream::{DecodeStats, EventStream};
use crate::submit::Submitter;
use crate::transcript::Transcript;

/// A live connection to one game, as seen by the local player.
#[derive(Debug)]
pub struct Session {
    config: SessionConfig,
    submitter: Submitter,
    history: HistoryLog,
    obligations: ObligationState,
    transcript: Transcript,
    last_error: Option<String>,
    snapshots: mpsc::UnboundedReceiver<Game>,
    events: mpsc::UnboundedReceiver<Event>,
    stats: Arc<DecodeStats>,
    stream_task: Option<JoinHandle<()>>,
}

impl Session {
    /// Open the event stream and build a ready session.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`] if the stream cannot be
    /// opened, or [`ClientError::Config`] if the submitter cannot be
    /// built.
    pub async fn connect(config: SessionConfig) -> Result<Self, ClientError> {
        let stream = EventStream::connect(&config).await?;
        let (snapshots, events, stats, task) = stream.into_parts();
        Self::assemble(config, snapshots, events, stats, Some(task))
    }

    fn assemble(
        config: SessionConfig,
        snapshots: mpsc::UnboundedReceiver<Game>,
        events: mpsc::UnboundedReceiver<Event>,
        stats: Arc<DecodeStats>,
        stream_task: Option<JoinHandle<()>>,
    ) -> Result<Self, ClientError> {
        let submitter = Submitter::new(&config)?;
        let obligations = ObligationState::new(config.player_id.clone());
        Ok(Self {
            config,
            submitter,
            history: HistoryLog::new(),
            obligations,
            transcript: Transcript::default(),
            last_error: None,
            snapshots,
            events,
            stats,
            stream_task,
        })
    }

    /// Wait for and apply the next inbound item from either sequence.
    ///
    /// Returns `true` after applying one item. Returns `false` once
    /// both sequences have terminated -- the documented go-idle signal;
    /// the session does not reconnect on its own.
    pub async fn pump(&mut self) -> bool {
        tokio::select! {
            Some(snapshot) = self.snapshots.recv() => {
                self.history.append(snapshot);
                true
            }
            Some(event) = self.events.recv() => {
                for line in self.obligations.apply(&event) {
                    self.transcript.push(line);
                }
                true
            }
            else => {
                info!("event stream terminated; session is idle");
                false
            }
        }
    }

    /// Validate a candidate command against the current obligations,
    /// build the wire event, and post it.
    ///
    /// Local validation failures reject before any network call and
    /// leave obligations untouched. On acceptance the satisfied pending
    /// request is cleared optimistically -- the broadcast stream remains
    /// authoritative. On any failure the error text is retained for
    /// redisplay and the obligation stays open for retry.
    pub async fn submit(&mut self, command: Command) -> Result<(), ClientError> {
        let event = match self.build_event(command) {
            Ok(event) => event,
            Err(e) => {
                self.last_error = Some(e.to_string());
                return Err(e);
            }
        };
        match self.submitter.submit(&event).await {
            Ok(()) => {
                self.last_error = None;
                self.clear_satisfied(command);
                Ok(())
            }
            Err(e) => {
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    fn build_event(&mut self, command: Command) -> Result<Event, ClientError> {
        let me = self.obligations.local_player().clone();
        match command {
            Command::Join => Ok(command::join_event(&me)),
            Command::Ready => Ok(command::ready_event(&me)),
            Command::Acknowledge => {
                let game = self.history.latest().ok_or_else(no_snapshot)?;
                command::acknowledge_event(game, &me)
            }
            Command::SelectPlayer(_) | Command::Vote(_) | Command::Legislate(_) => {
                let pending = self.obligations.pending_request().ok_or_else(|| {
                    ClientError::ObligationMismatch("no pending request to answer".to_owned())
                })?;
                let game = self.history.latest().ok_or_else(no_snapshot)?;
                command::action_event(command, pending, game, &me)
            }
            Command::ClaimParty(_) | Command::ClaimPolicies(_) => {
                let head = self.obligations.assertion_head_mut().ok_or_else(|| {
                    ClientError::ObligationMismatch("no pending assertion to edit".to_owned())
                })?;
                command::apply_claim(head, command)
            }
        }
    }

    /// Optimistically clear the pending request a just-accepted command
    /// satisfied. Assertion heads are never cleared here; they wait for
    /// the broadcast confirmation.
    fn clear_satisfied(&mut self, command: Command) {
        match command {
            Command::SelectPlayer(_) | Command::Vote(_) | Command::Legislate(_) => {
                self.obligations.clear_request();
            }
            Command::Acknowledge => {
                if self
                    .obligations
                    .pending_request()
                    .is_some_and(|p| p.kind == RequestKind::Acknowledge)
                {
                    self.obligations.clear_request();
                }
            }
            Command::Join
            | Command::Ready
            | Command::ClaimParty(_)
            | Command::ClaimPolicies(_) => {}
        }
    }

    /// The session configuration.
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The snapshot history, for rendering and cursor reads.
    pub const fn history(&self) -> &HistoryLog {
        &self.history
    }

    /// Mutable history access, for cursor movements.
    pub const fn history_mut(&mut self) -> &mut HistoryLog {
        &mut self.history
    }

    /// The outstanding server ask, if any.
    pub const fn pending_request(&self) -> Option<&PendingRequest> {
        self.obligations.pending_request()
    }

    /// The editable assertion-queue head, if any.
    pub fn assertion_head(&self) -> Option<&PendingAssertion> {
        self.obligations.assertion_head()
    }

    /// The bounded transcript of display lines.
    pub const fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// The last submission error text, for redisplay.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Number of malformed frames dropped by the stream reader.
    pub fn dropped_frames(&self) -> u64 {
        self.stats.dropped()
    }

    /// Cancel the background stream read. Also happens on drop.
    pub fn shutdown(&mut self) {
        if let Some(task) = self.stream_task.take() {
            task.abort();
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn no_snapshot() -> ClientError {
    ClientError::ObligationMismatch("no game snapshot received yet".to_owned())
}
