//! Server event-stream intake.
//!
//! Opens one long-lived HTTP streaming response and frames it into
//! discrete records. The stream is textual: a line `event: <name>` names
//! the next record, a line `data: <json>` carries its payload, and the
//! name sticks until the next `event:` line. A record named `state`
//! decodes as a full [`Game`] snapshot; any other record decodes through
//! the [`Event`] union by its own `type` tag. All other lines are
//! ignored.
//!
//! Malformed payloads are dropped, not surfaced: the drop is logged at
//! `debug` and counted in [`DecodeStats`] so tests and dashboards can
//! observe it. When the transport closes or errors, both output
//! channels close and the client goes idle -- no reconnection is
//! attempted.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use caucus_types::{Event, Game};
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::config::SessionConfig;
use crate::error::ClientError;

/// Counters for stream intake, shared with the reader task.
#[derive(Debug, Default)]
pub struct DecodeStats {
    dropped: AtomicU64,
}

impl DecodeStats {
    /// Number of `data:` payloads dropped because they failed to decode.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    fn record_drop(&self) {
        self.dropped.fetch_add(1, Ordering::Relaxed);
    }
}

/// One decoded record from the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamRecord {
    /// A full game-state snapshot (`event: state`).
    Snapshot(Box<Game>),
    /// A typed protocol event (any other record name).
    Event(Box<Event>),
}

/// Incremental frame decoder for the text event-stream format.
///
/// Pure line-at-a-time state machine: feed it each line of the response
/// body and it yields a record whenever a `data:` line completes one.
/// The most recently seen record name applies to every following
/// payload until replaced.
#[derive(Debug)]
pub struct FrameDecoder {
    record_name: Option<String>,
    stats: Arc<DecodeStats>,
}

impl FrameDecoder {
    /// Create a decoder reporting drops into the given counters.
    pub const fn new(stats: Arc<DecodeStats>) -> Self {
        Self {
            record_name: None,
            stats,
        }
    }

    /// Consume one line of the stream; returns a record when the line
    /// completes one.
    pub fn push_line(&mut self, line: &str) -> Option<StreamRecord> {
        let line = line.trim_end_matches(['\r', '\n']);
        if let Some(name) = line.strip_prefix("event:") {
            self.record_name = Some(name.trim().to_owned());
            return None;
        }
        let payload = line.strip_prefix("data:")?.trim();

        if self.record_name.as_deref() == Some("state") {
            match serde_json::from_str::<Game>(payload) {
                Ok(game) => Some(StreamRecord::Snapshot(Box::new(game))),
                Err(e) => {
                    debug!(error = %e, "dropping malformed state payload");
                    self.stats.record_drop();
                    None
                }
            }
        } else {
            match serde_json::from_str::<Event>(payload) {
                Ok(event) => Some(StreamRecord::Event(Box::new(event))),
                Err(e) => {
                    debug!(error = %e, "dropping malformed event payload");
                    self.stats.record_drop();
                    None
                }
            }
        }
    }
}

/// A connected event stream: two ordered, independently consumable
/// sequences fed by one background reader task.
#[derive(Debug)]
pub struct EventStream {
    snapshots: mpsc::UnboundedReceiver<Game>,
    events: mpsc::UnboundedReceiver<Event>,
    stats: Arc<DecodeStats>,
    task: JoinHandle<()>,
}

impl EventStream {
    /// Open the streaming response and spawn the reader task.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`] if the request fails or the
    /// server answers with a non-success status.
    pub async fn connect(config: &SessionConfig) -> Result<Self, ClientError> {
        let url = config.events_url();
        info!(url = url, "opening event stream");
        let mut request = reqwest::Client::new().get(&url);
        // The stream sits behind the same auth as submissions.
        if let Some(token) = &config.auth_token {
            request = request.bearer_auth(token);
        }
        let response = request
            .send()
            .await
            .map_err(|e| ClientError::Transport(format!("stream request failed: {e}")))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Transport(format!(
                "stream request returned {status}"
            )));
        }

        let stats = Arc::new(DecodeStats::default());
        let (snapshot_tx, snapshots) = mpsc::unbounded_channel();
        let (event_tx, events) = mpsc::unbounded_channel();
        let decoder = FrameDecoder::new(Arc::clone(&stats));
        let task = tokio::spawn(read_loop(response, decoder, snapshot_tx, event_tx));

        Ok(Self {
            snapshots,
            events,
            stats,
            task,
        })
    }

    /// Split into the two receivers, the drop counters, and the reader
    /// task handle. Dropping or aborting the handle cancels the read.
    pub fn into_parts(
        self,
    ) -> (
        mpsc::UnboundedReceiver<Game>,
        mpsc::UnboundedReceiver<Event>,
        Arc<DecodeStats>,
        JoinHandle<()>,
    ) {
        (self.snapshots, self.events, self.stats, self.task)
    }
}

/// Read the response body to completion, framing lines into records and
/// fanning them out to the two channels. Returns when the transport
/// closes, errors, or both receivers are gone.
async fn read_loop(
    response: reqwest::Response,
    mut decoder: FrameDecoder,
    snapshot_tx: mpsc::UnboundedSender<Game>,
    event_tx: mpsc::UnboundedSender<Event>,
) {
    let mut body = response.bytes_stream();
    let mut buf: Vec<u8> = Vec::new();

    while let Some(chunk) = body.next().await {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(e) => {
                info!(error = %e, "event stream transport error; going idle");
                return;
            }
        };
        buf.extend_from_slice(&chunk);

        while let Some(newline) = buf.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = buf.drain(..=newline).collect();
            let line = String::from_utf8_lossy(&line);
            match decoder.push_line(&line) {
                Some(StreamRecord::Snapshot(game)) => {
                    if snapshot_tx.send(*game).is_err() {
                        return;
                    }
                }
                Some(StreamRecord::Event(event)) => {
                    debug!(event_type = event.type_name(), "stream event");
                    if event_tx.send(*event).is_err() {
                        return;
                    }
                }
                None => {}
            }
        }
    }
    info!("event stream ended; no reconnection is attempted");
}

#[cfg(test)]
mod tests {
    use super::*;
    use caucus_types::{PlayerId, RequestKind};

    fn decoder() -> (FrameDecoder, Arc<DecodeStats>) {
        let stats = Arc::new(DecodeStats::default());
        (FrameDecoder::new(Arc::clone(&stats)), stats)
    }

    #[test]
    fn state_record_decodes_as_snapshot() {
        let (mut dec, _) = decoder();
        assert_eq!(dec.push_line("event: state\n"), None);
        let record = dec.push_line("data: {\"id\":\"g1\",\"liberal\":2}\n");
        assert!(
            matches!(record, Some(StreamRecord::Snapshot(ref g)) if g.liberal == 2),
            "expected snapshot, got {record:?}"
        );
    }

    #[test]
    fn event_record_routes_by_type_tag() {
        let (mut dec, _) = decoder();
        dec.push_line("event: request.vote\n");
        let record =
            dec.push_line("data: {\"type\":\"request.vote\",\"playerID\":\"p1\",\"token\":\"t\"}\n");
        assert!(
            matches!(record, Some(StreamRecord::Event(_))),
            "expected event record, got {record:?}"
        );
        if let Some(StreamRecord::Event(event)) = record {
            assert_eq!(event.request_kind(), Some(RequestKind::Vote));
            if let Event::RequestVote(req) = *event {
                assert_eq!(req.player_id, PlayerId::from("p1"));
            }
        }
    }

    #[test]
    fn record_name_sticks_across_payloads() {
        let (mut dec, _) = decoder();
        dec.push_line("event: state\n");
        assert!(dec.push_line("data: {}\n").is_some());
        // No new event: line -- "state" still applies.
        assert!(matches!(
            dec.push_line("data: {\"liberal\":1}\n"),
            Some(StreamRecord::Snapshot(_))
        ));
    }

    #[test]
    fn malformed_payload_is_dropped_and_counted() {
        let (mut dec, stats) = decoder();
        dec.push_line("event: request.vote\n");
        assert_eq!(dec.push_line("data: {not json\n"), None);
        assert_eq!(stats.dropped(), 1);
        // The stream keeps processing subsequent lines.
        let record =
            dec.push_line("data: {\"type\":\"request.vote\",\"playerID\":\"p1\"}\n");
        assert!(matches!(record, Some(StreamRecord::Event(_))));
        assert_eq!(stats.dropped(), 1);
    }

    #[test]
    fn blank_and_unknown_lines_are_ignored() {
        let (mut dec, stats) = decoder();
        assert_eq!(dec.push_line("\n"), None);
        assert_eq!(dec.push_line(": heartbeat\n"), None);
        assert_eq!(dec.push_line("id: 44\n"), None);
        assert_eq!(stats.dropped(), 0);
    }

    #[tokio::test]
    async fn connect_sends_configured_bearer_token() -> Result<(), ClientError> {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        let addr = listener
            .local_addr()
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        // Accept one request, capture its head, answer with an empty
        // 200 so the stream ends immediately.
        let server = tokio::spawn(async move {
            let Ok((mut socket, _)) = listener.accept().await else {
                return String::new();
            };
            let mut buf = vec![0_u8; 4096];
            let n = socket.read(&mut buf).await.unwrap_or(0);
            buf.truncate(n);
            let _ = socket
                .write_all(b"HTTP/1.1 200 OK\r\ncontent-length: 0\r\n\r\n")
                .await;
            String::from_utf8_lossy(&buf).into_owned()
        });

        let config = SessionConfig::new(format!("http://{addr}"), "g1", PlayerId::from("p1"))
            .with_auth_token("tok-99");
        let stream = EventStream::connect(&config).await?;
        drop(stream);

        let request = server
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        assert!(
            request
                .to_ascii_lowercase()
                .contains("authorization: bearer tok-99"),
            "stream request carried no bearer token: {request}"
        );
        Ok(())
    }

    #[test]
    fn crlf_line_endings_are_tolerated() {
        let (mut dec, _) = decoder();
        dec.push_line("event: state\r\n");
        assert!(matches!(
            dec.push_line("data: {\"fascist\":3}\r\n"),
            Some(StreamRecord::Snapshot(ref g)) if g.fascist == 3
        ));
    }
}
