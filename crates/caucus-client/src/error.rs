//! Error types for the game client.
//!
//! Uses `thiserror` for typed errors covering the client's whole failure
//! taxonomy: transport, decoding, obligation mismatches, server
//! rejections, authentication, and configuration. Server rejections are
//! always recoverable -- the obligation that produced the submission is
//! left intact so the player can retry.

/// Errors that can occur during client operation.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The streaming connection or an HTTP call failed at the transport
    /// level. Stream termination is not self-healed: the client goes
    /// idle and the embedder decides whether to reconnect.
    #[error("transport error: {0}")]
    Transport(String),

    /// A payload could not be decoded. On the inbound stream this is
    /// non-fatal (the frame is dropped and counted); it is only
    /// surfaced for outbound encoding.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// A command was submitted with no matching pending request or
    /// assertion-queue head. Rejected locally before any network call.
    #[error("no matching obligation: {0}")]
    ObligationMismatch(String),

    /// The server refused a submission. Carries the response body
    /// verbatim for redisplay.
    #[error("server rejected submission: {0}")]
    Rejected(String),

    /// Sign-in or player creation failed. Fatal at startup.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Configuration is invalid or missing.
    #[error("config error: {0}")]
    Config(String),
}
