//! HTTP submission of client events.
//!
//! One `POST` per event to the game's event endpoint. The server
//! signals acceptance with `202 Accepted`; any other status carries the
//! response body verbatim as the user-visible error. Submissions are
//! bounded by the configured timeout and a timeout surfaces as a normal
//! failure, never a crash.

use caucus_types::Event;
use reqwest::StatusCode;
use tracing::{debug, warn};

use crate::config::SessionConfig;
use crate::error::ClientError;

/// Posts client events to the server.
#[derive(Debug)]
pub struct Submitter {
    client: reqwest::Client,
    url: String,
    auth_token: Option<String>,
}

impl Submitter {
    /// Build a submitter for the session, with the configured timeout
    /// baked into the HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] if the HTTP client cannot be
    /// constructed.
    pub fn new(config: &SessionConfig) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(config.submit_timeout)
            .build()
            .map_err(|e| ClientError::Config(format!("http client build failed: {e}")))?;
        Ok(Self {
            client,
            url: config.events_url(),
            auth_token: config.auth_token.clone(),
        })
    }

    /// Post one event.
    ///
    /// # Errors
    ///
    /// [`ClientError::Transport`] when the call fails or times out;
    /// [`ClientError::Rejected`] with the response body when the server
    /// answers anything but `202 Accepted`.
    pub async fn submit(&self, event: &Event) -> Result<(), ClientError> {
        debug!(event_type = event.type_name(), "submitting event");
        let mut request = self.client.post(&self.url).json(event);
        if let Some(token) = &self.auth_token {
            request = request.bearer_auth(token);
        }
        let response = request
            .send()
            .await
            .map_err(|e| ClientError::Transport(format!("submission failed: {e}")))?;

        let status = response.status();
        if status == StatusCode::ACCEPTED {
            debug!(event_type = event.type_name(), "submission accepted");
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        warn!(status = %status, body = body, "submission rejected");
        Err(ClientError::Rejected(body))
    }
}
