//! Session configuration.
//!
//! One immutable struct carries every identifier a component needs to
//! reach the server: host, game id, local player id. Components take it
//! by reference; there is no implicit or global lookup.

use std::time::Duration;

use caucus_types::PlayerId;

use crate::error::ClientError;

/// Default bound on how long a command submission may wait.
pub const DEFAULT_SUBMIT_TIMEOUT: Duration = Duration::from_secs(10);

/// Immutable per-session configuration.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Server base URL (e.g. `http://localhost:8080`).
    pub host: String,
    /// The game to stream and submit to.
    pub game_id: String,
    /// The local player's identity.
    pub player_id: PlayerId,
    /// Bearer token obtained at sign-in, if any.
    pub auth_token: Option<String>,
    /// Upper bound on a single command submission.
    pub submit_timeout: Duration,
}

impl SessionConfig {
    /// Create a configuration with the default submission timeout.
    pub fn new(
        host: impl Into<String>,
        game_id: impl Into<String>,
        player_id: PlayerId,
    ) -> Self {
        Self {
            host: host.into(),
            game_id: game_id.into(),
            player_id,
            auth_token: None,
            submit_timeout: DEFAULT_SUBMIT_TIMEOUT,
        }
    }

    /// Attach a bearer token obtained from [`crate::auth::sign_in`].
    #[must_use]
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    /// Override the submission timeout.
    #[must_use]
    pub const fn with_submit_timeout(mut self, timeout: Duration) -> Self {
        self.submit_timeout = timeout;
        self
    }

    /// Load configuration from environment variables.
    ///
    /// Required variables:
    /// - `CAUCUS_HOST` -- server base URL
    /// - `CAUCUS_GAME_ID` -- game identifier
    /// - `CAUCUS_PLAYER_ID` -- local player identifier
    ///
    /// Optional variables:
    /// - `CAUCUS_AUTH_TOKEN` -- bearer token for submissions
    /// - `CAUCUS_SUBMIT_TIMEOUT_MS` -- submission deadline (default 10000)
    pub fn from_env() -> Result<Self, ClientError> {
        let host = env_var("CAUCUS_HOST")?;
        let game_id = env_var("CAUCUS_GAME_ID")?;
        let player_id = PlayerId::from(env_var("CAUCUS_PLAYER_ID")?);

        let auth_token = std::env::var("CAUCUS_AUTH_TOKEN").ok();

        let submit_timeout_ms: u64 = std::env::var("CAUCUS_SUBMIT_TIMEOUT_MS")
            .unwrap_or_else(|_| "10000".to_owned())
            .parse()
            .map_err(|e| ClientError::Config(format!("invalid CAUCUS_SUBMIT_TIMEOUT_MS: {e}")))?;

        Ok(Self {
            host,
            game_id,
            player_id,
            auth_token,
            submit_timeout: Duration::from_millis(submit_timeout_ms),
        })
    }

    /// URL of the game's event endpoint, used both for the streaming
    /// `GET` and the submitting `POST`.
    pub fn events_url(&self) -> String {
        format!(
            "{}/api/games/{}/events?playerID={}",
            self.host, self.game_id, self.player_id
        )
    }
}

/// Read a required environment variable.
fn env_var(name: &str) -> Result<String, ClientError> {
    std::env::var(name)
        .map_err(|e| ClientError::Config(format!("missing required env var {name}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_url_carries_game_and_player() {
        let config = SessionConfig::new("http://localhost:8080", "g42", PlayerId::from("p7"));
        assert_eq!(
            config.events_url(),
            "http://localhost:8080/api/games/g42/events?playerID=p7"
        );
    }

    #[test]
    fn builder_overrides() {
        let config = SessionConfig::new("h", "g", PlayerId::from("p"))
            .with_auth_token("tok")
            .with_submit_timeout(Duration::from_secs(3));
        assert_eq!(config.auth_token.as_deref(), Some("tok"));
        assert_eq!(config.submit_timeout, Duration::from_secs(3));
    }

    #[test]
    fn default_timeout_applies() {
        let config = SessionConfig::new("h", "g", PlayerId::from("p"));
        assert_eq!(config.submit_timeout, DEFAULT_SUBMIT_TIMEOUT);
    }
}
