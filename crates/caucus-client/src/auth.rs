//! Sign-in and account creation.
//!
//! Startup-time HTTP calls, outside the streaming core. A sign-in
//! failure is fatal at startup; the embedder decides whether to fall
//! back to creating the player first.

use caucus_types::Player;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ClientError;

/// Credentials posted to the login endpoint.
#[derive(Debug, Serialize)]
struct Credentials<'a> {
    username: &'a str,
    password: &'a str,
}

/// A successful sign-in: the bearer token plus the server's record of
/// the player.
#[derive(Debug, Clone, Deserialize)]
pub struct SignIn {
    /// Bearer token for subsequent submissions.
    pub token: String,
    /// The signed-in player's account record.
    pub player: Player,
}

/// Sign in with username and password.
///
/// # Errors
///
/// Returns [`ClientError::Auth`] on any transport failure, non-success
/// status (with the status echoed), or undecodable response.
pub async fn sign_in(host: &str, username: &str, password: &str) -> Result<SignIn, ClientError> {
    let url = format!("{host}/api/login");
    let response = reqwest::Client::new()
        .post(&url)
        .json(&Credentials { username, password })
        .send()
        .await
        .map_err(|e| ClientError::Auth(format!("login request failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(ClientError::Auth(format!("login returned {status}")));
    }
    let signin: SignIn = response
        .json()
        .await
        .map_err(|e| ClientError::Auth(format!("login response decode failed: {e}")))?;
    info!(player = %signin.player.id, "signed in");
    Ok(signin)
}

/// Create a new player account.
///
/// # Errors
///
/// Returns [`ClientError::Auth`] on transport failure, non-success
/// status, or an undecodable response.
pub async fn create_player(host: &str, player: &Player) -> Result<Player, ClientError> {
    let url = format!("{host}/api/player");
    let response = reqwest::Client::new()
        .post(&url)
        .json(player)
        .send()
        .await
        .map_err(|e| ClientError::Auth(format!("player creation failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(ClientError::Auth(format!("player creation returned {status}")));
    }
    response
        .json()
        .await
        .map_err(|e| ClientError::Auth(format!("player creation decode failed: {e}")))
}
