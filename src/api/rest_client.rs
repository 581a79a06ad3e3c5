//! Type-safe HTTP client for the chess REST API.

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use super::{ChessApi, Health, MoveAccepted, MoveBody, NewGame};
use crate::chess::{GameState, MoveRecord, Square};
use crate::error::ApiError;
use crate::session::SessionId;

#[derive(Debug, Deserialize)]
struct HistoryPayload {
    history: Vec<MoveRecord>,
}

#[derive(Debug, Deserialize)]
struct StatePayload {
    state: GameState,
}

/// HTTP implementation of [`ChessApi`].
#[derive(Debug, Clone)]
pub struct RestChessClient {
    base_url: String,
    client: reqwest::Client,
}

impl RestChessClient {
    /// Creates a client for the API rooted at `base_url`.
    #[instrument(skip_all, fields(base_url = %base_url.as_ref()))]
    pub fn new(base_url: impl AsRef<str>, timeout: Duration) -> Result<Self, ApiError> {
        let base_url = base_url.as_ref().trim_end_matches('/').to_string();
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        info!("Created REST client");
        Ok(Self { base_url, client })
    }

    /// Base URL without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Reads the body of `response` and unwraps the `{success, error, ...}` envelope.
    ///
    /// The service reports failures with a 4xx/5xx status *and* a JSON body,
    /// so the body is parsed regardless of status.
    async fn read_envelope<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let status = response.status();
        let body = response.text().await?;
        debug!(status = %status, body = %body, "Got response");
        unwrap_envelope(&body)
    }
}

/// Splits a service envelope into its payload or a rejection.
fn unwrap_envelope<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    let value: serde_json::Value = serde_json::from_str(body)?;

    let success = value
        .get("success")
        .and_then(serde_json::Value::as_bool)
        .unwrap_or(false);
    if !success {
        let message = value
            .get("error")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("Unknown error");
        warn!(error = %message, "Service rejected request");
        return Err(ApiError::rejected(message));
    }

    serde_json::from_value(value)
        .map_err(|e| ApiError::transport(format!("Unexpected response shape: {}", e)))
}

#[async_trait]
impl ChessApi for RestChessClient {
    #[instrument(skip(self))]
    async fn new_game(&self) -> Result<NewGame, ApiError> {
        info!("Requesting new game");
        let response = self.client.post(self.url("/game/new")).send().await?;
        let game: NewGame = Self::read_envelope(response).await?;
        info!(game_id = %game.game_id, "New game created");
        Ok(game)
    }

    #[instrument(skip_all, fields(session_id = %session_id, from = %from, to = %to))]
    async fn make_move(
        &self,
        session_id: &SessionId,
        from: Square,
        to: Square,
    ) -> Result<MoveAccepted, ApiError> {
        info!("Submitting move");
        let response = self
            .client
            .post(self.url(&format!("/game/{}/move", session_id)))
            .json(&MoveBody::new(from, to))
            .send()
            .await?;
        let accepted: MoveAccepted = Self::read_envelope(response).await?;
        debug!(
            message = %accepted.message,
            status = %accepted.state.game_status,
            "Move accepted"
        );
        Ok(accepted)
    }

    #[instrument(skip_all, fields(session_id = %session_id))]
    async fn history(&self, session_id: &SessionId) -> Result<Vec<MoveRecord>, ApiError> {
        debug!("Fetching move history");
        let response = self
            .client
            .get(self.url(&format!("/game/{}/history", session_id)))
            .send()
            .await?;
        let payload: HistoryPayload = Self::read_envelope(response).await?;
        debug!(moves = payload.history.len(), "Got move history");
        Ok(payload.history)
    }

    #[instrument(skip_all, fields(session_id = %session_id))]
    async fn state(&self, session_id: &SessionId) -> Result<GameState, ApiError> {
        debug!("Fetching game state");
        let response = self
            .client
            .get(self.url(&format!("/game/{}/state", session_id)))
            .send()
            .await?;
        let payload: StatePayload = Self::read_envelope(response).await?;
        Ok(payload.state)
    }

    #[instrument(skip(self))]
    async fn health(&self) -> Result<Health, ApiError> {
        let response = self.client.get(self.url("/health")).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::transport(format!("HTTP {}", status)));
        }
        let health: Health = response.json().await?;
        info!(status = %health.status, active_games = health.active_games, "Health check");
        Ok(health)
    }
}
