//! The remote game service, seen from the client.
//!
//! [`ChessApi`] is the seam between the interaction logic and the network:
//! the TUI talks to [`RestChessClient`], tests talk to an in-memory fake.

mod rest_client;

pub use rest_client::RestChessClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::chess::{GameState, MoveRecord, Square};
use crate::error::ApiError;
use crate::session::SessionId;

/// Payload of a successful `POST /game/new`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGame {
    /// Identifier of the freshly created game.
    pub game_id: SessionId,
    /// Its starting state.
    pub state: GameState,
    /// Optional human-readable note from the service.
    #[serde(default)]
    pub message: Option<String>,
}

/// Payload of a successful `POST /game/{id}/move`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveAccepted {
    /// Complete replacement state after the move.
    pub state: GameState,
    /// Human-readable result, e.g. "Move successful".
    #[serde(default)]
    pub message: String,
}

/// Body of `POST /game/{id}/move`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_new::new)]
pub struct MoveBody {
    /// Origin as `[row, col]`.
    pub from: Square,
    /// Destination as `[row, col]`.
    pub to: Square,
}

/// Answer of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    /// `"healthy"` when the service is up.
    pub status: String,
    /// Number of games the service is holding.
    #[serde(default)]
    pub active_games: u64,
}

/// Operations the client needs from the game service.
///
/// Every method resolves to either the success payload or an [`ApiError`]
/// that says whether the service rejected the request or never answered.
#[async_trait]
pub trait ChessApi: Send + Sync {
    /// Starts a new game.
    async fn new_game(&self) -> Result<NewGame, ApiError>;

    /// Asks the service to play `from` -> `to` in game `session_id`.
    async fn make_move(
        &self,
        session_id: &SessionId,
        from: Square,
        to: Square,
    ) -> Result<MoveAccepted, ApiError>;

    /// Fetches the ordered move log.
    async fn history(&self, session_id: &SessionId) -> Result<Vec<MoveRecord>, ApiError>;

    /// Fetches the current authoritative state.
    async fn state(&self, session_id: &SessionId) -> Result<GameState, ApiError>;

    /// Checks that the service is up.
    async fn health(&self) -> Result<Health, ApiError>;
}
