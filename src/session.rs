//! The active game session and the request-in-flight guard.

use derive_getters::Getters;
use derive_more::{Display, From};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::chess::{GameState, Square};

/// Opaque identifier the service assigns to a game.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, From, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Wraps a raw identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SessionId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// The single authoritative game the client is showing.
///
/// The state is only ever swapped for a complete copy received from the
/// service; there is no way to patch part of it.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct GameSession {
    /// Service-assigned identifier.
    id: SessionId,
    /// Last state received from the service.
    state: GameState,
}

impl GameSession {
    /// Creates a session from a fresh service response.
    #[instrument(skip(state), fields(session_id = %id))]
    pub fn new(id: SessionId, state: GameState) -> Self {
        info!(
            turn = %state.current_turn,
            status = %state.game_status,
            "Creating game session"
        );
        Self { id, state }
    }

    /// Replaces the state wholesale with the service's copy.
    #[instrument(skip(self, state), fields(session_id = %self.id))]
    pub fn replace_state(&mut self, state: GameState) {
        debug!(
            move_count = state.move_count,
            turn = %state.current_turn,
            status = %state.game_status,
            "Replacing authoritative state"
        );
        self.state = state;
    }
}

/// What an outstanding guarded request is for.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum PendingRequest {
    /// `POST /game/new`.
    #[display("new game")]
    NewGame,
    /// `POST /game/{id}/move`.
    #[display("move {} -> {}", from, to)]
    Move {
        /// Origin square.
        from: Square,
        /// Destination square.
        to: Square,
    },
    /// `GET /game/{id}/state`.
    #[display("state resync")]
    Resync,
}

/// Proof that a guarded request was admitted. Replies carry it back so the
/// guard can tell the current request from a stale one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[display("#{}", _0)]
pub struct RequestTicket(u64);

/// Admits at most one state-changing request at a time.
#[derive(Debug, Default, Getters)]
pub struct RequestGuard {
    /// The outstanding request and its ticket, if any.
    outstanding: Option<(RequestTicket, PendingRequest)>,
    #[getter(skip)]
    next: u64,
}

impl RequestGuard {
    /// Creates an idle guard.
    pub fn new() -> Self {
        Self::default()
    }

    /// True while a request is outstanding.
    pub fn is_busy(&self) -> bool {
        self.outstanding.is_some()
    }

    /// Admits `request` if nothing else is outstanding.
    #[instrument(skip(self))]
    pub fn begin(&mut self, request: PendingRequest) -> Option<RequestTicket> {
        if let Some((ticket, pending)) = &self.outstanding {
            warn!(%ticket, %pending, "Request refused, another one is in flight");
            return None;
        }
        self.next += 1;
        let ticket = RequestTicket(self.next);
        debug!(%ticket, %request, "Request admitted");
        self.outstanding = Some((ticket, request));
        Some(ticket)
    }

    /// Releases the guard if `ticket` is the outstanding one.
    ///
    /// Returns `false` for a stale ticket; the caller must then discard the reply.
    #[instrument(skip(self))]
    pub fn settle(&mut self, ticket: RequestTicket) -> bool {
        match &self.outstanding {
            Some((current, _)) if *current == ticket => {
                self.outstanding = None;
                true
            }
            _ => {
                warn!(%ticket, "Discarding reply for a request that is no longer current");
                false
            }
        }
    }
}
