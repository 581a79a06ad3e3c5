//! Move submission and reconciliation of the service's answer.

use derive_getters::Getters;
use tracing::{info, instrument, warn};

use crate::api::{ChessApi, MoveAccepted};
use crate::chess::{GameState, GameStatus, Square};
use crate::error::{ApiError, ApiErrorKind};
use crate::message::{MessageChannel, Severity};
use crate::session::{GameSession, SessionId};

/// A move attempt addressed to one game.
#[derive(Debug, Clone, PartialEq, Eq, Getters, derive_new::new)]
pub struct MoveRequest {
    /// Game the move belongs to.
    session_id: SessionId,
    /// Origin square.
    from: Square,
    /// Destination square.
    to: Square,
}

impl MoveRequest {
    /// Sends the move. No retry on failure.
    #[instrument(skip_all, fields(session_id = %self.session_id, from = %self.from, to = %self.to))]
    pub async fn send(&self, api: &dyn ChessApi) -> Result<MoveAccepted, ApiError> {
        let outcome = api.make_move(&self.session_id, self.from, self.to).await;
        match &outcome {
            Ok(accepted) => info!(message = %accepted.message, "Move accepted"),
            Err(e) => warn!(kind = %e.kind, error = %e.message, "Move not accepted"),
        }
        outcome
    }
}

/// Whether reconciliation changed the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciled {
    /// The state was replaced with the service's copy.
    Replaced,
    /// The session was left exactly as it was.
    Unchanged,
}

/// Announcement for the status the service reported after a move, if it has one.
#[instrument(skip(state))]
pub fn status_announcement(state: &GameState) -> Option<(String, Severity)> {
    match state.game_status {
        GameStatus::Checkmate => {
            let winner = state.current_turn.opponent();
            Some((format!("Checkmate! {} wins!", winner.label()), Severity::Success))
        }
        GameStatus::Check => Some((
            format!("{} is in check!", state.current_turn.label()),
            Severity::Info,
        )),
        GameStatus::Stalemate => Some(("Stalemate! Game is a draw.".to_string(), Severity::Info)),
        GameStatus::Active => None,
    }
}

/// Folds the outcome of a move request into the session and the message line.
///
/// On success the state is replaced wholesale and the service's message is
/// shown, then superseded by a check/checkmate/stalemate announcement when
/// there is one. On any failure the session is left untouched and an error
/// message is shown.
#[instrument(skip_all, fields(session_id = %session.id()))]
pub fn reconcile(
    session: &mut GameSession,
    outcome: Result<MoveAccepted, ApiError>,
    messages: &mut MessageChannel,
) -> Reconciled {
    match outcome {
        Ok(MoveAccepted { state, message }) => {
            session.replace_state(state);
            messages.show(message, Severity::Success);
            if let Some((text, severity)) = status_announcement(session.state()) {
                info!(announcement = %text, "Game status changed");
                messages.show(text, severity);
            }
            Reconciled::Replaced
        }
        Err(e) => {
            let text = match e.kind {
                ApiErrorKind::Rejected => e.message,
                ApiErrorKind::Transport => format!("Error making move: {}", e.message),
            };
            messages.show(text, Severity::Error);
            Reconciled::Unchanged
        }
    }
}
