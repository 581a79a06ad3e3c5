//! Session controller: the state machine behind the board screen.
//!
//! The controller never performs I/O. User actions and service replies go in
//! through [`SessionController::handle`] and [`SessionController::apply`];
//! what comes out is a list of [`Command`]s for the
//! [`Dispatcher`](crate::Dispatcher) to run against the service. Each call
//! runs to completion, so a state replacement and the refreshes it triggers
//! are finished before the next input is looked at.

use derive_getters::Getters;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

use crate::api::{MoveAccepted, NewGame};
use crate::chess::{GameState, MoveRecord, Square};
use crate::error::{ApiError, ApiErrorKind};
use crate::history::{HistoryFetch, HistoryView};
use crate::message::{MessageChannel, Severity};
use crate::selection::{ClickOutcome, SelectionController, SelectionPhase};
use crate::session::{GameSession, PendingRequest, RequestGuard, RequestTicket, SessionId};
use crate::submitter::{self, MoveRequest, Reconciled};

/// Text shown when a request is refused because another one is outstanding.
pub const BUSY_MESSAGE: &str = "Waiting for the server...";

/// Something the user asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAction {
    /// A board square was clicked (or activated from the keyboard).
    Click(Square),
    /// Drop the current selection.
    ClearSelection,
    /// Start a new game right away.
    NewGame,
    /// The new-game keyboard shortcut; asks first when confirmation is enabled.
    NewGameShortcut,
    /// Answer to the "start a new game?" prompt.
    Confirm(bool),
    /// Re-fetch the authoritative state of the current game.
    Resync,
}

/// Work for the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `POST /game/new`.
    NewGame {
        /// Guard ticket to hand back with the reply.
        ticket: RequestTicket,
    },
    /// `POST /game/{id}/move`.
    SubmitMove {
        /// Guard ticket to hand back with the reply.
        ticket: RequestTicket,
        /// The move.
        request: MoveRequest,
    },
    /// `GET /game/{id}/state`.
    FetchState {
        /// Guard ticket to hand back with the reply.
        ticket: RequestTicket,
        /// Game to fetch.
        session_id: SessionId,
    },
    /// `GET /game/{id}/history`. Not guarded.
    FetchHistory {
        /// Game to fetch.
        session_id: SessionId,
        /// Issue number to hand back with the reply.
        fetch: HistoryFetch,
    },
}

/// A finished service call, on its way back to the controller.
#[derive(Debug, Clone)]
pub enum ServiceReply {
    /// Result of [`Command::NewGame`].
    NewGame {
        /// Ticket from the command.
        ticket: RequestTicket,
        /// Service outcome.
        outcome: Result<NewGame, ApiError>,
    },
    /// Result of [`Command::SubmitMove`].
    Move {
        /// Ticket from the command.
        ticket: RequestTicket,
        /// Service outcome.
        outcome: Result<MoveAccepted, ApiError>,
    },
    /// Result of [`Command::FetchState`].
    State {
        /// Ticket from the command.
        ticket: RequestTicket,
        /// Game that was fetched.
        session_id: SessionId,
        /// Service outcome.
        outcome: Result<GameState, ApiError>,
    },
    /// Result of [`Command::FetchHistory`].
    History {
        /// Game that was fetched.
        session_id: SessionId,
        /// Issue number from the command.
        fetch: HistoryFetch,
        /// Service outcome.
        outcome: Result<Vec<MoveRecord>, ApiError>,
    },
}

/// Turn, status and move count, ready for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    /// Side to move.
    pub turn: &'static str,
    /// Game status.
    pub status: &'static str,
    /// Moves played.
    pub move_count: u32,
}

/// Owns everything the board screen shows and decides what each input means.
#[derive(Debug, Getters)]
pub struct SessionController {
    /// The active game, once the service has created one.
    session: Option<GameSession>,
    /// Square selection.
    selection: SelectionController,
    /// Status message line.
    messages: MessageChannel,
    /// Move log panel.
    history: HistoryView,
    /// In-flight guard for state-changing requests.
    guard: RequestGuard,
    /// Whether the new-game shortcut asks first.
    confirm_new_game: bool,
    /// True while the "start a new game?" prompt is up.
    awaiting_confirmation: bool,
}

impl SessionController {
    /// Creates a controller with no game yet.
    #[instrument]
    pub fn new(message_ttl: Duration, confirm_new_game: bool) -> Self {
        info!("Creating SessionController");
        Self {
            session: None,
            selection: SelectionController::new(),
            messages: MessageChannel::new(message_ttl),
            history: HistoryView::new(),
            guard: RequestGuard::new(),
            confirm_new_game,
            awaiting_confirmation: false,
        }
    }

    /// Current selection phase. Idle until a game exists.
    pub fn phase(&self) -> SelectionPhase {
        match &self.session {
            Some(session) => self.selection.phase(session.state()),
            None => SelectionPhase::Idle,
        }
    }

    /// True while a guarded request is outstanding.
    pub fn is_busy(&self) -> bool {
        self.guard.is_busy()
    }

    /// Turn/status/move-count summary of the active game.
    pub fn summary(&self) -> Option<Summary> {
        self.session.as_ref().map(|session| {
            let state = session.state();
            Summary {
                turn: state.current_turn.label(),
                status: state.game_status.label(),
                move_count: state.move_count,
            }
        })
    }

    /// Requests a brand-new game from the service.
    #[instrument(skip(self))]
    pub fn start_new_session(&mut self) -> Vec<Command> {
        match self.guard.begin(PendingRequest::NewGame) {
            Some(ticket) => {
                info!(%ticket, "Starting new session");
                vec![Command::NewGame { ticket }]
            }
            None => {
                self.messages.show(BUSY_MESSAGE, Severity::Info);
                Vec::new()
            }
        }
    }

    /// Handles one user action.
    #[instrument(skip(self))]
    pub fn handle(&mut self, action: UserAction) -> Vec<Command> {
        if self.awaiting_confirmation {
            self.awaiting_confirmation = false;
            match action {
                UserAction::Confirm(true) => return self.start_new_session(),
                UserAction::Confirm(false) => {
                    debug!("New game declined");
                    self.messages.show("New game cancelled", Severity::Info);
                    return Vec::new();
                }
                _ => debug!("Prompt dismissed by another action"),
            }
        }

        match action {
            UserAction::Click(square) => self.click(square),
            UserAction::ClearSelection => {
                if self.session.is_none() {
                    return Vec::new();
                }
                let had_selection = self.selection.clear();
                debug!(had_selection, "Selection cleared");
                self.messages.show("Selection cleared", Severity::Info);
                Vec::new()
            }
            UserAction::NewGame => self.start_new_session(),
            UserAction::NewGameShortcut if self.confirm_new_game => {
                self.awaiting_confirmation = true;
                self.messages.show("Start a new game? (y/n)", Severity::Info);
                Vec::new()
            }
            UserAction::NewGameShortcut => self.start_new_session(),
            UserAction::Confirm(_) => Vec::new(),
            UserAction::Resync => self.resync(),
        }
    }

    #[instrument(skip(self))]
    fn click(&mut self, square: Square) -> Vec<Command> {
        let Some(session) = &self.session else {
            debug!("Click before any game exists");
            return Vec::new();
        };

        match self.selection.click(session.state(), square) {
            ClickOutcome::GameOver => {
                self.messages
                    .show("Game is over. Start a new game!", Severity::Info);
                Vec::new()
            }
            ClickOutcome::Selected { piece, .. } => {
                self.messages.show(
                    format!("Selected {}. Click a highlighted square to move.", piece.kind),
                    Severity::Info,
                );
                Vec::new()
            }
            ClickOutcome::MoveAttempt { from, to } => {
                let session_id = session.id().clone();
                match self.guard.begin(PendingRequest::Move { from, to }) {
                    Some(ticket) => vec![Command::SubmitMove {
                        ticket,
                        request: MoveRequest::new(session_id, from, to),
                    }],
                    None => {
                        self.messages.show(BUSY_MESSAGE, Severity::Info);
                        Vec::new()
                    }
                }
            }
            ClickOutcome::Ignored => Vec::new(),
        }
    }

    #[instrument(skip(self))]
    fn resync(&mut self) -> Vec<Command> {
        let Some(session) = &self.session else {
            return Vec::new();
        };
        let session_id = session.id().clone();
        match self.guard.begin(PendingRequest::Resync) {
            Some(ticket) => vec![Command::FetchState { ticket, session_id }],
            None => {
                self.messages.show(BUSY_MESSAGE, Severity::Info);
                Vec::new()
            }
        }
    }

    /// Folds a service reply into the controller state.
    #[instrument(skip_all)]
    pub fn apply(&mut self, reply: ServiceReply) -> Vec<Command> {
        match reply {
            ServiceReply::NewGame { ticket, outcome } => {
                if !self.guard.settle(ticket) {
                    return Vec::new();
                }
                self.apply_new_game(outcome)
            }
            ServiceReply::Move { ticket, outcome } => {
                if !self.guard.settle(ticket) {
                    return Vec::new();
                }
                self.apply_move(outcome)
            }
            ServiceReply::State {
                ticket,
                session_id,
                outcome,
            } => {
                if !self.guard.settle(ticket) {
                    return Vec::new();
                }
                self.apply_state(&session_id, outcome)
            }
            ServiceReply::History {
                session_id,
                fetch,
                outcome,
            } => {
                self.history.apply(&session_id, fetch, outcome);
                Vec::new()
            }
        }
    }

    fn apply_new_game(&mut self, outcome: Result<NewGame, ApiError>) -> Vec<Command> {
        match outcome {
            Ok(NewGame { game_id, state, .. }) => {
                info!(session_id = %game_id, "New game started");
                self.session = Some(GameSession::new(game_id.clone(), state));
                self.selection.clear();
                self.history.reset(game_id);
                self.messages.show("New game started!", Severity::Success);
                self.after_state_change()
            }
            Err(e) => {
                warn!(error = %e, "New game failed");
                let text = match e.kind {
                    ApiErrorKind::Rejected => format!("Failed to create game: {}", e.message),
                    ApiErrorKind::Transport => {
                        format!("Error connecting to server: {}", e.message)
                    }
                };
                self.messages.show(text, Severity::Error);
                Vec::new()
            }
        }
    }

    fn apply_move(&mut self, outcome: Result<MoveAccepted, ApiError>) -> Vec<Command> {
        let Some(session) = self.session.as_mut() else {
            warn!("Move reply without an active game");
            return Vec::new();
        };
        match submitter::reconcile(session, outcome, &mut self.messages) {
            Reconciled::Replaced => {
                self.selection.clear();
                self.after_state_change()
            }
            Reconciled::Unchanged => Vec::new(),
        }
    }

    fn apply_state(
        &mut self,
        session_id: &SessionId,
        outcome: Result<GameState, ApiError>,
    ) -> Vec<Command> {
        let Some(session) = self.session.as_mut() else {
            return Vec::new();
        };
        if session.id() != session_id {
            debug!(%session_id, "State for a game that is no longer shown");
            return Vec::new();
        }
        match outcome {
            Ok(state) => {
                session.replace_state(state);
                self.selection.clear();
                self.messages.show("Board refreshed", Severity::Success);
                self.after_state_change()
            }
            Err(e) => {
                let text = match e.kind {
                    ApiErrorKind::Rejected => format!("Failed to refresh board: {}", e.message),
                    ApiErrorKind::Transport => {
                        format!("Error connecting to server: {}", e.message)
                    }
                };
                self.messages.show(text, Severity::Error);
                Vec::new()
            }
        }
    }

    /// Refreshes that follow every accepted state change. The board and the
    /// summary are drawn from the session on the next frame; the history has
    /// to be fetched.
    fn after_state_change(&mut self) -> Vec<Command> {
        match &self.session {
            Some(session) => vec![Command::FetchHistory {
                session_id: session.id().clone(),
                fetch: self.history.begin_fetch(),
            }],
            None => Vec::new(),
        }
    }

    /// Expires the status message if its time is up.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.messages.expire(now)
    }
}
