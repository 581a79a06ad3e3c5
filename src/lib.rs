//! Strictly Chess - terminal client for a server-authoritative chess service
//!
//! The service owns the game: it checks legality, detects check and mate, and
//! keeps the move log. This crate decides what a click means, submits moves,
//! and swaps its local copy of the game for whatever the service answers.
//!
//! # Architecture
//!
//! - **Session**: the authoritative state and the request-in-flight guard
//! - **Selection**: click interpretation and the candidate-square set
//! - **Submitter**: move requests and reconciliation of the answer
//! - **Controller**: the state machine tying it together, free of I/O
//! - **Dispatcher**: runs controller commands against a [`ChessApi`]
//! - **TUI**: ratatui front end
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use strictly_chess::{SessionController, UserAction, Square};
//!
//! let mut controller = SessionController::new(Duration::from_secs(3), true);
//! let commands = controller.start_new_session();
//! assert_eq!(commands.len(), 1);
//! // ...dispatch, then feed replies back with `controller.apply(reply)`.
//! let _ = controller.handle(UserAction::Click(Square::new(7, 4).unwrap()));
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod api;
mod chess;
mod config;
mod controller;
mod dispatch;
mod error;
mod history;
mod message;
mod selection;
mod session;
mod submitter;
mod tui;

// Crate-level exports - Chess data
pub use chess::{
    BOARD_SIZE, Board, Color, GameState, GameStatus, MoveRecord, Piece, PieceKind, Square,
    SquareOutOfRange,
};

// Crate-level exports - Service API
pub use api::{ChessApi, Health, MoveAccepted, MoveBody, NewGame, RestChessClient};
pub use error::{ApiError, ApiErrorKind};

// Crate-level exports - Configuration
pub use config::{ClientConfig, ConfigError, SERVER_URL_ENV};

// Crate-level exports - Interaction state machine
pub use controller::{BUSY_MESSAGE, Command, ServiceReply, SessionController, Summary, UserAction};
pub use dispatch::{Dispatcher, execute};
pub use history::{HistoryFetch, HistoryView, format_entry, format_history};
pub use message::{MessageChannel, Severity, StatusMessage};
pub use selection::{ClickOutcome, SelectionController, SelectionPhase, candidate_squares};
pub use session::{GameSession, PendingRequest, RequestGuard, RequestTicket, SessionId};
pub use submitter::{MoveRequest, Reconciled, reconcile, status_announcement};

// Crate-level exports - Terminal UI
pub use tui::{App, run_tui};
