//! Square selection: what a click on the board means.
//!
//! The controller feeds every board click through [`SelectionController::click`]
//! and acts on the returned [`ClickOutcome`]. Nothing here talks to the network
//! or knows chess rules.

use std::collections::BTreeSet;
use tracing::{debug, instrument};

use crate::chess::{Board, Color, GameState, Piece, Square};

static NO_CANDIDATES: BTreeSet<Square> = BTreeSet::new();

/// Squares highlighted for a selected piece of `color`.
///
/// Every square that is empty or holds an opposing piece. This deliberately
/// over-approximates the legal moves; the service decides legality when the
/// move is submitted.
#[instrument(skip(board))]
pub fn candidate_squares(board: &Board, color: Color) -> BTreeSet<Square> {
    board
        .iter()
        .filter(|(_, piece)| piece.is_none_or(|p| p.color != color))
        .map(|(square, _)| square)
        .collect()
}

/// Where the selection state machine currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum SelectionPhase {
    /// Nothing selected.
    Idle,
    /// A piece is selected and candidates are highlighted.
    Selecting,
    /// The game is over; clicks do nothing until a new game replaces it.
    Locked,
}

/// What a click turned out to mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The game is over, nothing happened.
    GameOver,
    /// A piece of the side to move is now selected.
    Selected {
        /// The selected square.
        square: Square,
        /// The piece on it.
        piece: Piece,
    },
    /// The click completed a move attempt; the selection has been cleared.
    MoveAttempt {
        /// Previously selected square.
        from: Square,
        /// Clicked square.
        to: Square,
    },
    /// Nothing selected and nothing selectable was clicked.
    Ignored,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
enum SelectionState {
    #[default]
    Idle,
    Selecting {
        square: Square,
        candidates: BTreeSet<Square>,
    },
}

/// Owns the transient selection and its candidate set.
#[derive(Debug, Clone, Default)]
pub struct SelectionController {
    state: SelectionState,
}

impl SelectionController {
    /// Creates an idle controller.
    pub fn new() -> Self {
        Self::default()
    }

    /// The phase for the given authoritative state.
    pub fn phase(&self, game: &GameState) -> SelectionPhase {
        if game.game_status.is_terminal() {
            return SelectionPhase::Locked;
        }
        match self.state {
            SelectionState::Idle => SelectionPhase::Idle,
            SelectionState::Selecting { .. } => SelectionPhase::Selecting,
        }
    }

    /// The selected square, if any.
    pub fn selected(&self) -> Option<Square> {
        match &self.state {
            SelectionState::Idle => None,
            SelectionState::Selecting { square, .. } => Some(*square),
        }
    }

    /// Highlighted squares; empty while idle.
    pub fn candidates(&self) -> &BTreeSet<Square> {
        match &self.state {
            SelectionState::Idle => &NO_CANDIDATES,
            SelectionState::Selecting { candidates, .. } => candidates,
        }
    }

    /// Whether `square` is highlighted.
    pub fn is_candidate(&self, square: Square) -> bool {
        self.candidates().contains(&square)
    }

    /// Interprets a click on `square` against the authoritative `game`.
    #[instrument(skip_all, fields(square = %square, turn = %game.current_turn))]
    pub fn click(&mut self, game: &GameState, square: Square) -> ClickOutcome {
        if game.game_status.is_terminal() {
            debug!(status = %game.game_status, "Click ignored, game is over");
            return ClickOutcome::GameOver;
        }

        if let Some(piece) = game.board.piece_at(square)
            && piece.color == game.current_turn
        {
            let candidates = candidate_squares(&game.board, piece.color);
            debug!(candidates = candidates.len(), kind = %piece.kind, "Piece selected");
            self.state = SelectionState::Selecting { square, candidates };
            return ClickOutcome::Selected { square, piece };
        }

        match std::mem::take(&mut self.state) {
            SelectionState::Selecting { square: from, .. } => {
                debug!(from = %from, to = %square, "Move attempt");
                ClickOutcome::MoveAttempt { from, to: square }
            }
            SelectionState::Idle => ClickOutcome::Ignored,
        }
    }

    /// Drops the selection. Returns `true` if something was selected.
    #[instrument(skip(self))]
    pub fn clear(&mut self) -> bool {
        let had_selection = self.selected().is_some();
        self.state = SelectionState::Idle;
        had_selection
    }
}
