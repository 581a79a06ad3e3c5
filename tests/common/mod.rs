//! Shared fixtures for integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use strictly_chess::{
    ApiError, Board, ChessApi, Color, GameState, GameStatus, Health, MoveAccepted, MoveRecord,
    NewGame, Piece, PieceKind, SessionId, Square,
};

pub fn sq(row: u8, col: u8) -> Square {
    Square::new(row, col).expect("square on board")
}

/// Standard starting arrangement: black on rows 0-1, white on rows 6-7.
pub fn starting_board() -> Board {
    use PieceKind::*;
    let back = [Rook, Knight, Bishop, Queen, King, Bishop, Knight, Rook];
    let mut board = Board::empty();
    for (col, kind) in back.into_iter().enumerate() {
        let col = col as u8;
        board = board
            .with_piece(sq(0, col), Some(Piece::new(Color::Black, kind)))
            .with_piece(sq(1, col), Some(Piece::new(Color::Black, Pawn)))
            .with_piece(sq(6, col), Some(Piece::new(Color::White, Pawn)))
            .with_piece(sq(7, col), Some(Piece::new(Color::White, kind)));
    }
    board
}

pub fn state(board: Board, turn: Color, status: GameStatus, move_count: u32) -> GameState {
    GameState::new(board, turn, status, move_count)
}

pub fn starting_state() -> GameState {
    state(starting_board(), Color::White, GameStatus::Active, 0)
}

/// Starting position after 1. e4.
pub fn after_e4() -> GameState {
    let board = starting_board()
        .with_piece(sq(6, 4), None)
        .with_piece(sq(4, 4), Some(Piece::new(Color::White, PieceKind::Pawn)));
    state(board, Color::Black, GameStatus::Active, 1)
}

pub fn new_game(id: &str) -> NewGame {
    NewGame {
        game_id: SessionId::new(id),
        state: starting_state(),
        message: Some("New game created".to_string()),
    }
}

pub fn accepted(state: GameState) -> MoveAccepted {
    MoveAccepted {
        state,
        message: "Move successful".to_string(),
    }
}

/// Calls a [`FakeApi`] received, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    NewGame,
    Move(SessionId, Square, Square),
    History(SessionId),
    State(SessionId),
    Health,
}

/// Scripted in-memory service.
///
/// Each endpoint pops its next scripted answer; an empty script yields a
/// transport error so a missing expectation shows up as a failure.
#[derive(Default)]
pub struct FakeApi {
    pub calls: Mutex<Vec<Call>>,
    pub new_games: Mutex<VecDeque<Result<NewGame, ApiError>>>,
    pub moves: Mutex<VecDeque<Result<MoveAccepted, ApiError>>>,
    pub histories: Mutex<VecDeque<Result<Vec<MoveRecord>, ApiError>>>,
    pub states: Mutex<VecDeque<Result<GameState, ApiError>>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_new_game(&self, outcome: Result<NewGame, ApiError>) {
        self.new_games.lock().unwrap().push_back(outcome);
    }

    pub fn push_move(&self, outcome: Result<MoveAccepted, ApiError>) {
        self.moves.lock().unwrap().push_back(outcome);
    }

    pub fn push_history(&self, outcome: Result<Vec<MoveRecord>, ApiError>) {
        self.histories.lock().unwrap().push_back(outcome);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

fn next<T>(queue: &Mutex<VecDeque<Result<T, ApiError>>>) -> Result<T, ApiError> {
    queue
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or_else(|| Err(ApiError::transport("no scripted response")))
}

#[async_trait]
impl ChessApi for FakeApi {
    async fn new_game(&self) -> Result<NewGame, ApiError> {
        self.record(Call::NewGame);
        next(&self.new_games)
    }

    async fn make_move(
        &self,
        session_id: &SessionId,
        from: Square,
        to: Square,
    ) -> Result<MoveAccepted, ApiError> {
        self.record(Call::Move(session_id.clone(), from, to));
        next(&self.moves)
    }

    async fn history(&self, session_id: &SessionId) -> Result<Vec<MoveRecord>, ApiError> {
        self.record(Call::History(session_id.clone()));
        next(&self.histories)
    }

    async fn state(&self, session_id: &SessionId) -> Result<GameState, ApiError> {
        self.record(Call::State(session_id.clone()));
        next(&self.states)
    }

    async fn health(&self) -> Result<Health, ApiError> {
        self.record(Call::Health);
        Ok(Health {
            status: "healthy".to_string(),
            active_games: 0,
        })
    }
}
