//! Chess data as the client sees it: a typed mirror of the service payloads.

pub mod types;

pub use types::{
    BOARD_SIZE, Board, Color, GameState, GameStatus, MoveRecord, Piece, PieceKind, Square,
    SquareOutOfRange,
};
