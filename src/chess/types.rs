//! Wire-level chess types as the game service reports them.
//!
//! The client never derives a position of its own. Everything here is a
//! faithful, typed copy of what the service sent, so there is no move
//! generation and no rule checking in this module.

use derive_more::{Display, Error, From};
use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoEnumIterator};
use tracing::instrument;

/// Number of ranks and files on the board.
pub const BOARD_SIZE: u8 = 8;

/// Side colour.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Color {
    /// Moves first, occupies rows 6 and 7 at the start.
    White,
    /// Occupies rows 0 and 1 at the start.
    Black,
}

impl Color {
    /// The other side.
    #[instrument]
    pub fn opponent(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    /// Capitalised label for display.
    #[instrument]
    pub fn label(self) -> &'static str {
        match self {
            Self::White => "White",
            Self::Black => "Black",
        }
    }
}

/// Piece type. Serialised with the capitalised names the service uses.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, EnumIter,
)]
pub enum PieceKind {
    /// King.
    King,
    /// Queen.
    Queen,
    /// Rook.
    Rook,
    /// Bishop.
    Bishop,
    /// Knight.
    Knight,
    /// Pawn.
    Pawn,
}

/// A piece on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_new::new)]
pub struct Piece {
    /// Owning side.
    pub color: Color,
    /// Piece type.
    #[serde(rename = "type")]
    pub kind: PieceKind,
}

/// Coordinate rejected because it falls outside the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
#[display("Square ({}, {}) is outside the 8x8 board", row, col)]
pub struct SquareOutOfRange {
    /// Offending row.
    pub row: u8,
    /// Offending column.
    pub col: u8,
}

/// A board coordinate. Row 0 is the far rank as displayed, column 0 is file `a`.
///
/// Serialised as `[row, col]`, matching the service's move and history payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "[u8; 2]", into = "[u8; 2]")]
pub struct Square {
    row: u8,
    col: u8,
}

impl Square {
    /// Creates a square, or `None` when either coordinate is outside `0..8`.
    pub const fn new(row: u8, col: u8) -> Option<Self> {
        if row < BOARD_SIZE && col < BOARD_SIZE {
            Some(Self { row, col })
        } else {
            None
        }
    }

    /// Row index, 0 at the top of the display.
    pub fn row(self) -> u8 {
        self.row
    }

    /// Column index, 0 for file `a`.
    pub fn col(self) -> u8 {
        self.col
    }

    /// File letter (`'a' + col`).
    pub fn file(self) -> char {
        char::from(b'a' + self.col)
    }

    /// Rank number (`8 - row`).
    pub fn rank(self) -> u8 {
        BOARD_SIZE - self.row
    }

    /// Algebraic name such as `e2`.
    pub fn algebraic(self) -> String {
        format!("{}{}", self.file(), self.rank())
    }

    /// Whether this square is drawn with the light colour.
    pub fn is_light(self) -> bool {
        (self.row + self.col) % 2 == 0
    }

    /// The neighbouring square offset by `(d_row, d_col)`, if it is on the board.
    pub fn offset(self, d_row: i8, d_col: i8) -> Option<Self> {
        let row = self.row.checked_add_signed(d_row)?;
        let col = self.col.checked_add_signed(d_col)?;
        Self::new(row, col)
    }

    /// All 64 squares in row-major order.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..BOARD_SIZE).flat_map(|row| (0..BOARD_SIZE).map(move |col| Square { row, col }))
    }
}

impl std::fmt::Display for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

impl TryFrom<[u8; 2]> for Square {
    type Error = SquareOutOfRange;

    fn try_from([row, col]: [u8; 2]) -> Result<Self, Self::Error> {
        Self::new(row, col).ok_or(SquareOutOfRange { row, col })
    }
}

impl From<Square> for [u8; 2] {
    fn from(square: Square) -> Self {
        [square.row, square.col]
    }
}

/// An 8x8 position, row-major, exactly as the service sent it.
///
/// Deserialisation only accepts exactly eight rows of exactly eight cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, From)]
#[serde(transparent)]
pub struct Board {
    squares: [[Option<Piece>; 8]; 8],
}

impl Board {
    /// An empty board.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The piece on `square`, if any.
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.squares[usize::from(square.row)][usize::from(square.col)]
    }

    /// Returns a copy of this board with `square` set to `piece`.
    pub fn with_piece(mut self, square: Square, piece: Option<Piece>) -> Self {
        self.squares[usize::from(square.row)][usize::from(square.col)] = piece;
        self
    }

    /// Every square with its occupant, row-major.
    pub fn iter(&self) -> impl Iterator<Item = (Square, Option<Piece>)> + '_ {
        Square::all().map(|square| (square, self.piece_at(square)))
    }

    /// Squares holding a piece of `color`.
    pub fn occupied_by(&self, color: Color) -> impl Iterator<Item = Square> + '_ {
        self.iter()
            .filter(move |(_, piece)| piece.is_some_and(|p| p.color == color))
            .map(|(square, _)| square)
    }
}

/// Game status as reported by the service.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum GameStatus {
    /// Play continues normally.
    #[default]
    Active,
    /// The side to move is in check.
    Check,
    /// The side to move has been mated.
    Checkmate,
    /// The side to move has no moves and is not in check.
    Stalemate,
}

impl GameStatus {
    /// Checkmate and stalemate end the game.
    #[instrument]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Checkmate | Self::Stalemate)
    }

    /// Capitalised label for display.
    #[instrument]
    pub fn label(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Check => "Check",
            Self::Checkmate => "Checkmate",
            Self::Stalemate => "Stalemate",
        }
    }

    /// Every status, in declaration order.
    pub fn all() -> impl Iterator<Item = GameStatus> {
        Self::iter()
    }
}

/// Authoritative state tuple: position, side to move, status and move count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_new::new)]
pub struct GameState {
    /// The position.
    pub board: Board,
    /// Side to move.
    pub current_turn: Color,
    /// Status of the side to move.
    pub game_status: GameStatus,
    /// Number of moves played so far.
    pub move_count: u32,
}

/// One entry of the service's move log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_new::new)]
pub struct MoveRecord {
    /// Origin square.
    pub from: Square,
    /// Destination square.
    pub to: Square,
    /// Type of the piece that moved.
    pub piece: PieceKind,
    /// Type of the piece captured on `to`, if any.
    #[serde(default)]
    pub captured: Option<PieceKind>,
}
