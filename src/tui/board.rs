//! Chess board rendering and mouse hit-testing.

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color as TermColor, Modifier, Style},
    widgets::Paragraph,
};
use std::collections::BTreeSet;

use crate::chess::{BOARD_SIZE, Board, Color, Piece, PieceKind, Square};

/// Terminal columns per square.
pub const CELL_WIDTH: u16 = 5;
/// Terminal rows per square.
pub const CELL_HEIGHT: u16 = 1;
/// Width of the rank-label gutter on the left.
const RANK_GUTTER: u16 = 2;

const LIGHT_SQUARE: TermColor = TermColor::Rgb(240, 217, 181);
const DARK_SQUARE: TermColor = TermColor::Rgb(181, 136, 99);
const SELECTED_SQUARE: TermColor = TermColor::Rgb(246, 246, 105);
const CANDIDATE_LIGHT: TermColor = TermColor::Rgb(205, 210, 106);
const CANDIDATE_DARK: TermColor = TermColor::Rgb(170, 162, 58);
const PIECE_FG: TermColor = TermColor::Black;

/// Unicode glyph for a piece.
pub fn piece_symbol(piece: Piece) -> char {
    match (piece.color, piece.kind) {
        (Color::White, PieceKind::King) => '♔',
        (Color::White, PieceKind::Queen) => '♕',
        (Color::White, PieceKind::Rook) => '♖',
        (Color::White, PieceKind::Bishop) => '♗',
        (Color::White, PieceKind::Knight) => '♘',
        (Color::White, PieceKind::Pawn) => '♙',
        (Color::Black, PieceKind::King) => '♚',
        (Color::Black, PieceKind::Queen) => '♛',
        (Color::Black, PieceKind::Rook) => '♜',
        (Color::Black, PieceKind::Bishop) => '♝',
        (Color::Black, PieceKind::Knight) => '♞',
        (Color::Black, PieceKind::Pawn) => '♟',
    }
}

/// Terminal size the board needs, labels included.
pub fn required_size() -> (u16, u16) {
    (
        RANK_GUTTER + CELL_WIDTH * u16::from(BOARD_SIZE),
        CELL_HEIGHT * u16::from(BOARD_SIZE) + 1,
    )
}

/// The rectangle covering the 64 cells when the board is drawn into `area`.
pub fn grid_rect(area: Rect) -> Rect {
    let (width, height) = required_size();
    let x = area.x + area.width.saturating_sub(width) / 2 + RANK_GUTTER;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(
        x,
        y,
        (CELL_WIDTH * u16::from(BOARD_SIZE)).min(area.width.saturating_sub(RANK_GUTTER)),
        (CELL_HEIGHT * u16::from(BOARD_SIZE)).min(area.height),
    )
}

/// The square under terminal cell `(x, y)` when the board was drawn into `area`.
pub fn square_at(area: Rect, x: u16, y: u16) -> Option<Square> {
    let grid = grid_rect(area);
    if x < grid.x || y < grid.y || x >= grid.right() || y >= grid.bottom() {
        return None;
    }
    let col = (x - grid.x) / CELL_WIDTH;
    let row = (y - grid.y) / CELL_HEIGHT;
    Square::new(u8::try_from(row).ok()?, u8::try_from(col).ok()?)
}

fn cell_rect(grid: Rect, square: Square) -> Rect {
    Rect::new(
        grid.x + u16::from(square.col()) * CELL_WIDTH,
        grid.y + u16::from(square.row()) * CELL_HEIGHT,
        CELL_WIDTH,
        CELL_HEIGHT,
    )
}

/// Pure projection of a position plus selection state onto the terminal.
#[derive(Debug, Clone, Copy)]
pub struct BoardView<'a> {
    /// Position to draw.
    pub board: &'a Board,
    /// Side to move; its pieces get the hover emphasis.
    pub turn: Color,
    /// Selected square, if any.
    pub selected: Option<Square>,
    /// Highlighted candidate squares.
    pub candidates: &'a BTreeSet<Square>,
    /// Keyboard cursor, if shown.
    pub cursor: Option<Square>,
    /// Game over: no emphasis on either side.
    pub locked: bool,
}

impl BoardView<'_> {
    /// Draws the board, centred in `area`.
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let grid = grid_rect(area);
        let buffer_area = frame.area();

        for (square, piece) in self.board.iter() {
            let rect = cell_rect(grid, square);
            if rect.right() > buffer_area.right() || rect.bottom() > buffer_area.bottom() {
                continue;
            }
            let (text, style) = self.cell(square, piece);
            frame.render_widget(
                Paragraph::new(text).style(style).alignment(Alignment::Center),
                rect,
            );
        }

        self.render_labels(frame, grid);
    }

    fn cell(&self, square: Square, piece: Option<Piece>) -> (String, Style) {
        let candidate = self.candidates.contains(&square);
        let bg = if self.selected == Some(square) {
            SELECTED_SQUARE
        } else if candidate && piece.is_some() {
            if square.is_light() { CANDIDATE_LIGHT } else { CANDIDATE_DARK }
        } else if square.is_light() {
            LIGHT_SQUARE
        } else {
            DARK_SQUARE
        };

        let mut style = Style::default().bg(bg).fg(PIECE_FG);
        let glyph = match piece {
            Some(p) => {
                if !self.locked && p.color == self.turn {
                    style = style.add_modifier(Modifier::BOLD);
                }
                piece_symbol(p)
            }
            None if candidate => '·',
            None => ' ',
        };

        let text = if self.cursor == Some(square) {
            style = style.add_modifier(Modifier::UNDERLINED);
            format!("[{}]", glyph)
        } else {
            format!(" {} ", glyph)
        };
        (text, style)
    }

    fn render_labels(&self, frame: &mut Frame, grid: Rect) {
        let label_style = Style::default().fg(TermColor::DarkGray);
        let buffer_area = frame.area();

        for row in 0..BOARD_SIZE {
            let Some(square) = Square::new(row, 0) else {
                continue;
            };
            let y = grid.y + u16::from(row) * CELL_HEIGHT;
            if grid.x < RANK_GUTTER || y >= buffer_area.bottom() {
                continue;
            }
            let rect = Rect::new(grid.x - RANK_GUTTER, y, RANK_GUTTER, 1);
            frame.render_widget(
                Paragraph::new(square.rank().to_string()).style(label_style),
                rect,
            );
        }

        let y = grid.y + CELL_HEIGHT * u16::from(BOARD_SIZE);
        if y >= buffer_area.bottom() {
            return;
        }
        for col in 0..BOARD_SIZE {
            let Some(square) = Square::new(BOARD_SIZE - 1, col) else {
                continue;
            };
            let x = grid.x + u16::from(col) * CELL_WIDTH;
            if x + CELL_WIDTH > buffer_area.right() {
                continue;
            }
            frame.render_widget(
                Paragraph::new(square.file().to_string())
                    .style(label_style)
                    .alignment(Alignment::Center),
                Rect::new(x, y, CELL_WIDTH, 1),
            );
        }
    }
}
