//! Application state and input routing.

use crossterm::event::{Event, KeyEventKind, MouseButton, MouseEventKind};
use ratatui::layout::Rect;
use tracing::{debug, instrument};

use crate::chess::Square;
use crate::controller::{Command, SessionController, UserAction};
use crate::tui::board;
use crate::tui::input::{self, KeyIntent};

/// Cursor starts on the white king's pawn.
const START_CURSOR: Square = match Square::new(6, 4) {
    Some(square) => square,
    None => panic!("start cursor must be on the board"),
};

/// Main application state.
#[derive(Debug)]
pub struct App {
    controller: SessionController,
    cursor: Square,
    board_area: Rect,
    should_quit: bool,
}

impl App {
    /// Creates a new application around `controller`.
    pub fn new(controller: SessionController) -> Self {
        Self {
            controller,
            cursor: START_CURSOR,
            board_area: Rect::default(),
            should_quit: false,
        }
    }

    /// The session controller.
    pub fn controller(&self) -> &SessionController {
        &self.controller
    }

    /// Mutable access to the session controller.
    pub fn controller_mut(&mut self) -> &mut SessionController {
        &mut self.controller
    }

    /// Keyboard cursor.
    pub fn cursor(&self) -> Square {
        self.cursor
    }

    /// Whether the user asked to leave.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Records where the board was last drawn, for mouse hit-testing.
    pub fn set_board_area(&mut self, area: Rect) {
        self.board_area = area;
    }

    /// Routes one terminal event. Returns commands for the dispatcher.
    #[instrument(skip(self))]
    pub fn handle_event(&mut self, event: Event) -> Vec<Command> {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => {
                let awaiting = *self.controller.awaiting_confirmation();
                match input::map_key(key, self.cursor, awaiting) {
                    KeyIntent::Action(action) => self.controller.handle(action),
                    KeyIntent::Cursor(square) => {
                        self.cursor = square;
                        Vec::new()
                    }
                    KeyIntent::Activate => self.controller.handle(UserAction::Click(self.cursor)),
                    KeyIntent::Quit => {
                        debug!("User quit");
                        self.should_quit = true;
                        Vec::new()
                    }
                    KeyIntent::None => Vec::new(),
                }
            }
            Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                match board::square_at(self.board_area, mouse.column, mouse.row) {
                    Some(square) => {
                        self.cursor = square;
                        self.controller.handle(UserAction::Click(square))
                    }
                    None => Vec::new(),
                }
            }
            _ => Vec::new(),
        }
    }
}
