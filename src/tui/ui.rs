//! Stateless screen rendering.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

use crate::chess::Square;
use crate::controller::SessionController;
use crate::message::Severity;
use crate::selection::SelectionPhase;
use crate::tui::board::BoardView;

/// Areas of the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenLayout {
    /// Title line.
    pub title: Rect,
    /// Board, labels included.
    pub board: Rect,
    /// Turn / status / move count panel.
    pub summary: Rect,
    /// Move history panel.
    pub history: Rect,
    /// Status message line.
    pub message: Rect,
    /// Key legend.
    pub legend: Rect,
}

/// Splits the terminal into the screen's areas.
pub fn layout(area: Rect) -> ScreenLayout {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title
            Constraint::Min(10),   // Board + side panel
            Constraint::Length(3), // Message
            Constraint::Length(1), // Legend
        ])
        .split(area);

    let main = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(44), Constraint::Length(32)])
        .split(rows[1]);

    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(3)])
        .split(main[1]);

    ScreenLayout {
        title: rows[0],
        board: main[0],
        summary: side[0],
        history: side[1],
        message: rows[2],
        legend: rows[3],
    }
}

/// Draws the whole screen. Returns the area the board was drawn into, for
/// mouse hit-testing.
pub fn draw(frame: &mut Frame, controller: &SessionController, cursor: Square) -> Rect {
    let areas = layout(frame.area());

    let title = Paragraph::new("Strictly Chess")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center);
    frame.render_widget(title, areas.title);

    draw_board(frame, areas.board, controller, cursor);
    draw_summary(frame, areas.summary, controller);
    draw_history(frame, areas.history, controller);
    draw_message(frame, areas.message, controller);

    let legend = Paragraph::new("←↑↓→ move  Enter select  Esc clear  n new game  r resync  q quit")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(legend, areas.legend);

    areas.board
}

fn draw_board(frame: &mut Frame, area: Rect, controller: &SessionController, cursor: Square) {
    let Some(session) = controller.session() else {
        let waiting = Paragraph::new("Connecting to game server...")
            .style(Style::default().fg(Color::Yellow))
            .alignment(Alignment::Center);
        frame.render_widget(waiting, area);
        return;
    };

    let state = session.state();
    let view = BoardView {
        board: &state.board,
        turn: state.current_turn,
        selected: controller.selection().selected(),
        candidates: controller.selection().candidates(),
        cursor: Some(cursor),
        locked: controller.phase() == SelectionPhase::Locked,
    };
    view.render(frame, area);
}

fn draw_summary(frame: &mut Frame, area: Rect, controller: &SessionController) {
    let lines = match controller.summary() {
        Some(summary) => vec![
            Line::from(vec![Span::raw("Turn:   "), Span::styled(summary.turn, bold())]),
            Line::from(vec![Span::raw("Status: "), Span::styled(summary.status, bold())]),
            Line::from(vec![
                Span::raw("Moves:  "),
                Span::styled(summary.move_count.to_string(), bold()),
            ]),
        ],
        None => vec![Line::from("No game yet")],
    };

    let title = if controller.is_busy() { "Game (waiting…)" } else { "Game" };
    let paragraph =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(paragraph, area);
}

fn draw_history(frame: &mut Frame, area: Rect, controller: &SessionController) {
    let lines = controller.history().lines();
    let visible = usize::from(area.height.saturating_sub(2));
    let skip = lines.len().saturating_sub(visible);
    let items: Vec<ListItem> = lines
        .iter()
        .skip(skip)
        .map(|line| ListItem::new(line.as_str()))
        .collect();

    let list = List::new(items).block(Block::default().borders(Borders::ALL).title("Moves"));
    frame.render_widget(list, area);
}

fn draw_message(frame: &mut Frame, area: Rect, controller: &SessionController) {
    let (text, color) = match controller.messages().current() {
        Some(message) => {
            let color = match message.severity() {
                Severity::Info => Color::Yellow,
                Severity::Success => Color::Green,
                Severity::Error => Color::Red,
            };
            (message.text().as_str(), color)
        }
        None => ("", Color::Reset),
    };

    let paragraph = Paragraph::new(text)
        .style(Style::default().fg(color))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}
