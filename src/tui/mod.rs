//! Terminal UI for Strictly Chess

mod app;
pub mod board;
pub mod input;
mod ui;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tokio::time::{Duration, sleep};
use tracing::{debug, error, info, instrument};

use crate::api::RestChessClient;
use crate::config::ClientConfig;
use crate::controller::SessionController;
use crate::dispatch::Dispatcher;

pub use app::App;

/// Pause between frames; spawned requests run while the loop waits here.
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Run the TUI client
pub async fn run_tui(config: ClientConfig) -> Result<()> {
    // Log to file so tracing output does not interfere with the TUI
    let log_file = std::fs::File::create(config.log_file())?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .try_init(); // Don't panic if already initialized

    info!(server_url = %config.server_url(), "Starting Strictly Chess TUI");

    let client = RestChessClient::new(config.server_url(), config.request_timeout())?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let controller = SessionController::new(config.message_ttl(), *config.confirm_new_game());
    let res = run_app(&mut terminal, App::new(controller), Arc::new(client)).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        error!(error = ?err, "TUI loop error");
    }
    res
}

/// Event loop: draw, fold in service replies, expire messages, read input.
#[instrument(skip_all)]
async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
    api: Arc<RestChessClient>,
) -> Result<()>
where
    <B as ratatui::backend::Backend>::Error: Send + Sync + 'static,
{
    let (reply_tx, mut reply_rx) = mpsc::unbounded_channel();
    let dispatcher = Dispatcher::new(api, reply_tx);

    dispatcher.dispatch_all(app.controller_mut().start_new_session());

    loop {
        let mut board_area = ratatui::layout::Rect::default();
        terminal.draw(|f| board_area = ui::draw(f, app.controller(), app.cursor()))?;
        app.set_board_area(board_area);

        while let Ok(reply) = reply_rx.try_recv() {
            debug!(?reply, "Service reply");
            let commands = app.controller_mut().apply(reply);
            dispatcher.dispatch_all(commands);
        }

        app.controller_mut().tick(Instant::now());

        // Non-blocking: requests only progress while the loop is parked in `sleep`.
        if event::poll(Duration::ZERO)? {
            let commands = app.handle_event(event::read()?);
            dispatcher.dispatch_all(commands);
        }

        if app.should_quit() {
            info!("Leaving Strictly Chess TUI");
            return Ok(());
        }

        sleep(FRAME_INTERVAL).await;
    }
}
