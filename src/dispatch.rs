//! Runs controller commands against the service off the UI loop.

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, instrument};

use crate::api::ChessApi;
use crate::controller::{Command, ServiceReply};
use crate::history;

/// Executes one command and packages the result for the controller.
#[instrument(skip(api))]
pub async fn execute(api: &dyn ChessApi, command: Command) -> ServiceReply {
    match command {
        Command::NewGame { ticket } => ServiceReply::NewGame {
            ticket,
            outcome: api.new_game().await,
        },
        Command::SubmitMove { ticket, request } => ServiceReply::Move {
            ticket,
            outcome: request.send(api).await,
        },
        Command::FetchState { ticket, session_id } => {
            let outcome = api.state(&session_id).await;
            ServiceReply::State {
                ticket,
                session_id,
                outcome,
            }
        }
        Command::FetchHistory { session_id, fetch } => {
            let outcome = history::fetch(api, &session_id).await;
            ServiceReply::History {
                session_id,
                fetch,
                outcome,
            }
        }
    }
}

/// Spawns each command as its own task and sends the reply back over a channel.
///
/// The UI loop stays responsive while requests are outstanding and picks the
/// replies up between frames.
#[derive(Clone)]
pub struct Dispatcher {
    api: Arc<dyn ChessApi>,
    replies: mpsc::UnboundedSender<ServiceReply>,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher").finish_non_exhaustive()
    }
}

impl Dispatcher {
    /// Creates a dispatcher that reports on `replies`.
    pub fn new(api: Arc<dyn ChessApi>, replies: mpsc::UnboundedSender<ServiceReply>) -> Self {
        Self { api, replies }
    }

    /// Starts `command` in the background.
    #[instrument(skip(self))]
    pub fn dispatch(&self, command: Command) -> JoinHandle<()> {
        let api = Arc::clone(&self.api);
        let replies = self.replies.clone();
        tokio::spawn(async move {
            let reply = execute(api.as_ref(), command).await;
            if replies.send(reply).is_err() {
                debug!("Reply receiver dropped, UI has shut down");
            }
        })
    }

    /// Starts every command in `commands`.
    pub fn dispatch_all(&self, commands: impl IntoIterator<Item = Command>) {
        for command in commands {
            self.dispatch(command);
        }
    }
}
