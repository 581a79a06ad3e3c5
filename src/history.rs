//! Move history panel.

use derive_more::Display;
use tracing::{debug, instrument, warn};

use crate::api::ChessApi;
use crate::chess::MoveRecord;
use crate::error::ApiError;
use crate::session::SessionId;

/// Renders one history entry, e.g. `2. Pawn d7 → d5 (captured Pawn)`.
pub fn format_entry(index: usize, record: &MoveRecord) -> String {
    let mut line = format!("{}. {} {} → {}", index, record.piece, record.from, record.to);
    if let Some(captured) = record.captured {
        line.push_str(&format!(" (captured {})", captured));
    }
    line
}

/// Renders a whole move log, numbered from 1.
pub fn format_history(records: &[MoveRecord]) -> Vec<String> {
    records
        .iter()
        .enumerate()
        .map(|(i, record)| format_entry(i + 1, record))
        .collect()
}

/// Fetches the move log for `session_id`.
#[instrument(skip_all, fields(session_id = %session_id))]
pub async fn fetch(api: &dyn ChessApi, session_id: &SessionId) -> Result<Vec<MoveRecord>, ApiError> {
    api.history(session_id).await
}

/// Issue number of a history fetch. Later fetches compare greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display("#{}", _0)]
pub struct HistoryFetch(u64);

/// The rendered move log of the active game.
///
/// Fetches are numbered when issued. A reply older than the last one applied
/// is dropped, so out-of-order replies never roll the log back.
#[derive(Debug, Clone, Default)]
pub struct HistoryView {
    session_id: Option<SessionId>,
    lines: Vec<String>,
    issued: u64,
    applied: Option<HistoryFetch>,
}

impl HistoryView {
    /// Creates an empty view.
    pub fn new() -> Self {
        Self::default()
    }

    /// Points the view at a different game and forgets the old log.
    #[instrument(skip_all, fields(session_id = %session_id))]
    pub fn reset(&mut self, session_id: SessionId) {
        debug!("Resetting history view");
        self.session_id = Some(session_id);
        self.lines.clear();
        self.applied = None;
    }

    /// Numbers a new fetch for the current game.
    pub fn begin_fetch(&mut self) -> HistoryFetch {
        self.issued += 1;
        HistoryFetch(self.issued)
    }

    /// Applies a fetch result.
    ///
    /// Results for a game other than the current one, and results older than
    /// the last one applied, are dropped. Failures are logged and the previous
    /// lines stay on screen.
    #[instrument(skip_all, fields(session_id = %session_id, fetch = %fetch))]
    pub fn apply(
        &mut self,
        session_id: &SessionId,
        fetch: HistoryFetch,
        outcome: Result<Vec<MoveRecord>, ApiError>,
    ) {
        if self.session_id.as_ref() != Some(session_id) {
            debug!("Dropping history for a game that is no longer shown");
            return;
        }
        if let Some(applied) = self.applied
            && fetch <= applied
        {
            debug!(%applied, "Dropping history older than the one shown");
            return;
        }
        match outcome {
            Ok(records) => {
                debug!(moves = records.len(), "History refreshed");
                self.lines = format_history(&records);
                self.applied = Some(fetch);
            }
            Err(e) => warn!(error = %e, "Error fetching move history"),
        }
    }

    /// Rendered entries, oldest first.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Game the view belongs to.
    pub fn session_id(&self) -> Option<&SessionId> {
        self.session_id.as_ref()
    }
}
