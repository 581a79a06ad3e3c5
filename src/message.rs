//! The one-line status message shown under the board.

use derive_getters::Getters;
use std::time::{Duration, Instant};
use tracing::{debug, instrument};

/// Message severity; also selects the colour it is drawn in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    /// Neutral guidance.
    Info,
    /// Something worked. Expires on its own.
    Success,
    /// Something failed.
    Error,
}

/// A status message.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct StatusMessage {
    /// Text shown to the user.
    text: String,
    /// Severity.
    severity: Severity,
    /// When it was shown.
    created_at: Instant,
    /// Monotonic number identifying this particular message.
    generation: u64,
}

/// Holds at most one live [`StatusMessage`].
///
/// Success messages get a deadline when shown. The deadline is tied to the
/// message's generation, so a newer message never gets cleared by an older
/// message's timer, even when the texts are identical.
#[derive(Debug)]
pub struct MessageChannel {
    current: Option<StatusMessage>,
    expiry: Option<(u64, Instant)>,
    generation: u64,
    ttl: Duration,
}

impl MessageChannel {
    /// Creates an empty channel whose success messages last `ttl`.
    #[instrument]
    pub fn new(ttl: Duration) -> Self {
        Self {
            current: None,
            expiry: None,
            generation: 0,
            ttl,
        }
    }

    /// Shows `text`, replacing whatever was there.
    pub fn show(&mut self, text: impl Into<String>, severity: Severity) -> u64 {
        self.show_at(text, severity, Instant::now())
    }

    /// Shows `text` as if at time `now`. Returns the new message's generation.
    #[instrument(skip(self, text))]
    pub fn show_at(&mut self, text: impl Into<String>, severity: Severity, now: Instant) -> u64 {
        self.generation += 1;
        let text = text.into();
        debug!(generation = self.generation, %severity, text = %text, "Showing message");

        self.expiry = match severity {
            Severity::Success => Some((self.generation, now + self.ttl)),
            Severity::Info | Severity::Error => None,
        };
        self.current = Some(StatusMessage {
            text,
            severity,
            created_at: now,
            generation: self.generation,
        });
        self.generation
    }

    /// Clears the current message if its own deadline has passed.
    ///
    /// Returns `true` when something was cleared.
    #[instrument(skip(self))]
    pub fn expire(&mut self, now: Instant) -> bool {
        let Some((generation, deadline)) = self.expiry else {
            return false;
        };
        if now < deadline {
            return false;
        }
        self.expiry = None;
        match &self.current {
            Some(message) if message.generation == generation => {
                debug!(generation, "Message expired");
                self.current = None;
                true
            }
            _ => false,
        }
    }

    /// Removes the current message immediately.
    pub fn clear(&mut self) {
        self.current = None;
        self.expiry = None;
    }

    /// The live message, if any.
    pub fn current(&self) -> Option<&StatusMessage> {
        self.current.as_ref()
    }

    /// Text of the live message, if any.
    pub fn text(&self) -> Option<&str> {
        self.current.as_ref().map(|m| m.text.as_str())
    }

    /// When the live message will expire, if it will.
    pub fn deadline(&self) -> Option<Instant> {
        self.expiry.map(|(_, deadline)| deadline)
    }
}
