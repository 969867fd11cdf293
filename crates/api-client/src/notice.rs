//! Live notices from the notification socket
//!
//! The board turns raw socket payloads into short-lived notices such as
//! "Water outage was published". Every accepted payload also bumps a reload
//! token so a [`Feed`](crate::feed::Feed) knows its listing is stale.
//!
//! Transport is left to the caller: feed each text frame received from
//! `/ws` into [`NoticeBoard::handle_payload`].

use serde_json::Value;
use std::time::{Duration, Instant};

/// How long a notice stays visible
pub const NOTICE_TTL: Duration = Duration::from_secs(4);

/// Title used when the payload has none
pub const FALLBACK_TITLE: &str = "A new announcement";

const CREATED_EVENT: &str = "announcement.created";

/// A notice currently on display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Text to show
    pub message: String,
    /// When the notice appeared
    pub shown_at: Instant,
}

/// Turns notification payloads into expiring notices
#[derive(Debug, Clone)]
pub struct NoticeBoard {
    current: Option<Notice>,
    reload_token: u64,
    ttl: Duration,
}

impl Default for NoticeBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl NoticeBoard {
    /// Board with the standard four-second lifetime
    #[must_use]
    pub fn new() -> Self {
        Self::with_ttl(NOTICE_TTL)
    }

    /// Board with a custom notice lifetime
    #[must_use]
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            current: None,
            reload_token: 0,
            ttl,
        }
    }

    /// Handle one payload received now
    ///
    /// Returns the new notice text when the payload announced a creation.
    pub fn handle_payload(&mut self, raw: &str) -> Option<&str> {
        self.handle_payload_at(raw, Instant::now())
    }

    /// Handle one payload received at `now`
    ///
    /// Malformed JSON and events other than `announcement.created` are
    /// ignored and leave the board untouched.
    pub fn handle_payload_at(&mut self, raw: &str, now: Instant) -> Option<&str> {
        let payload: Value = match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring malformed notification");
                return None;
            }
        };

        if payload.get("event").and_then(Value::as_str) != Some(CREATED_EVENT) {
            return None;
        }

        let title = payload
            .get("data")
            .and_then(|data| data.get("title"))
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|title| !title.is_empty())
            .unwrap_or(FALLBACK_TITLE);

        // A newer notice replaces the old one and restarts the clock
        self.current = Some(Notice {
            message: format!("{title} was published"),
            shown_at: now,
        });
        self.reload_token += 1;

        self.current.as_ref().map(|notice| notice.message.as_str())
    }

    /// The notice visible now, if any
    #[must_use]
    pub fn current(&self) -> Option<&str> {
        self.current_at(Instant::now())
    }

    /// The notice visible at `now`, if any
    #[must_use]
    pub fn current_at(&self, now: Instant) -> Option<&str> {
        self.current
            .as_ref()
            .filter(|notice| now.saturating_duration_since(notice.shown_at) < self.ttl)
            .map(|notice| notice.message.as_str())
    }

    /// Hide the current notice early
    pub fn dismiss(&mut self) {
        self.current = None;
    }

    /// Counter bumped on every accepted notification
    #[must_use]
    pub fn reload_token(&self) -> u64 {
        self.reload_token
    }
}
