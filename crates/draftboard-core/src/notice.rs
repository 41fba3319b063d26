// Transient user-facing messages that clear themselves after a few seconds.

use std::time::Duration;

use tokio::time::Instant;

/// How long a notice stays up by default.
pub const DEFAULT_NOTICE_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub expires_at: Instant,
}

/// Holds at most one live notice. Posting replaces whatever was showing.
#[derive(Debug, Clone)]
pub struct NoticeBoard {
    ttl: Duration,
    current: Option<Notice>,
}

impl Default for NoticeBoard {
    fn default() -> Self {
        NoticeBoard::new(DEFAULT_NOTICE_TTL)
    }
}

impl NoticeBoard {
    pub fn new(ttl: Duration) -> Self {
        NoticeBoard { ttl, current: None }
    }

    pub fn post(&mut self, message: impl Into<String>) -> &Notice {
        self.post_at(message, Instant::now())
    }

    pub fn post_at(&mut self, message: impl Into<String>, now: Instant) -> &Notice {
        self.current.insert(Notice {
            message: message.into(),
            expires_at: now + self.ttl,
        })
    }

    /// The live message, if any. Does not check expiry; call [`expire`]
    /// from the owner's clock tick.
    ///
    /// [`expire`]: NoticeBoard::expire
    pub fn current(&self) -> Option<&str> {
        self.current.as_ref().map(|n| n.message.as_str())
    }

    /// Clear the notice if its time is up. Returns true when it was cleared.
    pub fn expire(&mut self, now: Instant) -> bool {
        match &self.current {
            Some(notice) if now >= notice.expires_at => {
                self.current = None;
                true
            }
            _ => false,
        }
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.current.as_ref().map(|n| n.expires_at)
    }
}
