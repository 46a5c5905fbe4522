//! Transient notifications shown over the dashboard.

use std::time::{Duration, Instant};

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum NoticeLevel {
    /// Confirmation of a completed action.
    Info,
    /// Something went wrong but the dashboard recovered.
    Warning,
    /// An action failed and may be retried.
    Error,
}

impl NoticeLevel {
    /// How long a notice of this level stays on screen.
    #[must_use]
    pub const fn lifetime(self) -> Duration {
        match self {
            Self::Info => Duration::from_secs(3),
            Self::Warning => Duration::from_secs(6),
            Self::Error => Duration::from_secs(10),
        }
    }

    /// Short label shown in front of the text.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// A notification with an expiry.
///
/// # Examples
///
/// ```
/// use std::time::{Duration, Instant};
/// use divedash_tui::notice::{Notice, NoticeLevel};
///
/// let now = Instant::now();
/// let notice = Notice::new(NoticeLevel::Info, "Dashboard saved", now);
/// assert!(!notice.is_expired(now));
/// assert!(notice.is_expired(now + Duration::from_secs(3)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Severity.
    pub level: NoticeLevel,
    /// Text shown to the user.
    pub text: String,
    expires_at: Instant,
}

impl Notice {
    /// Creates a notice raised at `now`.
    #[must_use]
    pub fn new(level: NoticeLevel, text: impl Into<String>, now: Instant) -> Self {
        Self {
            level,
            text: text.into(),
            expires_at: now + level.lifetime(),
        }
    }

    /// Returns `true` once the notice should no longer be shown.
    #[must_use]
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}
