//! Transient notifications shown over the wizard.

use std::time::Duration;

use tokio::time::Instant;

/// How long a toast stays on screen.
pub const TOAST_DURATION: Duration = Duration::from_secs(3);

/// How long an alert stays on screen.
pub const ALERT_DURATION: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Danger,
}

impl NoticeLevel {
    pub fn label(&self) -> &'static str {
        match self {
            NoticeLevel::Info => "info",
            NoticeLevel::Success => "ok",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Danger => "error",
        }
    }
}

/// Toasts are short one-liners; alerts carry longer, multi-line text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Toast,
    Alert,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub kind: NoticeKind,
    pub message: String,
    shown_at: Instant,
}

impl Notice {
    pub fn toast(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            kind: NoticeKind::Toast,
            message: message.into(),
            shown_at: Instant::now(),
        }
    }

    pub fn alert(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            kind: NoticeKind::Alert,
            message: message.into(),
            shown_at: Instant::now(),
        }
    }

    pub fn duration(&self) -> Duration {
        match self.kind {
            NoticeKind::Toast => TOAST_DURATION,
            NoticeKind::Alert => ALERT_DURATION,
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) >= self.duration()
    }
}

/// Visible notices, oldest first.
#[derive(Debug, Clone, Default)]
pub struct NoticeQueue {
    notices: Vec<Notice>,
}

impl NoticeQueue {
    pub fn push(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    /// Drop expired notices. Returns true if anything was removed.
    pub fn prune(&mut self, now: Instant) -> bool {
        let before = self.notices.len();
        self.notices.retain(|n| !n.is_expired(now));
        self.notices.len() != before
    }

    pub fn visible(&self) -> &[Notice] {
        &self.notices
    }

    pub fn latest(&self) -> Option<&Notice> {
        self.notices.last()
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }
}
