use ratatui::style::Color;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

const MAX_TOASTS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
    Warning,
    Info,
}

impl Severity {
    pub fn color(self) -> Color {
        match self {
            Severity::Success => Color::Rgb(0x4c, 0xaf, 0x50),
            Severity::Error => Color::Rgb(0xf4, 0x43, 0x36),
            Severity::Warning => Color::Rgb(0xff, 0x98, 0x00),
            Severity::Info => Color::Rgb(0x21, 0x96, 0xf3),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub severity: Severity,
    pub posted_at: Instant,
}

/// Transient feedback shown over the UI. Callers fire and forget.
#[derive(Debug)]
pub struct Notifications {
    duration: Duration,
    toasts: VecDeque<Toast>,
}

impl Notifications {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            toasts: VecDeque::new(),
        }
    }

    pub fn notify(&mut self, message: impl Into<String>, severity: Severity, now: Instant) {
        if self.toasts.len() == MAX_TOASTS {
            self.toasts.pop_front();
        }
        self.toasts.push_back(Toast {
            message: message.into(),
            severity,
            posted_at: now,
        });
    }

    /// Drop toasts whose display interval has elapsed.
    pub fn expire(&mut self, now: Instant) {
        let duration = self.duration;
        self.toasts
            .retain(|toast| now.saturating_duration_since(toast.posted_at) < duration);
    }

    pub fn next_expiry(&self) -> Option<Instant> {
        self.toasts
            .iter()
            .map(|toast| toast.posted_at + self.duration)
            .min()
    }

    pub fn visible(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    pub fn latest(&self) -> Option<&Toast> {
        self.toasts.back()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}
