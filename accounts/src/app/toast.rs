use ratatui::{
    style::{Color, Style},
    widgets::Paragraph,
};
use std::time::{Duration, Instant};

/// How long a toast stays on screen.
pub const TOAST_TTL: Duration = Duration::from_secs(5);

/// Toast severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

/// A short-lived message shown at the bottom of the screen.
#[derive(Debug, Clone)]
pub struct Toast {
    pub kind: ToastKind,
    pub text: String,
    pub created: Instant,
}

impl Toast {
    pub fn success(text: impl Into<String>) -> Self {
        Self::new(ToastKind::Success, text.into())
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(ToastKind::Error, text.into())
    }

    fn new(kind: ToastKind, text: String) -> Self {
        Self {
            kind,
            text,
            created: Instant::now(),
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now.duration_since(self.created) > TOAST_TTL
    }

    pub fn widget(&self) -> Paragraph<'_> {
        let style = match self.kind {
            ToastKind::Success => Style::default().fg(Color::Green),
            ToastKind::Error => Style::default().fg(Color::Red),
        };
        Paragraph::new(self.text.as_str()).style(style)
    }
}
