//! Transient user notifications (toasts)
//!
//! Presentation is up to the host; components only call a [`Notifier`].

use std::sync::Mutex;

/// Kind of transient notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Info,
    Error,
}

pub trait Notifier: Send + Sync {
    fn notify(&self, kind: NoticeKind, message: &str);

    fn success(&self, message: &str) {
        self.notify(NoticeKind::Success, message);
    }

    fn info(&self, message: &str) {
        self.notify(NoticeKind::Info, message);
    }

    fn error(&self, message: &str) {
        self.notify(NoticeKind::Error, message);
    }
}

/// Writes notifications to the `tracing` log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, kind: NoticeKind, message: &str) {
        match kind {
            NoticeKind::Success | NoticeKind::Info => tracing::info!(?kind, "{}", message),
            NoticeKind::Error => tracing::warn!(?kind, "{}", message),
        }
    }
}

/// Queues notifications until the host drains them
#[derive(Debug, Default)]
pub struct NoticeQueue {
    pending: Mutex<Vec<(NoticeKind, String)>>,
}

impl NoticeQueue {
    pub fn drain(&self) -> Vec<(NoticeKind, String)> {
        self.pending
            .lock()
            .map(|mut pending| std::mem::take(&mut *pending))
            .unwrap_or_default()
    }
}

impl Notifier for NoticeQueue {
    fn notify(&self, kind: NoticeKind, message: &str) {
        if let Ok(mut pending) = self.pending.lock() {
            pending.push((kind, message.to_string()));
        }
    }
}
