//! Transient notifications with auto-dismiss.
//!
//! DESIGN
//! ======
//! A session shows at most one notification at a time. Showing a new one
//! replaces the old one and restarts the dismiss timer. The timer is a
//! spawned task that is aborted on replace, cancel, and drop, so a
//! notification can never be cleared by a timer that belongs to an older
//! one or that outlives its session.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
}

pub struct Notifier {
    current: Arc<watch::Sender<Option<Notification>>>,
    timeout: Duration,
    timer: Option<JoinHandle<()>>,
}

impl Notifier {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { current: Arc::new(tx), timeout, timer: None }
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.show(Notification { message: message.into(), kind: NotificationKind::Success });
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.show(Notification { message: message.into(), kind: NotificationKind::Error });
    }

    /// Replace the current notification and restart the dismiss timer.
    /// Outside a runtime the notification stays until replaced or cancelled.
    pub fn show(&mut self, notification: Notification) {
        self.abort_timer();
        debug!(kind = ?notification.kind, message = %notification.message, "notification");
        self.current.send_replace(Some(notification));

        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            let current = Arc::clone(&self.current);
            let timeout = self.timeout;
            self.timer = Some(handle.spawn(async move {
                tokio::time::sleep(timeout).await;
                current.send_replace(None);
            }));
        }
    }

    /// Clear the notification now and stop the timer.
    pub fn cancel(&mut self) {
        self.abort_timer();
        self.current.send_replace(None);
    }

    #[must_use]
    pub fn current(&self) -> Option<Notification> {
        self.current.borrow().clone()
    }

    /// Watch notification changes (for a host that renders them).
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<Notification>> {
        self.current.subscribe()
    }

    fn abort_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

impl Drop for Notifier {
    fn drop(&mut self) {
        self.abort_timer();
    }
}

#[cfg(test)]
#[path = "notify_test.rs"]
mod tests;
