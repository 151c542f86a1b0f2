//! Notification sink trait and implementations.

use std::sync::{Arc, Mutex};

use super::Notice;

/// Trait for delivering notices to the applicant.
///
/// `notify()` is fire-and-forget: it must not block and its failure must not
/// affect the wizard.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Discards every notice.
#[derive(Clone, Default)]
pub struct NoOpNotificationSink;

impl NotificationSink for NoOpNotificationSink {
    fn notify(&self, _notice: Notice) {}
}

/// Collects notices in memory until they are drained.
///
/// The HTTP runtime drains it into each response; tests inspect it directly.
#[derive(Clone, Default)]
pub struct BufferedNotificationSink {
    notices: Arc<Mutex<Vec<Notice>>>,
}

impl BufferedNotificationSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all collected notices.
    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .map(|n| n.clone())
            .unwrap_or_default()
    }

    /// Removes and returns all collected notices.
    pub fn drain(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .map(|mut n| std::mem::take(&mut *n))
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.notices.lock().map(|n| n.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl NotificationSink for BufferedNotificationSink {
    fn notify(&self, notice: Notice) {
        if let Ok(mut notices) = self.notices.lock() {
            notices.push(notice);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications::NoticeLevel;

    #[test]
    fn test_noop_sink_does_not_panic() {
        let sink = NoOpNotificationSink;
        sink.notify(Notice::save_failed());
        sink.notify(Notice::submitted());
    }

    #[test]
    fn test_buffered_sink_collects_and_drains() {
        let sink = BufferedNotificationSink::new();
        assert!(sink.is_empty());

        sink.notify(Notice::save_failed());
        sink.notify(Notice::submitted());
        assert_eq!(sink.len(), 2);
        assert_eq!(sink.notices()[0].level, NoticeLevel::Error);

        let drained = sink.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[1].title, "Application Submitted!");
        assert!(sink.is_empty());
    }
}
