//! Environment ports the session controller signals through.
//!
//! Notification rendering and power management belong to the host platform.
//! The controller only describes what to show and when the wake lock is
//! needed; adapters in the API layer decide how.

/// How a notification should be laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationStyle {
    /// Title and one line of text.
    Simple,
    /// Title plus a body that may be expanded to show long text.
    Expandable,
}

/// A user-visible notification request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub style: NotificationStyle,
}

impl Notification {
    pub fn simple(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            style: NotificationStyle::Simple,
        }
    }

    pub fn expandable(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            style: NotificationStyle::Expandable,
        }
    }
}

/// Renders notifications raised by the controller.
pub trait Notifier: Send + Sync {
    /// Show a notification.
    fn notify(&self, notification: Notification);

    /// Remove every notification this service raised.
    fn cancel_all(&self);
}

/// Keeps the device awake while a session is active.
///
/// The controller calls `acquire` once on the first command it handles and
/// `release` once at shutdown.
pub trait WakeLock: Send + Sync {
    fn acquire(&self);
    fn release(&self);
}

/// Notifier that drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, _notification: Notification) {}
    fn cancel_all(&self) {}
}

/// Wake lock for hosts without power management.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopWakeLock;

impl WakeLock for NoopWakeLock {
    fn acquire(&self) {}
    fn release(&self) {}
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    /// Notifier that records every request.
    #[derive(Default)]
    pub struct RecordingNotifier {
        pub shown: Mutex<Vec<Notification>>,
        pub cancel_calls: AtomicUsize,
    }

    impl RecordingNotifier {
        pub fn titles(&self) -> Vec<String> {
            self.shown
                .lock()
                .unwrap()
                .iter()
                .map(|n| n.title.clone())
                .collect()
        }
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, notification: Notification) {
            self.shown.lock().unwrap().push(notification);
        }

        fn cancel_all(&self) {
            self.cancel_calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// Wake lock that counts acquire/release calls.
    #[derive(Default)]
    pub struct CountingWakeLock {
        pub acquired: AtomicUsize,
        pub released: AtomicUsize,
    }

    impl CountingWakeLock {
        pub fn acquired(&self) -> usize {
            self.acquired.load(Ordering::SeqCst)
        }

        pub fn released(&self) -> usize {
            self.released.load(Ordering::SeqCst)
        }
    }

    impl WakeLock for CountingWakeLock {
        fn acquire(&self) {
            self.acquired.fetch_add(1, Ordering::SeqCst);
        }

        fn release(&self) {
            self.released.fetch_add(1, Ordering::SeqCst);
        }
    }
}
