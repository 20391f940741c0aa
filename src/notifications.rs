//! Messages exchanged between the refresh loop and the cache refresher task

use tokio::sync::mpsc;

/// Signals passed between the board's tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// Ask the cache refresher to download the reference datasets again
    RequestCacheUpdate,
    /// The persisted reference datasets were replaced
    CacheUpdated,
    /// A configuration problem that should be reported but is not fatal
    ConfigError(String),
}

pub type NotificationSender = mpsc::UnboundedSender<Notification>;
pub type NotificationReceiver = mpsc::UnboundedReceiver<Notification>;

/// Creates a notification channel
pub fn channel() -> (NotificationSender, NotificationReceiver) {
    mpsc::unbounded_channel()
}
