//! # Shopper Notifications
//!
//! Failed cart operations tell the shopper what went wrong through a
//! notifier port. Every failed call produces exactly one notification.
//!
//! ```text
//! CartStore ──► Notifier::notify(Notification)
//!                    │
//!                    ├── TracingNotifier  → log line (default)
//!                    ├── ChannelNotifier  → mpsc receiver (UI toast queue)
//!                    └── MemoryNotifier   → Vec (tests)
//! ```

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, error, warn};

// =============================================================================
// Messages
// =============================================================================

/// Adding a product failed for a reason other than stock.
pub const MSG_ADD_FAILED: &str = "Failed to add product";

/// The requested amount exceeds the available stock.
pub const MSG_OUT_OF_STOCK: &str = "Requested quantity is out of stock";

/// Removing a product failed.
pub const MSG_REMOVE_FAILED: &str = "Failed to remove product";

/// Changing a line amount failed for a reason other than stock.
pub const MSG_UPDATE_FAILED: &str = "Failed to update product quantity";

/// Emptying the cart failed.
pub const MSG_CLEAR_FAILED: &str = "Failed to clear cart";

// =============================================================================
// Notification
// =============================================================================

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Warning,
    Error,
}

/// A message for the shopper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    pub at: DateTime<Utc>,
}

impl Notification {
    /// Error-level notification stamped now.
    pub fn error(message: impl Into<String>) -> Self {
        Notification {
            level: NotificationLevel::Error,
            message: message.into(),
            at: Utc::now(),
        }
    }

    /// Warning-level notification stamped now.
    pub fn warning(message: impl Into<String>) -> Self {
        Notification {
            level: NotificationLevel::Warning,
            message: message.into(),
            at: Utc::now(),
        }
    }
}

/// Notifier port used by the cart store.
///
/// Called while the store holds its mutation lock, so implementations must
/// not block.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

// =============================================================================
// Adapters
// =============================================================================

/// Writes notifications to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Warning => {
                warn!(message = %notification.message, "Cart notification")
            }
            NotificationLevel::Error => {
                error!(message = %notification.message, "Cart notification")
            }
        }
    }
}

/// Forwards notifications to an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<Notification>,
}

impl ChannelNotifier {
    /// Creates the notifier and the receiving end for the UI.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (ChannelNotifier { tx }, rx)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notification: Notification) {
        if self.tx.send(notification).is_err() {
            debug!("Notification receiver dropped");
        }
    }
}

/// Collects notifications in memory.
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    seen: Mutex<Vec<Notification>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every notification received so far.
    pub fn notifications(&self) -> Vec<Notification> {
        self.seen.lock().map(|seen| seen.clone()).unwrap_or_default()
    }

    /// Messages received so far, oldest first.
    pub fn messages(&self) -> Vec<String> {
        self.notifications().into_iter().map(|n| n.message).collect()
    }

    pub fn count(&self) -> usize {
        self.seen.lock().map(|seen| seen.len()).unwrap_or_default()
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, notification: Notification) {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(notification);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_notifier_keeps_order() {
        let notifier = MemoryNotifier::new();
        notifier.notify(Notification::warning(MSG_OUT_OF_STOCK));
        notifier.notify(Notification::error(MSG_ADD_FAILED));

        assert_eq!(notifier.count(), 2);
        assert_eq!(notifier.messages(), vec![MSG_OUT_OF_STOCK, MSG_ADD_FAILED]);
        assert_eq!(notifier.notifications()[0].level, NotificationLevel::Warning);
    }

    #[tokio::test]
    async fn test_channel_notifier() {
        let (notifier, mut rx) = ChannelNotifier::new();
        notifier.notify(Notification::error(MSG_REMOVE_FAILED));

        let received = rx.recv().await.unwrap();
        assert_eq!(received.message, MSG_REMOVE_FAILED);
        assert_eq!(received.level, NotificationLevel::Error);
    }

    #[test]
    fn test_channel_notifier_survives_dropped_receiver() {
        let (notifier, rx) = ChannelNotifier::new();
        drop(rx);
        notifier.notify(Notification::error(MSG_UPDATE_FAILED));
    }

    #[test]
    fn test_notification_json() {
        let json = serde_json::to_value(Notification::warning("x")).unwrap();
        assert_eq!(json["level"], "warning");
        assert_eq!(json["message"], "x");
    }
}
