//! User-facing notifications and confirmation prompts.
//!
//! Components never render toasts themselves. They push a [`Notification`]
//! through the [`Notifier`] trait and move on; whatever front-end sits on top
//! drains the [`NotificationCenter`] and shows them.

use std::future::Future;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default display time for success, info and warning toasts.
pub const DEFAULT_DURATION: Duration = Duration::from_millis(5000);

/// Errors stay on screen longer.
pub const ERROR_DURATION: Duration = Duration::from_millis(7000);

/// Notification severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

impl Severity {
    /// How long a toast of this severity stays visible.
    #[must_use]
    pub const fn default_duration(self) -> Duration {
        match self {
            Self::Error => ERROR_DURATION,
            Self::Success | Self::Info | Self::Warning => DEFAULT_DURATION,
        }
    }
}

/// A queued toast notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub severity: Severity,
    pub title: String,
    pub message: String,
    /// Auto-dismiss delay in milliseconds (0 keeps it open).
    pub duration_ms: u64,
}

impl Notification {
    /// Build a notification with the severity's default duration.
    #[must_use]
    pub fn new(severity: Severity, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            severity,
            title: title.into(),
            message: message.into(),
            duration_ms: u64::try_from(severity.default_duration().as_millis())
                .unwrap_or(u64::MAX),
        }
    }
}

/// Fire-and-forget notification sink.
pub trait Notifier: Send + Sync {
    /// Publish a notification.
    fn notify(&self, notification: Notification);

    fn success(&self, title: &str, message: &str) {
        self.notify(Notification::new(Severity::Success, title, message));
    }

    fn info(&self, title: &str, message: &str) {
        self.notify(Notification::new(Severity::Info, title, message));
    }

    fn warning(&self, title: &str, message: &str) {
        self.notify(Notification::new(Severity::Warning, title, message));
    }

    fn error(&self, title: &str, message: &str) {
        self.notify(Notification::new(Severity::Error, title, message));
    }
}

/// In-memory queue of pending notifications.
///
/// Every notification is also mirrored to `tracing` so server logs show the
/// same trail the user saw.
#[derive(Debug, Default)]
pub struct NotificationCenter {
    queue: Mutex<Vec<Notification>>,
}

impl NotificationCenter {
    /// Create an empty notification center.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the notifications still queued.
    #[must_use]
    pub fn pending(&self) -> Vec<Notification> {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Take every queued notification, leaving the queue empty.
    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.queue.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Dismiss a single notification. Returns whether it was still queued.
    pub fn dismiss(&self, id: Uuid) -> bool {
        let mut queue = self.queue.lock().unwrap_or_else(PoisonError::into_inner);
        let before = queue.len();
        queue.retain(|n| n.id != id);
        queue.len() != before
    }

    /// Drop all queued notifications.
    pub fn clear(&self) {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Notifier for NotificationCenter {
    fn notify(&self, notification: Notification) {
        match notification.severity {
            Severity::Error => tracing::error!(
                title = %notification.title,
                "{}",
                notification.message
            ),
            Severity::Warning => tracing::warn!(
                title = %notification.title,
                "{}",
                notification.message
            ),
            Severity::Success | Severity::Info => tracing::info!(
                title = %notification.title,
                "{}",
                notification.message
            ),
        }

        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification);
    }
}

/// Text of a yes/no confirmation dialog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmPrompt {
    pub title: String,
    pub message: String,
    pub confirm_label: String,
    pub cancel_label: String,
}

impl ConfirmPrompt {
    /// Prompt with the default button labels.
    #[must_use]
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            confirm_label: "Confirm".to_string(),
            cancel_label: "Cancel".to_string(),
        }
    }

    /// Prompt for deleting a named item.
    #[must_use]
    pub fn delete(item_name: &str, item_kind: &str) -> Self {
        Self {
            title: format!("Delete {item_kind}"),
            message: format!(
                "Are you sure you want to delete \"{item_name}\"? This action cannot be undone."
            ),
            confirm_label: "Yes, delete".to_string(),
            cancel_label: "Cancel".to_string(),
        }
    }
}

/// Asks the user to confirm a destructive action.
pub trait Confirmer: Send + Sync {
    /// Resolve to `true` if the user accepted the prompt.
    fn confirm(&self, prompt: &ConfirmPrompt) -> impl Future<Output = bool> + Send;
}

/// Confirmer with a predetermined answer.
///
/// Used when the decision was already taken client-side (the HTTP surface
/// receives `confirmed` in the request body) and in tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresetAnswer(pub bool);

impl Confirmer for PresetAnswer {
    async fn confirm(&self, prompt: &ConfirmPrompt) -> bool {
        tracing::debug!(title = %prompt.title, answer = self.0, "Confirmation resolved");
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_notifications_stay_longer() {
        let err = Notification::new(Severity::Error, "Error", "boom");
        let ok = Notification::new(Severity::Success, "Done", "saved");
        assert_eq!(err.duration_ms, 7000);
        assert_eq!(ok.duration_ms, 5000);
    }

    #[test]
    fn test_center_queues_and_drains_in_order() {
        let center = NotificationCenter::new();
        center.info("First", "one");
        center.warning("Second", "two");

        let drained = center.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].severity, Severity::Info);
        assert_eq!(drained[1].title, "Second");
        assert!(center.pending().is_empty());
    }

    #[test]
    fn test_dismiss_removes_only_matching() {
        let center = NotificationCenter::new();
        center.success("Saved", "ok");
        center.error("Failed", "nope");
        let id = center.pending()[0].id;

        assert!(center.dismiss(id));
        assert!(!center.dismiss(id));
        assert_eq!(center.pending().len(), 1);
        assert_eq!(center.pending()[0].severity, Severity::Error);
    }

    #[tokio::test]
    async fn test_preset_answer() {
        let prompt = ConfirmPrompt::delete("Banner", "slider image");
        assert!(PresetAnswer(true).confirm(&prompt).await);
        assert!(!PresetAnswer(false).confirm(&prompt).await);
        assert!(prompt.message.contains("\"Banner\""));
    }
}
