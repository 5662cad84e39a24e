//! User-facing notifications raised on write completion.
//!
//! The core only *raises* notifications; rendering them (toasts, banners, terminal output) is up
//! to whoever implements [`Notifier`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub kind: NotificationKind,
    pub raised_at: DateTime<Utc>,
}

impl Notification {
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            kind: NotificationKind::Success,
            raised_at: Utc::now(),
        }
    }
}

/// Sink for user-facing notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Writes notifications to the log. The default when no UI is attached.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.kind {
            NotificationKind::Success => {
                tracing::info!(title = %notification.title, "{}", notification.description)
            }
            NotificationKind::Error => {
                tracing::error!(title = %notification.title, "{}", notification.description)
            }
        }
    }
}

/// Forwards notifications into an unbounded channel for a UI layer to render.
#[derive(Clone, Debug)]
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<Notification>,
}

impl ChannelNotifier {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notification: Notification) {
        if self.tx.send(notification).is_err() {
            tracing::debug!("notification receiver dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_serialises_lowercase() {
        let n = Notification::success("Saved", "It worked");
        let json = serde_json::to_value(&n).unwrap();
        assert_eq!(json["kind"], "success");
        assert_eq!(json["title"], "Saved");
        assert_eq!(json["description"], "It worked");
    }

    #[test]
    fn test_channel_notifier_forwards() {
        let (notifier, mut rx) = ChannelNotifier::new();
        notifier.notify(Notification::success("A", "B"));

        let received = rx.try_recv().unwrap();
        assert_eq!(received.title, "A");
        assert_eq!(received.kind, NotificationKind::Success);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_tracing_notifier_accepts_both_kinds() {
        let notifier: &dyn Notifier = &TracingNotifier;
        notifier.notify(Notification::success("Saved", "ok"));

        let error: Notification = serde_json::from_value(serde_json::json!({
            "title": "Failed",
            "description": "not saved",
            "kind": "error",
            "raised_at": "2026-01-11T14:35:22Z",
        }))
        .unwrap();
        assert_eq!(error.kind, NotificationKind::Error);
        notifier.notify(error);
    }

    #[test]
    fn test_channel_notifier_survives_dropped_receiver() {
        let (notifier, rx) = ChannelNotifier::new();
        drop(rx);
        notifier.notify(Notification::success("A", "B"));
    }
}
