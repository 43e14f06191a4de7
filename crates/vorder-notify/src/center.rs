//! Toast queue and modal management.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Visual category of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

/// A transient notification.
#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: Uuid,
    pub kind: ToastKind,
    pub title: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Toast {
    /// Whether this toast has outlived the auto-dismiss interval at `now`.
    fn expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        match chrono::Duration::from_std(ttl) {
            Ok(ttl) => now - self.created_at >= ttl,
            Err(_) => false,
        }
    }
}

/// A blocking notification. At most one is shown at a time; showing a new
/// one replaces the current.
#[derive(Debug, Clone, PartialEq)]
pub struct Modal {
    pub title: String,
    pub message: String,
}

/// Owner of all pending user feedback.
///
/// Toasts queue in arrival order and self-dismiss once expired; callers
/// drive expiry by passing the current time, which keeps the center free of
/// timers and easy to test.
pub struct NotificationCenter {
    toasts: Mutex<VecDeque<Toast>>,
    modal: Mutex<Option<Modal>>,
    dismiss_after: Duration,
}

impl NotificationCenter {
    /// Create a center whose toasts self-dismiss after `dismiss_after`.
    pub fn new(dismiss_after: Duration) -> Self {
        Self {
            toasts: Mutex::new(VecDeque::new()),
            modal: Mutex::new(None),
            dismiss_after,
        }
    }

    /// Queue a toast, returning its id.
    pub fn push(&self, kind: ToastKind, title: impl Into<String>, message: impl Into<String>) -> Uuid {
        let toast = Toast {
            id: Uuid::new_v4(),
            kind,
            title: title.into(),
            message: message.into(),
            created_at: Utc::now(),
        };
        let id = toast.id;
        tracing::info!(kind = ?toast.kind, title = %toast.title, "Toast queued");
        self.toasts.lock().unwrap().push_back(toast);
        id
    }

    pub fn success(&self, title: impl Into<String>, message: impl Into<String>) -> Uuid {
        self.push(ToastKind::Success, title, message)
    }

    pub fn error(&self, title: impl Into<String>, message: impl Into<String>) -> Uuid {
        self.push(ToastKind::Error, title, message)
    }

    pub fn info(&self, title: impl Into<String>, message: impl Into<String>) -> Uuid {
        self.push(ToastKind::Info, title, message)
    }

    /// Dismiss a toast by id. Returns `true` if it was found and removed.
    pub fn dismiss(&self, id: Uuid) -> bool {
        let mut toasts = self.toasts.lock().unwrap();
        if let Some(pos) = toasts.iter().position(|t| t.id == id) {
            toasts.remove(pos);
            true
        } else {
            false
        }
    }

    /// Drop every toast that has expired by `now`, returning how many were
    /// removed.
    pub fn sweep(&self, now: DateTime<Utc>) -> usize {
        let mut toasts = self.toasts.lock().unwrap();
        let before = toasts.len();
        toasts.retain(|t| !t.expired(now, self.dismiss_after));
        before - toasts.len()
    }

    /// The toasts still alive at `now`, in arrival order.
    pub fn active(&self, now: DateTime<Utc>) -> Vec<Toast> {
        self.toasts
            .lock()
            .unwrap()
            .iter()
            .filter(|t| !t.expired(now, self.dismiss_after))
            .cloned()
            .collect()
    }

    /// Number of queued toasts, expired or not.
    pub fn toast_count(&self) -> usize {
        self.toasts.lock().unwrap().len()
    }

    /// Show a blocking modal, replacing any current one.
    pub fn show_modal(&self, title: impl Into<String>, message: impl Into<String>) {
        let modal = Modal {
            title: title.into(),
            message: message.into(),
        };
        tracing::info!(title = %modal.title, "Modal shown");
        *self.modal.lock().unwrap() = Some(modal);
    }

    /// The currently shown modal, if any.
    pub fn current_modal(&self) -> Option<Modal> {
        self.modal.lock().unwrap().clone()
    }

    /// Close the current modal. Returns `true` if one was shown.
    pub fn close_modal(&self) -> bool {
        self.modal.lock().unwrap().take().is_some()
    }
}

// =============================================================================
// Tests
// =============================================================================
