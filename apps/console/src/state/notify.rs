//! # Notification State
//!
//! Toasts waiting to be shown by the console frontend.
//!
//! ## Thread Safety
//! The queue is behind a `Mutex`: several commands may report at once,
//! and the frontend drains the queue on its own schedule.
//!
//! ```text
//! ValidationPipeline ──report()──► ToastQueue ──drain()──► frontend toast
//!                                      │
//!                                      └──► tracing::warn!
//! ```

use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use meem_core::{BlockingError, Reporter};

/// Severity of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastLevel {
    Success,
    Error,
}

/// One transient notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
    /// Blocking error code, for error toasts.
    pub code: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Pending toasts.
#[derive(Debug, Default)]
pub struct ToastQueue {
    toasts: Mutex<Vec<Toast>>,
}

impl ToastQueue {
    pub fn new() -> Self {
        ToastQueue::default()
    }

    // A panic while holding the lock leaves a valid Vec behind.
    fn lock(&self) -> MutexGuard<'_, Vec<Toast>> {
        self.toasts.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Queues a success toast.
    pub fn success(&self, message: impl Into<String>) {
        let message = message.into();
        info!(%message, "Success toast queued");
        self.lock().push(Toast {
            level: ToastLevel::Success,
            message,
            code: None,
            created_at: Utc::now(),
        });
    }

    /// Removes and returns every pending toast, oldest first.
    pub fn drain(&self) -> Vec<Toast> {
        std::mem::take(&mut *self.lock())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl Reporter for ToastQueue {
    fn report(&self, error: &BlockingError) {
        warn!(code = error.code(), message = %error, "Submission blocked");
        self.lock().push(Toast {
            level: ToastLevel::Error,
            message: error.to_string(),
            code: Some(error.code().to_string()),
            created_at: Utc::now(),
        });
    }
}
