//! Notification port (driven/secondary port)
//!
//! This module defines the interface for surfacing sync status to the
//! user. The CLI ships a console implementation; a host application may
//! bridge it to whatever notification surface it owns.
//!
//! ## Design Notes
//!
//! - Notifications are fire-and-forget; the engine ignores delivery
//!   failures.
//! - Progress reporting uses a `progress_id` so a long sync can update
//!   one indicator instead of emitting a message per batch.

use serde::{Deserialize, Serialize};

/// Priority level for a notification
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationPriority {
    /// Routine status
    #[default]
    Normal,
    /// Something the user should look at
    High,
}

/// A notification to display to the user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    /// Short, descriptive title
    pub title: String,
    /// Body text with details
    pub body: String,
    /// Display priority
    pub priority: NotificationPriority,
    /// Category for grouping (e.g., "sync", "error")
    pub category: String,
}

impl Notification {
    /// Creates a notification with `Normal` priority and no category
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            priority: NotificationPriority::Normal,
            category: String::new(),
        }
    }

    /// Creates a sync-status notification
    pub fn sync(title: impl Into<String>, body: impl Into<String>) -> Self {
        let mut n = Self::new(title, body);
        n.category = "sync".to_string();
        n
    }

    /// Creates an error notification with `High` priority
    pub fn error(title: impl Into<String>, body: impl Into<String>) -> Self {
        let mut n = Self::new(title, body);
        n.priority = NotificationPriority::High;
        n.category = "error".to_string();
        n
    }
}

/// Port trait for user-facing status reporting
#[async_trait::async_trait]
pub trait INotifier: Send + Sync {
    /// Sends a one-shot notification
    async fn notify(&self, notification: &Notification) -> anyhow::Result<()>;

    /// Shows or updates a progress indicator
    ///
    /// # Arguments
    /// * `progress_id` - Identifier of the indicator to create or update
    /// * `title` - Description of the operation in progress
    /// * `percent` - Completion percentage (0.0 to 100.0)
    async fn show_progress(&self, progress_id: &str, title: &str, percent: f64)
        -> anyhow::Result<()>;

    /// Removes a progress indicator
    async fn clear_progress(&self, progress_id: &str) -> anyhow::Result<()>;
}
