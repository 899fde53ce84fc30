//! Console notifier
//!
//! Bridges the engine's notification port to the terminal. Progress
//! updates rewrite a single line; notifications print once.

use gitvault_core::ports::notification::{INotifier, Notification, NotificationPriority};

/// INotifier implementation printing to the terminal
pub struct ConsoleNotifier {
    /// Suppresses routine notifications (errors always print)
    quiet: bool,
}

impl ConsoleNotifier {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

#[async_trait::async_trait]
impl INotifier for ConsoleNotifier {
    async fn notify(&self, notification: &Notification) -> anyhow::Result<()> {
        match notification.priority {
            NotificationPriority::High => {
                eprintln!("{}: {}", notification.title, notification.body);
            }
            NotificationPriority::Normal if !self.quiet => {
                println!("{}: {}", notification.title, notification.body);
            }
            NotificationPriority::Normal => {}
        }
        Ok(())
    }

    async fn show_progress(
        &self,
        _progress_id: &str,
        title: &str,
        percent: f64,
    ) -> anyhow::Result<()> {
        if !self.quiet {
            print!("\r{}: {:>3.0}%", title, percent);
            use std::io::Write;
            std::io::stdout().flush().ok();
        }
        Ok(())
    }

    async fn clear_progress(&self, _progress_id: &str) -> anyhow::Result<()> {
        if !self.quiet {
            println!();
        }
        Ok(())
    }
}
