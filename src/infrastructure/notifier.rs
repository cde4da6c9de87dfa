//! Transition notifications
//!
//! [`DesktopNotifier`] shows a transient OS notification; [`LogNotifier`] only
//! writes to the log and is used when notifications are turned off.

use crate::domain::error::{Result, ZeiError};
use crate::domain::models::Notification;
use crate::domain::ports::Notifier;
use async_trait::async_trait;
use tracing::info;

const APP_NAME: &str = "ZEI";

pub struct DesktopNotifier;

#[async_trait]
impl Notifier for DesktopNotifier {
    async fn notify(&self, notification: &Notification) -> Result<()> {
        let title = notification.title.clone();
        let body = notification.body.clone();

        // Delivery talks to the platform notification service synchronously.
        tokio::task::spawn_blocking(move || {
            notify_rust::Notification::new()
                .appname(APP_NAME)
                .summary(&title)
                .body(&body)
                .show()
                .map(|_| ())
                .map_err(|e| ZeiError::Transport(format!("notification delivery: {}", e)))
        })
        .await
        .map_err(|e| ZeiError::Transport(format!("notification task: {}", e)))?
    }
}

pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, notification: &Notification) -> Result<()> {
        info!(title = %notification.title, body = %notification.body, "Notification");
        Ok(())
    }
}
