//! Capabilities the activity service depends on.
//!
//! Infrastructure provides the real implementations (HTTP API client, BLE
//! device, desktop notifier); tests provide in-memory ones.

use crate::domain::error::Result;
use crate::domain::models::{Activity, Notification, Side, Tracking};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Remote time-tracking API
#[async_trait]
pub trait TrackingApi: Send + Sync {
    /// Exchange an API key/secret pair for a bearer token
    async fn sign_in(&self, api_key: &str, api_secret: &str) -> Result<String>;

    /// Full activity catalog of the account
    async fn list_activities(&self, token: &str) -> Result<Vec<Activity>>;

    /// Bind an activity to a device side, returning the updated record
    async fn assign_activity(&self, token: &str, activity_id: &str, side: Side)
        -> Result<Activity>;

    async fn start_tracking(&self, token: &str, activity_id: &str, at: DateTime<Utc>)
        -> Result<()>;

    async fn stop_tracking(&self, token: &str, activity_id: &str, at: DateTime<Utc>)
        -> Result<()>;

    /// What the remote service is tracking right now, if anything
    async fn current_tracking(&self, token: &str) -> Result<Option<Tracking>>;
}

/// Snapshot access to the device orientation
#[async_trait]
pub trait OrientationSensor: Send + Sync {
    /// Read the raw orientation characteristic once
    async fn read_orientation(&self) -> Result<Vec<u8>>;
}

/// Delivery of transition notifications to the user
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notification: &Notification) -> Result<()>;
}
