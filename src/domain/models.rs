use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the synthetic activity bound to side 0
pub const IDLE_NAME: &str = "Idle";

/// A trackable task defined on the remote account.
///
/// The synthetic Idle activity is the only one with an empty `id`; remote
/// identifiers are never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub integration: String,
    #[serde(default)]
    pub device_side: Option<u8>,
}

impl Activity {
    /// The "not tracking" activity
    pub fn idle() -> Self {
        Self {
            id: String::new(),
            name: IDLE_NAME.to_string(),
            color: String::new(),
            integration: String::new(),
            device_side: Some(Side::IDLE.get()),
        }
    }

    pub fn is_idle(&self) -> bool {
        self.id.is_empty()
    }
}

/// One face of the orientation device, always within `0..=8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Side(u8);

impl Side {
    pub const IDLE: Side = Side(0);
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 8;

    /// Map a raw orientation byte to a side; anything outside 1..=8 is Idle.
    pub fn normalize(raw: u8) -> Self {
        if (Self::MIN..=Self::MAX).contains(&raw) {
            Side(raw)
        } else {
            Self::IDLE
        }
    }

    /// Normalize the first byte of a characteristic payload.
    pub fn from_payload(payload: &[u8]) -> Option<Self> {
        payload.first().map(|raw| Self::normalize(*raw))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn is_idle(self) -> bool {
        self == Self::IDLE
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The remote service's record of what is being tracked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tracking {
    pub activity: Activity,
    pub started_at: DateTime<Utc>,
}

/// Snapshot of the service's current tracking state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentActivity {
    pub activity: Activity,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    pub is_idle: bool,
}

/// Remote activity catalog plus the id of the one being tracked
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityList {
    pub activities: Vec<Activity>,
    pub current_activity_id: String,
}

/// Desktop notification emitted on every transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
}

impl Notification {
    pub fn starting(activity: &Activity, side: Option<Side>) -> Self {
        let body = match side {
            Some(side) => format!("{} ({})", activity.name, side),
            None => activity.name.clone(),
        };
        Self {
            title: "Starting activity".to_string(),
            body,
        }
    }

    pub fn stopping(activity: &Activity) -> Self {
        Self {
            title: "Stopping activity".to_string(),
            body: activity.name.clone(),
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.body)
    }
}

/// Events pushed by the orientation device link
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceEvent {
    /// Raw payload of an orientation notification
    Orientation(Vec<u8>),
    Disconnected,
}
