//! Human-readable rendering of tracking state, shared by the CLI and the tray.

use crate::domain::models::{Activity, CurrentActivity};
use chrono::{DateTime, Duration, SecondsFormat, Utc};

pub const NOT_TRACKING: &str = "Not tracking";

/// Render a duration as `1h2m3s`, `2m0s` or `3s`, truncated to whole seconds.
/// Negative durations (clock skew) render as `0s`.
pub fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.num_seconds().max(0);
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    if hours > 0 {
        format!("{}h{}m{}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m{}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

fn tracked_since(current: &CurrentActivity) -> Option<DateTime<Utc>> {
    if current.is_idle {
        None
    } else {
        current.start_time
    }
}

/// Tray label: "<name> - <elapsed>" or "Not tracking"
pub fn format_current_activity(current: &CurrentActivity, now: DateTime<Utc>) -> String {
    match tracked_since(current) {
        Some(start) => format!(
            "{} - {}",
            current.activity.name,
            format_elapsed(now.signed_duration_since(start))
        ),
        None => NOT_TRACKING.to_string(),
    }
}

/// CLI status line, the tray label plus the absolute start time
pub fn format_status(current: &CurrentActivity, now: DateTime<Utc>) -> String {
    match tracked_since(current) {
        Some(start) => format!(
            "{} (since {})",
            format_current_activity(current, now),
            start.to_rfc3339_opts(SecondsFormat::Secs, true)
        ),
        None => NOT_TRACKING.to_string(),
    }
}

pub fn format_side(activity: &Activity) -> String {
    match activity.device_side {
        Some(side) if side > 0 => side.to_string(),
        _ => "-".to_string(),
    }
}

/// One catalog line; the current activity is marked with `*`
pub fn format_activity_line(activity: &Activity, current_activity_id: &str) -> String {
    let marker = if !current_activity_id.is_empty() && activity.id == current_activity_id {
        '*'
    } else {
        ' '
    };
    format!(
        "{} [{}] {} ({})",
        marker,
        format_side(activity),
        activity.name,
        activity.id
    )
}
