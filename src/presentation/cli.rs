//! CLI printers. Each writes to the given sink so the binary can pass stdout
//! and tests can pass a buffer.

use crate::domain::models::{Activity, ActivityList, CurrentActivity};
use crate::presentation::format::{format_activity_line, format_side, format_status};
use chrono::{DateTime, Utc};
use std::io::{self, Write};

pub fn print_status<W: Write>(
    out: &mut W,
    current: &CurrentActivity,
    now: DateTime<Utc>,
) -> io::Result<()> {
    writeln!(out, "{}", format_status(current, now))
}

pub fn print_activities<W: Write>(out: &mut W, list: &ActivityList) -> io::Result<()> {
    if list.activities.is_empty() {
        return writeln!(out, "No activities");
    }

    let mut activities: Vec<&Activity> = list.activities.iter().collect();
    // Assigned sides first in side order, then the rest by name
    activities.sort_by(|a, b| {
        let side = |x: &Activity| x.device_side.filter(|s| *s > 0).unwrap_or(u8::MAX);
        side(a).cmp(&side(b)).then_with(|| a.name.cmp(&b.name))
    });

    for activity in activities {
        writeln!(
            out,
            "{}",
            format_activity_line(activity, &list.current_activity_id)
        )?;
    }
    Ok(())
}

pub fn print_assigned<W: Write>(
    out: &mut W,
    activity_id: &str,
    activity: Option<&Activity>,
) -> io::Result<()> {
    match activity {
        Some(activity) => writeln!(
            out,
            "Assigned {} ({}) to side {}",
            activity.name,
            activity.id,
            format_side(activity)
        ),
        None => writeln!(out, "Assigned {} to the current side", activity_id),
    }
}
