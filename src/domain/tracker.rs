//! Tracking state machine
//!
//! Pure planning of orientation transitions and startup reconciliation. The
//! plans say which remote calls to make and what the committed local state
//! will be; [`ActivityService`](crate::domain::service::ActivityService)
//! executes them.

use crate::domain::models::{Activity, Notification, Side, Tracking};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TrackingState {
    #[default]
    Idle,
    Tracking {
        activity: Activity,
        started_at: DateTime<Utc>,
    },
}

impl TrackingState {
    fn tracking(activity: Activity, started_at: DateTime<Utc>) -> Self {
        if activity.is_idle() {
            Self::Idle
        } else {
            Self::Tracking {
                activity,
                started_at,
            }
        }
    }

    pub fn activity(&self) -> Activity {
        match self {
            Self::Idle => Activity::idle(),
            Self::Tracking { activity, .. } => activity.clone(),
        }
    }

    pub fn activity_id(&self) -> &str {
        match self {
            Self::Idle => "",
            Self::Tracking { activity, .. } => &activity.id,
        }
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Idle => None,
            Self::Tracking { started_at, .. } => Some(*started_at),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

/// What a single orientation change does
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionPlan {
    /// Activity to stop remotely before anything else
    pub stop: Option<Activity>,
    /// Activity to start remotely
    pub start: Option<Activity>,
    pub notification: Notification,
    /// State committed once the remote calls have been attempted
    pub next: TrackingState,
}

/// Plan the transition for a resolved orientation change.
///
/// Returns `None` when the side is unassigned or resolves to the activity
/// already being tracked.
pub fn plan_transition(
    state: &TrackingState,
    side: Side,
    resolved: Option<Activity>,
    now: DateTime<Utc>,
    show_side: bool,
) -> Option<TransitionPlan> {
    let resolved = resolved?;
    if resolved.id == state.activity_id() {
        return None;
    }

    if resolved.is_idle() {
        let previous = state.activity();
        return Some(TransitionPlan {
            notification: Notification::stopping(&previous),
            stop: Some(previous),
            start: None,
            next: TrackingState::Idle,
        });
    }

    let stop = match state {
        TrackingState::Idle => None,
        TrackingState::Tracking { activity, .. } => Some(activity.clone()),
    };

    Some(TransitionPlan {
        stop,
        notification: Notification::starting(&resolved, show_side.then_some(side)),
        start: Some(resolved.clone()),
        next: TrackingState::tracking(resolved, now),
    })
}

/// What startup reconciliation does
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcilePlan {
    pub stop: Option<Activity>,
    pub start: Option<Activity>,
    pub state: TrackingState,
}

/// Align the remote tracking record with what the device shows.
///
/// The device orientation wins. When both agree the remote start time is
/// kept so a restart does not reset a running timer.
pub fn plan_reconciliation(
    device: Activity,
    remote: Option<Tracking>,
    now: DateTime<Utc>,
) -> ReconcilePlan {
    let remote_id = remote.as_ref().map_or("", |t| t.activity.id.as_str());

    if remote_id == device.id {
        let state = match remote {
            Some(tracking) => TrackingState::tracking(device, tracking.started_at),
            None => TrackingState::Idle,
        };
        return ReconcilePlan {
            stop: None,
            start: None,
            state,
        };
    }

    let stop = remote.map(|t| t.activity).filter(|a| !a.is_idle());
    let start = (!device.is_idle()).then(|| device.clone());

    ReconcilePlan {
        stop,
        start,
        state: TrackingState::tracking(device, now),
    }
}

/// A remote call that failed while the local state moved on anyway
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteFailure {
    Stop { activity_id: String, error: String },
    Start { activity_id: String, error: String },
    Notify { error: String },
}

/// Outcome of an executed transition. The local state is always committed;
/// failures are reported here and never rolled back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionReport {
    pub side: Side,
    pub previous: Activity,
    pub current: Activity,
    pub notification: Notification,
    pub failures: Vec<RemoteFailure>,
}

impl TransitionReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn writing() -> Activity {
        Activity {
            id: "A1".into(),
            name: "Writing".into(),
            color: "#ff0000".into(),
            integration: "zei".into(),
            device_side: Some(3),
        }
    }

    fn reading() -> Activity {
        Activity {
            id: "A2".into(),
            name: "Reading".into(),
            color: "#00ff00".into(),
            integration: "zei".into(),
            device_side: Some(4),
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_idle_to_activity_starts_it() {
        let plan = plan_transition(
            &TrackingState::Idle,
            Side::normalize(3),
            Some(writing()),
            now(),
            false,
        )
        .unwrap();

        assert_eq!(plan.stop, None);
        assert_eq!(plan.start, Some(writing()));
        assert_eq!(plan.notification.to_string(), "Starting activity: Writing");
        assert_eq!(
            plan.next,
            TrackingState::Tracking {
                activity: writing(),
                started_at: now()
            }
        );
    }

    #[test]
    fn test_activity_to_idle_stops_it() {
        let state = TrackingState::Tracking {
            activity: writing(),
            started_at: now(),
        };
        let plan =
            plan_transition(&state, Side::IDLE, Some(Activity::idle()), now(), false).unwrap();

        assert_eq!(plan.stop, Some(writing()));
        assert_eq!(plan.start, None);
        assert_eq!(plan.notification.to_string(), "Stopping activity: Writing");
        assert_eq!(plan.next, TrackingState::Idle);
    }

    #[test]
    fn test_switching_stops_previous_first() {
        let state = TrackingState::Tracking {
            activity: writing(),
            started_at: now(),
        };
        let plan =
            plan_transition(&state, Side::normalize(4), Some(reading()), now(), true).unwrap();

        assert_eq!(plan.stop, Some(writing()));
        assert_eq!(plan.start, Some(reading()));
        assert_eq!(plan.notification.body, "Reading (4)");
    }

    #[test]
    fn test_same_activity_is_noop() {
        let state = TrackingState::Tracking {
            activity: writing(),
            started_at: now(),
        };
        assert!(plan_transition(&state, Side::normalize(3), Some(writing()), now(), false).is_none());
        assert!(plan_transition(
            &TrackingState::Idle,
            Side::IDLE,
            Some(Activity::idle()),
            now(),
            false
        )
        .is_none());
    }

    #[test]
    fn test_unassigned_side_is_noop() {
        assert!(plan_transition(&TrackingState::Idle, Side::normalize(5), None, now(), false).is_none());
    }

    #[test]
    fn test_reconcile_keeps_remote_start_when_in_agreement() {
        let started = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        let plan = plan_reconciliation(
            writing(),
            Some(Tracking {
                activity: writing(),
                started_at: started,
            }),
            now(),
        );

        assert_eq!(plan.stop, None);
        assert_eq!(plan.start, None);
        assert_eq!(plan.state.started_at(), Some(started));
        assert_eq!(plan.state.activity_id(), "A1");
    }

    #[test]
    fn test_reconcile_device_wins_on_drift() {
        let plan = plan_reconciliation(
            reading(),
            Some(Tracking {
                activity: writing(),
                started_at: now(),
            }),
            now(),
        );

        assert_eq!(plan.stop, Some(writing()));
        assert_eq!(plan.start, Some(reading()));
        assert_eq!(plan.state.activity_id(), "A2");
    }

    #[test]
    fn test_reconcile_idle_device_only_stops() {
        let plan = plan_reconciliation(
            Activity::idle(),
            Some(Tracking {
                activity: writing(),
                started_at: now(),
            }),
            now(),
        );

        assert_eq!(plan.stop, Some(writing()));
        assert_eq!(plan.start, None);
        assert!(plan.state.is_idle());
    }

    #[test]
    fn test_reconcile_nothing_tracked_remotely() {
        let plan = plan_reconciliation(writing(), None, now());
        assert_eq!(plan.stop, None);
        assert_eq!(plan.start, Some(writing()));

        let plan = plan_reconciliation(Activity::idle(), None, now());
        assert_eq!(plan.stop, None);
        assert_eq!(plan.start, None);
        assert!(plan.state.is_idle());
    }
}
