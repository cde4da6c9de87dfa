//! Activity State Service
//!
//! Owns the side-assignment table and the current tracking state, reconciles
//! them against the remote API at startup and moves them along on every
//! orientation change.
//!
//! All mutations go through one async mutex held for the whole
//! read-modify-write, remote calls included, so orientation callbacks, RPC
//! requests and assignments never interleave.

use crate::domain::error::{Result, ZeiError};
use crate::domain::models::{Activity, ActivityList, CurrentActivity, Side};
use crate::domain::ports::{Notifier, OrientationSensor, TrackingApi};
use crate::domain::side_table::SideTable;
use crate::domain::tracker::{
    plan_reconciliation, plan_transition, RemoteFailure, TrackingState, TransitionReport,
};
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Startup parameters of the service
#[derive(Debug, Clone, Default)]
pub struct ServiceOptions {
    pub api_key: String,
    pub api_secret: String,
    /// Suffix "starting" notifications with the device side
    pub show_side: bool,
}

#[derive(Debug)]
struct ServiceState {
    table: SideTable,
    tracking: TrackingState,
}

pub struct ActivityService {
    api: Arc<dyn TrackingApi>,
    sensor: Arc<dyn OrientationSensor>,
    notifier: Arc<dyn Notifier>,
    token: String,
    show_side: bool,
    state: Mutex<ServiceState>,
}

impl ActivityService {
    /// Sign in, load the catalog and reconcile the remote tracking record with
    /// the device orientation.
    ///
    /// Sign-in, catalog and device read failures are returned. Failed
    /// reconciliation start/stop calls are only logged.
    pub async fn start(
        api: Arc<dyn TrackingApi>,
        sensor: Arc<dyn OrientationSensor>,
        notifier: Arc<dyn Notifier>,
        options: ServiceOptions,
    ) -> Result<Self> {
        let token = api.sign_in(&options.api_key, &options.api_secret).await?;
        info!("Signed in to ZEI API");

        let activities = api.list_activities(&token).await?;
        let table = SideTable::from_catalog(&activities);
        if table.is_empty() {
            warn!("No activity is assigned to a device side yet");
        }
        info!(
            activities = activities.len(),
            assigned = table.len(),
            "Loaded activity catalog"
        );

        let side = read_side(sensor.as_ref()).await?;
        let device_activity = table.resolve(side).unwrap_or_else(Activity::idle);
        info!(side = %side, activity = %device_activity.name, "Device orientation at startup");

        let remote = api.current_tracking(&token).await?;
        let now = Utc::now();
        let plan = plan_reconciliation(device_activity, remote, now);

        if let Some(stale) = &plan.stop {
            info!(activity_id = %stale.id, "Stopping remote tracking that disagrees with the device");
            if let Err(e) = api.stop_tracking(&token, &stale.id, now).await {
                warn!(activity_id = %stale.id, "failed to stop stale remote tracking: {}", e);
            }
        }
        if let Some(activity) = &plan.start {
            info!(activity_id = %activity.id, "Starting tracking of the device activity");
            if let Err(e) = api.start_tracking(&token, &activity.id, now).await {
                warn!(activity_id = %activity.id, "failed to start tracking of device activity: {}", e);
            }
        }

        info!(
            activity = %plan.state.activity().name,
            started_at = ?plan.state.started_at(),
            "Reconciliation complete"
        );

        Ok(Self {
            api,
            sensor,
            notifier,
            token,
            show_side: options.show_side,
            state: Mutex::new(ServiceState {
                table,
                tracking: plan.state,
            }),
        })
    }

    /// Apply one orientation notification.
    ///
    /// Returns `None` when nothing changes (empty payload, unassigned side,
    /// or the activity already tracked). Remote and notification failures do
    /// not stop the local state from being committed; they are logged and
    /// reported in the returned [`TransitionReport`].
    pub async fn handle_orientation(&self, payload: &[u8]) -> Option<TransitionReport> {
        let Some(side) = Side::from_payload(payload) else {
            warn!("Ignoring empty orientation payload");
            return None;
        };
        info!(side = %side, "changed side");

        let mut state = self.state.lock().await;
        let resolved = state.table.resolve(side);
        let now = Utc::now();

        let Some(plan) = plan_transition(&state.tracking, side, resolved, now, self.show_side)
        else {
            debug!(side = %side, "No transition for side");
            return None;
        };

        let previous = state.tracking.activity();
        let mut failures = Vec::new();

        if let Some(activity) = &plan.stop {
            if let Err(e) = self.api.stop_tracking(&self.token, &activity.id, now).await {
                warn!(activity_id = %activity.id, "failed to stop tracking of current activity: {}", e);
                failures.push(RemoteFailure::Stop {
                    activity_id: activity.id.clone(),
                    error: e.to_string(),
                });
            }
        }

        if let Some(activity) = &plan.start {
            if let Err(e) = self.api.start_tracking(&self.token, &activity.id, now).await {
                warn!(activity_id = %activity.id, "failed to start tracking of new activity: {}", e);
                failures.push(RemoteFailure::Start {
                    activity_id: activity.id.clone(),
                    error: e.to_string(),
                });
            }
        }

        state.tracking = plan.next;
        let current = state.tracking.activity();
        drop(state);
        info!(from = %previous.name, to = %current.name, "Transition committed");

        if let Err(e) = self.notifier.notify(&plan.notification).await {
            warn!("failed to send notification: {}", e);
            failures.push(RemoteFailure::Notify {
                error: e.to_string(),
            });
        }

        Some(TransitionReport {
            side,
            previous,
            current,
            notification: plan.notification,
            failures,
        })
    }

    /// Current activity, its start time and whether the service is idle
    pub async fn current(&self) -> CurrentActivity {
        let state = self.state.lock().await;
        CurrentActivity {
            activity: state.tracking.activity(),
            start_time: state.tracking.started_at(),
            is_idle: state.tracking.is_idle(),
        }
    }

    /// Fresh remote catalog plus the id of the current activity
    pub async fn list_activities(&self) -> Result<ActivityList> {
        let activities = self.api.list_activities(&self.token).await?;
        let state = self.state.lock().await;
        Ok(ActivityList {
            activities,
            current_activity_id: state.tracking.activity_id().to_string(),
        })
    }

    /// Bind `activity_id` to whatever side the device shows right now.
    pub async fn assign_activity(&self, activity_id: &str) -> Result<Activity> {
        if activity_id.is_empty() {
            return Err(ZeiError::NotFound("empty activity id".to_string()));
        }

        let mut state = self.state.lock().await;
        let side = self.current_side().await?;
        let activity = self
            .api
            .assign_activity(&self.token, activity_id, side)
            .await?;

        let previous_side = state.table.side_of(&activity.id);
        state.table.assign(side, activity.clone());
        if let TrackingState::Tracking { activity: tracked, .. } = &mut state.tracking {
            if tracked.id == activity.id {
                *tracked = activity.clone();
            }
        }

        info!(
            activity_id = %activity.id,
            side = %side,
            previous_side = ?previous_side.map(|s| s.get()),
            "Assigned activity to side"
        );
        Ok(activity)
    }

    /// Side the device shows right now, normalized
    pub async fn current_side(&self) -> Result<Side> {
        read_side(self.sensor.as_ref()).await
    }

    /// Copy of the side-assignment table
    pub async fn assignments(&self) -> Vec<(Side, Activity)> {
        let state = self.state.lock().await;
        state
            .table
            .iter()
            .map(|(side, activity)| (side, activity.clone()))
            .collect()
    }
}

async fn read_side(sensor: &dyn OrientationSensor) -> Result<Side> {
    let payload = sensor.read_orientation().await?;
    Side::from_payload(&payload)
        .ok_or_else(|| ZeiError::Device("empty orientation payload".to_string()))
}
