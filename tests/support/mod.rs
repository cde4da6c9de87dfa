//! In-memory implementations of the service ports
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use zei::domain::error::{Result, ZeiError};
use zei::domain::models::{Activity, Notification, Side, Tracking};
use zei::domain::ports::{Notifier, OrientationSensor, TrackingApi};
use zei::domain::{ActivityService, ServiceOptions};

pub const TOKEN: &str = "test-token";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    SignIn,
    ListActivities,
    Assign { activity_id: String, side: u8 },
    Start(String),
    Stop(String),
    CurrentTracking,
}

pub fn activity(id: &str, name: &str, side: Option<u8>) -> Activity {
    Activity {
        id: id.to_string(),
        name: name.to_string(),
        color: "#a0c4ff".to_string(),
        integration: "zei".to_string(),
        device_side: side,
    }
}

/// Writing on side 3, Reading on side 4, Admin unassigned
pub fn catalog() -> Vec<Activity> {
    vec![
        activity("A1", "Writing", Some(3)),
        activity("A2", "Reading", Some(4)),
        activity("A3", "Admin", None),
    ]
}

#[derive(Default)]
pub struct FakeApi {
    activities: Mutex<Vec<Activity>>,
    current: Mutex<Option<Tracking>>,
    calls: Mutex<Vec<ApiCall>>,
    pub fail_start: AtomicBool,
    pub fail_stop: AtomicBool,
    pub reject_sign_in: AtomicBool,
}

impl FakeApi {
    pub fn new(activities: Vec<Activity>) -> Self {
        Self {
            activities: Mutex::new(activities),
            ..Self::default()
        }
    }

    pub fn with_current(self, activity: Activity, started_at: DateTime<Utc>) -> Self {
        *self.current.lock().unwrap() = Some(Tracking {
            activity,
            started_at,
        });
        self
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls other than the startup sign-in / catalog / current-tracking reads
    pub fn tracking_calls(&self) -> Vec<ApiCall> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, ApiCall::Start(_) | ApiCall::Stop(_)))
            .collect()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, call: ApiCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl TrackingApi for FakeApi {
    async fn sign_in(&self, api_key: &str, _api_secret: &str) -> Result<String> {
        self.record(ApiCall::SignIn);
        if self.reject_sign_in.load(Ordering::SeqCst) || api_key.is_empty() {
            return Err(ZeiError::Auth("invalid credentials".to_string()));
        }
        Ok(TOKEN.to_string())
    }

    async fn list_activities(&self, token: &str) -> Result<Vec<Activity>> {
        assert_eq!(token, TOKEN);
        self.record(ApiCall::ListActivities);
        Ok(self.activities.lock().unwrap().clone())
    }

    async fn assign_activity(&self, token: &str, activity_id: &str, side: Side) -> Result<Activity> {
        assert_eq!(token, TOKEN);
        self.record(ApiCall::Assign {
            activity_id: activity_id.to_string(),
            side: side.get(),
        });

        let mut activities = self.activities.lock().unwrap();
        if !activities.iter().any(|a| a.id == activity_id) {
            return Err(ZeiError::Api { status: 404 });
        }
        let mut updated = None;
        for a in activities.iter_mut() {
            if a.id == activity_id {
                a.device_side = Some(side.get());
                updated = Some(a.clone());
            } else if a.device_side == Some(side.get()) {
                a.device_side = None;
            }
        }
        updated.ok_or_else(|| ZeiError::NotFound(activity_id.to_string()))
    }

    async fn start_tracking(&self, _token: &str, activity_id: &str, _at: DateTime<Utc>) -> Result<()> {
        self.record(ApiCall::Start(activity_id.to_string()));
        if self.fail_start.load(Ordering::SeqCst) {
            return Err(ZeiError::Api { status: 500 });
        }
        Ok(())
    }

    async fn stop_tracking(&self, _token: &str, activity_id: &str, _at: DateTime<Utc>) -> Result<()> {
        self.record(ApiCall::Stop(activity_id.to_string()));
        if self.fail_stop.load(Ordering::SeqCst) {
            return Err(ZeiError::Transport("connection reset".to_string()));
        }
        Ok(())
    }

    async fn current_tracking(&self, _token: &str) -> Result<Option<Tracking>> {
        self.record(ApiCall::CurrentTracking);
        Ok(self.current.lock().unwrap().clone())
    }
}

/// Orientation sensor whose reading is set by the test
pub struct FakeSensor {
    payload: Mutex<Vec<u8>>,
}

impl FakeSensor {
    pub fn new(side: u8) -> Self {
        Self {
            payload: Mutex::new(vec![side]),
        }
    }

    pub fn set(&self, side: u8) {
        *self.payload.lock().unwrap() = vec![side];
    }
}

#[async_trait]
impl OrientationSensor for FakeSensor {
    async fn read_orientation(&self) -> Result<Vec<u8>> {
        Ok(self.payload.lock().unwrap().clone())
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<Notification>>,
    pub fail: AtomicBool,
}

impl RecordingNotifier {
    /// Delivered notifications rendered as "title: body"
    pub fn sent(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|n| n.to_string())
            .collect()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, notification: &Notification) -> Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(ZeiError::Transport("no notification daemon".to_string()));
        }
        self.sent.lock().unwrap().push(notification.clone());
        Ok(())
    }
}

/// Notifier that blocks delivery until [`GatedNotifier::release`]
pub struct GatedNotifier {
    pub entered: tokio::sync::Notify,
    gate: tokio::sync::Semaphore,
}

impl Default for GatedNotifier {
    fn default() -> Self {
        Self {
            entered: tokio::sync::Notify::new(),
            gate: tokio::sync::Semaphore::new(0),
        }
    }
}

impl GatedNotifier {
    pub fn release(&self) {
        self.gate.add_permits(1);
    }
}

#[async_trait]
impl Notifier for GatedNotifier {
    async fn notify(&self, _notification: &Notification) -> Result<()> {
        self.entered.notify_one();
        let permit = self
            .gate
            .acquire()
            .await
            .map_err(|e| ZeiError::Transport(e.to_string()))?;
        permit.forget();
        Ok(())
    }
}

pub struct Harness {
    pub api: Arc<FakeApi>,
    pub sensor: Arc<FakeSensor>,
    pub notifier: Arc<RecordingNotifier>,
    pub service: Arc<ActivityService>,
}

pub fn options(show_side: bool) -> ServiceOptions {
    ServiceOptions {
        api_key: "key".to_string(),
        api_secret: "secret".to_string(),
        show_side,
    }
}

/// Start a service on `api` with the device showing `side`
pub async fn start(api: FakeApi, side: u8) -> Harness {
    start_with(api, side, false).await
}

pub async fn start_with(api: FakeApi, side: u8, show_side: bool) -> Harness {
    let api = Arc::new(api);
    let sensor = Arc::new(FakeSensor::new(side));
    let notifier = Arc::new(RecordingNotifier::default());
    let service = ActivityService::start(
        api.clone(),
        sensor.clone(),
        notifier.clone(),
        options(show_side),
    )
    .await
    .expect("service should start");

    Harness {
        api,
        sensor,
        notifier,
        service: Arc::new(service),
    }
}
