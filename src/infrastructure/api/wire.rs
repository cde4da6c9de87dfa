//! Remote API payloads and timestamp format

use crate::domain::error::{Result, ZeiError};
use crate::domain::models::{Activity, Tracking};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Millisecond precision, UTC, no zone suffix
pub const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

/// Accepts any number of fractional digits
const PARSE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format(TIME_FORMAT).to_string()
}

pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(raw, PARSE_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|e| ZeiError::Decode(format!("timestamp {:?}: {}", raw, e)))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInRequest<'a> {
    pub api_key: &'a str,
    pub api_secret: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct SignInResponse {
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct ActivitiesResponse {
    #[serde(default)]
    pub activities: Vec<Activity>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartTrackingRequest {
    pub started_at: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StopTrackingRequest {
    pub stopped_at: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingRecord {
    pub activity: Activity,
    pub started_at: String,
}

impl TrackingRecord {
    pub fn into_tracking(self) -> Result<Tracking> {
        Ok(Tracking {
            started_at: parse_timestamp(&self.started_at)?,
            activity: self.activity,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentTrackingResponse {
    #[serde(default)]
    pub current_tracking: Option<TrackingRecord>,
}
