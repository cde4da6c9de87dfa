//! ZEI API client
//!
//! Thin reqwest wrapper over the remote time-tracking API. Every call is a
//! single attempt: transport failures and error statuses go straight back to
//! the caller.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{RequestBuilder, Response};
use tracing::{debug, instrument};

use super::wire::{
    format_timestamp, ActivitiesResponse, CurrentTrackingResponse, SignInRequest,
    SignInResponse, StartTrackingRequest, StopTrackingRequest,
};
use crate::domain::error::{Result, ZeiError};
use crate::domain::models::{Activity, Side, Tracking};
use crate::domain::ports::TrackingApi;
use crate::domain::settings::Settings;

/// Configuration for the API client
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    /// Base URL for the API (e.g., "https://api.timeular.com/api/v2")
    pub base_url: String,
    /// Timeout for a single request
    pub timeout: Duration,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.timeular.com/api/v2".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl From<&Settings> for ApiClientConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            base_url: settings.api_base_url.clone(),
            timeout: Duration::from_secs(settings.api_timeout_secs),
        }
    }
}

pub struct ZeiApiClient {
    http: reqwest::Client,
    config: ApiClientConfig,
}

impl ZeiApiClient {
    /// # Errors
    ///
    /// Returns `Config` if the underlying HTTP client cannot be built
    pub fn new(config: ApiClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ZeiError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn authorized(builder: RequestBuilder, token: &str) -> RequestBuilder {
        builder.header("Authorization", format!("Bearer {}", token))
    }

    async fn send(builder: RequestBuilder) -> Result<Response> {
        builder.send().await.map_err(map_reqwest_error)
    }
}

fn map_reqwest_error(e: reqwest::Error) -> ZeiError {
    if e.is_decode() {
        ZeiError::Decode(e.to_string())
    } else {
        ZeiError::Transport(e.to_string())
    }
}

fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ZeiError::Api {
            status: status.as_u16(),
        })
    }
}

#[async_trait]
impl TrackingApi for ZeiApiClient {
    #[instrument(skip_all)]
    async fn sign_in(&self, api_key: &str, api_secret: &str) -> Result<String> {
        let request = self
            .http
            .post(self.url("/developer/sign-in"))
            .json(&SignInRequest {
                api_key,
                api_secret,
            });

        let response = Self::send(request).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ZeiError::Auth(format!("sign-in rejected with status {}", status)));
        }

        let body: SignInResponse = response
            .json()
            .await
            .map_err(|e| ZeiError::Auth(format!("malformed sign-in response: {}", e)))?;

        if body.token.is_empty() {
            return Err(ZeiError::Auth("sign-in returned an empty token".to_string()));
        }
        Ok(body.token)
    }

    #[instrument(skip_all)]
    async fn list_activities(&self, token: &str) -> Result<Vec<Activity>> {
        let request = Self::authorized(self.http.get(self.url("/activities")), token);
        let response = ensure_success(Self::send(request).await?)?;

        let body: ActivitiesResponse = response.json().await.map_err(map_reqwest_error)?;
        debug!(count = body.activities.len(), "Fetched activities");
        Ok(body.activities)
    }

    #[instrument(skip(self, token))]
    async fn assign_activity(
        &self,
        token: &str,
        activity_id: &str,
        side: Side,
    ) -> Result<Activity> {
        let path = format!("/activities/{}/device-side/{}", activity_id, side);
        let request = Self::authorized(self.http.post(self.url(&path)), token);
        let response = ensure_success(Self::send(request).await?)?;

        response.json().await.map_err(map_reqwest_error)
    }

    #[instrument(skip(self, token))]
    async fn start_tracking(
        &self,
        token: &str,
        activity_id: &str,
        at: DateTime<Utc>,
    ) -> Result<()> {
        let path = format!("/tracking/{}/start", activity_id);
        let request = Self::authorized(self.http.post(self.url(&path)), token).json(
            &StartTrackingRequest {
                started_at: format_timestamp(at),
            },
        );

        // The body is not inspected; only the status matters.
        ensure_success(Self::send(request).await?)?;
        Ok(())
    }

    #[instrument(skip(self, token))]
    async fn stop_tracking(
        &self,
        token: &str,
        activity_id: &str,
        at: DateTime<Utc>,
    ) -> Result<()> {
        let path = format!("/tracking/{}/stop", activity_id);
        let request = Self::authorized(self.http.post(self.url(&path)), token).json(
            &StopTrackingRequest {
                stopped_at: format_timestamp(at),
            },
        );

        ensure_success(Self::send(request).await?)?;
        Ok(())
    }

    #[instrument(skip_all)]
    async fn current_tracking(&self, token: &str) -> Result<Option<Tracking>> {
        let request = Self::authorized(self.http.get(self.url("/tracking")), token);
        let response = ensure_success(Self::send(request).await?)?;

        let body: CurrentTrackingResponse = response.json().await.map_err(map_reqwest_error)?;
        body.current_tracking
            .map(|record| record.into_tracking())
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client_for(server: &MockServer) -> ZeiApiClient {
        let config = ApiClientConfig {
            base_url: server.uri(),
            ..Default::default()
        };
        ZeiApiClient::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_sign_in_returns_token() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/developer/sign-in"))
            .and(body_json(json!({"apiKey": "key", "apiSecret": "secret"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "tok"})))
            .mount(&server)
            .await;

        let token = client_for(&server).sign_in("key", "secret").await.unwrap();
        assert_eq!(token, "tok");
    }

    #[tokio::test]
    async fn test_sign_in_rejected_is_auth_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/developer/sign-in"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let result = client_for(&server).sign_in("key", "wrong").await;
        assert!(matches!(result, Err(ZeiError::Auth(_))));
    }

    #[tokio::test]
    async fn test_sign_in_malformed_is_auth_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/developer/sign-in"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let result = client_for(&server).sign_in("key", "secret").await;
        assert!(matches!(result, Err(ZeiError::Auth(_))));
    }

    #[tokio::test]
    async fn test_list_activities_sends_bearer_token() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/activities"))
            .and(header("Authorization", "Bearer tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "activities": [
                    {"id": "A1", "name": "Writing", "color": "#f00", "integration": "zei", "deviceSide": 3},
                    {"id": "A2", "name": "Reading", "color": "#0f0", "integration": "zei", "deviceSide": null}
                ]
            })))
            .mount(&server)
            .await;

        let activities = client_for(&server).list_activities("tok").await.unwrap();
        assert_eq!(activities.len(), 2);
        assert_eq!(activities[0].device_side, Some(3));
        assert_eq!(activities[1].device_side, None);
    }

    #[tokio::test]
    async fn test_assign_activity_error_status() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/activities/missing/device-side/4"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let result = client_for(&server)
            .assign_activity("tok", "missing", Side::normalize(4))
            .await;
        assert!(matches!(result, Err(ZeiError::Api { status: 404 })));
    }

    #[tokio::test]
    async fn test_assign_activity_returns_updated_record() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/activities/A1/device-side/6"))
            .and(header("Authorization", "Bearer tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "A1", "name": "Writing", "color": "#f00", "integration": "zei", "deviceSide": 6
            })))
            .mount(&server)
            .await;

        let activity = client_for(&server)
            .assign_activity("tok", "A1", Side::normalize(6))
            .await
            .unwrap();
        assert_eq!(activity.device_side, Some(6));
    }

    #[tokio::test]
    async fn test_start_and_stop_send_formatted_timestamps() {
        let server = MockServer::start().await;
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();

        Mock::given(method("POST"))
            .and(path("/tracking/A1/start"))
            .and(body_json(json!({"startedAt": "2024-03-01T09:30:00.000"})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/tracking/A1/stop"))
            .and(body_json(json!({"stoppedAt": "2024-03-01T09:30:00.000"})))
            .respond_with(ResponseTemplate::new(200).set_body_string("ignored"))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        client.start_tracking("tok", "A1", at).await.unwrap();
        client.stop_tracking("tok", "A1", at).await.unwrap();
    }

    #[tokio::test]
    async fn test_current_tracking_parses_record() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/tracking"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "currentTracking": {
                    "activity": {"id": "A1", "name": "Writing", "color": "#f00", "integration": "zei", "deviceSide": 3},
                    "startedAt": "2024-03-01T08:00:00.000"
                }
            })))
            .mount(&server)
            .await;

        let tracking = client_for(&server)
            .current_tracking("tok")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(tracking.activity.id, "A1");
        assert_eq!(
            tracking.started_at,
            Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap()
        );
    }

    #[tokio::test]
    async fn test_current_tracking_none() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/tracking"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"currentTracking": null})))
            .mount(&server)
            .await;

        let tracking = client_for(&server).current_tracking("tok").await.unwrap();
        assert!(tracking.is_none());
    }

    #[tokio::test]
    async fn test_transport_error() {
        let config = ApiClientConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            timeout: Duration::from_secs(2),
        };
        let client = ZeiApiClient::new(config).unwrap();

        let result = client.list_activities("tok").await;
        assert!(matches!(result, Err(ZeiError::Transport(_))));
    }
}
