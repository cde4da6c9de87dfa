//! Local RPC client used by the CLI and the tray

use crate::domain::error::{Result, ZeiError};
use crate::domain::models::{Activity, ActivityList, CurrentActivity};
use crate::infrastructure::rpc::protocol::{
    self, AssignActivityRequest, AssignActivityResponse, CurrentActivityRequest, ErrorBody,
    ListActivitiesRequest,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

#[derive(Clone)]
pub struct RpcClient {
    http: reqwest::Client,
    base_url: String,
}

/// Accept "http://host:port", "host:port" or Go-style ":port"
pub fn normalize_base_url(address: &str) -> String {
    let address = address.trim().trim_end_matches('/');
    if address.contains("://") {
        address.to_string()
    } else if let Some(port) = address.strip_prefix(':') {
        format!("http://localhost:{}", port)
    } else {
        format!("http://{}", address)
    }
}

impl RpcClient {
    pub fn new(address: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| ZeiError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: normalize_base_url(address),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn call<Req, Resp>(&self, method: &str, request: &Req) -> Result<Resp>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, protocol::route(method));
        debug!(url = %url, "RPC call");

        let response = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| ZeiError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error = match response.json::<ErrorBody>().await {
                Ok(body) => body.into_error(status.as_u16()),
                Err(_) => ZeiError::Api {
                    status: status.as_u16(),
                },
            };
            return Err(error);
        }

        response
            .json()
            .await
            .map_err(|e| ZeiError::Decode(e.to_string()))
    }

    pub async fn current_activity(&self) -> Result<CurrentActivity> {
        self.call(protocol::CURRENT_ACTIVITY, &CurrentActivityRequest {})
            .await
    }

    pub async fn list_activities(&self) -> Result<ActivityList> {
        self.call(protocol::LIST_ACTIVITIES, &ListActivitiesRequest {})
            .await
    }

    /// Assign an activity to the side the device currently shows
    pub async fn assign_activity(&self, activity_id: &str) -> Result<Option<Activity>> {
        let response: AssignActivityResponse = self
            .call(
                protocol::ASSIGN_ACTIVITY,
                &AssignActivityRequest {
                    activity_id: activity_id.to_string(),
                },
            )
            .await?;
        Ok(response.activity)
    }
}
