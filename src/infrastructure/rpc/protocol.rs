//! Local RPC wire format
//!
//! JSON over HTTP POST, one route per method under [`PATH_PREFIX`]. Errors
//! carry an [`ErrorBody`] with a Twirp-style code.

use crate::domain::error::ZeiError;
use crate::domain::models::Activity;
use serde::{Deserialize, Serialize};

pub const PATH_PREFIX: &str = "/twirp/zeid.Zei/";

pub const CURRENT_ACTIVITY: &str = "CurrentActivity";
pub const LIST_ACTIVITIES: &str = "ListActivities";
pub const ASSIGN_ACTIVITY: &str = "AssignActivity";

/// Default address the daemon serves on and clients dial
pub const DEFAULT_ADDRESS: &str = "http://localhost:8594";

pub fn route(method: &str) -> String {
    format!("{}{}", PATH_PREFIX, method)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CurrentActivityRequest {}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListActivitiesRequest {}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignActivityRequest {
    pub activity_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignActivityResponse {
    /// The updated activity record
    #[serde(default)]
    pub activity: Option<Activity>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub msg: String,
}

impl ErrorBody {
    pub fn from_error(error: &ZeiError) -> Self {
        Self {
            code: error.code().to_string(),
            msg: error.to_string(),
        }
    }

    /// Rebuild a client-side error from the wire
    pub fn into_error(self, status: u16) -> ZeiError {
        match self.code.as_str() {
            "unauthenticated" => ZeiError::Auth(self.msg),
            "not_found" | "bad_route" => ZeiError::NotFound(self.msg),
            "unavailable" => ZeiError::Transport(self.msg),
            "invalid_argument" => ZeiError::Config(self.msg),
            _ => ZeiError::Api { status },
        }
    }
}
