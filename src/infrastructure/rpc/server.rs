//! Local RPC server
//!
//! Stateless pass-through to the [`ActivityService`]; the service serialises
//! its own state.

use crate::domain::error::ZeiError;
use crate::domain::models::{ActivityList, CurrentActivity};
use crate::domain::service::ActivityService;
use crate::infrastructure::rpc::protocol::{
    self, AssignActivityRequest, AssignActivityResponse, CurrentActivityRequest, ErrorBody,
    ListActivitiesRequest,
};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

type SharedService = Arc<ActivityService>;

/// Error returned to RPC clients
pub struct RpcError(ZeiError);

impl From<ZeiError> for RpcError {
    fn from(error: ZeiError) -> Self {
        Self(error)
    }
}

fn status_for(code: &str) -> StatusCode {
    match code {
        "not_found" | "bad_route" => StatusCode::NOT_FOUND,
        "unauthenticated" => StatusCode::UNAUTHORIZED,
        "unavailable" => StatusCode::SERVICE_UNAVAILABLE,
        "invalid_argument" => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        warn!("RPC request failed: {}", self.0);
        let body = ErrorBody::from_error(&self.0);
        (status_for(&body.code), Json(body)).into_response()
    }
}

pub fn router(service: SharedService) -> Router {
    Router::new()
        .route(
            &protocol::route(protocol::CURRENT_ACTIVITY),
            post(current_activity),
        )
        .route(
            &protocol::route(protocol::LIST_ACTIVITIES),
            post(list_activities),
        )
        .route(
            &protocol::route(protocol::ASSIGN_ACTIVITY),
            post(assign_activity),
        )
        .fallback(bad_route)
        .with_state(service)
}

/// Serve until the listener fails
pub async fn serve(listener: TcpListener, service: SharedService) -> std::io::Result<()> {
    info!(addr = ?listener.local_addr().ok(), "RPC server listening");
    axum::serve(listener, router(service)).await
}

async fn current_activity(
    State(service): State<SharedService>,
    Json(_request): Json<CurrentActivityRequest>,
) -> Json<CurrentActivity> {
    debug!("CurrentActivity");
    Json(service.current().await)
}

async fn list_activities(
    State(service): State<SharedService>,
    Json(_request): Json<ListActivitiesRequest>,
) -> Result<Json<ActivityList>, RpcError> {
    debug!("ListActivities");
    Ok(Json(service.list_activities().await?))
}

async fn assign_activity(
    State(service): State<SharedService>,
    Json(request): Json<AssignActivityRequest>,
) -> Result<Json<AssignActivityResponse>, RpcError> {
    debug!(activity_id = %request.activity_id, "AssignActivity");
    let activity = service.assign_activity(&request.activity_id).await?;
    Ok(Json(AssignActivityResponse {
        activity: Some(activity),
    }))
}

async fn bad_route() -> (StatusCode, Json<ErrorBody>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody {
            code: "bad_route".to_string(),
            msg: "no such method".to_string(),
        }),
    )
}
