mod support;

use serde_json::json;
use std::sync::Arc;
use support::{options, FakeSensor, RecordingNotifier};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zei::domain::ActivityService;
use zei::infrastructure::api::{ApiClientConfig, ZeiApiClient};

async fn mount_account(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/developer/sign-in"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "tok"})))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/activities"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "activities": [
                {"id": "A1", "name": "Writing", "color": "#f00", "integration": "zei", "deviceSide": 3},
                {"id": "A2", "name": "Reading", "color": "#0f0", "integration": "zei", "deviceSide": 4}
            ]
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/tracking"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "currentTracking": {
                "activity": {"id": "A2", "name": "Reading", "color": "#0f0", "integration": "zei", "deviceSide": 4},
                "startedAt": "2024-03-01T08:00:00.000"
            }
        })))
        .mount(server)
        .await;
}

async fn start_against(server: &MockServer, side: u8) -> zei::domain::Result<ActivityService> {
    let api = ZeiApiClient::new(ApiClientConfig {
        base_url: server.uri(),
        ..Default::default()
    })
    .unwrap();

    ActivityService::start(
        Arc::new(api),
        Arc::new(FakeSensor::new(side)),
        Arc::new(RecordingNotifier::default()),
        options(false),
    )
    .await
}

#[tokio::test]
async fn test_conflicting_stop_does_not_abort_startup() {
    let server = MockServer::start().await;
    mount_account(&server).await;

    Mock::given(method("POST"))
        .and(path("/tracking/A2/stop"))
        .respond_with(ResponseTemplate::new(409))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/tracking/A1/start"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let service = start_against(&server, 3).await.unwrap();

    let current = service.current().await;
    assert_eq!(current.activity.id, "A1");
    assert!(!current.is_idle);
}

#[tokio::test]
async fn test_failed_start_does_not_abort_startup() {
    let server = MockServer::start().await;
    mount_account(&server).await;

    Mock::given(method("POST"))
        .and(path("/tracking/A2/stop"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/tracking/A1/start"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let service = start_against(&server, 3).await.unwrap();
    assert_eq!(service.current().await.activity.id, "A1");
}

#[tokio::test]
async fn test_failed_sign_in_still_aborts_startup() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/developer/sign-in"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = start_against(&server, 3).await;
    assert!(matches!(result, Err(zei::domain::ZeiError::Auth(_))));
}
