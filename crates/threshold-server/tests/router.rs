use std::sync::Arc;

use threshold_core::ThresholdConfig;
use threshold_github::mock::MockSourceControl;
use threshold_server::{serve_on, AppState};
use tokio::net::TcpListener;

async fn spawn_server(mock: Arc<MockSourceControl>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let thresholds = ThresholdConfig {
        max_files: 10,
        ..ThresholdConfig::default()
    };
    let state = Arc::new(AppState::new(thresholds, mock));
    tokio::spawn(serve_on(listener, state));
    format!("http://{addr}")
}

#[tokio::test]
async fn health_endpoint_answers_ok() {
    let base = spawn_server(Arc::new(MockSourceControl::new())).await;

    let response = reqwest::get(format!("{base}/health")).await.unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), "ok");
}

#[tokio::test]
async fn webhook_route_returns_plain_text_outcome() {
    let mock = Arc::new(MockSourceControl::new());
    let base = spawn_server(mock.clone()).await;
    let payload = serde_json::json!({
        "action": "opened",
        "number": 3,
        "pull_request": {
            "number": 3,
            "state": "open",
            "changed_files": 2,
            "head": { "sha": "cafe" },
            "base": { "repo": { "name": "r", "owner": { "login": "o" } } }
        }
    });

    let response = reqwest::Client::new()
        .post(format!("{base}/webhook"))
        .body(payload.to_string())
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert!(response.text().await.unwrap().contains("success status posted"));
    assert_eq!(mock.calls().len(), 1);
}

#[tokio::test]
async fn root_route_rejects_malformed_body() {
    let mock = Arc::new(MockSourceControl::new());
    let base = spawn_server(mock.clone()).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/"))
        .body("not json")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    assert!(mock.calls().is_empty());
}
