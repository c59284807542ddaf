//! Integration tests for the HTTP story client against a local mock server.

use std::time::Duration;

use mockito::Matcher;
use serde_json::json;
use taleweave_client::{HttpStoryClient, Operation, StoryClient, TransportError};

fn client_for(server: &mockito::ServerGuard) -> HttpStoryClient {
    HttpStoryClient::new(format!("{}/webhook/", server.url()))
}

#[tokio::test]
async fn test_initialize_session_sends_lead_first_and_returns_body() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/webhook/initialize-story")
        .match_body(Matcher::PartialJson(json!({
            "user_prompt": "A hero wakes.",
            "character_inputs": ["Mira", "Dog"],
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"session_id":"s-1","protagonist_name":"Mira","characters":[{"name":"Mira"},{"name":"Dog"}]}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let init = client
        .initialize_session("A hero wakes.", "Mira", &["Dog".to_string()])
        .await
        .unwrap();

    mock.assert_async().await;
    assert!(!init.session_id.is_empty());
    assert_eq!(init.body["protagonist_name"], "Mira");
    assert_eq!(init.body["characters"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_advance_scene_forwards_payload_verbatim() {
    let mut server = mockito::Server::new_async().await;
    let payload = json!({"session_id": "s-1", "anything": {"nested": [1, 2, 3]}});
    let mock = server
        .mock("POST", "/webhook/generate-scene")
        .match_body(Matcher::Json(payload.clone()))
        .with_status(200)
        .with_body(r#"{"render_scene":{"panels":[]}}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let body = client.advance_scene(payload).await.unwrap();

    mock.assert_async().await;
    assert_eq!(body, json!({"render_scene": {"panels": []}}));
}

#[tokio::test]
async fn test_http_error_carries_status_and_body() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/webhook/generate-scene")
        .with_status(500)
        .with_body("workflow crashed")
        .create_async()
        .await;

    let client = client_for(&server);
    let err = client.advance_scene(json!({})).await.unwrap_err();

    assert_eq!(
        err,
        TransportError::HttpError {
            status: 500,
            body: "workflow crashed".to_string()
        }
    );
}

#[tokio::test]
async fn test_non_json_body_is_malformed() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/webhook/initialize-story")
        .with_status(200)
        .with_body("<html>not json</html>")
        .create_async()
        .await;

    let client = client_for(&server);
    let err = client
        .initialize_session("prompt", "lead", &[])
        .await
        .unwrap_err();

    match err {
        TransportError::MalformedResponse { snippet, .. } => {
            assert_eq!(snippet, "<html>not json</html>")
        }
        other => panic!("expected a malformed response, got {other:?}"),
    }
}

#[tokio::test]
async fn test_refused_connection_is_a_connection_failure() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let client = HttpStoryClient::new(format!("http://127.0.0.1:{port}/webhook"));
    let err = client.advance_scene(json!({})).await.unwrap_err();

    assert!(
        matches!(err, TransportError::ConnectionFailure { .. }),
        "unexpected error: {err:?}"
    );
}

#[tokio::test]
async fn test_slow_service_times_out() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    let client = HttpStoryClient::new(format!("http://{addr}/webhook"))
        .with_timeout(Duration::from_millis(200));
    let err = client.advance_scene(json!({})).await.unwrap_err();

    assert_eq!(
        err,
        TransportError::Timeout {
            operation: Operation::GenerateScene,
            timeout: Duration::from_millis(200)
        }
    );
    assert_eq!(
        err.to_string(),
        "Scene generation timed out after 200 ms. The workflow may need more time to process."
    );
}

#[test]
fn test_default_timeout_is_two_minutes() {
    let client = HttpStoryClient::new("http://localhost:5678/webhook/".to_string());
    assert_eq!(client.timeout(), Duration::from_secs(120));
    assert_eq!(client.base_url(), "http://localhost:5678/webhook");
}
