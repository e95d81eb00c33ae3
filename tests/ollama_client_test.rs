use axum::{http::StatusCode, routing::post, Json, Router};
use interview_coach::error::Error;
use interview_coach::services::llm_client::{OllamaClient, TextGeneration};
use serde_json::{json, Value as JsonValue};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;

async fn spawn_backend(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

#[tokio::test]
async fn sends_model_and_prompt_and_trims_response() {
    let router = Router::new().route(
        "/api/generate",
        post(|Json(body): Json<JsonValue>| async move {
            assert_eq!(body["model"], "llama3.2");
            assert_eq!(body["stream"], false);
            let prompt = body["prompt"].as_str().unwrap_or_default().to_string();
            Json(json!({
                "model": "llama3.2",
                "response": format!("  echo: {}\n\n", prompt),
                "done": true
            }))
        }),
    );
    let addr = spawn_backend(router).await;

    let client = OllamaClient::with_timeout(format!("http://{}/", addr), "llama3.2", None).unwrap();
    let text = client.generate("hello").await.unwrap();
    assert_eq!(text, "echo: hello");
}

#[tokio::test]
async fn missing_response_field_is_empty_text() {
    let router = Router::new().route(
        "/api/generate",
        post(|| async { Json(json!({"done": true})) }),
    );
    let addr = spawn_backend(router).await;

    let client = OllamaClient::with_timeout(format!("http://{}", addr), "llama3.2", None).unwrap();
    assert_eq!(client.generate("x").await.unwrap(), "");
}

#[tokio::test]
async fn non_success_status_is_backend_error() {
    let router = Router::new().route(
        "/api/generate",
        post(|| async {
            (
                StatusCode::NOT_FOUND,
                Json(json!({"error": "model 'llama3.2' not found"})),
            )
        }),
    );
    let addr = spawn_backend(router).await;

    let client = OllamaClient::with_timeout(format!("http://{}", addr), "llama3.2", None).unwrap();
    match client.generate("x").await {
        Err(Error::BackendError { status, message }) => {
            assert_eq!(status, 404);
            assert_eq!(message, "model 'llama3.2' not found");
        }
        other => panic!("expected BackendError, got {:?}", other),
    }
}

#[tokio::test]
async fn unreachable_backend_is_unavailable() {
    // Grab a free port, then close it so nothing is listening.
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };

    let client = OllamaClient::with_timeout(format!("http://{}", addr), "llama3.2", None).unwrap();
    let err = client.generate("x").await.unwrap_err();
    assert!(err.is_backend_unavailable(), "got {:?}", err);
}

#[tokio::test]
async fn timeout_is_unavailable() {
    let router = Router::new().route(
        "/api/generate",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!({"response": "too late"}))
        }),
    );
    let addr = spawn_backend(router).await;

    let client = OllamaClient::with_timeout(
        format!("http://{}", addr),
        "llama3.2",
        Some(Duration::from_millis(200)),
    )
    .unwrap();
    let err = client.generate("x").await.unwrap_err();
    assert!(err.is_backend_unavailable(), "got {:?}", err);
}
