use std::sync::Arc;

use reqwest::StatusCode;
use sentiment_desk::api::{self, AppState};
use sentiment_desk::{Analyzer, Batch, ResultStore, SentimentResult, Simulator};
use serde_json::{json, Value};

async fn spawn_app(dir: &std::path::Path) -> String {
    let analyzer = Analyzer::open(ResultStore::open(dir).unwrap(), None, Simulator::instant());
    let app = api::router(Arc::new(AppState::new(analyzer)));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn analyze_batch_and_delete_over_http() {
    let dir = tempfile::tempdir().unwrap();
    let base = spawn_app(dir.path()).await;
    let client = reqwest::Client::new();

    let result: SentimentResult = client
        .post(format!("{}/analyze", base))
        .json(&json!({ "text": "This is an amazing and wonderful product" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(result.keywords.len(), 2);

    let batch: Batch = client
        .post(format!("{}/batches", base))
        .json(&json!({ "name": "reviews", "texts": ["good movie", "", "terrible film"] }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(batch.summary.total_texts, 2);

    let members: Vec<SentimentResult> = client
        .get(format!("{}/batches/{}/results", base, batch.id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(members[0].text, "good movie");
    assert_eq!(members[1].text, "terrible film");

    let state: Value = client.get(format!("{}/state", base)).send().await.unwrap().json().await.unwrap();
    assert_eq!(state["mode"], "demo");
    assert_eq!(state["result_count"], 3);
    assert_eq!(state["pending_requests"], 0);

    let status = client
        .delete(format!("{}/batches/{}", base, batch.id))
        .send()
        .await
        .unwrap()
        .status();
    assert_eq!(status, StatusCode::NO_CONTENT);

    let results: Vec<SentimentResult> =
        client.get(format!("{}/results", base)).send().await.unwrap().json().await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, result.id);

    let status = client
        .delete(format!("{}/results/{}", base, "missing"))
        .send()
        .await
        .unwrap()
        .status();
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn blank_text_is_bad_request() {
    let dir = tempfile::tempdir().unwrap();
    let base = spawn_app(dir.path()).await;

    let response = reqwest::Client::new()
        .post(format!("{}/analyze", base))
        .json(&json!({ "text": "   " }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("empty"));

    let progress: Value = reqwest::get(format!("{}/progress", base)).await.unwrap().json().await.unwrap();
    assert_eq!(progress["loading"], false);
    assert!(progress["error"].as_str().is_some());
}

#[tokio::test]
async fn clear_all_wipes_store() {
    let dir = tempfile::tempdir().unwrap();
    let base = spawn_app(dir.path()).await;
    let client = reqwest::Client::new();

    client
        .post(format!("{}/analyze", base))
        .json(&json!({ "text": "nice", "use_simulation": true }))
        .send()
        .await
        .unwrap();

    let status = client.delete(format!("{}/data", base)).send().await.unwrap().status();
    assert_eq!(status, StatusCode::NO_CONTENT);

    let results: Vec<Value> = client.get(format!("{}/results", base)).send().await.unwrap().json().await.unwrap();
    assert!(results.is_empty());
    assert!(!dir.path().join("results.json").exists());
}
