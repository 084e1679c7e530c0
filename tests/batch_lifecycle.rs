use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use sentiment_desk::{
    AnalysisError, Analyzer, InferenceClient, ResultStore, Scheduler, Sentiment, Settings, Simulator,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// Answers positive and remembers when each request arrived.
#[derive(Clone, Default)]
struct ArrivalLog(Arc<Mutex<Vec<Instant>>>);

impl Respond for ArrivalLog {
    fn respond(&self, _: &Request) -> ResponseTemplate {
        self.0.lock().unwrap().push(Instant::now());
        ResponseTemplate::new(200).set_body_json(serde_json::json!([{ "label": "positive", "score": 0.9 }]))
    }
}

fn live_settings(server: &MockServer) -> Settings {
    Settings {
        api_key: Some("hf_integration_token_123".to_string()),
        primary_url: format!("{}/primary", server.uri()),
        fallback_url: format!("{}/fallback", server.uri()),
        request_delay: Duration::from_millis(200),
        ..Settings::default()
    }
}

fn live_analyzer(settings: &Settings, dir: &std::path::Path) -> Analyzer {
    let client = InferenceClient::new(settings).unwrap();
    let scheduler = Scheduler::spawn(Arc::new(client), settings.request_delay);
    Analyzer::open(ResultStore::open(dir).unwrap(), Some(scheduler), Simulator::instant())
}

#[tokio::test]
async fn demo_batch_survives_restart_and_cascades_on_delete() {
    let dir = tempfile::tempdir().unwrap();
    let mut analyzer = Analyzer::open(ResultStore::open(dir.path()).unwrap(), None, Simulator::instant());

    let kept = analyzer.analyze_one("terrible film", true).await.unwrap();
    let batch = analyzer
        .analyze_batch(&["good movie", "terrible film"], "t1", true)
        .await
        .unwrap();
    assert_eq!(batch.summary.total_texts, 2);

    let mut reopened = Analyzer::open(ResultStore::open(dir.path()).unwrap(), None, Simulator::instant());
    assert_eq!(reopened.state().results.len(), 3);
    assert_eq!(reopened.state().batches[0].id, batch.id);

    assert!(reopened.delete_batch(&batch.id).unwrap());
    let remaining: Vec<_> = reopened.state().results.iter().map(|r| r.id.clone()).collect();
    assert_eq!(remaining, vec![kept.id]);
}

#[tokio::test]
async fn live_batch_normalizes_star_ratings_and_spaces_requests() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/primary"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([[
            { "label": "1 star", "score": 0.02 },
            { "label": "2 stars", "score": 0.03 },
            { "label": "3 stars", "score": 0.05 },
            { "label": "4 stars", "score": 0.30 },
            { "label": "5 stars", "score": 0.60 }
        ]])))
        .expect(2)
        .mount(&server)
        .await;

    let settings = live_settings(&server);
    let dir = tempfile::tempdir().unwrap();
    let mut analyzer = live_analyzer(&settings, dir.path());

    let started = std::time::Instant::now();
    let batch = analyzer.analyze_batch(&["first", "second"], "stars", false).await.unwrap();
    assert!(started.elapsed() >= settings.request_delay);

    assert_eq!(batch.summary.positive, 2);
    let first = &analyzer.state().results[0];
    assert_eq!(first.sentiment, Sentiment::Positive);
    assert!((first.scores.sum() - 1.0).abs() <= 0.01);
    assert!((first.confidence - 0.90).abs() < 1e-9);
}

#[tokio::test]
async fn live_failover_error_is_recorded_and_batch_discarded() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/primary"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/fallback"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let settings = live_settings(&server);
    let dir = tempfile::tempdir().unwrap();
    let mut analyzer = live_analyzer(&settings, dir.path());

    let err = analyzer.analyze_batch(&["one", "two"], "nope", false).await.unwrap_err();
    assert!(matches!(err, AnalysisError::Auth { status: 403 }));
    assert!(analyzer.state().batches.is_empty());
    assert!(analyzer.state().results.is_empty());
    assert!(analyzer.state().error.as_deref().unwrap().contains("403"));
}

#[tokio::test]
async fn consecutive_live_analyses_are_spaced_by_delay() {
    let server = MockServer::start().await;
    let arrivals = ArrivalLog::default();
    Mock::given(method("POST"))
        .and(path("/primary"))
        .respond_with(arrivals.clone())
        .expect(2)
        .mount(&server)
        .await;

    let settings = live_settings(&server);
    let dir = tempfile::tempdir().unwrap();
    let mut analyzer = live_analyzer(&settings, dir.path());

    analyzer.analyze_one("first", false).await.unwrap();
    analyzer.analyze_one("second", false).await.unwrap();

    let seen = arrivals.0.lock().unwrap().clone();
    assert_eq!(seen.len(), 2);
    assert!(seen[1].duration_since(seen[0]) >= settings.request_delay);
}
