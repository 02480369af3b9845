//! API router tests.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use retitle_api::{create_router, ApiConfig, AppState};
use retitle_bus::EventBus;
use retitle_models::{Event, Job, JobId, JobStatus, Topic};
use retitle_store::{JobStore, MemoryJobStore};

fn test_app() -> (axum::Router, MemoryJobStore, EventBus) {
    let store = MemoryJobStore::new();
    let bus = EventBus::new();
    let state = AppState::new(ApiConfig::default(), Arc::new(store.clone()), bus.clone());
    (create_router(state), store, bus)
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_submit(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/submit")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_submit_creates_queued_job_and_emits() {
    let (app, store, bus) = test_app();
    let mut submit_rx = bus.subscribe(Topic::Submit);

    let response = app
        .oneshot(post_submit(json!({
            "channel": "@exampleHandle",
            "email": { "email": "a@b.com" },
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["success"], json!(true));
    let job_id = body["jobId"].as_str().unwrap().to_string();

    // The record exists with status queued before any stage runs.
    let job = store
        .get(&JobId::from_string(job_id.as_str()))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(job.status, JobStatus::Queued);
    assert_eq!(job.email, "a@b.com");
    assert_eq!(job.channel, "@exampleHandle");

    match submit_rx.try_recv().unwrap() {
        Event::Submit(payload) => {
            assert_eq!(payload.job_id.as_str(), job_id);
            assert_eq!(payload.channel, "@exampleHandle");
            assert_eq!(payload.email, "a@b.com");
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test]
async fn test_submit_with_missing_fields_mutates_nothing() {
    let (app, store, bus) = test_app();
    let mut submit_rx = bus.subscribe(Topic::Submit);

    let response = app
        .oneshot(post_submit(json!({ "channel": "@exampleHandle" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(
        body["message"],
        "Missing required fields: channel and email"
    );

    assert!(store.is_empty().await);
    assert!(submit_rx.try_recv().is_err());
}

#[tokio::test]
async fn test_submit_accepts_a_caller_supplied_job_id() {
    let (app, store, _bus) = test_app();

    let response = app
        .oneshot(post_submit(json!({
            "channel": "UC123",
            "email": { "email": "a@b.com" },
            "jobId": "Job_42_fixed",
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["jobId"], "Job_42_fixed");
    assert!(store
        .get(&JobId::from_string("Job_42_fixed"))
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn test_get_job_returns_the_record() {
    let (app, store, _bus) = test_app();

    let mut job = Job::new(JobId::from_string("Job_1_x"), "a@b.com", "@example");
    job.fail("Channel not found!");
    store.put(&job).await.unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/jobs/Job_1_x")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["jobId"], "Job_1_x");
    assert_eq!(body["status"], "failed");
    assert_eq!(body["error"], "Channel not found!");
}

#[tokio::test]
async fn test_get_unknown_job_is_404() {
    let (app, _store, _bus) = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/jobs/Job_unknown")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_submission_flows_through_the_whole_pipeline() {
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let youtube = MockServer::start().await;
    let gemini = MockServer::start().await;

    let videos: Vec<Value> = (0..3)
        .map(|i| {
            json!({
                "id": format!("vid{i}"),
                "title": format!("Video {i}"),
            })
        })
        .collect();
    let channel = json!({
        "id": "UC123",
        "title": "Example Channel",
        "results": [ { "title": "Videos", "videos": videos } ],
    });
    Mock::given(method("GET"))
        .and(path("/channel/exampleHandle"))
        .respond_with(ResponseTemplate::new(200).set_body_json(channel.clone()))
        .mount(&youtube)
        .await;
    Mock::given(method("GET"))
        .and(path("/channel/UC123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(channel))
        .mount(&youtube)
        .await;

    let titles: Vec<Value> = (0..3)
        .map(|i| {
            json!({
                "original": format!("Video {i}"),
                "improved": format!("Improved {i}"),
                "rationale": "Clearer.",
            })
        })
        .collect();
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [
                { "content": { "parts": [ { "text": json!({ "titles": titles }).to_string() } ] } }
            ]
        })))
        .mount(&gemini)
        .await;

    let store = MemoryJobStore::new();
    let bus = EventBus::new();
    let pipeline_config = retitle_pipeline::PipelineConfig {
        youtube_api_base: youtube.uri(),
        ai_api_base: gemini.uri(),
        ai_api_key: Some("test-key".to_string()),
        ai_model: "gemini-2.5-flash".to_string(),
    };
    let _handles = retitle_pipeline::spawn_stages(
        &pipeline_config,
        Arc::new(store.clone()),
        bus.clone(),
    );

    let state = AppState::new(ApiConfig::default(), Arc::new(store.clone()), bus.clone());
    let app = create_router(state);

    let response = app
        .oneshot(post_submit(json!({
            "channel": "@exampleHandle",
            "email": { "email": "a@b.com" },
        })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    let job_id = JobId::from_string(body["jobId"].as_str().unwrap());

    let mut job = None;
    for _ in 0..250 {
        if let Some(stored) = store.get(&job_id).await.unwrap() {
            if stored.status.is_terminal() {
                job = Some(stored);
                break;
            }
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    let job = job.expect("job never reached a terminal status");

    assert_eq!(job.status, JobStatus::TitlesReady);
    assert_eq!(job.improved_titles.len(), 3);
    assert_eq!(
        job.improved_titles[0].url,
        "https://www.youtube.com/watch?v=vid0"
    );
}

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _store, _bus) = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
