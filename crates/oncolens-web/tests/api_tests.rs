//! HTTP endpoint tests for the OncoLens API
//!
//! Drives the full router with in-memory requests via `tower::ServiceExt`.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use oncolens_common::Config;
use oncolens_web::{
    router::build_router,
    state::{AppEvent, AppState},
};
use serde_json::{json, Value};
use tower::ServiceExt;

const NOTE: &str = "A 45-year-old female with a 2.5 cm invasive ductal carcinoma, ER positive.";

fn test_app() -> Router {
    test_app_with(Config::default())
}

fn test_app_with(config: Config) -> Router {
    let state = AppState::new(&config).expect("Failed to build state");
    build_router(state)
}

async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(
        app,
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    send(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_ner_response_shape() {
    let (status, json) = post_json(
        test_app(),
        "/api/analyze",
        json!({ "type": "ner", "text": NOTE, "confidenceThreshold": 0.0 }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);

    let data = &json["data"];
    assert_eq!(data["entityCount"], 5);
    let entities = data["entities"].as_array().unwrap();
    assert_eq!(entities.len(), 5);

    let texts: Vec<&str> = entities.iter().map(|e| e["text"].as_str().unwrap()).collect();
    assert_eq!(
        texts,
        vec!["2.5 cm", "invasive ductal carcinoma", "ER positive", "45-year-old", "female"]
    );
    assert_eq!(entities[0]["type"], "TUMOR_SIZE");
    assert_eq!(
        &NOTE[entities[0]["start"].as_u64().unwrap() as usize..entities[0]["end"].as_u64().unwrap() as usize],
        "2.5 cm"
    );
    for entity in entities {
        let confidence = entity["confidence"].as_f64().unwrap();
        assert!((0.75..=0.99).contains(&confidence), "confidence {}", confidence);
    }

    let types: Vec<&str> = data["entityTypes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t.as_str().unwrap())
        .collect();
    assert_eq!(types, vec!["TUMOR_SIZE", "TUMOR_TYPE", "RECEPTOR_STATUS", "AGE", "GENDER"]);
}

#[tokio::test]
async fn test_ner_empty_text() {
    let (status, json) = post_json(test_app(), "/api/analyze", json!({ "type": "ner", "text": "" })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["entityCount"], 0);
    assert_eq!(json["data"]["avgConfidence"], 0.0);
    assert_eq!(json["data"]["entities"], json!([]));
    assert_eq!(json["data"]["entityTypes"], json!([]));
}

#[tokio::test]
async fn test_threshold_above_ceiling_drops_everything() {
    let (status, json) = post_json(
        test_app(),
        "/api/analyze",
        json!({ "type": "ner", "text": NOTE, "model": "ClinicalBERT", "confidenceThreshold": 1.0 }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["entityCount"], 0);
}

#[tokio::test]
async fn test_invalid_analysis_type() {
    let (status, json) = post_json(
        test_app(),
        "/api/analyze",
        json!({ "type": "translation", "text": NOTE }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "Invalid analysis type");
}

#[tokio::test]
async fn test_missing_type_is_invalid() {
    let (status, json) = post_json(test_app(), "/api/analyze", json!({ "text": NOTE })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Invalid analysis type");
}

#[tokio::test]
async fn test_missing_text() {
    let (status, json) = post_json(test_app(), "/api/analyze", json!({ "type": "summarization" })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Missing required field: text");
}

#[tokio::test]
async fn test_qa_requires_question() {
    let (status, json) = post_json(test_app(), "/api/analyze", json!({ "type": "qa", "text": NOTE })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Missing required field: question");
}

#[tokio::test]
async fn test_unknown_model_rejected() {
    let (status, json) = post_json(
        test_app(),
        "/api/analyze",
        json!({ "type": "ner", "text": NOTE, "model": "GPT-4" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "Unknown model variant: GPT-4");
}

#[tokio::test]
async fn test_model_name_is_case_insensitive() {
    let (status, json) = post_json(
        test_app(),
        "/api/analyze",
        json!({ "type": "qa", "text": NOTE, "question": "How large is it?", "model": "pubmed-bert" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["model"], "PubMedBERT");
}

#[tokio::test]
async fn test_text_over_limit_is_413() {
    let mut config = Config::default();
    config.engine.max_text_length = 10;

    let (status, json) = post_json(
        test_app_with(config),
        "/api/analyze",
        json!({ "type": "ner", "text": "12345678901" }),
    )
    .await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "Text exceeds maximum length of 10 characters");
}

#[tokio::test]
async fn test_malformed_json() {
    let (status, json) = send(
        test_app(),
        Request::builder()
            .method("POST")
            .uri("/api/analyze")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"type\": \"ner\", \"text\": "))
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert!(json["error"].as_str().is_some());
}

#[tokio::test]
async fn test_qa_tumor_size() {
    let text = "Imaging shows a 3.5 cm mass in the upper outer quadrant.";
    let (status, json) = post_json(
        test_app(),
        "/api/analyze",
        json!({ "type": "qa", "text": text, "question": "What is the tumor size?" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let data = &json["data"];
    assert_eq!(data["question"], "What is the tumor size?");
    assert_eq!(data["answer"], "3.5 cm");
    assert_eq!(data["confidence"], 0.92);
    assert_eq!(data["context"], text);
    assert_eq!(data["model"], "BioBERT");
}

#[tokio::test]
async fn test_qa_unanswered() {
    let (status, json) = post_json(
        test_app(),
        "/api/analyze",
        json!({ "type": "qa", "text": "No abnormal findings.", "question": "Who is the surgeon?" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["answer"], "Unable to find a specific answer in the provided text.");
    assert_eq!(json["data"]["confidence"], 0.0);
    assert_eq!(json["data"]["context"], "No abnormal findings....");
}

#[tokio::test]
async fn test_summarization() {
    let (status, json) = post_json(
        test_app(),
        "/api/analyze",
        json!({ "type": "summarization", "text": "First finding noted. Second finding noted. Third one!" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let data = &json["data"];
    assert_eq!(data["summary"], "First finding noted. Second finding noted.");
    assert_eq!(data["originalWords"], 8);
    assert_eq!(data["summaryWords"], 6);
    assert_eq!(data["compressionRatio"], "25.0%");
}

#[tokio::test]
async fn test_comparison_lists_every_model() {
    let (status, json) = post_json(
        test_app(),
        "/api/analyze",
        json!({ "type": "comparison", "text": NOTE }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let models = json["data"]["models"].as_array().unwrap();
    let names: Vec<&str> = models.iter().map(|m| m["model"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["BioBERT", "ClinicalBERT", "PubMedBERT"]);
    for m in models {
        assert_eq!(m["entityCount"], 5);
    }

    let recommended = json["data"]["recommendation"]["model"].as_str().unwrap();
    assert!(names.contains(&recommended));
    let reason = json["data"]["recommendation"]["reason"].as_str().unwrap();
    assert!(reason.starts_with(recommended));
    assert!(reason.contains("identified 5 entities"));
}

#[tokio::test]
async fn test_batch_extraction() {
    let (status, json) = post_json(
        test_app(),
        "/api/ner/batch",
        json!({ "texts": ["Mass of 2 cm.", "", "Stage II disease."], "confidenceThreshold": 0.0 }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let data = &json["data"];
    assert_eq!(data["documentCount"], 3);
    assert_eq!(data["failedCount"], 0);

    let results = data["results"].as_array().unwrap();
    assert_eq!(results[0]["data"]["entities"][0]["text"], "2 cm");
    assert_eq!(results[1]["data"]["entityCount"], 0);
    assert_eq!(results[2]["data"]["entities"][0]["type"], "STAGE");
}

#[tokio::test]
async fn test_batch_isolates_oversized_documents() {
    let mut config = Config::default();
    config.engine.max_text_length = 12;

    let (status, json) = post_json(
        test_app_with(config),
        "/api/ner/batch",
        json!({ "texts": ["Mass of 2 cm", "This document is far too long"] }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["failedCount"], 1);
    assert_eq!(json["data"]["results"][0]["success"], true);
    assert_eq!(json["data"]["results"][1]["success"], false);
    assert_eq!(
        json["data"]["results"][1]["error"],
        "Text exceeds maximum length of 12 characters"
    );
}

#[tokio::test]
async fn test_batch_too_large() {
    let mut config = Config::default();
    config.engine.max_batch_size = 2;

    let (status, json) = post_json(
        test_app_with(config),
        "/api/ner/batch",
        json!({ "texts": ["a", "b", "c"] }),
    )
    .await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(json["error"], "Batch of 3 documents exceeds maximum of 2");
}

#[tokio::test]
async fn test_batch_requires_texts() {
    let (status, json) = post_json(test_app(), "/api/ner/batch", json!({ "model": "BioBERT" })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Missing required field: texts");
}

#[tokio::test]
async fn test_health_endpoint() {
    let (status, json) = get_json(test_app(), "/api/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert!(json["version"].as_str().is_some());
    assert!(json["timestamp"].as_str().is_some());
}

#[tokio::test]
async fn test_rules_endpoint() {
    let (status, json) = get_json(test_app(), "/api/rules").await;

    assert_eq!(status, StatusCode::OK);
    let data = &json["data"];
    assert_eq!(data["rules"].as_array().unwrap().len(), 11);
    assert_eq!(data["rules"][0]["category"], "TUMOR_SIZE");
    assert_eq!(data["categories"].as_array().unwrap().len(), 11);
    assert_eq!(data["models"][1]["name"], "ClinicalBERT");
    assert_eq!(data["models"][1]["bonus"], 0.08);
    assert_eq!(data["defaultModel"], "BioBERT");
    assert_eq!(data["maxTextLength"], 100_000);
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let (status, json) = get_json(test_app(), "/api/nope").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "No route for /api/nope");
}

#[tokio::test]
async fn test_completed_analysis_is_published() {
    let state = AppState::new(&Config::default()).unwrap();
    let mut rx = state.subscribe();
    let app = build_router(state);

    let (status, _) = post_json(app, "/api/analyze", json!({ "type": "ner", "text": NOTE })).await;
    assert_eq!(status, StatusCode::OK);

    match rx.try_recv().unwrap() {
        AppEvent::AnalysisCompleted { analysis_type, model, result_count, .. } => {
            assert_eq!(analysis_type, "ner");
            assert_eq!(model.as_deref(), Some("BioBERT"));
            assert_eq!(result_count, 5);
        }
        other => panic!("unexpected event: {:?}", other),
    }
}

#[tokio::test]
async fn test_event_feed_is_sse() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/api/events?kind=batch_completed")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/event-stream"
    );
}
