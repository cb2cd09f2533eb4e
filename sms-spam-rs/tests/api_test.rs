//! Integration tests for the prediction API

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::{json, Value};
use sms_spam_rs::api::ApiServer;
use sms_spam_rs::classifier::SvmKernel;
use sms_spam_rs::config::{EncoderBackend, ServiceConfig};
use sms_spam_rs::embedding::Encoder;
use sms_spam_rs::normalizer::{Lexicon, LexiconPipeline, TextNormalizer};
use sms_spam_rs::visualizer::Visualizer;
use sms_spam_rs::{ServiceContext, SpamError, SvmClassifier};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

const HIDDEN: usize = 8;

/// Writes lexicon, classifier and config into a temp dir.
///
/// The classifier only looks at the two sender flags: spam iff the sender is
/// a numeric short code.
fn setup_config(hidden: usize) -> (TempDir, ServiceConfig) {
    let dir = tempfile::tempdir().unwrap();

    let lexicon_path = dir.path().join("lexicon.tsv");
    std::fs::write(&lexicon_path, "# test lexicon\nmeetings\tmeeting\nkumain\tkain\n").unwrap();

    let mut weights = vec![0.0; hidden];
    weights.extend([1.0, 1.0]);
    let model_path = dir.path().join("svm_model.json");
    std::fs::write(
        &model_path,
        json!({"kernel": "linear", "coef": weights, "intercept": -1.5}).to_string(),
    )
    .unwrap();

    let mut config = ServiceConfig::development();
    config.normalizer.lexicon_path = lexicon_path;
    config.encoder.backend = EncoderBackend::Mock;
    config.encoder.hidden_size = HIDDEN;
    config.classifier.model_path = model_path;
    config.visualizer.width = 320;
    config.visualizer.height = 200;

    (dir, config)
}

fn router_for(context: ServiceContext) -> Router {
    ApiServer::new(Arc::new(context), "127.0.0.1:0".to_string()).router()
}

fn app() -> (TempDir, Router) {
    let (dir, config) = setup_config(HIDDEN);
    let context = ServiceContext::initialize(&config).unwrap();
    (dir, router_for(context))
}

async fn post_json(app: Router, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/predict")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn test_predict_spam_short_code() {
    let (_dir, app) = app();
    let (status, body) = post_json(
        app,
        &json!({"sender": "12345", "message": "Free money now!!!"}).to_string(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sender"], "12345");
    assert_eq!(body["message"], "Free money now!!!");
    assert_eq!(body["processed"], "free money now");
    assert_eq!(body["prediction"], "SPAM");

    let visualization = body["visualization"].as_str().unwrap();
    assert!(!visualization.is_empty());
    let png = STANDARD.decode(visualization).unwrap();
    assert_eq!(&png[..4], b"\x89PNG");
}

#[tokio::test]
async fn test_predict_ham_named_sender() {
    let (_dir, app) = app();
    let (status, body) = post_json(
        app,
        &json!({"sender": "JohnSmith", "message": "Meeting at 3pm tomorrow"}).to_string(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["processed"], "meeting at pm tomorrow");
    assert_eq!(body["prediction"], "HAM");
    assert!(body["visualization"].as_str().is_some_and(|v| !v.is_empty()));

    let keys: Vec<&str> = body.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys.len(), 5);
}

#[tokio::test]
async fn test_predict_uses_lexicon_and_fallback() {
    let (_dir, app) = app();
    let (_, body) = post_json(
        app.clone(),
        &json!({"sender": "Mama", "message": "Kumain ka na? MEETINGS!"}).to_string(),
    )
    .await;
    assert_eq!(body["processed"], "kain ka na meeting");

    let (_, body) = post_json(
        app,
        &json!({"sender": "Mama", "message": "P500 @ 10:30"}).to_string(),
    )
    .await;
    assert_eq!(body["processed"], "p500 @ 10:30");
}

#[tokio::test]
async fn test_predict_missing_field_is_client_error() {
    let (_dir, app) = app();
    let (status, body) = post_json(app, r#"{"sender": "12345"}"#).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().is_some_and(|e| e.contains("message")));
}

#[tokio::test]
async fn test_predict_malformed_json_is_client_error() {
    let (_dir, app) = app();
    let (status, body) = post_json(app, "{not json").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_predict_requires_json_content_type() {
    let (_dir, app) = app();
    let request = Request::builder()
        .method("POST")
        .uri("/predict")
        .body(Body::from(r#"{"sender": "a", "message": "b"}"#))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[tokio::test]
async fn test_only_predict_endpoint() {
    let (_dir, app) = app();

    let get = Request::builder().uri("/predict").body(Body::empty()).unwrap();
    let response = app.clone().oneshot(get).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

    let health = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let response = app.oneshot(health).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// Reports one hidden size but returns vectors of another
struct ShortEncoder;

impl Encoder for ShortEncoder {
    fn embed(&self, texts: &[String]) -> sms_spam_rs::Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|_| vec![0.0; 3]).collect())
    }

    fn hidden_size(&self) -> usize {
        HIDDEN
    }

    fn model_name(&self) -> &str {
        "short-encoder"
    }
}

#[tokio::test]
async fn test_pipeline_failure_is_server_error() {
    let normalizer = TextNormalizer::new(Arc::new(LexiconPipeline::new(Lexicon::default(), None)));
    let classifier = SvmClassifier::new(
        SvmKernel::Linear {
            weights: vec![0.1; HIDDEN + 2],
            bias: 0.0,
        },
        [0, 1],
    )
    .unwrap();
    let context = ServiceContext::new(
        normalizer,
        Arc::new(ShortEncoder),
        classifier,
        Visualizer::new(100, 100).unwrap(),
    )
    .unwrap();

    let (status, body) = post_json(
        router_for(context),
        &json!({"sender": "12345", "message": "hello"}).to_string(),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("dimension mismatch"));
}

#[test]
fn test_initialize_fails_without_lexicon() {
    let (_dir, mut config) = setup_config(HIDDEN);
    config.normalizer.lexicon_path = "/nonexistent/lexicon.tsv".into();

    assert!(matches!(
        ServiceContext::initialize(&config),
        Err(SpamError::Lexicon(_))
    ));
}

#[test]
fn test_initialize_checks_classifier_dimension() {
    let (_dir, config) = setup_config(HIDDEN + 1);

    assert!(matches!(
        ServiceContext::initialize(&config),
        Err(SpamError::DimensionMismatch {
            expected: 10,
            actual: 11
        })
    ));
}
