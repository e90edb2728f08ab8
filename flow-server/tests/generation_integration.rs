//! Tests for the chat-completions client against a stubbed API.

use std::io::Write as _;

use flow_server::{CodeGenerator, GenerationError, GenerationRequest, OpenAiGenerator, RelayConfig};
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(api: &MockServer) -> RelayConfig {
    RelayConfig {
        api_key: Some("sk-test".to_string()),
        api_base_url: api.uri(),
        model: "vision-test".to_string(),
        ..RelayConfig::default()
    }
}

fn staged_image() -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("tempfile");
    file.write_all(&[0xFF, 0xD8, 0xFF, 0xE0, 1, 2, 3]).expect("write");
    file
}

#[tokio::test]
async fn test_request_shape() {
    let api = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "content": "SELECT 1;" } }]
        })))
        .mount(&api)
        .await;

    let image = staged_image();
    let generator = OpenAiGenerator::new(&config_for(&api)).expect("generator");
    let code = generator
        .generate(GenerationRequest {
            image_path: image.path(),
            mime_type: "image/jpeg",
            language: "SQL",
        })
        .await
        .expect("generate");
    assert_eq!(code, "SELECT 1;");

    let requests = api.received_requests().await.expect("recording enabled");
    assert_eq!(requests.len(), 1);
    let body: Value = serde_json::from_slice(&requests[0].body).expect("json body");
    assert_eq!(body["model"], "vision-test");
    assert_eq!(body["messages"][0]["role"], "system");
    assert_eq!(body["messages"][1]["role"], "user");
    assert_eq!(
        body["messages"][1]["content"][1]["image_url"]["url"],
        "data:image/jpeg;base64,/9j/4AECAw=="
    );
}

#[tokio::test]
async fn test_non_success_status_is_api_error() {
    let api = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
        .mount(&api)
        .await;

    let image = staged_image();
    let generator = OpenAiGenerator::new(&config_for(&api)).expect("generator");
    let err = generator
        .generate(GenerationRequest {
            image_path: image.path(),
            mime_type: "image/jpeg",
            language: "Python",
        })
        .await
        .expect_err("should fail");

    match err {
        GenerationError::Api { status, body } => {
            assert_eq!(status, 429);
            assert_eq!(body, "slow down");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_missing_content_is_malformed() {
    let api = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "content": null } }]
        })))
        .mount(&api)
        .await;

    let image = staged_image();
    let generator = OpenAiGenerator::new(&config_for(&api)).expect("generator");
    let err = generator
        .generate(GenerationRequest {
            image_path: image.path(),
            mime_type: "image/jpeg",
            language: "Python",
        })
        .await
        .expect_err("should fail");

    assert!(matches!(err, GenerationError::MalformedResponse(_)));
}

#[tokio::test]
async fn test_missing_image_is_io_error() {
    let api = MockServer::start().await;
    let generator = OpenAiGenerator::new(&config_for(&api)).expect("generator");
    let dir = tempfile::tempdir().expect("tempdir");

    let err = generator
        .generate(GenerationRequest {
            image_path: &dir.path().join("gone.png"),
            mime_type: "image/png",
            language: "Python",
        })
        .await
        .expect_err("should fail");

    assert!(matches!(err, GenerationError::Io(_)));
}
