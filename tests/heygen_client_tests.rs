//! Mock HTTP tests for HeyGenClient.

use avatar_relay::avatar::{
    AvatarError, AvatarProvider, HeyGenClient, ProviderId, HEYGEN_DEFAULT_VOICE,
};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> HeyGenClient {
    HeyGenClient::with_base_url("hg-test-key".to_string(), server.uri()).unwrap()
}

#[tokio::test]
async fn test_create_with_photo_url_sends_talking_photo() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/video/generate"))
        .and(header("X-Api-Key", "hg-test-key"))
        .and(body_json(serde_json::json!({
            "video_inputs": [{
                "character": {
                    "type": "talking_photo",
                    "talking_photo_url": "https://img/doctor.png"
                },
                "voice": {
                    "type": "text",
                    "input_text": "Olá",
                    "voice_id": HEYGEN_DEFAULT_VOICE
                }
            }],
            "dimension": {"width": 1280, "height": 720}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "error": null,
            "data": {"video_id": "vid-123"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let job = client(&mock_server)
        .create_talking_video("https://img/doctor.png", "Olá")
        .await
        .unwrap();

    assert_eq!(job.job_id.as_deref(), Some("vid-123"));
    assert_eq!(job.status, "pending");
    assert!(job.result_url.is_none());
}

#[tokio::test]
async fn test_create_with_avatar_id_sends_avatar() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/video/generate"))
        .and(body_json(serde_json::json!({
            "video_inputs": [{
                "character": {
                    "type": "avatar",
                    "avatar_id": "doctor-avatar-01",
                    "avatar_style": "normal"
                },
                "voice": {
                    "type": "text",
                    "input_text": "Bom dia",
                    "voice_id": HEYGEN_DEFAULT_VOICE
                }
            }],
            "dimension": {"width": 1280, "height": 720}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": {"video_id": "vid-456"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let job = client(&mock_server)
        .create_talking_video("doctor-avatar-01", "Bom dia")
        .await
        .unwrap();
    assert_eq!(job.job_id.as_deref(), Some("vid-456"));
}

#[tokio::test]
async fn test_create_accepts_flat_completed_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/video/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "completed",
            "video_url": "https://x/y.mp4"
        })))
        .mount(&mock_server)
        .await;

    let job = client(&mock_server)
        .create_talking_video("https://img/doctor.png", "Olá")
        .await
        .unwrap();
    assert_eq!(job.status, "completed");
    assert_eq!(job.result_url.as_deref(), Some("https://x/y.mp4"));
    assert!(job.job_id.is_none());
}

#[tokio::test]
async fn test_create_with_empty_body_is_malformed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/video/generate"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"error": null, "data": {}})),
        )
        .mount(&mock_server)
        .await;

    let result = client(&mock_server)
        .create_talking_video("https://img/doctor.png", "Olá")
        .await;
    assert!(matches!(
        result,
        Err(AvatarError::MalformedResponse {
            provider: ProviderId::HeyGen,
            ..
        })
    ));
}

#[tokio::test]
async fn test_create_handles_400() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/video/generate"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": {"code": "invalid_parameter", "message": "avatar not found"}
        })))
        .mount(&mock_server)
        .await;

    let result = client(&mock_server)
        .create_talking_video("missing-avatar", "Olá")
        .await;

    match result {
        Err(AvatarError::Api {
            provider,
            status,
            body,
        }) => {
            assert_eq!(provider, ProviderId::HeyGen);
            assert_eq!(status, 400);
            assert!(body.contains("avatar not found"));
        }
        other => panic!("Expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_check_status_queries_by_video_id() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/video_status.get"))
        .and(query_param("video_id", "vid-123"))
        .and(header("X-Api-Key", "hg-test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "code": 100,
            "data": {
                "id": "vid-123",
                "status": "completed",
                "video_url": "https://files.heygen/vid-123.mp4",
                "error": null
            }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let job = client(&mock_server).check_status("vid-123").await.unwrap();
    assert_eq!(job.job_id.as_deref(), Some("vid-123"));
    assert_eq!(job.status, "completed");
    assert_eq!(
        job.result_url.as_deref(),
        Some("https://files.heygen/vid-123.mp4")
    );
    assert!(job.error.is_none());
}

#[tokio::test]
async fn test_check_status_failed_with_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/video_status.get"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "code": 100,
            "data": {
                "status": "failed",
                "error": {"code": 40119, "message": "Voice not supported"}
            }
        })))
        .mount(&mock_server)
        .await;

    let job = client(&mock_server).check_status("vid-9").await.unwrap();
    assert_eq!(job.job_id.as_deref(), Some("vid-9"));
    assert_eq!(job.status, "failed");
    assert_eq!(job.error.as_deref(), Some("Voice not supported"));
}

#[tokio::test]
async fn test_check_status_handles_500() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/video_status.get"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .mount(&mock_server)
        .await;

    let result = client(&mock_server).check_status("vid-1").await;
    assert!(matches!(result, Err(AvatarError::Api { status: 503, .. })));
}

#[tokio::test]
async fn test_check_status_rejects_blank_job_id_without_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let result = client(&mock_server).check_status(" ").await;
    assert!(matches!(result, Err(AvatarError::InvalidJobId(_))));
}
