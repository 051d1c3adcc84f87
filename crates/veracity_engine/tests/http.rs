use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use veracity_core::{
    AnalysisInput, AnalysisKind, AnalysisRequest, AnalysisResult, BiasRating, ErrorInfo,
    JobStatus, ServiceErrorKind,
};
use veracity_engine::{
    AnalysisService, AnalysisWorkflow, HttpAnalysisService, HttpSettings, WorkflowSettings,
};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn news_payload() -> serde_json::Value {
    json!({
        "authenticityPercent": 87.0,
        "biasRating": "center",
        "factualityRating": "high",
        "sourceCredibilityPercent": 92.5,
        "publishDate": "2024-08-20",
        "socialMetrics": {"shares": 5400, "engagement": 1250, "sentiment": "neutral"},
        "similarArticles": [
            {"title": "Related coverage from Reuters", "source": "Reuters", "similarityPercent": 87.0, "url": "https://reuters.com"}
        ],
        "warnings": []
    })
}

fn service_for(server: &MockServer) -> HttpAnalysisService {
    HttpAnalysisService::new(HttpSettings::new(server.uri())).expect("client")
}

#[tokio::test]
async fn posts_request_and_decodes_news_report() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analyze/news"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "kind": "newsCheck",
            "inputs": [{"type": "url", "url": "https://example.com/story"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(news_payload()))
        .expect(1)
        .mount(&server)
        .await;

    let request = AnalysisRequest::single(AnalysisInput::url("https://example.com/story"));
    let result = service_for(&server)
        .analyze(&request, AnalysisKind::NewsCheck)
        .await
        .expect("decoded");

    let AnalysisResult::News(report) = result else {
        panic!("expected a news report, got {result:?}");
    };
    assert_eq!(report.bias_rating, BiasRating::Center);
    assert_eq!(report.social_metrics.shares, 5400);
    assert_eq!(report.similar_articles.len(), 1);
}

#[tokio::test]
async fn file_input_is_sent_as_base64() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analyze/media"))
        .and(body_json(json!({
            "kind": "mediaCheck",
            "inputs": [{
                "type": "file",
                "filename": "frame.png",
                "mimeType": "image/png",
                "sizeBytes": 3,
                "dataBase64": "AQID"
            }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "confidencePercent": 93.1,
            "verdict": "authentic",
            "details": ["Pixel-level analysis completed"],
            "processingTimeSeconds": 2.8
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request =
        AnalysisRequest::single(AnalysisInput::file("frame.png", "image/png", vec![1, 2, 3]));
    let result = service_for(&server)
        .analyze(&request, AnalysisKind::MediaCheck)
        .await
        .expect("decoded");

    assert_eq!(result.kind(), AnalysisKind::MediaCheck);
    assert_eq!(result.verdict(), "authentic");
}

#[tokio::test]
async fn non_success_status_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analyze/claim"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let request = AnalysisRequest::single(AnalysisInput::text("The sky is blue"));
    let err = service_for(&server)
        .analyze(&request, AnalysisKind::ClaimCheck)
        .await
        .unwrap_err();

    assert_eq!(err.kind, ServiceErrorKind::HttpStatus(503));
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analyze/claim"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let request = AnalysisRequest::single(AnalysisInput::text("The sky is blue"));
    let err = service_for(&server)
        .analyze(&request, AnalysisKind::ClaimCheck)
        .await
        .unwrap_err();

    assert_eq!(err.kind, ServiceErrorKind::Decode);
}

#[tokio::test]
async fn slow_backend_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analyze/news"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_json(news_payload()),
        )
        .mount(&server)
        .await;

    let settings = HttpSettings {
        request_timeout: Duration::from_millis(50),
        ..HttpSettings::new(server.uri())
    };
    let service = HttpAnalysisService::new(settings).expect("client");
    let request = AnalysisRequest::single(AnalysisInput::url("https://example.com/story"));

    let err = service
        .analyze(&request, AnalysisKind::NewsCheck)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ServiceErrorKind::Timeout);
}

#[tokio::test]
async fn out_of_range_payload_fails_the_workflow_job() {
    let server = MockServer::start().await;
    let mut payload = news_payload();
    payload["authenticityPercent"] = json!(140.0);
    Mock::given(method("POST"))
        .and(path("/analyze/news"))
        .respond_with(ResponseTemplate::new(200).set_body_json(payload))
        .mount(&server)
        .await;

    let workflow = AnalysisWorkflow::spawn(
        AnalysisKind::NewsCheck,
        Arc::new(service_for(&server)),
        WorkflowSettings::default(),
    );
    let job = workflow
        .submit(AnalysisRequest::single(AnalysisInput::url("https://example.com/story")))
        .expect("valid url")
        .wait()
        .await;

    assert_eq!(job.status, JobStatus::Failed);
    assert!(matches!(job.error, Some(ErrorInfo::InvalidResult { .. })));
}

#[tokio::test]
async fn silent_backend_hits_the_workflow_deadline() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analyze/news"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_secs(2))
                .set_body_json(news_payload()),
        )
        .mount(&server)
        .await;

    let http = HttpSettings {
        request_timeout: Duration::from_secs(5),
        ..HttpSettings::new(server.uri())
    };
    let workflow = AnalysisWorkflow::spawn(
        AnalysisKind::NewsCheck,
        Arc::new(HttpAnalysisService::new(http).expect("client")),
        WorkflowSettings {
            timeout: Duration::from_millis(300),
            ..WorkflowSettings::for_kind(AnalysisKind::NewsCheck)
        },
    );
    let job = workflow
        .submit(AnalysisRequest::single(AnalysisInput::url("https://example.com/story")))
        .expect("valid url")
        .wait()
        .await;

    assert_eq!(job.status, JobStatus::Failed);
    assert_eq!(
        job.error,
        Some(ErrorInfo::Timeout {
            after: Duration::from_millis(300)
        })
    );
}
