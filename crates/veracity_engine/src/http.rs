use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::Serialize;
use veracity_core::{
    AnalysisInput, AnalysisKind, AnalysisRequest, AnalysisResult, ServiceError, ServiceErrorKind,
};
use veracity_logging::{veracity_debug, veracity_warn};

use crate::AnalysisService;

#[derive(Debug, Clone)]
pub struct HttpSettings {
    /// Backend root; requests go to `{base_url}/analyze/{kind}`.
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl HttpSettings {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Analysis backend reached over JSON/HTTP.
#[derive(Debug, Clone)]
pub struct HttpAnalysisService {
    settings: HttpSettings,
    client: reqwest::Client,
}

impl HttpAnalysisService {
    pub fn new(settings: HttpSettings) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ServiceError::new(ServiceErrorKind::Unavailable, err.to_string()))?;
        Ok(Self { settings, client })
    }

    fn endpoint(&self, kind: AnalysisKind) -> String {
        format!(
            "{}/analyze/{}",
            self.settings.base_url.trim_end_matches('/'),
            kind.slug()
        )
    }
}

#[derive(Debug, Serialize)]
struct WireRequest<'a> {
    kind: AnalysisKind,
    inputs: Vec<WireInput<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
enum WireInput<'a> {
    #[serde(rename_all = "camelCase")]
    File {
        filename: &'a str,
        mime_type: &'a str,
        size_bytes: u64,
        data_base64: String,
    },
    Url { url: &'a str },
    Text { content: &'a str },
}

impl<'a> WireRequest<'a> {
    fn new(kind: AnalysisKind, request: &'a AnalysisRequest) -> Self {
        let inputs = request
            .inputs()
            .iter()
            .map(|input| match input {
                AnalysisInput::File(file) => WireInput::File {
                    filename: &file.filename,
                    mime_type: &file.mime_type,
                    size_bytes: file.size_bytes,
                    data_base64: STANDARD.encode(&file.bytes),
                },
                AnalysisInput::Url(url) => WireInput::Url { url: url.url.trim() },
                AnalysisInput::Text(text) => WireInput::Text {
                    content: &text.content,
                },
            })
            .collect();
        Self { kind, inputs }
    }
}

#[async_trait::async_trait]
impl AnalysisService for HttpAnalysisService {
    async fn analyze(
        &self,
        request: &AnalysisRequest,
        kind: AnalysisKind,
    ) -> Result<AnalysisResult, ServiceError> {
        let body = serde_json::to_vec(&WireRequest::new(kind, request))
            .map_err(|err| ServiceError::new(ServiceErrorKind::Decode, err.to_string()))?;
        let endpoint = self.endpoint(kind);
        veracity_debug!("POST {} ({} bytes)", endpoint, body.len());

        let response = self
            .client
            .post(endpoint.as_str())
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            veracity_warn!("{} answered {}", endpoint, status);
            return Err(ServiceError::new(
                ServiceErrorKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let bytes = response.bytes().await.map_err(map_reqwest_error)?;
        decode_result(kind, &bytes)
    }
}

fn decode_result(kind: AnalysisKind, body: &[u8]) -> Result<AnalysisResult, ServiceError> {
    let decoded = match kind {
        AnalysisKind::MediaCheck => serde_json::from_slice(body).map(AnalysisResult::Media),
        AnalysisKind::ClaimCheck => serde_json::from_slice(body).map(AnalysisResult::Claim),
        AnalysisKind::NewsCheck => serde_json::from_slice(body).map(AnalysisResult::News),
    };
    decoded.map_err(|err| ServiceError::new(ServiceErrorKind::Decode, err.to_string()))
}

fn map_reqwest_error(err: reqwest::Error) -> ServiceError {
    if err.is_timeout() {
        return ServiceError::new(ServiceErrorKind::Timeout, err.to_string());
    }
    if err.is_connect() {
        return ServiceError::new(ServiceErrorKind::Unavailable, err.to_string());
    }
    if err.is_decode() || err.is_body() {
        return ServiceError::new(ServiceErrorKind::Decode, err.to_string());
    }
    ServiceError::new(ServiceErrorKind::Network, err.to_string())
}
