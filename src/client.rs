//! Orchestration API client
//!
//! Thin JSON-over-HTTP wrapper around the Learn-Gen endpoints:
//! - `/v1/generate` - full pipeline, returns plan + assets + final video
//! - `/v1/plan` - lesson plan only
//! - `/v1/anim`, `/v1/voice`, `/v1/captions`, `/v1/images` - single assets
//!
//! Response bodies are returned as untyped [`serde_json::Value`]; their shape
//! belongs to the backend.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, instrument};
use url::Url;

use crate::request::{AnimTask, GenerateRequest, ImageTask, TtsTask};

/// Generation runs the whole render pipeline server-side.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1800);

const MAX_DETAIL_CHARS: usize = 500;

/// API client errors
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server returned {status}: {detail}")]
    Status { status: StatusCode, detail: String },

    #[error("could not decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("a submission is already in progress")]
    Busy,
}

/// Client bound to one orchestrator base URL.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base: Url,
}

impl ApiClient {
    /// Create a client rooted at `base` (e.g. `http://127.0.0.1:8000/`).
    pub fn new(base: &Url, timeout: Duration) -> Result<Self, ApiError> {
        if !matches!(base.scheme(), "http" | "https") {
            return Err(ApiError::InvalidEndpoint(format!(
                "unsupported scheme '{}' in {base}",
                base.scheme()
            )));
        }

        let http = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(timeout)
            .gzip(true)
            .use_rustls_tls()
            .user_agent(concat!("learngen/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base: base.clone(),
        })
    }

    /// Base URL this client talks to.
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Resolve an API path such as `v1/generate` against the base URL.
    pub fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base
            .join(path)
            .map_err(|e| ApiError::InvalidEndpoint(format!("{path}: {e}")))
    }

    /// Run the full generation pipeline.
    #[instrument(skip_all, fields(topic = %request.topic))]
    pub async fn generate(&self, request: &GenerateRequest) -> Result<Value, ApiError> {
        info!(
            minutes = request.length.value,
            aspect = ?request.visuals.aspect,
            "Submitting generation request"
        );
        self.post_json("v1/generate", request).await
    }

    /// Draft a lesson plan without rendering.
    #[instrument(skip_all, fields(topic = %request.topic))]
    pub async fn plan(&self, request: &GenerateRequest) -> Result<Value, ApiError> {
        self.post_json("v1/plan", request).await
    }

    /// Render one procedural animation clip.
    pub async fn anim(&self, task: &AnimTask) -> Result<Value, ApiError> {
        self.post_json("v1/anim", task).await
    }

    /// Synthesize narration audio.
    pub async fn voice(&self, task: &TtsTask) -> Result<Value, ApiError> {
        self.post_json("v1/voice", task).await
    }

    /// Produce subtitles for a WAV file already on the orchestrator host.
    #[instrument(skip(self))]
    pub async fn captions(&self, wav: &str) -> Result<Value, ApiError> {
        let mut url = self.endpoint("v1/captions")?;
        url.query_pairs_mut().append_pair("wav", wav);
        self.send(self.http.post(url)).await
    }

    /// Generate still images.
    pub async fn images(&self, tasks: &[ImageTask]) -> Result<Value, ApiError> {
        self.post_json("v1/images", tasks).await
    }

    #[instrument(skip(self, body), fields(base = %self.base))]
    async fn post_json<B: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Value, ApiError> {
        let url = self.endpoint(path)?;
        self.send(self.http.post(url).json(body)).await
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Value, ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        debug!(%status, "Response received");

        let body = response.text().await?;
        if !status.is_success() {
            return Err(ApiError::Status {
                status,
                detail: error_detail(&body),
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

/// Human-readable error detail: the `detail` field FastAPI emits, else the raw body.
pub fn error_detail(body: &str) -> String {
    let detail = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("detail").cloned())
        .map_or_else(
            || body.trim().to_string(),
            |d| match d {
                Value::String(s) => s,
                other => other.to_string(),
            },
        );

    if detail.chars().count() > MAX_DETAIL_CHARS {
        let truncated: String = detail.chars().take(MAX_DETAIL_CHARS).collect();
        format!("{truncated}...")
    } else {
        detail
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_join() {
        let base = Url::parse("http://10.0.0.5:8000/").unwrap();
        let client = ApiClient::new(&base, DEFAULT_TIMEOUT).unwrap();
        assert_eq!(
            client.endpoint("v1/generate").unwrap().as_str(),
            "http://10.0.0.5:8000/v1/generate"
        );
    }

    #[test]
    fn test_rejects_non_http_scheme() {
        let base = Url::parse("ftp://example.com/").unwrap();
        assert!(matches!(
            ApiClient::new(&base, DEFAULT_TIMEOUT),
            Err(ApiError::InvalidEndpoint(_))
        ));
    }

    #[test]
    fn test_error_detail_prefers_fastapi_detail() {
        assert_eq!(
            error_detail(r#"{"detail": "Narration invalid or too short; aborting render."}"#),
            "Narration invalid or too short; aborting render."
        );
        assert_eq!(
            error_detail(r#"{"detail": [{"loc": ["body", "topic"], "msg": "field required"}]}"#),
            r#"[{"loc":["body","topic"],"msg":"field required"}]"#
        );
        assert_eq!(error_detail("Internal Server Error\n"), "Internal Server Error");
    }

    #[test]
    fn test_error_detail_truncates() {
        let body = "x".repeat(MAX_DETAIL_CHARS + 20);
        let detail = error_detail(&body);
        assert_eq!(detail.len(), MAX_DETAIL_CHARS + 3);
        assert!(detail.ends_with("..."));
    }
}
