//! Gemini client facade with relay interception
//!
//! The facade is the interception point: construction injects the credential
//! and rewrites the configured endpoint into the relay's Gemini-native form,
//! `upload_file` buffers payloads in place of the unsupported Files API, and
//! `generate_content` inlines buffered references before delegating to the
//! real generation endpoint.

use bytes::Bytes;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use crate::buffer::ContentBuffer;
use crate::config::RelayConfig;
use crate::error::{GembridgeError, Result};
use crate::rewrite::rewrite_contents;
use crate::types::{
    Content, Contents, File, GenerateContentRequest, GenerateContentResponse, INLINE_MIME_TYPE,
};
use crate::upload::FileSource;

/// Path segment relay gateways expect for Gemini-native requests
const GEMINI_PATH_SEGMENT: &str = "/gemini";

/// Versioned segment stripped during endpoint normalization
const V1_PATH_SEGMENT: &str = "/v1";

/// Facade over the Gemini HTTP API.
///
/// When a credential is configured, the relay shim is active: uploads are
/// buffered in memory and generation requests are rewritten to carry the
/// bytes inline. Without a credential the client behaves exactly like the
/// plain Gemini client - no endpoint rewrite, real Files API uploads, and
/// requests forwarded untouched.
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
    buffer: Arc<ContentBuffer>,
    intercept: bool,
}

// Manual impl so the credential never appears in debug output.
impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("intercept", &self.intercept)
            .field("buffered_entries", &self.buffer.len())
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Construct a client from relay configuration.
    ///
    /// Interception activates only when a credential is present. A failure
    /// to normalize the endpoint is logged and degrades to the unintercepted
    /// client; it never fails construction.
    pub fn new(config: &RelayConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GembridgeError::Api(format!("Failed to create HTTP client: {e}")))?;

        let Some(api_key) = &config.api_key else {
            tracing::debug!("No API credential configured, relay interception disabled");
            return Ok(Self {
                http,
                base_url: config.base_url.trim_end_matches('/').to_string(),
                api_key: None,
                model: config.model.clone(),
                buffer: Arc::new(ContentBuffer::new()),
                intercept: false,
            });
        };

        let (base_url, intercept) = match normalize_base_url(&config.base_url) {
            Ok(url) => (url, true),
            Err(e) => {
                tracing::error!("Relay interception failed to activate: {e}");
                (config.base_url.trim_end_matches('/').to_string(), false)
            }
        };

        if intercept {
            tracing::info!(
                model = %config.model,
                base_url = %base_url,
                "Relay interception active"
            );
        }

        Ok(Self {
            http,
            base_url,
            api_key: Some(api_key.reveal().to_string()),
            model: config.model.clone(),
            buffer: Arc::new(ContentBuffer::new()),
            intercept,
        })
    }

    /// Whether the relay shim is active for this client
    pub fn intercepts(&self) -> bool {
        self.intercept
    }

    /// The resolved base endpoint requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The configured default model identifier
    pub fn model(&self) -> &str {
        &self.model
    }

    /// The content buffer backing synthetic file handles
    pub fn buffer(&self) -> &ContentBuffer {
        &self.buffer
    }

    /// Upload a file from a stream, path, or raw bytes.
    ///
    /// With the shim active this never performs a network upload: the bytes
    /// are buffered and the returned [`File`] carries a synthetic handle as
    /// both `name` and `uri`, structurally indistinguishable from a real
    /// upload result. Without the shim, the real Files API is used.
    pub async fn upload_file(&self, source: impl Into<FileSource>) -> Result<File> {
        let bytes = source.into().into_bytes().await?;

        if self.intercept {
            let handle = self.buffer.put(bytes);
            tracing::debug!(handle = %handle, "Buffered upload in place of Files API call");
            return Ok(File {
                name: handle.clone(),
                uri: handle,
                mime_type: INLINE_MIME_TYPE.to_string(),
            });
        }

        self.upload_via_files_api(bytes).await
    }

    /// Generate content for the given model.
    ///
    /// Contents are normalized into the canonical block list; with the shim
    /// active, every reference to a buffered handle is replaced in place by
    /// its literal bytes before the request leaves the process. The response
    /// is returned unmodified.
    pub async fn generate_content(
        &self,
        model: &str,
        contents: impl Into<Contents>,
    ) -> Result<GenerateContentResponse> {
        self.generate_content_with(model, contents, None).await
    }

    /// Like [`generate_content`](Self::generate_content), with extra request
    /// fields merged into the body top-level, unchanged.
    pub async fn generate_content_with(
        &self,
        model: &str,
        contents: impl Into<Contents>,
        extra: Option<Map<String, Value>>,
    ) -> Result<GenerateContentResponse> {
        let mut contents = contents.into().into_contents();

        if self.intercept {
            let replaced = rewrite_contents(&mut contents, &self.buffer);
            if replaced > 0 {
                tracing::debug!(replaced, "Rewrote buffered file references to inline data");
            }
        }

        self.send_generate(model, contents, extra).await
    }

    /// Delegate to the real generation endpoint
    async fn send_generate(
        &self,
        model: &str,
        contents: Vec<Content>,
        extra: Option<Map<String, Value>>,
    ) -> Result<GenerateContentResponse> {
        let url = format!("{}/v1beta/models/{}:generateContent", self.base_url, model);

        let mut body = serde_json::to_value(GenerateContentRequest { contents })
            .map_err(|e| GembridgeError::Serialization(e.to_string()))?;
        if let (Value::Object(body_map), Some(extra)) = (&mut body, extra) {
            for (key, value) in extra {
                body_map.insert(key, value);
            }
        }

        tracing::debug!("Calling generate endpoint at: {}", url);

        let mut request = self.http.post(&url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.header("x-goog-api-key", key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| GembridgeError::Api(format!("Generate request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(GembridgeError::Api(format!(
                "API returned {status}: {error_text}"
            )));
        }

        response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| GembridgeError::Serialization(format!("Invalid generate response: {e}")))
    }

    /// Real Files API media upload, used only when the shim is inactive
    async fn upload_via_files_api(&self, bytes: Bytes) -> Result<File> {
        let url = format!("{}/upload/v1beta/files", self.base_url);

        tracing::debug!(size = bytes.len(), "Uploading via Files API at: {}", url);

        let mut request = self
            .http
            .post(&url)
            .header("Content-Type", "application/octet-stream")
            .header("X-Goog-Upload-Protocol", "raw")
            .body(bytes);
        if let Some(key) = &self.api_key {
            request = request.header("x-goog-api-key", key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| GembridgeError::Api(format!("Upload request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(GembridgeError::Api(format!(
                "API returned {status}: {error_text}"
            )));
        }

        let upload: UploadResponse = response
            .json()
            .await
            .map_err(|e| GembridgeError::Serialization(format!("Invalid upload response: {e}")))?;
        Ok(upload.file)
    }
}

/// Wrapper the Files API puts around the uploaded file metadata
#[derive(Debug, Deserialize)]
struct UploadResponse {
    file: File,
}

/// Normalize a configured base endpoint into the relay's Gemini-native form.
///
/// Strips any trailing slash, strips a trailing `/v1` segment, then appends
/// `/gemini` unless already present.
pub fn normalize_base_url(raw: &str) -> Result<String> {
    let parsed = Url::parse(raw)
        .map_err(|e| GembridgeError::Config(format!("Invalid base URL '{raw}': {e}")))?;

    let scheme = parsed.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(GembridgeError::Config(format!(
            "Unsupported URL scheme '{scheme}': only http and https are allowed"
        )));
    }

    let mut base = raw.trim_end_matches('/').to_string();
    if let Some(stripped) = base.strip_suffix(V1_PATH_SEGMENT) {
        base = stripped.to_string();
    }
    if !base.ends_with(GEMINI_PATH_SEGMENT) {
        base.push_str(GEMINI_PATH_SEGMENT);
    }

    Ok(base)
}
