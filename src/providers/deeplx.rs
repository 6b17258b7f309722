use std::time::Duration;
use serde::{Serialize, Deserialize};
use async_trait::async_trait;
use reqwest::Client;
use url::Url;
use log::error;

use crate::errors::ProviderError;
use crate::providers::Provider;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Source language value that asks the server to auto-detect
pub const AUTO_SOURCE: &str = "auto";

/// Client for a self-hosted DeepLX proxy server
#[derive(Clone)]
pub struct DeepLX {
    /// HTTP client for API requests
    client: Client,
    /// Fully normalized translate endpoint URL
    endpoint: String,
    /// Optional access token, sent as a bearer header when present
    api_key: Option<String>,
}

impl std::fmt::Debug for DeepLX {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeepLX")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

/// DeepLX translation request
#[derive(Debug, Serialize)]
pub struct DeepLXRequest {
    /// Text to translate
    text: String,

    /// Source language code, or "auto" for detection
    source_lang: String,

    /// Target language code ("ZH", "EN")
    target_lang: String,
}

/// DeepLX translation response
///
/// DeepLX answers HTTP 200 even for failed translations and signals the real
/// outcome in the `code` field, so the field must be checked before `data`
/// is trusted.
#[derive(Debug, Deserialize)]
pub struct DeepLXResponse {
    /// Server-side status code, 200 on success
    pub code: i64,

    /// The translated text, absent on failure
    #[serde(default)]
    pub data: Option<String>,

    /// Alternative translations, usually empty
    #[serde(default)]
    pub alternatives: Vec<String>,

    /// Error message, present on failure
    #[serde(default)]
    pub message: Option<String>,
}

impl DeepLXRequest {
    /// Create a new translation request
    pub fn new(text: impl Into<String>, target_lang: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source_lang: AUTO_SOURCE.to_string(),
            target_lang: target_lang.into(),
        }
    }

    /// Set an explicit source language, disabling auto-detection
    pub fn source_lang(mut self, source_lang: impl Into<String>) -> Self {
        self.source_lang = source_lang.into();
        self
    }
}

impl DeepLX {
    /// Create a new DeepLX client with the default request timeout
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>) -> Self {
        Self::with_timeout(endpoint, api_key, DEFAULT_TIMEOUT_SECS)
    }

    /// Create a new DeepLX client with an explicit request timeout
    pub fn with_timeout(
        endpoint: impl Into<String>,
        api_key: Option<String>,
        timeout_secs: u64,
    ) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            endpoint: Self::normalize_endpoint(&endpoint.into()),
            api_key,
        }
    }

    /// Normalize a configured endpoint into a full translate URL
    ///
    /// Accepts "host:port", a bare server URL, or a complete translate URL.
    /// A missing scheme gets "http://" and a missing path gets "/translate",
    /// which is the path every DeepLX build serves.
    fn normalize_endpoint(endpoint: &str) -> String {
        let with_scheme = if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            endpoint.to_string()
        } else {
            format!("http://{}", endpoint)
        };
        let base = with_scheme.trim_end_matches('/').to_string();

        match Url::parse(&base) {
            Ok(url) if url.path().is_empty() || url.path() == "/" => {
                format!("{}/translate", base)
            }
            // Already has a path, or is malformed enough that the request
            // itself will produce the clearer error
            _ => base,
        }
    }

    /// The normalized endpoint this client sends requests to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn apply_auth(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) if !key.is_empty() => builder.bearer_auth(key),
            _ => builder,
        }
    }
}

#[async_trait]
impl Provider for DeepLX {
    type Request = DeepLXRequest;
    type Response = DeepLXResponse;

    async fn complete(&self, request: DeepLXRequest) -> Result<DeepLXResponse, ProviderError> {
        let response = self.apply_auth(self.client.post(&self.endpoint))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                ProviderError::RequestFailed(format!(
                    "Failed to send request to DeepLX server: {}",
                    e
                ))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("DeepLX server error ({}): {}", status, error_text);
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message: error_text,
            });
        }

        let deeplx_response = response.json::<DeepLXResponse>().await
            .map_err(|e| {
                ProviderError::ParseError(format!("Failed to parse DeepLX response: {}", e))
            })?;

        if deeplx_response.code != 200 {
            let message = deeplx_response.message
                .unwrap_or_else(|| "No error message in response".to_string());
            error!("DeepLX translation failed (code {}): {}", deeplx_response.code, message);
            return Err(ProviderError::ApiError {
                status_code: deeplx_response.code as u16,
                message,
            });
        }

        Ok(deeplx_response)
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        // DeepLX has no usage endpoint, so probe with a minimal request
        let request = DeepLXRequest::new("Hello", "EN");
        self.complete(request).await?;
        Ok(())
    }

    fn extract_text(response: &DeepLXResponse) -> String {
        response.data.clone().unwrap_or_default()
    }
}
