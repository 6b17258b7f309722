use std::time::Duration;
use serde::{Serialize, Deserialize};
use async_trait::async_trait;
use reqwest::Client;
use log::error;

use crate::errors::ProviderError;
use crate::providers::Provider;

/// Endpoint for keys on the free plan
pub const FREE_ENDPOINT: &str = "https://api-free.deepl.com";
/// Endpoint for keys on a paid plan
pub const PRO_ENDPOINT: &str = "https://api.deepl.com";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// DeepL client for the official translation REST API
#[derive(Clone)]
pub struct DeepL {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// API endpoint URL (optional, derived from the key plan when empty)
    endpoint: String,
}

impl std::fmt::Debug for DeepL {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeepL")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

/// DeepL translation request
#[derive(Debug, Serialize)]
pub struct DeepLRequest {
    /// Texts to translate, one entry per segment
    text: Vec<String>,

    /// Target language code ("ZH", "EN-US")
    target_lang: String,

    /// Source language code, omitted for auto-detection
    #[serde(skip_serializing_if = "Option::is_none")]
    source_lang: Option<String>,
}

/// DeepL translation response
#[derive(Debug, Deserialize)]
pub struct DeepLResponse {
    /// One translation per requested text, in request order
    pub translations: Vec<DeepLTranslation>,
}

/// Individual translation in a DeepL response
#[derive(Debug, Deserialize)]
pub struct DeepLTranslation {
    /// Language the API detected the source text to be in
    #[serde(default)]
    pub detected_source_language: Option<String>,

    /// The translated text
    pub text: String,
}

/// Account usage returned by the usage endpoint
#[derive(Debug, Deserialize)]
pub struct DeepLUsage {
    /// Characters translated in the current billing period
    pub character_count: u64,
    /// Character allowance for the current billing period
    pub character_limit: u64,
}

impl DeepLRequest {
    /// Create a new translation request
    pub fn new(target_lang: impl Into<String>) -> Self {
        Self {
            text: Vec::new(),
            target_lang: target_lang.into(),
            source_lang: None,
        }
    }

    /// Add a text segment to the request
    pub fn add_text(mut self, text: impl Into<String>) -> Self {
        self.text.push(text.into());
        self
    }

    /// Set the source language, disabling auto-detection
    pub fn source_lang(mut self, source_lang: impl Into<String>) -> Self {
        self.source_lang = Some(source_lang.into());
        self
    }
}

/// Pick the API endpoint matching the key's plan
///
/// Free-plan keys carry a ":fx" suffix and must go to the dedicated
/// free-plan host; sending them to the paid host fails with 403.
pub fn endpoint_for_key(api_key: &str) -> &'static str {
    if api_key.ends_with(":fx") {
        FREE_ENDPOINT
    } else {
        PRO_ENDPOINT
    }
}

impl DeepL {
    /// Create a new DeepL client with the default request timeout
    pub fn new(api_key: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self::with_timeout(api_key, endpoint, DEFAULT_TIMEOUT_SECS)
    }

    /// Create a new DeepL client with an explicit request timeout
    pub fn with_timeout(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        timeout_secs: u64,
    ) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            endpoint: endpoint.into(),
        }
    }

    /// Resolve the base URL, falling back to the plan-appropriate host
    fn base_url(&self) -> String {
        if self.endpoint.is_empty() {
            endpoint_for_key(&self.api_key).to_string()
        } else {
            self.endpoint.trim_end_matches('/').to_string()
        }
    }

    fn auth_header(&self) -> String {
        format!("DeepL-Auth-Key {}", self.api_key)
    }

    /// Map a non-success HTTP status to a typed provider error
    fn status_error(status: reqwest::StatusCode, body: String) -> ProviderError {
        error!("DeepL API error ({}): {}", status, body);
        match status.as_u16() {
            401 | 403 => ProviderError::AuthenticationError(format!(
                "DeepL rejected the API key ({}): {}",
                status, body
            )),
            // 456 is DeepL's own "quota exceeded" status
            429 | 456 => ProviderError::QuotaExceeded(format!(
                "DeepL quota or rate limit hit ({}): {}",
                status, body
            )),
            code => ProviderError::ApiError {
                status_code: code,
                message: body,
            },
        }
    }
}

#[async_trait]
impl Provider for DeepL {
    type Request = DeepLRequest;
    type Response = DeepLResponse;

    async fn complete(&self, request: DeepLRequest) -> Result<DeepLResponse, ProviderError> {
        let api_url = format!("{}/v2/translate", self.base_url());

        let response = self.client.post(&api_url)
            .header("Authorization", self.auth_header())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                ProviderError::RequestFailed(format!("Failed to send request to DeepL API: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            return Err(Self::status_error(status, error_text));
        }

        let deepl_response = response.json::<DeepLResponse>().await
            .map_err(|e| {
                ProviderError::ParseError(format!("Failed to parse DeepL API response: {}", e))
            })?;

        Ok(deepl_response)
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        let api_url = format!("{}/v2/usage", self.base_url());

        let response = self.client.get(&api_url)
            .header("Authorization", self.auth_header())
            .send()
            .await
            .map_err(|e| {
                ProviderError::ConnectionError(format!("Failed to reach DeepL API: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            return Err(Self::status_error(status, error_text));
        }

        let usage = response.json::<DeepLUsage>().await
            .map_err(|e| {
                ProviderError::ParseError(format!("Failed to parse DeepL usage response: {}", e))
            })?;
        log::debug!(
            "DeepL usage: {}/{} characters",
            usage.character_count,
            usage.character_limit
        );

        Ok(())
    }

    fn extract_text(response: &DeepLResponse) -> String {
        response.translations.iter()
            .map(|t| t.text.as_str())
            .collect()
    }
}
