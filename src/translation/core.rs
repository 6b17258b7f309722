/*!
 * Core translation service implementation.
 *
 * This module contains the main TranslationService struct and its
 * implementation, which dispatches single-text translation requests to the
 * configured machine-translation provider.
 */

use anyhow::{Result, anyhow};

use crate::app_config::{Config, TranslationConfig, TranslationProvider as ConfigTranslationProvider};
use crate::language_utils;
use crate::providers::Provider;
use crate::providers::deepl::{DeepL, DeepLRequest};
use crate::providers::deeplx::{DeepLX, DeepLXRequest};
use crate::providers::mock::{MockProvider, MockRequest};

/// Translation provider implementation variants
#[derive(Debug, Clone)]
enum TranslationProviderImpl {
    /// DeepL REST API
    DeepL {
        /// Client instance
        client: DeepL,
    },

    /// Self-hosted DeepLX proxy
    DeepLX {
        /// Client instance
        client: DeepLX,
    },

    /// In-crate mock, for tests and benchmarks
    Mock {
        /// Client instance
        client: MockProvider,
    },
}

/// Translation options resolved from configuration
#[derive(Debug, Clone)]
pub struct TranslationOptions {
    /// Target language in provider wire form ("ZH", "EN-US")
    pub target_language: String,

    /// Source language in wire form, None lets the service detect it
    pub source_language: Option<String>,

    /// Maximum number of concurrent requests
    pub max_concurrent_requests: usize,
}

impl Default for TranslationOptions {
    fn default() -> Self {
        Self {
            target_language: "ZH".to_string(),
            source_language: None,
            max_concurrent_requests: 4,
        }
    }
}

/// Main translation service for subtitle line translation
#[derive(Debug, Clone)]
pub struct TranslationService {
    /// Provider implementation
    provider: TranslationProviderImpl,

    /// Configuration for the translation service
    pub config: TranslationConfig,

    /// Translation options
    pub options: TranslationOptions,
}

impl TranslationService {
    /// Create a new translation service from the application configuration
    ///
    /// Language codes are normalized to wire form here, once, so every
    /// request carries codes the provider understands.
    pub fn new(config: &Config) -> Result<Self> {
        let target_language = language_utils::normalize_to_api_code(&config.target_language)?;
        let source_language = config.source_language.as_deref()
            .filter(|s| !s.is_empty())
            .map(language_utils::normalize_to_api_code)
            .transpose()?;

        let translation = &config.translation;
        let provider = match translation.provider {
            ConfigTranslationProvider::DeepL => TranslationProviderImpl::DeepL {
                client: DeepL::with_timeout(
                    translation.get_api_key(),
                    translation.get_endpoint(),
                    translation.get_timeout_secs(),
                ),
            },
            ConfigTranslationProvider::DeepLX => {
                // DeepLX tokens are optional; most self-hosted servers run open
                let api_key = {
                    let k = translation.get_api_key();
                    if k.is_empty() { None } else { Some(k) }
                };

                TranslationProviderImpl::DeepLX {
                    client: DeepLX::with_timeout(
                        translation.get_endpoint(),
                        api_key,
                        translation.get_timeout_secs(),
                    ),
                }
            },
        };

        let options = TranslationOptions {
            target_language,
            source_language,
            max_concurrent_requests: translation.get_concurrent_requests(),
        };

        Ok(Self {
            provider,
            config: translation.clone(),
            options,
        })
    }

    /// Create a service backed by the in-crate mock provider
    pub fn with_mock(client: MockProvider, options: TranslationOptions) -> Self {
        Self {
            provider: TranslationProviderImpl::Mock { client },
            config: TranslationConfig::default(),
            options,
        }
    }

    /// Translate a single text string to the configured target language
    pub async fn translate_text(&self, text: &str) -> Result<String> {
        // Skip empty text without an API round trip
        if text.trim().is_empty() {
            return Ok(text.to_string());
        }

        match &self.provider {
            TranslationProviderImpl::DeepL { client } => {
                let mut request = DeepLRequest::new(&self.options.target_language)
                    .add_text(text);
                if let Some(source) = &self.options.source_language {
                    request = request.source_lang(source);
                }

                let result = client.complete(request).await;
                match result {
                    Ok(response) => Ok(DeepL::extract_text(&response)),
                    Err(e) => Err(anyhow!("DeepL translation error: {}", e)),
                }
            },
            TranslationProviderImpl::DeepLX { client } => {
                let mut request = DeepLXRequest::new(text, &self.options.target_language);
                if let Some(source) = &self.options.source_language {
                    request = request.source_lang(source);
                }

                let result = client.complete(request).await;
                match result {
                    Ok(response) => Ok(DeepLX::extract_text(&response)),
                    Err(e) => Err(anyhow!("DeepLX translation error: {}", e)),
                }
            },
            TranslationProviderImpl::Mock { client } => {
                let request = MockRequest {
                    text: text.to_string(),
                    source_language: self.options.source_language.clone().unwrap_or_default(),
                    target_language: self.options.target_language.clone(),
                };

                let result = client.complete(request).await;
                match result {
                    Ok(response) => Ok(MockProvider::extract_text(&response)),
                    Err(e) => Err(anyhow!("Mock translation error: {}", e)),
                }
            },
        }
    }

    /// Test the connection to the translation provider
    pub async fn test_connection(&self) -> Result<()> {
        match &self.provider {
            TranslationProviderImpl::DeepL { client } => {
                client.test_connection().await
                    .map_err(|e| anyhow!("Failed to connect to DeepL API: {}", e))
            },
            TranslationProviderImpl::DeepLX { client } => {
                client.test_connection().await
                    .map_err(|e| anyhow!("Failed to connect to DeepLX server: {}", e))
            },
            TranslationProviderImpl::Mock { client } => {
                client.test_connection().await
                    .map_err(|e| anyhow!("Mock connection failure: {}", e))
            },
        }
    }
}
