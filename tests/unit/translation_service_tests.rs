/*!
 * Tests for the translation service
 */

use anyhow::Result;
use subline::app_config::{Config, TranslationProvider};
use subline::providers::mock::MockProvider;
use subline::translation::{TranslationService, TranslationOptions};
use crate::common;

/// Test creation of the service from a valid DeepL configuration
#[test]
fn test_translation_service_creation_withValidConfig_shouldCreateService() {
    let mut config = Config::default();
    config.translation.available_providers[0].api_key = "test-key:fx".to_string();
    config.source_language = Some("en".to_string());

    let service = TranslationService::new(&config).unwrap();

    // Language codes are normalized to the wire form on construction
    assert_eq!(service.options.target_language, "ZH");
    assert_eq!(service.options.source_language.as_deref(), Some("EN"));
    assert_eq!(service.options.max_concurrent_requests, 24);
}

/// Test creation of the service for a DeepLX configuration
#[test]
fn test_translation_service_creation_withDeepLXConfig_shouldUseProxyDefaults() {
    let mut config = Config::default();
    config.translation.provider = TranslationProvider::DeepLX;
    config.target_language = "fr".to_string();

    let service = TranslationService::new(&config).unwrap();

    assert_eq!(service.options.target_language, "FR");
    assert_eq!(service.options.source_language, None);
    assert_eq!(service.options.max_concurrent_requests, 4);
}

/// Test that an unknown target language fails service construction
#[test]
fn test_translation_service_creation_withUnknownTarget_shouldReturnError() {
    let mut config = Config::default();
    config.target_language = "xx".to_string();

    assert!(TranslationService::new(&config).is_err());
}

/// Test translating a single line through the mock provider
#[tokio::test]
async fn test_translate_text_withWorkingMock_shouldReturnTranslation() -> Result<()> {
    let service = common::create_mock_translation_service(MockProvider::working());

    let translated = service.translate_text("Hello world").await?;
    assert_eq!(translated, "[TRANSLATED to ZH] Hello world");

    Ok(())
}

/// Test that whitespace-only text never reaches the provider
#[tokio::test]
async fn test_translate_text_withWhitespaceOnly_shouldSkipApiCall() -> Result<()> {
    let mock = MockProvider::working();
    let handle = mock.clone();
    let service = common::create_mock_translation_service(mock);

    assert_eq!(service.translate_text("").await?, "");
    assert_eq!(service.translate_text("   ").await?, "   ");
    assert_eq!(handle.request_count(), 0);

    Ok(())
}

/// Test that the configured source language is passed to the provider
#[tokio::test]
async fn test_translate_text_withSourceLanguage_shouldForwardToProvider() -> Result<()> {
    let mock = MockProvider::working()
        .with_custom_response(|req| format!("{}->{}: {}", req.source_language, req.target_language, req.text));
    let options = TranslationOptions {
        target_language: "FR".to_string(),
        source_language: Some("EN".to_string()),
        max_concurrent_requests: 2,
    };
    let service = common::create_mock_translation_service_with_options(mock, options);

    let translated = service.translate_text("Good morning").await?;
    assert_eq!(translated, "EN->FR: Good morning");

    Ok(())
}

/// Test error propagation from a failing provider
#[tokio::test]
async fn test_translate_text_withFailingMock_shouldReturnError() {
    let service = common::create_mock_translation_service(MockProvider::failing());

    let result = service.translate_text("Hello").await;
    assert!(result.is_err());
    assert!(format!("{}", result.unwrap_err()).contains("Mock translation error"));
}

/// Test that an empty translation result is passed through untouched
#[tokio::test]
async fn test_translate_text_withEmptyMock_shouldReturnEmptyString() -> Result<()> {
    let service = common::create_mock_translation_service(MockProvider::empty());

    assert_eq!(service.translate_text("Hello").await?, "");

    Ok(())
}

/// Test the connection check against the mock provider
#[tokio::test]
async fn test_test_connection_withMockBehaviors_shouldMatchBehavior() {
    let service = common::create_mock_translation_service(MockProvider::working());
    assert!(service.test_connection().await.is_ok());

    let service = common::create_mock_translation_service(MockProvider::failing());
    let result = service.test_connection().await;
    assert!(result.is_err());
    assert!(format!("{}", result.unwrap_err()).contains("Mock connection failure"));
}
