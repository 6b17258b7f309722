/*!
 * Tests for translation provider clients
 */

use anyhow::Result;
use subline::providers::Provider;
use subline::providers::deepl::{endpoint_for_key, DeepL, DeepLRequest, DeepLResponse, DeepLUsage, FREE_ENDPOINT, PRO_ENDPOINT};
use subline::providers::deeplx::{DeepLX, DeepLXRequest, DeepLXResponse};
use subline::providers::mock::{MockProvider, MockRequest};

/// Test endpoint selection from the API key plan suffix
#[test]
fn test_endpoint_for_key_withPlanSuffixes_shouldSelectHost() {
    assert_eq!(endpoint_for_key("abcd-1234:fx"), FREE_ENDPOINT);
    assert_eq!(endpoint_for_key("abcd-1234"), PRO_ENDPOINT);
    assert_eq!(endpoint_for_key(""), PRO_ENDPOINT);
}

/// Test the request body shape sent to the DeepL API
#[test]
fn test_deepl_request_serialization_withAutoDetect_shouldOmitSourceLang() -> Result<()> {
    let request = DeepLRequest::new("ZH").add_text("Hello world");
    let json = serde_json::to_value(&request)?;

    assert_eq!(json["text"], serde_json::json!(["Hello world"]));
    assert_eq!(json["target_lang"], "ZH");
    // Auto-detection means the field is left out entirely
    assert!(json.get("source_lang").is_none());

    Ok(())
}

/// Test the request body shape with an explicit source language
#[test]
fn test_deepl_request_serialization_withSourceLang_shouldIncludeField() -> Result<()> {
    let request = DeepLRequest::new("ZH")
        .add_text("Hello")
        .add_text("world")
        .source_lang("EN");
    let json = serde_json::to_value(&request)?;

    assert_eq!(json["text"], serde_json::json!(["Hello", "world"]));
    assert_eq!(json["source_lang"], "EN");

    Ok(())
}

/// Test parsing a DeepL translation response
#[test]
fn test_deepl_response_parsing_withValidBody_shouldExtractText() -> Result<()> {
    let body = r#"{
        "translations": [
            { "detected_source_language": "EN", "text": "你好，世界" }
        ]
    }"#;

    let response: DeepLResponse = serde_json::from_str(body)?;

    assert_eq!(response.translations.len(), 1);
    assert_eq!(response.translations[0].detected_source_language.as_deref(), Some("EN"));
    assert_eq!(DeepL::extract_text(&response), "你好，世界");

    Ok(())
}

/// Test parsing a DeepL response without the detected language field
#[test]
fn test_deepl_response_parsing_withoutDetectedLanguage_shouldDefaultToNone() -> Result<()> {
    let body = r#"{ "translations": [ { "text": "Bonjour" } ] }"#;
    let response: DeepLResponse = serde_json::from_str(body)?;

    assert_eq!(response.translations[0].detected_source_language, None);
    assert_eq!(DeepL::extract_text(&response), "Bonjour");

    Ok(())
}

/// Test parsing the DeepL usage payload returned by the health check
#[test]
fn test_deepl_usage_parsing_withValidBody_shouldReadCounts() -> Result<()> {
    let body = r#"{ "character_count": 180118, "character_limit": 500000 }"#;
    let usage: DeepLUsage = serde_json::from_str(body)?;

    assert_eq!(usage.character_count, 180118);
    assert_eq!(usage.character_limit, 500000);

    Ok(())
}

/// Test that the client debug output never leaks the API key
#[test]
fn test_deepl_debug_withApiKey_shouldRedactKey() {
    let client = DeepL::new("very-secret-key:fx", "");
    let debug = format!("{:?}", client);

    assert!(!debug.contains("very-secret-key"));
}

/// Test endpoint normalization for bare host and port values
#[test]
fn test_deeplx_endpoint_normalization_withBareHost_shouldAddSchemeAndPath() {
    let client = DeepLX::new("localhost:1188", None);
    assert_eq!(client.endpoint(), "http://localhost:1188/translate");

    let client = DeepLX::new("http://10.0.0.2:1188", None);
    assert_eq!(client.endpoint(), "http://10.0.0.2:1188/translate");

    let client = DeepLX::new("https://translate.example.com/", None);
    assert_eq!(client.endpoint(), "https://translate.example.com/translate");
}

/// Test that an endpoint with an explicit path is left alone
#[test]
fn test_deeplx_endpoint_normalization_withExplicitPath_shouldKeepPath() {
    let client = DeepLX::new("http://10.0.0.2:1188/api/translate", None);
    assert_eq!(client.endpoint(), "http://10.0.0.2:1188/api/translate");
}

/// Test the request body shape sent to a DeepLX server
#[test]
fn test_deeplx_request_serialization_withDefaults_shouldUseAutoSource() -> Result<()> {
    let request = DeepLXRequest::new("Hello world", "ZH");
    let json = serde_json::to_value(&request)?;

    assert_eq!(json["text"], "Hello world");
    assert_eq!(json["source_lang"], "auto");
    assert_eq!(json["target_lang"], "ZH");

    let request = DeepLXRequest::new("Hello", "FR").source_lang("EN");
    let json = serde_json::to_value(&request)?;
    assert_eq!(json["source_lang"], "EN");

    Ok(())
}

/// Test parsing a successful DeepLX response
#[test]
fn test_deeplx_response_parsing_withSuccessBody_shouldExtractData() -> Result<()> {
    let body = r#"{
        "code": 200,
        "data": "你好，世界",
        "alternatives": ["你好世界"]
    }"#;

    let response: DeepLXResponse = serde_json::from_str(body)?;

    assert_eq!(response.code, 200);
    assert_eq!(response.alternatives.len(), 1);
    assert_eq!(DeepLX::extract_text(&response), "你好，世界");

    Ok(())
}

/// Test parsing a DeepLX failure body, which still arrives as HTTP 200
#[test]
fn test_deeplx_response_parsing_withFailureBody_shouldCarryMessage() -> Result<()> {
    let body = r#"{ "code": 404, "message": "No translation found" }"#;
    let response: DeepLXResponse = serde_json::from_str(body)?;

    assert_eq!(response.code, 404);
    assert_eq!(response.data, None);
    assert_eq!(response.message.as_deref(), Some("No translation found"));
    // Missing data extracts as an empty string
    assert_eq!(DeepLX::extract_text(&response), "");

    Ok(())
}

/// Test the mock provider through the shared provider trait
#[tokio::test]
async fn test_mock_provider_complete_withWorkingBehavior_shouldTranslate() -> Result<()> {
    let provider = MockProvider::working();
    let request = MockRequest {
        text: "Hello".to_string(),
        source_language: "en".to_string(),
        target_language: "ZH".to_string(),
    };

    let response = provider.complete(request).await?;
    assert_eq!(MockProvider::extract_text(&response), "[TRANSLATED to ZH] Hello");
    assert_eq!(provider.request_count(), 1);

    Ok(())
}

/// Test the mock provider connection check in failing mode
#[test]
fn test_mock_provider_test_connection_withFailingBehavior_shouldReturnError() {
    let provider = MockProvider::failing();
    let result = tokio_test::block_on(provider.test_connection());

    assert!(result.is_err());
}
