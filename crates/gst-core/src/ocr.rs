//! OCR collaborator client
//!
//! Thin client over an external text-detection service: given document
//! bytes, returns the detected text. The service is opaque; its only
//! contract here is the annotation response shape.

use crate::{GstError, GstResult};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

/// Configuration for the OCR client
#[derive(Debug, Clone)]
pub struct OcrConfig {
    /// Text-detection endpoint
    pub endpoint: String,
    /// Optional API credential
    pub api_key: Option<String>,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://vision.googleapis.com/v1/images:annotate".to_string(),
            api_key: None,
        }
    }
}

/// Client for the external OCR text-detection service
pub struct OcrClient {
    client: Client,
    config: OcrConfig,
}

#[derive(Debug, Deserialize)]
struct DetectResponse {
    #[serde(default)]
    responses: Vec<DetectResult>,
}

#[derive(Debug, Deserialize)]
struct DetectResult {
    #[serde(rename = "textAnnotations", default)]
    text_annotations: Vec<TextAnnotation>,
    error: Option<DetectError>,
}

#[derive(Debug, Deserialize)]
struct TextAnnotation {
    description: String,
}

#[derive(Debug, Deserialize)]
struct DetectError {
    message: String,
}

impl OcrClient {
    /// Build a client. No request timeout is set: OCR latency is
    /// unbounded and the caller awaits the call inline.
    pub fn new(config: OcrConfig) -> GstResult<Self> {
        let client = Client::builder().build()?;
        Ok(Self { client, config })
    }

    /// Run text detection over raw document bytes. Returns the full
    /// detected text, or an empty string when the service detects
    /// nothing.
    pub async fn detect_text(&self, content: &[u8]) -> GstResult<String> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| GstError::Config("OCR API key is not set".to_string()))?;

        let body = json!({
            "requests": [{
                "image": { "content": BASE64.encode(content) },
                "features": [{ "type": "TEXT_DETECTION" }]
            }]
        });

        let url = format!("{}?key={}", self.config.endpoint, api_key);
        let response = self.client.post(&url).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| status.to_string());
            return Err(GstError::Ocr(message));
        }

        let body: DetectResponse = response.json().await?;
        full_text(body)
    }
}

/// The first annotation carries the full detected text block; the rest
/// are per-word fragments.
fn full_text(body: DetectResponse) -> GstResult<String> {
    let first = body
        .responses
        .into_iter()
        .next()
        .ok_or_else(|| GstError::Ocr("empty OCR response".to_string()))?;

    if let Some(err) = first.error {
        return Err(GstError::Ocr(err.message));
    }

    Ok(first
        .text_annotations
        .into_iter()
        .next()
        .map(|a| a.description)
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn takes_full_text_from_first_annotation() {
        let body: DetectResponse = serde_json::from_value(serde_json::json!({
            "responses": [{
                "textAnnotations": [
                    { "description": "GSTIN 29ABCDE1234F1Z5\nAcme Traders" },
                    { "description": "GSTIN" },
                    { "description": "29ABCDE1234F1Z5" }
                ]
            }]
        }))
        .unwrap();

        let text = full_text(body).unwrap();
        assert_eq!(text, "GSTIN 29ABCDE1234F1Z5\nAcme Traders");
    }

    #[test]
    fn no_annotations_is_empty_text() {
        let body: DetectResponse =
            serde_json::from_value(serde_json::json!({ "responses": [{}] })).unwrap();
        assert_eq!(full_text(body).unwrap(), "");
    }

    #[test]
    fn service_error_is_surfaced() {
        let body: DetectResponse = serde_json::from_value(serde_json::json!({
            "responses": [{ "error": { "message": "image too large" } }]
        }))
        .unwrap();

        let err = full_text(body).unwrap_err();
        assert!(matches!(err, GstError::Ocr(m) if m == "image too large"));
    }

    #[test]
    fn empty_response_is_an_error() {
        let body: DetectResponse =
            serde_json::from_value(serde_json::json!({ "responses": [] })).unwrap();
        assert!(matches!(full_text(body).unwrap_err(), GstError::Ocr(_)));
    }
}
