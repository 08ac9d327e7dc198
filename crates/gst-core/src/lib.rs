//! GST Verification Core
//!
//! Building blocks for verifying India GST registration numbers:
//! structural validation, extraction from OCR text, the external
//! verification API client, and the OCR collaborator client.

pub mod extract;
pub mod ocr;
pub mod validate;
pub mod verify;

pub use ocr::{OcrClient, OcrConfig};
pub use verify::{GstVerifier, VerificationResult, VerificationSource, VerifierConfig};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GstError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid GST number format: {0}")]
    InvalidFormat(String),

    #[error("No GST number could be extracted from the document")]
    Extraction,

    #[error("Verification API rate limit exceeded")]
    RateLimited,

    #[error("Verification API rejected the configured credentials")]
    UpstreamAuth,

    #[error("Verification API failure: {0}")]
    Upstream(String),

    #[error("OCR processing failed: {0}")]
    Ocr(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type GstResult<T> = Result<T, GstError>;
