//! GST verification routes

use crate::auth::AuthUser;
use crate::db;
use crate::error::ApiError;
use crate::rbac::Capability;
use crate::AppState;
use axum::{
    extract::{FromRequest, Multipart, Path, Request, State},
    http::header::CONTENT_TYPE,
    Json,
};
use chrono::{DateTime, Utc};
use gst_core::{extract, validate, GstError, VerificationResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

const ALLOWED_DOCUMENT_TYPES: &[&str] = &["image/jpeg", "image/png", "application/pdf"];

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    pub gst_number: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GstData {
    pub gst_number: String,
    pub trade_name: String,
    pub legal_name: String,
    pub pan_number: String,
    pub address: String,
}

impl From<&VerificationResult> for GstData {
    fn from(result: &VerificationResult) -> Self {
        Self {
            gst_number: result.gst_number.clone(),
            trade_name: result.trade_name.clone(),
            legal_name: result.legal_name.clone(),
            pan_number: result.pan_number.clone(),
            address: result.address.clone(),
        }
    }
}

impl From<db::schema::GstRecord> for GstData {
    fn from(record: db::schema::GstRecord) -> Self {
        Self {
            gst_number: record.gst_number,
            trade_name: record.trade_name,
            legal_name: record.legal_name,
            pan_number: record.pan_number,
            address: record.address,
        }
    }
}

#[derive(Serialize)]
pub struct VerifyResponse {
    pub success: bool,
    pub data: GstData,
    pub message: String,
}

#[derive(Serialize)]
pub struct DetailsResponse {
    pub success: bool,
    pub data: GstData,
    pub source: String,
    #[serde(rename = "verifiedAt")]
    pub verified_at: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct TestResponse {
    pub success: bool,
    pub data: GstData,
    pub source: String,
    pub message: Option<String>,
}

pub async fn verify(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    request: Request,
) -> Result<Json<VerifyResponse>, ApiError> {
    if !auth.role.allows(Capability::VerifyGst) {
        return Err(ApiError::Forbidden);
    }

    let (gst_number, document) = read_verify_request(&state, request).await?;

    // Direct branch when a number was supplied; OCR branch otherwise
    let candidate = match (gst_number, document) {
        (Some(number), _) => number,
        (None, Some(bytes)) => {
            let text = state.ocr.detect_text(&bytes).await?;
            extract::extract(&text)
                .ok_or(GstError::Extraction)?
                .to_string()
        }
        (None, None) => {
            return Err(ApiError::BadRequest("GST number is required".to_string()));
        }
    };

    let candidate = validate::normalize(&candidate);
    if !validate::is_valid(&candidate) {
        return Err(GstError::InvalidFormat(candidate).into());
    }

    let result = state.verifier.verify(&candidate).await?;
    let record = db::upsert_record(&state.db, auth.user_id, &result).await?;

    tracing::info!(
        user_id = %auth.user_id,
        gst_number = %record.gst_number,
        source = result.source.as_str(),
        "GST verification stored"
    );

    Ok(Json(VerifyResponse {
        success: true,
        data: record.into(),
        message: result
            .message
            .unwrap_or_else(|| "GST number verified".to_string()),
    }))
}

/// Pull the candidate number and/or attached document out of a JSON or
/// multipart request body.
async fn read_verify_request(
    state: &Arc<AppState>,
    request: Request,
) -> Result<(Option<String>, Option<Vec<u8>>), ApiError> {
    let content_type = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if !content_type.starts_with("multipart/form-data") {
        let Json(body) = Json::<VerifyRequest>::from_request(request, state)
            .await
            .map_err(|_| ApiError::BadRequest("Malformed JSON body".to_string()))?;

        return Ok((body.gst_number.filter(|n| !n.trim().is_empty()), None));
    }

    let mut multipart = Multipart::from_request(request, state)
        .await
        .map_err(|_| ApiError::BadRequest("Malformed multipart body".to_string()))?;

    let mut gst_number = None;
    let mut document = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::BadRequest("Malformed multipart body".to_string()))?
    {
        match field.name() {
            Some("gstNumber") => {
                let value = field
                    .text()
                    .await
                    .map_err(|_| ApiError::BadRequest("Malformed multipart body".to_string()))?;
                if !value.trim().is_empty() {
                    gst_number = Some(value);
                }
            }
            Some("document") => {
                let declared = field.content_type().unwrap_or("").to_string();
                if !ALLOWED_DOCUMENT_TYPES.contains(&declared.as_str()) {
                    return Err(ApiError::BadRequest(
                        "Document must be a JPEG, PNG or PDF".to_string(),
                    ));
                }

                let bytes = field
                    .bytes()
                    .await
                    .map_err(|_| ApiError::BadRequest("Failed to read document".to_string()))?;
                if bytes.len() > state.config.max_upload_size {
                    return Err(ApiError::BadRequest(
                        "Document exceeds the 10MB limit".to_string(),
                    ));
                }

                document = Some(bytes.to_vec());
            }
            _ => {}
        }
    }

    Ok((gst_number, document))
}

pub async fn details(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<DetailsResponse>, ApiError> {
    // The token already scopes the request; this identity check is a
    // second enforcement layer
    let required = if auth.user_id == user_id {
        Capability::ViewOwnGst
    } else {
        Capability::ViewAnyGst
    };
    if !auth.role.allows(required) {
        return Err(ApiError::Forbidden);
    }

    let record = db::latest_for_user(&state.db, user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("No GST details found".to_string()))?;

    let source = record.source.clone();
    let verified_at = record.verified_at;

    Ok(Json(DetailsResponse {
        success: true,
        data: record.into(),
        source,
        verified_at,
    }))
}

/// Unauthenticated diagnostic: call the verification client directly
/// and echo the raw outcome.
pub async fn test_verify(
    State(state): State<Arc<AppState>>,
    Path(gst_number): Path<String>,
) -> Result<Json<TestResponse>, ApiError> {
    let candidate = validate::normalize(&gst_number);
    let result = state.verifier.verify(&candidate).await?;

    Ok(Json(TestResponse {
        success: true,
        data: GstData::from(&result),
        source: result.source.as_str().to_string(),
        message: result.message,
    }))
}
