use crate::transport::http::error::ApiError;
use crate::transport::http::types::AppState;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

pub const API_KEY_HEADER: &str = "x-api-key";

/// Guard for write and provider-backed routes: the `X-API-Key` header must match
/// the configured service key.
pub struct ServiceKey;

#[async_trait]
impl FromRequestParts<AppState> for ServiceKey {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let provided = parts
            .headers
            .get(API_KEY_HEADER)
            .ok_or(ApiError::MissingApiKey)?
            .to_str()
            .map_err(|_| ApiError::InvalidApiKey)?;

        if provided == &*state.service_key {
            Ok(ServiceKey)
        } else {
            Err(ApiError::InvalidApiKey)
        }
    }
}

/// MIME type for an uploaded image, defaulting to JPEG when the client sent none.
pub fn image_mime_type(content_type: Option<&str>) -> Result<String, ApiError> {
    match content_type.map(str::trim).filter(|c| !c.is_empty()) {
        None | Some("application/octet-stream") => Ok("image/jpeg".to_string()),
        Some(ct) if ct.starts_with("image/") => Ok(ct.to_string()),
        Some(ct) => Err(ApiError::BadRequest(format!(
            "Uploaded file must be an image (got content type {ct})"
        ))),
    }
}
