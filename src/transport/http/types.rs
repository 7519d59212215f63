use crate::app::ai_service::AiService;
use crate::domain::advisory::TrendPoint;
use crate::domain::matching::MatchProfile;
use crate::storage::catalog::CatalogStore;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

#[derive(Clone)]
pub struct AppState {
    pub ai: Arc<AiService>,
    pub catalog: CatalogStore,
    /// Expected value of the `X-API-Key` header.
    pub service_key: Arc<str>,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub data: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct ChatRequest {
    pub query: String,
    #[serde(default)]
    pub context: Option<String>,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct TranslateRequest {
    pub text: String,
    /// Target language code or name, e.g. `hi`, `bn`, `en`.
    pub target_language: String,
    #[serde(default = "default_source_language")]
    pub source_language: String,
}

fn default_source_language() -> String {
    "auto".to_string()
}

#[derive(Serialize, Debug, ToSchema)]
pub struct TranslateResponse {
    pub translated_text: String,
    pub original_text: String,
    pub language: String,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct PriceRequest {
    pub millet_type: String,
    /// A (premium), B (standard) or C (fair).
    pub quality_grade: String,
    #[serde(default = "default_location")]
    pub location: String,
}

fn default_location() -> String {
    "India".to_string()
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct MatchRequest {
    /// `farmer` or `buyer`.
    pub user_type: String,
    pub millet_type: String,
    pub quantity: f64,
    pub location: String,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct MatchResponse {
    pub matches: Vec<MatchProfile>,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct QualityCheckRequest {
    pub millet_type: String,
    pub description: String,
    #[serde(default)]
    pub impurities: Option<String>,
}

/// Multipart form accepted by `/quality-check-image` (documentation only).
#[derive(Deserialize, Debug, ToSchema)]
#[allow(dead_code)]
pub struct QualityImageForm {
    #[serde(rename = "milletType")]
    pub millet_type: String,
    #[schema(value_type = String, format = Binary)]
    pub image: Vec<u8>,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct MarketTrendRequest {
    pub millet_type: String,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct MarketTrendResponse {
    pub trends: Vec<TrendPoint>,
}

#[derive(Deserialize, Debug, IntoParams)]
pub struct ProductListQuery {
    /// Only return listings owned by this seller.
    pub seller_id: Option<String>,
}
