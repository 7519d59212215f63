//! Provider-backed advisory endpoints. These never fail because of the provider:
//! the service layer substitutes degraded payloads.

use crate::domain::advisory::{ChatAnswer, PriceQuote, QualityReport};
use crate::infra::gemini::InlineImage;
use crate::transport::http::error::ApiError;
use crate::transport::http::handlers::common::{image_mime_type, ServiceKey};
use crate::transport::http::types::{
    ApiResponse, AppState, ChatRequest, MarketTrendRequest, MarketTrendResponse, MatchRequest,
    MatchResponse, PriceRequest, QualityCheckRequest, QualityImageForm, TranslateRequest,
    TranslateResponse,
};
use axum::extract::rejection::JsonRejection;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::Json;
use tracing::info;

#[utoipa::path(
    post,
    path = "/chatbot",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Assistant answer (degraded text if the provider is unavailable)", body = ChatAnswer),
        (status = 401, description = "Missing X-API-Key", body = ApiResponse),
        (status = 403, description = "Invalid X-API-Key", body = ApiResponse),
        (status = 422, description = "Invalid JSON body", body = ApiResponse)
    ),
    security(("api_key" = []))
)]
pub async fn chatbot_handler(
    _key: ServiceKey,
    State(state): State<AppState>,
    request: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatAnswer>, ApiError> {
    let Json(request) = request?;
    info!(query_len = request.query.len(), "Chat request");
    let answer = state
        .ai
        .chat(&request.query, request.context.as_deref())
        .await;
    Ok(Json(answer))
}

#[utoipa::path(
    post,
    path = "/translate",
    request_body = TranslateRequest,
    responses(
        (status = 200, description = "Translated text", body = TranslateResponse),
        (status = 401, description = "Missing X-API-Key", body = ApiResponse),
        (status = 403, description = "Invalid X-API-Key", body = ApiResponse),
        (status = 422, description = "Invalid JSON body", body = ApiResponse)
    ),
    security(("api_key" = []))
)]
pub async fn translate_handler(
    _key: ServiceKey,
    State(state): State<AppState>,
    request: Result<Json<TranslateRequest>, JsonRejection>,
) -> Result<Json<TranslateResponse>, ApiError> {
    let Json(request) = request?;
    info!(
        source = %request.source_language,
        target = %request.target_language,
        "Translate request"
    );
    let translated_text = state
        .ai
        .translate(&request.text, &request.target_language)
        .await;
    Ok(Json(TranslateResponse {
        translated_text,
        original_text: request.text,
        language: request.target_language,
    }))
}

#[utoipa::path(
    post,
    path = "/price-gemini",
    request_body = PriceRequest,
    responses(
        (status = 200, description = "Market and recommended price per quintal (zeros if unavailable)", body = PriceQuote),
        (status = 401, description = "Missing X-API-Key", body = ApiResponse),
        (status = 403, description = "Invalid X-API-Key", body = ApiResponse),
        (status = 422, description = "Invalid JSON body", body = ApiResponse)
    ),
    security(("api_key" = []))
)]
pub async fn price_handler(
    _key: ServiceKey,
    State(state): State<AppState>,
    request: Result<Json<PriceRequest>, JsonRejection>,
) -> Result<Json<PriceQuote>, ApiError> {
    let Json(request) = request?;
    let quote = state
        .ai
        .market_price(&request.millet_type, &request.quality_grade, &request.location)
        .await;
    Ok(Json(quote))
}

#[utoipa::path(
    post,
    path = "/match",
    request_body = MatchRequest,
    responses(
        (status = 200, description = "Ranked counterpart profiles", body = MatchResponse),
        (status = 401, description = "Missing X-API-Key", body = ApiResponse),
        (status = 403, description = "Invalid X-API-Key", body = ApiResponse),
        (status = 422, description = "Invalid JSON body", body = ApiResponse)
    ),
    security(("api_key" = []))
)]
pub async fn match_handler(
    _key: ServiceKey,
    State(state): State<AppState>,
    request: Result<Json<MatchRequest>, JsonRejection>,
) -> Result<Json<MatchResponse>, ApiError> {
    let Json(request) = request?;
    let matches = state
        .ai
        .match_users(
            &request.user_type,
            &request.millet_type,
            request.quantity,
            &request.location,
        )
        .await;
    Ok(Json(MatchResponse { matches }))
}

#[utoipa::path(
    post,
    path = "/quality-check",
    request_body = QualityCheckRequest,
    responses(
        (status = 200, description = "Quality assessment from a text description", body = QualityReport),
        (status = 401, description = "Missing X-API-Key", body = ApiResponse),
        (status = 403, description = "Invalid X-API-Key", body = ApiResponse),
        (status = 422, description = "Invalid JSON body", body = ApiResponse)
    ),
    security(("api_key" = []))
)]
pub async fn quality_check_handler(
    _key: ServiceKey,
    State(state): State<AppState>,
    request: Result<Json<QualityCheckRequest>, JsonRejection>,
) -> Result<Json<QualityReport>, ApiError> {
    let Json(request) = request?;
    let report = state
        .ai
        .analyze_quality(
            &request.millet_type,
            &request.description,
            request.impurities.as_deref(),
        )
        .await;
    Ok(Json(report))
}

#[utoipa::path(
    post,
    path = "/quality-check-image",
    request_body(content = QualityImageForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Quality assessment from an image", body = QualityReport),
        (status = 400, description = "Missing form field or non-image upload", body = ApiResponse),
        (status = 401, description = "Missing X-API-Key", body = ApiResponse),
        (status = 403, description = "Invalid X-API-Key", body = ApiResponse),
        (status = 422, description = "Malformed multipart body", body = ApiResponse)
    ),
    security(("api_key" = []))
)]
pub async fn quality_check_image_handler(
    _key: ServiceKey,
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<QualityReport>, ApiError> {
    let mut multipart = multipart?;
    let mut millet_type: Option<String> = None;
    let mut image: Option<InlineImage> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("milletType") => millet_type = Some(field.text().await?),
            Some("image") => {
                let mime_type = image_mime_type(field.content_type())?;
                let data = field.bytes().await?.to_vec();
                image = Some(InlineImage { mime_type, data });
            }
            _ => {}
        }
    }

    let millet_type = millet_type
        .filter(|m| !m.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("Missing form field 'milletType'".to_string()))?;
    let image = image
        .filter(|i| !i.data.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Missing form field 'image'".to_string()))?;

    info!(millet_type = %millet_type, bytes = image.data.len(), "Image quality request");
    let report = state.ai.analyze_quality_image(&millet_type, image).await;
    Ok(Json(report))
}

#[utoipa::path(
    post,
    path = "/market-trends",
    request_body = MarketTrendRequest,
    responses(
        (status = 200, description = "Recent mandi prices (empty if unavailable)", body = MarketTrendResponse),
        (status = 401, description = "Missing X-API-Key", body = ApiResponse),
        (status = 403, description = "Invalid X-API-Key", body = ApiResponse),
        (status = 422, description = "Invalid JSON body", body = ApiResponse)
    ),
    security(("api_key" = []))
)]
pub async fn market_trends_handler(
    _key: ServiceKey,
    State(state): State<AppState>,
    request: Result<Json<MarketTrendRequest>, JsonRejection>,
) -> Result<Json<MarketTrendResponse>, ApiError> {
    let Json(request) = request?;
    let trends = state.ai.market_trends(&request.millet_type).await;
    Ok(Json(MarketTrendResponse { trends }))
}
