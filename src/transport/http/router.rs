use crate::domain::advisory::{ChatAnswer, PriceQuote, QualityReport, TrendPoint};
use crate::domain::matching::MatchProfile;
use crate::domain::product::{NewProduct, Product, ProductPatch};
use crate::transport::http::handlers::{ai, health, products};
use crate::transport::http::types::{
    ApiResponse, AppState, ChatRequest, MarketTrendRequest, MarketTrendResponse, MatchRequest,
    MatchResponse, MessageResponse, PriceRequest, QualityCheckRequest, QualityImageForm,
    TranslateRequest, TranslateResponse,
};
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Upper bound for `/quality-check-image` uploads.
pub const IMAGE_UPLOAD_LIMIT: usize = 10 * 1024 * 1024;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::root_handler,
        health::healthcheck_handler,
        ai::chatbot_handler,
        ai::translate_handler,
        ai::price_handler,
        ai::match_handler,
        ai::quality_check_handler,
        ai::quality_check_image_handler,
        ai::market_trends_handler,
        products::list_products_handler,
        products::get_product_handler,
        products::create_product_handler,
        products::update_product_handler,
        products::delete_product_handler
    ),
    components(schemas(
        ApiResponse,
        MessageResponse,
        ChatRequest,
        ChatAnswer,
        TranslateRequest,
        TranslateResponse,
        PriceRequest,
        PriceQuote,
        MatchRequest,
        MatchResponse,
        MatchProfile,
        QualityCheckRequest,
        QualityImageForm,
        QualityReport,
        MarketTrendRequest,
        MarketTrendResponse,
        TrendPoint,
        Product,
        NewProduct,
        ProductPatch
    )),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "api_key",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("X-API-Key"))),
            );
        }
    }
}

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::healthcheck_handler))
        .route("/chatbot", post(ai::chatbot_handler))
        .route("/translate", post(ai::translate_handler))
        .route("/price-gemini", post(ai::price_handler))
        .route("/match", post(ai::match_handler))
        .route("/quality-check", post(ai::quality_check_handler))
        .route(
            "/quality-check-image",
            post(ai::quality_check_image_handler).layer(DefaultBodyLimit::max(IMAGE_UPLOAD_LIMIT)),
        )
        .route("/market-trends", post(ai::market_trends_handler))
        .route(
            "/products",
            get(products::list_products_handler).post(products::create_product_handler),
        )
        .route(
            "/products/:id",
            get(products::get_product_handler)
                .put(products::update_product_handler)
                .delete(products::delete_product_handler),
        )
        .with_state(app_state)
}
