use crate::domain::product::{NewProduct, Product, ProductPatch};
use crate::transport::http::error::ApiError;
use crate::transport::http::handlers::common::ServiceKey;
use crate::transport::http::types::{ApiResponse, AppState, MessageResponse, ProductListQuery};
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::Json;
use tracing::info;

#[utoipa::path(
    get,
    path = "/products",
    params(ProductListQuery),
    responses(
        (status = 200, description = "Listings, newest first", body = Vec<Product>),
        (status = 500, description = "Storage failure", body = ApiResponse)
    )
)]
pub async fn list_products_handler(
    State(state): State<AppState>,
    query: Result<Query<ProductListQuery>, QueryRejection>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let Query(query) = query?;
    let seller = query.seller_id.as_deref().filter(|s| !s.is_empty());
    let products = state.catalog.list(seller).await?;
    Ok(Json(products))
}

#[utoipa::path(
    get,
    path = "/products/{id}",
    params(("id" = i64, Path, description = "Product id")),
    responses(
        (status = 200, description = "The listing", body = Product),
        (status = 400, description = "Product id is not a number", body = ApiResponse),
        (status = 404, description = "Product not found", body = ApiResponse)
    )
)]
pub async fn get_product_handler(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Product>, ApiError> {
    let Path(id) = id?;
    state
        .catalog
        .get(id)
        .await?
        .map(Json)
        .ok_or(ApiError::ProductNotFound)
}

#[utoipa::path(
    post,
    path = "/products",
    request_body = NewProduct,
    responses(
        (status = 200, description = "Created listing as persisted", body = Product),
        (status = 401, description = "Missing X-API-Key", body = ApiResponse),
        (status = 403, description = "Invalid X-API-Key", body = ApiResponse),
        (status = 422, description = "Invalid body", body = ApiResponse)
    ),
    security(("api_key" = []))
)]
pub async fn create_product_handler(
    _key: ServiceKey,
    State(state): State<AppState>,
    request: Result<Json<NewProduct>, JsonRejection>,
) -> Result<Json<Product>, ApiError> {
    let Json(product) = request?;
    product.validate().map_err(ApiError::Validation)?;

    let created = state.catalog.create(&product).await?;
    info!(id = created.id, seller_id = %created.seller_id, "Product listed");
    Ok(Json(created))
}

#[utoipa::path(
    put,
    path = "/products/{id}",
    params(("id" = i64, Path, description = "Product id")),
    request_body = ProductPatch,
    responses(
        (status = 200, description = "Listing after the update", body = Product),
        (status = 401, description = "Missing X-API-Key", body = ApiResponse),
        (status = 403, description = "Invalid X-API-Key", body = ApiResponse),
        (status = 404, description = "Product not found", body = ApiResponse),
        (status = 422, description = "Invalid body", body = ApiResponse)
    ),
    security(("api_key" = []))
)]
pub async fn update_product_handler(
    _key: ServiceKey,
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    request: Result<Json<ProductPatch>, JsonRejection>,
) -> Result<Json<Product>, ApiError> {
    let Path(id) = id?;
    let Json(patch) = request?;
    patch.validate().map_err(ApiError::Validation)?;
    state
        .catalog
        .update(id, &patch)
        .await?
        .map(Json)
        .ok_or(ApiError::ProductNotFound)
}

#[utoipa::path(
    delete,
    path = "/products/{id}",
    params(("id" = i64, Path, description = "Product id")),
    responses(
        (status = 200, description = "Listing removed", body = MessageResponse),
        (status = 401, description = "Missing X-API-Key", body = ApiResponse),
        (status = 403, description = "Invalid X-API-Key", body = ApiResponse),
        (status = 404, description = "Product not found", body = ApiResponse)
    ),
    security(("api_key" = []))
)]
pub async fn delete_product_handler(
    _key: ServiceKey,
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Path(id) = id?;
    if !state.catalog.delete(id).await? {
        return Err(ApiError::ProductNotFound);
    }
    info!(id, "Product removed");
    Ok(Json(MessageResponse {
        message: "Product deleted successfully".to_string(),
    }))
}
