use super::common::{created_response, map_service_error, success_response};
use crate::{
    entities::product,
    errors::ApiError,
    handlers::AppState,
    services::products::{BomView, CreateBom, CreateProduct},
};
use axum::{
    extract::{Json, Path, State},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use tracing::info;

pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_product))
        .route("/:id", get(get_product))
}

/// Creates the router for BOM endpoints
pub fn bom_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_bom))
        .route("/:id", get(get_bom))
}

#[utoipa::path(
    post,
    path = "/api/v1/products",
    request_body = CreateProduct,
    responses(
        (status = 201, description = "Product created"),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    tag = "products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<CreateProduct>,
) -> Result<impl IntoResponse, ApiError> {
    let product: product::Model = state
        .services
        .products
        .create_product(payload)
        .await
        .map_err(map_service_error)?;

    info!("Product created: {}", product.id);
    Ok(created_response(product))
}

#[utoipa::path(
    get,
    path = "/api/v1/products/{id}",
    params(("id" = i32, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product found"),
        (status = 404, description = "Product not found", body = crate::errors::ErrorResponse)
    ),
    tag = "products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let product = state
        .services
        .products
        .get_product(id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(product))
}

#[utoipa::path(
    post,
    path = "/api/v1/boms",
    request_body = CreateBom,
    responses(
        (status = 201, description = "BOM created", body = BomView),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Product not found", body = crate::errors::ErrorResponse)
    ),
    tag = "boms"
)]
pub async fn create_bom(
    State(state): State<AppState>,
    Json(payload): Json<CreateBom>,
) -> Result<impl IntoResponse, ApiError> {
    let bom = state
        .services
        .boms
        .create_bom(payload)
        .await
        .map_err(map_service_error)?;

    info!("BOM created: {}", bom.id);
    Ok(created_response(bom))
}

#[utoipa::path(
    get,
    path = "/api/v1/boms/{id}",
    params(("id" = i32, Path, description = "BOM id")),
    responses(
        (status = 200, description = "BOM with its lines", body = BomView),
        (status = 404, description = "BOM not found", body = crate::errors::ErrorResponse)
    ),
    tag = "boms"
)]
pub async fn get_bom(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let bom = state
        .services
        .boms
        .get_bom(id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(bom))
}
