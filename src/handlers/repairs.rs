use super::common::{created_response, map_service_error, success_response};
use crate::{
    actions::ActionDescriptor,
    errors::ApiError,
    handlers::AppState,
    services::repairs::{CreateRepair, LinkProductions, RepairView},
};
use axum::{
    extract::{Json, Path, State},
    response::IntoResponse,
    routing::{delete, get, post},
    Router,
};
use tracing::info;

/// Creates the router for repair order endpoints
pub fn repair_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_repair))
        .route("/:id", get(get_repair))
        .route("/:id/productions", post(link_productions))
        .route("/:id/productions/:production_id", delete(unlink_production))
        .route(
            "/:id/actions/view-manufacturing-orders",
            get(action_view_manufacturing_orders),
        )
}

#[utoipa::path(
    post,
    path = "/api/v1/repairs",
    request_body = CreateRepair,
    responses(
        (status = 201, description = "Repair order created", body = RepairView),
        (status = 400, description = "Invalid quantity", body = crate::errors::ErrorResponse),
        (status = 404, description = "Product or manufacturing order not found", body = crate::errors::ErrorResponse)
    ),
    tag = "repairs"
)]
pub async fn create_repair(
    State(state): State<AppState>,
    Json(payload): Json<CreateRepair>,
) -> Result<impl IntoResponse, ApiError> {
    let repair = state
        .services
        .repairs
        .create_repair(payload)
        .await
        .map_err(map_service_error)?;

    info!("Repair order created: {}", repair.name);
    Ok(created_response(repair))
}

#[utoipa::path(
    get,
    path = "/api/v1/repairs/{id}",
    params(("id" = i32, Path, description = "Repair order id")),
    responses(
        (status = 200, description = "Repair order with linked manufacturing orders", body = RepairView),
        (status = 404, description = "Repair order not found", body = crate::errors::ErrorResponse)
    ),
    tag = "repairs"
)]
pub async fn get_repair(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let repair = state
        .services
        .repairs
        .get_repair(id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(repair))
}

#[utoipa::path(
    post,
    path = "/api/v1/repairs/{id}/productions",
    params(("id" = i32, Path, description = "Repair order id")),
    request_body = LinkProductions,
    responses(
        (status = 200, description = "Manufacturing orders linked", body = RepairView),
        (status = 404, description = "Repair or manufacturing order not found", body = crate::errors::ErrorResponse)
    ),
    tag = "repairs"
)]
pub async fn link_productions(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<LinkProductions>,
) -> Result<impl IntoResponse, ApiError> {
    let repair = state
        .services
        .repairs
        .link_productions(id, payload.production_ids)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(repair))
}

#[utoipa::path(
    delete,
    path = "/api/v1/repairs/{id}/productions/{production_id}",
    params(
        ("id" = i32, Path, description = "Repair order id"),
        ("production_id" = i32, Path, description = "Manufacturing order id")
    ),
    responses(
        (status = 200, description = "Manufacturing order unlinked", body = RepairView),
        (status = 400, description = "Manufacturing order not linked to this repair", body = crate::errors::ErrorResponse),
        (status = 404, description = "Repair or manufacturing order not found", body = crate::errors::ErrorResponse)
    ),
    tag = "repairs"
)]
pub async fn unlink_production(
    State(state): State<AppState>,
    Path((id, production_id)): Path<(i32, i32)>,
) -> Result<impl IntoResponse, ApiError> {
    let repair = state
        .services
        .repairs
        .unlink_production(id, production_id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(repair))
}

#[utoipa::path(
    get,
    path = "/api/v1/repairs/{id}/actions/view-manufacturing-orders",
    params(("id" = i32, Path, description = "Repair order id")),
    responses(
        (status = 200, description = "Action opening the linked manufacturing orders", body = ActionDescriptor),
        (status = 404, description = "Repair order not found", body = crate::errors::ErrorResponse)
    ),
    tag = "repairs"
)]
pub async fn action_view_manufacturing_orders(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let action = state
        .services
        .repairs
        .action_view_repair_manufacturing_order(id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(action))
}
