use super::common::{created_response, map_service_error, success_response};
use crate::{
    actions::ActionDescriptor,
    errors::ApiError,
    handlers::AppState,
    services::{
        productions::{CreateProduction, ProductionView},
        tags::TagView,
    },
};
use axum::{
    extract::{Json, Path, State},
    response::IntoResponse,
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use tracing::info;
use utoipa::ToSchema;

/// Creates the router for manufacturing order endpoints
pub fn production_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_production))
        .route("/:id", get(get_production))
        .route("/:id/repair", put(set_repair))
        .route("/:id/tags", get(get_tags).put(set_tags))
        .route(
            "/:id/actions/create-repair-order",
            post(action_create_repair_order),
        )
        .route(
            "/:id/actions/view-repair-orders",
            get(action_view_repair_orders),
        )
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetRepairRequest {
    /// `null` clears the link
    pub repair_id: Option<i32>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetTagsRequest {
    pub tag_ids: Vec<i32>,
}

#[utoipa::path(
    post,
    path = "/api/v1/productions",
    request_body = CreateProduction,
    responses(
        (status = 201, description = "Manufacturing order created", body = ProductionView),
        (status = 400, description = "Invalid quantity or BOM", body = crate::errors::ErrorResponse),
        (status = 404, description = "Referenced record not found", body = crate::errors::ErrorResponse)
    ),
    tag = "productions"
)]
pub async fn create_production(
    State(state): State<AppState>,
    Json(payload): Json<CreateProduction>,
) -> Result<impl IntoResponse, ApiError> {
    let production = state
        .services
        .productions
        .create_production(payload)
        .await
        .map_err(map_service_error)?;

    info!("Manufacturing order created: {}", production.name);
    Ok(created_response(production))
}

#[utoipa::path(
    get,
    path = "/api/v1/productions/{id}",
    params(("id" = i32, Path, description = "Manufacturing order id")),
    responses(
        (status = 200, description = "Manufacturing order found", body = ProductionView),
        (status = 404, description = "Manufacturing order not found", body = crate::errors::ErrorResponse)
    ),
    tag = "productions"
)]
pub async fn get_production(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let production = state
        .services
        .productions
        .get_production(id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(production))
}

#[utoipa::path(
    put,
    path = "/api/v1/productions/{id}/repair",
    params(("id" = i32, Path, description = "Manufacturing order id")),
    request_body = SetRepairRequest,
    responses(
        (status = 200, description = "Repair link updated", body = ProductionView),
        (status = 404, description = "Manufacturing or repair order not found", body = crate::errors::ErrorResponse)
    ),
    tag = "productions"
)]
pub async fn set_repair(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<SetRepairRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let production = state
        .services
        .productions
        .set_repair(id, payload.repair_id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(production))
}

#[utoipa::path(
    get,
    path = "/api/v1/productions/{id}/tags",
    params(("id" = i32, Path, description = "Manufacturing order id")),
    responses(
        (status = 200, description = "Tags on the order", body = [TagView]),
        (status = 404, description = "Manufacturing order not found", body = crate::errors::ErrorResponse)
    ),
    tag = "productions"
)]
pub async fn get_tags(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let tags = state
        .services
        .productions
        .production_tags(id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(tags))
}

#[utoipa::path(
    put,
    path = "/api/v1/productions/{id}/tags",
    params(("id" = i32, Path, description = "Manufacturing order id")),
    request_body = SetTagsRequest,
    responses(
        (status = 200, description = "Tags replaced", body = [TagView]),
        (status = 404, description = "Order or tag not found", body = crate::errors::ErrorResponse)
    ),
    tag = "productions"
)]
pub async fn set_tags(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<SetTagsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let tags = state
        .services
        .productions
        .set_tags(id, payload.tag_ids)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(tags))
}

#[utoipa::path(
    post,
    path = "/api/v1/productions/{id}/actions/create-repair-order",
    params(("id" = i32, Path, description = "Manufacturing order id")),
    responses(
        (status = 200, description = "Repair order form action", body = ActionDescriptor),
        (status = 404, description = "Manufacturing order not found", body = crate::errors::ErrorResponse)
    ),
    tag = "productions"
)]
pub async fn action_create_repair_order(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let action = state
        .services
        .productions
        .action_create_repair_order(id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(action))
}

#[utoipa::path(
    get,
    path = "/api/v1/productions/{id}/actions/view-repair-orders",
    params(("id" = i32, Path, description = "Manufacturing order id")),
    responses(
        (status = 200, description = "Action opening the linked repair order", body = ActionDescriptor),
        (status = 404, description = "Manufacturing order not found", body = crate::errors::ErrorResponse)
    ),
    tag = "productions"
)]
pub async fn action_view_repair_orders(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let action = state
        .services
        .productions
        .action_view_mrp_production_repair_orders(id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(action))
}
