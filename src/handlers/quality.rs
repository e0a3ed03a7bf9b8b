use super::common::{created_response, map_service_error, success_response, validate_input};
use crate::{
    errors::ApiError,
    handlers::AppState,
    ApiResponse,
    services::{
        picking_types::{CreatePickingType, PickingTypeView, UpdatePickingType},
        quality::InstallReport,
    },
};
use axum::{
    extract::{Json, Path, State},
    response::IntoResponse,
    routing::{get, post, put},
    Router,
};
use tracing::info;

pub fn picking_type_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_picking_types).post(create_picking_type))
        .route("/:id", put(update_picking_type))
}

pub fn quality_routes() -> Router<AppState> {
    Router::new()
        .route("/triggers", get(list_triggers))
        .route("/install", post(install))
}

#[utoipa::path(
    get,
    path = "/api/v1/picking-types",
    responses(
        (status = 200, description = "Picking types with their quality trigger", body = [PickingTypeView])
    ),
    tag = "quality"
)]
pub async fn list_picking_types(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let picking_types = state
        .services
        .picking_types
        .list_picking_types()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(picking_types))
}

#[utoipa::path(
    post,
    path = "/api/v1/picking-types",
    request_body = CreatePickingType,
    responses(
        (status = 201, description = "Picking type and its quality trigger created", body = PickingTypeView),
        (status = 400, description = "Invalid name or code", body = crate::errors::ErrorResponse)
    ),
    tag = "quality"
)]
pub async fn create_picking_type(
    State(state): State<AppState>,
    Json(payload): Json<CreatePickingType>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let picking_type = state
        .services
        .picking_types
        .create_picking_type(payload)
        .await
        .map_err(map_service_error)?;

    info!("Picking type created: {}", picking_type.id);
    Ok(created_response(picking_type))
}

#[utoipa::path(
    put,
    path = "/api/v1/picking-types/{id}",
    params(("id" = i32, Path, description = "Picking type id")),
    request_body = UpdatePickingType,
    responses(
        (status = 200, description = "Picking type updated", body = PickingTypeView),
        (status = 404, description = "Picking type not found", body = crate::errors::ErrorResponse)
    ),
    tag = "quality"
)]
pub async fn update_picking_type(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdatePickingType>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let picking_type = state
        .services
        .picking_types
        .update_picking_type(id, payload)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(picking_type))
}

#[utoipa::path(
    get,
    path = "/api/v1/quality/triggers",
    responses(
        (status = 200, description = "Quality triggers")
    ),
    tag = "quality"
)]
pub async fn list_triggers(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let triggers = state
        .services
        .quality
        .list_triggers()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(triggers))
}

#[utoipa::path(
    post,
    path = "/api/v1/quality/install",
    responses(
        (status = 200, description = "Triggers ensured for every active picking type", body = InstallReport),
        (status = 400, description = "Installation aborted and rolled back", body = crate::errors::ErrorResponse)
    ),
    tag = "quality"
)]
pub async fn install(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let report = state
        .services
        .quality
        .post_init_hook()
        .await
        .map_err(map_service_error)?;

    let message = format!(
        "{} quality trigger(s) created, {} already present",
        report.created, report.existing
    );
    Ok(Json(ApiResponse::success(report).with_message(message)))
}
