use super::common::{
    created_response, map_service_error, no_content_response, success_response, validate_input,
};
use crate::{
    errors::ApiError,
    handlers::AppState,
    services::tags::{CreateTag, SearchOperator, TagView, UpdateTag},
};
use axum::{
    extract::{Json, Path, Query, State},
    response::IntoResponse,
    routing::get,
    Router,
};
use serde::Deserialize;
use tracing::info;
use utoipa::IntoParams;

/// Creates the router for tag endpoints
pub fn tag_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_tags).post(create_tag))
        .route("/search", get(search_tags))
        .route("/:id", get(get_tag).put(update_tag).delete(delete_tag))
        .route("/:id/children", get(child_tags))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct TagSearchParams {
    /// `eq`, `not_eq`, `like` or `ilike` (`=` and `!=` are accepted too)
    #[serde(default = "default_operator")]
    #[param(value_type = String)]
    pub operator: SearchOperator,
    pub value: String,
}

fn default_operator() -> SearchOperator {
    SearchOperator::Ilike
}

#[utoipa::path(
    get,
    path = "/api/v1/tags",
    responses(
        (status = 200, description = "All tags with their display names", body = [TagView])
    ),
    tag = "tags"
)]
pub async fn list_tags(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let tags = state
        .services
        .tags
        .list_tags()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(tags))
}

#[utoipa::path(
    post,
    path = "/api/v1/tags",
    request_body = CreateTag,
    responses(
        (status = 201, description = "Tag created", body = TagView),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Parent tag not found", body = crate::errors::ErrorResponse)
    ),
    tag = "tags"
)]
pub async fn create_tag(
    State(state): State<AppState>,
    Json(payload): Json<CreateTag>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let tag = state
        .services
        .tags
        .create_tag(payload)
        .await
        .map_err(map_service_error)?;

    info!("Tag created: {}", tag.display_name);
    Ok(created_response(tag))
}

#[utoipa::path(
    get,
    path = "/api/v1/tags/{id}",
    params(("id" = i32, Path, description = "Tag id")),
    responses(
        (status = 200, description = "Tag found", body = TagView),
        (status = 404, description = "Tag not found", body = crate::errors::ErrorResponse)
    ),
    tag = "tags"
)]
pub async fn get_tag(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let tag = state
        .services
        .tags
        .get_tag(id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(tag))
}

#[utoipa::path(
    put,
    path = "/api/v1/tags/{id}",
    params(("id" = i32, Path, description = "Tag id")),
    request_body = UpdateTag,
    responses(
        (status = 200, description = "Tag updated", body = TagView),
        (status = 400, description = "Recursive hierarchy or invalid name", body = crate::errors::ErrorResponse),
        (status = 404, description = "Tag not found", body = crate::errors::ErrorResponse)
    ),
    tag = "tags"
)]
pub async fn update_tag(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateTag>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let tag = state
        .services
        .tags
        .update_tag(id, payload)
        .await
        .map_err(map_service_error)?;

    info!("Tag updated: {}", id);
    Ok(success_response(tag))
}

#[utoipa::path(
    delete,
    path = "/api/v1/tags/{id}",
    params(("id" = i32, Path, description = "Tag id")),
    responses(
        (status = 204, description = "Tag deleted, children detached"),
        (status = 404, description = "Tag not found", body = crate::errors::ErrorResponse)
    ),
    tag = "tags"
)]
pub async fn delete_tag(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .tags
        .delete_tag(id)
        .await
        .map_err(map_service_error)?;

    info!("Tag deleted: {}", id);
    Ok(no_content_response())
}

#[utoipa::path(
    get,
    path = "/api/v1/tags/search",
    params(TagSearchParams),
    responses(
        (status = 200, description = "Tags whose display name matches", body = [TagView])
    ),
    tag = "tags"
)]
pub async fn search_tags(
    State(state): State<AppState>,
    Query(params): Query<TagSearchParams>,
) -> Result<impl IntoResponse, ApiError> {
    let tags = state
        .services
        .tags
        .search_tags(params.operator, &params.value)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(tags))
}

#[utoipa::path(
    get,
    path = "/api/v1/tags/{id}/children",
    params(("id" = i32, Path, description = "Parent tag id")),
    responses(
        (status = 200, description = "Direct children", body = [TagView]),
        (status = 404, description = "Tag not found", body = crate::errors::ErrorResponse)
    ),
    tag = "tags"
)]
pub async fn child_tags(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let tags = state
        .services
        .tags
        .child_tags(id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(tags))
}
