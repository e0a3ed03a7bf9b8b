//! MRP Add-ons Library
//!
//! Manufacturing add-ons served over HTTP: a hierarchical tag tree,
//! repair order / manufacturing order cross-links with navigation actions,
//! and quality-control triggers for stock picking types.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod actions;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod hierarchy;
pub mod migrator;
pub mod openapi;
pub mod services;

use axum::Router;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use utoipa::ToSchema;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub services: handlers::AppServices,
}

impl AppState {
    pub fn new(db: Arc<DatabaseConnection>, config: config::AppConfig) -> Self {
        let services = handlers::AppServices::new(db.clone());
        Self {
            db,
            config,
            services,
        }
    }
}

// Common response wrappers
#[derive(Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Routes mounted under `/api/v1`
pub fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .nest("/products", handlers::products::product_routes())
        .nest("/boms", handlers::products::bom_routes())
        .nest("/tags", handlers::tags::tag_routes())
        .nest("/productions", handlers::productions::production_routes())
        .nest("/repairs", handlers::repairs::repair_routes())
        .nest("/picking-types", handlers::quality::picking_type_routes())
        .nest("/quality", handlers::quality::quality_routes())
}

/// Full application router: health, OpenAPI document and the v1 API
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(handlers::health::health_routes())
        .merge(openapi::openapi_routes())
        .nest("/api/v1", api_v1_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod response_tests {
    use super::*;

    #[test]
    fn success_response_omits_empty_message() {
        let json = serde_json::to_value(ApiResponse::success(3)).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"], 3);
        assert!(json.get("message").is_none());
    }

    #[test]
    fn message_is_serialized_when_set() {
        let json =
            serde_json::to_value(ApiResponse::success(()).with_message("Triggers installed"))
                .unwrap();
        assert_eq!(json["message"], "Triggers installed");
    }
}
