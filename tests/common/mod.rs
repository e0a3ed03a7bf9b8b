#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use sea_orm::DatabaseConnection;
use serde_json::Value;
use tower::ServiceExt;

use mrp_addons::{
    build_router,
    config::AppConfig,
    db::{self, DbConfig},
    entities::product,
    services::products::{BomLineInput, BomView, CreateBom, CreateProduct},
    AppState,
};

/// Helper harness for spinning up an application state backed by an in-memory SQLite database.
pub struct TestApp {
    router: Router,
    pub state: AppState,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        // A single connection keeps the in-memory database alive and shared.
        let db_cfg = DbConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            connect_timeout: Duration::from_secs(5),
            acquire_timeout: Duration::from_secs(5),
            sqlx_logging: false,
            ..Default::default()
        };

        let pool = db::establish_connection_with_config(&db_cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let cfg = AppConfig::new(
            db_cfg.url.clone(),
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );
        let state = AppState::new(Arc::new(pool), cfg);
        let router = build_router(state.clone());

        Self { router, state }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.state.db
    }

    /// Send a request against the router.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(uri);

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    /// Sends a request and decodes the JSON response body.
    pub async fn request_json(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let response = self.request(method, uri, body).await;
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("failed to read response body");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("response body is not json")
        };
        (status, json)
    }

    pub async fn seed_product(&self, name: &str) -> product::Model {
        self.state
            .services
            .products
            .create_product(CreateProduct {
                name: name.to_string(),
                default_code: None,
                tracking: Some(product::TRACKING_NONE.to_string()),
            })
            .await
            .expect("seed product for tests")
    }

    /// Product with a one-component normal BOM, as a manufacturing order needs.
    pub async fn seed_product_with_bom(&self) -> (product::Model, BomView) {
        let finished = self.seed_product("Test Product").await;
        let component = self.seed_product("Test Component").await;

        let bom = self
            .state
            .services
            .boms
            .create_bom(CreateBom {
                product_id: finished.id,
                product_qty: Some(1.0),
                bom_type: None,
                lines: vec![BomLineInput {
                    product_id: component.id,
                    product_qty: 1.0,
                }],
            })
            .await
            .expect("seed bom for tests");

        (finished, bom)
    }
}
