use axum::{routing::get, Json, Router};
use utoipa::OpenApi;

use crate::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "MRP Add-ons API",
        version = "0.1.0",
        description = r#"
# MRP Add-ons API

Manufacturing add-ons on top of products and bills of materials:

- **Tags**: a hierarchical tag tree with computed `Parent / Child` display names
- **Repairs**: repair orders linked to manufacturing orders, with window actions to navigate between them
- **Quality**: one quality-control trigger per stock picking type

## Actions

Navigation endpoints return window action descriptors
(`type = "ir.actions.act_window"`) instead of records. A client opens the
described form or list.

## Error Handling

```json
{
  "error": "Bad Request",
  "message": "Recursive hierarchy: 1 cannot be placed under 3",
  "timestamp": "2025-03-01T00:00:00Z"
}
```
        "#
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "products", description = "Product master data"),
        (name = "boms", description = "Bills of materials"),
        (name = "tags", description = "Manufacturing tag hierarchy"),
        (name = "productions", description = "Manufacturing orders"),
        (name = "repairs", description = "Repair orders"),
        (name = "quality", description = "Picking types and quality triggers")
    ),
    paths(
        crate::handlers::health::health_check,

        crate::handlers::products::create_product,
        crate::handlers::products::get_product,
        crate::handlers::products::create_bom,
        crate::handlers::products::get_bom,

        crate::handlers::tags::list_tags,
        crate::handlers::tags::create_tag,
        crate::handlers::tags::get_tag,
        crate::handlers::tags::update_tag,
        crate::handlers::tags::delete_tag,
        crate::handlers::tags::search_tags,
        crate::handlers::tags::child_tags,

        crate::handlers::productions::create_production,
        crate::handlers::productions::get_production,
        crate::handlers::productions::set_repair,
        crate::handlers::productions::get_tags,
        crate::handlers::productions::set_tags,
        crate::handlers::productions::action_create_repair_order,
        crate::handlers::productions::action_view_repair_orders,

        crate::handlers::repairs::create_repair,
        crate::handlers::repairs::get_repair,
        crate::handlers::repairs::link_productions,
        crate::handlers::repairs::unlink_production,
        crate::handlers::repairs::action_view_manufacturing_orders,

        crate::handlers::quality::list_picking_types,
        crate::handlers::quality::create_picking_type,
        crate::handlers::quality::update_picking_type,
        crate::handlers::quality::list_triggers,
        crate::handlers::quality::install,
    ),
    components(
        schemas(
            crate::handlers::health::HealthStatus,

            crate::services::products::CreateProduct,
            crate::services::products::CreateBom,
            crate::services::products::BomLineInput,
            crate::services::products::BomView,
            crate::services::products::BomLineView,

            crate::services::tags::CreateTag,
            crate::services::tags::UpdateTag,
            crate::services::tags::TagView,
            crate::services::tags::SearchOperator,

            crate::services::productions::CreateProduction,
            crate::services::productions::ProductionView,
            crate::handlers::productions::SetRepairRequest,
            crate::handlers::productions::SetTagsRequest,

            crate::services::repairs::CreateRepair,
            crate::services::repairs::LinkProductions,
            crate::services::repairs::RepairView,

            crate::services::picking_types::CreatePickingType,
            crate::services::picking_types::UpdatePickingType,
            crate::services::picking_types::PickingTypeView,
            crate::services::quality::InstallReport,

            crate::actions::ActionDescriptor,
            crate::actions::ActionTarget,

            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDocV1;

/// Serves the generated document at `/api-docs/openapi.json`
pub fn openapi_routes() -> Router<AppState> {
    Router::new().route(
        "/api-docs/openapi.json",
        get(|| async { Json(ApiDocV1::openapi()) }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_navigation_actions() {
        let json = serde_json::to_string(&ApiDocV1::openapi()).unwrap();
        assert!(json.contains("MRP Add-ons API"));
        assert!(json.contains("/api/v1/productions/{id}/actions/create-repair-order"));
        assert!(json.contains("/api/v1/repairs/{id}/actions/view-manufacturing-orders"));
        assert!(json.contains("ActionDescriptor"));
    }
}
