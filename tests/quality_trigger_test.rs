mod common;

use assert_matches::assert_matches;
use common::TestApp;
use mrp_addons::{
    entities::stock_picking_type,
    errors::ServiceError,
    services::picking_types::{CreatePickingType, UpdatePickingType},
};
use sea_orm::{ActiveModelTrait, ActiveValue::Set};

/// Inserts a picking type the way pre-existing data looks: no trigger yet.
async fn insert_picking_type(app: &TestApp, name: &str, active: bool) -> stock_picking_type::Model {
    stock_picking_type::ActiveModel {
        name: Set(name.to_string()),
        code: Set(stock_picking_type::CODE_INCOMING.to_string()),
        active: Set(active),
        ..Default::default()
    }
    .insert(app.db())
    .await
    .expect("insert picking type")
}

#[tokio::test]
async fn install_creates_one_trigger_per_active_picking_type() {
    let app = TestApp::new().await;
    let receipts = insert_picking_type(&app, "Receipts", true).await;
    let deliveries = insert_picking_type(&app, "Delivery Orders", true).await;
    insert_picking_type(&app, "Archived", false).await;

    let report = app.state.services.quality.post_init_hook().await.unwrap();
    assert_eq!(report.picking_types, 2);
    assert_eq!(report.created, 2);
    assert_eq!(report.existing, 0);

    let triggers = app.state.services.quality.list_triggers().await.unwrap();
    assert_eq!(triggers.len(), 2);
    assert_eq!(triggers[0].name, "Receipts");
    assert_eq!(triggers[0].picking_type_id, receipts.id);
    assert!(triggers[0].partner_selectable);
    assert_eq!(triggers[1].name, "Delivery Orders");
    assert_eq!(triggers[1].picking_type_id, deliveries.id);
}

#[tokio::test]
async fn install_is_idempotent() {
    let app = TestApp::new().await;
    insert_picking_type(&app, "Receipts", true).await;

    app.state.services.quality.post_init_hook().await.unwrap();
    let rerun = app.state.services.quality.post_init_hook().await.unwrap();

    assert_eq!(rerun.created, 0);
    assert_eq!(rerun.existing, 1);
    assert_eq!(app.state.services.quality.list_triggers().await.unwrap().len(), 1);
}

#[tokio::test]
async fn failed_install_leaves_no_partial_configuration() {
    let app = TestApp::new().await;
    insert_picking_type(&app, "Receipts", true).await;
    insert_picking_type(&app, "", true).await;

    let result = app.state.services.quality.post_init_hook().await;
    assert_matches!(result, Err(ServiceError::InvalidInput(_)));

    let triggers = app.state.services.quality.list_triggers().await.unwrap();
    assert!(triggers.is_empty());
}

#[tokio::test]
async fn new_picking_types_get_a_trigger() {
    let app = TestApp::new().await;

    let picking_type = app
        .state
        .services
        .picking_types
        .create_picking_type(CreatePickingType {
            name: "Internal Transfers".to_string(),
            code: stock_picking_type::CODE_INTERNAL.to_string(),
            active: None,
        })
        .await
        .unwrap();
    assert!(picking_type.active);
    assert!(picking_type.qc_trigger_id.is_some());

    let report = app.state.services.quality.post_init_hook().await.unwrap();
    assert_eq!(report.created, 0);
    assert_eq!(report.existing, 1);
}

#[tokio::test]
async fn renaming_a_picking_type_renames_its_trigger() {
    let app = TestApp::new().await;
    let service = &app.state.services.picking_types;

    let picking_type = service
        .create_picking_type(CreatePickingType {
            name: "Receipts".to_string(),
            code: stock_picking_type::CODE_INCOMING.to_string(),
            active: Some(true),
        })
        .await
        .unwrap();

    service
        .rename_picking_type(picking_type.id, "Dock Receipts".to_string())
        .await
        .unwrap();

    let triggers = app.state.services.quality.list_triggers().await.unwrap();
    assert_eq!(triggers.len(), 1);
    assert_eq!(triggers[0].name, "Dock Receipts");

    let archived = service.set_active(picking_type.id, false).await.unwrap();
    assert!(!archived.active);
    assert_eq!(archived.name, "Dock Receipts");
}

#[tokio::test]
async fn unknown_codes_and_missing_types_are_rejected() {
    let app = TestApp::new().await;
    let service = &app.state.services.picking_types;

    let result = service
        .create_picking_type(CreatePickingType {
            name: "Teleport".to_string(),
            code: "teleport".to_string(),
            active: None,
        })
        .await;
    assert_matches!(result, Err(ServiceError::InvalidInput(_)));

    let result = service
        .update_picking_type(
            77,
            UpdatePickingType {
                name: Some("Ghost".to_string()),
                active: None,
            },
        )
        .await;
    assert_matches!(result, Err(ServiceError::NotFound(_)));
}
