mod common;

use assert_matches::assert_matches;
use common::TestApp;
use mrp_addons::{
    actions::{ActionTarget, WINDOW_ACTION},
    errors::ServiceError,
    services::{
        productions::{CreateProduction, ProductionView},
        repairs::{CreateRepair, RepairView},
    },
};
use serde_json::json;

async fn create_production(app: &TestApp, repair_id: Option<i32>) -> ProductionView {
    let (product, bom) = app.seed_product_with_bom().await;
    app.state
        .services
        .productions
        .create_production(CreateProduction {
            name: None,
            product_id: product.id,
            bom_id: Some(bom.id),
            product_qty: 1.0,
            repair_id,
            tag_ids: Vec::new(),
        })
        .await
        .expect("create manufacturing order")
}

async fn create_repair(app: &TestApp, product_id: i32, mrp_ids: Vec<i32>) -> RepairView {
    app.state
        .services
        .repairs
        .create_repair(CreateRepair {
            name: None,
            product_id,
            product_qty: Some(1.0),
            mrp_ids,
        })
        .await
        .expect("create repair order")
}

#[tokio::test]
async fn create_repair_action_prefills_the_form() {
    let app = TestApp::new().await;
    let mo = create_production(&app, None).await;

    let action = app
        .state
        .services
        .productions
        .action_create_repair_order(mo.id)
        .await
        .unwrap();

    assert_eq!(action.action_type, WINDOW_ACTION);
    assert_eq!(action.res_model, "repair.order");
    assert_eq!(action.view_mode, "form");
    assert_eq!(action.target, ActionTarget::New);
    assert_eq!(action.default_value("product_id"), Some(&json!(mo.product_id)));
    assert_eq!(action.default_value("product_qty"), Some(&json!(1.0)));
    assert_eq!(action.default_value("mrp_ids"), Some(&json!([mo.id])));
}

#[tokio::test]
async fn navigation_works_in_both_directions() {
    let app = TestApp::new().await;
    let mo = create_production(&app, None).await;
    let repair = create_repair(&app, mo.product_id, vec![mo.id]).await;
    assert_eq!(repair.mrp_ids, vec![mo.id]);

    app.state
        .services
        .productions
        .set_repair(mo.id, Some(repair.id))
        .await
        .unwrap();

    let to_mo = app
        .state
        .services
        .repairs
        .action_view_repair_manufacturing_order(repair.id)
        .await
        .unwrap();
    assert_eq!(to_mo.action_type, WINDOW_ACTION);
    assert_eq!(to_mo.res_model, "mrp.production");
    assert_eq!(to_mo.res_id, Some(mo.id));

    let to_repair = app
        .state
        .services
        .productions
        .action_view_mrp_production_repair_orders(mo.id)
        .await
        .unwrap();
    assert_eq!(to_repair.action_type, WINDOW_ACTION);
    assert_eq!(to_repair.res_model, "repair.order");
    assert_eq!(to_repair.res_id, Some(repair.id));
}

#[tokio::test]
async fn repair_lists_every_linked_production() {
    let app = TestApp::new().await;
    let seed = create_production(&app, None).await;
    let repair = create_repair(&app, seed.product_id, Vec::new()).await;
    assert!(repair.mrp_ids.is_empty());

    let mo1 = create_production(&app, Some(repair.id)).await;
    let mo2 = create_production(&app, Some(repair.id)).await;

    let repair = app.state.services.repairs.get_repair(repair.id).await.unwrap();
    assert_eq!(repair.mrp_ids.len(), 2);
    assert!(repair.mrp_ids.contains(&mo1.id));
    assert!(repair.mrp_ids.contains(&mo2.id));

    let action = app
        .state
        .services
        .repairs
        .action_view_repair_manufacturing_order(repair.id)
        .await
        .unwrap();
    assert_eq!(action.res_id, None);
    assert_eq!(action.view_mode, "tree,form");
    assert_eq!(action.domain.len(), 1);
    assert_eq!(action.domain[0].2, json!([mo1.id, mo2.id]));
}

#[tokio::test]
async fn unlinking_updates_both_sides() {
    let app = TestApp::new().await;
    let mo = create_production(&app, None).await;
    let repair = create_repair(&app, mo.product_id, vec![mo.id]).await;

    let repair = app
        .state
        .services
        .repairs
        .unlink_production(repair.id, mo.id)
        .await
        .unwrap();
    assert!(repair.mrp_ids.is_empty());

    let mo = app
        .state
        .services
        .productions
        .get_production(mo.id)
        .await
        .unwrap();
    assert_eq!(mo.repair_id, None);

    let again = app
        .state
        .services
        .repairs
        .unlink_production(repair.id, mo.id)
        .await;
    assert_matches!(again, Err(ServiceError::InvalidOperation(_)));
}

#[tokio::test]
async fn unlinked_production_opens_an_empty_list() {
    let app = TestApp::new().await;
    let mo = create_production(&app, None).await;

    let action = app
        .state
        .services
        .productions
        .action_view_mrp_production_repair_orders(mo.id)
        .await
        .unwrap();
    assert_eq!(action.res_id, None);
    assert_eq!(action.domain[0].2, json!([]));
}

#[tokio::test]
async fn productions_get_sequential_references() {
    let app = TestApp::new().await;
    let first = create_production(&app, None).await;
    let second = create_production(&app, None).await;

    assert_eq!(first.name, format!("MO/{:05}", first.id));
    assert_eq!(second.name, format!("MO/{:05}", second.id));
    assert_eq!(first.state, "draft");

    let repair = create_repair(&app, first.product_id, Vec::new()).await;
    assert_eq!(repair.name, format!("RO/{:05}", repair.id));
}

#[tokio::test]
async fn invalid_production_input_is_rejected() {
    let app = TestApp::new().await;
    let (product, bom) = app.seed_product_with_bom().await;
    let other = app.seed_product("Other").await;
    let productions = &app.state.services.productions;

    let zero_qty = productions
        .create_production(CreateProduction {
            name: None,
            product_id: product.id,
            bom_id: Some(bom.id),
            product_qty: 0.0,
            repair_id: None,
            tag_ids: Vec::new(),
        })
        .await;
    assert_matches!(zero_qty, Err(ServiceError::InvalidInput(_)));

    let foreign_bom = productions
        .create_production(CreateProduction {
            name: None,
            product_id: other.id,
            bom_id: Some(bom.id),
            product_qty: 1.0,
            repair_id: None,
            tag_ids: Vec::new(),
        })
        .await;
    assert_matches!(foreign_bom, Err(ServiceError::InvalidInput(_)));

    let missing_repair = productions
        .create_production(CreateProduction {
            name: None,
            product_id: product.id,
            bom_id: Some(bom.id),
            product_qty: 1.0,
            repair_id: Some(404),
            tag_ids: Vec::new(),
        })
        .await;
    assert_matches!(missing_repair, Err(ServiceError::NotFound(_)));
}
