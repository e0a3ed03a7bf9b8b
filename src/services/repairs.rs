use metrics::counter;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ConnectionTrait, DatabaseConnection, EntityTrait,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeSet, sync::Arc};
use tracing::{info, instrument, warn};
use utoipa::ToSchema;

use crate::{
    actions::{ActionDescriptor, MRP_PRODUCTION_MODEL},
    entities::repair_order::{self, Entity as RepairEntity},
    errors::ServiceError,
    services::{
        links,
        productions::find_production,
        products::{ensure_positive_qty, find_product},
    },
};

const NEW_REFERENCE: &str = "New";

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateRepair {
    pub name: Option<String>,
    pub product_id: i32,
    pub product_qty: Option<f64>,
    /// Manufacturing orders to link to the new repair
    #[serde(default)]
    pub mrp_ids: Vec<i32>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LinkProductions {
    pub production_ids: Vec<i32>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RepairView {
    pub id: i32,
    pub name: String,
    pub product_id: i32,
    pub product_qty: f64,
    pub state: String,
    /// Manufacturing orders pointing at this repair
    pub mrp_ids: Vec<i32>,
}

#[derive(Clone)]
pub struct RepairService {
    db: Arc<DatabaseConnection>,
}

impl RepairService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    #[instrument(skip(self, input), fields(product_id = input.product_id))]
    pub async fn create_repair(&self, input: CreateRepair) -> Result<RepairView, ServiceError> {
        let product_qty = input.product_qty.unwrap_or(1.0);
        ensure_positive_qty(product_qty)?;
        let txn = self.db.begin().await?;

        find_product(&txn, input.product_id).await?;

        let explicit_name = input
            .name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string);

        let created = repair_order::ActiveModel {
            name: Set(explicit_name
                .clone()
                .unwrap_or_else(|| NEW_REFERENCE.to_string())),
            product_id: Set(input.product_id),
            product_qty: Set(product_qty),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let repair = if explicit_name.is_none() {
            let reference = repair_reference(created.id);
            let mut active: repair_order::ActiveModel = created.into();
            active.name = Set(reference);
            active.update(&txn).await?
        } else {
            created
        };

        let production_ids: BTreeSet<i32> = input.mrp_ids.iter().copied().collect();
        for production_id in &production_ids {
            links::set_production_repair(&txn, *production_id, Some(repair.id)).await?;
        }

        let mrp_ids = links::repair_production_ids(&txn, repair.id).await?;
        txn.commit().await?;

        counter!("mrp_addons.repairs.created", 1);
        info!(
            repair_id = repair.id,
            name = %repair.name,
            linked = mrp_ids.len(),
            "Repair order created"
        );
        Ok(to_repair_view(repair, mrp_ids))
    }

    pub async fn get_repair(&self, id: i32) -> Result<RepairView, ServiceError> {
        let db = &*self.db;
        let repair = find_repair(db, id).await?;
        let mrp_ids = links::repair_production_ids(db, id).await?;
        Ok(to_repair_view(repair, mrp_ids))
    }

    /// Points each listed manufacturing order at this repair
    #[instrument(skip(self))]
    pub async fn link_productions(
        &self,
        id: i32,
        production_ids: Vec<i32>,
    ) -> Result<RepairView, ServiceError> {
        let txn = self.db.begin().await?;
        let repair = find_repair(&txn, id).await?;

        for production_id in production_ids {
            links::set_production_repair(&txn, production_id, Some(id)).await?;
        }

        let mrp_ids = links::repair_production_ids(&txn, id).await?;
        txn.commit().await?;

        info!(repair_id = id, linked = mrp_ids.len(), "Productions linked");
        Ok(to_repair_view(repair, mrp_ids))
    }

    /// Clears the link from one manufacturing order to this repair
    #[instrument(skip(self))]
    pub async fn unlink_production(
        &self,
        id: i32,
        production_id: i32,
    ) -> Result<RepairView, ServiceError> {
        let txn = self.db.begin().await?;
        let repair = find_repair(&txn, id).await?;

        let production = find_production(&txn, production_id).await?;
        if production.repair_id != Some(id) {
            warn!(repair_id = id, production_id, "Production is not linked to repair");
            return Err(ServiceError::InvalidOperation(format!(
                "Manufacturing order {} is not linked to repair order {}",
                production_id, id
            )));
        }
        links::set_production_repair(&txn, production_id, None).await?;

        let mrp_ids = links::repair_production_ids(&txn, id).await?;
        txn.commit().await?;

        info!(repair_id = id, production_id, "Production unlinked");
        Ok(to_repair_view(repair, mrp_ids))
    }

    /// Opens the manufacturing orders linked to this repair
    #[instrument(skip(self))]
    pub async fn action_view_repair_manufacturing_order(
        &self,
        id: i32,
    ) -> Result<ActionDescriptor, ServiceError> {
        let db = &*self.db;
        find_repair(db, id).await?;
        let mrp_ids = links::repair_production_ids(db, id).await?;

        Ok(ActionDescriptor::open_records(
            MRP_PRODUCTION_MODEL,
            "Manufacturing Orders",
            &mrp_ids,
        ))
    }
}

fn repair_reference(id: i32) -> String {
    format!("RO/{:05}", id)
}

async fn find_repair<C: ConnectionTrait>(
    conn: &C,
    id: i32,
) -> Result<repair_order::Model, ServiceError> {
    RepairEntity::find_by_id(id)
        .one(conn)
        .await?
        .ok_or_else(|| ServiceError::not_found("Repair order", id))
}

fn to_repair_view(repair: repair_order::Model, mrp_ids: Vec<i32>) -> RepairView {
    RepairView {
        id: repair.id,
        name: repair.name,
        product_id: repair.product_id,
        product_qty: repair.product_qty,
        state: repair.state,
        mrp_ids,
    }
}
