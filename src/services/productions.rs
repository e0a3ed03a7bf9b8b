use metrics::counter;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::{collections::BTreeSet, sync::Arc};
use tracing::{info, instrument};
use utoipa::ToSchema;

use crate::{
    actions::{ActionDescriptor, REPAIR_ORDER_MODEL},
    entities::{
        mrp_production::{self, Entity as ProductionEntity},
        mrp_production_tag::{self, Entity as ProductionTagEntity},
        mrp_tag::{self, Entity as TagEntity},
    },
    errors::ServiceError,
    services::{
        links,
        products::{ensure_positive_qty, find_bom, find_product},
        tags::{find_tag, load_snapshot, to_view, TagView},
    },
};

/// Placeholder reference until the sequence number is known
const NEW_REFERENCE: &str = "New";

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateProduction {
    /// Explicit reference; generated as `MO/00001` when absent
    pub name: Option<String>,
    pub product_id: i32,
    pub bom_id: Option<i32>,
    pub product_qty: f64,
    pub repair_id: Option<i32>,
    #[serde(default)]
    pub tag_ids: Vec<i32>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProductionView {
    pub id: i32,
    pub name: String,
    pub product_id: i32,
    pub bom_id: Option<i32>,
    pub product_qty: f64,
    pub state: String,
    pub repair_id: Option<i32>,
    pub tag_ids: Vec<i32>,
}

#[derive(Clone)]
pub struct ProductionService {
    db: Arc<DatabaseConnection>,
}

impl ProductionService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Creates a manufacturing order, optionally linked to a repair order
    /// and tagged.
    #[instrument(skip(self, input), fields(product_id = input.product_id))]
    pub async fn create_production(
        &self,
        input: CreateProduction,
    ) -> Result<ProductionView, ServiceError> {
        ensure_positive_qty(input.product_qty)?;
        let txn = self.db.begin().await?;

        find_product(&txn, input.product_id).await?;
        if let Some(bom_id) = input.bom_id {
            let bom = find_bom(&txn, bom_id).await?;
            if bom.product_id != input.product_id {
                return Err(ServiceError::InvalidInput(format!(
                    "BOM {} does not produce product {}",
                    bom_id, input.product_id
                )));
            }
        }

        let explicit_name = input
            .name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string);

        let created = mrp_production::ActiveModel {
            name: Set(explicit_name
                .clone()
                .unwrap_or_else(|| NEW_REFERENCE.to_string())),
            product_id: Set(input.product_id),
            bom_id: Set(input.bom_id),
            product_qty: Set(input.product_qty),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let production = if explicit_name.is_none() {
            let reference = production_reference(created.id);
            let mut active: mrp_production::ActiveModel = created.into();
            active.name = Set(reference);
            active.update(&txn).await?
        } else {
            created
        };

        let production = match input.repair_id {
            Some(repair_id) => {
                links::set_production_repair(&txn, production.id, Some(repair_id)).await?
            }
            None => production,
        };

        let tag_ids = replace_tags(&txn, production.id, &input.tag_ids).await?;
        txn.commit().await?;

        counter!("mrp_addons.productions.created", 1);
        info!(
            production_id = production.id,
            name = %production.name,
            repair_id = ?production.repair_id,
            "Manufacturing order created"
        );
        Ok(to_production_view(production, tag_ids))
    }

    pub async fn get_production(&self, id: i32) -> Result<ProductionView, ServiceError> {
        let db = &*self.db;
        let production = find_production(db, id).await?;
        let tag_ids = production_tag_ids(db, id).await?;
        Ok(to_production_view(production, tag_ids))
    }

    /// Links the order to a repair order, or unlinks it with `None`
    #[instrument(skip(self))]
    pub async fn set_repair(
        &self,
        id: i32,
        repair_id: Option<i32>,
    ) -> Result<ProductionView, ServiceError> {
        let txn = self.db.begin().await?;
        let production = links::set_production_repair(&txn, id, repair_id).await?;
        let tag_ids = production_tag_ids(&txn, id).await?;
        txn.commit().await?;

        info!(production_id = id, ?repair_id, "Repair link updated");
        Ok(to_production_view(production, tag_ids))
    }

    /// Replaces the order's tags
    #[instrument(skip(self))]
    pub async fn set_tags(&self, id: i32, tag_ids: Vec<i32>) -> Result<Vec<TagView>, ServiceError> {
        let txn = self.db.begin().await?;
        find_production(&txn, id).await?;
        replace_tags(&txn, id, &tag_ids).await?;
        let tags = load_tag_views(&txn, id).await?;
        txn.commit().await?;

        info!(production_id = id, tags = tags.len(), "Production tags replaced");
        Ok(tags)
    }

    pub async fn production_tags(&self, id: i32) -> Result<Vec<TagView>, ServiceError> {
        let db = &*self.db;
        find_production(db, id).await?;
        load_tag_views(db, id).await
    }

    /// Form for a new repair order prefilled from this manufacturing order
    #[instrument(skip(self))]
    pub async fn action_create_repair_order(
        &self,
        id: i32,
    ) -> Result<ActionDescriptor, ServiceError> {
        let production = find_production(&*self.db, id).await?;

        Ok(
            ActionDescriptor::create_form(REPAIR_ORDER_MODEL, "Create Repair Order")
                .with_default("product_id", json!(production.product_id))
                .with_default("product_qty", json!(production.product_qty))
                .with_default("mrp_ids", json!([production.id])),
        )
    }

    /// Opens the repair order linked to this manufacturing order
    #[instrument(skip(self))]
    pub async fn action_view_mrp_production_repair_orders(
        &self,
        id: i32,
    ) -> Result<ActionDescriptor, ServiceError> {
        let production = find_production(&*self.db, id).await?;
        let repair_ids: Vec<i32> = production.repair_id.into_iter().collect();

        Ok(ActionDescriptor::open_records(
            REPAIR_ORDER_MODEL,
            "Repair Orders",
            &repair_ids,
        ))
    }
}

fn production_reference(id: i32) -> String {
    format!("MO/{:05}", id)
}

pub(crate) async fn find_production<C: ConnectionTrait>(
    conn: &C,
    id: i32,
) -> Result<mrp_production::Model, ServiceError> {
    ProductionEntity::find_by_id(id)
        .one(conn)
        .await?
        .ok_or_else(|| ServiceError::not_found("Manufacturing order", id))
}

async fn production_tag_ids<C: ConnectionTrait>(
    conn: &C,
    production_id: i32,
) -> Result<Vec<i32>, ServiceError> {
    let ids = ProductionTagEntity::find()
        .select_only()
        .column(mrp_production_tag::Column::TagId)
        .filter(mrp_production_tag::Column::ProductionId.eq(production_id))
        .order_by_asc(mrp_production_tag::Column::TagId)
        .into_tuple::<i32>()
        .all(conn)
        .await?;
    Ok(ids)
}

async fn load_tag_views<C: ConnectionTrait>(
    conn: &C,
    production_id: i32,
) -> Result<Vec<TagView>, ServiceError> {
    let tag_ids = production_tag_ids(conn, production_id).await?;
    if tag_ids.is_empty() {
        return Ok(Vec::new());
    }

    let tags = TagEntity::find()
        .filter(mrp_tag::Column::Id.is_in(tag_ids))
        .order_by_asc(mrp_tag::Column::Id)
        .all(conn)
        .await?;
    let snapshot = load_snapshot(conn).await?;
    Ok(tags.into_iter().map(|tag| to_view(&snapshot, tag)).collect())
}

/// Swaps the production's tag links for `tag_ids` (duplicates collapse)
async fn replace_tags<C: ConnectionTrait>(
    conn: &C,
    production_id: i32,
    tag_ids: &[i32],
) -> Result<Vec<i32>, ServiceError> {
    let unique: BTreeSet<i32> = tag_ids.iter().copied().collect();
    for tag_id in &unique {
        find_tag(conn, *tag_id).await?;
    }

    ProductionTagEntity::delete_many()
        .filter(mrp_production_tag::Column::ProductionId.eq(production_id))
        .exec(conn)
        .await?;

    if !unique.is_empty() {
        let links = unique.iter().map(|tag_id| mrp_production_tag::ActiveModel {
            production_id: Set(production_id),
            tag_id: Set(*tag_id),
        });
        ProductionTagEntity::insert_many(links)
            .exec_without_returning(conn)
            .await?;
    }

    Ok(unique.into_iter().collect())
}

fn to_production_view(production: mrp_production::Model, tag_ids: Vec<i32>) -> ProductionView {
    ProductionView {
        id: production.id,
        name: production.name,
        product_id: production.product_id,
        bom_id: production.bom_id,
        product_qty: production.product_qty,
        state: production.state,
        repair_id: production.repair_id,
        tag_ids,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn references_are_zero_padded() {
        assert_eq!(production_reference(1), "MO/00001");
        assert_eq!(production_reference(123456), "MO/123456");
    }
}
