//! The one place that writes the manufacturing order -> repair order link.
//!
//! A repair order's `mrp_ids` is never stored; it is always read back as the
//! productions whose `repair_id` points at the repair. Both directions stay
//! consistent because nothing else assigns `mrp_productions.repair_id`.

use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use tracing::debug;

use crate::{
    entities::{
        mrp_production::{self, Entity as ProductionEntity},
        repair_order::Entity as RepairEntity,
    },
    errors::ServiceError,
};

/// Points `production_id` at `repair_id`, or clears the link with `None`
pub async fn set_production_repair<C: ConnectionTrait>(
    conn: &C,
    production_id: i32,
    repair_id: Option<i32>,
) -> Result<mrp_production::Model, ServiceError> {
    let production = ProductionEntity::find_by_id(production_id)
        .one(conn)
        .await?
        .ok_or_else(|| ServiceError::not_found("Manufacturing order", production_id))?;

    if let Some(repair_id) = repair_id {
        RepairEntity::find_by_id(repair_id)
            .one(conn)
            .await?
            .ok_or_else(|| ServiceError::not_found("Repair order", repair_id))?;
    }

    if production.repair_id == repair_id {
        return Ok(production);
    }

    debug!(production_id, ?repair_id, "Updating production repair link");
    let mut active: mrp_production::ActiveModel = production.into();
    active.repair_id = Set(repair_id);
    Ok(active.update(conn).await?)
}

/// Ids of the productions linked to `repair_id`, ascending
pub async fn repair_production_ids<C: ConnectionTrait>(
    conn: &C,
    repair_id: i32,
) -> Result<Vec<i32>, ServiceError> {
    let ids = ProductionEntity::find()
        .select_only()
        .column(mrp_production::Column::Id)
        .filter(mrp_production::Column::RepairId.eq(repair_id))
        .order_by_asc(mrp_production::Column::Id)
        .into_tuple::<i32>()
        .all(conn)
        .await?;
    Ok(ids)
}
