//! Quality-control triggers attached to stock picking types.
//!
//! Every picking type gets exactly one trigger named after it. Installation
//! creates the missing ones for the active types already in the database;
//! picking types created later get theirs from [`PickingTypeService`].
//!
//! [`PickingTypeService`]: crate::services::picking_types::PickingTypeService

use metrics::counter;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, QueryFilter, QueryOrder, SqlErr, TransactionTrait,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, info, instrument};
use utoipa::ToSchema;

use crate::{
    entities::{
        qc_trigger::{self, Entity as TriggerEntity},
        stock_picking_type::{self, Entity as PickingTypeEntity},
    },
    errors::ServiceError,
};

/// Outcome of attaching a trigger to one picking type
#[derive(Debug, Clone)]
pub struct QcTriggerSetup {
    pub trigger: qc_trigger::Model,
    /// `false` when the picking type already had its trigger
    pub created: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct InstallReport {
    pub picking_types: usize,
    pub created: usize,
    pub existing: usize,
}

#[derive(Clone)]
pub struct QualityTriggerService {
    db: Arc<DatabaseConnection>,
}

impl QualityTriggerService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Attaches a trigger to `picking_type` unless it already has one
    pub async fn create_qc_trigger<C: ConnectionTrait>(
        conn: &C,
        picking_type: &stock_picking_type::Model,
    ) -> Result<QcTriggerSetup, ServiceError> {
        if let Some(trigger) = find_for_picking_type(conn, picking_type.id).await? {
            debug!(
                picking_type_id = picking_type.id,
                trigger_id = trigger.id,
                "Quality trigger already present"
            );
            return Ok(QcTriggerSetup {
                trigger,
                created: false,
            });
        }

        let name = picking_type.name.trim();
        if name.is_empty() {
            return Err(ServiceError::InvalidInput(format!(
                "Picking type {} has no name to give its quality trigger",
                picking_type.id
            )));
        }

        let trigger = qc_trigger::ActiveModel {
            name: Set(name.to_string()),
            picking_type_id: Set(picking_type.id),
            partner_selectable: Set(true),
            ..Default::default()
        }
        .insert(conn)
        .await
        .map_err(|err| match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => ServiceError::Conflict(format!(
                "Picking type {} already has a quality trigger",
                picking_type.id
            )),
            _ => ServiceError::DatabaseError(err),
        })?;

        counter!("mrp_addons.qc_triggers.created", 1);
        debug!(
            picking_type_id = picking_type.id,
            trigger_id = trigger.id,
            "Quality trigger created"
        );
        Ok(QcTriggerSetup {
            trigger,
            created: true,
        })
    }

    /// Install hook: one trigger per active picking type, all or nothing.
    ///
    /// The first failure rolls the whole run back and is returned.
    #[instrument(skip(self))]
    pub async fn post_init_hook(&self) -> Result<InstallReport, ServiceError> {
        let txn = self.db.begin().await?;

        let picking_types = PickingTypeEntity::find()
            .filter(stock_picking_type::Column::Active.eq(true))
            .order_by_asc(stock_picking_type::Column::Id)
            .all(&txn)
            .await?;

        let mut report = InstallReport {
            picking_types: picking_types.len(),
            created: 0,
            existing: 0,
        };

        for picking_type in &picking_types {
            match Self::create_qc_trigger(&txn, picking_type).await {
                Ok(setup) if setup.created => report.created += 1,
                Ok(_) => report.existing += 1,
                Err(err) => {
                    error!(
                        picking_type_id = picking_type.id,
                        error = %err,
                        "Quality trigger installation failed"
                    );
                    txn.rollback().await?;
                    return Err(err);
                }
            }
        }

        txn.commit().await?;
        info!(
            picking_types = report.picking_types,
            created = report.created,
            existing = report.existing,
            "Quality triggers installed"
        );
        Ok(report)
    }

    pub async fn list_triggers(&self) -> Result<Vec<qc_trigger::Model>, ServiceError> {
        let triggers = TriggerEntity::find()
            .order_by_asc(qc_trigger::Column::Id)
            .all(&*self.db)
            .await?;
        Ok(triggers)
    }
}

pub(crate) async fn find_for_picking_type<C: ConnectionTrait>(
    conn: &C,
    picking_type_id: i32,
) -> Result<Option<qc_trigger::Model>, ServiceError> {
    let trigger = TriggerEntity::find()
        .filter(qc_trigger::Column::PickingTypeId.eq(picking_type_id))
        .one(conn)
        .await?;
    Ok(trigger)
}
