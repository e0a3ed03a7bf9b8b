use metrics::counter;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, DatabaseConnection, EntityTrait, QueryOrder,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    entities::{
        qc_trigger,
        stock_picking_type::{self, Entity as PickingTypeEntity, CODES},
    },
    errors::ServiceError,
    services::quality::{find_for_picking_type, QualityTriggerService},
};

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreatePickingType {
    #[validate(length(min = 1, max = 128))]
    pub name: String,
    /// `incoming`, `outgoing` or `internal`
    pub code: String,
    pub active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdatePickingType {
    #[validate(length(min = 1, max = 128))]
    pub name: Option<String>,
    pub active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PickingTypeView {
    pub id: i32,
    pub name: String,
    pub code: String,
    pub active: bool,
    pub qc_trigger_id: Option<i32>,
}

#[derive(Clone)]
pub struct PickingTypeService {
    db: Arc<DatabaseConnection>,
}

impl PickingTypeService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Creates a picking type together with its quality trigger
    #[instrument(skip(self, input), fields(name = %input.name, code = %input.code))]
    pub async fn create_picking_type(
        &self,
        input: CreatePickingType,
    ) -> Result<PickingTypeView, ServiceError> {
        input.validate()?;
        let name = validated_name(&input.name)?;
        if !CODES.contains(&input.code.as_str()) {
            return Err(ServiceError::InvalidInput(format!(
                "Unknown picking type code: {}",
                input.code
            )));
        }

        let txn = self.db.begin().await?;
        let picking_type = stock_picking_type::ActiveModel {
            name: Set(name),
            code: Set(input.code),
            active: Set(input.active.unwrap_or(true)),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let setup = QualityTriggerService::create_qc_trigger(&txn, &picking_type).await?;
        txn.commit().await?;

        counter!("mrp_addons.picking_types.created", 1);
        info!(
            picking_type_id = picking_type.id,
            trigger_id = setup.trigger.id,
            "Picking type created"
        );
        Ok(to_view(picking_type, Some(setup.trigger.id)))
    }

    /// Renames and/or (de)activates a picking type. A rename is carried
    /// over to its quality trigger.
    #[instrument(skip(self, input))]
    pub async fn update_picking_type(
        &self,
        id: i32,
        input: UpdatePickingType,
    ) -> Result<PickingTypeView, ServiceError> {
        input.validate()?;
        let txn = self.db.begin().await?;
        let picking_type = PickingTypeEntity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("Picking type", id))?;

        let new_name = input.name.as_deref().map(validated_name).transpose()?;

        let mut active: stock_picking_type::ActiveModel = picking_type.into();
        if let Some(name) = &new_name {
            active.name = Set(name.clone());
        }
        if let Some(is_active) = input.active {
            active.active = Set(is_active);
        }
        let picking_type = active.update(&txn).await?;

        let trigger = find_for_picking_type(&txn, id).await?;
        let trigger = match (trigger, new_name) {
            (Some(trigger), Some(name)) if trigger.name != name => {
                let mut trigger: qc_trigger::ActiveModel = trigger.into();
                trigger.name = Set(name);
                Some(trigger.update(&txn).await?)
            }
            (trigger, _) => trigger,
        };
        txn.commit().await?;

        info!(picking_type_id = id, "Picking type updated");
        Ok(to_view(picking_type, trigger.map(|trigger| trigger.id)))
    }

    pub async fn rename_picking_type(
        &self,
        id: i32,
        name: String,
    ) -> Result<PickingTypeView, ServiceError> {
        self.update_picking_type(
            id,
            UpdatePickingType {
                name: Some(name),
                active: None,
            },
        )
        .await
    }

    pub async fn set_active(&self, id: i32, active: bool) -> Result<PickingTypeView, ServiceError> {
        self.update_picking_type(
            id,
            UpdatePickingType {
                name: None,
                active: Some(active),
            },
        )
        .await
    }

    pub async fn list_picking_types(&self) -> Result<Vec<PickingTypeView>, ServiceError> {
        let db = &*self.db;
        let picking_types = PickingTypeEntity::find()
            .order_by_asc(stock_picking_type::Column::Id)
            .find_also_related(qc_trigger::Entity)
            .all(db)
            .await?;

        Ok(picking_types
            .into_iter()
            .map(|(picking_type, trigger)| to_view(picking_type, trigger.map(|t| t.id)))
            .collect())
    }
}

fn validated_name(name: &str) -> Result<String, ServiceError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ServiceError::InvalidInput(
            "Picking type name cannot be empty".to_string(),
        ));
    }
    Ok(name.to_string())
}

fn to_view(picking_type: stock_picking_type::Model, qc_trigger_id: Option<i32>) -> PickingTypeView {
    PickingTypeView {
        id: picking_type.id,
        name: picking_type.name,
        code: picking_type.code,
        active: picking_type.active,
        qc_trigger_id,
    }
}
