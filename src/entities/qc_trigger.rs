use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, ConnectionTrait};
use serde::{Deserialize, Serialize};

/// Quality-control trigger attached to a stock picking type
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "qc_triggers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(unique)]
    pub picking_type_id: i32,
    pub partner_selectable: bool,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::stock_picking_type::Entity",
        from = "Column::PickingTypeId",
        to = "super::stock_picking_type::Column::Id",
        on_delete = "Cascade"
    )]
    PickingType,
}

impl Related<super::stock_picking_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PickingType.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let now = Utc::now();

        if insert {
            if let ActiveValue::NotSet = self.created_at {
                self.created_at = ActiveValue::Set(now);
            }
            if let ActiveValue::NotSet = self.active {
                self.active = ActiveValue::Set(true);
            }
            if let ActiveValue::NotSet = self.partner_selectable {
                self.partner_selectable = ActiveValue::Set(true);
            }
        }

        self.updated_at = ActiveValue::Set(now);
        Ok(self)
    }
}
