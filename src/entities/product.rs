use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, ConnectionTrait};
use serde::{Deserialize, Serialize};

/// Product tracking modes
pub const TRACKING_NONE: &str = "none";
pub const TRACKING_LOT: &str = "lot";
pub const TRACKING_SERIAL: &str = "serial";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub default_code: Option<String>,
    pub tracking: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::mrp_bom::Entity")]
    Boms,
    #[sea_orm(has_many = "super::mrp_production::Entity")]
    Productions,
    #[sea_orm(has_many = "super::repair_order::Entity")]
    RepairOrders,
}

impl Related<super::mrp_bom::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Boms.def()
    }
}

impl Related<super::mrp_production::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Productions.def()
    }
}

impl Related<super::repair_order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RepairOrders.def()
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
            if let ActiveValue::NotSet = self.tracking {
                self.tracking = ActiveValue::Set(TRACKING_NONE.to_string());
            }
        }

        self.updated_at = ActiveValue::Set(now);
        Ok(self)
    }
}
