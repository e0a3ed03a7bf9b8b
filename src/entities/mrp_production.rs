use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, ConnectionTrait};
use serde::{Deserialize, Serialize};

pub const STATE_DRAFT: &str = "draft";

/// Manufacturing order, extended with a link to the repair order it was
/// raised for (`repair_id`) and a set of tags.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "mrp_productions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub product_id: i32,
    pub bom_id: Option<i32>,
    pub product_qty: f64,
    pub state: String,
    pub repair_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
    #[sea_orm(
        belongs_to = "super::mrp_bom::Entity",
        from = "Column::BomId",
        to = "super::mrp_bom::Column::Id"
    )]
    Bom,
    #[sea_orm(
        belongs_to = "super::repair_order::Entity",
        from = "Column::RepairId",
        to = "super::repair_order::Column::Id",
        on_delete = "SetNull"
    )]
    Repair,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl Related<super::mrp_bom::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bom.def()
    }
}

impl Related<super::repair_order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Repair.def()
    }
}

impl Related<super::mrp_tag::Entity> for Entity {
    fn to() -> RelationDef {
        super::mrp_production_tag::Relation::Tag.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::mrp_production_tag::Relation::Production.def().rev())
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
            if let ActiveValue::NotSet = self.state {
                self.state = ActiveValue::Set(STATE_DRAFT.to_string());
            }
        }

        self.updated_at = ActiveValue::Set(now);
        Ok(self)
    }
}
