use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, ConnectionTrait};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "mrp_bom_lines")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub bom_id: i32,
    pub product_id: i32,
    pub product_qty: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::mrp_bom::Entity",
        from = "Column::BomId",
        to = "super::mrp_bom::Column::Id"
    )]
    Bom,
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Component,
}

impl Related<super::mrp_bom::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bom.def()
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
        }
        self.updated_at = ActiveValue::Set(now);
        Ok(self)
    }
}
