use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, ConnectionTrait};
use serde::{Deserialize, Serialize};

/// A manufacturing tag. Tags form a tree through `parent_id`; the
/// hierarchical display name is computed, never stored.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "mrp_tags")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub parent_id: Option<i32>,
    pub color: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::ParentId",
        to = "Column::Id",
        on_delete = "SetNull"
    )]
    Parent,
    #[sea_orm(has_many = "super::mrp_production_tag::Entity")]
    ProductionTags,
}

impl Related<super::mrp_production::Entity> for Entity {
    fn to() -> RelationDef {
        super::mrp_production_tag::Relation::Production.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::mrp_production_tag::Relation::Tag.def().rev())
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
            if let ActiveValue::NotSet = self.color {
                self.color = ActiveValue::Set(0);
            }
        }

        self.updated_at = ActiveValue::Set(now);
        Ok(self)
    }
}
