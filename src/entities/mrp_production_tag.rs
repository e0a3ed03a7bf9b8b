use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Link table behind `mrp_production.tag_ids`
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "mrp_production_tags")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub production_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub tag_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::mrp_production::Entity",
        from = "Column::ProductionId",
        to = "super::mrp_production::Column::Id",
        on_delete = "Cascade"
    )]
    Production,
    #[sea_orm(
        belongs_to = "super::mrp_tag::Entity",
        from = "Column::TagId",
        to = "super::mrp_tag::Column::Id",
        on_delete = "Cascade"
    )]
    Tag,
}

impl Related<super::mrp_production::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Production.def()
    }
}

impl Related<super::mrp_tag::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tag.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
