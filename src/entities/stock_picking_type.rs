use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, ConnectionTrait};
use serde::{Deserialize, Serialize};

/// Operation codes a picking type can carry
pub const CODE_INCOMING: &str = "incoming";
pub const CODE_OUTGOING: &str = "outgoing";
pub const CODE_INTERNAL: &str = "internal";
pub const CODES: [&str; 3] = [CODE_INCOMING, CODE_OUTGOING, CODE_INTERNAL];

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "stock_picking_types")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub code: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::qc_trigger::Entity")]
    QcTriggers,
}

impl Related<super::qc_trigger::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::QcTriggers.def()
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
        }

        self.updated_at = ActiveValue::Set(now);
        Ok(self)
    }
}
