pub mod common;
pub mod health;
pub mod productions;
pub mod products;
pub mod quality;
pub mod repairs;
pub mod tags;

use crate::{
    db::DbPool,
    services::{
        picking_types::PickingTypeService,
        productions::ProductionService,
        products::{BomService, ProductService},
        quality::QualityTriggerService,
        repairs::RepairService,
        tags::TagService,
    },
};
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub products: Arc<ProductService>,
    pub boms: Arc<BomService>,
    pub tags: Arc<TagService>,
    pub productions: Arc<ProductionService>,
    pub repairs: Arc<RepairService>,
    pub picking_types: Arc<PickingTypeService>,
    pub quality: Arc<QualityTriggerService>,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self {
            products: Arc::new(ProductService::new(db_pool.clone())),
            boms: Arc::new(BomService::new(db_pool.clone())),
            tags: Arc::new(TagService::new(db_pool.clone())),
            productions: Arc::new(ProductionService::new(db_pool.clone())),
            repairs: Arc::new(RepairService::new(db_pool.clone())),
            picking_types: Arc::new(PickingTypeService::new(db_pool.clone())),
            quality: Arc::new(QualityTriggerService::new(db_pool)),
        }
    }
}
