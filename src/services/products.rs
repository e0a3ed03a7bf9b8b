use metrics::counter;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;

use crate::{
    entities::{
        mrp_bom::{self, Entity as BomEntity},
        mrp_bom_line::{self, Entity as BomLineEntity},
        product::{self, Entity as ProductEntity},
    },
    errors::ServiceError,
};

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateProduct {
    pub name: String,
    pub default_code: Option<String>,
    /// `none`, `lot` or `serial`
    pub tracking: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct BomLineInput {
    pub product_id: i32,
    pub product_qty: f64,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateBom {
    pub product_id: i32,
    pub product_qty: Option<f64>,
    /// `normal` or `phantom`
    pub bom_type: Option<String>,
    #[serde(default)]
    pub lines: Vec<BomLineInput>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BomLineView {
    pub id: i32,
    pub product_id: i32,
    pub product_qty: f64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BomView {
    pub id: i32,
    pub product_id: i32,
    pub product_qty: f64,
    pub bom_type: String,
    pub lines: Vec<BomLineView>,
}

/// Product master data
#[derive(Clone)]
pub struct ProductService {
    db: Arc<DatabaseConnection>,
}

impl ProductService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn create_product(&self, input: CreateProduct) -> Result<product::Model, ServiceError> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(ServiceError::InvalidInput(
                "Product name cannot be empty".to_string(),
            ));
        }

        let tracking = input
            .tracking
            .unwrap_or_else(|| product::TRACKING_NONE.to_string());
        if ![
            product::TRACKING_NONE,
            product::TRACKING_LOT,
            product::TRACKING_SERIAL,
        ]
        .contains(&tracking.as_str())
        {
            return Err(ServiceError::InvalidInput(format!(
                "Unknown tracking mode: {}",
                tracking
            )));
        }

        let created = product::ActiveModel {
            name: Set(name.to_string()),
            default_code: Set(input.default_code),
            tracking: Set(tracking),
            ..Default::default()
        }
        .insert(&*self.db)
        .await?;

        info!(product_id = created.id, "Product created");
        Ok(created)
    }

    pub async fn get_product(&self, id: i32) -> Result<product::Model, ServiceError> {
        find_product(&*self.db, id).await
    }
}

/// Bills of materials
#[derive(Clone)]
pub struct BomService {
    db: Arc<DatabaseConnection>,
}

impl BomService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Creates a BOM and its component lines in one transaction
    #[instrument(skip(self, input), fields(product_id = input.product_id))]
    pub async fn create_bom(&self, input: CreateBom) -> Result<BomView, ServiceError> {
        let product_qty = input.product_qty.unwrap_or(1.0);
        ensure_positive_qty(product_qty)?;

        let bom_type = input
            .bom_type
            .unwrap_or_else(|| mrp_bom::BOM_TYPE_NORMAL.to_string());
        if bom_type != mrp_bom::BOM_TYPE_NORMAL && bom_type != mrp_bom::BOM_TYPE_PHANTOM {
            return Err(ServiceError::InvalidInput(format!(
                "Unknown BOM type: {}",
                bom_type
            )));
        }

        let txn = self.db.begin().await?;

        find_product(&txn, input.product_id).await?;
        let bom = mrp_bom::ActiveModel {
            product_id: Set(input.product_id),
            product_qty: Set(product_qty),
            bom_type: Set(bom_type),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        for line in &input.lines {
            ensure_positive_qty(line.product_qty)?;
            if line.product_id == input.product_id {
                return Err(ServiceError::InvalidInput(
                    "A BOM cannot list its own product as a component".to_string(),
                ));
            }
            find_product(&txn, line.product_id).await?;
            mrp_bom_line::ActiveModel {
                bom_id: Set(bom.id),
                product_id: Set(line.product_id),
                product_qty: Set(line.product_qty),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }

        let view = load_bom_view(&txn, bom).await?;
        txn.commit().await?;

        counter!("mrp_addons.boms.created", 1);
        info!(bom_id = view.id, lines = view.lines.len(), "BOM created");
        Ok(view)
    }

    pub async fn get_bom(&self, id: i32) -> Result<BomView, ServiceError> {
        let db = &*self.db;
        let bom = find_bom(db, id).await?;
        load_bom_view(db, bom).await
    }
}

pub(crate) fn ensure_positive_qty(qty: f64) -> Result<(), ServiceError> {
    if !qty.is_finite() || qty <= 0.0 {
        return Err(ServiceError::InvalidInput(format!(
            "Quantity must be positive, got: {}",
            qty
        )));
    }
    Ok(())
}

pub(crate) async fn find_product<C: ConnectionTrait>(
    conn: &C,
    id: i32,
) -> Result<product::Model, ServiceError> {
    ProductEntity::find_by_id(id)
        .one(conn)
        .await?
        .ok_or_else(|| ServiceError::not_found("Product", id))
}

pub(crate) async fn find_bom<C: ConnectionTrait>(
    conn: &C,
    id: i32,
) -> Result<mrp_bom::Model, ServiceError> {
    BomEntity::find_by_id(id)
        .one(conn)
        .await?
        .ok_or_else(|| ServiceError::not_found("BOM", id))
}

async fn load_bom_view<C: ConnectionTrait>(
    conn: &C,
    bom: mrp_bom::Model,
) -> Result<BomView, ServiceError> {
    let lines = BomLineEntity::find()
        .filter(mrp_bom_line::Column::BomId.eq(bom.id))
        .order_by_asc(mrp_bom_line::Column::Id)
        .all(conn)
        .await?
        .into_iter()
        .map(|line| BomLineView {
            id: line.id,
            product_id: line.product_id,
            product_qty: line.product_qty,
        })
        .collect();

    Ok(BomView {
        id: bom.id,
        product_id: bom.product_id,
        product_qty: bom.product_qty,
        bom_type: bom.bom_type,
        lines,
    })
}
