pub mod mrp_bom;
pub mod mrp_bom_line;
pub mod mrp_production;
pub mod mrp_production_tag;
pub mod mrp_tag;
pub mod product;
pub mod qc_trigger;
pub mod repair_order;
pub mod stock_picking_type;
