// Master data
pub mod products;

// Manufacturing tags
pub mod tags;

// Manufacturing / repair cross-links
pub mod links;
pub mod productions;
pub mod repairs;

// Quality control bootstrap
pub mod picking_types;
pub mod quality;
