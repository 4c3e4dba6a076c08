pub mod recommendation;
pub mod sku;
