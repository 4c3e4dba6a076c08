pub mod engine;
pub mod io;
pub mod model;

pub use engine::calculate;
pub use engine::settings::EngineSettings;
pub use model::recommendation::{Recommendation, StockStatus};
pub use model::sku::{normalize_sku, InTransitItem, SkuInput};
