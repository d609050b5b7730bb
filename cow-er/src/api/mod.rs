//! HTTP API handlers for cow-er

pub mod analysis;
pub mod buildinfo;
pub mod health;
pub mod stats;
pub mod ui;
pub mod visualizations;

pub use analysis::analysis_routes;
pub use buildinfo::get_build_info;
pub use health::health_routes;
pub use stats::stats_routes;
pub use ui::ui_routes;
pub use visualizations::visualization_routes;
