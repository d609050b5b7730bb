//! Database access layer for cow-er
//!
//! Schema creation lives in `cow_common::db`; this module owns the queries.

pub mod evaluations;

pub use cow_common::db::init_database;
pub use evaluations::{
    delete_evaluation, get_evaluation_with_image, list_evaluations, save_rating,
    save_visualization, statistics, unevaluated_count, EvaluationRecord, EvaluationStatistics,
    EvaluationWithImage,
};
