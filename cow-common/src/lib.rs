//! # Colours of Wine Common Library
//!
//! Shared code for the COW expert tool:
//! - Parameter extraction engine (description text → visualization parameters)
//! - Keyword lexicons driving the extraction
//! - The visualization parameter record
//! - Configuration loading
//! - Database schema initialization
//! - Error and timestamp utilities

pub mod config;
#[cfg(feature = "sqlx")]
pub mod db;
pub mod error;
pub mod extract;
pub mod lexicon;
pub mod params;
pub mod time;

pub use error::{Error, Result};
pub use extract::extract;
pub use params::{WineType, WineVisualizationParameters};
