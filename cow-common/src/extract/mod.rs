//! Parameter extraction engine
//!
//! Turns a free-form wine tasting description into a fully populated
//! [`WineVisualizationParameters`] record:
//!
//! normalize (lowercase) → classify type & color → score dimensions → assemble
//!
//! The engine is a pure function over the read-only lexicons in
//! [`crate::lexicon`]: no I/O, no shared mutable state, safe to call from any
//! number of threads at once. Every text input produces a record; only
//! non-text input (see [`extract_value`], [`extract_bytes`]) is rejected.
//!
//! # Example
//!
//! ```
//! use cow_common::extract::extract;
//! use cow_common::params::WineType;
//!
//! let params = extract("Ein eleganter Pinot Noir mit Aromen von Kirsche");
//! assert_eq!(params.wine_type, WineType::Red);
//! assert_eq!(params.base_color_hex, "#8A3050");
//! assert!(params.fruit_red > 0.0);
//! ```

pub mod classifier;
pub mod scorer;

use crate::params::WineVisualizationParameters;
use crate::{Error, Result};
use tracing::debug;

pub use classifier::{classify, Classification};
pub use scorer::{score, DimensionScores};

/// Case-fold a description for keyword matching
pub fn normalize(description: &str) -> String {
    description.to_lowercase()
}

/// Extract visualization parameters from a description
///
/// Never fails: empty, whitespace-only or unrecognizable text resolves to the
/// default branches (pale white, baseline scores, 6 g/L residual sugar).
pub fn extract(description: &str) -> WineVisualizationParameters {
    let normalized = normalize(description);

    let class = classify(&normalized);
    let s = score(&normalized);

    debug!(
        wine_type = %class.wine_type,
        color = class.base_color_hex,
        rule = class.rule,
        residual_sugar = s.residual_sugar,
        effervescence = s.effervescence,
        "Extracted visualization parameters"
    );

    WineVisualizationParameters {
        base_color_hex: class.base_color_hex.to_string(),
        wine_type: class.wine_type,
        acidity: s.acidity,
        body: s.body,
        tannin: s.tannin,
        depth: s.depth,
        sweetness: s.sweetness,
        oak_intensity: s.oak_intensity,
        effervescence: s.effervescence,
        mineral_intensity: s.mineral_intensity,
        herbal_intensity: s.herbal_intensity,
        spice_intensity: s.spice_intensity,
        fruit_citrus: s.fruit_citrus,
        fruit_stone: s.fruit_stone,
        fruit_tropical: s.fruit_tropical,
        fruit_red: s.fruit_red,
        fruit_dark: s.fruit_dark,
        residual_sugar: s.residual_sugar,
    }
}

/// Extract from a JSON value, rejecting anything that is not a string
pub fn extract_value(value: &serde_json::Value) -> Result<WineVisualizationParameters> {
    match value {
        serde_json::Value::String(text) => Ok(extract(text)),
        other => Err(Error::InvalidInput(format!(
            "Description must be text, got {}",
            json_kind(other)
        ))),
    }
}

/// Extract from raw bytes, rejecting anything that is not valid UTF-8
pub fn extract_bytes(bytes: &[u8]) -> Result<WineVisualizationParameters> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| Error::InvalidInput(format!("Description is not UTF-8 text: {}", e)))?;
    Ok(extract(text))
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
