//! Wine visualization parameters
//!
//! The record produced by the extraction engine and consumed by the image
//! synthesizers and the evaluation store. Field names are part of the stored
//! JSON format; renaming or removing one breaks previously saved evaluations.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Base color palette, one entry per classifier branch/shade
pub mod palette {
    pub const ROSE: &str = "#C8857F";
    pub const RED_PINOT_NOIR: &str = "#8A3050";
    pub const RED_ZWEIGELT: &str = "#8A2540";
    pub const RED_SANGIOVESE: &str = "#6B1528";
    pub const RED_VERY_DARK: &str = "#4A0D1C";
    pub const RED_DEFAULT: &str = "#7A1024";
    pub const AMBER: &str = "#E8C070";
    pub const WHITE_GREEN_TINT: &str = "#E8EDB3";
    pub const WHITE_STRAW_TINT: &str = "#F0E6B8";
    /// Pale white, also the no-match default
    pub const WHITE_PALE: &str = "#F6F2AF";

    pub const ALL: &[&str] = &[
        ROSE,
        RED_PINOT_NOIR,
        RED_ZWEIGELT,
        RED_SANGIOVESE,
        RED_VERY_DARK,
        RED_DEFAULT,
        AMBER,
        WHITE_GREEN_TINT,
        WHITE_STRAW_TINT,
        WHITE_PALE,
    ];
}

/// Residual sugar tier values in g/L
pub const RESIDUAL_SUGAR_VALUES: [f64; 8] = [4.0, 6.0, 12.0, 25.0, 40.0, 80.0, 180.0, 300.0];

/// Effervescence tier values
pub const EFFERVESCENCE_VALUES: [f64; 5] = [0.0, 0.3, 0.5, 0.8, 1.0];

/// Lower bound for acidity and body
pub const MIN_ACIDITY_BODY: f64 = 0.2;

/// Lower bound for depth
pub const MIN_DEPTH: f64 = 0.2;

/// Categorical wine type
///
/// `Auto` is only a nominal default; the classifier always resolves to one of
/// the other three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WineType {
    Red,
    White,
    #[serde(alias = "rosé")]
    Rose,
    Auto,
}

impl WineType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WineType::Red => "red",
            WineType::White => "white",
            WineType::Rose => "rose",
            WineType::Auto => "auto",
        }
    }
}

impl Default for WineType {
    fn default() -> Self {
        WineType::Auto
    }
}

impl fmt::Display for WineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WineType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "red" => Ok(WineType::Red),
            "white" => Ok(WineType::White),
            "rose" | "rosé" => Ok(WineType::Rose),
            "auto" => Ok(WineType::Auto),
            other => Err(Error::InvalidInput(format!("Unknown wine type: {}", other))),
        }
    }
}

/// Visual encoding parameters derived from one wine description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WineVisualizationParameters {
    /// `#RRGGBB`, one of [`palette::ALL`]
    pub base_color_hex: String,
    pub wine_type: WineType,
    /// [0.2, 1.0]
    pub acidity: f64,
    /// [0.2, 1.0]
    pub body: f64,
    pub tannin: f64,
    /// [0.2, 1.0]
    pub depth: f64,
    pub sweetness: f64,
    pub oak_intensity: f64,
    /// One of [`EFFERVESCENCE_VALUES`]
    pub effervescence: f64,
    pub mineral_intensity: f64,
    pub herbal_intensity: f64,
    pub spice_intensity: f64,
    pub fruit_citrus: f64,
    pub fruit_stone: f64,
    pub fruit_tropical: f64,
    pub fruit_red: f64,
    pub fruit_dark: f64,
    /// g/L, one of [`RESIDUAL_SUGAR_VALUES`]
    pub residual_sugar: f64,
}

impl Default for WineVisualizationParameters {
    /// The record an empty description produces
    fn default() -> Self {
        Self {
            base_color_hex: palette::WHITE_PALE.to_string(),
            wine_type: WineType::White,
            acidity: MIN_ACIDITY_BODY,
            body: MIN_ACIDITY_BODY,
            tannin: 0.0,
            depth: MIN_DEPTH,
            sweetness: 0.0,
            oak_intensity: 0.0,
            effervescence: 0.0,
            mineral_intensity: 0.0,
            herbal_intensity: 0.0,
            spice_intensity: 0.0,
            fruit_citrus: 0.0,
            fruit_stone: 0.0,
            fruit_tropical: 0.0,
            fruit_red: 0.0,
            fruit_dark: 0.0,
            residual_sugar: 6.0,
        }
    }
}

impl WineVisualizationParameters {
    /// Check every field against its documented domain
    ///
    /// Records produced by the extraction engine always pass; this guards
    /// records read back from storage or supplied by API clients.
    pub fn validate(&self) -> Result<()> {
        if !is_hex_color(&self.base_color_hex) {
            return Err(Error::InvalidInput(format!(
                "base_color_hex is not #RRGGBB: {}",
                self.base_color_hex
            )));
        }

        check_range("acidity", self.acidity, MIN_ACIDITY_BODY, 1.0)?;
        check_range("body", self.body, MIN_ACIDITY_BODY, 1.0)?;
        check_range("depth", self.depth, MIN_DEPTH, 1.0)?;

        for (name, value) in self.unit_scores() {
            check_range(name, value, 0.0, 1.0)?;
        }

        if !EFFERVESCENCE_VALUES.contains(&self.effervescence) {
            return Err(Error::InvalidInput(format!(
                "effervescence {} is not a known tier",
                self.effervescence
            )));
        }
        if !RESIDUAL_SUGAR_VALUES.contains(&self.residual_sugar) {
            return Err(Error::InvalidInput(format!(
                "residual_sugar {} is not a known tier",
                self.residual_sugar
            )));
        }

        Ok(())
    }

    /// Fields whose domain is [0.0, 1.0]
    pub fn unit_scores(&self) -> [(&'static str, f64); 11] {
        [
            ("tannin", self.tannin),
            ("sweetness", self.sweetness),
            ("oak_intensity", self.oak_intensity),
            ("mineral_intensity", self.mineral_intensity),
            ("herbal_intensity", self.herbal_intensity),
            ("spice_intensity", self.spice_intensity),
            ("fruit_citrus", self.fruit_citrus),
            ("fruit_stone", self.fruit_stone),
            ("fruit_tropical", self.fruit_tropical),
            ("fruit_red", self.fruit_red),
            ("fruit_dark", self.fruit_dark),
        ]
    }

    /// Base color as an RGB triple
    pub fn base_rgb(&self) -> Result<[u8; 3]> {
        parse_hex_color(&self.base_color_hex)
    }
}

fn check_range(name: &str, value: f64, min: f64, max: f64) -> Result<()> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(Error::InvalidInput(format!(
            "{} = {} outside [{}, {}]",
            name, value, min, max
        )))
    }
}

/// True for `#RRGGBB` strings
pub fn is_hex_color(s: &str) -> bool {
    s.len() == 7
        && s.starts_with('#')
        && s[1..].chars().all(|c| c.is_ascii_hexdigit())
}

/// Parse `#RRGGBB` into an RGB triple
pub fn parse_hex_color(s: &str) -> Result<[u8; 3]> {
    if !is_hex_color(s) {
        return Err(Error::InvalidInput(format!("Not a #RRGGBB color: {}", s)));
    }
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&s[range], 16)
            .map_err(|e| Error::InvalidInput(format!("Bad color channel in {}: {}", s, e)))
    };
    Ok([channel(1..3)?, channel(3..5)?, channel(5..7)?])
}
