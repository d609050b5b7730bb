//! Dimension scorer
//!
//! Independent numeric attributes computed from the normalized description:
//! - coverage-fraction scores (share of a keyword group found in the text)
//! - tier lookups for residual sugar and effervescence (first match wins)
//! - oak intensity with a max-combinator for stainless-steel cues

use crate::lexicon::{self, KeywordGroup};
use crate::params::{MIN_ACIDITY_BODY, MIN_DEPTH};

/// One step of an ordered, most-specific-first lookup
#[derive(Debug, Clone, Copy)]
pub struct TierRule {
    pub cues: &'static KeywordGroup,
    pub value: f64,
}

/// Residual sugar in g/L, most specific tier first
pub const RESIDUAL_SUGAR_TIERS: &[TierRule] = &[
    TierRule { cues: &lexicon::SUGAR_TBA, value: 300.0 },
    TierRule { cues: &lexicon::SUGAR_BEERENAUSLESE, value: 180.0 },
    TierRule { cues: &lexicon::SUGAR_AUSLESE, value: 80.0 },
    TierRule { cues: &lexicon::SUGAR_SPAETLESE, value: 40.0 },
    TierRule { cues: &lexicon::SUGAR_LIEBLICH, value: 25.0 },
    TierRule { cues: &lexicon::SUGAR_HALBTROCKEN, value: 12.0 },
    TierRule { cues: &lexicon::SUGAR_TROCKEN, value: 4.0 },
];

/// Residual sugar when no tier cue is present
pub const DEFAULT_RESIDUAL_SUGAR: f64 = 6.0;

/// Effervescence, most specific beverage class first
pub const EFFERVESCENCE_TIERS: &[TierRule] = &[
    TierRule { cues: &lexicon::FIZZ_CHAMPAGNE, value: 1.0 },
    TierRule { cues: &lexicon::FIZZ_SPARKLING, value: 0.8 },
    TierRule { cues: &lexicon::FIZZ_SEMI, value: 0.5 },
    TierRule { cues: &lexicon::FIZZ_LIGHT, value: 0.3 },
];

pub const OAK_BARREL_INTENSITY: f64 = 0.7;
pub const OAK_STEEL_FLOOR: f64 = 0.2;

/// Fraction of `group` keywords present in `normalized`, capped at 1.0
pub fn coverage(normalized: &str, group: &KeywordGroup) -> f64 {
    let hits = group.hits(normalized) as f64;
    (hits / group.len().max(1) as f64).min(1.0)
}

/// First matching tier value, or `default`
pub fn tier_lookup(normalized: &str, tiers: &[TierRule], default: f64) -> f64 {
    tiers
        .iter()
        .find(|t| t.cues.matches(normalized))
        .map(|t| t.value)
        .unwrap_or(default)
}

/// Barrel cues set 0.7; steel cues raise to at least 0.2 afterwards
pub fn oak_intensity(normalized: &str) -> f64 {
    let mut oak = 0.0;
    if lexicon::OAK_BARREL.matches(normalized) {
        oak = OAK_BARREL_INTENSITY;
    }
    if lexicon::OAK_STEEL.matches(normalized) {
        oak = f64::max(oak, OAK_STEEL_FLOOR);
    }
    oak
}

/// All scorer outputs for one description
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DimensionScores {
    pub acidity: f64,
    pub body: f64,
    pub tannin: f64,
    pub depth: f64,
    pub sweetness: f64,
    pub oak_intensity: f64,
    pub effervescence: f64,
    pub mineral_intensity: f64,
    pub herbal_intensity: f64,
    pub spice_intensity: f64,
    pub fruit_citrus: f64,
    pub fruit_stone: f64,
    pub fruit_tropical: f64,
    pub fruit_red: f64,
    pub fruit_dark: f64,
    pub residual_sugar: f64,
}

/// Score already-normalized (lowercased) text
pub fn score(normalized: &str) -> DimensionScores {
    let cov = |group: &KeywordGroup| coverage(normalized, group);

    DimensionScores {
        acidity: (cov(&lexicon::ACIDITY) + 0.1).clamp(MIN_ACIDITY_BODY, 1.0),
        body: (cov(&lexicon::BODY) + 0.1).clamp(MIN_ACIDITY_BODY, 1.0),
        tannin: cov(&lexicon::TANNIN),
        depth: cov(&lexicon::DEPTH).max(MIN_DEPTH),
        sweetness: cov(&lexicon::SWEETNESS),
        oak_intensity: oak_intensity(normalized),
        effervescence: tier_lookup(normalized, EFFERVESCENCE_TIERS, 0.0),
        mineral_intensity: cov(&lexicon::MINERAL),
        herbal_intensity: cov(&lexicon::HERBAL),
        spice_intensity: cov(&lexicon::SPICE),
        fruit_citrus: cov(&lexicon::FRUIT_CITRUS),
        fruit_stone: cov(&lexicon::FRUIT_STONE),
        fruit_tropical: cov(&lexicon::FRUIT_TROPICAL),
        fruit_red: cov(&lexicon::FRUIT_RED),
        fruit_dark: cov(&lexicon::FRUIT_DARK),
        residual_sugar: tier_lookup(normalized, RESIDUAL_SUGAR_TIERS, DEFAULT_RESIDUAL_SUGAR),
    }
}
