//! Wine type & base color classifier
//!
//! Precedence is encoded as data: [`TYPE_RULES`] is evaluated top to bottom
//! and the first rule whose detection groups match wins. Each rule then picks
//! its shade from its own ordered shade table, falling back to the rule's
//! default color.
//!
//! Order of `TYPE_RULES`: rosé > red > amber dessert wine > white. Text with
//! no cue at all classifies as pale white.

use crate::lexicon::{self, KeywordGroup};
use crate::params::{palette, WineType};

/// One shade choice inside a type rule
#[derive(Debug, Clone, Copy)]
pub struct ShadeRule {
    pub cues: &'static KeywordGroup,
    pub color: &'static str,
}

/// One branch of the type precedence chain
#[derive(Debug, Clone, Copy)]
pub struct TypeRule {
    /// Human-readable branch name, used in logs
    pub name: &'static str,
    /// Branch matches if ANY keyword of ANY of these groups is present
    pub detect: &'static [&'static KeywordGroup],
    pub wine_type: WineType,
    /// Ordered, first match wins
    pub shades: &'static [ShadeRule],
    pub default_color: &'static str,
}

impl TypeRule {
    fn detects(&self, normalized: &str) -> bool {
        self.detect.iter().any(|g| g.matches(normalized))
    }

    fn shade(&self, normalized: &str) -> &'static str {
        self.shades
            .iter()
            .find(|s| s.cues.matches(normalized))
            .map(|s| s.color)
            .unwrap_or(self.default_color)
    }
}

pub const TYPE_RULES: &[TypeRule] = &[
    TypeRule {
        name: "rose",
        detect: &[&lexicon::ROSE_CUES],
        wine_type: WineType::Rose,
        shades: &[],
        default_color: palette::ROSE,
    },
    TypeRule {
        name: "red",
        detect: &[&lexicon::RED_GRAPES, &lexicon::RED_DESCRIPTORS],
        wine_type: WineType::Red,
        shades: &[
            ShadeRule { cues: &lexicon::SHADE_PINOT_NOIR, color: palette::RED_PINOT_NOIR },
            ShadeRule { cues: &lexicon::SHADE_ZWEIGELT, color: palette::RED_ZWEIGELT },
            ShadeRule { cues: &lexicon::SHADE_SANGIOVESE, color: palette::RED_SANGIOVESE },
            ShadeRule { cues: &lexicon::SHADE_VERY_DARK, color: palette::RED_VERY_DARK },
        ],
        default_color: palette::RED_DEFAULT,
    },
    TypeRule {
        name: "amber",
        detect: &[&lexicon::AMBER_CUES],
        wine_type: WineType::White,
        shades: &[],
        default_color: palette::AMBER,
    },
    TypeRule {
        name: "white",
        detect: &[&lexicon::WHITE_GRAPES, &lexicon::WHITE_DESCRIPTORS],
        wine_type: WineType::White,
        shades: &[
            ShadeRule { cues: &lexicon::SHADE_GREEN_TINT, color: palette::WHITE_GREEN_TINT },
            ShadeRule { cues: &lexicon::SHADE_STRAW_TINT, color: palette::WHITE_STRAW_TINT },
        ],
        default_color: palette::WHITE_PALE,
    },
];

/// Result of the type & color pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub wine_type: WineType,
    pub base_color_hex: &'static str,
    /// Name of the matching rule, `"default"` when nothing matched
    pub rule: &'static str,
}

impl Classification {
    const DEFAULT: Classification = Classification {
        wine_type: WineType::White,
        base_color_hex: palette::WHITE_PALE,
        rule: "default",
    };
}

/// Classify already-normalized (lowercased) text
pub fn classify(normalized: &str) -> Classification {
    TYPE_RULES
        .iter()
        .find(|rule| rule.detects(normalized))
        .map(|rule| Classification {
            wine_type: rule.wine_type,
            base_color_hex: rule.shade(normalized),
            rule: rule.name,
        })
        .unwrap_or(Classification::DEFAULT)
}
