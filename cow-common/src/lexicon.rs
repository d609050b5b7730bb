//! Keyword lexicons for wine description analysis
//!
//! Every cue the extraction engine looks for lives here as a named, immutable
//! keyword group. Keywords are lowercase and matched as substrings of the
//! case-folded description, so a keyword also matches inside longer words
//! ("tannin" matches "tanninen").
//!
//! The vocabulary is mostly German with common loanwords (champagne, oak,
//! cherry) because the tasting notes the tool was built for are German.

use once_cell::sync::Lazy;
use std::collections::BTreeMap;

/// A named, fixed set of lowercase substrings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordGroup {
    /// Stable identifier, e.g. `"fruit_red"` or `"sugar_spaetlese"`
    pub name: &'static str,
    /// Lowercase keywords, matched by substring containment
    pub keywords: &'static [&'static str],
}

impl KeywordGroup {
    /// True if any keyword occurs in `normalized`
    ///
    /// `normalized` must already be lowercased.
    pub fn matches(&self, normalized: &str) -> bool {
        self.keywords.iter().any(|k| normalized.contains(k))
    }

    /// Number of distinct keywords that occur in `normalized`
    ///
    /// Repeated occurrences of one keyword count once.
    pub fn hits(&self, normalized: &str) -> usize {
        self.keywords.iter().filter(|k| normalized.contains(*k)).count()
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}

macro_rules! keyword_group {
    ($ident:ident, $name:literal, [$($kw:literal),* $(,)?]) => {
        pub const $ident: KeywordGroup = KeywordGroup {
            name: $name,
            keywords: &[$($kw),*],
        };
    };
}

// ============================================================================
// Wine type detection
// ============================================================================

keyword_group!(ROSE_CUES, "rose_cues", ["rosé", "rose ", "lachsrosa", "rosa"]);

keyword_group!(RED_GRAPES, "red_grapes", [
    "pinot noir", "merlot", "cabernet", "blaufränkisch", "zweigelt",
    "sangiovese", "nebbiolo", "tempranillo", "syrah", "shiraz",
    "grenache", "mourvèdre", "tignanello", "st. laurent",
]);

keyword_group!(RED_DESCRIPTORS, "red_descriptors", [
    "rubinrot", "purpur", "violett", "dunkelrot", "schwarz-violett",
    "rubin", "granat", "tiefdunkel", "kirschrot",
]);

keyword_group!(AMBER_CUES, "amber_cues", [
    "trockenbeerenauslese", "beerenauslese", "eiswein", "auslese",
    "bernstein", "amber", "goldgelb mit bernstein",
]);

keyword_group!(WHITE_GRAPES, "white_grapes", [
    "chardonnay", "riesling", "sauvignon blanc", "grüner veltliner",
    "weißburgunder", "pinot grigio", "pinot gris", "welschriesling",
    "gewürztraminer", "muskateller", "grauburgunder", "albariño",
]);

keyword_group!(WHITE_DESCRIPTORS, "white_descriptors", [
    "zitronengelb", "grüngelb", "strohgelb", "goldgelb",
    "blassgelb", "hellgelb", "grünliche reflexe",
]);

// ============================================================================
// Shade selection
// ============================================================================

keyword_group!(SHADE_PINOT_NOIR, "shade_pinot_noir", ["pinot noir"]);
keyword_group!(SHADE_ZWEIGELT, "shade_zweigelt", ["zweigelt"]);
keyword_group!(SHADE_SANGIOVESE, "shade_sangiovese", ["tignanello", "sangiovese"]);
keyword_group!(SHADE_VERY_DARK, "shade_very_dark", [
    "tiefdunkel", "schwarz", "dicht", "ducru", "château",
]);
keyword_group!(SHADE_GREEN_TINT, "shade_green_tint", [
    "grüngelb", "grünliche reflexe", "sauvignon",
]);
keyword_group!(SHADE_STRAW_TINT, "shade_straw_tint", [
    "strohgelb", "weißburgunder", "pinot grigio",
]);

// ============================================================================
// Dimension scores (coverage fraction)
// ============================================================================

keyword_group!(ACIDITY, "acidity", [
    "frisch", "säure", "frische", "zitrus", "lime", "limette", "knackig", "rassig",
]);
keyword_group!(BODY, "body", [
    "voll", "kräftig", "opulent", "cremig", "dicht", "schmelz", "struktur",
]);
keyword_group!(TANNIN, "tannin", [
    "tannin", "gerbstoff", "griffig", "feinkörnig", "adstringierend", "gerbstoffe",
]);
keyword_group!(DEPTH, "depth", [
    "komplex", "tiefe", "vielschichtig", "lang", "nachhall", "intensiv",
]);
keyword_group!(SWEETNESS, "sweetness", [
    "lieblich", "süß", "süss", "edelsüß", "spätlese", "beerenauslese", "eiswein", "honig",
]);
keyword_group!(MINERAL, "mineral", [
    "mineral", "mineralisch", "schiefer", "kreide", "steinig", "salzig",
]);
keyword_group!(HERBAL, "herbal", [
    "gras", "kräuter", "heu", "heublume", "minze", "krautig", "floral", "blume",
]);
keyword_group!(SPICE, "spice", [
    "gewürz", "pfeffer", "zimt", "nelke", "muskat", "würzig",
]);

keyword_group!(FRUIT_CITRUS, "fruit_citrus", [
    "zitrus", "zitrone", "limette", "grapefruit", "lime",
]);
keyword_group!(FRUIT_STONE, "fruit_stone", [
    "pfirsich", "aprikose", "nektarine", "marille",
]);
keyword_group!(FRUIT_TROPICAL, "fruit_tropical", [
    "ananas", "mango", "maracuja", "passionsfrucht", "lychee", "litschi",
]);
keyword_group!(FRUIT_RED, "fruit_red", [
    "erdbeere", "himbeere", "kirsche", "rote beeren", "strawberry", "raspberry", "cherry",
]);
keyword_group!(FRUIT_DARK, "fruit_dark", [
    "blaubeere", "heidelbeere", "brombeere", "schwarze johannisbeere",
    "pflaume", "plum", "blackberry",
]);

// ============================================================================
// Residual sugar tiers (most specific first)
// ============================================================================

keyword_group!(SUGAR_TBA, "sugar_trockenbeerenauslese", ["trockenbeerenauslese", "tba"]);
keyword_group!(SUGAR_BEERENAUSLESE, "sugar_beerenauslese", ["beerenauslese", "eiswein"]);
keyword_group!(SUGAR_AUSLESE, "sugar_auslese", ["auslese"]);
keyword_group!(SUGAR_SPAETLESE, "sugar_spaetlese", ["spätlese"]);
keyword_group!(SUGAR_LIEBLICH, "sugar_lieblich", [
    "lieblich", "feinherb", "restsüß", "restzucker",
]);
keyword_group!(SUGAR_HALBTROCKEN, "sugar_halbtrocken", ["halbtrocken", "off-dry"]);
keyword_group!(SUGAR_TROCKEN, "sugar_trocken", ["trocken", "dry", "brut"]);

// ============================================================================
// Oak / vinification
// ============================================================================

keyword_group!(OAK_BARREL, "oak_barrel", [
    "barrique", "holzfass", "eichenfass", "fassausbau", "oak",
]);
keyword_group!(OAK_STEEL, "oak_steel", ["stahltank", "edelstahl", "stainless steel"]);

// ============================================================================
// Effervescence tiers (most specific first)
// ============================================================================

keyword_group!(FIZZ_CHAMPAGNE, "fizz_champagne", ["champagner", "champagne"]);
keyword_group!(FIZZ_SPARKLING, "fizz_sparkling", [
    "schaumwein", "sekt", "crémant", "cava", "sparkling", "perlage",
]);
keyword_group!(FIZZ_SEMI, "fizz_semi_sparkling", [
    "perlwein", "frizzante", "prosecco", "petillant",
]);
keyword_group!(FIZZ_LIGHT, "fizz_lightly_sparkling", [
    "leicht perlend", "spritzig", "prickelnd",
]);

/// Every keyword group, in declaration order
pub const ALL_GROUPS: &[KeywordGroup] = &[
    ROSE_CUES, RED_GRAPES, RED_DESCRIPTORS, AMBER_CUES, WHITE_GRAPES, WHITE_DESCRIPTORS,
    SHADE_PINOT_NOIR, SHADE_ZWEIGELT, SHADE_SANGIOVESE, SHADE_VERY_DARK,
    SHADE_GREEN_TINT, SHADE_STRAW_TINT,
    ACIDITY, BODY, TANNIN, DEPTH, SWEETNESS, MINERAL, HERBAL, SPICE,
    FRUIT_CITRUS, FRUIT_STONE, FRUIT_TROPICAL, FRUIT_RED, FRUIT_DARK,
    SUGAR_TBA, SUGAR_BEERENAUSLESE, SUGAR_AUSLESE, SUGAR_SPAETLESE, SUGAR_LIEBLICH,
    SUGAR_HALBTROCKEN, SUGAR_TROCKEN,
    OAK_BARREL, OAK_STEEL,
    FIZZ_CHAMPAGNE, FIZZ_SPARKLING, FIZZ_SEMI, FIZZ_LIGHT,
];

static REGISTRY: Lazy<BTreeMap<&'static str, &'static KeywordGroup>> = Lazy::new(|| {
    ALL_GROUPS.iter().map(|g| (g.name, g)).collect()
});

/// All keyword groups
pub fn all() -> &'static [KeywordGroup] {
    ALL_GROUPS
}

/// Look up a keyword group by name
pub fn group(name: &str) -> Option<&'static KeywordGroup> {
    REGISTRY.get(name).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_group_names_unique() {
        let names: HashSet<_> = ALL_GROUPS.iter().map(|g| g.name).collect();
        assert_eq!(names.len(), ALL_GROUPS.len());
    }

    #[test]
    fn test_keywords_are_lowercase_and_nonempty() {
        for group in all() {
            assert!(!group.is_empty(), "{} has no keywords", group.name);
            for kw in group.keywords {
                assert!(!kw.is_empty(), "{} has an empty keyword", group.name);
                assert_eq!(*kw, kw.to_lowercase(), "{}: '{}' not lowercase", group.name, kw);
            }
        }
    }

    #[test]
    fn test_registry_lookup() {
        assert_eq!(group("fruit_red"), Some(&FRUIT_RED));
        assert_eq!(group("oak_steel").map(|g| g.len()), Some(3));
        assert!(group("does_not_exist").is_none());
    }

    #[test]
    fn test_matches_inside_words() {
        assert!(TANNIN.matches("feine tanninen"));
        assert!(DEPTH.matches("ein langer abgang"));
        assert!(!TANNIN.matches(""));
    }

    #[test]
    fn test_hits_counts_each_keyword_once() {
        assert_eq!(FRUIT_RED.hits("kirsche, kirsche und nochmal kirsche"), 1);
        // "gerbstoff" also matches inside "gerbstoffe"
        assert_eq!(TANNIN.hits("gerbstoffe"), 2);
    }

    #[test]
    fn test_rose_cue_needs_trailing_space() {
        assert!(ROSE_CUES.matches("ein rose aus der provence"));
        assert!(!ROSE_CUES.matches("rosengarten"));
    }
}
