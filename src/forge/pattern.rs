//! Slot templates and weighted pattern selection

use std::fmt;

use serde::{Deserialize, Serialize};

use super::sampling::{self, UniformSource, Weighted};
use crate::config::BrandConfig;

/// Slot type within a pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotKind {
    Consonant,
    Vowel,
}

impl SlotKind {
    fn from_char(ch: char) -> Option<Self> {
        match ch.to_ascii_uppercase() {
            'C' => Some(Self::Consonant),
            'V' => Some(Self::Vowel),
            _ => None,
        }
    }

    fn opposite(self) -> Self {
        match self {
            SlotKind::Consonant => SlotKind::Vowel,
            SlotKind::Vowel => SlotKind::Consonant,
        }
    }

    fn symbol(self) -> char {
        match self {
            SlotKind::Consonant => 'C',
            SlotKind::Vowel => 'V',
        }
    }
}

impl fmt::Display for SlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotKind::Consonant => write!(f, "consonant"),
            SlotKind::Vowel => write!(f, "vowel"),
        }
    }
}

#[derive(Deserialize)]
struct RawPattern {
    slots: String,
    weight: f64,
}

/// An ordered slot template (`CVCV`) with its selection weight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPattern", into = "RawPatternOut")]
pub struct Pattern {
    slots: Vec<SlotKind>,
    weight: f64,
}

#[derive(Serialize)]
struct RawPatternOut {
    slots: String,
    weight: f64,
}

impl From<Pattern> for RawPatternOut {
    fn from(pattern: Pattern) -> Self {
        Self {
            slots: pattern.label(),
            weight: pattern.weight,
        }
    }
}

impl TryFrom<RawPattern> for Pattern {
    type Error = String;

    fn try_from(raw: RawPattern) -> std::result::Result<Self, Self::Error> {
        Pattern::parse(&raw.slots, raw.weight)
    }
}

impl Pattern {
    /// Parse a template such as `"CVCCVC"` (case-insensitive)
    pub fn parse(template: &str, weight: f64) -> std::result::Result<Self, String> {
        if template.is_empty() {
            return Err("slot template is empty".to_string());
        }
        if !(weight.is_finite() && weight > 0.0) {
            return Err(format!("weight {} must be positive", weight));
        }

        let slots = template
            .chars()
            .map(|ch| SlotKind::from_char(ch).ok_or_else(|| format!("unknown slot type '{}'", ch)))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self { slots, weight })
    }

    /// Strictly alternating template of `len` slots starting with `first`
    pub fn alternating(len: usize, first: SlotKind) -> Option<Self> {
        if len == 0 {
            return None;
        }
        let slots = (0..len)
            .map(|idx| if idx % 2 == 0 { first } else { first.opposite() })
            .collect();
        Some(Self { slots, weight: 1.0 })
    }

    pub fn slots(&self) -> &[SlotKind] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Template string, e.g. `CVCV`
    pub fn label(&self) -> String {
        self.slots.iter().map(|kind| kind.symbol()).collect()
    }

    /// Whether 1-2 character units can fill this template to `length` exactly
    pub fn can_reach(&self, length: usize) -> bool {
        self.len() <= length && length <= self.len() * 2
    }

    /// Whether slots `index - 1` and `index` are both vowels
    pub fn follows_vowel_slot(&self, index: usize) -> bool {
        index > 0
            && self.slots.get(index) == Some(&SlotKind::Vowel)
            && self.slots.get(index - 1) == Some(&SlotKind::Vowel)
    }
}

impl Weighted for Pattern {
    fn weight(&self) -> f64 {
        self.weight
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Picks a pattern for a target length from the configured table
pub struct PatternSelector<'c> {
    config: &'c BrandConfig,
}

impl<'c> PatternSelector<'c> {
    pub fn new(config: &'c BrandConfig) -> Self {
        Self { config }
    }

    /// Cumulative-weight roll over the patterns for `length`.
    ///
    /// `None` means the length has no patterns; callers skip, it is not an error.
    pub fn select<S: UniformSource + ?Sized>(&self, length: usize, source: &mut S) -> Option<&'c Pattern> {
        let patterns = self.config.patterns_for(length)?;
        sampling::pick(patterns, source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forge::sampling::tests::ScriptedRolls;

    #[test]
    fn test_parse_and_label() {
        let pattern = Pattern::parse("cvCV", 0.4).unwrap();
        assert_eq!(pattern.label(), "CVCV");
        assert_eq!(pattern.len(), 4);
        assert_eq!(pattern.slots()[1], SlotKind::Vowel);

        assert!(Pattern::parse("", 1.0).is_err());
        assert!(Pattern::parse("CXV", 1.0).is_err());
        assert!(Pattern::parse("CV", 0.0).is_err());
    }

    #[test]
    fn test_alternating_template() {
        let pattern = Pattern::alternating(3, SlotKind::Vowel).unwrap();
        assert_eq!(pattern.label(), "VCV");
        assert_eq!(Pattern::alternating(1, SlotKind::Consonant).unwrap().label(), "C");
        assert!(Pattern::alternating(0, SlotKind::Consonant).is_none());
    }

    #[test]
    fn test_reachability() {
        let pattern = Pattern::parse("CVC", 1.0).unwrap();
        assert!(!pattern.can_reach(2));
        assert!(pattern.can_reach(3));
        assert!(pattern.can_reach(6));
        assert!(!pattern.can_reach(7));
    }

    #[test]
    fn test_vowel_adjacency() {
        let pattern = Pattern::parse("CVVC", 1.0).unwrap();
        assert!(!pattern.follows_vowel_slot(0));
        assert!(!pattern.follows_vowel_slot(1));
        assert!(pattern.follows_vowel_slot(2));
        assert!(!pattern.follows_vowel_slot(3));
    }

    #[test]
    fn test_serde_round_trip_uses_template_string() {
        let pattern: Pattern = serde_json::from_str(r#"{"slots": "VCV", "weight": 0.2}"#).unwrap();
        assert_eq!(pattern.label(), "VCV");
        let json = serde_json::to_string(&pattern).unwrap();
        assert!(json.contains("\"VCV\""));

        let bad = serde_json::from_str::<Pattern>(r#"{"slots": "VQV", "weight": 0.2}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_selector_rolls_and_missing_length() {
        let config = BrandConfig::builtin().unwrap();
        let selector = PatternSelector::new(&config);
        let table = config.patterns_for(4).unwrap();

        let mut low = ScriptedRolls::new(&[0.0]);
        assert_eq!(selector.select(4, &mut low), Some(&table[0]));

        let mut high = ScriptedRolls::new(&[0.999_999]);
        assert_eq!(selector.select(4, &mut high), table.last());

        assert!(selector.select(40, &mut low).is_none());
    }
}
