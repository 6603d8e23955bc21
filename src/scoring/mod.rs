//! Brandability scoring
//!
//! A pure function of `(name, units, pattern)`. Seven dimension scores, each
//! in `[0, 100]`, combine into a weighted overall score.

mod dimensions;

use serde::{Deserialize, Serialize};

use crate::config::{BrandConfig, ScoringConfig};

/// Seven dimension scores plus the weighted overall
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub brevity: f64,
    pub pronounceability: f64,
    pub visual_balance: f64,
    pub memorability: f64,
    pub distinctiveness: f64,
    pub trademark_safety: f64,
    pub domain_premium: f64,
    pub overall: u8,
}

impl ScoreBreakdown {
    /// Dimension names and values in weight order
    pub fn dimensions(&self) -> [(&'static str, f64); 7] {
        [
            ("brevity", self.brevity),
            ("pronounceability", self.pronounceability),
            ("visual_balance", self.visual_balance),
            ("memorability", self.memorability),
            ("distinctiveness", self.distinctiveness),
            ("trademark_safety", self.trademark_safety),
            ("domain_premium", self.domain_premium),
        ]
    }
}

/// Scores names against one configuration's tables and weights
#[derive(Debug, Clone, Copy)]
pub struct Scorer<'c> {
    config: &'c ScoringConfig,
}

impl<'c> Scorer<'c> {
    pub fn new(config: &'c BrandConfig) -> Self {
        Self {
            config: config.scoring(),
        }
    }

    /// Score a name built from `units` with slot template `pattern` (e.g. `"CVCV"`).
    ///
    /// `units` and `pattern` may be empty when a bare name is scored; the
    /// unit-based bonuses are then simply not awarded.
    pub fn score<U: AsRef<str>>(&self, name: &str, units: &[U], pattern: &str) -> ScoreBreakdown {
        let name = name.trim().to_lowercase();
        let chars: Vec<char> = name.chars().collect();
        let multi = units
            .iter()
            .filter(|unit| unit.as_ref().chars().count() > 1)
            .count();
        let alternating = is_alternating(pattern);

        let brevity = dimensions::brevity(&chars, self.config);
        let pronounceability = dimensions::pronounceability(&chars, multi, self.config);
        let visual_balance = dimensions::visual_balance(&chars);
        let memorability = dimensions::memorability(&chars, multi, alternating);
        let distinctiveness = dimensions::distinctiveness(&name, &chars, self.config);
        let trademark_safety = dimensions::trademark_safety(&name, &chars, self.config);
        let domain_premium = dimensions::domain_premium(&chars, self.config);

        let values = [
            brevity,
            pronounceability,
            visual_balance,
            memorability,
            distinctiveness,
            trademark_safety,
            domain_premium,
        ];
        let weighted: f64 = self
            .config
            .weights
            .as_array()
            .iter()
            .zip(values.iter())
            .map(|(weight, value)| weight * value)
            .sum();
        let overall = if weighted.is_finite() {
            weighted.clamp(0.0, 100.0).round() as u8
        } else {
            0
        };

        ScoreBreakdown {
            brevity,
            pronounceability,
            visual_balance,
            memorability,
            distinctiveness,
            trademark_safety,
            domain_premium,
            overall,
        }
    }
}

/// Strict consonant/vowel alternation in the slot template
fn is_alternating(pattern: &str) -> bool {
    let slots: Vec<char> = pattern.chars().map(|c| c.to_ascii_uppercase()).collect();
    !slots.is_empty() && slots.windows(2).all(|w| w[0] != w[1])
}
