//! Configuration store: unit inventories, pattern tables, constraints,
//! style presets and scoring parameters.
//!
//! A configuration is parsed and validated once, then only read. Every
//! component borrows it explicitly; [`BrandConfig::shared`] hands out a
//! process-wide copy of the builtin configuration for front-ends that do
//! not load their own.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::config_error;
use crate::error::{BrandForgeError, Result};
use crate::forge::{Pattern, SlotKind};

/// Default configuration compiled into the binary
const BUILTIN_CONFIG: &str = include_str!("default.json");

static SHARED: Mutex<Option<Arc<BrandConfig>>> = parking_lot::const_mutex(None);

/// Phonetic family of a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitCategory {
    Single,
    Digraph,
    Blend,
    RControlled,
    Special,
}

impl UnitCategory {
    /// Digraphs and blends, the clusters that earn the initial-position bonus
    pub fn is_cluster(self) -> bool {
        matches!(self, UnitCategory::Digraph | UnitCategory::Blend)
    }
}

/// A 1-2 character phonetic chunk occupying one slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub text: String,
    pub weight: f64,
    pub category: UnitCategory,
}

impl Unit {
    pub fn char_len(&self) -> usize {
        self.text.len()
    }

    pub fn is_multi_char(&self) -> bool {
        self.char_len() > 1
    }

    pub fn first_char(&self) -> Option<char> {
        self.text.chars().next()
    }
}

/// Consonant and vowel inventories
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitPools {
    pub consonants: Vec<Unit>,
    pub vowels: Vec<Unit>,
}

impl UnitPools {
    pub fn pool(&self, kind: SlotKind) -> &[Unit] {
        match kind {
            SlotKind::Consonant => &self.consonants,
            SlotKind::Vowel => &self.vowels,
        }
    }
}

/// Multipliers applied by the slot filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightAdjustments {
    pub preferred_bonus: f64,
    pub non_preferred_penalty: f64,
    pub initial_cluster_bonus: f64,
    pub non_initial_blend_penalty: f64,
    pub ng_final_bonus: f64,
    pub ng_non_final_penalty: f64,
    pub repeat_unit_penalty: f64,
    pub awkward_junction_penalty: f64,
}

impl Default for WeightAdjustments {
    fn default() -> Self {
        Self {
            preferred_bonus: 1.5,
            non_preferred_penalty: 0.7,
            initial_cluster_bonus: 1.3,
            non_initial_blend_penalty: 0.6,
            ng_final_bonus: 1.5,
            ng_non_final_penalty: 0.4,
            repeat_unit_penalty: 0.35,
            awkward_junction_penalty: 0.15,
        }
    }
}

/// Hard rejection lists and soft weight penalties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constraints {
    /// Substrings no accepted name may contain
    pub disallowed_substrings: Vec<String>,
    /// Two-letter junctions that are heavily down-weighted
    pub awkward_pairs: Vec<String>,
    /// Single letters subject to the style's rare-letter penalty
    pub rare_letters: Vec<String>,
    #[serde(default)]
    pub adjustments: WeightAdjustments,
}

impl Constraints {
    /// First disallowed substring contained in `text`
    pub fn disallowed_in(&self, text: &str) -> Option<&str> {
        self.disallowed_substrings
            .iter()
            .find(|bad| text.contains(bad.as_str()))
            .map(String::as_str)
    }

    pub fn is_awkward_pair(&self, first: char, second: char) -> bool {
        self.awkward_pairs.iter().any(|pair| {
            let mut chars = pair.chars();
            chars.next() == Some(first) && chars.next() == Some(second)
        })
    }

    pub fn is_rare(&self, text: &str) -> bool {
        self.rare_letters.iter().any(|letter| letter == text)
    }
}

/// Bounds on the randomized search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchLimits {
    /// Weighted draws tried per slot before backtracking
    pub max_trials_per_slot: usize,
    /// Recursion steps allowed per build
    pub max_build_attempts: usize,
    /// Pool target is `count * oversample_factor`...
    pub oversample_factor: usize,
    /// ...capped at this size
    pub max_pool_size: usize,
    /// Build attempts allowed per pool slot
    pub attempt_multiplier: usize,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            max_trials_per_slot: 8,
            max_build_attempts: 50,
            oversample_factor: 3,
            max_pool_size: 3000,
            attempt_multiplier: 10,
        }
    }
}

impl SearchLimits {
    /// Raw pool size to aim for when `count` names are requested
    pub fn pool_target(&self, count: usize) -> usize {
        count.saturating_mul(self.oversample_factor).min(self.max_pool_size)
    }

    /// Upper bound on builder invocations for a pool target
    pub fn attempt_budget(&self, pool_target: usize) -> usize {
        pool_target.saturating_mul(self.attempt_multiplier)
    }
}

/// Named bundle of weighting multipliers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StylePreset {
    #[serde(default)]
    pub description: String,
    pub rare_letter_penalty: f64,
    pub digraph_multiplier: f64,
    pub blend_multiplier: f64,
    #[serde(default)]
    pub preferred_consonants: Vec<String>,
    #[serde(default)]
    pub preferred_vowels: Vec<String>,
}

impl StylePreset {
    pub fn preferred(&self, kind: SlotKind) -> &[String] {
        match kind {
            SlotKind::Consonant => &self.preferred_consonants,
            SlotKind::Vowel => &self.preferred_vowels,
        }
    }
}

/// Weights of the seven score dimensions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub brevity: f64,
    pub pronounceability: f64,
    pub visual_balance: f64,
    pub memorability: f64,
    pub distinctiveness: f64,
    pub trademark_safety: f64,
    pub domain_premium: f64,
}

impl ScoreWeights {
    pub fn as_array(&self) -> [f64; 7] {
        [
            self.brevity,
            self.pronounceability,
            self.visual_balance,
            self.memorability,
            self.distinctiveness,
            self.trademark_safety,
            self.domain_premium,
        ]
    }

    pub fn total(&self) -> f64 {
        self.as_array().iter().sum()
    }
}

/// Parameters of the scorer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub weights: ScoreWeights,
    pub brevity_table: BTreeMap<usize, f64>,
    pub brevity_decay_per_char: f64,
    pub premium_table: BTreeMap<usize, f64>,
    pub premium_decay_per_char: f64,
    pub premium_bonus: f64,
    /// Inclusive `[min, max]` vowel share considered ideal
    pub ideal_vowel_ratio: [f64; 2],
    pub awkward_sequences: Vec<String>,
    pub common_prefixes: Vec<String>,
    pub common_suffixes: Vec<String>,
    /// Shannon entropy (bits per character) below which names read as repetitive
    pub min_entropy: f64,
    pub known_brands: Vec<String>,
}

/// Immutable engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandConfig {
    units: UnitPools,
    patterns: BTreeMap<usize, Vec<Pattern>>,
    constraints: Constraints,
    #[serde(default)]
    search: SearchLimits,
    default_style: String,
    styles: BTreeMap<String, StylePreset>,
    scoring: ScoringConfig,
}

impl BrandConfig {
    /// Parse and validate a JSON configuration
    pub fn from_json_str(content: &str) -> Result<Self> {
        let config: BrandConfig = serde_json::from_str(content)
            .map_err(|e| config_error!("malformed configuration: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            BrandForgeError::io(e.to_string(), Some(path.to_string_lossy().to_string()))
        })?;
        let config = Self::from_json_str(&content)?;

        tracing::debug!(path = %path.display(), styles = config.styles.len(), "Loaded configuration");
        Ok(config)
    }

    /// The configuration compiled into the crate
    pub fn builtin() -> Result<Self> {
        Self::from_json_str(BUILTIN_CONFIG)
    }

    /// Raw JSON of the builtin configuration, a starting point for custom files
    pub fn builtin_json() -> &'static str {
        BUILTIN_CONFIG
    }

    /// Process-wide builtin configuration, built on first use
    pub fn shared() -> Result<Arc<Self>> {
        let mut slot = SHARED.lock();
        if let Some(config) = slot.as_ref() {
            return Ok(Arc::clone(config));
        }

        let config = Arc::new(Self::builtin()?);
        *slot = Some(Arc::clone(&config));
        Ok(config)
    }

    pub fn units(&self, kind: SlotKind) -> &[Unit] {
        self.units.pool(kind)
    }

    /// Patterns for a target length; `None` when the length has none
    pub fn patterns_for(&self, length: usize) -> Option<&[Pattern]> {
        self.patterns
            .get(&length)
            .map(Vec::as_slice)
            .filter(|patterns| !patterns.is_empty())
    }

    /// Lengths that have a pattern table
    pub fn lengths(&self) -> impl Iterator<Item = usize> + '_ {
        self.patterns.keys().copied()
    }

    pub fn constraints(&self) -> &Constraints {
        &self.constraints
    }

    pub fn adjustments(&self) -> &WeightAdjustments {
        &self.constraints.adjustments
    }

    pub fn search(&self) -> &SearchLimits {
        &self.search
    }

    pub fn style(&self, name: &str) -> Option<&StylePreset> {
        self.styles.get(name)
    }

    pub fn style_names(&self) -> Vec<&str> {
        self.styles.keys().map(String::as_str).collect()
    }

    pub fn default_style(&self) -> &str {
        &self.default_style
    }

    pub fn scoring(&self) -> &ScoringConfig {
        &self.scoring
    }

    fn validate(&self) -> Result<()> {
        validate_pool("consonants", &self.units.consonants)?;
        validate_pool("vowels", &self.units.vowels)?;

        if self.patterns.is_empty() {
            return Err(config_error!("pattern table is empty"));
        }
        for (length, patterns) in &self.patterns {
            if patterns.is_empty() {
                return Err(config_error!("no patterns listed for length {}", length));
            }
        }

        if self.styles.is_empty() {
            return Err(config_error!("no style presets defined"));
        }
        if !self.styles.contains_key(&self.default_style) {
            return Err(config_error!("default style '{}' is not defined", self.default_style));
        }
        for (name, style) in &self.styles {
            let multipliers = [style.rare_letter_penalty, style.digraph_multiplier, style.blend_multiplier];
            if multipliers.iter().any(|m| !m.is_finite() || *m < 0.0) {
                return Err(config_error!("style '{}' has a negative or non-finite multiplier", name));
            }
        }

        let search = &self.search;
        if search.max_trials_per_slot == 0
            || search.max_build_attempts == 0
            || search.oversample_factor == 0
            || search.max_pool_size == 0
            || search.attempt_multiplier == 0
        {
            return Err(config_error!("search limits must all be positive"));
        }

        self.validate_scoring()
    }

    fn validate_scoring(&self) -> Result<()> {
        let scoring = &self.scoring;
        let weights = scoring.weights.as_array();
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(config_error!("scoring weights must be non-negative"));
        }
        let total = scoring.weights.total();
        if (total - 1.0).abs() > 1e-6 {
            return Err(config_error!("scoring weights sum to {:.4}, expected 1.0", total));
        }

        if scoring.brevity_table.is_empty() {
            return Err(config_error!("brevity lookup table is empty"));
        }
        if scoring.premium_table.is_empty() {
            return Err(config_error!("domain premium lookup table is empty"));
        }

        let [low, high] = scoring.ideal_vowel_ratio;
        if !(0.0..=1.0).contains(&low) || !(0.0..=1.0).contains(&high) || low > high {
            return Err(config_error!("ideal vowel ratio [{}, {}] is not a band within [0, 1]", low, high));
        }

        Ok(())
    }
}

fn validate_pool(name: &str, units: &[Unit]) -> Result<()> {
    if units.is_empty() {
        return Err(config_error!("{} pool is empty", name));
    }
    for unit in units {
        let well_formed = (1..=2).contains(&unit.text.len())
            && unit.text.chars().all(|ch| ch.is_ascii_lowercase());
        if !well_formed {
            return Err(config_error!(
                "{} unit '{}' must be 1-2 lowercase ASCII letters",
                name,
                unit.text
            ));
        }
        if !(unit.weight.is_finite() && unit.weight > 0.0) {
            return Err(config_error!("{} unit '{}' has non-positive weight", name, unit.text));
        }
    }
    Ok(())
}
