//! Per-slot candidate filtering: feasibility gates, hard constraints and
//! weight adjustments applied to one unit pool.

use super::pattern::Pattern;
use super::sampling::Weighted;
use crate::config::{BrandConfig, Constraints, StylePreset, Unit, UnitCategory};
use crate::types::is_vowel;

/// Build-so-far state for one recursion step
#[derive(Debug, Clone, Copy)]
pub struct SlotState<'s, 'c> {
    pub slot_index: usize,
    pub total_slots: usize,
    pub built_len: usize,
    pub target_len: usize,
    pub chosen: &'s [&'c Unit],
    pub partial: &'s str,
    pub style: &'c StylePreset,
    pub pattern: &'s Pattern,
}

impl SlotState<'_, '_> {
    pub fn is_final_slot(&self) -> bool {
        self.slot_index + 1 == self.total_slots
    }

    fn last_char(&self) -> Option<char> {
        self.partial.chars().last()
    }
}

/// A feasible unit with its adjusted weight
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedUnit<'c> {
    pub unit: &'c Unit,
    pub weight: f64,
}

impl Weighted for WeightedUnit<'_> {
    fn weight(&self) -> f64 {
        self.weight
    }
}

/// Produces the weighted candidate list for a slot
pub struct SlotFilter<'c> {
    config: &'c BrandConfig,
}

impl<'c> SlotFilter<'c> {
    pub fn new(config: &'c BrandConfig) -> Self {
        Self { config }
    }

    /// Feasible units for the slot at `state.slot_index`; empty means dead end
    pub fn candidates(&self, state: &SlotState<'_, 'c>) -> Vec<WeightedUnit<'c>> {
        let Some(&kind) = state.pattern.slots().get(state.slot_index) else {
            return Vec::new();
        };
        let vowel_run = state.pattern.follows_vowel_slot(state.slot_index);
        let previous = state.chosen.last().copied();

        let mut joined = String::with_capacity(state.target_len);
        let mut weighted = Vec::new();
        for unit in self.config.units(kind) {
            if !is_feasible(state, unit) {
                continue;
            }
            if vowel_run && !continues_vowel_run(unit, previous) {
                continue;
            }

            joined.clear();
            joined.push_str(state.partial);
            joined.push_str(&unit.text);
            if !self.passes_hard_constraints(state, unit, &joined) {
                continue;
            }

            let weight = self.adjusted_weight(state, unit, &joined);
            if weight > 0.0 {
                weighted.push(WeightedUnit { unit, weight });
            }
        }

        if weighted.is_empty() {
            tracing::trace!(
                slot = state.slot_index,
                pattern = %state.pattern,
                partial = %state.partial,
                "No feasible units for slot"
            );
        }
        weighted
    }

    fn passes_hard_constraints(&self, state: &SlotState<'_, 'c>, unit: &Unit, joined: &str) -> bool {
        if unit.text == "ck" && !state.last_char().is_some_and(is_vowel) {
            return false;
        }
        if unit.text == "qu" && state.is_final_slot() {
            return false;
        }
        if state.is_final_slot() && joined.ends_with("qu") {
            return false;
        }
        if !ck_follows_vowel(joined) {
            return false;
        }
        self.config.constraints().disallowed_in(joined).is_none()
    }

    fn adjusted_weight(&self, state: &SlotState<'_, 'c>, unit: &Unit, joined: &str) -> f64 {
        let constraints = self.config.constraints();
        let adjust = self.config.adjustments();
        let style = state.style;
        let kind = state.pattern.slots()[state.slot_index];
        let mut weight = unit.weight;

        if unit.category == UnitCategory::Single && constraints.is_rare(&unit.text) {
            weight *= style.rare_letter_penalty;
        }

        match unit.category {
            UnitCategory::Digraph | UnitCategory::RControlled => weight *= style.digraph_multiplier,
            UnitCategory::Blend => weight *= style.blend_multiplier,
            UnitCategory::Single | UnitCategory::Special => {}
        }

        let preferred = style.preferred(kind);
        if !preferred.is_empty() {
            if preferred.iter().any(|p| *p == unit.text) {
                weight *= adjust.preferred_bonus;
            } else {
                weight *= adjust.non_preferred_penalty;
            }
        }

        if state.slot_index == 0 && unit.category.is_cluster() {
            weight *= adjust.initial_cluster_bonus;
        }
        if state.slot_index > 0 && unit.category == UnitCategory::Blend {
            weight *= adjust.non_initial_blend_penalty;
        }

        if unit.text == "ng" {
            weight *= if state.is_final_slot() {
                adjust.ng_final_bonus
            } else {
                adjust.ng_non_final_penalty
            };
        }

        if state.chosen.iter().any(|chosen| chosen.text == unit.text) {
            weight *= adjust.repeat_unit_penalty;
        }

        if has_triple_run(joined) {
            return 0.0;
        }

        if let (Some(last), Some(first)) = (state.last_char(), unit.first_char()) {
            if constraints.is_awkward_pair(last, first) {
                weight *= adjust.awkward_junction_penalty;
            }
        }

        weight
    }
}

/// Remaining slots must still be able to land on the target length exactly
fn is_feasible(state: &SlotState<'_, '_>, unit: &Unit) -> bool {
    let used = state.built_len + unit.char_len();
    if used > state.target_len {
        return false;
    }
    let remaining_chars = state.target_len - used;
    let remaining_slots = state.total_slots.saturating_sub(state.slot_index + 1);
    remaining_slots <= remaining_chars && remaining_chars <= remaining_slots * 2
}

/// Back-to-back vowel slots take single vowels and never double the previous one.
///
/// Only the immediately preceding unit is inspected.
fn continues_vowel_run(unit: &Unit, previous: Option<&Unit>) -> bool {
    if unit.is_multi_char() {
        return false;
    }
    match previous {
        Some(prev) if !prev.is_multi_char() => prev.text != unit.text,
        _ => true,
    }
}

/// Every `ck` in `text` directly follows a vowel
pub fn ck_follows_vowel(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes
        .windows(2)
        .enumerate()
        .all(|(idx, pair)| pair != b"ck" || (idx > 0 && is_vowel(bytes[idx - 1] as char)))
}

/// Three identical characters in a row anywhere in `text`
pub fn has_triple_run(text: &str) -> bool {
    text.as_bytes()
        .windows(3)
        .any(|w| w[0] == w[1] && w[1] == w[2])
}

/// Whole-name check of the hard constraints; returns the reason on failure
pub fn hard_violation(name: &str, length: usize, constraints: &Constraints) -> Option<String> {
    if name.len() != length {
        return Some(format!("length {} != {}", name.len(), length));
    }
    if let Some(bad) = constraints.disallowed_in(name) {
        return Some(format!("contains '{}'", bad));
    }
    if !ck_follows_vowel(name) {
        return Some("'ck' without preceding vowel".to_string());
    }
    if name.ends_with("qu") {
        return Some("ends with 'qu'".to_string());
    }
    None
}
