//! Backtracking candidate builder
//!
//! Fills the slots of one pattern left to right. Each slot tries a bounded
//! number of weighted draws without replacement; a shared attempt counter
//! caps the total number of recursion steps per build, so the search is
//! deliberately incomplete and always terminates.

use serde::{Deserialize, Serialize};

use super::pattern::{Pattern, SlotKind};
use super::sampling::{self, UniformSource};
use super::slot::{SlotFilter, SlotState};
use crate::config::{BrandConfig, StylePreset, Unit};
use crate::types::is_vowel;

/// A completed name with the units and pattern that produced it
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Candidate {
    pub name: String,
    pub units: Vec<String>,
    pub pattern: String,
}

/// Fixed text a name must start and end with.
///
/// The builder fills only the body between the two; whole-name hard
/// constraints are still checked on the joined result by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Affixes<'a> {
    pub prefix: &'a str,
    pub suffix: &'a str,
}

impl<'a> Affixes<'a> {
    pub fn new(prefix: Option<&'a str>, suffix: Option<&'a str>) -> Self {
        Self {
            prefix: prefix.unwrap_or_default(),
            suffix: suffix.unwrap_or_default(),
        }
    }

    pub fn len(&self) -> usize {
        self.prefix.len() + self.suffix.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefix.is_empty() && self.suffix.is_empty()
    }

    /// Characters left for generated units, `None` if the affixes overflow `length`
    pub fn body_len(&self, length: usize) -> Option<usize> {
        length.checked_sub(self.len())
    }

    /// Slot kind that alternates with the end of the prefix
    pub fn next_slot_kind(&self) -> SlotKind {
        match self.prefix.chars().last() {
            Some(ch) if !is_vowel(ch) => SlotKind::Vowel,
            _ => SlotKind::Consonant,
        }
    }

    /// Append the suffix to a filled `prefix + body`; each affix stays one whole unit
    fn wrap(&self, mut filled: String, units: Vec<String>) -> (String, Vec<String>) {
        filled.push_str(self.suffix);

        let mut all = Vec::with_capacity(units.len() + 2);
        if !self.prefix.is_empty() {
            all.push(self.prefix.to_string());
        }
        all.extend(units);
        if !self.suffix.is_empty() {
            all.push(self.suffix.to_string());
        }
        (filled, all)
    }
}

/// Mutable state threaded through one build
struct BuildFrame<'c> {
    chosen: Vec<&'c Unit>,
    partial: String,
    attempts: usize,
}

pub struct CandidateBuilder<'c> {
    filter: SlotFilter<'c>,
    max_trials_per_slot: usize,
    max_attempts: usize,
}

impl<'c> CandidateBuilder<'c> {
    /// Builder using the configured search limits
    pub fn new(config: &'c BrandConfig) -> Self {
        let search = config.search();
        Self {
            filter: SlotFilter::new(config),
            max_trials_per_slot: search.max_trials_per_slot,
            max_attempts: search.max_build_attempts,
        }
    }

    /// Override the per-slot trial cap and the attempt budget
    pub fn with_limits(mut self, max_trials_per_slot: usize, max_attempts: usize) -> Self {
        self.max_trials_per_slot = max_trials_per_slot.max(1);
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Try to fill `pattern` to exactly `target_len` characters
    pub fn build<S: UniformSource + ?Sized>(
        &self,
        pattern: &Pattern,
        target_len: usize,
        style: &'c StylePreset,
        source: &mut S,
    ) -> Option<Candidate> {
        self.build_with_affixes(pattern, target_len, style, Affixes::default(), source)
    }

    /// Like [`build`](Self::build), with `pattern` filling only the body
    /// between `affixes`. The prefix is part of the partial string from the
    /// first slot on, so slot constraints see it.
    pub fn build_with_affixes<S: UniformSource + ?Sized>(
        &self,
        pattern: &Pattern,
        target_len: usize,
        style: &'c StylePreset,
        affixes: Affixes<'_>,
        source: &mut S,
    ) -> Option<Candidate> {
        let body_len = affixes.body_len(target_len)?;
        if !pattern.can_reach(body_len) {
            return None;
        }
        let fill_len = affixes.prefix.len() + body_len;

        let mut frame = BuildFrame {
            chosen: Vec::with_capacity(pattern.len()),
            partial: String::with_capacity(target_len),
            attempts: 0,
        };
        frame.partial.push_str(affixes.prefix);

        if self.fill(pattern, fill_len, style, 0, &mut frame, source) {
            let units = frame.chosen.iter().map(|unit| unit.text.clone()).collect();
            let (name, units) = affixes.wrap(frame.partial, units);
            Some(Candidate {
                name,
                units,
                pattern: pattern.label(),
            })
        } else {
            tracing::debug!(
                pattern = %pattern,
                target_len,
                attempts = frame.attempts,
                "Build abandoned"
            );
            None
        }
    }

    /// Recursion depth is bounded by the slot count, breadth by the attempt budget
    fn fill<S: UniformSource + ?Sized>(
        &self,
        pattern: &Pattern,
        target_len: usize,
        style: &'c StylePreset,
        slot_index: usize,
        frame: &mut BuildFrame<'c>,
        source: &mut S,
    ) -> bool {
        if frame.attempts >= self.max_attempts {
            return false;
        }
        frame.attempts += 1;

        if slot_index == pattern.len() {
            return frame.partial.len() == target_len;
        }

        let mut pool = {
            let state = SlotState {
                slot_index,
                total_slots: pattern.len(),
                built_len: frame.partial.len(),
                target_len,
                chosen: &frame.chosen,
                partial: &frame.partial,
                style,
                pattern,
            };
            self.filter.candidates(&state)
        };
        if pool.is_empty() {
            return false;
        }

        let trials = self.max_trials_per_slot.min(pool.len());
        for _ in 0..trials {
            let Some(choice) = sampling::take(&mut pool, source) else {
                break;
            };

            let mark = frame.partial.len();
            frame.chosen.push(choice.unit);
            frame.partial.push_str(&choice.unit.text);

            if self.fill(pattern, target_len, style, slot_index + 1, frame, source) {
                return true;
            }

            frame.chosen.pop();
            frame.partial.truncate(mark);

            if frame.attempts >= self.max_attempts {
                break;
            }
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forge::sampling::tests::ScriptedRolls;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn config() -> BrandConfig {
        BrandConfig::builtin().unwrap()
    }

    #[test]
    fn test_build_hits_exact_length() {
        let config = config();
        let builder = CandidateBuilder::new(&config);
        let style = config.style("balanced").unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        for (template, length) in [("CVCV", 4), ("CVC", 4), ("CVCVC", 7), ("CVCVCVCVCVCV", 12)] {
            let pattern = Pattern::parse(template, 1.0).unwrap();
            let mut built = 0;
            for _ in 0..20 {
                if let Some(candidate) = builder.build(&pattern, length, style, &mut rng) {
                    assert_eq!(candidate.name.len(), length);
                    assert_eq!(candidate.units.len(), pattern.len());
                    assert_eq!(candidate.units.concat(), candidate.name);
                    assert_eq!(candidate.pattern, template);
                    built += 1;
                }
            }
            assert!(built > 0, "no build for {} at {}", template, length);
        }
    }

    #[test]
    fn test_unreachable_length_fails_fast() {
        let config = config();
        let builder = CandidateBuilder::new(&config);
        let style = config.style("balanced").unwrap();
        let mut rolls = ScriptedRolls::new(&[0.5]);

        let pattern = Pattern::parse("CV", 1.0).unwrap();
        assert!(builder.build(&pattern, 5, style, &mut rolls).is_none());
        assert!(builder.build(&pattern, 1, style, &mut rolls).is_none());
    }

    #[test]
    fn test_scripted_rolls_are_reproducible() {
        let config = config();
        let builder = CandidateBuilder::new(&config);
        let style = config.style("balanced").unwrap();
        let pattern = Pattern::parse("CVCV", 1.0).unwrap();

        let first = builder.build(&pattern, 4, style, &mut ScriptedRolls::new(&[0.1, 0.7, 0.3, 0.9]));
        let second = builder.build(&pattern, 4, style, &mut ScriptedRolls::new(&[0.1, 0.7, 0.3, 0.9]));
        assert!(first.is_some());
        assert_eq!(first, second);
    }

    #[test]
    fn test_attempt_budget_bounds_search() {
        let config = config();
        let style = config.style("balanced").unwrap();
        let pattern = Pattern::parse("CVCVCVCVCVCV", 1.0).unwrap();
        // Twelve slots need thirteen steps; a budget of five can never finish
        let builder = CandidateBuilder::new(&config).with_limits(8, 5);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..10 {
            assert!(builder.build(&pattern, 12, style, &mut rng).is_none());
        }
    }

    #[test]
    fn test_dead_end_pattern_never_builds() {
        let config = config();
        let builder = CandidateBuilder::new(&config);
        let style = config.style("balanced").unwrap();
        // The second vowel slot only takes single vowels, so two slots top out at three characters
        let pattern = Pattern::parse("VV", 1.0).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        for _ in 0..20 {
            assert!(builder.build(&pattern, 4, style, &mut rng).is_none());
        }
    }

    #[test]
    fn test_affixes_wrap_the_body() {
        let config = config();
        let builder = CandidateBuilder::new(&config);
        let style = config.style("balanced").unwrap();
        let pattern = Pattern::parse("VCV", 1.0).unwrap();
        let affixes = Affixes::new(Some("z"), Some("ly"));
        let mut rng = ChaCha8Rng::seed_from_u64(4);

        let mut built = 0;
        for _ in 0..20 {
            if let Some(candidate) = builder.build_with_affixes(&pattern, 7, style, affixes, &mut rng) {
                assert_eq!(candidate.name.len(), 7);
                assert!(candidate.name.starts_with('z') && candidate.name.ends_with("ly"));
                assert_eq!(candidate.units.first().map(String::as_str), Some("z"));
                assert_eq!(candidate.units.last().map(String::as_str), Some("ly"));
                assert_eq!(candidate.units.concat(), candidate.name);
                built += 1;
            }
        }
        assert!(built > 0);
    }

    #[test]
    fn test_affix_overflow_never_builds() {
        let config = config();
        let builder = CandidateBuilder::new(&config);
        let style = config.style("balanced").unwrap();
        let pattern = Pattern::parse("CV", 1.0).unwrap();
        let affixes = Affixes::new(Some("bano"), Some("ra"));
        let mut rolls = ScriptedRolls::new(&[0.5]);
        assert_eq!(affixes.body_len(5), None);
        assert!(builder.build_with_affixes(&pattern, 5, style, affixes, &mut rolls).is_none());
    }

    #[test]
    fn test_next_slot_kind_alternates_with_prefix() {
        assert_eq!(Affixes::new(Some("ka"), None).next_slot_kind(), SlotKind::Consonant);
        assert_eq!(Affixes::new(Some("vor"), None).next_slot_kind(), SlotKind::Vowel);
        assert_eq!(Affixes::default().next_slot_kind(), SlotKind::Consonant);
    }
}
