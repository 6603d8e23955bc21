//! Overgeneration loop and the public generation entry point

use std::collections::HashSet;
use std::time::Instant;

use chrono::Utc;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::builder::{Affixes, Candidate, CandidateBuilder};
use super::pattern::{Pattern, PatternSelector};
use super::rank::{self, ScoredName};
use super::sampling::UniformSource;
use super::slot::hard_violation;
use crate::config::{BrandConfig, StylePreset};
use crate::error::Result;
use crate::scoring::Scorer;
use crate::types::{GenerationMetadata, GenerationRequest, GenerationResult};
use crate::validation_error;

/// Deduplicated raw candidates in insertion order
#[derive(Debug, Clone, Default)]
pub struct RawPool {
    pub candidates: Vec<Candidate>,
    /// Builder invocations spent
    pub attempts: usize,
    /// Pool size the loop aimed for
    pub target: usize,
}

impl RawPool {
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn is_short(&self) -> bool {
        self.candidates.len() < self.target
    }
}

/// Generation engine bound to one immutable configuration
pub struct NameForge<'c> {
    config: &'c BrandConfig,
    selector: PatternSelector<'c>,
    builder: CandidateBuilder<'c>,
    scorer: Scorer<'c>,
}

impl<'c> NameForge<'c> {
    pub fn new(config: &'c BrandConfig) -> Self {
        Self {
            config,
            selector: PatternSelector::new(config),
            builder: CandidateBuilder::new(config),
            scorer: Scorer::new(config),
        }
    }

    pub fn config(&self) -> &'c BrandConfig {
        self.config
    }

    pub fn scorer(&self) -> &Scorer<'c> {
        &self.scorer
    }

    /// Fill a pool of distinct names of exactly `length` characters.
    ///
    /// Stops at the pool target or after the attempt budget, whichever comes
    /// first. An infeasible combination returns a short (possibly empty) pool.
    /// With affixes, patterns describe only the body between them; a body
    /// too short for the pattern table gets an alternating template.
    pub fn overgenerate<S: UniformSource + ?Sized>(
        &self,
        length: usize,
        count: usize,
        style: &'c StylePreset,
        pattern_override: Option<&Pattern>,
        affixes: Affixes<'_>,
        source: &mut S,
    ) -> RawPool {
        let search = self.config.search();
        let target = search.pool_target(count);
        let budget = search.attempt_budget(target);
        let mut pool = RawPool {
            candidates: Vec::with_capacity(target),
            attempts: 0,
            target,
        };
        let constraints = self.config.constraints();

        let Some(body_len) = affixes.body_len(length) else {
            tracing::warn!(length, affix_len = affixes.len(), "Affixes exceed target length");
            return pool;
        };
        if let Some(bad) = constraints
            .disallowed_in(affixes.prefix)
            .or_else(|| constraints.disallowed_in(affixes.suffix))
        {
            tracing::warn!(
                prefix = affixes.prefix,
                suffix = affixes.suffix,
                disallowed = bad,
                "Affix contains a disallowed substring"
            );
            return pool;
        }

        if body_len == 0 {
            pool.attempts = 1;
            let name = format!("{}{}", affixes.prefix, affixes.suffix);
            if hard_violation(&name, length, constraints).is_none() {
                let units = [affixes.prefix, affixes.suffix]
                    .iter()
                    .filter(|affix| !affix.is_empty())
                    .map(|affix| affix.to_string())
                    .collect();
                pool.candidates.push(Candidate {
                    name,
                    units,
                    pattern: String::new(),
                });
            }
            return pool;
        }

        let fallback = if pattern_override.is_none()
            && !affixes.is_empty()
            && self.config.patterns_for(body_len).is_none()
        {
            Pattern::alternating(body_len, affixes.next_slot_kind())
        } else {
            None
        };
        let fixed = pattern_override.or(fallback.as_ref());

        match fixed {
            Some(pattern) if !pattern.can_reach(body_len) => {
                tracing::warn!(pattern = %pattern, length, body_len, "Pattern cannot reach target length");
                return pool;
            }
            Some(_) => {}
            None => match self.config.patterns_for(body_len) {
                Some(patterns) if patterns.iter().any(|p| p.can_reach(body_len)) => {}
                Some(_) => {
                    tracing::warn!(length = body_len, "No configured pattern can reach target length");
                    return pool;
                }
                None => {
                    tracing::warn!(length = body_len, "No patterns configured for length");
                    return pool;
                }
            },
        }

        let mut seen: HashSet<String> = HashSet::with_capacity(target);

        while pool.candidates.len() < target && pool.attempts < budget {
            pool.attempts += 1;

            let pattern = match fixed {
                Some(pattern) => pattern,
                None => match self.selector.select(body_len, source) {
                    Some(pattern) => pattern,
                    None => break,
                },
            };

            let Some(candidate) = self
                .builder
                .build_with_affixes(pattern, length, style, affixes, source)
            else {
                continue;
            };

            if let Some(reason) = hard_violation(&candidate.name, length, constraints) {
                tracing::trace!(name = %candidate.name, reason = %reason, "Rejected candidate");
                continue;
            }

            if seen.insert(candidate.name.clone()) {
                pool.candidates.push(candidate);
            }
        }

        pool
    }

    /// Validate, generate, score, rank and expand across TLDs
    pub fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult> {
        let start_time = Instant::now();

        let mut request = request.clone();
        request.normalize_tlds();
        request.normalize_affixes();
        request.validate(self.config)?;

        let style = self
            .config
            .style(&request.style)
            .ok_or_else(|| validation_error!("unknown style '{}'", request.style))?;
        let pattern_override = request
            .pattern
            .as_deref()
            .map(|template| Pattern::parse(template, 1.0))
            .transpose()
            .map_err(|message| validation_error!("invalid pattern: {}", message))?;

        let mut rng = match request.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        let affixes = Affixes::new(request.prefix.as_deref(), request.suffix.as_deref());
        let pool = self.overgenerate(
            request.length,
            request.count,
            style,
            pattern_override.as_ref(),
            affixes,
            &mut rng,
        );
        let generated_count = pool.len();
        let attempts = pool.attempts;

        let selected = if request.scored {
            let scored = pool
                .candidates
                .into_iter()
                .map(|candidate| {
                    let breakdown = self.scorer.score(&candidate.name, &candidate.units, &candidate.pattern);
                    ScoredName {
                        candidate,
                        breakdown: Some(breakdown),
                    }
                })
                .collect();
            rank::rank(scored, request.count)
        } else {
            pool.candidates
                .into_iter()
                .take(request.count)
                .map(|candidate| ScoredName {
                    candidate,
                    breakdown: None,
                })
                .collect()
        };

        let candidates = rank::expand_tlds(&selected, &request.tlds);
        let duration = start_time.elapsed();

        let metadata = GenerationMetadata {
            generated_at: Utc::now(),
            length: request.length,
            style: request.style.clone(),
            seed: request.seed,
            requested_count: request.count,
            generated_count,
            returned_count: selected.len(),
            attempts,
            duration_ms: duration.as_millis() as u64,
        };

        if metadata.is_shortfall() {
            tracing::warn!(
                length = request.length,
                style = %request.style,
                requested = request.count,
                returned = metadata.returned_count,
                "Generated fewer names than requested"
            );
        }

        tracing::info!(
            length = request.length,
            style = %request.style,
            requested = request.count,
            generated = generated_count,
            returned = metadata.returned_count,
            attempts,
            duration_ms = %duration.as_millis(),
            "Name generation completed"
        );

        Ok(GenerationResult { candidates, metadata })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forge::sampling::tests::ScriptedRolls;

    fn config() -> BrandConfig {
        BrandConfig::builtin().unwrap()
    }

    fn request(length: usize, count: usize, seed: u64) -> GenerationRequest {
        GenerationRequest {
            length,
            count,
            seed: Some(seed),
            ..Default::default()
        }
    }

    #[test]
    fn test_overgenerate_is_distinct_and_exact() {
        let config = config();
        let forge = NameForge::new(&config);
        let style = config.style("balanced").unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(11);

        let pool = forge.overgenerate(6, 30, style, None, Affixes::default(), &mut rng);
        assert!(!pool.is_empty());
        assert!(pool.len() <= pool.target);
        assert_eq!(pool.target, 90);

        let distinct: HashSet<&str> = pool.candidates.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(distinct.len(), pool.len());
        assert!(pool.candidates.iter().all(|c| c.name.len() == 6));
    }

    #[test]
    fn test_unreachable_override_returns_empty_pool() {
        let config = config();
        let forge = NameForge::new(&config);
        let style = config.style("balanced").unwrap();
        let pattern = Pattern::parse("C", 1.0).unwrap();

        let pool = forge.overgenerate(5, 10, style, Some(&pattern), Affixes::default(), &mut ScriptedRolls::new(&[0.5]));
        assert!(pool.is_empty());
        assert!(pool.is_short());
        assert_eq!(pool.attempts, 0);
    }

    #[test]
    fn test_dead_end_override_terminates() {
        let config = config();
        let forge = NameForge::new(&config);
        let style = config.style("balanced").unwrap();
        let pattern = Pattern::parse("VV", 1.0).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        let pool = forge.overgenerate(4, 10, style, Some(&pattern), Affixes::default(), &mut rng);
        assert!(pool.is_empty());
        assert_eq!(pool.attempts, config.search().attempt_budget(pool.target));
    }

    #[test]
    fn test_generate_seeded_is_deterministic() {
        let config = config();
        let forge = NameForge::new(&config);
        let first = forge.generate(&request(5, 15, 42)).unwrap();
        let second = forge.generate(&request(5, 15, 42)).unwrap();
        assert_eq!(first.names(), second.names());
        assert_eq!(first.metadata.generated_count, second.metadata.generated_count);
    }

    #[test]
    fn test_generate_ranks_descending() {
        let config = config();
        let forge = NameForge::new(&config);
        let result = forge.generate(&request(6, 20, 7)).unwrap();
        let scores: Vec<u8> = result.candidates.iter().filter_map(|c| c.score).collect();
        assert_eq!(scores.len(), result.candidates.len());
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
        assert_eq!(result.metadata.returned_count, 20);
    }

    #[test]
    fn test_generate_unscored_keeps_generation_order() {
        let config = config();
        let forge = NameForge::new(&config);
        let style = config.style("balanced").unwrap();
        let mut request = request(5, 10, 3);
        request.scored = false;

        let result = forge.generate(&request).unwrap();
        assert!(result.candidates.iter().all(|c| c.score.is_none() && c.breakdown.is_none()));

        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let pool = forge.overgenerate(5, 10, style, None, Affixes::default(), &mut rng);
        let expected: Vec<&str> = pool.candidates.iter().take(10).map(|c| c.name.as_str()).collect();
        assert_eq!(result.names(), expected);
    }

    #[test]
    fn test_generate_expands_tlds() {
        let config = config();
        let forge = NameForge::new(&config);
        let mut request = request(5, 4, 9);
        request.tlds = vec!["com".to_string(), ".IO".to_string()];

        let result = forge.generate(&request).unwrap();
        assert_eq!(result.metadata.returned_count, 4);
        assert_eq!(result.candidates.len(), 8);
        assert_eq!(result.candidates[0].tld, "com");
        assert_eq!(result.candidates[1].tld, "io");
        assert_eq!(result.candidates[1].domain, format!("{}.io", result.candidates[0].name));
    }

    #[test]
    fn test_generate_rejects_bad_input() {
        let config = config();
        let forge = NameForge::new(&config);
        assert!(forge.generate(&request(2, 5, 1)).unwrap_err().is_input_error());
        assert!(forge.generate(&request(5, 0, 1)).unwrap_err().is_input_error());

        let mut bad = request(5, 5, 1);
        bad.pattern = Some("CVQ".to_string());
        assert!(forge.generate(&bad).is_err());
    }

    #[test]
    fn test_generate_override_shortfall_is_not_error() {
        let config = config();
        let forge = NameForge::new(&config);
        let mut request = request(8, 5, 1);
        request.pattern = Some("CV".to_string());

        let result = forge.generate(&request).unwrap();
        assert!(result.candidates.is_empty());
        assert!(result.metadata.is_shortfall());
        assert_eq!(result.metadata.generated_count, 0);
    }

    #[test]
    fn test_generate_override_shapes_names() {
        let config = config();
        let forge = NameForge::new(&config);
        let mut request = request(6, 10, 21);
        request.pattern = Some("cvcvcv".to_string());

        let result = forge.generate(&request).unwrap();
        assert!(!result.candidates.is_empty());
        assert!(result.candidates.iter().all(|c| c.pattern == "CVCVCV" && c.name.len() == 6));
    }

    #[test]
    fn test_generate_with_affixes() {
        let config = config();
        let forge = NameForge::new(&config);
        let mut request = request(8, 10, 17);
        request.prefix = Some("Vo".to_string());
        request.suffix = Some("ra".to_string());

        let result = forge.generate(&request).unwrap();
        assert!(!result.candidates.is_empty());
        for candidate in &result.candidates {
            assert_eq!(candidate.name.len(), 8);
            assert!(candidate.name.starts_with("vo") && candidate.name.ends_with("ra"));
            assert_eq!(candidate.units.concat(), candidate.name);
        }
    }

    #[test]
    fn test_short_body_uses_alternating_template() {
        let config = config();
        let forge = NameForge::new(&config);
        let style = config.style("balanced").unwrap();
        let affixes = Affixes::new(Some("ka"), Some("ly"));
        let mut rng = ChaCha8Rng::seed_from_u64(2);

        let pool = forge.overgenerate(5, 3, style, None, affixes, &mut rng);
        assert!(!pool.is_empty());
        assert!(pool.candidates.iter().all(|c| c.pattern == "C" && c.name.len() == 5));
    }

    #[test]
    fn test_affixes_filling_the_whole_name() {
        let config = config();
        let forge = NameForge::new(&config);
        let style = config.style("balanced").unwrap();
        let affixes = Affixes::new(Some("ka"), Some("ly"));

        let pool = forge.overgenerate(4, 5, style, None, affixes, &mut ScriptedRolls::new(&[0.5]));
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.candidates[0].name, "kaly");
        assert_eq!(pool.candidates[0].units, vec!["ka", "ly"]);
    }

    #[test]
    fn test_disallowed_affix_yields_empty_pool() {
        let config = config();
        let forge = NameForge::new(&config);
        let mut request = request(6, 10, 1);
        request.prefix = Some("zz".to_string());

        let result = forge.generate(&request).unwrap();
        assert!(result.candidates.is_empty());
        assert_eq!(result.metadata.attempts, 0);
        assert!(result.metadata.is_shortfall());
    }
}
