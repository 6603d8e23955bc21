//! Core types and structures for brand-forge

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::BrandConfig;
use crate::error::Result;
use crate::forge::Pattern;
use crate::scoring::ScoreBreakdown;
use crate::{internal_error, validation_error};

/// Shortest name length the engine accepts
pub const MIN_LENGTH: usize = 3;
/// Longest name length the engine accepts
pub const MAX_LENGTH: usize = 12;
/// Smallest number of names a request may ask for
pub const MIN_COUNT: usize = 1;
/// Largest number of names a request may ask for
pub const MAX_COUNT: usize = 1000;

/// Characters treated as vowels everywhere in the engine (`y` included).
pub const VOWEL_CHARS: &[char] = &['a', 'e', 'i', 'o', 'u', 'y'];

/// Whether `ch` counts as a vowel
pub fn is_vowel(ch: char) -> bool {
    VOWEL_CHARS.contains(&ch)
}

/// Parameters of one generation call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Exact length of every generated name
    pub length: usize,
    /// Number of names to return
    pub count: usize,
    /// TLDs each returned name is paired with
    pub tlds: Vec<String>,
    /// Style preset name
    pub style: String,
    /// Seed for a reproducible run
    pub seed: Option<u64>,
    /// Score and rank the pool (otherwise generation order is kept)
    pub scored: bool,
    /// Explicit slot template such as `CVCCVC`, replacing the pattern table
    pub pattern: Option<String>,
    /// Text every name must start with
    #[serde(default)]
    pub prefix: Option<String>,
    /// Text every name must end with
    #[serde(default)]
    pub suffix: Option<String>,
}

impl Default for GenerationRequest {
    fn default() -> Self {
        Self {
            length: 5,
            count: 20,
            tlds: vec!["com".to_string()],
            style: "balanced".to_string(),
            seed: None,
            scored: true,
            pattern: None,
            prefix: None,
            suffix: None,
        }
    }
}

impl GenerationRequest {
    /// Reject out-of-range input before any work is done
    pub fn validate(&self, config: &BrandConfig) -> Result<()> {
        if !(MIN_LENGTH..=MAX_LENGTH).contains(&self.length) {
            return Err(validation_error!(
                "length {} is outside {}..={}",
                self.length,
                MIN_LENGTH,
                MAX_LENGTH
            ));
        }

        if !(MIN_COUNT..=MAX_COUNT).contains(&self.count) {
            return Err(validation_error!(
                "count {} is outside {}..={}",
                self.count,
                MIN_COUNT,
                MAX_COUNT
            ));
        }

        if self.tlds.is_empty() {
            return Err(validation_error!("at least one TLD is required"));
        }

        let tld_regex = Regex::new(r"^[a-z]{2,63}$").map_err(|e| internal_error!(e.to_string()))?;
        for tld in &self.tlds {
            if !tld_regex.is_match(tld) {
                return Err(validation_error!("invalid TLD '{}'", tld));
            }
        }

        if config.style(&self.style).is_none() {
            return Err(validation_error!(
                "unknown style '{}' (available: {})",
                self.style,
                config.style_names().join(", ")
            ));
        }

        if let Some(template) = &self.pattern {
            Pattern::parse(template, 1.0)
                .map_err(|message| validation_error!("pattern '{}': {}", template, message))?;
        }

        let mut affix_len = 0;
        for (label, affix) in [("prefix", &self.prefix), ("suffix", &self.suffix)] {
            let Some(affix) = affix else { continue };
            if affix.is_empty() || !affix.chars().all(|ch| ch.is_ascii_lowercase()) {
                return Err(validation_error!("{} '{}' must be lowercase ASCII letters", label, affix));
            }
            affix_len += affix.len();
        }
        if affix_len > self.length {
            return Err(validation_error!(
                "prefix and suffix take {} characters, more than length {}",
                affix_len,
                self.length
            ));
        }

        Ok(())
    }

    /// Trim and lowercase the affixes, dropping empty ones
    pub fn normalize_affixes(&mut self) {
        for affix in [&mut self.prefix, &mut self.suffix] {
            *affix = affix
                .take()
                .map(|text| text.trim().to_lowercase())
                .filter(|text| !text.is_empty());
        }
    }

    /// Lowercase TLDs and strip a leading dot (`".IO"` -> `"io"`)
    pub fn normalize_tlds(&mut self) {
        for tld in &mut self.tlds {
            *tld = tld.trim().trim_start_matches('.').to_lowercase();
        }
    }
}

/// A ranked name paired with one TLD
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainCandidate {
    pub name: String,
    pub domain: String,
    pub tld: String,
    /// Overall brandability score, absent in unscored mode
    pub score: Option<u8>,
    pub breakdown: Option<ScoreBreakdown>,
    /// Slot template the name was built from, e.g. `CVCV`
    pub pattern: String,
    pub units: Vec<String>,
}

impl DomainCandidate {
    /// Get the full domain name (name + TLD)
    pub fn get_full_domain(&self) -> &str {
        &self.domain
    }
}

/// Bookkeeping attached to every generation result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationMetadata {
    pub generated_at: DateTime<Utc>,
    pub length: usize,
    pub style: String,
    pub seed: Option<u64>,
    /// Names asked for
    pub requested_count: usize,
    /// Distinct names in the raw pool before ranking
    pub generated_count: usize,
    /// Names returned after truncation (each expanded across every TLD)
    pub returned_count: usize,
    /// Builder attempts spent filling the pool
    pub attempts: usize,
    pub duration_ms: u64,
}

impl GenerationMetadata {
    /// Whether fewer names were returned than requested
    pub fn is_shortfall(&self) -> bool {
        self.returned_count < self.requested_count
    }
}

/// Output of one generation call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub candidates: Vec<DomainCandidate>,
    pub metadata: GenerationMetadata,
}

impl GenerationResult {
    /// Distinct names in ranked order
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::with_capacity(self.metadata.returned_count);
        for candidate in &self.candidates {
            if names.last() != Some(&candidate.name.as_str()) {
                names.push(&candidate.name);
            }
        }
        names
    }

    /// Domains in output order, the only field an availability checker needs
    pub fn domains(&self) -> Vec<&str> {
        self.candidates.iter().map(|c| c.domain.as_str()).collect()
    }
}
