//! The seven brandability dimensions. Each returns a value in `[0, 100]`.

use std::collections::{BTreeMap, HashSet};

use crate::config::ScoringConfig;
use crate::types::is_vowel;

const ASCENDERS: &[char] = &['b', 'd', 'f', 'h', 'k', 'l', 't'];
const DESCENDERS: &[char] = &['g', 'j', 'p', 'q', 'y'];
const WIDE_GLYPHS: &[char] = &['m', 'w'];
const NARROW_GLYPHS: &[char] = &['i', 'j', 'l', 't', 'f', 'r'];

/// Letter pairs that blur together when read quickly
const CONFUSABLE_PAIRS: &[&str] = &[
    "rn", "vv", "cl", "nm", "mn", "ij", "il", "li", "uv", "vu", "nn", "mm", "ll",
];

/// Everyday words whose presence makes a name harder to protect
const COMMON_WORDS: &[&str] = &[
    "the", "and", "for", "you", "all", "new", "one", "day", "get", "man", "cat", "dog", "car",
    "sun", "top", "big", "buy", "win", "red", "hot", "run", "fun", "box", "web", "app", "net",
    "max", "art", "bit", "pay", "shop", "home", "love", "life", "time", "best", "free",
];

pub(crate) fn clamp_score(value: f64) -> f64 {
    let value = if value.is_finite() { value } else { 0.0 };
    ((value.clamp(0.0, 100.0)) * 10.0).round() / 10.0
}

/// Table value for `length`, extrapolated linearly from the nearest tabulated
/// length when the length itself is missing
fn lookup_with_decay(table: &BTreeMap<usize, f64>, length: usize, decay: f64) -> f64 {
    if let Some(value) = table.get(&length) {
        return *value;
    }
    if let Some((&below, &value)) = table.range(..length).next_back() {
        return value - (length - below) as f64 * decay;
    }
    match table.iter().next() {
        Some((&above, &value)) => value + (above - length) as f64 * decay,
        None => 0.0,
    }
}

fn occurrences(haystack: &[char], needle: &str) -> usize {
    let needle: Vec<char> = needle.chars().collect();
    if needle.is_empty() || needle.len() > haystack.len() {
        return 0;
    }
    haystack.windows(needle.len()).filter(|w| *w == needle.as_slice()).count()
}

fn vowel_groups(chars: &[char]) -> usize {
    let mut groups = 0;
    let mut in_group = false;
    for &ch in chars {
        let vowel = is_vowel(ch);
        if vowel && !in_group {
            groups += 1;
        }
        in_group = vowel;
    }
    groups
}

/// Share of adjacent pairs that switch between consonant and vowel
fn alternation_ratio(chars: &[char]) -> f64 {
    if chars.len() < 2 {
        return 0.0;
    }
    let switches = chars
        .windows(2)
        .filter(|w| is_vowel(w[0]) != is_vowel(w[1]))
        .count();
    switches as f64 / (chars.len() - 1) as f64
}

/// Longest run of characters alternating consonant/vowel
fn longest_alternating_run(chars: &[char]) -> usize {
    if chars.is_empty() {
        return 0;
    }
    let mut best = 1;
    let mut current = 1;
    for w in chars.windows(2) {
        if is_vowel(w[0]) != is_vowel(w[1]) {
            current += 1;
            best = best.max(current);
        } else {
            current = 1;
        }
    }
    best
}

fn shannon_entropy(chars: &[char]) -> f64 {
    if chars.is_empty() {
        return 0.0;
    }
    let mut counts: BTreeMap<char, usize> = BTreeMap::new();
    for &ch in chars {
        *counts.entry(ch).or_insert(0) += 1;
    }
    let total = chars.len() as f64;
    counts
        .values()
        .map(|&count| {
            let p = count as f64 / total;
            -p * p.log2()
        })
        .sum()
}

fn share(chars: &[char], set: &[char]) -> f64 {
    if chars.is_empty() {
        return 0.0;
    }
    chars.iter().filter(|ch| set.contains(ch)).count() as f64 / chars.len() as f64
}

pub(crate) fn brevity(chars: &[char], config: &ScoringConfig) -> f64 {
    clamp_score(lookup_with_decay(&config.brevity_table, chars.len(), config.brevity_decay_per_char))
}

pub(crate) fn pronounceability(chars: &[char], multi_char_units: usize, config: &ScoringConfig) -> f64 {
    if chars.is_empty() {
        return 0.0;
    }
    let len = chars.len() as f64;
    let mut score = 60.0;

    score += (multi_char_units as f64 * 4.0).min(12.0);

    if alternation_ratio(chars) > 0.6 {
        score += 10.0;
    }

    let vowel_ratio = chars.iter().filter(|ch| is_vowel(**ch)).count() as f64 / len;
    let [low, high] = config.ideal_vowel_ratio;
    if vowel_ratio < low {
        score -= (low - vowel_ratio) * 100.0;
    } else if vowel_ratio > high {
        score -= (vowel_ratio - high) * 100.0;
    }

    let awkward: usize = config
        .awkward_sequences
        .iter()
        .map(|seq| occurrences(chars, seq))
        .sum();
    score -= awkward as f64 * 8.0;

    let density = vowel_groups(chars) as f64 / len;
    if (0.25..=0.5).contains(&density) {
        score += 5.0;
    }

    clamp_score(score)
}

pub(crate) fn visual_balance(chars: &[char]) -> f64 {
    if chars.is_empty() {
        return 0.0;
    }
    let len = chars.len() as f64;
    let mut score = 70.0;

    let distinct: HashSet<char> = chars.iter().copied().collect();
    if distinct.len() as f64 / len >= 0.8 {
        score += 10.0;
    }

    let mut triple_runs = 0;
    let mut run = 1;
    for w in chars.windows(2) {
        if w[0] == w[1] {
            run += 1;
            if run == 3 {
                triple_runs += 1;
            }
        } else {
            run = 1;
        }
    }
    score -= triple_runs as f64 * 15.0;

    let extenders = share(chars, ASCENDERS) + share(chars, DESCENDERS);
    if (0.2..=0.5).contains(&extenders) {
        score += 10.0;
    } else if extenders > 0.6 {
        score -= 10.0;
    }

    if share(chars, WIDE_GLYPHS) >= 0.2 && share(chars, NARROW_GLYPHS) >= 0.2 {
        score -= 10.0;
    }

    clamp_score(score)
}

pub(crate) fn memorability(chars: &[char], multi_char_units: usize, alternating_template: bool) -> f64 {
    if chars.is_empty() {
        return 0.0;
    }
    let mut score = 60.0;

    score += match chars.len() {
        0..=5 => 20.0,
        6..=7 => 12.0,
        8..=9 => 5.0,
        _ => 0.0,
    };

    if multi_char_units > 0 {
        score += 5.0;
    }

    let run = longest_alternating_run(chars);
    if run >= 4 {
        score += 10.0;
    }
    if run >= 6 {
        score += 5.0;
    }
    if alternating_template {
        score += 5.0;
    }

    let confusable: usize = CONFUSABLE_PAIRS.iter().map(|pair| occurrences(chars, pair)).sum();
    score -= confusable as f64 * 8.0;

    clamp_score(score)
}

pub(crate) fn distinctiveness(name: &str, chars: &[char], config: &ScoringConfig) -> f64 {
    let mut score = 70.0;

    let has_prefix = config
        .common_prefixes
        .iter()
        .any(|p| chars.len() > p.chars().count() && name.starts_with(p.as_str()));
    if has_prefix {
        score -= 12.0;
    }
    let has_suffix = config
        .common_suffixes
        .iter()
        .any(|s| chars.len() > s.chars().count() && name.ends_with(s.as_str()));
    if has_suffix {
        score -= 12.0;
    }

    let entropy = shannon_entropy(chars);
    if entropy >= config.min_entropy {
        score += ((entropy - config.min_entropy) * 10.0).min(20.0);
    } else {
        score -= (config.min_entropy - entropy) * 20.0;
    }

    clamp_score(score)
}

pub(crate) fn trademark_safety(name: &str, chars: &[char], config: &ScoringConfig) -> f64 {
    let mut score = 80.0;

    let brand_hits: usize = config
        .known_brands
        .iter()
        .map(|brand| occurrences(chars, brand))
        .sum();
    score -= brand_hits as f64 * 30.0;

    if COMMON_WORDS.iter().any(|word| name.contains(word)) {
        score -= 5.0;
    } else {
        score += 5.0;
    }

    clamp_score(score)
}

pub(crate) fn domain_premium(chars: &[char], config: &ScoringConfig) -> f64 {
    let base = lookup_with_decay(&config.premium_table, chars.len(), config.premium_decay_per_char);
    clamp_score(base + config.premium_bonus)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BrandConfig;

    fn scoring() -> ScoringConfig {
        BrandConfig::builtin().unwrap().scoring().clone()
    }

    fn chars(name: &str) -> Vec<char> {
        name.chars().collect()
    }

    #[test]
    fn test_lookup_tables_and_decay() {
        let config = scoring();
        assert_eq!(brevity(&chars("abcde"), &config), 88.0);
        assert_eq!(brevity(&chars("abc"), &config), 100.0);
        // 8 is tabulated at 58, each extra character decays by 10
        assert_eq!(brevity(&chars("abcdefghij"), &config), 38.0);
        assert_eq!(brevity(&chars("abcdefghijkl"), &config), 18.0);

        assert_eq!(domain_premium(&chars("abc"), &config), 100.0);
        assert_eq!(domain_premium(&chars("abcd"), &config), 90.0);
        assert_eq!(domain_premium(&chars("abcdefghij"), &config), 21.0);
    }

    #[test]
    fn test_pronounceability_prefers_alternation() {
        let config = scoring();
        let smooth = pronounceability(&chars("banora"), 0, &config);
        let rough = pronounceability(&chars("bdkgta"), 0, &config);
        assert!(smooth > rough);
        assert_eq!(smooth, 75.0);
        assert!(rough < 20.0);
    }

    #[test]
    fn test_visual_balance_penalties() {
        let balanced = visual_balance(&chars("kenato"));
        let repeated = visual_balance(&chars("saaaon"));
        assert!(balanced > repeated);
        assert_eq!(balanced, 90.0);
    }

    #[test]
    fn test_memorability_tiers() {
        assert!(memorability(&chars("bako"), 0, true) > memorability(&chars("bakotamirupe"), 0, true));
        assert!(memorability(&chars("corna"), 0, false) < memorability(&chars("copna"), 0, false));
    }

    #[test]
    fn test_distinctiveness_common_affixes() {
        let config = scoring();
        assert!(distinctiveness("protaly", &chars("protaly"), &config) < distinctiveness("votaske", &chars("votaske"), &config));
        // All characters identical: entropy zero, full shortfall penalty
        assert_eq!(distinctiveness("zzz", &chars("zzz"), &config), 30.0);
    }

    #[test]
    fn test_affix_guard_needs_a_longer_name() {
        let config = scoring();
        // A name that is exactly a common prefix is not penalized for it
        assert_eq!(distinctiveness("pro", &chars("pro"), &config), 61.7);
        assert_eq!(distinctiveness("prol", &chars("prol"), &config), 58.0);
    }

    #[test]
    fn test_trademark_safety() {
        let config = scoring();
        assert_eq!(trademark_safety("vokari", &chars("vokari"), &config), 85.0);
        assert_eq!(trademark_safety("nikera", &chars("nikera"), &config), 55.0);
        assert_eq!(trademark_safety("sunopa", &chars("sunopa"), &config), 75.0);
    }

    #[test]
    fn test_helpers() {
        assert_eq!(vowel_groups(&chars("beautiful")), 3);
        assert_eq!(longest_alternating_run(&chars("strato")), 4);
        assert!((shannon_entropy(&chars("abcd")) - 2.0).abs() < 1e-12);
        assert_eq!(occurrences(&chars("banana"), "an"), 2);
        assert_eq!(clamp_score(-3.0), 0.0);
        assert_eq!(clamp_score(140.0), 100.0);
        assert_eq!(clamp_score(f64::NAN), 0.0);
    }
}
