//! Ranking and TLD expansion

use super::builder::Candidate;
use crate::scoring::ScoreBreakdown;
use crate::types::DomainCandidate;

/// A pool entry, scored unless the call ran unscored
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredName {
    pub candidate: Candidate,
    pub breakdown: Option<ScoreBreakdown>,
}

impl ScoredName {
    pub fn overall(&self) -> Option<u8> {
        self.breakdown.map(|b| b.overall)
    }
}

/// Stable sort by overall score, highest first, then keep the top `count`.
///
/// Ties stay in generation order, so a seeded run ranks identically every time.
pub fn rank(mut names: Vec<ScoredName>, count: usize) -> Vec<ScoredName> {
    names.sort_by(|a, b| b.overall().cmp(&a.overall()));
    names.truncate(count);
    names
}

/// One `DomainCandidate` per name and TLD, TLDs in request order
pub fn expand_tlds(names: &[ScoredName], tlds: &[String]) -> Vec<DomainCandidate> {
    let mut out = Vec::with_capacity(names.len() * tlds.len());
    for scored in names {
        for tld in tlds {
            out.push(DomainCandidate {
                name: scored.candidate.name.clone(),
                domain: format!("{}.{}", scored.candidate.name, tld),
                tld: tld.clone(),
                score: scored.overall(),
                breakdown: scored.breakdown,
                pattern: scored.candidate.pattern.clone(),
                units: scored.candidate.units.clone(),
            });
        }
    }
    out
}
