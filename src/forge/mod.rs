//! Constrained name generation: patterns, slot filtering, backtracking
//! builds and the overgeneration loop.

pub mod builder;
pub mod generator;
pub mod pattern;
pub mod rank;
pub mod sampling;
pub mod slot;

pub use builder::{Candidate, CandidateBuilder};
pub use generator::{NameForge, RawPool};
pub use pattern::{Pattern, PatternSelector, SlotKind};
pub use rank::{expand_tlds, rank, ScoredName};
pub use sampling::{pick, pick_index, take, UniformSource, Weighted};
pub use slot::{hard_violation, SlotFilter, SlotState, WeightedUnit};
