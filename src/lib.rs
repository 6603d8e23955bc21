//! Brand Forge - pronounceable brand name generation and scoring
//!
//! Builds short names from a consonant/vowel pattern grammar under hard and
//! soft phonetic constraints, then ranks them by a seven-dimension
//! brandability score.

pub mod config;
pub mod error;
pub mod forge;
pub mod scoring;
pub mod types;

// Re-export commonly used types
pub use config::BrandConfig;
pub use error::{BrandForgeError, Result};
pub use types::{
    DomainCandidate, GenerationMetadata, GenerationRequest, GenerationResult, MAX_COUNT,
    MAX_LENGTH, MIN_COUNT, MIN_LENGTH,
};

// Re-export main functionality
pub use forge::{Candidate, NameForge, Pattern};
pub use scoring::{ScoreBreakdown, Scorer};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the library
pub fn init() -> Result<()> {
    // Load .env file if it exists
    dotenv::dotenv().ok();
    Ok(())
}
