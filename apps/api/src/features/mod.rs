//! Feature extraction: four independent extractors and the assembler that
//! orders their outputs into the fixed-length vector consumed by scoring.

pub mod academic;
pub mod activity;
pub mod assembler;
pub mod code_quality;
pub mod resume;
pub mod stats;

use serde::Serialize;
use thiserror::Error;

use crate::github_client::FetchError;

pub const FEATURE_COUNT: usize = 10;

/// Index order of `FeatureVector`. Part of the public contract.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "commit_frequency",
    "activity_consistency",
    "code_quality",
    "code_complexity",
    "language_diversity",
    "resume_depth",
    "resume_variation",
    "market_alignment",
    "gpa_normalized",
    "internship_normalized",
];

/// External failure inside an extractor. Never shown to callers: the
/// assembler replaces the affected features with neutral defaults.
#[derive(Debug, Error)]
pub enum ExtractorError {
    #[error("Source host unavailable: {0}")]
    Fetch(#[from] FetchError),

    #[error("No embedding could be computed for {0} inputs")]
    NoEmbeddings(usize),
}

/// Ten normalized features, each in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    /// Clamps every value into [0, 1]; non-finite values become 0.0.
    pub fn new(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values.map(unit))
    }

    pub fn values(&self) -> &[f64; FEATURE_COUNT] {
        &self.0
    }
}

/// Clamp into [0, 1], mapping NaN and infinities to 0.0.
pub fn unit(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}
