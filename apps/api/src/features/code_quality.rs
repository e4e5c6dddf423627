//! Code-artifact features: quality and complexity proxies computed from
//! embeddings of sampled source code.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::embeddings::Embedder;
use crate::features::stats::{mean_and_std, scaled_std, shifted_mean};
use crate::features::ExtractorError;

/// Spread of code embeddings is typically ~0.3; tripling maps that near 1.0.
const COMPLEXITY_STD_SCALE: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CodeFeatures {
    pub code_quality: f64,
    pub code_complexity: f64,
}

impl CodeFeatures {
    /// Used when there is no visible code, so its absence is not penalized.
    pub const NEUTRAL: Self = Self {
        code_quality: 0.5,
        code_complexity: 0.5,
    };
}

pub struct CodeQualityExtractor {
    embedder: Arc<dyn Embedder>,
}

impl CodeQualityExtractor {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self { embedder }
    }

    /// Returns `NEUTRAL` for an empty sample and an error when no blob could
    /// be embedded.
    pub async fn extract(&self, blobs: &[String]) -> Result<CodeFeatures, ExtractorError> {
        let blobs: Vec<&str> = blobs
            .iter()
            .map(String::as_str)
            .filter(|b| !b.trim().is_empty())
            .collect();
        if blobs.is_empty() {
            return Ok(CodeFeatures::NEUTRAL);
        }

        let mut embeddings = Vec::with_capacity(blobs.len());
        for blob in &blobs {
            match self.embedder.embed(blob).await {
                Ok(embedding) => embeddings.push(embedding),
                Err(e) => warn!("Code embedding failed, skipping sample: {e}"),
            }
        }

        let (mean, std) =
            mean_and_std(&embeddings).ok_or(ExtractorError::NoEmbeddings(blobs.len()))?;

        let features = CodeFeatures {
            code_quality: shifted_mean(mean),
            code_complexity: scaled_std(std, COMPLEXITY_STD_SCALE),
        };
        debug!(
            "Code features from {}/{} samples: {features:?}",
            embeddings.len(),
            blobs.len()
        );
        Ok(features)
    }
}
