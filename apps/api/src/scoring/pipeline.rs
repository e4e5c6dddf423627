use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::features::assembler::FeatureAssembler;
use crate::models::profile::Profile;
use crate::scoring::decision::CreditTier;
use crate::scoring::engine::ScoringEngine;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreOutcome {
    pub score: u8,
    pub tier: CreditTier,
}

/// Profile in, score and credit tier out. Holds no per-request state, so one
/// instance serves every request.
pub struct ScoringPipeline {
    assembler: FeatureAssembler,
    engine: ScoringEngine,
}

impl ScoringPipeline {
    pub fn new(assembler: FeatureAssembler, engine: ScoringEngine) -> Self {
        Self { assembler, engine }
    }

    pub async fn score(&self, profile: &Profile) -> Result<ScoreOutcome, AppError> {
        profile.validate()?;

        let features = self.assembler.build(profile).await?;
        let score = self.engine.calculate_score(&features);
        let tier = CreditTier::from_score(score);

        info!(
            "Scored {}: score={score} tier={tier:?} limit={}",
            profile.github_username.trim(),
            tier.limit()
        );
        Ok(ScoreOutcome { score, tier })
    }
}
