use serde::Serialize;

/// Credit-limit tier derived from a 0–100 score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CreditTier {
    Declined,
    Starter,
    Standard,
    Premium,
}

/// Lower bound (inclusive) of each tier, highest first.
const TIER_THRESHOLDS: &[(u8, CreditTier)] = &[
    (80, CreditTier::Premium),
    (65, CreditTier::Standard),
    (50, CreditTier::Starter),
];

impl CreditTier {
    pub fn from_score(score: u8) -> Self {
        TIER_THRESHOLDS
            .iter()
            .find(|(threshold, _)| score >= *threshold)
            .map(|(_, tier)| *tier)
            .unwrap_or(CreditTier::Declined)
    }

    /// Credit limit granted by the tier.
    pub fn limit(self) -> u32 {
        match self {
            CreditTier::Premium => 50_000,
            CreditTier::Standard => 30_000,
            CreditTier::Starter => 15_000,
            CreditTier::Declined => 0,
        }
    }
}
