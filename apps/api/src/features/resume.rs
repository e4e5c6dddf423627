//! Résumé features: semantic depth and variation from a text embedding, and
//! market alignment from keyword overlap with the market skill set.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::embeddings::Embedder;
use crate::errors::AppError;
use crate::features::stats::{mean_and_std, scaled_std, shifted_mean};

/// Default in-demand skill vocabulary.
pub const DEFAULT_MARKET_SKILLS: &[&str] = &[
    "python",
    "machine learning",
    "ml",
    "backend",
    "cloud",
    "sql",
    "devops",
    "blockchain",
];

/// Number of distinct matched skills at which market alignment saturates.
pub const MARKET_MATCH_SATURATION: usize = 5;
/// Text embedding spread is typically 0.1–0.5.
const VARIATION_STD_SCALE: f64 = 2.0;
const STRIP_CHARS: &[char] = &['.', ',', ';', ':', '(', ')', '[', ']', '{', '}', '"', '\'', '!', '?'];

/// Lowercase skill keywords, fixed for the life of the process.
#[derive(Debug, Clone)]
pub struct MarketSkillSet {
    skills: HashSet<String>,
}

impl MarketSkillSet {
    pub fn new<I, S>(skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            skills: skills
                .into_iter()
                .map(|s| s.as_ref().trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }

    /// Comma-separated override, or the default vocabulary when absent.
    pub fn from_config(raw: Option<&str>) -> Self {
        match raw {
            Some(list) => Self::new(list.split(',')),
            None => Self::new(DEFAULT_MARKET_SKILLS.iter().copied()),
        }
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    /// Distinct skills present in `text` as whole tokens. Multi-word entries
    /// never match.
    pub fn count_matches(&self, text: &str) -> usize {
        tokenize(text)
            .intersection(&self.skills)
            .count()
    }
}

impl Default for MarketSkillSet {
    fn default() -> Self {
        Self::from_config(None)
    }
}

/// Distinct lowercase whitespace tokens with surrounding punctuation removed.
fn tokenize(text: &str) -> HashSet<String> {
    text.split_whitespace()
        .map(|w| w.trim_matches(STRIP_CHARS).to_lowercase())
        .filter(|w| !w.is_empty())
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResumeFeatures {
    pub resume_depth: f64,
    pub resume_variation: f64,
    pub market_alignment: f64,
}

/// Depth and variation when the text embedding cannot be computed.
pub const NEUTRAL_SEMANTICS: (f64, f64) = (0.5, 0.5);

pub struct ResumeExtractor {
    embedder: Arc<dyn Embedder>,
    skills: Arc<MarketSkillSet>,
}

impl ResumeExtractor {
    pub fn new(embedder: Arc<dyn Embedder>, skills: Arc<MarketSkillSet>) -> Self {
        Self { embedder, skills }
    }

    /// Empty text is a caller error. An embedding failure only neutralizes the
    /// semantic features; keyword alignment is still computed.
    pub async fn extract(&self, resume_text: &str) -> Result<ResumeFeatures, AppError> {
        if resume_text.trim().is_empty() {
            return Err(AppError::Validation(
                "resume text cannot be empty".to_string(),
            ));
        }

        let (resume_depth, resume_variation) = match self.embedder.embed(resume_text).await {
            Ok(embedding) => mean_and_std(std::slice::from_ref(&embedding))
                .map(|(mean, std)| (shifted_mean(mean), scaled_std(std, VARIATION_STD_SCALE)))
                .unwrap_or(NEUTRAL_SEMANTICS),
            Err(e) => {
                warn!("Resume embedding failed, using neutral semantics: {e}");
                NEUTRAL_SEMANTICS
            }
        };

        let matched = self.skills.count_matches(resume_text);
        let market_alignment = (matched as f64 / MARKET_MATCH_SATURATION as f64).min(1.0);

        let features = ResumeFeatures {
            resume_depth,
            resume_variation,
            market_alignment,
        };
        debug!("Resume features ({matched} skill matches): {features:?}");
        Ok(features)
    }
}
