//! Feature Vector Assembler — runs the four extractors and writes their
//! outputs into the fixed index order of `FeatureVector`.
//!
//! Activity and code-artifact extractors depend on external services; their
//! failures are trapped here and replaced by neutral defaults. Résumé and
//! academic inputs come from the caller, so their failures propagate.
//!
//! The repository list is fetched once per request and shared by both
//! host-backed extractors.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::embeddings::Embedder;
use crate::errors::AppError;
use crate::features::academic::academic_features;
use crate::features::activity::{ActivityExtractor, ActivityFeatures};
use crate::features::code_quality::{CodeFeatures, CodeQualityExtractor};
use crate::features::resume::{MarketSkillSet, ResumeExtractor};
use crate::features::{ExtractorError, FeatureVector, FEATURE_NAMES};
use crate::github_client::SourceHost;
use crate::models::activity::RepoDescriptor;
use crate::models::profile::Profile;

/// Repositories sampled for code-artifact features.
pub const CODE_SAMPLE_REPOS: usize = 3;

pub struct FeatureAssembler {
    host: Arc<dyn SourceHost>,
    activity: ActivityExtractor,
    code: CodeQualityExtractor,
    resume: ResumeExtractor,
}

impl FeatureAssembler {
    pub fn new(
        host: Arc<dyn SourceHost>,
        text_embedder: Arc<dyn Embedder>,
        code_embedder: Arc<dyn Embedder>,
        skills: Arc<MarketSkillSet>,
    ) -> Self {
        Self {
            activity: ActivityExtractor::new(host.clone()),
            code: CodeQualityExtractor::new(code_embedder),
            resume: ResumeExtractor::new(text_embedder, skills),
            host,
        }
    }

    /// Builds the feature vector for one profile. Only caller-input problems
    /// produce an error.
    pub async fn build(&self, profile: &Profile) -> Result<FeatureVector, AppError> {
        let username = profile.github_username.trim();

        // Cheap and local: reject bad academic input before any network call
        let academic = academic_features(profile.gpa, profile.internships)?;

        let (host_features, resume) = tokio::join!(
            self.host_features(username),
            self.resume.extract(&profile.resume_text),
        );
        let resume = resume?;
        let (activity, code) = host_features.unwrap_or_else(|e| {
            warn!("Host-backed features unavailable for {username}, using neutral defaults: {e}");
            (ActivityFeatures::NEUTRAL, CodeFeatures::NEUTRAL)
        });

        let vector = FeatureVector::new([
            activity.commit_frequency,
            activity.activity_consistency,
            code.code_quality,
            code.code_complexity,
            activity.language_diversity,
            resume.resume_depth,
            resume.resume_variation,
            resume.market_alignment,
            academic.gpa_normalized,
            academic.internship_normalized,
        ]);

        let named: Vec<String> = FEATURE_NAMES
            .iter()
            .zip(vector.values())
            .map(|(name, value)| format!("{name}={value:.3}"))
            .collect();
        debug!("Feature vector for {username}: {}", named.join(", "));

        Ok(vector)
    }

    /// Activity and code features from a single repository listing. Only an
    /// unreachable listing is an error.
    async fn host_features(
        &self,
        username: &str,
    ) -> Result<(ActivityFeatures, CodeFeatures), ExtractorError> {
        let repos = self.host.list_repos(username).await?;
        Ok(tokio::join!(
            self.activity.extract(username, &repos),
            self.code_or_neutral(username, &repos),
        ))
    }

    async fn code_or_neutral(&self, username: &str, repos: &[RepoDescriptor]) -> CodeFeatures {
        let samples = self.collect_code_samples(username, repos).await;
        info!("Collected {} code samples for {username}", samples.len());
        self.code.extract(&samples).await.unwrap_or_else(|e| {
            warn!("Code features unavailable for {username}, using neutral defaults: {e}");
            CodeFeatures::NEUTRAL
        })
    }

    /// Source text from the first few non-fork repositories. Repositories that
    /// fail to download are left out of the sample.
    async fn collect_code_samples(&self, username: &str, repos: &[RepoDescriptor]) -> Vec<String> {
        let mut samples = Vec::new();
        for repo in repos.iter().filter(|r| !r.fork).take(CODE_SAMPLE_REPOS) {
            match self.host.fetch_source_text(username, &repo.name).await {
                Ok(code) if !code.trim().is_empty() => samples.push(code),
                Ok(_) => debug!("No source files in {username}/{}", repo.name),
                Err(e) => debug!("Skipping code sample from {username}/{}: {e}", repo.name),
            }
        }
        samples
    }
}
