//! Activity features from the subject's coding-platform history:
//! commit frequency, activity consistency and language diversity.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::github_client::SourceHost;
use crate::models::activity::{RawActivityRecord, RepoDescriptor};

/// Most recent commits inspected per repository. Bounds request cost.
pub const COMMITS_PER_REPO: usize = 30;
const COMMITS_PER_MONTH_SATURATION: f64 = 30.0;
const ACTIVE_MONTHS_SATURATION: f64 = 12.0;
const LANGUAGES_SATURATION: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActivityFeatures {
    pub commit_frequency: f64,
    pub activity_consistency: f64,
    pub language_diversity: f64,
}

impl ActivityFeatures {
    /// Substituted when the source host cannot be read at all.
    pub const NEUTRAL: Self = Self {
        commit_frequency: 0.4,
        activity_consistency: 0.4,
        language_diversity: 0.4,
    };
}

pub struct ActivityExtractor {
    host: Arc<dyn SourceHost>,
}

impl ActivityExtractor {
    pub fn new(host: Arc<dyn SourceHost>) -> Self {
        Self { host }
    }

    /// Walks an already-listed set of repositories. A repository whose commit
    /// list cannot be read still contributes its language.
    pub async fn extract(&self, username: &str, repos: &[RepoDescriptor]) -> ActivityFeatures {
        let mut records = Vec::with_capacity(repos.len());
        for repo in repos.iter().filter(|r| !r.fork) {
            let commit_dates = match self.host.list_commit_dates(repo, COMMITS_PER_REPO).await {
                Ok(dates) => dates,
                Err(e) => {
                    warn!("Commit history unavailable for {}/{}: {e}", username, repo.name);
                    vec![]
                }
            };
            records.push(RawActivityRecord {
                language: repo.language.clone(),
                fork: repo.fork,
                commit_dates,
            });
        }

        let features = compute_activity(&records);
        debug!("Activity features for {username}: {features:?}");
        features
    }
}

/// Pure reduction of gathered records to the three activity features.
pub fn compute_activity(records: &[RawActivityRecord]) -> ActivityFeatures {
    let mut total_commits = 0usize;
    let mut active_months = HashSet::new();
    let mut languages = HashSet::new();

    for record in records.iter().filter(|r| !r.fork) {
        if let Some(language) = record.language.as_deref().filter(|l| !l.is_empty()) {
            languages.insert(language.to_lowercase());
        }
        for date in record.commit_dates.iter().take(COMMITS_PER_REPO) {
            active_months.insert(date.format("%Y-%m").to_string());
            total_commits += 1;
        }
    }

    let month_count = active_months.len();
    let commits_per_month = total_commits as f64 / month_count.max(1) as f64;

    ActivityFeatures {
        commit_frequency: (commits_per_month / COMMITS_PER_MONTH_SATURATION).min(1.0),
        activity_consistency: (month_count as f64 / ACTIVE_MONTHS_SATURATION).min(1.0),
        language_diversity: (languages.len() as f64 / LANGUAGES_SATURATION).min(1.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github_client::FetchError;
    use async_trait::async_trait;
    use chrono::{DateTime, TimeZone, Utc};

    fn date(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    fn record(language: Option<&str>, fork: bool, dates: Vec<DateTime<Utc>>) -> RawActivityRecord {
        RawActivityRecord {
            language: language.map(String::from),
            fork,
            commit_dates: dates,
        }
    }

    #[test]
    fn test_no_records_yields_zeroes() {
        let f = compute_activity(&[]);
        assert_eq!(f.commit_frequency, 0.0);
        assert_eq!(f.activity_consistency, 0.0);
        assert_eq!(f.language_diversity, 0.0);
    }

    #[test]
    fn test_commits_grouped_by_calendar_month() {
        // 6 commits over 2 months → 3 per month → 0.1
        let records = vec![
            record(
                Some("Rust"),
                false,
                vec![date(2024, 1, 1), date(2024, 1, 20), date(2024, 1, 31)],
            ),
            record(
                Some("Python"),
                false,
                vec![date(2024, 2, 1), date(2024, 2, 2), date(2024, 2, 28)],
            ),
        ];
        let f = compute_activity(&records);
        assert!((f.commit_frequency - 0.1).abs() < 1e-12);
        assert!((f.activity_consistency - 2.0 / 12.0).abs() < 1e-12);
        assert!((f.language_diversity - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_forks_are_ignored() {
        let records = vec![record(Some("Go"), true, vec![date(2024, 5, 1)])];
        let f = compute_activity(&records);
        assert_eq!(f.activity_consistency, 0.0);
        assert_eq!(f.language_diversity, 0.0);
    }

    #[test]
    fn test_languages_are_case_insensitive() {
        let records = vec![
            record(Some("Rust"), false, vec![]),
            record(Some("rust"), false, vec![]),
            record(None, false, vec![]),
        ];
        assert!((compute_activity(&records).language_diversity - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_features_saturate_at_one() {
        let languages = ["a", "b", "c", "d", "e", "f", "g"];
        let records: Vec<_> = languages
            .iter()
            .enumerate()
            .map(|(i, lang)| {
                let month = (i as u32 % 12) + 1;
                let dates = (0..30).map(|_| date(2023, month, 1)).collect();
                record(Some(lang), false, dates)
            })
            .chain((0..12).map(|m| record(None, false, vec![date(2022, m + 1, 1)])))
            .collect();
        let f = compute_activity(&records);
        assert_eq!(f.language_diversity, 1.0);
        assert_eq!(f.activity_consistency, 1.0);
        assert!(f.commit_frequency <= 1.0);
    }

    #[test]
    fn test_commit_cap_per_repository() {
        let dates = (0..100).map(|_| date(2024, 6, 1)).collect();
        let f = compute_activity(&[record(None, false, dates)]);
        // 30 commits in one month
        assert_eq!(f.commit_frequency, 1.0);
        assert!((f.activity_consistency - 1.0 / 12.0).abs() < 1e-12);
    }

    struct FlakyHost;

    fn flaky_repos() -> Vec<RepoDescriptor> {
        ["good", "broken"]
            .iter()
            .zip(["Rust", "Python"])
            .map(|(name, lang)| RepoDescriptor {
                name: name.to_string(),
                language: Some(lang.to_string()),
                fork: false,
                commits_url: Some(name.to_string()),
            })
            .collect()
    }

    #[async_trait]
    impl SourceHost for FlakyHost {
        async fn list_repos(&self, _username: &str) -> Result<Vec<RepoDescriptor>, FetchError> {
            Ok(flaky_repos())
        }

        async fn list_commit_dates(
            &self,
            repo: &RepoDescriptor,
            _limit: usize,
        ) -> Result<Vec<DateTime<Utc>>, FetchError> {
            if repo.name == "broken" {
                return Err(FetchError::Status {
                    status: 409,
                    url: "broken".to_string(),
                });
            }
            Ok(vec![date(2024, 1, 3), date(2024, 2, 3), date(2024, 3, 3)])
        }

        async fn fetch_source_text(&self, _owner: &str, _repo: &str) -> Result<String, FetchError> {
            Ok(String::new())
        }
    }

    #[tokio::test]
    async fn test_failed_commit_list_is_skipped() {
        let extractor = ActivityExtractor::new(Arc::new(FlakyHost));
        let f = extractor.extract("octo", &flaky_repos()).await;
        // 3 commits over 3 months from "good"; both languages counted
        assert!((f.commit_frequency - 1.0 / 30.0).abs() < 1e-12);
        assert!((f.activity_consistency - 0.25).abs() < 1e-12);
        assert!((f.language_diversity - 0.4).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_no_repositories_yields_zeroes() {
        let f = ActivityExtractor::new(Arc::new(FlakyHost)).extract("octo", &[]).await;
        assert_eq!(f, compute_activity(&[]));
    }
}
