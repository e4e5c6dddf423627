use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Repository descriptor as listed by the source-hosting API.
#[derive(Debug, Clone, Deserialize)]
pub struct RepoDescriptor {
    pub name: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub fork: bool,
    /// URI template, e.g. `https://api.github.com/repos/o/r/commits{/sha}`.
    #[serde(default)]
    pub commits_url: Option<String>,
}

/// Per-repository activity gathered for one scoring request.
#[derive(Debug, Clone, Default)]
pub struct RawActivityRecord {
    pub language: Option<String>,
    pub fork: bool,
    pub commit_dates: Vec<DateTime<Utc>>,
}
