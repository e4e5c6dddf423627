//! GitHub client: the source-hosting collaborator behind the activity and
//! code-artifact extractors.
//!
//! Every call surfaces failures as `FetchError`; callers decide whether a
//! failure means "no data" or something worse. Nothing here retries.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, RequestBuilder};
use serde::{de::DeserializeOwned, Deserialize};
use thiserror::Error;
use tracing::debug;

use crate::models::activity::RepoDescriptor;

const GITHUB_ACCEPT: &str = "application/vnd.github+json";
const CLIENT_USER_AGENT: &str = concat!("score-engine/", env!("CARGO_PKG_VERSION"));
/// File extensions treated as source code when sampling a repository.
const SOURCE_EXTENSIONS: &[&str] = &[".py", ".js", ".java", ".ts", ".rs", ".go"];
/// Upper bound on raw file downloads per repository.
const MAX_FILES_PER_REPO: usize = 20;
/// GitHub's default page size. Bounds the repositories walked per request.
const REPOS_PER_PAGE: usize = 30;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Source host returned status {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Malformed payload: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Read-only view of a source-hosting service.
///
/// Carried in `AppState` as `Arc<dyn SourceHost>` so tests can substitute an
/// in-memory host.
#[async_trait]
pub trait SourceHost: Send + Sync {
    async fn list_repos(&self, username: &str) -> Result<Vec<RepoDescriptor>, FetchError>;

    /// Author dates of the most recent commits, at most `limit` of them.
    async fn list_commit_dates(
        &self,
        repo: &RepoDescriptor,
        limit: usize,
    ) -> Result<Vec<DateTime<Utc>>, FetchError>;

    /// Concatenated text of the repository's top-level source files.
    async fn fetch_source_text(&self, owner: &str, repo: &str) -> Result<String, FetchError>;
}

#[derive(Debug, Deserialize)]
struct CommitEnvelope {
    #[serde(default)]
    commit: Option<CommitDetail>,
}

#[derive(Debug, Deserialize)]
struct CommitDetail {
    #[serde(default)]
    author: Option<CommitAuthor>,
}

#[derive(Debug, Deserialize)]
struct CommitAuthor {
    #[serde(default)]
    date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ContentEntry {
    name: String,
    #[serde(default)]
    download_url: Option<String>,
}

/// GitHub REST v3 client. Anonymous when no token is configured.
#[derive(Clone)]
pub struct GitHubClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl GitHubClient {
    pub fn new(
        base_url: impl Into<String>,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        })
    }

    fn get(&self, url: &str) -> RequestBuilder {
        let request = self
            .client
            .get(url)
            .header(ACCEPT, GITHUB_ACCEPT)
            .header(USER_AGENT, CLIENT_USER_AGENT);
        match &self.token {
            Some(token) => request.header(AUTHORIZATION, format!("token {token}")),
            None => request,
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, FetchError> {
        let response = self.get(url).query(query).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        let response = self.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response.text().await?)
    }
}

#[async_trait]
impl SourceHost for GitHubClient {
    async fn list_repos(&self, username: &str) -> Result<Vec<RepoDescriptor>, FetchError> {
        let url = format!("{}/users/{username}/repos", self.base_url);
        let repos: Vec<RepoDescriptor> = self
            .get_json(&url, &[("per_page", REPOS_PER_PAGE.to_string())])
            .await?;
        debug!("Listed {} repositories for {username}", repos.len());
        Ok(repos)
    }

    async fn list_commit_dates(
        &self,
        repo: &RepoDescriptor,
        limit: usize,
    ) -> Result<Vec<DateTime<Utc>>, FetchError> {
        let Some(template) = repo.commits_url.as_deref() else {
            return Ok(vec![]);
        };
        let url = template.replace("{/sha}", "");

        let commits: Vec<CommitEnvelope> = self
            .get_json(&url, &[("per_page", limit.to_string())])
            .await?;

        Ok(commits
            .into_iter()
            .take(limit)
            .filter_map(|c| c.commit?.author?.date)
            .filter_map(|date| parse_commit_date(&date))
            .collect())
    }

    async fn fetch_source_text(&self, owner: &str, repo: &str) -> Result<String, FetchError> {
        let url = format!("{}/repos/{owner}/{repo}/contents", self.base_url);
        let entries: Vec<ContentEntry> = self.get_json(&url, &[]).await?;

        let mut code_text = String::new();
        let source_files = entries
            .iter()
            .filter(|e| is_source_file(&e.name))
            .filter_map(|e| e.download_url.as_deref())
            .take(MAX_FILES_PER_REPO);

        for raw_url in source_files {
            // A single unreadable file does not spoil the rest of the sample
            match self.get_text(raw_url).await {
                Ok(text) => {
                    code_text.push_str(&text);
                    code_text.push('\n');
                }
                Err(e) => debug!("Skipping {raw_url}: {e}"),
            }
        }

        Ok(code_text)
    }
}

fn is_source_file(name: &str) -> bool {
    SOURCE_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
}

fn parse_commit_date(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|d| d.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn client(base_url: String, token: Option<&str>) -> GitHubClient {
        GitHubClient::new(base_url, token.map(String::from), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_list_repos_parses_descriptors_and_sends_token() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/users/octo/repos")
            .match_query(Matcher::UrlEncoded("per_page".into(), "30".into()))
            .match_header("authorization", "token secret")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[
                    {"name": "app", "language": "Rust", "fork": false,
                     "commits_url": "https://example/repos/octo/app/commits{/sha}"},
                    {"name": "fork", "language": null, "fork": true}
                ]"#,
            )
            .create_async()
            .await;

        let repos = client(server.url(), Some("secret"))
            .list_repos("octo")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(repos.len(), 2);
        assert_eq!(repos[0].language.as_deref(), Some("Rust"));
        assert!(repos[1].fork);
        assert!(repos[1].commits_url.is_none());
    }

    #[tokio::test]
    async fn test_list_repos_non_success_is_status_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/users/ghost/repos")
            .match_query(Matcher::Any)
            .with_status(404)
            .create_async()
            .await;

        let err = client(server.url(), None)
            .list_repos("ghost")
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_list_repos_malformed_payload() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/users/octo/repos")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"message": "not a list"}"#)
            .create_async()
            .await;

        let err = client(server.url(), None)
            .list_repos("octo")
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Payload(_)));
    }

    #[tokio::test]
    async fn test_list_commit_dates_skips_undated_and_honours_limit() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/repos/octo/app/commits")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                r#"[
                    {"commit": {"author": {"date": "2024-03-02T10:00:00Z"}}},
                    {"commit": {"author": {}}},
                    {"commit": {"author": {"date": "2024-02-11T08:30:00Z"}}},
                    {"commit": {"author": {"date": "2024-01-05T12:00:00Z"}}}
                ]"#,
            )
            .create_async()
            .await;

        let repo = RepoDescriptor {
            name: "app".to_string(),
            language: Some("Rust".to_string()),
            fork: false,
            commits_url: Some(format!("{}/repos/octo/app/commits{{/sha}}", server.url())),
        };

        let dates = client(server.url(), None)
            .list_commit_dates(&repo, 3)
            .await
            .unwrap();

        // Limit applies to commits, the undated one is then dropped
        assert_eq!(dates.len(), 2);
        assert_eq!(dates[0].to_rfc3339(), "2024-03-02T10:00:00+00:00");
    }

    #[tokio::test]
    async fn test_list_commit_dates_without_url_is_empty() {
        let repo = RepoDescriptor {
            name: "bare".to_string(),
            language: None,
            fork: false,
            commits_url: None,
        };
        let dates = client("http://127.0.0.1:1".to_string(), None)
            .list_commit_dates(&repo, 30)
            .await
            .unwrap();
        assert!(dates.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_source_text_keeps_only_source_files() {
        let mut server = mockito::Server::new_async().await;
        let base = server.url();
        server
            .mock("GET", "/repos/octo/app/contents")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(format!(
                r#"[
                    {{"name": "main.py", "download_url": "{base}/raw/main.py"}},
                    {{"name": "README.md", "download_url": "{base}/raw/README.md"}},
                    {{"name": "lib.rs", "download_url": "{base}/raw/lib.rs"}},
                    {{"name": "src", "download_url": null}}
                ]"#
            ))
            .create_async()
            .await;
        server
            .mock("GET", "/raw/main.py")
            .with_status(200)
            .with_body("print('hi')")
            .create_async()
            .await;
        server
            .mock("GET", "/raw/lib.rs")
            .with_status(500)
            .create_async()
            .await;
        let readme = server
            .mock("GET", "/raw/README.md")
            .with_status(200)
            .with_body("# readme")
            .expect(0)
            .create_async()
            .await;

        let text = client(base.clone(), None)
            .fetch_source_text("octo", "app")
            .await
            .unwrap();

        readme.assert_async().await;
        assert_eq!(text, "print('hi')\n");
    }

    #[test]
    fn test_is_source_file() {
        assert!(is_source_file("main.py"));
        assert!(is_source_file("index.js"));
        assert!(!is_source_file("README.md"));
        assert!(!is_source_file("Makefile"));
    }
}
