//! GitHub event payloads that can trigger a run.
//!
//! Only the fields the handlers read are modelled; everything else in the
//! event file is ignored.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Top-level GitHub event file (subset)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventPayload {
    /// Present on `push` events
    #[serde(default)]
    pub head_commit: Option<HeadCommit>,
    /// Present on `pull_request` events
    #[serde(default)]
    pub pull_request: Option<PullRequest>,
}

impl EventPayload {
    /// Parse an event payload from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse GitHub event payload")
    }

    /// Read and parse the event file written by the Actions runner.
    pub async fn from_file(path: &Path) -> Result<Self> {
        let json = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read event file {}", path.display()))?;
        Self::from_json(&json)
    }
}

/// Head commit of a push
#[derive(Debug, Clone, Deserialize)]
pub struct HeadCommit {
    /// Commit URL
    #[serde(default)]
    pub url: String,
    /// Full commit message
    #[serde(default)]
    pub message: String,
    /// Commit author
    #[serde(default)]
    pub author: CommitAuthor,
}

/// Git author of a commit
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommitAuthor {
    /// Author display name
    #[serde(default)]
    pub name: String,
}

/// Pull request state as reported by GitHub
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PullRequestState {
    Open,
    Closed,
    #[default]
    #[serde(other)]
    Other,
}

/// GitHub Pull Request (subset)
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequest {
    /// Browser URL
    #[serde(default)]
    pub html_url: Option<String>,
    /// API URL
    #[serde(default)]
    pub url: Option<String>,
    /// PR title
    #[serde(default)]
    pub title: String,
    /// PR author
    #[serde(default)]
    pub user: PullRequestUser,
    /// PR state
    #[serde(default)]
    pub state: PullRequestState,
}

impl PullRequest {
    /// Link attached or posted for this pull request, preferring the browser URL.
    #[must_use]
    pub fn link(&self) -> &str {
        self.html_url
            .as_deref()
            .filter(|u| !u.is_empty())
            .or(self.url.as_deref())
            .unwrap_or_default()
    }

    /// Name shown in comments for the PR author.
    #[must_use]
    pub fn author(&self) -> &str {
        self.user.display_name()
    }
}

/// GitHub user attached to a pull request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PullRequestUser {
    /// Display name (not always present in webhook payloads)
    #[serde(default)]
    pub name: Option<String>,
    /// Login handle
    #[serde(default)]
    pub login: Option<String>,
}

impl PullRequestUser {
    /// Display name, falling back to the login.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .or(self.login.as_deref())
            .unwrap_or_default()
    }
}

/// The event a run reacts to.
#[derive(Debug, Clone)]
pub enum TriggeringEvent {
    Commit(HeadCommit),
    PullRequest(PullRequest),
}

impl TriggeringEvent {
    /// Classify a payload.
    ///
    /// A head commit with a message wins over a pull request with a title;
    /// `None` when neither is present.
    #[must_use]
    pub fn from_payload(payload: EventPayload) -> Option<Self> {
        let EventPayload {
            head_commit,
            pull_request,
        } = payload;

        if let Some(commit) = head_commit.filter(|c| !c.message.is_empty()) {
            return Some(Self::Commit(commit));
        }

        pull_request
            .filter(|pr| !pr.title.is_empty())
            .map(Self::PullRequest)
    }

    /// Short name used in logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Commit(_) => "commit",
            Self::PullRequest(_) => "pull_request",
        }
    }
}
