use crate::error::GitHubPreviewError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

const REPO_LINK_PATTERN: &str = r"github\.com/([^/\s]+)/([^/\s]+)";

fn repo_link() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(REPO_LINK_PATTERN).expect("repository link pattern is valid"))
}

/// An `owner/repo` pair pulled out of a chat message
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoRef {
    pub owner: String,
    pub repo: String,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// Accepts either a message/URL containing `github.com/owner/repo` or a bare
/// `owner/repo`.
impl FromStr for RepoRef {
    type Err = GitHubPreviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(repo) = parse_repo_ref(s) {
            return Ok(repo);
        }

        let trimmed = s.trim();
        match trimmed.split_once('/') {
            Some((owner, repo))
                if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') =>
            {
                Ok(RepoRef::new(owner, repo.strip_suffix(".git").unwrap_or(repo)))
            }
            _ => Err(GitHubPreviewError::InvalidRepoUrl(format!(
                "Expected owner/repo or a github.com link: {}",
                s
            ))),
        }
    }
}

/// Finds the first `github.com/<owner>/<repo>` link in a message.
pub fn parse_repo_ref(message: &str) -> Option<RepoRef> {
    let captures = repo_link().captures(message)?;
    let owner = captures.get(1)?.as_str();
    let repo = captures.get(2)?.as_str();
    let repo = repo.strip_suffix(".git").unwrap_or(repo);

    if repo.is_empty() {
        return None;
    }

    Some(RepoRef::new(owner, repo))
}
