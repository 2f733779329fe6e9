use crate::types::GitHubRepo;
use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Message used for any HTTP status without a dedicated entry.
pub const UNKNOWN_ERROR: &str = "Unknown Error!\n";

/// Looks up the user-facing message for a non-200 status.
pub fn error_message(status: u16) -> &'static str {
    match status {
        401 => "401 Unauthorized!",
        403 => "403 Forbidden!",
        404 => "404 Not Found!",
        _ => UNKNOWN_ERROR,
    }
}

/// Repository metadata extracted from a successful API response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepoInfo {
    pub name: Option<String>,
    pub description: Option<String>,
    pub owner: Option<String>,
    pub avatar: Option<String>,
    pub stars: Option<u64>,
    pub watchers: Option<u64>,
    pub forks: Option<u64>,
    pub license: Option<String>,
}

impl From<GitHubRepo> for RepoInfo {
    fn from(repo: GitHubRepo) -> Self {
        let (owner, avatar) = match repo.owner {
            Some(owner) => (owner.login, owner.avatar_url),
            None => (None, None),
        };

        RepoInfo {
            name: repo.name,
            description: repo.description,
            owner,
            avatar,
            stars: repo.stargazers_count,
            watchers: repo.subscribers_count,
            forks: repo.forks,
            license: repo.license.and_then(|license| license.spdx_id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    NetworkError,
    HttpError,
    DecodeError,
}

/// Why a repository lookup failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchFailure {
    pub kind: FailureKind,
    pub status: String,
    pub message: String,
}

impl FetchFailure {
    pub fn http(status: u16) -> Self {
        Self {
            kind: FailureKind::HttpError,
            status: status.to_string(),
            message: error_message(status).to_string(),
        }
    }

    pub fn network(err: &impl fmt::Display) -> Self {
        let detail = err.to_string();
        Self {
            kind: FailureKind::NetworkError,
            status: detail.clone(),
            message: detail,
        }
    }

    pub fn decode(err: &impl fmt::Display) -> Self {
        let detail = err.to_string();
        Self {
            kind: FailureKind::DecodeError,
            status: detail.clone(),
            message: detail,
        }
    }

    pub fn detail(&self) -> &str {
        &self.message
    }

    /// The HTTP status code, when the failure came from one.
    pub fn status_code(&self) -> Option<u16> {
        match self.kind {
            FailureKind::HttpError => self.status.parse().ok(),
            _ => None,
        }
    }
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} [{}]: {}", self.kind, self.status, self.message.trim_end())
    }
}

/// Outcome of a repository lookup.
///
/// Serializes to the `{"success": bool, "data": {...}}` envelope consumers
/// of the preview plugin expect.
#[derive(Debug, Clone, PartialEq)]
pub enum RepoInfoResult {
    Success(RepoInfo),
    Failure(FetchFailure),
}

impl RepoInfoResult {
    pub fn is_success(&self) -> bool {
        matches!(self, RepoInfoResult::Success(_))
    }

    pub fn info(&self) -> Option<&RepoInfo> {
        match self {
            RepoInfoResult::Success(info) => Some(info),
            RepoInfoResult::Failure(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&FetchFailure> {
        match self {
            RepoInfoResult::Success(_) => None,
            RepoInfoResult::Failure(failure) => Some(failure),
        }
    }

    pub fn into_result(self) -> Result<RepoInfo, FetchFailure> {
        match self {
            RepoInfoResult::Success(info) => Ok(info),
            RepoInfoResult::Failure(failure) => Err(failure),
        }
    }
}

impl Serialize for RepoInfoResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Envelope<'a, T> {
            success: bool,
            data: &'a T,
        }

        match self {
            RepoInfoResult::Success(info) => Envelope {
                success: true,
                data: info,
            }
            .serialize(serializer),
            RepoInfoResult::Failure(failure) => Envelope {
                success: false,
                data: failure,
            }
            .serialize(serializer),
        }
    }
}

/// Outbound chat attachment carrying an inline base64 PNG
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSegment {
    pub file: String,
}

impl ImageSegment {
    const PREFIX: &'static str = "base64://";

    pub fn from_png(png: &[u8]) -> Self {
        Self::from_base64(general_purpose::STANDARD.encode(png))
    }

    /// Wraps an already encoded payload
    pub fn from_base64(payload: String) -> Self {
        Self {
            file: format!("{}{}", Self::PREFIX, payload),
        }
    }

    pub fn base64_payload(&self) -> Option<&str> {
        self.file.strip_prefix(Self::PREFIX)
    }
}
