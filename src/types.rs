use serde::Deserialize;

// GitHub API response structures. Every field is optional so a sparse or
// partially null payload still maps cleanly.
#[derive(Debug, Deserialize)]
pub struct GitHubRepo {
    pub name: Option<String>,
    pub full_name: Option<String>,
    pub description: Option<String>,
    pub owner: Option<GitHubOwner>,
    pub stargazers_count: Option<u64>,
    pub subscribers_count: Option<u64>,
    pub forks: Option<u64>,
    pub license: Option<GitHubLicense>,
}

#[derive(Debug, Deserialize)]
pub struct GitHubOwner {
    pub login: Option<String>,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GitHubLicense {
    pub spdx_id: Option<String>,
}
