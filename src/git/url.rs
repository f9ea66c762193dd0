// ABOUTME: GitHub remote URL parsing for https and ssh forms

use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;
use thiserror::Error;

lazy_static! {
    static ref GITHUB_URL: Regex = Regex::new(
        r"^(?:https://github\.com/|git@github\.com:)(?P<owner>[^/]+)/(?P<repo>[^/]+?)(?:\.git)?$"
    )
    .expect("GitHub URL pattern is valid");
}

/// Owner and repository segments of a GitHub remote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GithubRepo {
    pub owner: String,
    pub repo: String,
}

impl fmt::Display for GithubRepo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ParseError {
    pub message: String,
}

impl ParseError {
    fn invalid(url: &str) -> Self {
        Self {
            message: format!("Invalid GitHub URL: {}", url),
        }
    }
}

/// Extract `{owner, repo}` from `https://github.com/o/r[.git]` or `git@github.com:o/r[.git]`
pub fn parse_github_url(url: &str) -> Result<GithubRepo, ParseError> {
    let url = url.trim();
    let caps = GITHUB_URL
        .captures(url)
        .ok_or_else(|| ParseError::invalid(url))?;

    let owner = caps.name("owner").map_or("", |m| m.as_str());
    let repo = caps.name("repo").map_or("", |m| m.as_str());
    if owner.is_empty() || repo.is_empty() {
        return Err(ParseError::invalid(url));
    }

    Ok(GithubRepo {
        owner: owner.to_string(),
        repo: repo.to_string(),
    })
}
