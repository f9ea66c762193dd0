// ABOUTME: Tracked repository reference as stored in the registry

use crate::git::url::{GithubRepo, ParseError, parse_github_url};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Working copies live directly under the target directory, so a name must be a
/// single plain path component.
pub fn validate_dir_name(name: &str) -> Result<(), ParseError> {
    let unsafe_name = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(|c: char| c == '/' || c == '\\');
    if unsafe_name {
        return Err(ParseError {
            message: format!("Invalid repository name: '{}'", name),
        });
    }
    Ok(())
}

/// A repository the dashboard tracks.
///
/// `name` is the working copy directory name under the target directory. When
/// it is absent the repo segment of the URL is used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub url: String,
}

impl RepositoryRef {
    /// Build a reference from a GitHub URL, deriving the name
    pub fn from_url(url: &str) -> Result<Self, ParseError> {
        let url = url.trim();
        let parsed = parse_github_url(url)?;
        validate_dir_name(&parsed.repo)?;
        Ok(Self {
            name: Some(parsed.repo),
            url: url.to_string(),
        })
    }

    pub fn with_name(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            url: url.into(),
        }
    }

    /// Directory name of the working copy
    pub fn resolved_name(&self) -> Result<String, ParseError> {
        let name = match &self.name {
            Some(name) if !name.trim().is_empty() => name.clone(),
            _ => parse_github_url(&self.url)?.repo,
        };
        validate_dir_name(&name)?;
        Ok(name)
    }

    /// Name for display and lookups, falling back to the raw URL
    pub fn display_name(&self) -> String {
        self.resolved_name().unwrap_or_else(|_| self.url.clone())
    }

    /// Owner/repo split for display; `None` for non-GitHub URLs
    pub fn github(&self) -> Option<GithubRepo> {
        parse_github_url(&self.url).ok()
    }

    pub fn local_path(&self, target_dir: &Path) -> Result<PathBuf, ParseError> {
        Ok(target_dir.join(self.resolved_name()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_from_url_derives_name() {
        let repo = RepositoryRef::from_url("  git@github.com:owner/tool.git ").unwrap();
        assert_eq!(repo.name.as_deref(), Some("tool"));
        assert_eq!(repo.url, "git@github.com:owner/tool.git");
    }

    #[test]
    fn test_stored_name_wins_over_url() {
        let repo = RepositoryRef::with_name("custom", "https://github.com/owner/tool");
        assert_eq!(repo.resolved_name().unwrap(), "custom");
        assert_eq!(
            repo.local_path(Path::new(".context")).unwrap(),
            PathBuf::from(".context/custom")
        );
    }

    #[test]
    fn test_missing_name_falls_back_to_url() {
        let repo = RepositoryRef {
            name: None,
            url: "https://github.com/owner/tool.git".to_string(),
        };
        assert_eq!(repo.resolved_name().unwrap(), "tool");
    }

    #[test]
    fn test_unresolvable_name() {
        let repo = RepositoryRef {
            name: None,
            url: "https://example.com/owner/tool".to_string(),
        };
        assert!(repo.resolved_name().is_err());
        assert_eq!(repo.display_name(), "https://example.com/owner/tool");
    }

    #[test]
    fn test_dot_segments_are_rejected() {
        assert!(RepositoryRef::from_url("https://github.com/owner/..").is_err());
        assert!(RepositoryRef::from_url("git@github.com:owner/..git").is_err());

        let derived = RepositoryRef {
            name: None,
            url: "https://github.com/owner/..".to_string(),
        };
        assert!(derived.local_path(Path::new(".context")).is_err());
    }

    #[test]
    fn test_stored_name_must_stay_inside_target() {
        for name in ["..", ".", "../x", "a/b", "a\\b"] {
            let repo = RepositoryRef::with_name(name, "https://github.com/owner/tool");
            assert!(repo.local_path(Path::new(".context")).is_err(), "{name} accepted");
        }
    }
}
