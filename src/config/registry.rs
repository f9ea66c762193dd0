// ABOUTME: Registry of tracked repositories persisted as a versioned JSON file

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info};

use crate::git::url::ParseError;
use crate::models::{RepositoryRef, validate_dir_name};

pub const REGISTRY_VERSION: u32 = 1;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to decode registry {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(
        "Registry {path} lists bare URLs. Rewrite it as \
         {{\"version\": 1, \"repos\": [{{\"url\": \"https://github.com/owner/repo\"}}]}}"
    )]
    LegacySchema { path: PathBuf },

    #[error("Registry {path} has unsupported version {version}")]
    UnsupportedVersion { path: PathBuf, version: u32 },

    #[error("Failed to encode registry: {0}")]
    Encode(#[source] serde_json::Error),

    #[error(transparent)]
    InvalidUrl(#[from] ParseError),

    #[error("A repository named '{name}' is already tracked ({existing_url})")]
    NameConflict { name: String, existing_url: String },

    #[error("No tracked repository named '{0}'")]
    NotFound(String),
}

fn default_version() -> u32 {
    REGISTRY_VERSION
}

/// Ordered list of tracked repositories
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registry {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub repos: Vec<RepositoryRef>,
}

impl Default for Registry {
    fn default() -> Self {
        Self {
            version: REGISTRY_VERSION,
            repos: Vec::new(),
        }
    }
}

impl Registry {
    pub fn new(repos: Vec<RepositoryRef>) -> Self {
        Self {
            version: REGISTRY_VERSION,
            repos,
        }
    }

    pub fn len(&self) -> usize {
        self.repos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.repos.is_empty()
    }

    pub fn find(&self, name: &str) -> Option<&RepositoryRef> {
        self.repos.iter().find(|r| r.display_name() == name)
    }

    /// Registry with `repo` appended.
    ///
    /// Returns `Ok(None)` when the URL is already tracked.
    pub fn with_repo(&self, repo: RepositoryRef) -> Result<Option<Self>, ConfigError> {
        if self.repos.iter().any(|r| r.url.trim() == repo.url.trim()) {
            return Ok(None);
        }

        let name = repo.resolved_name()?;
        if let Some(existing) = self.find(&name) {
            return Err(ConfigError::NameConflict {
                name,
                existing_url: existing.url.clone(),
            });
        }

        let mut next = self.clone();
        next.repos.push(repo);
        Ok(Some(next))
    }

    /// Registry without the repository named `name`
    pub fn without(&self, name: &str) -> Result<Self, ConfigError> {
        let mut next = self.clone();
        next.repos.retain(|r| r.display_name() != name);
        if next.repos.len() == self.repos.len() {
            return Err(ConfigError::NotFound(name.to_string()));
        }
        Ok(next)
    }

    fn decode(path: &Path, content: &str) -> Result<Self, ConfigError> {
        let value: serde_json::Value =
            serde_json::from_str(content).map_err(|source| ConfigError::Decode {
                path: path.to_path_buf(),
                source,
            })?;

        let legacy = value
            .get("repos")
            .and_then(serde_json::Value::as_array)
            .is_some_and(|repos| repos.iter().any(serde_json::Value::is_string));
        if legacy {
            return Err(ConfigError::LegacySchema {
                path: path.to_path_buf(),
            });
        }

        let registry: Self =
            serde_json::from_value(value).map_err(|source| ConfigError::Decode {
                path: path.to_path_buf(),
                source,
            })?;
        if registry.version != REGISTRY_VERSION {
            return Err(ConfigError::UnsupportedVersion {
                path: path.to_path_buf(),
                version: registry.version,
            });
        }
        for name in registry.repos.iter().filter_map(|r| r.name.as_deref()) {
            validate_dir_name(name)?;
        }
        Ok(registry)
    }
}

/// Reads and atomically rewrites the registry file
#[derive(Debug, Clone)]
pub struct RegistryStore {
    path: PathBuf,
}

impl RegistryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> ConfigError {
        ConfigError::Io {
            path: self.path.clone(),
            source,
        }
    }

    /// Load the registry, creating its parent directory. A missing file is an empty registry.
    pub fn load(&self) -> Result<Registry, ConfigError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No registry at {}, starting empty", self.path.display());
                return Ok(Registry::default());
            }
            Err(e) => return Err(self.io_error(e)),
        };

        Registry::decode(&self.path, &content)
    }

    /// Replace the file through a temporary sibling and a rename
    pub fn save(&self, registry: &Registry) -> Result<(), ConfigError> {
        let mut content = serde_json::to_string_pretty(registry).map_err(ConfigError::Encode)?;
        content.push('\n');

        let dir = match self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => parent.to_path_buf(),
            None => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(|e| self.io_error(e))?;

        let mut tmp = NamedTempFile::new_in(&dir).map_err(|e| self.io_error(e))?;
        tmp.write_all(content.as_bytes())
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|e| self.io_error(e))?;
        tmp.persist(&self.path).map_err(|e| self.io_error(e.error))?;
        Ok(())
    }

    /// Track `url`. Adding an already tracked URL changes nothing.
    pub fn add_repo(&self, url: &str) -> Result<Registry, ConfigError> {
        let repo = RepositoryRef::from_url(url)?;
        let registry = self.load()?;

        match registry.with_repo(repo)? {
            Some(next) => {
                self.save(&next)?;
                info!("Added {} to {}", url.trim(), self.path.display());
                Ok(next)
            }
            None => {
                debug!("{} is already tracked", url.trim());
                Ok(registry)
            }
        }
    }

    /// Stop tracking `name`. The working copy on disk is left alone.
    pub fn remove_repo(&self, name: &str) -> Result<Registry, ConfigError> {
        let registry = self.load()?;
        let next = registry.without(name)?;
        self.save(&next)?;
        info!("Removed {} from {}", name, self.path.display());
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_duplicate_url_is_noop() {
        let registry = Registry::new(vec![
            RepositoryRef::from_url("https://github.com/Effect-TS/effect").unwrap(),
        ]);
        let repo = RepositoryRef::from_url("https://github.com/Effect-TS/effect").unwrap();
        assert_eq!(registry.with_repo(repo).unwrap(), None);
    }

    #[test]
    fn test_same_name_different_url_conflicts() {
        let registry = Registry::new(vec![
            RepositoryRef::from_url("https://github.com/Effect-TS/effect").unwrap(),
        ]);
        let repo = RepositoryRef::from_url("git@github.com:someone/effect.git").unwrap();
        let err = registry.with_repo(repo).unwrap_err();
        assert!(matches!(err, ConfigError::NameConflict { ref name, .. } if name == "effect"));
    }

    #[test]
    fn test_without_unknown_name_is_not_found() {
        let registry = Registry::default();
        assert!(matches!(
            registry.without("ghost"),
            Err(ConfigError::NotFound(name)) if name == "ghost"
        ));
    }

    #[test]
    fn test_decode_defaults_version_and_name() {
        let registry = Registry::decode(
            Path::new("config.json"),
            r#"{ "repos": [ { "url": "https://github.com/ratatui/ratatui" } ] }"#,
        )
        .unwrap();
        assert_eq!(registry.version, 1);
        assert_eq!(registry.repos[0].name, None);
        assert_eq!(registry.repos[0].display_name(), "ratatui");
    }

    #[test]
    fn test_decode_rejects_legacy_string_list() {
        let err = Registry::decode(
            Path::new("config.json"),
            r#"{ "repos": ["https://github.com/ratatui/ratatui"] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::LegacySchema { .. }));
    }

    #[test]
    fn test_decode_rejects_wrong_shape() {
        let err = Registry::decode(Path::new("config.json"), r#"{ "repos": "nope" }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Decode { .. }));
        let err = Registry::decode(Path::new("config.json"), "invalid json").unwrap_err();
        assert!(matches!(err, ConfigError::Decode { .. }));
    }

    #[test]
    fn test_decode_rejects_future_version() {
        let err = Registry::decode(Path::new("config.json"), r#"{ "version": 2, "repos": [] }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedVersion { version: 2, .. }));
    }

    #[test]
    fn test_decode_rejects_escaping_name() {
        let err = Registry::decode(
            Path::new("config.json"),
            r#"{ "version": 1, "repos": [ { "name": "../x", "url": "https://github.com/o/x" } ] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl(_)));
    }

    fn store_in(dir: &tempfile::TempDir) -> RegistryStore {
        RegistryStore::new(dir.path().join(".context").join("config.json"))
    }

    #[test]
    fn test_load_creates_parent_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = store_in(&dir);

        let registry = store.load().unwrap();

        assert!(registry.is_empty());
        assert!(dir.path().join(".context").is_dir());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_save_then_load_keeps_entries() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = store_in(&dir);
        let registry = Registry::new(vec![
            RepositoryRef::from_url("https://github.com/Effect-TS/effect").unwrap(),
            RepositoryRef::with_name("tui", "git@github.com:ratatui/ratatui.git"),
        ]);

        store.save(&registry).unwrap();

        assert_eq!(store.load().unwrap(), registry);
    }

    #[test]
    fn test_adding_same_url_twice_leaves_file_unchanged() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = store_in(&dir);
        store.add_repo("https://github.com/Effect-TS/effect").unwrap();
        let before = fs::read(store.path()).unwrap();

        let registry = store.add_repo("  https://github.com/Effect-TS/effect ").unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(fs::read(store.path()).unwrap(), before);
    }

    #[test]
    fn test_removing_unknown_name_leaves_file_unchanged() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = store_in(&dir);
        store.add_repo("https://github.com/Effect-TS/effect").unwrap();
        store.add_repo("https://github.com/ratatui/ratatui").unwrap();
        let before = fs::read(store.path()).unwrap();

        let err = store.remove_repo("ghost").unwrap_err();

        assert!(matches!(err, ConfigError::NotFound(_)));
        assert_eq!(fs::read(store.path()).unwrap(), before);
    }

    #[test]
    fn test_dot_dot_url_is_not_stored() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = store_in(&dir);

        let err = store.add_repo("https://github.com/owner/..").unwrap_err();

        assert!(matches!(err, ConfigError::InvalidUrl(_)));
        assert!(!store.path().exists());
    }
}
