// ABOUTME: Settings for lazycontext, layered from defaults, TOML files, environment and CLI flags
// Also hosts the repository registry

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub mod registry;

pub use registry::{ConfigError, Registry, RegistryStore};

use crate::git::service::default_parallelism;
use crate::git::status::DEFAULT_FALLBACK_UPSTREAM;
use crate::models::log::DEFAULT_LOG_CAPACITY;

const ENV_PREFIX: &str = "LAZYCONTEXT_";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Directory holding one working copy per tracked repository
    pub target_dir: PathBuf,

    /// Registry JSON file
    pub registry_path: PathBuf,

    /// Compared against when a branch has no tracking upstream
    pub fallback_upstream: String,

    /// Shallow clone depth, full history when absent
    pub clone_depth: Option<u32>,

    pub fetch_before_status: bool,

    pub max_parallel_syncs: usize,

    pub log_capacity: usize,
}

/// One settings file; only the keys it sets override earlier layers
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct SettingsLayer {
    target_dir: Option<PathBuf>,
    registry_path: Option<PathBuf>,
    fallback_upstream: Option<String>,
    clone_depth: Option<u32>,
    fetch_before_status: Option<bool>,
    max_parallel_syncs: Option<usize>,
    log_capacity: Option<usize>,
}

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub config: Option<PathBuf>,
    pub target_dir: Option<PathBuf>,
    pub registry: Option<PathBuf>,
}

fn default_target_dir() -> PathBuf {
    PathBuf::from(".context")
}

fn default_registry_path() -> PathBuf {
    PathBuf::from(".context").join("config.json")
}

fn default_fallback_upstream() -> String {
    DEFAULT_FALLBACK_UPSTREAM.to_string()
}

fn default_log_capacity() -> usize {
    DEFAULT_LOG_CAPACITY
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            target_dir: default_target_dir(),
            registry_path: default_registry_path(),
            fallback_upstream: default_fallback_upstream(),
            clone_depth: None,
            fetch_before_status: false,
            max_parallel_syncs: default_parallelism(),
            log_capacity: default_log_capacity(),
        }
    }
}

impl Settings {
    /// Load settings; later layers win.
    ///
    /// Defaults, `~/.lazycontext/config.toml`, `./.lazycontext.toml`, the
    /// `--config` file, `LAZYCONTEXT_*` variables, then CLI flags.
    pub fn load(overrides: &SettingsOverrides) -> Result<Self> {
        let mut settings = Self::default();

        for path in Self::config_paths() {
            if path.exists() {
                settings.apply_file(&path)?;
            }
        }

        if let Some(path) = &overrides.config {
            if !path.exists() {
                bail!("Config file not found: {}", path.display());
            }
            settings.apply_file(path)?;
        }

        settings.apply_env(|key| std::env::var(key).ok())?;
        settings.apply_overrides(overrides);
        Ok(settings)
    }

    /// Per-user directory, `~/.lazycontext`
    pub fn user_dir() -> Result<PathBuf> {
        let home_dir = dirs::home_dir().context("Failed to get home directory")?;
        Ok(home_dir.join(".lazycontext"))
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![];

        if let Ok(user_dir) = Self::user_dir() {
            paths.push(user_dir.join("config.toml"));
        }

        if let Ok(cwd) = std::env::current_dir() {
            paths.push(cwd.join(".lazycontext.toml"));
        }

        paths
    }

    fn apply_file(&mut self, path: &Path) -> Result<()> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        let layer: SettingsLayer = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;
        debug!("Loaded settings from {}", path.display());
        self.apply_layer(layer);
        Ok(())
    }

    fn apply_layer(&mut self, layer: SettingsLayer) {
        if let Some(target_dir) = layer.target_dir {
            self.target_dir = target_dir;
        }
        if let Some(registry_path) = layer.registry_path {
            self.registry_path = registry_path;
        }
        if let Some(upstream) = layer.fallback_upstream {
            self.fallback_upstream = upstream;
        }
        if layer.clone_depth.is_some() {
            self.clone_depth = layer.clone_depth.filter(|d| *d > 0);
        }
        if let Some(fetch) = layer.fetch_before_status {
            self.fetch_before_status = fetch;
        }
        if let Some(parallel) = layer.max_parallel_syncs {
            self.max_parallel_syncs = parallel.max(1);
        }
        if let Some(capacity) = layer.log_capacity {
            self.log_capacity = capacity.max(1);
        }
    }

    /// Apply `LAZYCONTEXT_*` variables read through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{ENV_PREFIX}{name}")).filter(|v| !v.is_empty());

        let mut layer = SettingsLayer {
            target_dir: var("TARGET_DIR").map(PathBuf::from),
            registry_path: var("REGISTRY").map(PathBuf::from),
            fallback_upstream: var("FALLBACK_UPSTREAM"),
            ..SettingsLayer::default()
        };

        if let Some(depth) = var("CLONE_DEPTH") {
            layer.clone_depth = Some(
                depth
                    .parse()
                    .with_context(|| format!("Invalid {ENV_PREFIX}CLONE_DEPTH: {depth}"))?,
            );
        }
        if let Some(fetch) = var("FETCH") {
            layer.fetch_before_status = Some(parse_bool(&fetch).with_context(|| {
                format!("Invalid {ENV_PREFIX}FETCH: {fetch}")
            })?);
        }
        if let Some(parallel) = var("PARALLEL") {
            layer.max_parallel_syncs = Some(
                parallel
                    .parse()
                    .with_context(|| format!("Invalid {ENV_PREFIX}PARALLEL: {parallel}"))?,
            );
        }

        self.apply_layer(layer);
        Ok(())
    }

    pub fn apply_overrides(&mut self, overrides: &SettingsOverrides) {
        if let Some(target_dir) = &overrides.target_dir {
            self.target_dir.clone_from(target_dir);
        }
        if let Some(registry) = &overrides.registry {
            self.registry_path.clone_from(registry);
        }
    }

    pub fn registry_store(&self) -> RegistryStore {
        RegistryStore::new(self.registry_path.clone())
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("expected a boolean, got '{other}'"),
    }
}
