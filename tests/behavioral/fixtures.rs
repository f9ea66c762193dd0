// ABOUTME: Shared test fixtures and utilities for behavioral tests
//
// Provides:
// - TestRepo: temporary git repository with an initial commit
// - Upstream: a bare clone of a TestRepo that working copies clone from
// - git_available() / require_git!(): skip tests when git is missing

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn git(args: &[&str], cwd: &Path) -> Result<String> {
    let output = Command::new("git").args(args).current_dir(cwd).output()?;
    if !output.status.success() {
        anyhow::bail!(
            "git {} failed: {}",
            args.join(" "),
            String::from_utf8_lossy(&output.stderr)
        );
    }
    Ok(String::from_utf8(output.stdout)?.trim().to_string())
}

/// Creates a temporary git repository with initial commit
pub struct TestRepo {
    pub dir: TempDir,
    pub path: PathBuf,
}

impl TestRepo {
    pub fn new() -> Result<Self> {
        let dir = TempDir::new()?;
        let path = dir.path().to_path_buf();

        git(&["init", "--quiet"], &path)?;
        configure_identity(&path)?;

        std::fs::write(path.join("README.md"), "# Test Repo\n")?;
        git(&["add", "."], &path)?;
        git(&["commit", "--quiet", "-m", "Initial commit"], &path)?;

        Ok(Self { dir, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Add a file and commit it
    pub fn add_commit(&self, filename: &str, content: &str, message: &str) -> Result<()> {
        std::fs::write(self.path.join(filename), content)?;
        git(&["add", filename], &self.path)?;
        git(&["commit", "--quiet", "-m", message], &self.path)?;
        Ok(())
    }
}

fn configure_identity(path: &Path) -> Result<()> {
    git(&["config", "user.email", "test@test.com"], path)?;
    git(&["config", "user.name", "Test User"], path)?;
    git(&["config", "commit.gpgsign", "false"], path)?;
    Ok(())
}

/// A bare repository standing in for GitHub, fed from a TestRepo
pub struct Upstream {
    pub source: TestRepo,
    pub bare_dir: TempDir,
    pub bare_path: PathBuf,
}

impl Upstream {
    pub fn new() -> Result<Self> {
        let source = TestRepo::new()?;
        let bare_dir = TempDir::new()?;
        let bare_path = bare_dir.path().join("upstream.git");

        let bare_arg = bare_path.display().to_string();
        let source_arg = source.path().display().to_string();
        git(&["clone", "--quiet", "--bare", &source_arg, &bare_arg], bare_dir.path())?;

        Ok(Self {
            source,
            bare_dir,
            bare_path,
        })
    }

    /// URL working copies clone from
    pub fn url(&self) -> String {
        self.bare_path.display().to_string()
    }

    /// Commit in the source repository and push it to the bare upstream
    pub fn push_commit(&self, filename: &str, content: &str, message: &str) -> Result<()> {
        self.source.add_commit(filename, content, message)?;
        let bare_arg = self.url();
        git(&["push", "--quiet", &bare_arg, "HEAD"], self.source.path())?;
        Ok(())
    }
}

/// Commit directly inside a working copy, diverging it from upstream
pub fn commit_in(path: &Path, filename: &str, content: &str, message: &str) -> Result<()> {
    configure_identity(path)?;
    std::fs::write(path.join(filename), content)?;
    git(&["add", filename], path)?;
    git(&["commit", "--quiet", "-m", message], path)?;
    Ok(())
}

/// Check if git is available on the system
pub fn git_available() -> bool {
    Command::new("git")
        .args(["--version"])
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Macro to skip test if git is not available
#[macro_export]
macro_rules! require_git {
    () => {
        if !super::fixtures::git_available() {
            eprintln!("Skipping test: git not available");
            return Ok(());
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_creation() -> Result<()> {
        if !git_available() {
            return Ok(());
        }
        let upstream = Upstream::new()?;
        assert!(upstream.bare_path.join("HEAD").exists());
        Ok(())
    }
}
