//! Update configuration
//!
//! Everything that used to be process-wide (list path, repository root,
//! issue tracker location, editor) lives in one value that callers pass
//! around explicitly.

use crate::error::{UpdateError, UpdateResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use sxi_model::{ListFile, DEFAULT_LIST_PATH};

/// Default issue tracker API
pub const DEFAULT_ISSUES_API_BASE: &str = "https://api.github.com";

/// Default repository holding the instance requests
pub const DEFAULT_ISSUES_REPOSITORY: &str = "searxng/searx-instances";

/// Configuration for applying requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateConfig {
    /// Git repository root
    pub repo_root: PathBuf,
    /// List file, relative paths resolve against `repo_root`
    pub list_path: PathBuf,
    /// Issue tracker API base URL
    pub issues_api_base: String,
    /// `owner/name` of the repository whose issues carry requests
    pub issues_repository: String,
    /// Editor command overriding `$VISUAL` / `$EDITOR`
    pub editor: Option<String>,
}

impl UpdateConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a TOML file; missing keys keep their defaults
    ///
    /// # Errors
    /// [`UpdateError::Config`] if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> UpdateResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| UpdateError::config(path, e.to_string()))?;
        toml::from_str(&text).map_err(|e| UpdateError::config(path, e.to_string()))
    }

    /// With repository root
    #[inline]
    #[must_use]
    pub fn with_repo_root(mut self, repo_root: impl Into<PathBuf>) -> Self {
        self.repo_root = repo_root.into();
        self
    }

    /// With list file path
    #[inline]
    #[must_use]
    pub fn with_list_path(mut self, list_path: impl Into<PathBuf>) -> Self {
        self.list_path = list_path.into();
        self
    }

    /// With editor command
    #[inline]
    #[must_use]
    pub fn with_editor(mut self, editor: impl Into<String>) -> Self {
        self.editor = Some(editor.into());
        self
    }

    /// With issue tracker location
    #[inline]
    #[must_use]
    pub fn with_issues(mut self, api_base: impl Into<String>, repository: impl Into<String>) -> Self {
        self.issues_api_base = api_base.into();
        self.issues_repository = repository.into();
        self
    }

    /// List file path resolved against the repository root
    #[must_use]
    pub fn resolved_list_path(&self) -> PathBuf {
        if self.list_path.is_absolute() {
            self.list_path.clone()
        } else {
            self.repo_root.join(&self.list_path)
        }
    }

    /// The list file this configuration points at
    #[inline]
    #[must_use]
    pub fn list_file(&self) -> ListFile {
        ListFile::new(self.resolved_list_path())
    }
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            repo_root: PathBuf::from("."),
            list_path: PathBuf::from(DEFAULT_LIST_PATH),
            issues_api_base: DEFAULT_ISSUES_API_BASE.to_string(),
            issues_repository: DEFAULT_ISSUES_REPOSITORY.to_string(),
            editor: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = UpdateConfig::new();
        assert_eq!(
            config.resolved_list_path(),
            PathBuf::from("./searxinstances/instances.yml")
        );
        assert_eq!(config.issues_repository, "searxng/searx-instances");
        assert!(config.editor.is_none());
    }

    #[test]
    fn absolute_list_path_ignores_repo_root() {
        let config = UpdateConfig::new()
            .with_repo_root("/srv/list")
            .with_list_path("/tmp/instances.yml");
        assert_eq!(config.resolved_list_path(), PathBuf::from("/tmp/instances.yml"));
    }

    #[test]
    fn from_file_keeps_defaults_for_missing_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("searx-instances.toml");
        std::fs::write(&path, "editor = \"nano\"\nissues_repository = \"me/fork\"\n").unwrap();

        let config = UpdateConfig::from_file(&path).unwrap();
        assert_eq!(config.editor.as_deref(), Some("nano"));
        assert_eq!(config.issues_repository, "me/fork");
        assert_eq!(config.issues_api_base, DEFAULT_ISSUES_API_BASE);
    }

    #[test]
    fn from_file_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "editor = [").unwrap();

        assert!(matches!(
            UpdateConfig::from_file(&path),
            Err(UpdateError::Config { .. })
        ));
    }
}
