//! List file storage
//!
//! [`ListFile`] binds the codec to one file on disk. The path is always
//! passed in explicitly.

use crate::codec;
use crate::error::{ModelError, ModelResult};
use crate::list::InstanceList;
use std::fs;
use std::path::{Path, PathBuf};

/// Default location of the list, relative to the repository root
pub const DEFAULT_LIST_PATH: &str = "searxinstances/instances.yml";

/// The persisted instance list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListFile {
    path: PathBuf,
}

impl ListFile {
    /// Bind to a file path
    #[inline]
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// File path
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw file content
    ///
    /// # Errors
    /// [`ModelError::Io`] if the file cannot be read.
    pub fn read_text(&self) -> ModelResult<String> {
        fs::read_to_string(&self.path).map_err(|e| ModelError::io_error(&self.path, e))
    }

    /// Load and validate the list
    ///
    /// # Errors
    /// IO errors and every decode error of [`codec::decode`].
    pub fn load(&self) -> ModelResult<InstanceList> {
        let text = self.read_text()?;
        let list = codec::decode(&text)?;
        tracing::debug!(path = %self.path.display(), instances = list.len(), "list loaded");
        Ok(list)
    }

    /// Encode and write the list, replacing the file
    ///
    /// # Errors
    /// [`ModelError::Serialize`] or [`ModelError::Io`].
    pub fn save(&self, list: &InstanceList) -> ModelResult<()> {
        let text = codec::encode(list)?;
        fs::write(&self.path, text).map_err(|e| ModelError::io_error(&self.path, e))?;
        tracing::debug!(path = %self.path.display(), instances = list.len(), "list saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::Instance;

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let file = ListFile::new(dir.path().join("instances.yml"));

        let mut list = InstanceList::new();
        list.insert("https://searx.me", Instance::new().with_safe(true))
            .unwrap();
        file.save(&list).unwrap();

        assert_eq!(file.load().unwrap(), list);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = ListFile::new(dir.path().join("missing.yml"));
        assert!(matches!(file.load(), Err(ModelError::Io { .. })));
    }
}
