use super::DirectoryHandle;
use crate::error::{CleanError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A filesystem entry reached by path. Symlinks are never followed.
#[derive(Debug, Clone)]
pub struct FsEntry {
    path: PathBuf,
    name: String,
    is_dir: bool,
    len: u64,
}

impl FsEntry {
    /// Open `path` as a traversal root. Fails unless it is a listable directory.
    pub fn open_dir(path: &Path) -> Result<Self> {
        fs::read_dir(path).map_err(|source| CleanError::ListFailed {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            is_dir: true,
            len: 0,
        })
    }
}

impl DirectoryHandle for FsEntry {
    fn list_children(&self) -> Result<Vec<Self>> {
        let list_err = |source| CleanError::ListFailed {
            path: self.path.display().to_string(),
            source,
        };

        let mut children = Vec::new();
        for entry in fs::read_dir(&self.path).map_err(list_err)? {
            let entry = entry.map_err(list_err)?;
            let path = entry.path();
            // symlink_metadata: a link is deleted as itself, never traversed
            let metadata = match fs::symlink_metadata(&path) {
                Ok(metadata) => metadata,
                Err(e) => {
                    debug!("Skipping {}: {}", path.display(), e);
                    continue;
                }
            };
            let is_dir = metadata.is_dir();
            children.push(FsEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                len: if metadata.is_file() { metadata.len() } else { 0 },
                is_dir,
                path,
            });
        }

        children.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(children)
    }

    fn is_directory(&self) -> bool {
        self.is_dir
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn length(&self) -> u64 {
        self.len
    }

    fn delete(&self) -> Result<()> {
        let removed = if self.is_dir {
            fs::remove_dir(&self.path)
        } else {
            fs::remove_file(&self.path)
        };
        removed.map_err(|source| CleanError::DeleteFailed {
            path: self.path.display().to_string(),
            source,
        })
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
