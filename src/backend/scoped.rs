//! Document-tree backend.
//!
//! A tree grant is identified by an opaque string: either a bare document id
//! such as `primary:Android/data`, or the same id wrapped in a tree URI,
//! `content://<authority>/tree/primary%3AAndroid%2Fdata`. The volume part
//! (`primary`) is mapped to a storage root by the [`DocumentProvider`].
//! Every entry below the grant is addressed by its document id; ids that
//! fall outside the granted tree are refused.

use super::DirectoryHandle;
use crate::error::{CleanError, Result};
use percent_encoding::percent_decode_str;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Volume name used for the primary shared storage.
pub const PRIMARY_VOLUME: &str = "primary";

/// Maps storage volumes to local roots and opens tree grants on them.
#[derive(Debug, Clone, Default)]
pub struct DocumentProvider {
    volumes: BTreeMap<String, PathBuf>,
}

#[derive(Debug)]
struct TreeGrant {
    volume: String,
    volume_root: PathBuf,
    /// Path of the granted tree relative to the volume root, `/`-separated.
    tree_path: String,
}

/// An entry inside a granted tree.
#[derive(Debug, Clone)]
pub struct Document {
    grant: Arc<TreeGrant>,
    document_id: String,
    name: String,
    is_dir: bool,
    len: u64,
}

impl DocumentProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_volume(mut self, name: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        self.volumes.insert(name.into(), root.into());
        self
    }

    /// Open the tree a handle grants access to.
    ///
    /// Fails when the handle is malformed, names an unknown volume, or the
    /// tree no longer exists (a revoked or stale grant).
    pub fn open_tree(&self, handle: &str) -> Result<Document> {
        let document_id = parse_handle(handle)?;
        let (volume, tree_path) = document_id
            .split_once(':')
            .ok_or_else(|| CleanError::invalid_handle(handle, "missing volume prefix"))?;
        let volume_root = self.volumes.get(volume).ok_or_else(|| {
            CleanError::invalid_handle(handle, format!("unknown volume '{volume}'"))
        })?;

        let tree_path = tree_path.trim_matches('/');
        if !is_plain_relative(tree_path) {
            return Err(CleanError::invalid_handle(
                handle,
                "tree path is not a plain relative path",
            ));
        }

        let grant = Arc::new(TreeGrant {
            volume: volume.to_string(),
            volume_root: volume_root.clone(),
            tree_path: tree_path.to_string(),
        });
        let root_id = grant.document_id(tree_path);
        let root_path = grant.resolve(&root_id)?;
        if !root_path.is_dir() {
            return Err(CleanError::invalid_handle(handle, "granted tree no longer exists"));
        }

        debug!("Opened tree {} at {}", root_id, root_path.display());
        Ok(Document {
            name: tree_path.rsplit('/').next().unwrap_or_default().to_string(),
            document_id: root_id,
            is_dir: true,
            len: 0,
            grant,
        })
    }
}

impl TreeGrant {
    fn document_id(&self, relative: &str) -> String {
        format!("{}:{}", self.volume, relative)
    }

    /// Local path of a document, refusing anything outside the granted tree.
    fn resolve(&self, document_id: &str) -> Result<PathBuf> {
        let outside =
            || CleanError::invalid_handle(document_id, "document is outside the granted tree");

        let relative = document_id
            .strip_prefix(self.volume.as_str())
            .and_then(|rest| rest.strip_prefix(':'))
            .ok_or_else(outside)?;
        if !is_plain_relative(relative) {
            return Err(outside());
        }
        let inside = self.tree_path.is_empty()
            || relative == self.tree_path
            || relative
                .strip_prefix(self.tree_path.as_str())
                .is_some_and(|rest| rest.starts_with('/'));
        if !inside {
            return Err(outside());
        }

        Ok(relative
            .split('/')
            .filter(|segment| !segment.is_empty())
            .fold(self.volume_root.clone(), |path, segment| path.join(segment)))
    }
}

impl Document {
    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    /// Whether this document is `ancestor_id` or lies below it.
    pub fn is_within(&self, ancestor_id: &str) -> bool {
        match self.document_id.strip_prefix(ancestor_id) {
            Some("") => true,
            Some(rest) => ancestor_id.ends_with(':') || rest.starts_with('/'),
            None => false,
        }
    }

    fn child_id(&self, name: &str) -> String {
        if self.document_id.ends_with(':') {
            format!("{}{}", self.document_id, name)
        } else {
            format!("{}/{}", self.document_id, name)
        }
    }

    fn local_path(&self) -> Result<PathBuf> {
        self.grant.resolve(&self.document_id)
    }
}

impl DirectoryHandle for Document {
    fn list_children(&self) -> Result<Vec<Self>> {
        let path = self.local_path()?;
        let list_err = |source| CleanError::ListFailed {
            path: self.document_id.clone(),
            source,
        };

        let mut children = Vec::new();
        for entry in fs::read_dir(&path).map_err(list_err)? {
            let entry = entry.map_err(list_err)?;
            let name = entry.file_name().to_string_lossy().into_owned();
            let metadata = match fs::symlink_metadata(entry.path()) {
                Ok(metadata) => metadata,
                Err(e) => {
                    debug!("Skipping document {}: {}", self.child_id(&name), e);
                    continue;
                }
            };
            children.push(Document {
                grant: Arc::clone(&self.grant),
                document_id: self.child_id(&name),
                is_dir: metadata.is_dir(),
                len: if metadata.is_file() { metadata.len() } else { 0 },
                name,
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
        let path = self.local_path()?;
        let removed = if self.is_dir {
            fs::remove_dir(&path)
        } else {
            fs::remove_file(&path)
        };
        removed.map_err(|source| CleanError::DeleteFailed {
            path: self.document_id.clone(),
            source,
        })
    }

    fn describe(&self) -> String {
        self.document_id.clone()
    }
}

/// Extract the tree document id from a handle string.
fn parse_handle(handle: &str) -> Result<String> {
    let handle = handle.trim();
    let Some(rest) = handle.strip_prefix("content://") else {
        return Ok(handle.to_string());
    };

    let encoded = rest
        .split_once("/tree/")
        .map(|(_, tree)| tree.split('/').next().unwrap_or_default())
        .filter(|tree| !tree.is_empty())
        .ok_or_else(|| CleanError::invalid_handle(handle, "not a tree URI"))?;
    percent_decode_str(encoded)
        .decode_utf8()
        .map(|id| id.into_owned())
        .map_err(|_| CleanError::invalid_handle(handle, "tree id is not valid UTF-8"))
}

/// No absolute paths, no `.`/`..` segments, no backslashes.
fn is_plain_relative(path: &str) -> bool {
    !path.starts_with('/')
        && !path.contains('\\')
        && !Path::new(path).is_absolute()
        && path.split('/').all(|segment| segment != "." && segment != "..")
}
