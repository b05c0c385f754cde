//! Storage backends the tree walker can run on.
//!
//! `direct` works on plain filesystem paths. `scoped` works on a granted
//! document tree where every entry is addressed by a document id resolved
//! through the grant. Both expose the same [`DirectoryHandle`] capability.

pub mod direct;
pub mod scoped;

pub use direct::FsEntry;
pub use scoped::{Document, DocumentProvider};

use crate::error::Result;
use crate::matcher;

/// One entry of a directory tree, as seen through some storage backend.
///
/// Metadata (`is_directory`, `length`) is captured when the entry is listed,
/// so it stays readable after `delete` has removed the entry.
pub trait DirectoryHandle: Sized {
    /// Children of this entry, sorted by name.
    fn list_children(&self) -> Result<Vec<Self>>;

    fn is_directory(&self) -> bool;

    fn name(&self) -> &str;

    fn extension(&self) -> &str {
        matcher::extension_of(self.name())
    }

    /// Size in bytes. Zero for directories.
    fn length(&self) -> u64;

    /// Remove this entry. Directories must already be empty.
    fn delete(&self) -> Result<()>;

    /// Human-readable location for logs.
    fn describe(&self) -> String;
}
