//! reclaim-rs - junk reclamation engine
//!
//! This library sweeps well-known storage locations (thumbnail caches,
//! download leftovers, per-app caches, its own cache) and reports how many
//! bytes each category freed.

pub mod access;
pub mod backend;
pub mod category;
pub mod config;
pub mod engine;
pub mod error;
pub mod history;
pub mod matcher;
pub mod report;
pub mod walker;

pub use access::{AccessGrants, AccessState, RestrictedTree};
pub use backend::{DirectoryHandle, Document, DocumentProvider, FsEntry};
pub use category::{Category, CleaningConfiguration};
pub use config::{RunInterval, Settings};
pub use engine::{ReclamationEngine, StorageLayout, TargetLocation, TargetRoot};
pub use error::{CleanError, Result};
pub use history::RunLog;
pub use matcher::JunkRule;
pub use report::{human_size, CleanReport};
pub use walker::{TreeWalker, WalkMode, WalkOutcome};
