use crate::access::{AccessState, RestrictedTree};
use crate::backend::scoped::PRIMARY_VOLUME;
use crate::backend::{Document, DocumentProvider, FsEntry};
use crate::category::{Category, CleaningConfiguration};
use crate::error::{CleanError, Result};
use crate::matcher::JunkRule;
use crate::report::CleanReport;
use crate::walker::{TreeWalker, WalkMode, WalkOutcome};
use chrono::Local;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Where a target lives and how it may be reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetRoot {
    /// Always reached through the direct backend.
    Open(PathBuf),
    /// Reached directly with full access, otherwise through a tree grant.
    Restricted { path: PathBuf, tree: RestrictedTree },
}

/// One root to sweep and the policy that applies there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetLocation {
    pub category: Category,
    pub root: TargetRoot,
    pub rule: JunkRule,
    pub mode: WalkMode,
}

/// Well-known locations on the device.
#[derive(Debug, Clone)]
pub struct StorageLayout {
    /// Root of shared storage (`DCIM`, `Download`, `Android`, ...).
    pub storage_root: PathBuf,
    /// This application's own cache directory.
    pub own_cache: PathBuf,
}

impl StorageLayout {
    pub fn new(storage_root: impl Into<PathBuf>, own_cache: impl Into<PathBuf>) -> Self {
        Self {
            storage_root: storage_root.into(),
            own_cache: own_cache.into(),
        }
    }

    /// Targets for one category. Thumbnails have two roots, the rest one.
    pub fn targets(&self, category: Category) -> Vec<TargetLocation> {
        let root = &self.storage_root;
        let target = |root, rule, mode| TargetLocation {
            category,
            root,
            rule,
            mode,
        };

        match category {
            Category::Thumbnails => ["DCIM/.thumbnails", "Pictures/.thumbnails"]
                .into_iter()
                .map(|dir| {
                    target(
                        TargetRoot::Open(root.join(dir)),
                        JunkRule::EMPTY,
                        WalkMode::PURGE,
                    )
                })
                .collect(),
            Category::DownloadTemps => vec![target(
                TargetRoot::Open(root.join("Download")),
                JunkRule::DOWNLOAD_TEMPS,
                WalkMode::EXTENSIONS,
            )],
            Category::AppDataCaches => vec![target(
                TargetRoot::Restricted {
                    path: root.join("Android/data"),
                    tree: RestrictedTree::AppData,
                },
                JunkRule::APP_DATA,
                WalkMode::FULL.per_app(),
            )],
            Category::AppMediaCaches => vec![target(
                TargetRoot::Restricted {
                    path: root.join("Android/media"),
                    tree: RestrictedTree::AppMedia,
                },
                JunkRule::APP_MEDIA,
                WalkMode::DIR_NAMES,
            )],
            Category::OwnCache => vec![target(
                TargetRoot::Open(self.own_cache.clone()),
                JunkRule::EMPTY,
                WalkMode::PURGE,
            )],
        }
    }
}

/// Runs cleaning passes over a [`StorageLayout`].
#[derive(Debug, Clone)]
pub struct ReclamationEngine {
    layout: StorageLayout,
    documents: DocumentProvider,
}

impl ReclamationEngine {
    /// Tree grants on the primary volume resolve against the layout's
    /// storage root.
    pub fn new(layout: StorageLayout) -> Self {
        let documents =
            DocumentProvider::new().with_volume(PRIMARY_VOLUME, layout.storage_root.clone());
        Self { layout, documents }
    }

    pub fn with_documents(layout: StorageLayout, documents: DocumentProvider) -> Self {
        Self { layout, documents }
    }

    pub fn layout(&self) -> &StorageLayout {
        &self.layout
    }

    /// Run one cleaning pass. Never fails: unreachable targets contribute
    /// zero bytes.
    pub fn run(&self, config: &CleaningConfiguration, access: &AccessState) -> CleanReport {
        self.run_detailed(config, access).0
    }

    /// Like [`run`](Self::run), also returning the merged walk outcome of
    /// every enabled category.
    pub fn run_detailed(
        &self,
        config: &CleaningConfiguration,
        access: &AccessState,
    ) -> (CleanReport, Vec<(Category, WalkOutcome)>) {
        let mut outcomes = Vec::new();
        for category in config.enabled() {
            let mut outcome = WalkOutcome::default();
            for target in self.layout.targets(category) {
                outcome.merge(self.sweep(&target, access));
            }
            info!(
                "{}: freed {} bytes ({} files, {} dirs, {} errors)",
                category,
                outcome.bytes_freed,
                outcome.files_deleted,
                outcome.dirs_deleted,
                outcome.errors.len()
            );
            outcomes.push((category, outcome));
        }

        let freed = outcomes
            .iter()
            .map(|(category, outcome)| (*category, outcome.bytes_freed));
        let report = CleanReport::new(Local::now(), freed);
        (report, outcomes)
    }

    /// Sweep one target with whichever backend access allows.
    pub fn sweep(&self, target: &TargetLocation, access: &AccessState) -> WalkOutcome {
        let walker = TreeWalker::new(&target.rule, target.mode);
        match &target.root {
            TargetRoot::Open(path) => match FsEntry::open_dir(path) {
                Ok(root) => walker.walk(&root),
                Err(e) => {
                    debug!("Nothing to sweep: {}", e);
                    WalkOutcome::default()
                }
            },
            TargetRoot::Restricted { path, tree } => {
                if access.full_access {
                    match FsEntry::open_dir(path) {
                        Ok(root) => return walker.walk(&root),
                        Err(e) => debug!("Direct access unavailable, trying tree grant: {}", e),
                    }
                }
                self.sweep_tree(&walker, path, access.tree(*tree))
            }
        }
    }

    fn sweep_tree(
        &self,
        walker: &TreeWalker<'_>,
        path: &Path,
        handle: Option<&str>,
    ) -> WalkOutcome {
        let Some(handle) = handle else {
            info!("Skipping {}: no access", path.display());
            return WalkOutcome::default();
        };
        match self.open_grant(handle, path) {
            Ok(root) => walker.walk(&root),
            Err(e) => {
                warn!("Skipping {}: {}", path.display(), e);
                WalkOutcome::default()
            }
        }
    }

    /// Open a tree grant standing in for the restricted root at `path`.
    /// The granted tree must be that root or lie inside it.
    fn open_grant(&self, handle: &str, path: &Path) -> Result<Document> {
        let expected = self.document_id_of(path).ok_or_else(|| {
            CleanError::invalid_handle(handle, "restricted root is outside shared storage")
        })?;
        let root = self.documents.open_tree(handle)?;
        if !root.is_within(&expected) {
            return Err(CleanError::invalid_handle(
                handle,
                format!("grant {} is not inside {}", root.document_id(), expected),
            ));
        }
        Ok(root)
    }

    /// Document id of a path under the storage root, on the primary volume.
    fn document_id_of(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.layout.storage_root).ok()?;
        let segments: Vec<_> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect();
        Some(format!("{}:{}", PRIMARY_VOLUME, segments.join("/")))
    }
}
