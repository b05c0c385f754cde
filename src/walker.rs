use crate::backend::DirectoryHandle;
use crate::matcher::JunkRule;
use tracing::{debug, warn};

/// Which criteria of a [`JunkRule`] a walk applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkMode {
    /// Delete everything below the root, ignoring the rule.
    pub purge: bool,
    pub dir_names: bool,
    pub extensions: bool,
    pub substrings: bool,
    /// Children of the root are per-app containers: always descended into,
    /// never matched themselves.
    pub app_containers: bool,
}

impl WalkMode {
    pub const PURGE: WalkMode = WalkMode {
        purge: true,
        dir_names: false,
        extensions: false,
        substrings: false,
        app_containers: false,
    };

    pub const EXTENSIONS: WalkMode = WalkMode {
        purge: false,
        dir_names: false,
        extensions: true,
        substrings: false,
        app_containers: false,
    };

    pub const DIR_NAMES: WalkMode = WalkMode {
        purge: false,
        dir_names: true,
        extensions: false,
        substrings: false,
        app_containers: false,
    };

    pub const FULL: WalkMode = WalkMode {
        purge: false,
        dir_names: true,
        extensions: true,
        substrings: true,
        app_containers: false,
    };

    pub const fn per_app(self) -> WalkMode {
        WalkMode {
            app_containers: true,
            ..self
        }
    }
}

/// Result of one walk
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkOutcome {
    pub files_deleted: u64,
    pub dirs_deleted: u64,
    pub bytes_freed: u64,
    pub errors: Vec<String>,
}

impl WalkOutcome {
    pub fn is_empty(&self) -> bool {
        self.files_deleted == 0 && self.dirs_deleted == 0
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn merge(&mut self, other: WalkOutcome) {
        self.files_deleted += other.files_deleted;
        self.dirs_deleted += other.dirs_deleted;
        self.bytes_freed += other.bytes_freed;
        self.errors.extend(other.errors);
    }

    pub fn display_status(&self) -> String {
        let mut status = vec![
            format!("Files deleted: {}", self.files_deleted),
            format!("Directories deleted: {}", self.dirs_deleted),
            format!("Space freed: {}", crate::report::human_size(self.bytes_freed)),
        ];

        if self.has_errors() {
            status.push(format!("Errors encountered: {}", self.errors.len()));
        }

        status.join("\n")
    }
}

/// Depth-first junk sweep over any [`DirectoryHandle`] backend.
///
/// Errors never escape a walk: an entry that cannot be listed or deleted
/// contributes nothing and is recorded in [`WalkOutcome::errors`].
#[derive(Debug, Clone, Copy)]
pub struct TreeWalker<'r> {
    rule: &'r JunkRule,
    mode: WalkMode,
}

impl<'r> TreeWalker<'r> {
    pub fn new(rule: &'r JunkRule, mode: WalkMode) -> Self {
        Self { rule, mode }
    }

    /// Sweep below `root`. The root itself is never deleted.
    pub fn walk<H: DirectoryHandle>(&self, root: &H) -> WalkOutcome {
        let mut outcome = WalkOutcome::default();
        self.visit(root, 0, &mut outcome);
        outcome
    }

    fn visit<H: DirectoryHandle>(&self, dir: &H, depth: usize, outcome: &mut WalkOutcome) {
        let Some(children) = list(dir, outcome) else {
            return;
        };

        let shielded = self.mode.app_containers && depth == 0;
        for child in children {
            if child.is_directory() {
                if !shielded && self.condemns_dir(&child) {
                    purge(&child, outcome);
                } else {
                    self.visit(&child, depth + 1, outcome);
                }
            } else if !shielded && self.condemns_file(&child) {
                remove(&child, outcome);
            }
        }
    }

    fn condemns_dir<H: DirectoryHandle>(&self, dir: &H) -> bool {
        self.mode.purge || (self.mode.dir_names && self.rule.matches_dir_name(dir.name()))
    }

    fn condemns_file<H: DirectoryHandle>(&self, file: &H) -> bool {
        self.mode.purge
            || (self.mode.extensions && self.rule.matches_extension(file.extension()))
            || (self.mode.substrings && self.rule.matches_substring(file.name()))
    }
}

/// Delete a condemned directory wholesale: contents first, then the shell.
fn purge<H: DirectoryHandle>(dir: &H, outcome: &mut WalkOutcome) {
    let Some(children) = list(dir, outcome) else {
        return;
    };

    for child in children {
        if child.is_directory() {
            purge(&child, outcome);
        } else {
            remove(&child, outcome);
        }
    }
    remove(dir, outcome);
}

fn list<H: DirectoryHandle>(dir: &H, outcome: &mut WalkOutcome) -> Option<Vec<H>> {
    match dir.list_children() {
        Ok(children) => Some(children),
        Err(e) => {
            debug!("Skipping subtree: {}", e);
            outcome.errors.push(e.to_string());
            None
        }
    }
}

fn remove<H: DirectoryHandle>(entry: &H, outcome: &mut WalkOutcome) {
    // length was captured at listing time, before this delete
    let size = entry.length();
    match entry.delete() {
        Ok(()) => {
            debug!("Deleted {} ({} bytes)", entry.describe(), size);
            if entry.is_directory() {
                outcome.dirs_deleted += 1;
            } else {
                outcome.files_deleted += 1;
            }
            outcome.bytes_freed += size;
        }
        Err(e) => {
            warn!("{}", e);
            outcome.errors.push(e.to_string());
        }
    }
}
