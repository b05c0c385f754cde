//! Decides which storage backend a run may use for the restricted roots.

use serde::{Deserialize, Serialize};

/// First platform version on which direct access to shared storage needs an
/// explicit elevated grant. Older versions always allow it.
pub const ELEVATED_ACCESS_VERSION: u32 = 30;

/// The two roots that can be reached through a scoped tree grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestrictedTree {
    AppData,
    AppMedia,
}

/// Grants as recorded by whoever handles the permission flow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessGrants {
    pub platform_version: u32,
    pub elevated_access: bool,
    pub data_tree: Option<String>,
    pub media_tree: Option<String>,
}

/// What the current run is allowed to touch. Recomputed for every run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessState {
    pub full_access: bool,
    pub data_tree: Option<String>,
    pub media_tree: Option<String>,
}

impl AccessState {
    pub fn tree(&self, tree: RestrictedTree) -> Option<&str> {
        match tree {
            RestrictedTree::AppData => self.data_tree.as_deref(),
            RestrictedTree::AppMedia => self.media_tree.as_deref(),
        }
    }

    /// True when neither direct nor scoped access is available.
    pub fn is_blind(&self) -> bool {
        !self.full_access && self.data_tree.is_none() && self.media_tree.is_none()
    }
}

pub fn resolve(platform_version: u32, grants: &AccessGrants) -> AccessState {
    let full_access = platform_version < ELEVATED_ACCESS_VERSION || grants.elevated_access;
    AccessState {
        full_access,
        data_tree: present(grants.data_tree.as_deref()),
        media_tree: present(grants.media_tree.as_deref()),
    }
}

impl AccessGrants {
    /// Resolve against the platform version recorded with the grants.
    pub fn resolve(&self) -> AccessState {
        resolve(self.platform_version, self)
    }
}

fn present(handle: Option<&str>) -> Option<String> {
    handle
        .map(str::trim)
        .filter(|handle| !handle.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_platform_always_has_full_access() {
        let state = resolve(29, &AccessGrants::default());
        assert!(state.full_access);
    }

    #[test]
    fn test_modern_platform_needs_elevated_grant() {
        let mut grants = AccessGrants::default();
        assert!(!resolve(ELEVATED_ACCESS_VERSION, &grants).full_access);
        assert!(!resolve(34, &grants).full_access);

        grants.elevated_access = true;
        assert!(resolve(34, &grants).full_access);
    }

    #[test]
    fn test_tree_handles_are_independent() {
        let grants = AccessGrants {
            platform_version: 34,
            elevated_access: false,
            data_tree: Some("primary:Android/data".to_string()),
            media_tree: Some("   ".to_string()),
        };
        let state = grants.resolve();
        assert_eq!(state.tree(RestrictedTree::AppData), Some("primary:Android/data"));
        assert_eq!(state.tree(RestrictedTree::AppMedia), None);
        assert!(!state.is_blind());
    }

    #[test]
    fn test_no_grants_on_modern_platform_is_blind() {
        let state = resolve(33, &AccessGrants::default());
        assert!(state.is_blind());
    }
}
