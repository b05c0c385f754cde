//! Name-based junk predicates.
//!
//! Everything here is pure: a rule looks at an entry's name (and the
//! extension derived from it) and answers yes or no. No filesystem access.

/// Token sets describing what counts as junk at one location.
///
/// All tokens are stored lowercase; candidates are lowercased before the
/// comparison so matching is case-insensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JunkRule {
    pub dir_names: &'static [&'static str],
    pub extensions: &'static [&'static str],
    pub name_tokens: &'static [&'static str],
}

const APP_CACHE_DIRS: &[&str] = &[
    "cache",
    "caches",
    ".cache",
    ".caches",
    "tmp",
    "temp",
    ".tmp",
    ".temp",
    "okhttp",
    "glide",
    "glide_cache",
    "coil",
    "coil_cache",
    "image_cache",
    "video_cache",
    "mediacache",
    "exoplayer",
    "exoplayer-cache",
    "thumb",
    "thumbs",
    "thumbnails",
    ".thumbnails",
    "logs",
    "log",
    "crash",
    "reports",
    "bugreports",
    "httpcache",
    "webview",
    "webview_cache",
    "volley",
    "picasso",
    "mediastore",
];

const APP_CACHE_EXTENSIONS: &[&str] = &[
    "tmp",
    "log",
    "cache",
    "bak",
    "old",
    "part",
    "partial",
    "crdownload",
    "download",
    "journal",
];

const APP_CACHE_NAME_TOKENS: &[&str] =
    &["cache", "tmp", "temp", "log", "journal", ".tmp", ".log"];

impl JunkRule {
    /// No tokens at all. Purge walks never consult their rule.
    pub const EMPTY: JunkRule = JunkRule {
        dir_names: &[],
        extensions: &[],
        name_tokens: &[],
    };

    /// Leftovers of interrupted or finished downloads.
    pub const DOWNLOAD_TEMPS: JunkRule = JunkRule {
        dir_names: &[],
        extensions: &["tmp", "log", "cache"],
        name_tokens: &[],
    };

    /// Caches that applications leave under their private data trees.
    pub const APP_DATA: JunkRule = JunkRule {
        dir_names: APP_CACHE_DIRS,
        extensions: APP_CACHE_EXTENSIONS,
        name_tokens: APP_CACHE_NAME_TOKENS,
    };

    /// Scratch directories under the shared per-app media trees.
    pub const APP_MEDIA: JunkRule = JunkRule {
        dir_names: &["cache", "temp", "tmp"],
        extensions: &[],
        name_tokens: &[],
    };

    pub fn matches_dir_name(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.dir_names.contains(&name.as_str())
    }

    /// `ext` is the part after the last dot, as returned by [`extension_of`].
    pub fn matches_extension(&self, ext: &str) -> bool {
        let ext = ext.to_lowercase();
        self.extensions.contains(&ext.as_str())
    }

    pub fn matches_substring(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.name_tokens.iter().any(|token| name.contains(token))
    }
}

/// Substring after the last `.`, or an empty string when there is none.
///
/// A leading dot alone (`.nomedia`) yields `nomedia`, matching how the
/// platform file APIs report extensions.
pub fn extension_of(name: &str) -> &str {
    name.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("")
}
