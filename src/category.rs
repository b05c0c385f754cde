use serde::{Deserialize, Serialize};
use std::fmt;

/// The kinds of junk a cleaning pass knows how to reclaim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, clap::ValueEnum)]
pub enum Category {
    Thumbnails,
    DownloadTemps,
    AppDataCaches,
    AppMediaCaches,
    OwnCache,
}

impl Category {
    /// Every category, in the order a pass visits them.
    pub const ALL: [Category; 5] = [
        Category::Thumbnails,
        Category::DownloadTemps,
        Category::AppDataCaches,
        Category::AppMediaCaches,
        Category::OwnCache,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Thumbnails => "Thumbnail caches",
            Category::DownloadTemps => "Download temp files",
            Category::AppDataCaches => "App data caches",
            Category::AppMediaCaches => "App media caches",
            Category::OwnCache => "Own cache",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which categories a run should clean. Each flag is independent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningConfiguration {
    pub thumbnails: bool,
    pub download_temps: bool,
    pub app_data_caches: bool,
    pub app_media_caches: bool,
    pub own_cache: bool,
}

impl CleaningConfiguration {
    pub fn all() -> Self {
        Self {
            thumbnails: true,
            download_temps: true,
            app_data_caches: true,
            app_media_caches: true,
            own_cache: true,
        }
    }

    pub fn none() -> Self {
        Self {
            thumbnails: false,
            download_temps: false,
            app_data_caches: false,
            app_media_caches: false,
            own_cache: false,
        }
    }

    /// Only the given categories enabled.
    pub fn only(categories: &[Category]) -> Self {
        let mut config = Self::none();
        for category in categories {
            config.set(*category, true);
        }
        config
    }

    pub fn is_enabled(&self, category: Category) -> bool {
        match category {
            Category::Thumbnails => self.thumbnails,
            Category::DownloadTemps => self.download_temps,
            Category::AppDataCaches => self.app_data_caches,
            Category::AppMediaCaches => self.app_media_caches,
            Category::OwnCache => self.own_cache,
        }
    }

    pub fn set(&mut self, category: Category, enabled: bool) {
        let flag = match category {
            Category::Thumbnails => &mut self.thumbnails,
            Category::DownloadTemps => &mut self.download_temps,
            Category::AppDataCaches => &mut self.app_data_caches,
            Category::AppMediaCaches => &mut self.app_media_caches,
            Category::OwnCache => &mut self.own_cache,
        };
        *flag = enabled;
    }

    pub fn enabled(&self) -> impl Iterator<Item = Category> + '_ {
        Category::ALL
            .into_iter()
            .filter(move |category| self.is_enabled(*category))
    }
}

impl Default for CleaningConfiguration {
    fn default() -> Self {
        Self::all()
    }
}
