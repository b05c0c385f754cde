use crate::category::Category;
use chrono::{DateTime, Local};
use std::fmt;

/// Timestamp layout used in the run log.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Bytes freed by one cleaning pass, per category.
///
/// The total is computed on construction, so it always equals the sum of
/// the per-category fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanReport {
    timestamp: DateTime<Local>,
    total: u64,
    thumbnails: u64,
    download_temps: u64,
    data_caches: u64,
    media_caches: u64,
    app_cache: u64,
}

impl CleanReport {
    pub fn new(
        timestamp: DateTime<Local>,
        freed: impl IntoIterator<Item = (Category, u64)>,
    ) -> Self {
        let mut report = Self {
            timestamp,
            total: 0,
            thumbnails: 0,
            download_temps: 0,
            data_caches: 0,
            media_caches: 0,
            app_cache: 0,
        };
        for (category, bytes) in freed {
            *report.slot(category) += bytes;
        }
        report.total = Category::ALL.iter().map(|c| report.freed(*c)).sum();
        report
    }

    fn slot(&mut self, category: Category) -> &mut u64 {
        match category {
            Category::Thumbnails => &mut self.thumbnails,
            Category::DownloadTemps => &mut self.download_temps,
            Category::AppDataCaches => &mut self.data_caches,
            Category::AppMediaCaches => &mut self.media_caches,
            Category::OwnCache => &mut self.app_cache,
        }
    }

    pub fn freed(&self, category: Category) -> u64 {
        match category {
            Category::Thumbnails => self.thumbnails,
            Category::DownloadTemps => self.download_temps,
            Category::AppDataCaches => self.data_caches,
            Category::AppMediaCaches => self.media_caches,
            Category::OwnCache => self.app_cache,
        }
    }

    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn thumbnails(&self) -> u64 {
        self.thumbnails
    }

    pub fn download_temps(&self) -> u64 {
        self.download_temps
    }

    pub fn data_caches(&self) -> u64 {
        self.data_caches
    }

    pub fn media_caches(&self) -> u64 {
        self.media_caches
    }

    pub fn app_cache(&self) -> u64 {
        self.app_cache
    }

    /// One line of the run log:
    /// `timestamp,total,thumbnails,downloadTemps,dataCaches,mediaCaches,appCache`.
    pub fn to_record(&self) -> String {
        format!(
            "{},{},{},{},{},{},{}",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.total,
            self.thumbnails,
            self.download_temps,
            self.data_caches,
            self.media_caches,
            self.app_cache
        )
    }
}

impl fmt::Display for CleanReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Run at {}", self.timestamp.format(TIMESTAMP_FORMAT))?;
        for category in Category::ALL {
            writeln!(f, "  {:<22}{}", category.label(), human_size(self.freed(category)))?;
        }
        write!(f, "  {:<22}{}", "Total", human_size(self.total))
    }
}

/// Binary-prefixed size with one decimal: `512 B`, `1.5 KB`, `3.0 GB`.
pub fn human_size(bytes: u64) -> String {
    const PREFIXES: [char; 6] = ['K', 'M', 'G', 'T', 'P', 'E'];

    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let exponent = (63 - bytes.leading_zeros()) / 10;
    let scaled = bytes as f64 / (1u64 << (exponent * 10)) as f64;
    format!("{:.1} {}B", scaled, PREFIXES[exponent as usize - 1])
}
