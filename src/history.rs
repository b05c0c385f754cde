use crate::error::Result;
use crate::report::CleanReport;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Append-only text log with one CSV record per cleaning run.
#[derive(Debug, Clone)]
pub struct RunLog {
    path: PathBuf,
}

impl RunLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, report: &CleanReport) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        writeln!(file, "{}", report.to_record())?;
        debug!("Appended run record to {}", self.path.display());
        Ok(())
    }

    /// Every recorded line, oldest first. A missing log reads as empty.
    pub fn read_all(&self) -> Result<Vec<String>> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(content.lines().map(str::to_string).collect()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }
}
