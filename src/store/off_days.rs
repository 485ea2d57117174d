//! YAML store of manually declared off-days
//!
//! Keeps a human-editable `manual_off_days.yaml`:
//!
//! ```yaml
//! extra_no_school:
//! - 2025-10-13
//! - 2025-11-26
//! ```

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// On-disk shape of the off-day file
#[derive(Debug, Default, Serialize, Deserialize)]
struct OffDayFile {
    #[serde(default)]
    extra_no_school: BTreeSet<NaiveDate>,
}

/// File-backed set of manual off-days
pub struct OffDayStore {
    path: PathBuf,
}

impl OffDayStore {
    /// Create a store backed by `path`. The file is created on first add.
    #[must_use]
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Read every recorded off-day. A missing or empty file means none.
    pub fn load(&self) -> Result<BTreeSet<NaiveDate>> {
        if !self.path.exists() {
            return Ok(BTreeSet::new());
        }

        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read off-day file: {}", self.path.display()))?;
        if content.trim().is_empty() {
            return Ok(BTreeSet::new());
        }

        let file: OffDayFile = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse off-day file: {}", self.path.display()))?;
        debug!(count = file.extra_no_school.len(), "loaded manual off-days");
        Ok(file.extra_no_school)
    }

    /// Record an off-day.
    ///
    /// Returns `false` without touching the file if the date is already present.
    pub fn add(&self, date: NaiveDate) -> Result<bool> {
        let mut days = self.load()?;
        if !days.insert(date) {
            debug!(%date, "off-day already recorded");
            return Ok(false);
        }
        self.save(days)?;
        info!(%date, "recorded manual off-day");
        Ok(true)
    }

    /// Whether `date` is recorded
    pub fn contains(&self, date: NaiveDate) -> Result<bool> {
        Ok(self.load()?.contains(&date))
    }

    /// Recorded off-days in date order
    pub fn list(&self) -> Result<Vec<NaiveDate>> {
        Ok(self.load()?.into_iter().collect())
    }

    /// Path of the backing file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self, extra_no_school: BTreeSet<NaiveDate>) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        }
        let yaml = serde_yaml::to_string(&OffDayFile { extra_no_school })
            .context("Failed to serialize off-days")?;
        fs::write(&self.path, yaml)
            .with_context(|| format!("Failed to write off-day file: {}", self.path.display()))
    }
}
