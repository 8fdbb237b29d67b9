use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::StoreError;
use crate::models::{SignupRecord, StoredSignup, SHEET_COLUMNS};

/// How many trailing rows a digest covers by default.
pub const DEFAULT_RECENT_LIMIT: usize = 5;

/// The signup sheet: one CSV file, one header row, one row per signup,
/// created on the first successful append. The process is assumed to be the
/// sole writer of the file.
#[derive(Debug, Clone)]
pub struct SignupStore {
    path: PathBuf,
}

impl SignupStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one record, creating the sheet with its header row if absent.
    pub fn append(&self, record: &SignupRecord) -> Result<(), StoreError> {
        let new_sheet = !self.path.exists();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        if new_sheet {
            writer.write_record(SHEET_COLUMNS)?;
        }
        writer.serialize(record)?;
        writer.flush()?;
        Ok(())
    }

    /// Trailing `limit` rows of the sheet. A missing or unreadable sheet
    /// reads as empty; the caller never sees the failure.
    pub fn read_recent(&self, limit: usize) -> Vec<StoredSignup> {
        match self.try_read_recent(limit) {
            Ok(rows) => rows,
            Err(err) => {
                debug!(error = %err, sheet = %self.path.display(), "could not read signup sheet");
                Vec::new()
            }
        }
    }

    fn try_read_recent(&self, limit: usize) -> Result<Vec<StoredSignup>, StoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::Reader::from_path(&self.path)?;
        let mut rows = Vec::new();
        for row in reader.deserialize::<StoredSignup>() {
            rows.push(row?);
        }

        let skip = rows.len().saturating_sub(limit);
        Ok(rows.split_off(skip))
    }
}
