//! JSON file implementations of the storage traits.
//!
//! Documents are staged to a temporary file and renamed into place so a
//! failed write never leaves a partially-written document visible.

use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::config::ConfigDocument;
use crate::errors::{ExpenseError, Result};
use crate::ledger::{LedgerRow, Partition, WorksheetNames};
use crate::storage::{ConfigBackend, LedgerStore};

const TMP_SUFFIX: &str = "tmp";

/// Default application data directory for local setups.
pub fn default_base_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("expense_core")
}

/// Stores the configuration document as a single JSON file.
pub struct JsonConfigBackend {
    path: PathBuf,
    guard_revision: bool,
}

impl JsonConfigBackend {
    /// Last-writer-wins backend, the behaviorally compatible default.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            guard_revision: false,
        }
    }

    /// Enables optimistic concurrency: a save is refused when the
    /// on-disk revision is not older than the document being written,
    /// i.e. another writer got there first.
    pub fn with_revision_guard(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            guard_revision: true,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_disk_revision(&self) -> Result<Option<u64>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let data = fs::read_to_string(&self.path)?;
        let document: ConfigDocument = serde_json::from_str(&data)
            .map_err(|err| ExpenseError::Config(err.to_string()))?;
        Ok(Some(document.revision))
    }
}

impl ConfigBackend for JsonConfigBackend {
    fn load(&self) -> Result<Option<ConfigDocument>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let data = fs::read_to_string(&self.path)?;
        let document = serde_json::from_str(&data)
            .map_err(|err| ExpenseError::Config(err.to_string()))?;
        Ok(Some(document))
    }

    fn save(&self, document: &ConfigDocument) -> Result<()> {
        if self.guard_revision {
            if let Some(disk_revision) = self.read_disk_revision()? {
                if disk_revision >= document.revision {
                    return Err(ExpenseError::Conflict(format!(
                        "configuration revision {} already on disk, refusing to overwrite \
                         with revision {}",
                        disk_revision, document.revision
                    )));
                }
            }
        }
        let json = serde_json::to_string_pretty(document)?;
        write_atomic(&self.path, &json)
    }
}

/// Keeps each ledger partition in its own JSON file under a base
/// directory, named after the partition's worksheet.
pub struct JsonLedgerStore {
    base: PathBuf,
    names: WorksheetNames,
}

impl JsonLedgerStore {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self {
            base: base.into(),
            names: WorksheetNames::default(),
        }
    }

    pub fn with_names(base: impl Into<PathBuf>, names: WorksheetNames) -> Self {
        Self {
            base: base.into(),
            names,
        }
    }

    pub fn partition_path(&self, partition: &Partition) -> PathBuf {
        self.base
            .join(format!("{}.json", self.names.resolve(partition)))
    }
}

impl LedgerStore for JsonLedgerStore {
    fn read(&self, partition: &Partition) -> Result<Option<Vec<LedgerRow>>> {
        let path = self.partition_path(partition);
        if !path.exists() {
            return Ok(None);
        }
        let data = fs::read_to_string(&path)?;
        let rows = serde_json::from_str(&data)?;
        Ok(Some(rows))
    }

    fn write(&self, partition: &Partition, rows: &[LedgerRow]) -> Result<()> {
        let path = self.partition_path(partition);
        let json = serde_json::to_string_pretty(rows)?;
        write_atomic(&path, &json)
    }
}

fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let tmp = tmp_path(path);
    let mut file = File::create(&tmp)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    fs::rename(&tmp, path)?;
    Ok(())
}
