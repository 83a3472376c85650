//! Traits for the external persistence collaborators, plus local JSON
//! implementations used in production-like setups and tests.

pub mod json_backend;

use crate::config::ConfigDocument;
use crate::errors::Result;
use crate::ledger::{LedgerRow, Partition};

/// Whole-document persistence for the configuration.
pub trait ConfigBackend: Send + Sync {
    /// Loads the document; `Ok(None)` means it does not exist yet and
    /// the caller substitutes defaults.
    fn load(&self) -> Result<Option<ConfigDocument>>;

    fn save(&self, document: &ConfigDocument) -> Result<()>;
}

/// Tabular record storage addressed by partition. There is no partial
/// append primitive; writes replace the full addressed set.
pub trait LedgerStore: Send + Sync {
    /// Reads the partition's rows; `Ok(None)` means the partition has
    /// not been created yet.
    fn read(&self, partition: &Partition) -> Result<Option<Vec<LedgerRow>>>;

    fn write(&self, partition: &Partition, rows: &[LedgerRow]) -> Result<()>;
}

pub use json_backend::{default_base_dir, JsonConfigBackend, JsonLedgerStore};
