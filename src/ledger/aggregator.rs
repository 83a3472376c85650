//! Multi-identity merge of ledger partitions.
//!
//! A private identity reads its own partition plus the shared pool; the
//! shared identity reads only the pool. Partition reads are independent:
//! a missing or unreadable partition contributes an empty sequence and a
//! log line, never a merge failure.

use crate::errors::Result;
use crate::ledger::{
    DataType, Identity, LedgerRow, OriginTag, Partition, RecurringItem, Transaction,
};
use crate::storage::LedgerStore;

pub struct LedgerAggregator<'a> {
    store: &'a dyn LedgerStore,
}

impl<'a> LedgerAggregator<'a> {
    pub fn new(store: &'a dyn LedgerStore) -> Self {
        Self { store }
    }

    /// Merged expense rows visible to the identity, private partition
    /// first, each stamped with its origin. Partition-internal order is
    /// preserved; nothing is deduplicated.
    pub fn transactions(&self, identity: Identity, data_type: DataType) -> Vec<Transaction> {
        let mut merged = Vec::new();
        for source in identity.resolve_sources() {
            let partition = Partition::new(source, data_type);
            let origin = origin_for(source);
            for row in self.read_partition(&partition) {
                if let LedgerRow::Transaction(mut txn) = row {
                    txn.origin = origin;
                    merged.push(txn);
                }
            }
        }
        merged
    }

    /// Merged recurring items visible to the identity, stamped and
    /// ordered the same way as [`transactions`](Self::transactions).
    pub fn recurrings(&self, identity: Identity) -> Vec<RecurringItem> {
        let mut merged = Vec::new();
        for source in identity.resolve_sources() {
            let partition = Partition::new(source, DataType::Recurrings);
            let origin = origin_for(source);
            for row in self.read_partition(&partition) {
                if let LedgerRow::Recurring(mut item) = row {
                    item.origin = origin;
                    merged.push(item);
                }
            }
        }
        merged
    }

    /// Appends one row to a single partition. Storage only supports
    /// whole-set writes, so append is read-modify-write; a partition
    /// that does not exist yet is created with the single row.
    pub fn append(&self, partition: Partition, row: LedgerRow) -> Result<()> {
        let mut rows = self.store.read(&partition)?.unwrap_or_default();
        rows.push(row);
        self.store.write(&partition, &rows)
    }

    /// Resolves the target partition for a new record: shared scope (or
    /// the shared identity itself) lands in the pool, otherwise the
    /// identity's own partition.
    pub fn target_partition(
        identity: Identity,
        data_type: DataType,
        scope: OriginTag,
    ) -> Partition {
        let owner = match scope {
            OriginTag::Shared => Identity::Shared,
            OriginTag::Personal => identity,
        };
        Partition::new(owner, data_type)
    }

    fn read_partition(&self, partition: &Partition) -> Vec<LedgerRow> {
        match self.store.read(partition) {
            Ok(Some(rows)) => rows,
            Ok(None) => {
                tracing::debug!(%partition, "partition absent, contributing nothing");
                Vec::new()
            }
            Err(err) => {
                tracing::warn!(%partition, error = %err, "partition unreadable, skipping");
                Vec::new()
            }
        }
    }
}

fn origin_for(source: Identity) -> OriginTag {
    if source.is_private() {
        OriginTag::Personal
    } else {
        OriginTag::Shared
    }
}
