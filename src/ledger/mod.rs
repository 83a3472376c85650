//! Ledger domain records, identity partitioning, and the multi-identity
//! merge.

pub mod aggregator;
pub mod identity;
pub mod transaction;

pub use aggregator::LedgerAggregator;
pub use identity::{DataType, Identity, Partition, WorksheetNames};
pub use transaction::{
    Frequency, LedgerRow, OriginTag, RecurringItem, RecurringStatus, Transaction,
};
