use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Provenance marker stamped onto every record during a ledger merge.
/// Not persisted with the row; the partition a row came from is the
/// source of truth.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OriginTag {
    #[default]
    Personal,
    Shared,
}

/// A single recorded expense or income row. Immutable once recorded by
/// the external store; the core reads and classifies, never mutates in
/// place.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub date: NaiveDate,
    pub amount: f64,
    /// Expense category; income rows carry their source name in
    /// `counterpart` and leave this to the caller's convention.
    pub category: String,
    /// Store name for expenses, source name for income.
    pub counterpart: String,
    pub payment_method: String,
    #[serde(default, skip_serializing)]
    pub origin: OriginTag,
}

/// How often a recurring payment repeats.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum Frequency {
    Daily,
    Weekly,
    #[serde(rename = "Bi-weekly")]
    Biweekly,
    Monthly,
    Quarterly,
    Yearly,
}

impl Frequency {
    pub fn label(&self) -> &'static str {
        match self {
            Frequency::Daily => "Daily",
            Frequency::Weekly => "Weekly",
            Frequency::Biweekly => "Bi-weekly",
            Frequency::Monthly => "Monthly",
            Frequency::Quarterly => "Quarterly",
            Frequency::Yearly => "Yearly",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum RecurringStatus {
    #[default]
    Active,
    Paused,
    Cancelled,
}

/// A subscription or other regular payment. `next_due` is `None` when
/// the stored value could not be parsed as a date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecurringItem {
    pub name: String,
    pub amount: f64,
    pub category: String,
    pub frequency: Frequency,
    #[serde(default)]
    pub next_due: Option<NaiveDate>,
    #[serde(default)]
    pub status: RecurringStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_on: Option<NaiveDate>,
    #[serde(default, skip_serializing)]
    pub origin: OriginTag,
}

impl RecurringItem {
    pub fn is_active(&self) -> bool {
        self.status == RecurringStatus::Active
    }
}

/// Untagged union of the row shapes a ledger partition can hold. The
/// required fields of the two variants are disjoint, so deserialization
/// is unambiguous.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum LedgerRow {
    Transaction(Transaction),
    Recurring(RecurringItem),
}

impl From<Transaction> for LedgerRow {
    fn from(txn: Transaction) -> Self {
        LedgerRow::Transaction(txn)
    }
}

impl From<RecurringItem> for LedgerRow {
    fn from(item: RecurringItem) -> Self {
        LedgerRow::Recurring(item)
    }
}
