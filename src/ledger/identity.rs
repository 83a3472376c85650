use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{ExpenseError, Result};

/// A principal that owns or can view ledger partitions. The set is
/// fixed: two named users with private partitions plus the shared pool.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Identity {
    User1,
    User2,
    Shared,
}

impl Identity {
    /// Parses the opaque identity string handed over by the session
    /// provider. Anything outside the fixed set is rejected.
    pub fn parse(raw: &str) -> Result<Identity> {
        match raw.trim().to_lowercase().as_str() {
            "user1" => Ok(Identity::User1),
            "user2" => Ok(Identity::User2),
            "shared" => Ok(Identity::Shared),
            other => Err(ExpenseError::UnknownIdentity(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Identity::User1 => "user1",
            Identity::User2 => "user2",
            Identity::Shared => "shared",
        }
    }

    pub fn is_private(&self) -> bool {
        !matches!(self, Identity::Shared)
    }

    /// The partitions visible to this identity, private first. The
    /// shared identity sees only the shared pool.
    pub fn resolve_sources(&self) -> Vec<Identity> {
        if self.is_private() {
            vec![*self, Identity::Shared]
        } else {
            vec![Identity::Shared]
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The record families kept per identity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Expenses,
    Income,
    Recurrings,
    Investments,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Expenses => "expenses",
            DataType::Income => "income",
            DataType::Recurrings => "recurrings",
            DataType::Investments => "investments",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Address of one tabular record set in the external ledger storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Partition {
    pub identity: Identity,
    pub data_type: DataType,
}

impl Partition {
    pub fn new(identity: Identity, data_type: DataType) -> Self {
        Self {
            identity,
            data_type,
        }
    }

    /// Default worksheet naming: `{data_type}_{identity}`.
    pub fn default_sheet_name(&self) -> String {
        format!("{}_{}", self.data_type, self.identity)
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.default_sheet_name())
    }
}

/// Maps partitions to their worksheet names. Deployments can override
/// individual names (the hosted app keys sheets by display name);
/// unmapped partitions fall back to the default naming scheme.
#[derive(Debug, Clone, Default)]
pub struct WorksheetNames {
    overrides: HashMap<Partition, String>,
}

impl WorksheetNames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_override(mut self, partition: Partition, name: impl Into<String>) -> Self {
        self.overrides.insert(partition, name.into());
        self
    }

    pub fn resolve(&self, partition: &Partition) -> String {
        self.overrides
            .get(partition)
            .cloned()
            .unwrap_or_else(|| partition.default_sheet_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_the_fixed_set_only() {
        assert_eq!(Identity::parse("user1").unwrap(), Identity::User1);
        assert_eq!(Identity::parse(" Shared ").unwrap(), Identity::Shared);
        assert!(Identity::parse("admin").is_err());
        assert!(Identity::parse("").is_err());
    }

    #[test]
    fn private_identities_see_their_partition_then_shared() {
        assert_eq!(
            Identity::User2.resolve_sources(),
            vec![Identity::User2, Identity::Shared]
        );
        assert_eq!(Identity::Shared.resolve_sources(), vec![Identity::Shared]);
    }

    #[test]
    fn sheet_names_default_and_override() {
        let partition = Partition::new(Identity::User1, DataType::Expenses);
        assert_eq!(partition.default_sheet_name(), "expenses_user1");

        let names = WorksheetNames::new().with_override(partition, "expenses_taras");
        assert_eq!(names.resolve(&partition), "expenses_taras");
        let other = Partition::new(Identity::Shared, DataType::Recurrings);
        assert_eq!(names.resolve(&other), "recurrings_shared");
    }
}
