//! Persistent category/store/keyword configuration plus budget
//! definitions and alert settings.
//!
//! The whole configuration travels as a single typed document loaded and
//! saved through a [`ConfigBackend`]. Category insertion order is kept as
//! a first-class property of the document because categorization
//! tie-breaks depend on it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    errors::Result,
    storage::ConfigBackend,
};

/// General behavior switches for categorization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Settings {
    #[serde(default = "Settings::default_category_name")]
    pub default_category: String,
    #[serde(default = "Settings::default_auto_categorize")]
    pub auto_categorize: bool,
}

impl Settings {
    fn default_category_name() -> String {
        "Other".into()
    }

    fn default_auto_categorize() -> bool {
        true
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_category: Self::default_category_name(),
            auto_categorize: Self::default_auto_categorize(),
        }
    }
}

/// Spending-alert thresholds, expressed as percentages of the budget.
/// Ordering between the two is not enforced; consumers must cope with
/// either arrangement.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct BudgetSettings {
    #[serde(default = "BudgetSettings::default_warning")]
    pub warning_threshold: u32,
    #[serde(default = "BudgetSettings::default_alert")]
    pub alert_threshold: u32,
}

impl BudgetSettings {
    fn default_warning() -> u32 {
        80
    }

    fn default_alert() -> u32 {
        100
    }
}

impl Default for BudgetSettings {
    fn default() -> Self {
        Self {
            warning_threshold: Self::default_warning(),
            alert_threshold: Self::default_alert(),
        }
    }
}

/// Budget accounting window.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BudgetPeriod {
    Monthly,
    Weekly,
}

impl Default for BudgetPeriod {
    fn default() -> Self {
        BudgetPeriod::Monthly
    }
}

/// A spending limit for one category. At most one definition exists per
/// category; setting a new one overwrites.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BudgetDefinition {
    pub category: String,
    pub amount: f64,
    #[serde(default)]
    pub period: BudgetPeriod,
    pub start_date: NaiveDate,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// A named expense bucket with the store names and keyword heuristics
/// used to recognize it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryRule {
    pub name: String,
    #[serde(default)]
    pub stores: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl CategoryRule {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stores: Vec::new(),
            keywords: Vec::new(),
        }
    }

    fn seeded(name: &str, stores: &[&str], keywords: &[&str]) -> Self {
        Self {
            name: name.into(),
            stores: stores.iter().map(|s| s.to_string()).collect(),
            keywords: keywords.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// The full configuration document as persisted by the external store.
/// Unknown keys are ignored on load; missing keys fall back to the
/// documented defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConfigDocument {
    #[serde(default)]
    pub revision: u64,
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub budget_settings: BudgetSettings,
    #[serde(default)]
    pub categories: Vec<CategoryRule>,
    #[serde(default)]
    pub budgets: Vec<BudgetDefinition>,
}

impl Default for ConfigDocument {
    fn default() -> Self {
        Self {
            revision: 0,
            settings: Settings::default(),
            budget_settings: BudgetSettings::default(),
            categories: vec![
                CategoryRule::seeded(
                    "Food",
                    &["Supermarket", "Restaurant", "Café"],
                    &["food", "restaurant", "cafe"],
                ),
                CategoryRule::seeded(
                    "Transport",
                    &["Gas Station", "Uber", "Taxi"],
                    &["fuel", "taxi", "transport"],
                ),
                CategoryRule::seeded(
                    "Shopping",
                    &["Amazon", "Clothing Store"],
                    &["shopping", "clothes"],
                ),
                CategoryRule::seeded(
                    "Bills",
                    &["Electricity Company", "Bank"],
                    &["bill", "utility"],
                ),
                CategoryRule::seeded("Fun", &["Cinema", "Gym"], &["entertainment", "gym"]),
                CategoryRule::seeded("Health", &["Pharmacy", "Hospital"], &["health", "medical"]),
                CategoryRule::seeded("Other", &["Post Office", "Miscellaneous"], &["other", "misc"]),
            ],
            budgets: Vec::new(),
        }
    }
}

/// Owns the configuration document and the backend that persists it.
///
/// Constructed once per process and passed by reference to every
/// component that needs it; there are no hidden module-level instances.
/// Every mutator follows a mutate-in-memory then persist cycle. When
/// persistence fails the in-memory state has already advanced while the
/// stored copy has not; callers must treat the error as "success
/// unknown" and re-read before retrying.
pub struct ConfigStore {
    document: ConfigDocument,
    backend: Box<dyn ConfigBackend>,
}

impl ConfigStore {
    /// Loads the configuration through the backend. A missing document
    /// yields the seeded defaults; an unreadable one is logged and also
    /// falls back to defaults so startup never fails on configuration.
    pub fn open(backend: Box<dyn ConfigBackend>) -> Self {
        let document = match backend.load() {
            Ok(Some(document)) => document,
            Ok(None) => ConfigDocument::default(),
            Err(err) => {
                tracing::warn!(error = %err, "configuration unreadable, using defaults");
                ConfigDocument::default()
            }
        };
        Self { document, backend }
    }

    pub fn document(&self) -> &ConfigDocument {
        &self.document
    }

    /// Category names in insertion order as persisted.
    pub fn categories(&self) -> Vec<&str> {
        self.document
            .categories
            .iter()
            .map(|rule| rule.name.as_str())
            .collect()
    }

    pub fn category(&self, name: &str) -> Option<&CategoryRule> {
        self.document.categories.iter().find(|rule| rule.name == name)
    }

    pub fn stores_for(&self, category: &str) -> &[String] {
        self.category(category)
            .map(|rule| rule.stores.as_slice())
            .unwrap_or(&[])
    }

    pub fn keywords_for(&self, category: &str) -> &[String] {
        self.category(category)
            .map(|rule| rule.keywords.as_slice())
            .unwrap_or(&[])
    }

    /// Every configured store name across all categories, deduplicated
    /// and sorted.
    pub fn all_stores(&self) -> Vec<String> {
        let mut stores: Vec<String> = self
            .document
            .categories
            .iter()
            .flat_map(|rule| rule.stores.iter().cloned())
            .collect();
        stores.sort();
        stores.dedup();
        stores
    }

    pub fn settings(&self) -> &Settings {
        &self.document.settings
    }

    pub fn budget_settings(&self) -> &BudgetSettings {
        &self.document.budget_settings
    }

    pub fn budgets(&self) -> &[BudgetDefinition] {
        &self.document.budgets
    }

    pub fn budget_for(&self, category: &str) -> Option<&BudgetDefinition> {
        self.document
            .budgets
            .iter()
            .find(|budget| budget.category == category)
    }

    /// Adds a new empty category at the end of the iteration order.
    /// Returns `Ok(false)` for an empty or duplicate name.
    pub fn add_category(&mut self, name: &str) -> Result<bool> {
        let name = name.trim();
        if name.is_empty() || self.category(name).is_some() {
            return Ok(false);
        }
        self.document.categories.push(CategoryRule::new(name));
        self.persist()?;
        Ok(true)
    }

    pub fn remove_category(&mut self, name: &str) -> Result<bool> {
        let before = self.document.categories.len();
        self.document.categories.retain(|rule| rule.name != name);
        if self.document.categories.len() == before {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    /// Renames a category in place, preserving its position in the
    /// iteration order. The default category follows the rename when it
    /// pointed at the old name.
    pub fn rename_category(&mut self, old: &str, new: &str) -> Result<bool> {
        let new = new.trim();
        if new.is_empty() || self.category(old).is_none() || self.category(new).is_some() {
            return Ok(false);
        }
        if let Some(rule) = self
            .document
            .categories
            .iter_mut()
            .find(|rule| rule.name == old)
        {
            rule.name = new.to_string();
        }
        if self.document.settings.default_category == old {
            self.document.settings.default_category = new.to_string();
        }
        self.persist()?;
        Ok(true)
    }

    /// Adds a store to a category, keeping the list sorted. Duplicates
    /// are exact case-sensitive matches and leave the list untouched.
    pub fn add_store(&mut self, category: &str, store: &str) -> Result<bool> {
        let store = store.trim();
        if store.is_empty() {
            return Ok(false);
        }
        let Some(rule) = self.category_mut(category) else {
            return Ok(false);
        };
        if rule.stores.iter().any(|existing| existing == store) {
            return Ok(false);
        }
        rule.stores.push(store.to_string());
        rule.stores.sort();
        self.persist()?;
        Ok(true)
    }

    pub fn remove_store(&mut self, category: &str, store: &str) -> Result<bool> {
        let Some(rule) = self.category_mut(category) else {
            return Ok(false);
        };
        let before = rule.stores.len();
        rule.stores.retain(|existing| existing != store);
        if rule.stores.len() == before {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    /// Adds a keyword, normalized to lower case, keeping the list
    /// sorted. Duplicate checks are case-insensitive.
    pub fn add_keyword(&mut self, category: &str, keyword: &str) -> Result<bool> {
        let normalized = keyword.trim().to_lowercase();
        if normalized.is_empty() {
            return Ok(false);
        }
        let Some(rule) = self.category_mut(category) else {
            return Ok(false);
        };
        if rule
            .keywords
            .iter()
            .any(|existing| existing.to_lowercase() == normalized)
        {
            return Ok(false);
        }
        rule.keywords.push(normalized);
        rule.keywords.sort();
        self.persist()?;
        Ok(true)
    }

    /// Removes a keyword, matching case-insensitively.
    pub fn remove_keyword(&mut self, category: &str, keyword: &str) -> Result<bool> {
        let normalized = keyword.to_lowercase();
        let Some(rule) = self.category_mut(category) else {
            return Ok(false);
        };
        let before = rule.keywords.len();
        rule.keywords
            .retain(|existing| existing.to_lowercase() != normalized);
        if rule.keywords.len() == before {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    /// Sets or replaces the budget definition for a category.
    pub fn set_budget(
        &mut self,
        category: &str,
        amount: f64,
        period: BudgetPeriod,
        start_date: NaiveDate,
        is_active: bool,
    ) -> Result<bool> {
        if category.trim().is_empty() || amount < 0.0 {
            return Ok(false);
        }
        let definition = BudgetDefinition {
            category: category.to_string(),
            amount,
            period,
            start_date,
            is_active,
        };
        match self
            .document
            .budgets
            .iter_mut()
            .find(|budget| budget.category == category)
        {
            Some(existing) => *existing = definition,
            None => self.document.budgets.push(definition),
        }
        self.persist()?;
        Ok(true)
    }

    pub fn delete_budget(&mut self, category: &str) -> Result<bool> {
        let before = self.document.budgets.len();
        self.document
            .budgets
            .retain(|budget| budget.category != category);
        if self.document.budgets.len() == before {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    /// Partial settings update; `None` fields are left unchanged.
    pub fn update_settings(
        &mut self,
        default_category: Option<&str>,
        auto_categorize: Option<bool>,
    ) -> Result<()> {
        if let Some(category) = default_category {
            self.document.settings.default_category = category.to_string();
        }
        if let Some(enabled) = auto_categorize {
            self.document.settings.auto_categorize = enabled;
        }
        self.persist()
    }

    /// Partial threshold update; `None` fields are left unchanged.
    pub fn update_budget_settings(
        &mut self,
        warning_threshold: Option<u32>,
        alert_threshold: Option<u32>,
    ) -> Result<()> {
        if let Some(warning) = warning_threshold {
            self.document.budget_settings.warning_threshold = warning;
        }
        if let Some(alert) = alert_threshold {
            self.document.budget_settings.alert_threshold = alert;
        }
        self.persist()
    }

    fn category_mut(&mut self, name: &str) -> Option<&mut CategoryRule> {
        self.document
            .categories
            .iter_mut()
            .find(|rule| rule.name == name)
    }

    fn persist(&mut self) -> Result<()> {
        self.document.revision += 1;
        self.backend.save(&self.document)?;
        tracing::debug!(revision = self.document.revision, "configuration persisted");
        Ok(())
    }
}
