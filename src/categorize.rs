//! Auto-categorization of store names against the configured rules.

use crate::config::ConfigStore;

/// Borrowing view over a [`ConfigStore`] that labels incoming store
/// names. Matching is deterministic: categories are consulted in their
/// persisted insertion order and the first match wins.
pub struct Categorizer<'a> {
    config: &'a ConfigStore,
}

impl<'a> Categorizer<'a> {
    pub fn new(config: &'a ConfigStore) -> Self {
        Self { config }
    }

    /// Returns the category for a store name.
    ///
    /// Order of precedence: the default category when auto-categorization
    /// is disabled, then a case-insensitive exact match against the store
    /// lists, then a keyword substring match, then the default category.
    /// An empty name never matches and falls through to the default.
    pub fn categorize(&self, store_name: &str) -> String {
        let settings = self.config.settings();
        if !settings.auto_categorize {
            return settings.default_category.clone();
        }

        let needle = store_name.trim().to_lowercase();
        if needle.is_empty() {
            return settings.default_category.clone();
        }

        for rule in &self.config.document().categories {
            if rule
                .stores
                .iter()
                .any(|store| store.to_lowercase() == needle)
            {
                return rule.name.clone();
            }
        }

        for rule in &self.config.document().categories {
            for keyword in &rule.keywords {
                if needle.contains(&keyword.to_lowercase()) {
                    return rule.name.clone();
                }
            }
        }

        settings.default_category.clone()
    }
}
