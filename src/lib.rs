//! Expense Core provides the categorization, budget accounting, and
//! ledger aggregation logic behind a spreadsheet-backed expense tracker.
//! Presentation and the remote spreadsheet transport live outside this
//! crate and reach it through the traits in [`storage`].

pub mod budget;
pub mod categorize;
pub mod config;
pub mod errors;
pub mod ledger;
pub mod recurring;
pub mod storage;
pub mod utils;

pub use errors::{ExpenseError, Result};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Expense Core tracing initialized.");
    });
}
