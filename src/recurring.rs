//! Due-status and cost estimates for recurring payments.
//!
//! `next_due` is never advanced here: once a date passes the item reads
//! as overdue until a caller rewrites the record. That mirrors the
//! tracker's passive behavior.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};

use crate::ledger::{Frequency, RecurringItem};

/// Items due within this many days count as "due soon".
const DUE_SOON_DAYS: i64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueLabel {
    Overdue,
    DueSoon,
    Upcoming,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DueStatus {
    pub label: DueLabel,
    /// Negative when overdue; `None` when the item has no parseable due
    /// date.
    pub days_until: Option<i64>,
}

pub struct RecurringScheduler;

impl RecurringScheduler {
    /// Classifies an item's due date relative to `reference`.
    pub fn due_status(item: &RecurringItem, reference: NaiveDate) -> DueStatus {
        let Some(next_due) = item.next_due else {
            return DueStatus {
                label: DueLabel::Unknown,
                days_until: None,
            };
        };
        let days_until = (next_due - reference).num_days();
        let label = if days_until < 0 {
            DueLabel::Overdue
        } else if days_until <= DUE_SOON_DAYS {
            DueLabel::DueSoon
        } else {
            DueLabel::Upcoming
        };
        DueStatus {
            label,
            days_until: Some(days_until),
        }
    }

    /// Estimates the next due date from the last payment. Months are a
    /// fixed 30-day approximation rather than calendar-aware, quarters
    /// 90 days, years 365.
    pub fn estimate_next_due(last_paid: NaiveDate, frequency: Frequency) -> NaiveDate {
        let delta = match frequency {
            Frequency::Daily => Duration::days(1),
            Frequency::Weekly => Duration::weeks(1),
            Frequency::Biweekly => Duration::weeks(2),
            Frequency::Monthly => Duration::days(30),
            Frequency::Quarterly => Duration::days(90),
            Frequency::Yearly => Duration::days(365),
        };
        last_paid + delta
    }

    /// Compatibility estimate: every active item's amount times 12,
    /// regardless of its actual frequency. Known to undercount daily and
    /// weekly items and overcount quarterly and yearly ones; kept for
    /// parity with existing dashboards. See
    /// [`yearly_cost_estimate_corrected`](Self::yearly_cost_estimate_corrected).
    pub fn yearly_cost_estimate(items: &[RecurringItem]) -> f64 {
        items
            .iter()
            .filter(|item| item.is_active())
            .map(|item| item.amount * 12.0)
            .sum()
    }

    /// Frequency-aware yearly estimate for active items.
    pub fn yearly_cost_estimate_corrected(items: &[RecurringItem]) -> f64 {
        items
            .iter()
            .filter(|item| item.is_active())
            .map(|item| {
                let per_year = match item.frequency {
                    Frequency::Daily => 365.0,
                    Frequency::Weekly => 52.0,
                    Frequency::Biweekly => 26.0,
                    Frequency::Monthly => 12.0,
                    Frequency::Quarterly => 4.0,
                    Frequency::Yearly => 1.0,
                };
                item.amount * per_year
            })
            .sum()
    }

    /// Items whose due date falls on or before `reference + days`,
    /// overdue ones included.
    pub fn due_within(
        items: &[RecurringItem],
        reference: NaiveDate,
        days: i64,
    ) -> Vec<&RecurringItem> {
        let cutoff = reference + Duration::days(days);
        items
            .iter()
            .filter(|item| matches!(item.next_due, Some(due) if due <= cutoff))
            .collect()
    }

    /// Sum of amounts for items on a monthly cadence.
    pub fn monthly_total(items: &[RecurringItem]) -> f64 {
        items
            .iter()
            .filter(|item| item.frequency == Frequency::Monthly)
            .map(|item| item.amount)
            .sum()
    }

    /// Per-category amount totals, for the analysis breakdown.
    pub fn totals_by_category(items: &[RecurringItem]) -> BTreeMap<String, f64> {
        let mut totals = BTreeMap::new();
        for item in items {
            *totals.entry(item.category.clone()).or_insert(0.0) += item.amount;
        }
        totals
    }

    /// Per-frequency amount totals.
    pub fn totals_by_frequency(items: &[RecurringItem]) -> BTreeMap<&'static str, f64> {
        let mut totals = BTreeMap::new();
        for item in items {
            *totals.entry(item.frequency.label()).or_insert(0.0) += item.amount;
        }
        totals
    }
}
