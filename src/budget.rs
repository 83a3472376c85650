//! Budget-period accounting: period bounds, per-category spend, alert
//! thresholds, the aggregate report, and the pace projection.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};

use crate::config::{BudgetDefinition, BudgetPeriod, BudgetSettings, ConfigStore};
use crate::ledger::Transaction;

/// Over/under band around the period progress, in percentage points.
const PACE_TOLERANCE: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetStatusLabel {
    NoBudget,
    Ok,
    Warning,
    Alert,
}

/// Threshold-based status for one category in the current period.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryBudgetStatus {
    pub category: String,
    pub has_budget: bool,
    pub budget_amount: f64,
    pub spent: f64,
    /// May be negative, signalling overspend.
    pub remaining: f64,
    pub percentage: f64,
    pub label: BudgetStatusLabel,
}

/// Aggregate view over the whole budget set.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetReport {
    /// Active definitions only.
    pub total_budgeted: f64,
    /// Spend restricted to categories that have a definition.
    pub total_spent: f64,
    pub percentage: f64,
    pub label: BudgetStatusLabel,
    pub categories: Vec<CategoryBudgetStatus>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaceLabel {
    OverPace,
    OnPace,
    UnderPace,
}

/// How spending tracks against elapsed time in the period.
#[derive(Debug, Clone, PartialEq)]
pub struct PaceProjection {
    pub period_progress: f64,
    pub spending_rate: f64,
    pub projected_total: f64,
    pub label: PaceLabel,
}

/// Inclusive datetime bounds of the accounting window containing
/// `reference`. Monthly windows follow calendar month lengths; weekly
/// windows run ISO Monday through Sunday.
pub fn period_bounds(period: BudgetPeriod, reference: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
    let (first, last) = match period {
        BudgetPeriod::Monthly => {
            let first = reference.with_day(1).unwrap_or(reference);
            let last = first + Duration::days(days_in_month(first.year(), first.month()) as i64 - 1);
            (first, last)
        }
        BudgetPeriod::Weekly => {
            let monday =
                reference - Duration::days(reference.weekday().num_days_from_monday() as i64);
            (monday, monday + Duration::days(6))
        }
    };
    (
        first.and_hms_opt(0, 0, 0).unwrap_or_default(),
        last.and_hms_micro_opt(23, 59, 59, 999_999).unwrap_or_default(),
    )
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let first_next = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(year, month, 28).unwrap());
    (first_next - Duration::days(1)).day()
}

/// Sum of the category's transaction amounts within the period
/// containing `reference`. No matches means 0, not an error.
pub fn spent_in_period(
    transactions: &[Transaction],
    category: &str,
    period: BudgetPeriod,
    reference: NaiveDate,
) -> f64 {
    let (start, end) = period_bounds(period, reference);
    transactions
        .iter()
        .filter(|txn| txn.category == category)
        .filter(|txn| txn.date >= start.date() && txn.date <= end.date())
        .map(|txn| txn.amount)
        .sum()
}

/// Evaluates budgets and thresholds against a period-filtered
/// transaction set.
pub struct BudgetEngine<'a> {
    budgets: &'a [BudgetDefinition],
    thresholds: BudgetSettings,
}

impl<'a> BudgetEngine<'a> {
    pub fn new(budgets: &'a [BudgetDefinition], thresholds: BudgetSettings) -> Self {
        Self {
            budgets,
            thresholds,
        }
    }

    pub fn from_config(config: &'a ConfigStore) -> Self {
        Self::new(config.budgets(), *config.budget_settings())
    }

    /// Status for one category. An absent or inactive definition yields
    /// `NoBudget` regardless of thresholds.
    pub fn category_status(
        &self,
        transactions: &[Transaction],
        category: &str,
        reference: NaiveDate,
    ) -> CategoryBudgetStatus {
        let definition = self
            .budgets
            .iter()
            .find(|budget| budget.category == category && budget.is_active);
        let Some(definition) = definition else {
            return CategoryBudgetStatus {
                category: category.to_string(),
                has_budget: false,
                budget_amount: 0.0,
                spent: 0.0,
                remaining: 0.0,
                percentage: 0.0,
                label: BudgetStatusLabel::NoBudget,
            };
        };

        let spent = spent_in_period(transactions, category, definition.period, reference);
        let percentage = if definition.amount > 0.0 {
            spent / definition.amount * 100.0
        } else {
            0.0
        };
        CategoryBudgetStatus {
            category: category.to_string(),
            has_budget: true,
            budget_amount: definition.amount,
            spent,
            remaining: definition.amount - spent,
            percentage,
            label: self.classify(percentage),
        }
    }

    /// Aggregate report across every category carrying a definition.
    pub fn report(&self, transactions: &[Transaction], reference: NaiveDate) -> BudgetReport {
        let total_budgeted: f64 = self
            .budgets
            .iter()
            .filter(|budget| budget.is_active)
            .map(|budget| budget.amount)
            .sum();
        let total_spent: f64 = self
            .budgets
            .iter()
            .map(|budget| {
                spent_in_period(transactions, &budget.category, budget.period, reference)
            })
            .sum();

        let categories: Vec<CategoryBudgetStatus> = self
            .budgets
            .iter()
            .map(|budget| self.category_status(transactions, &budget.category, reference))
            .collect();

        let (percentage, label) = if total_budgeted > 0.0 {
            let percentage = total_spent / total_budgeted * 100.0;
            (percentage, self.classify(percentage))
        } else {
            (0.0, BudgetStatusLabel::NoBudget)
        };

        BudgetReport {
            total_budgeted,
            total_spent,
            percentage,
            label,
            categories,
        }
    }

    /// Projects end-of-period spending from the rate so far. `None` when
    /// nothing is budgeted (the rate is undefined); a zero elapsed time
    /// projects 0.
    pub fn pace(
        &self,
        report: &BudgetReport,
        days_elapsed: u32,
        days_in_period: u32,
    ) -> Option<PaceProjection> {
        if report.total_budgeted <= 0.0 {
            return None;
        }
        let period_progress = if days_in_period > 0 {
            days_elapsed as f64 / days_in_period as f64 * 100.0
        } else {
            0.0
        };
        let spending_rate = report.total_spent / report.total_budgeted * 100.0;
        let projected_total = if days_elapsed == 0 {
            0.0
        } else {
            report.total_spent / days_elapsed as f64 * days_in_period as f64
        };
        let label = if spending_rate > period_progress + PACE_TOLERANCE {
            PaceLabel::OverPace
        } else if spending_rate < period_progress - PACE_TOLERANCE {
            PaceLabel::UnderPace
        } else {
            PaceLabel::OnPace
        };
        Some(PaceProjection {
            period_progress,
            spending_rate,
            projected_total,
            label,
        })
    }

    fn classify(&self, percentage: f64) -> BudgetStatusLabel {
        if percentage >= self.thresholds.alert_threshold as f64 {
            BudgetStatusLabel::Alert
        } else if percentage >= self.thresholds.warning_threshold as f64 {
            BudgetStatusLabel::Warning
        } else {
            BudgetStatusLabel::Ok
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::OriginTag;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn txn(day: NaiveDate, category: &str, amount: f64) -> Transaction {
        Transaction {
            date: day,
            amount,
            category: category.into(),
            counterpart: "Somewhere".into(),
            payment_method: "Card".into(),
            origin: OriginTag::Personal,
        }
    }

    fn food_budget(amount: f64) -> Vec<BudgetDefinition> {
        vec![BudgetDefinition {
            category: "Food".into(),
            amount,
            period: BudgetPeriod::Monthly,
            start_date: date(2024, 1, 1),
            is_active: true,
        }]
    }

    #[test]
    fn monthly_bounds_cover_a_leap_february() {
        let (start, end) = period_bounds(BudgetPeriod::Monthly, date(2024, 2, 15));
        assert_eq!(start, date(2024, 2, 1).and_hms_opt(0, 0, 0).unwrap());
        assert_eq!(
            end,
            date(2024, 2, 29)
                .and_hms_micro_opt(23, 59, 59, 999_999)
                .unwrap()
        );
    }

    #[test]
    fn monthly_bounds_handle_december() {
        let (start, end) = period_bounds(BudgetPeriod::Monthly, date(2023, 12, 31));
        assert_eq!(start.date(), date(2023, 12, 1));
        assert_eq!(end.date(), date(2023, 12, 31));
    }

    #[test]
    fn weekly_bounds_run_monday_through_sunday() {
        // 2024-03-06 is a Wednesday.
        let (start, end) = period_bounds(BudgetPeriod::Weekly, date(2024, 3, 6));
        assert_eq!(start, date(2024, 3, 4).and_hms_opt(0, 0, 0).unwrap());
        assert_eq!(
            end,
            date(2024, 3, 10)
                .and_hms_micro_opt(23, 59, 59, 999_999)
                .unwrap()
        );
    }

    #[test]
    fn weekly_bounds_are_stable_across_the_week() {
        let monday = period_bounds(BudgetPeriod::Weekly, date(2024, 3, 4));
        let sunday = period_bounds(BudgetPeriod::Weekly, date(2024, 3, 10));
        assert_eq!(monday, sunday);
    }

    #[test]
    fn spent_in_period_filters_category_and_window() {
        let transactions = vec![
            txn(date(2024, 2, 10), "Food", 50.0),
            txn(date(2024, 2, 29), "Food", 25.0),
            txn(date(2024, 3, 1), "Food", 99.0),
            txn(date(2024, 2, 10), "Transport", 10.0),
        ];
        let spent = spent_in_period(
            &transactions,
            "Food",
            BudgetPeriod::Monthly,
            date(2024, 2, 15),
        );
        assert_eq!(spent, 75.0);
        assert_eq!(
            spent_in_period(&[], "Food", BudgetPeriod::Monthly, date(2024, 2, 15)),
            0.0
        );
    }

    #[test]
    fn status_thresholds_classify_ok_warning_alert() {
        let budgets = food_budget(200.0);
        let engine = BudgetEngine::new(&budgets, BudgetSettings::default());
        let reference = date(2024, 2, 15);

        let ok = engine.category_status(&[txn(reference, "Food", 150.0)], "Food", reference);
        assert_eq!(ok.percentage, 75.0);
        assert_eq!(ok.label, BudgetStatusLabel::Ok);

        let warning = engine.category_status(&[txn(reference, "Food", 170.0)], "Food", reference);
        assert_eq!(warning.percentage, 85.0);
        assert_eq!(warning.label, BudgetStatusLabel::Warning);

        let alert = engine.category_status(&[txn(reference, "Food", 250.0)], "Food", reference);
        assert_eq!(alert.percentage, 125.0);
        assert_eq!(alert.remaining, -50.0);
        assert_eq!(alert.label, BudgetStatusLabel::Alert);
    }

    #[test]
    fn missing_or_inactive_budget_reports_no_budget() {
        let mut budgets = food_budget(200.0);
        let engine = BudgetEngine::new(&budgets, BudgetSettings::default());
        let status = engine.category_status(&[], "Transport", date(2024, 2, 15));
        assert!(!status.has_budget);
        assert_eq!(status.label, BudgetStatusLabel::NoBudget);

        budgets[0].is_active = false;
        let engine = BudgetEngine::new(&budgets, BudgetSettings::default());
        let status = engine.category_status(&[], "Food", date(2024, 2, 15));
        assert_eq!(status.label, BudgetStatusLabel::NoBudget);
    }

    #[test]
    fn zero_budget_amount_reports_zero_percentage() {
        let budgets = food_budget(0.0);
        let engine = BudgetEngine::new(&budgets, BudgetSettings::default());
        let reference = date(2024, 2, 15);
        let status = engine.category_status(&[txn(reference, "Food", 10.0)], "Food", reference);
        assert_eq!(status.percentage, 0.0);
        assert_eq!(status.remaining, -10.0);
    }

    #[test]
    fn inverted_thresholds_still_prefer_alert() {
        // warning above alert: the alert check runs first either way.
        let budgets = food_budget(100.0);
        let thresholds = BudgetSettings {
            warning_threshold: 110,
            alert_threshold: 90,
        };
        let engine = BudgetEngine::new(&budgets, thresholds);
        let reference = date(2024, 2, 15);
        let status = engine.category_status(&[txn(reference, "Food", 95.0)], "Food", reference);
        assert_eq!(status.label, BudgetStatusLabel::Alert);
    }

    #[test]
    fn report_totals_only_count_budgeted_categories() {
        let reference = date(2024, 2, 15);
        let budgets = vec![
            BudgetDefinition {
                category: "Food".into(),
                amount: 200.0,
                period: BudgetPeriod::Monthly,
                start_date: date(2024, 1, 1),
                is_active: true,
            },
            BudgetDefinition {
                category: "Transport".into(),
                amount: 100.0,
                period: BudgetPeriod::Monthly,
                start_date: date(2024, 1, 1),
                is_active: false,
            },
        ];
        let transactions = vec![
            txn(reference, "Food", 150.0),
            txn(reference, "Transport", 30.0),
            txn(reference, "Shopping", 500.0),
        ];
        let engine = BudgetEngine::new(&budgets, BudgetSettings::default());
        let report = engine.report(&transactions, reference);
        // Only the active definition is budgeted; Shopping has none at all.
        assert_eq!(report.total_budgeted, 200.0);
        assert_eq!(report.total_spent, 180.0);
        assert_eq!(report.label, BudgetStatusLabel::Warning);
        assert_eq!(report.categories.len(), 2);
    }

    #[test]
    fn empty_budget_set_reports_no_budget() {
        let engine = BudgetEngine::new(&[], BudgetSettings::default());
        let report = engine.report(&[], date(2024, 2, 15));
        assert_eq!(report.label, BudgetStatusLabel::NoBudget);
        assert!(engine.pace(&report, 10, 29).is_none());
    }

    #[test]
    fn pace_classifies_over_on_and_under() {
        let budgets = food_budget(300.0);
        let engine = BudgetEngine::new(&budgets, BudgetSettings::default());
        let reference = date(2024, 2, 15);

        // 50% progress (spending rate computed against 300).
        let over = engine.report(&[txn(reference, "Food", 200.0)], reference);
        let pace = engine.pace(&over, 15, 30).unwrap();
        assert_eq!(pace.period_progress, 50.0);
        assert_eq!(pace.label, PaceLabel::OverPace);
        assert_eq!(pace.projected_total, 400.0);

        let on = engine.report(&[txn(reference, "Food", 150.0)], reference);
        assert_eq!(engine.pace(&on, 15, 30).unwrap().label, PaceLabel::OnPace);

        let under = engine.report(&[txn(reference, "Food", 30.0)], reference);
        assert_eq!(
            engine.pace(&under, 15, 30).unwrap().label,
            PaceLabel::UnderPace
        );
    }

    #[test]
    fn pace_guards_zero_elapsed_days() {
        let budgets = food_budget(300.0);
        let engine = BudgetEngine::new(&budgets, BudgetSettings::default());
        let reference = date(2024, 2, 1);
        let report = engine.report(&[txn(reference, "Food", 40.0)], reference);
        let pace = engine.pace(&report, 0, 29).unwrap();
        assert_eq!(pace.projected_total, 0.0);
        assert_eq!(pace.period_progress, 0.0);
        // Any spend at zero progress beyond tolerance reads as over-pace.
        assert_eq!(pace.label, PaceLabel::OverPace);
    }
}
