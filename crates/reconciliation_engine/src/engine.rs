//! Single left-to-right pass over the month-sorted records.
//!
//! The first record is taken as ground truth. Every later month is projected
//! from the previous month's *actual* assets plus this month's recorded
//! savings (and any gap-fill credit), so an error in one month never compounds
//! into the following ones. Any edit means a full re-run.

use models::{AppSettings, ComputedMetrics, MonthlyRecord, RawMonthlyRecord};

use crate::flows::{asset_breakdown, total_expense, total_income};
use crate::gap_fill::{gap_fill, GapFill};
use crate::goals::evaluate_goals;
use crate::normalizer::normalize_records;

/// Returns the records ordered by `month` without touching the caller's list.
pub fn sort_chronologically(records: &[MonthlyRecord]) -> Vec<&MonthlyRecord> {
    let mut sorted: Vec<&MonthlyRecord> = records.iter().collect();
    sorted.sort_by(|a, b| a.month.cmp(&b.month));
    sorted
}

pub fn reconcile(records: &[MonthlyRecord], settings: &AppSettings) -> Vec<ComputedMetrics> {
    let sorted = sort_chronologically(records);
    let mut out = Vec::with_capacity(sorted.len());
    let mut prev: Option<&MonthlyRecord> = None;

    for record in sorted {
        let balances = asset_breakdown(record);
        let actual_assets = balances.total();
        let total_income = total_income(record);
        let total_expense = total_expense(record);
        let goals = evaluate_goals(record, settings);

        let (running_theoretical, gap) = match prev {
            None => (actual_assets, GapFill::default()),
            Some(p) => {
                let gap = gap_fill(p, record, settings);
                if gap.month_diff == Some(0) {
                    tracing::warn!(month = %record.month, "duplicate month in record list");
                }
                let base = asset_breakdown(p).total();
                (base + goals.total_saved_actual + gap.credit, gap)
            }
        };

        let savings_rate = if total_income > 0.0 {
            goals.total_saved_actual / total_income
        } else {
            0.0
        };

        let metrics = ComputedMetrics {
            record_id: record.id.clone(),
            month: record.month.clone(),
            balances,
            actual_assets,
            theoretical_assets: running_theoretical,
            discrepancy: actual_assets - running_theoretical,
            total_income,
            total_expense,
            side_income: record.income_side,
            total_saved_actual: goals.total_saved_actual,
            savings_for_goal: goals.savings_for_goal,
            savings_rate,
            provident: goals.provident,
            cash: goals.cash,
            total_goal: goals.total_goal,
            achievement_rate: goals.achievement_rate,
            is_goal_met: goals.is_goal_met(),
            months_since_previous: gap.month_diff,
            gap_months_backfilled: gap.backfilled_months,
            gap_fill_credit: gap.credit,
        };
        tracing::debug!(
            month = %metrics.month,
            actual = metrics.actual_assets,
            theoretical = metrics.theoretical_assets,
            discrepancy = metrics.discrepancy,
            backfilled = metrics.gap_months_backfilled,
            "reconciled month"
        );

        out.push(metrics);
        prev = Some(record);
    }
    out
}

/// Normalizes raw records, then reconciles them.
pub fn reconcile_raw(raw: Vec<RawMonthlyRecord>, settings: &AppSettings) -> Vec<ComputedMetrics> {
    let records = normalize_records(raw);
    reconcile(&records, settings)
}
