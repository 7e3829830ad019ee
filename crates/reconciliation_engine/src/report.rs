use std::collections::BTreeMap;

use chrono::Local;
use models::{
    AppSettings, AssetSlice, ComputedMetrics, MonthlyRecord, ReconciliationReport, ReportMetadata,
    ReportSummary, YearlyStats,
};

use crate::engine::reconcile;
use crate::error::{EngineError, Result};

/// The last `n` months of the series (all of it when shorter).
pub fn trailing(series: &[ComputedMetrics], n: usize) -> &[ComputedMetrics] {
    &series[series.len().saturating_sub(n)..]
}

pub fn cumulative_side_income(series: &[ComputedMetrics]) -> f64 {
    series.iter().map(|m| m.side_income).sum()
}

pub fn latest(series: &[ComputedMetrics]) -> Result<&ComputedMetrics> {
    series.last().ok_or(EngineError::NoRecords)
}

/// Latest month's balances by bucket, empty buckets left out.
pub fn asset_allocation(m: &ComputedMetrics) -> Vec<AssetSlice> {
    [
        ("liquid", m.balances.liquid),
        ("provident", m.balances.provident),
        ("investments", m.balances.investments),
        ("lent", m.balances.lent),
    ]
    .into_iter()
    .filter(|(_, value)| *value > 0.0)
    .map(|(name, value)| AssetSlice {
        name: name.to_string(),
        value,
    })
    .collect()
}

/// Per-calendar-year rollup. Months whose `month` has no parsable year are left out.
pub fn yearly_stats(series: &[ComputedMetrics]) -> Vec<YearlyStats> {
    let mut by_year: BTreeMap<i32, Vec<&ComputedMetrics>> = BTreeMap::new();
    for m in series {
        if let Some(year) = m.month.get(0..4).and_then(|y| y.parse::<i32>().ok()) {
            by_year.entry(year).or_default().push(m);
        }
    }
    by_year
        .into_iter()
        .map(|(year, months)| {
            let months_count = months.len();
            let total_income: f64 = months.iter().map(|m| m.total_income).sum();
            let total_expenses: f64 = months.iter().map(|m| m.total_expense).sum();
            let total_savings: f64 = months.iter().map(|m| m.total_saved_actual).sum();
            let average_save_rate =
                months.iter().map(|m| m.savings_rate).sum::<f64>() / months_count as f64;
            YearlyStats {
                year,
                months_count,
                total_income,
                total_expenses,
                total_savings,
                average_save_rate,
            }
        })
        .collect()
}

pub fn summarize(series: &[ComputedMetrics]) -> ReportSummary {
    let n = series.len();
    ReportSummary {
        months_count: n,
        cumulative_side_income: cumulative_side_income(series),
        months_goal_met: series.iter().filter(|m| m.is_goal_met).count(),
        latest: series.last().cloned(),
        previous: n.checked_sub(2).map(|i| series[i].clone()),
        asset_allocation: series.last().map(asset_allocation).unwrap_or_default(),
        yearly_stats: yearly_stats(series),
    }
}

pub fn build_report(records: &[MonthlyRecord], settings: &AppSettings) -> ReconciliationReport {
    let months = reconcile(records, settings);
    let summary = summarize(&months);
    tracing::info!(
        months = summary.months_count,
        goal_met = summary.months_goal_met,
        "built reconciliation report"
    );
    ReconciliationReport {
        metadata: ReportMetadata {
            generated_at: Local::now().to_rfc3339(),
            settings: settings.clone(),
        },
        summary,
        months,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn month(m: &str, side: f64, income: f64, saved: f64, met: bool) -> MonthlyRecord {
        // income_hand carries `income - side`, expenses make up the difference to `saved`
        MonthlyRecord {
            id: format!("rec_{m}"),
            month: m.to_string(),
            income_side: side,
            income_hand: income - side,
            exp_daily: income - saved,
            target_provident: Some(0.0),
            target_cash: Some(if met { 0.0 } else { 1.0e9 }),
            balance_liquid: 1000.0,
            balance_provident: 500.0,
            ..Default::default()
        }
    }

    fn series() -> Vec<ComputedMetrics> {
        let records = vec![
            month("2023-11", 0.0, 10000.0, 4000.0, true),
            month("2023-12", 2000.0, 12000.0, 5000.0, false),
            month("2024-01", 500.0, 10000.0, 2000.0, true),
        ];
        reconcile(&records, &AppSettings::default())
    }

    #[test]
    fn test_cumulative_side_income() {
        assert_eq!(cumulative_side_income(&series()), 2500.0);
    }

    #[test]
    fn test_trailing_window() {
        let s = series();
        assert_eq!(trailing(&s, 2).len(), 2);
        assert_eq!(trailing(&s, 2)[0].month, "2023-12");
        assert_eq!(trailing(&s, 12).len(), 3);
        assert!(trailing(&s, 0).is_empty());
    }

    #[test]
    fn test_latest_and_previous() {
        let s = series();
        let summary = summarize(&s);
        assert_eq!(summary.months_count, 3);
        assert_eq!(summary.latest.as_ref().unwrap().month, "2024-01");
        assert_eq!(summary.previous.as_ref().unwrap().month, "2023-12");
        assert_eq!(summary.months_goal_met, 2);
        assert_eq!(latest(&s).unwrap().month, "2024-01");
    }

    #[test]
    fn test_empty_series() {
        let summary = summarize(&[]);
        assert_eq!(summary.months_count, 0);
        assert!(summary.latest.is_none());
        assert!(summary.previous.is_none());
        assert!(summary.asset_allocation.is_empty());
        assert!(summary.yearly_stats.is_empty());
        assert_eq!(latest(&[]).unwrap_err(), EngineError::NoRecords);
    }

    #[test]
    fn test_asset_allocation_skips_empty_buckets() {
        let s = series();
        let slices = asset_allocation(latest(&s).unwrap());
        let names: Vec<&str> = slices.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["liquid", "provident"]);
    }

    #[test]
    fn test_yearly_stats() {
        let stats = yearly_stats(&series());
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].year, 2023);
        assert_eq!(stats[0].months_count, 2);
        assert_eq!(stats[0].total_income, 22000.0);
        assert_eq!(stats[0].total_savings, 9000.0);
        assert_eq!(stats[0].average_save_rate, (0.4 + 5000.0 / 12000.0) / 2.0);
        assert_eq!(stats[1].year, 2024);
        assert_eq!(stats[1].total_expenses, 8000.0);
    }

    #[test]
    fn test_build_report() {
        let records = vec![month("2024-01", 0.0, 100.0, 50.0, true)];
        let report = build_report(&records, &AppSettings::default());
        assert_eq!(report.months.len(), 1);
        assert_eq!(report.summary.latest.unwrap().record_id, "rec_2024-01");
        assert!(!report.metadata.generated_at.is_empty());
    }
}
