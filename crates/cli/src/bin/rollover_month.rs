use anyhow::{Context, Result, anyhow};
use chrono::Local;
use clap::Parser;
use models::{AppSettings, LoanLedger, MonthlyRecord, RawMonthlyRecord};
use reconciliation_engine::{MonthKey, normalize_records};
use serde_json::Value;
use std::{fs, path::PathBuf};
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(
    name = "rollover-month",
    about = "Append next month's record, carrying balances and accounts over from the latest one."
)]
struct Args {
    /// Path to the records file (JSON array of monthly records)
    #[arg(short, long)]
    records: PathBuf,

    /// Optional settings file; goals for the new month are snapshotted from it
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Optional loan ledger file; its unpaid loans become the new month's lent items
    #[arg(short, long)]
    loans: Option<PathBuf>,

    /// Optional output path; defaults to rewriting the records file
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn latest_record(records: &[MonthlyRecord]) -> Option<&MonthlyRecord> {
    records.iter().max_by(|a, b| a.month.cmp(&b.month))
}

/// Skeleton for the month after `latest`: flows zeroed, balances carried, goals snapshotted.
///
/// The provident balance already includes the prefilled contribution, so an untouched
/// skeleton reconciles with no discrepancy.
fn next_record(
    latest: &MonthlyRecord,
    settings: &AppSettings,
    ledger: Option<&LoanLedger>,
    recorded_at: &str,
) -> Result<MonthlyRecord> {
    let month = MonthKey::parse(&latest.month)?.next();
    let net_provident = settings.net_provident_goal();

    let mut record = MonthlyRecord {
        id: Uuid::new_v4().to_string(),
        month: month.to_string(),
        record_date: recorded_at.to_string(),
        target_provident: Some(net_provident),
        target_cash: Some(settings.monthly_cash_goal),
        income_provident: net_provident,
        balance_provident: latest.balance_provident + net_provident,
        balance_investments: latest.balance_investments,
        liquid_assets: latest.liquid_assets.clone(),
        lent_items: match ledger {
            Some(l) => l.outstanding_snapshot(),
            None => latest.lent_items.clone(),
        },
        ..Default::default()
    };
    record.synchronize_derived();
    Ok(record)
}

fn main() -> Result<()> {
    reconciliation_engine::init_tracing("cli=info,settings_loader=info");
    let args = Args::parse();

    let txt = fs::read_to_string(&args.records)
        .with_context(|| format!("reading {}", args.records.display()))?;
    let mut values: Vec<Value> = serde_json::from_str(&txt)
        .with_context(|| format!("parsing {}", args.records.display()))?;
    let raw: Vec<RawMonthlyRecord> = values
        .iter()
        .cloned()
        .map(serde_json::from_value)
        .collect::<Result<_, _>>()
        .context("reading monthly records")?;
    let records = normalize_records(raw);

    let settings = settings_loader::load_settings_or_default(args.settings.as_ref())?;
    let ledger = match &args.loans {
        Some(path) => {
            let txt = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            let ledger: LoanLedger = serde_json::from_str(&txt)
                .with_context(|| format!("parsing {}", path.display()))?;
            Some(ledger)
        }
        None => None,
    };

    let latest = latest_record(&records).ok_or_else(|| anyhow!("records file has no months"))?;
    let recorded_at = Local::now().format("%Y-%m-%dT%H:%M:%S").to_string();
    let record = next_record(latest, &settings, ledger.as_ref(), &recorded_at)?;
    tracing::info!(from = %latest.month, to = %record.month, "rolling over");

    values.push(serde_json::to_value(&record)?);
    let out_path = args.output.unwrap_or(args.records);
    fs::write(&out_path, serde_json::to_string_pretty(&values)?)
        .with_context(|| format!("writing {}", out_path.display()))?;
    println!("Added {} to {}", record.month, out_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::{LiquidAssetItem, LoanRecord, LoanStatus};

    fn latest() -> MonthlyRecord {
        MonthlyRecord {
            id: "rec_003".into(),
            month: "2024-12".into(),
            income_hand: 17507.0,
            exp_rent: 1750.0,
            balance_provident: 94976.0,
            balance_investments: 50000.0,
            balance_liquid: 574000.0,
            liquid_assets: vec![LiquidAssetItem {
                id: "l1".into(),
                name: "Bank".into(),
                amount: 574000.0,
            }],
            balance_lent: 20000.0,
            lent_items: vec![LoanRecord {
                id: "loan_1".into(),
                borrower: "Wang".into(),
                amount: 20000.0,
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_next_record_carries_balances_and_resets_flows() {
        let settings = AppSettings::default();
        let rec = next_record(&latest(), &settings, None, "2025-01-20T10:00:00").unwrap();

        assert_eq!(rec.month, "2025-01");
        assert_eq!(rec.target_provident, Some(3000.0));
        assert_eq!(rec.target_cash, Some(10000.0));
        assert_eq!(rec.income_provident, 3000.0);
        assert_eq!(rec.income_hand, 0.0);
        assert_eq!(rec.exp_rent, 0.0);
        assert_eq!(rec.balance_provident, 97976.0);
        assert_eq!(rec.balance_liquid, 574000.0);
        assert_eq!(rec.balance_lent, 20000.0);
        assert!(rec.invariant_violations().is_empty());
        assert_ne!(rec.id, "rec_003");
    }

    #[test]
    fn test_untouched_skeleton_reconciles_without_discrepancy() {
        let settings = AppSettings::default();
        let prev = latest();
        let next = next_record(&prev, &settings, None, "2025-01-20T10:00:00").unwrap();

        let series = reconciliation_engine::reconcile(&[prev, next], &settings);
        assert_eq!(series[1].months_since_previous, Some(1));
        assert_eq!(series[1].theoretical_assets, series[1].actual_assets);
        assert_eq!(series[1].discrepancy, 0.0);
    }

    #[test]
    fn test_next_record_takes_lent_items_from_ledger() {
        let ledger = LoanLedger::new(vec![
            LoanRecord {
                id: "loan_1".into(),
                amount: 20000.0,
                status: LoanStatus::Paid,
                repaid_amount: 20000.0,
                ..Default::default()
            },
            LoanRecord {
                id: "loan_2".into(),
                amount: 3000.0,
                ..Default::default()
            },
        ]);
        let rec = next_record(&latest(), &AppSettings::default(), Some(&ledger), "").unwrap();
        assert_eq!(rec.lent_items.len(), 1);
        assert_eq!(rec.balance_lent, 3000.0);
    }

    #[test]
    fn test_latest_record_by_month() {
        let mut older = latest();
        older.month = "2024-11".into();
        let records = vec![latest(), older];
        assert_eq!(latest_record(&records).unwrap().month, "2024-12");
        assert!(latest_record(&[]).is_none());
    }

    #[test]
    fn test_malformed_latest_month_is_an_error() {
        let mut bad = latest();
        bad.month = "Dec 2024".into();
        assert!(next_record(&bad, &AppSettings::default(), None, "").is_err());
    }
}
