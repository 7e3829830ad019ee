use anyhow::{Context, Result, anyhow};
use clap::Parser;
use models::MonthlyRecord;
use reconciliation_engine::{MonthKey, io::load_records};
use std::collections::HashMap;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "validate-records",
    about = "Check monthly records for malformed months, duplicates and out-of-sync totals."
)]
struct Args {
    /// Path to the records file (JSON array of monthly records)
    #[arg(short, long, default_value = "records.json")]
    records: PathBuf,
}

#[derive(Default)]
struct Report {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl Report {
    fn error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }
    fn warn(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }
    fn print(&self) {
        for w in &self.warnings {
            println!("[WARN] {}", w);
        }
        for e in &self.errors {
            println!("[ERROR] {}", e);
        }
    }
    fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

fn validate(records: &[MonthlyRecord]) -> Report {
    let mut rep = Report::default();
    let mut seen_months: HashMap<&str, &str> = HashMap::new();

    for (i, r) in records.iter().enumerate() {
        let label = if r.id.is_empty() {
            format!("records[{}]", i)
        } else {
            format!("records[{}] ({})", i, r.id)
        };

        if r.id.is_empty() {
            rep.warn(format!("{}: missing 'id'", label));
        }
        if let Err(e) = MonthKey::parse(&r.month) {
            rep.error(format!("{}: {}", label, e));
        } else if let Some(other) = seen_months.insert(r.month.as_str(), r.id.as_str()) {
            rep.error(format!(
                "{}: month {} already recorded by {}",
                label, r.month, other
            ));
        }

        for violation in r.invariant_violations() {
            rep.error(format!("{}: {}", label, violation));
        }

        for (name, goal) in [("targetProvident", r.target_provident), ("targetCash", r.target_cash)] {
            match goal {
                None => rep.warn(format!("{}: no {} snapshot, settings default applies", label, name)),
                Some(g) if g < 0.0 => rep.error(format!("{}: {} is negative ({})", label, name, g)),
                Some(_) => {}
            }
        }
    }
    rep
}

fn main() -> Result<()> {
    let args = Args::parse();
    let records = load_records(&args.records)
        .with_context(|| format!("loading {}", args.records.display()))?;

    let report = validate(&records);
    report.print();

    if report.has_errors() {
        Err(anyhow!("Validation failed"))
    } else {
        println!("All {} monthly records passed validation.", records.len());
        Ok(())
    }
}
