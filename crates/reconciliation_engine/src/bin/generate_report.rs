use anyhow::{Context, Result};
use reconciliation_engine::{build_report, init_tracing, io};
use std::env;
use std::path::PathBuf;

fn arg_value(name: &str) -> Option<String> {
    env::args()
        .position(|a| a == name)
        .and_then(|i| env::args().nth(i + 1))
}

fn main() -> Result<()> {
    init_tracing("reconciliation_engine=info,settings_loader=info");

    let records = arg_value("--records").unwrap_or("records.json".to_string());
    let settings = arg_value("--settings").map(PathBuf::from);
    let out = arg_value("--out").unwrap_or("report/report.json".to_string());
    let pretty = env::args().any(|a| a == "--pretty");

    let records_path = PathBuf::from(&records);
    let out_path = PathBuf::from(&out);

    tracing::info!(
        records = %records_path.display(),
        settings = ?settings,
        output = %out_path.display(),
        "Generating reconciliation report"
    );

    let settings = settings_loader::load_settings_or_default(settings.as_ref())
        .context("load settings")?;
    let records = io::load_records(&records_path).context("load records")?;
    let report = build_report(&records, &settings);
    io::write_report(&report, &out_path, pretty).context("write report")?;

    if let Some(latest) = &report.summary.latest {
        tracing::info!(
            month = %latest.month,
            actual = latest.actual_assets,
            discrepancy = latest.discrepancy,
            achievement = latest.achievement_rate,
            "Latest month"
        );
    }
    println!("Done. Generated at {}", report.metadata.generated_at);
    Ok(())
}
