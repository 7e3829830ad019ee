use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use models::{MonthlyRecord, RawMonthlyRecord, ReconciliationReport};

use crate::normalizer::normalize_records;

/// Reads a JSON array of (possibly partial) monthly records and normalizes them.
pub fn load_records(path: &Path) -> Result<Vec<MonthlyRecord>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Reading records file: {}", path.display()))?;
    let records: Vec<RawMonthlyRecord> = serde_json::from_str(&raw)
        .with_context(|| format!("Parsing records JSON in {}", path.display()))?;
    Ok(normalize_records(records))
}

pub fn write_report(report: &ReconciliationReport, out_path: &Path, pretty: bool) -> Result<()> {
    if let Some(parent) = out_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Creating output dir: {}", parent.display()))?;
        }
    }
    let json = if pretty {
        serde_json::to_string_pretty(report)?
    } else {
        serde_json::to_string(report)?
    };
    fs::write(out_path, json)
        .with_context(|| format!("Writing output file: {}", out_path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::build_report;
    use models::AppSettings;

    #[test]
    fn test_load_and_write_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let records_path = dir.path().join("records.json");
        fs::write(
            &records_path,
            r#"[
                { "id": "rec_002", "month": "2024-01", "balanceLiquid": 1200, "incomeHand": 100 },
                { "id": "rec_001", "month": "2023-12", "balanceLiquid": 1000 }
            ]"#,
        )
        .unwrap();

        let records = load_records(&records_path).unwrap();
        assert_eq!(records.len(), 2);

        let report = build_report(&records, &AppSettings::default());
        let out_path = dir.path().join("out").join("report.json");
        write_report(&report, &out_path, true).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&out_path).unwrap()).unwrap();
        assert_eq!(written["months"][0]["month"], "2023-12");
        assert_eq!(written["months"][1]["theoreticalAssets"], 1100.0);
        assert_eq!(written["summary"]["monthsCount"], 2);
    }

    #[test]
    fn test_load_records_reports_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.json");
        fs::write(&path, "{}").unwrap();
        let err = load_records(&path).unwrap_err();
        assert!(err.to_string().contains("Parsing records JSON"));
    }
}
