//! # Settings Loader
//!
//! Centralized loading of the goal settings (`AppSettings`) shared by every
//! surface of the net-worth tracker: the report generator, the CLI tools and
//! the API server all read the same `settings.json`.
//!
//! Keys missing from the file fall back to the built-in defaults
//! (provident goal 5000, withdrawal 2000, cash goal 10000, gap filling off).
//!
//! ## Usage Examples
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//!
//! // Load settings from a specific path
//! let settings = settings_loader::load_settings("config/settings.json")?;
//!
//! // Load optional settings, falling back to defaults when no file is found
//! let path = Some(PathBuf::from("settings.json"));
//! let settings = settings_loader::load_settings_or_default(path.as_ref())?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use models::AppSettings;

pub const DEFAULT_SETTINGS_FILE: &str = "settings.json";

/// Loads settings from a JSON file
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<AppSettings> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Reading settings file: {}", path.display()))?;
    let settings: AppSettings = serde_json::from_str(&raw)
        .with_context(|| format!("Parsing settings JSON in {}", path.display()))?;
    Ok(settings)
}

/// Loads settings from the default location (settings.json in the current directory)
pub fn load_default_settings() -> Result<AppSettings> {
    load_settings(DEFAULT_SETTINGS_FILE)
}

/// Loads settings from an optional path, returning None if no path is provided
pub fn load_optional_settings(path: Option<&PathBuf>) -> Result<Option<AppSettings>> {
    match path {
        Some(settings_path) => Ok(Some(load_settings(settings_path)?)),
        None => Ok(None),
    }
}

/// Loads the given file if any, else `settings.json` if present, else the built-in defaults.
///
/// An explicitly given path that fails to load is an error; only the implicit
/// default location is allowed to be absent.
pub fn load_settings_or_default(path: Option<&PathBuf>) -> Result<AppSettings> {
    if let Some(settings) = load_optional_settings(path)? {
        return Ok(settings);
    }
    if default_settings_exist() {
        return load_default_settings();
    }
    tracing::warn!(
        "No {} found, using built-in goal defaults",
        DEFAULT_SETTINGS_FILE
    );
    Ok(AppSettings::default())
}

/// Checks if a settings file exists at the given path
pub fn settings_file_exists<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref().exists() && path.as_ref().is_file()
}

/// Checks if the default settings file (settings.json) exists
pub fn default_settings_exist() -> bool {
    settings_file_exists(DEFAULT_SETTINGS_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_settings_from_file() {
        let file = write_temp(
            r#"{
                "monthlyProvidentGoal": 7876,
                "autoProvidentWithdrawal": 2000,
                "monthlyCashGoal": 12000,
                "autoFillMissingMonths": true
            }"#,
        );
        let settings = load_settings(file.path()).unwrap();
        assert_eq!(settings.monthly_provident_goal, 7876.0);
        assert_eq!(settings.monthly_cash_goal, 12000.0);
        assert!(settings.auto_fill_missing_months);
        assert_eq!(settings.net_provident_goal(), 5876.0);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let file = write_temp(r#"{ "autoFillMissingMonths": true }"#);
        let settings = load_settings(file.path()).unwrap();
        assert!(settings.auto_fill_missing_months);
        assert_eq!(settings.monthly_cash_goal, 10000.0);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let file = write_temp("{ not json");
        let err = load_settings(file.path()).unwrap_err();
        assert!(err.to_string().contains("Parsing settings JSON"));
    }

    #[test]
    fn test_explicit_missing_path_is_an_error() {
        let path = PathBuf::from("does/not/exist/settings.json");
        assert!(load_settings_or_default(Some(&path)).is_err());
        assert!(!settings_file_exists(&path));
    }

    #[test]
    fn test_optional_settings_none() {
        assert!(load_optional_settings(None).unwrap().is_none());
    }
}
