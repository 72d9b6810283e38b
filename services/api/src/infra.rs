use std::fs;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use bankability::diagnostic::FormValues;
use bankability::error::AppError;
use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

/// Load a flat form export (field name to value) from disk.
pub(crate) fn read_form(path: &Path) -> Result<FormValues, AppError> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_reports_the_raw_value() {
        let err = parse_date("2025-13-01").expect_err("month out of range");
        assert!(err.contains("2025-13-01"));
        assert_eq!(
            parse_date(" 2025-01-05 "),
            Ok(NaiveDate::from_ymd_opt(2025, 1, 5).expect("valid date"))
        );
    }

    #[test]
    fn read_form_rejects_non_object_payloads() {
        let path = std::env::temp_dir().join(format!(
            "bankability-form-{}.json",
            std::process::id()
        ));
        fs::write(&path, "[1, 2, 3]").expect("temp file writable");

        let result = read_form(&path);
        let _ = fs::remove_file(&path);

        assert!(matches!(result, Err(AppError::InvalidForm(_))));
    }

    #[test]
    fn read_form_surfaces_missing_files() {
        let result = read_form(Path::new("/nonexistent/bankability/form.json"));
        assert!(matches!(result, Err(AppError::Io(_))));
    }
}
