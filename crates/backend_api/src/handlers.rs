use axum::{extract::rejection::JsonRejection, extract::State, response::IntoResponse, Json};
use models::{AppSettings, ComputedMetrics, RawMonthlyRecord, ReconciliationReport};
use reconciliation_engine::{build_report, normalize_records, reconcile, report};
use serde::Deserialize;
use std::sync::Arc;

use crate::Result;

/// Settings applied when a request does not carry its own.
pub type SettingsState = Arc<AppSettings>;

/// Body of both reconcile endpoints
#[derive(Debug, Deserialize)]
pub struct ReconcileRequest {
    #[serde(default)]
    pub records: Vec<RawMonthlyRecord>,
    #[serde(default)]
    pub settings: Option<AppSettings>,
}

fn split_request(req: ReconcileRequest, defaults: &AppSettings) -> (Vec<models::MonthlyRecord>, AppSettings) {
    let settings = req.settings.unwrap_or_else(|| defaults.clone());
    (normalize_records(req.records), settings)
}

/// POST /api/reconcile
/// Returns the full report: every month's metrics plus the summary
pub async fn reconcile_records(
    State(defaults): State<SettingsState>,
    payload: std::result::Result<Json<ReconcileRequest>, JsonRejection>,
) -> Result<Json<ReconciliationReport>> {
    let Json(req) = payload?;
    let (records, settings) = split_request(req, &defaults);
    tracing::debug!(records = records.len(), "reconcile request");
    Ok(Json(build_report(&records, &settings)))
}

/// POST /api/reconcile/latest
/// Returns only the most recent month's metrics
pub async fn reconcile_latest(
    State(defaults): State<SettingsState>,
    payload: std::result::Result<Json<ReconcileRequest>, JsonRejection>,
) -> Result<Json<ComputedMetrics>> {
    let Json(req) = payload?;
    let (records, settings) = split_request(req, &defaults);
    let series = reconcile(&records, &settings);
    let latest = report::latest(&series)?.clone();
    Ok(Json(latest))
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "net-worth-reconciliation-api"
    }))
}
