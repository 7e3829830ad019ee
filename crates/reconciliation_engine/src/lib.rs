//! Reconciliation & goal evaluation for monthly net-worth snapshots.
//!
//! One pure entry point, [`reconcile`], turns the full record list plus the
//! settings into per-month metrics (actual vs. theoretical assets, goal checks,
//! gap-fill credit). Every surface calls it; none re-derives the formulas.

pub mod engine;
pub mod error;
pub mod flows;
pub mod gap_fill;
pub mod goals;
pub mod io;
pub mod normalizer;
pub mod report;

pub use engine::{reconcile, reconcile_raw, sort_chronologically};
pub use error::{EngineError, Result};
pub use flows::{actual_assets, cash_income, sum_items, total_expense, total_income};
pub use gap_fill::{gap_fill, GapFill, MonthKey};
pub use goals::{evaluate_goals, GoalEvaluation, GoalTargets};
pub use normalizer::{normalize_record, normalize_records};
pub use report::{build_report, summarize, trailing};

/// Installs the fmt subscriber used by the binaries; `RUST_LOG` overrides `default_filter`.
pub fn init_tracing(default_filter: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .try_init();
}
