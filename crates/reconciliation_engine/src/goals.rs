//! Provident and cash goals are checked independently and never offset each other.
//! Side income grows wealth but never counts as saving towards either goal.

use models::{AppSettings, GoalCheck, MonthlyRecord};

use crate::flows::{cash_income, total_expense};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoalTargets {
    pub provident: f64,
    pub cash: f64,
}

impl GoalTargets {
    /// The record's own goal snapshot where set, else the settings defaults.
    pub fn resolve(record: &MonthlyRecord, settings: &AppSettings) -> Self {
        Self {
            provident: record
                .target_provident
                .unwrap_or_else(|| settings.net_provident_goal()),
            cash: record.target_cash.unwrap_or(settings.monthly_cash_goal),
        }
    }

    pub fn combined(&self) -> f64 {
        self.provident + self.cash
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoalEvaluation {
    pub provident: GoalCheck,
    pub cash: GoalCheck,
    /// provident saved + cash saved (side income excluded)
    pub savings_for_goal: f64,
    /// savings_for_goal + side income
    pub total_saved_actual: f64,
    pub total_goal: f64,
    pub achievement_rate: f64,
}

impl GoalEvaluation {
    pub fn is_goal_met(&self) -> bool {
        self.provident.met && self.cash.met
    }
}

pub fn evaluate_goals(record: &MonthlyRecord, settings: &AppSettings) -> GoalEvaluation {
    let targets = GoalTargets::resolve(record, settings);

    let provident_saved = record.income_provident;
    let cash_saved = cash_income(record) - total_expense(record);

    let provident = GoalCheck {
        saved: provident_saved,
        goal: targets.provident,
        met: provident_saved >= targets.provident,
    };
    let cash = GoalCheck {
        saved: cash_saved,
        goal: targets.cash,
        met: cash_saved >= targets.cash,
    };

    let savings_for_goal = provident_saved + cash_saved;
    let total_goal = targets.combined();
    let achievement_rate = if total_goal > 0.0 {
        savings_for_goal / total_goal
    } else {
        0.0
    };

    GoalEvaluation {
        provident,
        cash,
        savings_for_goal,
        total_saved_actual: savings_for_goal + record.income_side,
        total_goal,
        achievement_rate,
    }
}
