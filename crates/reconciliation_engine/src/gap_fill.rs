//! Goal credit for calendar months with no record between two recorded months.
//!
//! Only additive goal credit is backfilled; balances of skipped months are never invented.

use std::fmt;
use std::str::FromStr;

use models::{AppSettings, MonthlyRecord};

use crate::error::{EngineError, Result};
use crate::goals::GoalTargets;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    /// Parses `YYYY-MM` (surrounding whitespace ignored).
    pub fn parse(s: &str) -> Result<Self> {
        let invalid = || EngineError::InvalidMonth(s.to_string());
        let (y, m) = s.trim().split_once('-').ok_or_else(invalid)?;
        let digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if y.len() != 4 || m.len() != 2 || !digits(y) || !digits(m) {
            return Err(invalid());
        }
        let year: i32 = y.parse().map_err(|_| invalid())?;
        let month: u32 = m.parse().map_err(|_| invalid())?;
        if !(1..=12).contains(&month) {
            return Err(invalid());
        }
        Ok(Self { year, month })
    }

    /// Signed number of calendar months from `self` to `later`.
    pub fn months_until(&self, later: MonthKey) -> i32 {
        (later.year - self.year) * 12 + (later.month as i32 - self.month as i32)
    }

    pub fn next(&self) -> MonthKey {
        if self.month == 12 {
            MonthKey { year: self.year + 1, month: 1 }
        } else {
            MonthKey { year: self.year, month: self.month + 1 }
        }
    }
}

impl FromStr for MonthKey {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        MonthKey::parse(s)
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GapFill {
    /// Calendar months from prev to curr; `None` when either month is unparsable.
    pub month_diff: Option<i32>,
    /// Months with no record between prev and curr.
    pub missing_months: u32,
    /// Months actually credited (0 when the policy is off).
    pub backfilled_months: u32,
    /// Combined goal assumed for each skipped month.
    pub monthly_goal: f64,
    pub credit: f64,
}

/// Credit for the months skipped between `prev` and `curr`.
///
/// Every skipped month is assumed to have met `curr`'s goal snapshot, since
/// skipped months have no goal of their own.
pub fn gap_fill(prev: &MonthlyRecord, curr: &MonthlyRecord, settings: &AppSettings) -> GapFill {
    let month_diff = match (MonthKey::parse(&prev.month), MonthKey::parse(&curr.month)) {
        (Ok(p), Ok(c)) => Some(p.months_until(c)),
        (Err(e), _) | (_, Err(e)) => {
            tracing::warn!(record_id = %curr.id, "{e}; gap filling skipped");
            None
        }
    };

    let missing_months = month_diff.map_or(0, |d| (d - 1).max(0) as u32);
    if missing_months == 0 || !settings.auto_fill_missing_months {
        return GapFill {
            month_diff,
            missing_months,
            ..Default::default()
        };
    }

    let monthly_goal = GoalTargets::resolve(curr, settings).combined();
    GapFill {
        month_diff,
        missing_months,
        backfilled_months: missing_months,
        monthly_goal,
        credit: missing_months as f64 * monthly_goal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(month: &str) -> MonthlyRecord {
        MonthlyRecord {
            id: format!("rec_{month}"),
            month: month.to_string(),
            ..Default::default()
        }
    }

    fn settings(auto_fill: bool) -> AppSettings {
        AppSettings {
            auto_fill_missing_months: auto_fill,
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_month_key() {
        assert_eq!(MonthKey::parse("2024-01").unwrap(), MonthKey { year: 2024, month: 1 });
        assert_eq!(MonthKey::parse(" 2023-12 ").unwrap().to_string(), "2023-12");
        assert!(MonthKey::parse("2024-13").is_err());
        assert!(MonthKey::parse("2024-00").is_err());
        assert!(MonthKey::parse("2024/01").is_err());
        assert!(MonthKey::parse("24-01").is_err());
        assert!(MonthKey::parse("+202-01").is_err());
        assert!(MonthKey::parse("2024-+1").is_err());
        assert_eq!(
            "bad".parse::<MonthKey>().unwrap_err(),
            EngineError::InvalidMonth("bad".into())
        );
    }

    #[test]
    fn test_months_until_crosses_years() {
        let dec = MonthKey::parse("2023-12").unwrap();
        let jan = MonthKey::parse("2024-01").unwrap();
        let mar = MonthKey::parse("2024-03").unwrap();
        assert_eq!(dec.months_until(jan), 1);
        assert_eq!(dec.months_until(mar), 3);
        assert_eq!(mar.months_until(dec), -3);
        assert_eq!(dec.next(), jan);
    }

    #[test]
    fn test_two_skipped_months_with_snapshot_goals() {
        let mut curr = rec("2024-03");
        curr.target_provident = Some(5000.0);
        curr.target_cash = Some(8000.0);
        let gap = gap_fill(&rec("2023-12"), &curr, &settings(true));

        assert_eq!(gap.month_diff, Some(3));
        assert_eq!(gap.missing_months, 2);
        assert_eq!(gap.backfilled_months, 2);
        assert_eq!(gap.monthly_goal, 13000.0);
        assert_eq!(gap.credit, 26000.0);
    }

    #[test]
    fn test_gap_uses_settings_defaults_when_unset() {
        let gap = gap_fill(&rec("2024-01"), &rec("2024-03"), &settings(true));
        assert_eq!(gap.monthly_goal, 3000.0 + 10000.0);
        assert_eq!(gap.credit, 13000.0);
    }

    #[test]
    fn test_disabled_policy_gives_no_credit() {
        let mut curr = rec("2024-03");
        curr.target_provident = Some(5000.0);
        curr.target_cash = Some(8000.0);
        let gap = gap_fill(&rec("2023-12"), &curr, &settings(false));

        assert_eq!(gap.month_diff, Some(3));
        assert_eq!(gap.missing_months, 2);
        assert_eq!(gap.backfilled_months, 0);
        assert_eq!(gap.credit, 0.0);
    }

    #[test]
    fn test_adjacent_and_duplicate_months_give_no_credit() {
        let s = settings(true);
        assert_eq!(gap_fill(&rec("2024-01"), &rec("2024-02"), &s).credit, 0.0);

        let dup = gap_fill(&rec("2024-02"), &rec("2024-02"), &s);
        assert_eq!(dup.month_diff, Some(0));
        assert_eq!(dup.missing_months, 0);
        assert_eq!(dup.credit, 0.0);
    }

    #[test]
    fn test_malformed_month_gives_no_credit() {
        let gap = gap_fill(&rec("2024-01"), &rec("March"), &settings(true));
        assert_eq!(gap.month_diff, None);
        assert_eq!(gap.backfilled_months, 0);
        assert_eq!(gap.credit, 0.0);
    }
}
