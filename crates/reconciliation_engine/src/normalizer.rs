//! Raw record -> computation-ready record.
//!
//! Nothing here fails: absent numbers become 0 and absent lists become empty,
//! because historical months are typed in by hand and are often partial.

use models::{MonthlyRecord, RawMonthlyRecord};

pub fn normalize_record(raw: RawMonthlyRecord) -> MonthlyRecord {
    let num = |v: Option<f64>| v.filter(|n| n.is_finite()).unwrap_or(0.0);

    MonthlyRecord {
        id: raw.id,
        month: raw.month.trim().to_string(),
        record_date: raw.record_date,

        // Goal snapshot keeps "unset" distinct from an explicit zero
        target_provident: raw.target_provident.filter(|n| n.is_finite()),
        target_cash: raw.target_cash.filter(|n| n.is_finite()),

        income_hand: num(raw.income_hand),
        income_provident: num(raw.income_provident),
        income_side: num(raw.income_side),
        side_income_detail: raw.side_income_detail.unwrap_or_default(),
        extra_income: raw.extra_income.unwrap_or_default(),

        exp_rent: num(raw.exp_rent),
        exp_credit_card: num(raw.exp_credit_card),
        exp_bai_tiao: num(raw.exp_bai_tiao),
        exp_huabei: num(raw.exp_huabei),
        exp_daily: num(raw.exp_daily),
        extra_expenses: raw.extra_expenses.unwrap_or_default(),

        balance_provident: num(raw.balance_provident),
        balance_investments: num(raw.balance_investments),
        balance_liquid: num(raw.balance_liquid),
        balance_lent: num(raw.balance_lent),
        liquid_assets: raw.liquid_assets.unwrap_or_default(),
        lent_items: raw.lent_items.unwrap_or_default(),

        note: raw.note.unwrap_or_default(),
    }
}

pub fn normalize_records(raw: Vec<RawMonthlyRecord>) -> Vec<MonthlyRecord> {
    raw.into_iter().map(normalize_record).collect()
}
