use models::{AssetBreakdown, ExtraItem, MonthlyRecord};

pub fn sum_items(items: &[ExtraItem]) -> f64 {
    items.iter().map(|i| i.value).sum()
}

/// Hand salary + side income + retained provident + extra income items.
pub fn total_income(r: &MonthlyRecord) -> f64 {
    r.income_hand + r.income_side + r.income_provident + sum_items(&r.extra_income)
}

/// Fixed expense fields (the daily budget included) + extra expense items.
pub fn total_expense(r: &MonthlyRecord) -> f64 {
    r.exp_rent + r.exp_credit_card + r.exp_bai_tiao + r.exp_huabei + r.exp_daily
        + sum_items(&r.extra_expenses)
}

/// Cash income that counts towards the cash goal: side income is excluded.
pub fn cash_income(r: &MonthlyRecord) -> f64 {
    r.income_hand + sum_items(&r.extra_income)
}

pub fn asset_breakdown(r: &MonthlyRecord) -> AssetBreakdown {
    AssetBreakdown {
        provident: r.balance_provident,
        investments: r.balance_investments,
        liquid: r.balance_liquid,
        lent: r.balance_lent,
    }
}

pub fn actual_assets(r: &MonthlyRecord) -> f64 {
    asset_breakdown(r).total()
}
