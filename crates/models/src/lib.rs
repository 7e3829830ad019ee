
use serde::{Deserialize, Deserializer, Serialize};

pub mod loans;

pub use loans::{LedgerError, LoanLedger, LoanRecord, LoanStatus};

// Tolerance used when comparing a derived scalar against the sum of its list
pub const INVARIANT_TOLERANCE: f64 = 0.005;

// Lenient numeric coercion: numbers, numeric strings, null, anything else -> absent
#[derive(Deserialize)]
#[serde(untagged)]
enum LenientNumber {
	Number(f64),
	Text(String),
	Other(serde::de::IgnoredAny),
}

impl LenientNumber {
	fn into_f64(self) -> Option<f64> {
		let value = match self {
			LenientNumber::Number(n) => n,
			LenientNumber::Text(s) => s.trim().replace(',', "").parse::<f64>().ok()?,
			LenientNumber::Other(_) => return None,
		};
		value.is_finite().then_some(value)
	}
}

pub fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
	D: Deserializer<'de>,
{
	let raw = Option::<LenientNumber>::deserialize(deserializer)?;
	Ok(raw.and_then(LenientNumber::into_f64))
}

pub fn lenient_number_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(lenient_number(deserializer)?.unwrap_or(0.0))
}

// Lenient text: strings as-is, integers stringified, null or anything else -> absent
#[derive(Deserialize)]
#[serde(untagged)]
enum LenientText {
	Text(String),
	Integer(i64),
	Other(serde::de::IgnoredAny),
}

pub fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
	D: Deserializer<'de>,
{
	let raw = Option::<LenientText>::deserialize(deserializer)?;
	Ok(raw.and_then(|t| match t {
		LenientText::Text(s) => Some(s),
		LenientText::Integer(n) => Some(n.to_string()),
		LenientText::Other(_) => None,
	}))
}

pub fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(lenient_text(deserializer)?.unwrap_or_default())
}

// Named line items
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtraItem {
	#[serde(default, deserialize_with = "lenient_string")]
	pub id: String,
	#[serde(default, deserialize_with = "lenient_string")]
	pub name: String,
	#[serde(default, deserialize_with = "lenient_number_or_zero")]
	pub value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LiquidAssetItem {
	#[serde(default, deserialize_with = "lenient_string")]
	pub id: String,
	#[serde(default, deserialize_with = "lenient_string")]
	pub name: String,
	#[serde(default, deserialize_with = "lenient_number_or_zero")]
	pub amount: f64,
}

// Settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
	/// Gross monthly provident contribution (company + personal).
	pub monthly_provident_goal: f64,
	/// Amount assumed to be withdrawn to cash every month.
	pub auto_provident_withdrawal: f64,
	pub monthly_cash_goal: f64,
	pub auto_fill_missing_months: bool,
}

impl Default for AppSettings {
	fn default() -> Self {
		Self {
			monthly_provident_goal: 5000.0,
			auto_provident_withdrawal: 2000.0,
			monthly_cash_goal: 10000.0,
			auto_fill_missing_months: false,
		}
	}
}

impl AppSettings {
	/// Provident goal net of the automatic withdrawal, never negative.
	pub fn net_provident_goal(&self) -> f64 {
		(self.monthly_provident_goal - self.auto_provident_withdrawal).max(0.0)
	}
}

// Raw input record, as handed over by the entry/persistence side
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMonthlyRecord {
	#[serde(default, deserialize_with = "lenient_string")]
	pub id: String,
	#[serde(default, deserialize_with = "lenient_string")]
	pub month: String,
	#[serde(default, deserialize_with = "lenient_string")]
	pub record_date: String,

	#[serde(default, deserialize_with = "lenient_number")]
	pub target_provident: Option<f64>,
	#[serde(default, deserialize_with = "lenient_number")]
	pub target_cash: Option<f64>,

	#[serde(default, deserialize_with = "lenient_number")]
	pub income_hand: Option<f64>,
	#[serde(default, deserialize_with = "lenient_number")]
	pub income_provident: Option<f64>,
	#[serde(default, deserialize_with = "lenient_number")]
	pub income_side: Option<f64>,
	#[serde(default)]
	pub side_income_detail: Option<Vec<ExtraItem>>,
	#[serde(default)]
	pub extra_income: Option<Vec<ExtraItem>>,

	#[serde(default, deserialize_with = "lenient_number")]
	pub exp_rent: Option<f64>,
	#[serde(default, deserialize_with = "lenient_number")]
	pub exp_credit_card: Option<f64>,
	#[serde(default, deserialize_with = "lenient_number")]
	pub exp_bai_tiao: Option<f64>,
	#[serde(default, deserialize_with = "lenient_number")]
	pub exp_huabei: Option<f64>,
	#[serde(default, deserialize_with = "lenient_number")]
	pub exp_daily: Option<f64>,
	#[serde(default)]
	pub extra_expenses: Option<Vec<ExtraItem>>,

	#[serde(default, deserialize_with = "lenient_number")]
	pub balance_provident: Option<f64>,
	#[serde(default, deserialize_with = "lenient_number")]
	pub balance_investments: Option<f64>,
	#[serde(default, deserialize_with = "lenient_number")]
	pub balance_liquid: Option<f64>,
	#[serde(default, deserialize_with = "lenient_number")]
	pub balance_lent: Option<f64>,
	#[serde(default)]
	pub liquid_assets: Option<Vec<LiquidAssetItem>>,
	#[serde(default)]
	pub lent_items: Option<Vec<LoanRecord>>,

	#[serde(default, deserialize_with = "lenient_text")]
	pub note: Option<String>,
}

/// One calendar month snapshot, computation-ready: every list present, every flow a number.
///
/// `target_provident` / `target_cash` are the goal snapshot taken at entry time.
/// `None` means "not set, use the settings default"; `Some(0.0)` is an explicit zero goal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MonthlyRecord {
	pub id: String,
	pub month: String,
	pub record_date: String,

	#[serde(skip_serializing_if = "Option::is_none")]
	pub target_provident: Option<f64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub target_cash: Option<f64>,

	pub income_hand: f64,
	pub income_provident: f64,
	pub income_side: f64,
	pub side_income_detail: Vec<ExtraItem>,
	pub extra_income: Vec<ExtraItem>,

	pub exp_rent: f64,
	pub exp_credit_card: f64,
	pub exp_bai_tiao: f64,
	pub exp_huabei: f64,
	pub exp_daily: f64,
	pub extra_expenses: Vec<ExtraItem>,

	pub balance_provident: f64,
	pub balance_investments: f64,
	pub balance_liquid: f64,
	pub balance_lent: f64,
	pub liquid_assets: Vec<LiquidAssetItem>,
	pub lent_items: Vec<LoanRecord>,

	pub note: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvariantViolation {
	pub field: &'static str,
	pub recorded: f64,
	pub expected: f64,
}

impl std::fmt::Display for InvariantViolation {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			"{} is {:.2} but its line items sum to {:.2}",
			self.field, self.recorded, self.expected
		)
	}
}

fn sum_values(items: &[ExtraItem]) -> f64 {
	items.iter().map(|i| i.value).sum()
}

impl MonthlyRecord {
	pub fn liquid_assets_total(&self) -> f64 {
		self.liquid_assets.iter().map(|a| a.amount).sum()
	}

	pub fn lent_items_total(&self) -> f64 {
		self.lent_items.iter().map(|l| l.amount).sum()
	}

	/// Brings the derived scalars back in line with the lists they are computed from.
	pub fn synchronize_derived(&mut self) {
		self.balance_liquid = self.liquid_assets_total();
		self.balance_lent = self.lent_items_total();
		if !self.side_income_detail.is_empty() {
			self.income_side = sum_values(&self.side_income_detail);
		}
	}

	pub fn invariant_violations(&self) -> Vec<InvariantViolation> {
		let mut out = Vec::new();
		let mut check = |field: &'static str, recorded: f64, expected: f64| {
			if (recorded - expected).abs() > INVARIANT_TOLERANCE {
				out.push(InvariantViolation {
					field,
					recorded,
					expected,
				});
			}
		};
		check("balanceLiquid", self.balance_liquid, self.liquid_assets_total());
		check("balanceLent", self.balance_lent, self.lent_items_total());
		if !self.side_income_detail.is_empty() {
			check("incomeSide", self.income_side, sum_values(&self.side_income_detail));
		}
		out
	}
}

// Record list edits (replace wholesale by id, delete by id)
pub fn upsert_record(records: &mut Vec<MonthlyRecord>, record: MonthlyRecord) {
	if let Some(existing) = records.iter_mut().find(|r| r.id == record.id) {
		*existing = record;
		return;
	}
	let pos = records.partition_point(|r| r.month <= record.month);
	records.insert(pos, record);
}

pub fn remove_record(records: &mut Vec<MonthlyRecord>, id: &str) -> bool {
	let before = records.len();
	records.retain(|r| r.id != id);
	records.len() != before
}

// Output models
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetBreakdown {
	pub provident: f64,
	pub investments: f64,
	pub liquid: f64,
	pub lent: f64,
}

impl AssetBreakdown {
	pub fn total(&self) -> f64 {
		self.provident + self.investments + self.liquid + self.lent
	}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalCheck {
	pub saved: f64,
	pub goal: f64,
	pub met: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputedMetrics {
	pub record_id: String,
	pub month: String,
	pub balances: AssetBreakdown,
	pub actual_assets: f64,
	pub theoretical_assets: f64,
	pub discrepancy: f64,
	pub total_income: f64,
	pub total_expense: f64,
	pub side_income: f64,
	/// Provident + cash + side income; the month's net worth growth from flows.
	pub total_saved_actual: f64,
	/// Provident + cash only; what counts towards the goals.
	pub savings_for_goal: f64,
	pub savings_rate: f64,
	pub provident: GoalCheck,
	pub cash: GoalCheck,
	pub total_goal: f64,
	pub achievement_rate: f64,
	pub is_goal_met: bool,
	/// Calendar months since the previous record, `None` for the first record or an unparsable month.
	pub months_since_previous: Option<i32>,
	pub gap_months_backfilled: u32,
	pub gap_fill_credit: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetSlice {
	pub name: String,
	pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyStats {
	pub year: i32,
	pub months_count: usize,
	pub total_income: f64,
	pub total_expenses: f64,
	pub total_savings: f64,
	pub average_save_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
	pub months_count: usize,
	pub cumulative_side_income: f64,
	pub months_goal_met: usize,
	pub latest: Option<ComputedMetrics>,
	pub previous: Option<ComputedMetrics>,
	pub asset_allocation: Vec<AssetSlice>,
	pub yearly_stats: Vec<YearlyStats>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
	pub generated_at: String,
	pub settings: AppSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationReport {
	pub metadata: ReportMetadata,
	pub summary: ReportSummary,
	pub months: Vec<ComputedMetrics>,
}
