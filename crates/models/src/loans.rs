//! Global ledger of money lent out.
//!
//! Monthly records carry their own copy of the outstanding loans (`lentItems`),
//! so editing the ledger never rewrites history.

use chrono::Local;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::{lenient_number_or_zero, lenient_string, lenient_text};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoanStatus {
    #[default]
    Unpaid,
    /// Declared by the data model; no ledger operation produces it.
    Partial,
    Paid,
}

impl LoanStatus {
    /// Case-insensitive; anything unrecognised is treated as still owed.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_uppercase().as_str() {
            "PAID" => LoanStatus::Paid,
            "PARTIAL" => LoanStatus::Partial,
            _ => LoanStatus::Unpaid,
        }
    }
}

fn lenient_status<'de, D>(deserializer: D) -> Result<LoanStatus, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_text(deserializer)?
        .map(|label| LoanStatus::from_label(&label))
        .unwrap_or_default())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub borrower: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub date: String,
    #[serde(default, deserialize_with = "lenient_number_or_zero")]
    pub amount: f64,
    #[serde(default, deserialize_with = "lenient_status")]
    pub status: LoanStatus,
    #[serde(default, deserialize_with = "lenient_number_or_zero")]
    pub repaid_amount: f64,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub notes: Option<String>,
}

impl LoanRecord {
    pub fn outstanding(&self) -> f64 {
        if self.status == LoanStatus::Paid {
            0.0
        } else {
            self.amount - self.repaid_amount
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum LedgerError {
    #[error("Borrower name is required")]
    MissingBorrower,

    #[error("Loan amount must be a positive number, got {0}")]
    InvalidAmount(f64),

    #[error("Loan not found: {0}")]
    LoanNotFound(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoanLedger {
    loans: Vec<LoanRecord>,
}

impl LoanLedger {
    pub fn new(loans: Vec<LoanRecord>) -> Self {
        Self { loans }
    }

    pub fn loans(&self) -> &[LoanRecord] {
        &self.loans
    }

    pub fn into_loans(self) -> Vec<LoanRecord> {
        self.loans
    }

    /// Records a new unpaid loan. `date` defaults to today (`YYYY-MM-DD`).
    pub fn add(
        &mut self,
        borrower: &str,
        amount: f64,
        date: Option<&str>,
        notes: Option<&str>,
    ) -> Result<&LoanRecord, LedgerError> {
        let borrower = borrower.trim();
        if borrower.is_empty() {
            return Err(LedgerError::MissingBorrower);
        }
        if !amount.is_finite() || amount <= 0.0 {
            return Err(LedgerError::InvalidAmount(amount));
        }
        let date = date
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| Local::now().format("%Y-%m-%d").to_string());

        self.loans.push(LoanRecord {
            id: Uuid::new_v4().to_string(),
            borrower: borrower.to_string(),
            date,
            amount,
            status: LoanStatus::Unpaid,
            repaid_amount: 0.0,
            notes: notes.map(str::to_string).filter(|n| !n.is_empty()),
        });
        Ok(&self.loans[self.loans.len() - 1])
    }

    pub fn remove(&mut self, id: &str) -> Result<LoanRecord, LedgerError> {
        let pos = self
            .loans
            .iter()
            .position(|l| l.id == id)
            .ok_or_else(|| LedgerError::LoanNotFound(id.to_string()))?;
        Ok(self.loans.remove(pos))
    }

    /// Binary toggle: PAID goes back to UNPAID with nothing repaid, anything else becomes PAID in full.
    pub fn toggle_status(&mut self, id: &str) -> Result<LoanStatus, LedgerError> {
        let loan = self
            .loans
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or_else(|| LedgerError::LoanNotFound(id.to_string()))?;
        if loan.status == LoanStatus::Paid {
            loan.status = LoanStatus::Unpaid;
            loan.repaid_amount = 0.0;
        } else {
            loan.status = LoanStatus::Paid;
            loan.repaid_amount = loan.amount;
        }
        Ok(loan.status)
    }

    pub fn total_lent(&self) -> f64 {
        self.loans.iter().map(|l| l.amount).sum()
    }

    pub fn total_outstanding(&self) -> f64 {
        self.loans.iter().map(LoanRecord::outstanding).sum()
    }

    /// Copies of the unpaid loans, for seeding a new month's `lentItems`.
    pub fn outstanding_snapshot(&self) -> Vec<LoanRecord> {
        self.loans
            .iter()
            .filter(|l| l.status == LoanStatus::Unpaid)
            .cloned()
            .collect()
    }
}
