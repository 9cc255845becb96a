use serde::{Deserialize, Serialize};
use std::fmt;

/// Approval status of a bill
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BillStatus {
    #[default]
    Pending,
    Accepted,
    Refused,
}

impl fmt::Display for BillStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BillStatus::Pending => write!(f, "pending"),
            BillStatus::Accepted => write!(f, "accepted"),
            BillStatus::Refused => write!(f, "refused"),
        }
    }
}

/// A bill record as stored by the remote API.
///
/// List results may be partial, so everything but the id tolerates absence.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(rename = "type", default)]
    pub expense_type: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub amount: i64,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub vat: String,
    #[serde(default)]
    pub pct: i64,
    #[serde(default)]
    pub commentary: Option<String>,
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub status: BillStatus,
}

/// A bill prepared for display
#[derive(Debug, Clone, PartialEq)]
pub struct FormattedBill {
    pub id: String,
    pub expense_type: String,
    pub name: String,
    pub amount: i64,
    /// Human-readable date, or the raw value when it could not be parsed
    pub date: String,
    /// Raw date as stored, kept for sorting
    pub row_date: String,
    pub vat: String,
    pub pct: i64,
    pub commentary: Option<String>,
    pub file_url: Option<String>,
    pub file_name: Option<String>,
    pub status: BillStatus,
    pub status_label: String,
}

impl FormattedBill {
    pub fn new(bill: Bill, date: String, status_label: String) -> Self {
        Self {
            row_date: bill.date,
            date,
            id: bill.id,
            expense_type: bill.expense_type,
            name: bill.name,
            amount: bill.amount,
            vat: bill.vat,
            pct: bill.pct,
            commentary: bill.commentary,
            file_url: bill.file_url,
            file_name: bill.file_name,
            status: bill.status,
            status_label,
        }
    }
}

/// JSON body sent when completing a bill after its receipt was uploaded.
///
/// Field order matches what the server stores.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewBillRecord {
    #[serde(rename = "type")]
    pub expense_type: String,
    pub name: String,
    pub amount: i64,
    pub date: String,
    pub vat: String,
    pub pct: i64,
    pub commentary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    pub status: BillStatus,
}
