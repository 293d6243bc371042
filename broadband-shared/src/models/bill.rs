/// Customer bills
///
/// A bill belongs to one customer through `user_id`. The reference is not a
/// foreign key: bills may be created for any id, and ownership is only checked
/// when a customer pays.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE bill_status AS ENUM ('Due', 'Overdue', 'Paid');
///
/// CREATE TABLE bills (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL,
///     month TEXT NOT NULL,
///     amount DOUBLE PRECISION NOT NULL,
///     due_date TEXT NOT NULL,
///     status bill_status NOT NULL DEFAULT 'Due',
///     pdf_filename TEXT NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Payment state of a bill
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "bill_status")]
pub enum BillStatus {
    #[default]
    Due,
    Overdue,
    Paid,
}

impl BillStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillStatus::Due => "Due",
            BillStatus::Overdue => "Overdue",
            BillStatus::Paid => "Paid",
        }
    }

    /// True while the customer still owes the amount
    pub fn is_outstanding(&self) -> bool {
        matches!(self, BillStatus::Due | BillStatus::Overdue)
    }
}

impl fmt::Display for BillStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stored bill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Bill {
    pub id: Uuid,

    /// Owning customer
    pub user_id: Uuid,

    /// Billing period label, e.g. "November 2024"
    pub month: String,

    pub amount: f64,

    /// Due date as entered by billing, e.g. "2024-12-05"
    pub due_date: String,

    pub status: BillStatus,

    /// Invoice artifact name derived from `month`
    pub pdf_filename: String,

    pub created_at: DateTime<Utc>,
}

/// Input for inserting a bill
#[derive(Debug, Clone)]
pub struct CreateBill {
    pub user_id: Uuid,
    pub month: String,
    pub amount: f64,
    pub due_date: String,
    pub status: BillStatus,
    pub pdf_filename: String,
}

/// Derives the invoice filename for a billing month
///
/// Spaces become underscores and the result is lowercased.
///
/// ```
/// use broadband_shared::models::bill::invoice_filename;
///
/// assert_eq!(invoice_filename("November 2024"), "invoice_november_2024.pdf");
/// ```
pub fn invoice_filename(month: &str) -> String {
    format!("invoice_{}.pdf", month.replace(' ', "_").to_lowercase())
}
