//! Command structs for engine write operations.
//!
//! These types group parameters for creates and updates, keeping call sites
//! readable and avoiding long argument lists. Category fields carry the
//! *name* typed by the user; the engine resolves or provisions the matching
//! category row on write.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::{ExpenseStatus, IncomeStatus, InstallmentStatus};

/// Create an income.
#[derive(Clone, Debug)]
pub struct NewIncome {
    pub name: String,
    pub amount_cents: i64,
    pub received_at: DateTime<Utc>,
    pub status: IncomeStatus,
    pub user_id: Uuid,
    pub category: String,
    pub category_color: Option<String>,
    pub payment_method_id: Uuid,
}

/// Update an income; `None` fields are left untouched.
#[derive(Clone, Debug, Default)]
pub struct UpdateIncome {
    pub name: Option<String>,
    pub amount_cents: Option<i64>,
    pub received_at: Option<DateTime<Utc>>,
    pub status: Option<IncomeStatus>,
    pub category: Option<String>,
    pub payment_method_id: Option<Uuid>,
}

/// Create an expense, optionally split into installments.
///
/// `installments_count` of 1 or `None` produces a plain expense with no
/// installment rows; values above 1 generate the dated batch in the same
/// database transaction. `first_due_date` defaults to the day of `spent_at`.
#[derive(Clone, Debug)]
pub struct NewExpense {
    pub name: String,
    pub amount_cents: i64,
    pub spent_at: DateTime<Utc>,
    pub status: ExpenseStatus,
    pub user_id: Uuid,
    pub category: String,
    pub category_color: Option<String>,
    pub payment_method_id: Uuid,
    pub installments_count: Option<u32>,
    pub first_due_date: Option<NaiveDate>,
}

/// Update an expense; `None` fields are left untouched.
///
/// The installment batch is never regenerated here; individual rows are
/// edited through [`UpdateInstallment`].
#[derive(Clone, Debug, Default)]
pub struct UpdateExpense {
    pub name: Option<String>,
    pub amount_cents: Option<i64>,
    pub spent_at: Option<DateTime<Utc>>,
    pub status: Option<ExpenseStatus>,
    pub category: Option<String>,
    pub payment_method_id: Option<Uuid>,
}

/// Patch a single installment row.
#[derive(Clone, Copy, Debug, Default)]
pub struct UpdateInstallment {
    pub status: Option<InstallmentStatus>,
    pub due_date: Option<NaiveDate>,
}

/// Create an investment.
#[derive(Clone, Debug)]
pub struct NewInvestment {
    pub notes: Option<String>,
    pub amount_cents: i64,
    pub invested_at: DateTime<Utc>,
    pub user_id: Uuid,
    pub category: String,
    pub category_color: Option<String>,
}

/// Update an investment; `None` fields are left untouched.
#[derive(Clone, Debug, Default)]
pub struct UpdateInvestment {
    pub notes: Option<String>,
    pub amount_cents: Option<i64>,
    pub invested_at: Option<DateTime<Utc>>,
    pub category: Option<String>,
}
