//! Wire types shared by the REST server and its clients.
//!
//! Timestamps travel as RFC3339 with an explicit offset (local user time);
//! the server converts to UTC at the boundary. Monetary values are integer
//! cents. Enum spellings on the wire are UPPERCASE.

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod user {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserNew {
        pub name: String,
        pub email: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserUpdate {
        pub name: Option<String>,
        pub email: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserView {
        pub id: Uuid,
        pub name: String,
        pub email: String,
        pub created_at: DateTime<FixedOffset>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserCreated {
        pub id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserListResponse {
        pub users: Vec<UserView>,
    }
}

pub mod category {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "UPPERCASE")]
    pub enum CategoryKind {
        Income,
        Expense,
        Investment,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryNew {
        pub name: String,
        pub kind: CategoryKind,
        pub color: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryUpdate {
        pub name: Option<String>,
        pub color: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryView {
        pub id: Uuid,
        pub name: String,
        pub kind: CategoryKind,
        pub color: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryCreated {
        pub id: Uuid,
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryListResponse {
        pub categories: Vec<CategoryView>,
    }
}

pub mod payment_method {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PaymentMethodNew {
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PaymentMethodUpdate {
        pub name: Option<String>,
        pub is_active: Option<bool>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PaymentMethodView {
        pub id: Uuid,
        pub name: String,
        pub is_active: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PaymentMethodCreated {
        pub id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PaymentMethodListResponse {
        pub payment_methods: Vec<PaymentMethodView>,
    }
}

pub mod income {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "UPPERCASE")]
    pub enum IncomeStatus {
        Received,
        Pending,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct IncomeNew {
        pub name: String,
        pub amount_cents: i64,
        /// RFC3339 timestamp, including timezone offset (local user time).
        pub received_at: DateTime<FixedOffset>,
        pub status: IncomeStatus,
        pub user_id: Uuid,
        /// Category name; the matching row is created on the fly if needed.
        pub category: String,
        pub category_color: Option<String>,
        pub payment_method_id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct IncomeUpdate {
        pub name: Option<String>,
        pub amount_cents: Option<i64>,
        pub received_at: Option<DateTime<FixedOffset>>,
        pub status: Option<IncomeStatus>,
        pub category: Option<String>,
        pub payment_method_id: Option<Uuid>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct IncomeView {
        pub id: Uuid,
        pub name: String,
        pub amount_cents: i64,
        pub received_at: DateTime<FixedOffset>,
        pub status: IncomeStatus,
        pub user_id: Uuid,
        pub category_id: Uuid,
        pub payment_method_id: Uuid,
        pub created_at: DateTime<FixedOffset>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct IncomeCreated {
        pub id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct IncomeListResponse {
        pub incomes: Vec<IncomeView>,
    }
}

pub mod expense {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "UPPERCASE")]
    pub enum ExpenseStatus {
        Paid,
        Pending,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "UPPERCASE")]
    pub enum InstallmentStatus {
        Pending,
        Paid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseNew {
        pub name: String,
        pub amount_cents: i64,
        /// RFC3339 timestamp, including timezone offset (local user time).
        pub spent_at: DateTime<FixedOffset>,
        pub status: ExpenseStatus,
        pub user_id: Uuid,
        /// Category name; the matching row is created on the fly if needed.
        pub category: String,
        pub category_color: Option<String>,
        pub payment_method_id: Uuid,
        /// Split into this many installments when > 1; 1 or absent keeps the
        /// expense as a single payment without installment rows.
        pub installments_count: Option<u32>,
        /// First installment due date; defaults to the day of `spent_at`.
        pub first_due_date: Option<NaiveDate>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseUpdate {
        pub name: Option<String>,
        pub amount_cents: Option<i64>,
        pub spent_at: Option<DateTime<FixedOffset>>,
        pub status: Option<ExpenseStatus>,
        pub category: Option<String>,
        pub payment_method_id: Option<Uuid>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct InstallmentUpdate {
        pub status: Option<InstallmentStatus>,
        pub due_date: Option<NaiveDate>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct InstallmentView {
        pub id: Uuid,
        pub number: u32,
        pub amount_cents: i64,
        pub due_date: NaiveDate,
        pub status: InstallmentStatus,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseView {
        pub id: Uuid,
        pub name: String,
        pub amount_cents: i64,
        pub spent_at: DateTime<FixedOffset>,
        pub status: ExpenseStatus,
        pub user_id: Uuid,
        pub category_id: Uuid,
        pub payment_method_id: Uuid,
        pub created_at: DateTime<FixedOffset>,
        pub installments: Vec<InstallmentView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseCreated {
        pub id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseListResponse {
        pub expenses: Vec<ExpenseView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct InstallmentListResponse {
        pub installments: Vec<InstallmentView>,
    }
}

pub mod investment {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct InvestmentNew {
        pub notes: Option<String>,
        pub amount_cents: i64,
        /// RFC3339 timestamp, including timezone offset (local user time).
        pub invested_at: DateTime<FixedOffset>,
        pub user_id: Uuid,
        /// Category name; the matching row is created on the fly if needed.
        pub category: String,
        pub category_color: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct InvestmentUpdate {
        pub notes: Option<String>,
        pub amount_cents: Option<i64>,
        pub invested_at: Option<DateTime<FixedOffset>>,
        pub category: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct InvestmentView {
        pub id: Uuid,
        pub notes: Option<String>,
        pub amount_cents: i64,
        pub invested_at: DateTime<FixedOffset>,
        pub user_id: Uuid,
        pub category_id: Uuid,
        pub created_at: DateTime<FixedOffset>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct InvestmentCreated {
        pub id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct InvestmentListResponse {
        pub investments: Vec<InvestmentView>,
    }
}

pub mod dashboard {
    use super::*;

    /// Query parameters accepted by every dashboard endpoint.
    ///
    /// Everything arrives as free text and is parsed leniently; malformed
    /// values fall back to defaults instead of erroring.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct DashboardQuery {
        #[serde(rename = "userId")]
        pub user_id: Option<String>,
        /// Comma-separated month names, e.g. `janeiro,fevereiro`.
        pub month: Option<String>,
        /// Comma-separated years, e.g. `2024,2025`.
        pub year: Option<String>,
        /// 0-based page index (feed endpoint only).
        pub init: Option<String>,
        /// Page size (feed endpoint only).
        pub limit: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SummaryCards {
        pub total_revenues_cents: i64,
        pub total_expenses_cents: i64,
        pub total_investments_cents: i64,
        pub balance_cents: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryShare {
        pub category_name: String,
        pub amount_cents: i64,
        pub percentage: f64,
        pub category_color: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryBreakdownResponse {
        pub categories: Vec<CategoryShare>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthComparison {
        /// Month display name, e.g. "Janeiro".
        pub month: String,
        pub revenues_cents: i64,
        pub expenses_cents: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RevenuesVsExpensesResponse {
        pub months: Vec<MonthComparison>,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "UPPERCASE")]
    pub enum TransactionKind {
        Income,
        Expense,
        Investment,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryRef {
        pub id: Uuid,
        pub name: String,
        pub color: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PaymentMethodRef {
        pub id: Uuid,
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserRef {
        pub id: Uuid,
        pub name: String,
    }

    /// One row of the unified feed.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: Uuid,
        pub name: String,
        pub amount_cents: i64,
        pub kind: TransactionKind,
        /// UPPERCASE status; absent for investments.
        pub status: Option<String>,
        pub date: DateTime<FixedOffset>,
        pub category: CategoryRef,
        pub payment_method: Option<PaymentMethodRef>,
        pub user: Option<UserRef>,
        pub created_at: DateTime<FixedOffset>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionFeedResponse {
        pub data: Vec<TransactionView>,
        /// Size of the whole merged feed, counted before pagination.
        pub total_length: u64,
    }
}
