//! Core engine of the finance tracker.
//!
//! The engine owns the database connection and exposes every operation the
//! REST layer needs: resource CRUD for users, categories, payment methods,
//! incomes, expenses and investments; the dashboard aggregation reads; and
//! the installment split plan for expenses paid in parts.

pub use categories::{Category, CategoryKind};
pub use commands::{
    NewExpense, NewIncome, NewInvestment, UpdateExpense, UpdateIncome, UpdateInstallment,
    UpdateInvestment,
};
pub use error::EngineError;
pub use expenses::{Expense, ExpenseStatus};
pub use filters::{DEFAULT_PAGE_SIZE, DashboardFilter, PageRequest};
pub use incomes::{Income, IncomeStatus};
pub use installments::{
    Installment, InstallmentDraft, InstallmentStatus, split_into_installments,
};
pub use investments::{INVESTMENT_FALLBACK_NAME, Investment};
pub use money::MoneyCents;
pub use ops::{
    CategoryRef, CategorySlice, Engine, EngineBuilder, MISSING_CATEGORY_COLOR,
    MISSING_CATEGORY_LABEL, MonthlyComparison, NormalizedTransaction, PaymentMethodRef,
    SummaryCards, TransactionKind, TransactionPage, UserRef,
};
pub use payment_methods::PaymentMethod;
pub use period::{PeriodRange, resolve_periods, resolve_year_months};
pub use users::User;

mod categories;
mod commands;
mod error;
mod expenses;
pub mod filters;
mod incomes;
mod installments;
mod investments;
mod money;
mod ops;
mod payment_methods;
pub mod period;
mod users;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
