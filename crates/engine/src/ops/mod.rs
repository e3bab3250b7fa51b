use sea_orm::{ColumnTrait, Condition, DatabaseConnection};

use crate::{PeriodRange, ResultEngine};

mod access;
mod categories;
mod dashboard;
mod expenses;
mod incomes;
mod investments;
mod payment_methods;
mod users;

pub use dashboard::{
    CategoryRef, CategorySlice, MISSING_CATEGORY_COLOR, MISSING_CATEGORY_LABEL, MonthlyComparison,
    NormalizedTransaction, PaymentMethodRef, SummaryCards, TransactionKind, TransactionPage,
    UserRef,
};

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

/// Builds the OR-combined month-range condition for a date column.
///
/// Every range contributes one `gte <= col < lt` conjunction; a single range
/// collapses to a plain window without any special casing.
pub(crate) fn period_condition<C>(date_col: C, periods: &[PeriodRange]) -> Condition
where
    C: ColumnTrait,
{
    let mut condition = Condition::any();
    for period in periods {
        condition = condition.add(
            Condition::all()
                .add(date_col.gte(period.gte))
                .add(date_col.lt(period.lt)),
        );
    }
    condition
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
        })
    }
}
