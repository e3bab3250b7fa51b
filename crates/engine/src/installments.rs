//! Installment rows and the split plan that generates them.
//!
//! An installment is one scheduled partial payment of a larger expense,
//! 1-based sequentially numbered. The amounts of a plan always sum exactly to
//! the expense total: the base share is `total / count` and the first
//! `total % count` installments carry one extra cent.

use chrono::{Months, NaiveDate};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, MoneyCents, ResultEngine};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InstallmentStatus {
    Pending,
    Paid,
}

impl InstallmentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
        }
    }
}

impl TryFrom<&str> for InstallmentStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            other => Err(EngineError::InvalidName(format!(
                "invalid installment status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Installment {
    pub id: Uuid,
    pub expense_id: Uuid,
    pub number: u32,
    pub amount_cents: i64,
    pub due_date: NaiveDate,
    pub status: InstallmentStatus,
}

/// One entry of a freshly computed split plan, not yet persisted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InstallmentDraft {
    pub number: u32,
    pub amount: MoneyCents,
    pub due_date: NaiveDate,
}

/// Partitions `total` into `count` dated installments.
///
/// `count` must be at least 2: a single-payment expense carries no
/// installment rows at all (the caller branches before ever calling this).
/// Draft `i` (0-based) is numbered `i + 1` and due `i` calendar months after
/// `first_due_date`; chrono clamps the day-of-month at shorter months.
pub fn split_into_installments(
    total: MoneyCents,
    count: u32,
    first_due_date: NaiveDate,
) -> ResultEngine<Vec<InstallmentDraft>> {
    if count < 2 {
        return Err(EngineError::InvalidAmount(
            "installments count must be > 1".to_string(),
        ));
    }

    let amounts = total.split_even(count)?;
    amounts
        .into_iter()
        .enumerate()
        .map(|(index, amount)| {
            let due_date = first_due_date
                .checked_add_months(Months::new(index as u32))
                .ok_or_else(|| {
                    EngineError::InvalidAmount("installment due date out of range".to_string())
                })?;
            Ok(InstallmentDraft {
                number: index as u32 + 1,
                amount,
                due_date,
            })
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "installments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub expense_id: Uuid,
    pub number: i32,
    pub amount_cents: i64,
    pub due_date: Date,
    pub status: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::expenses::Entity",
        from = "Column::ExpenseId",
        to = "super::expenses::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Expense,
}

impl Related<super::expenses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expense.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Installment {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            expense_id: model.expense_id,
            number: u32::try_from(model.number)
                .map_err(|_| EngineError::InvalidAmount("invalid installment number".to_string()))?,
            amount_cents: model.amount_cents,
            due_date: model.due_date,
            status: InstallmentStatus::try_from(model.status.as_str())?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn hundred_reais_in_three_payments() {
        let plan =
            split_into_installments(MoneyCents::new(100_00), 3, date(2024, 1, 10)).unwrap();
        let amounts: Vec<i64> = plan.iter().map(|p| p.amount.cents()).collect();
        assert_eq!(amounts, [33_34, 33_33, 33_33]);
        assert_eq!(amounts.iter().sum::<i64>(), 100_00);

        let numbers: Vec<u32> = plan.iter().map(|p| p.number).collect();
        assert_eq!(numbers, [1, 2, 3]);

        let due_dates: Vec<NaiveDate> = plan.iter().map(|p| p.due_date).collect();
        assert_eq!(
            due_dates,
            [date(2024, 1, 10), date(2024, 2, 10), date(2024, 3, 10)]
        );
    }

    #[test]
    fn plan_sums_exactly_for_awkward_amounts() {
        for (total, count) in [(99_99, 4), (10_00, 7), (123_45, 12), (1, 2)] {
            let plan =
                split_into_installments(MoneyCents::new(total), count, date(2024, 6, 1)).unwrap();
            assert_eq!(plan.len(), count as usize);
            let sum: i64 = plan.iter().map(|p| p.amount.cents()).sum();
            assert_eq!(sum, total, "split of {total} into {count} must be exact");
            // monotonically non-increasing amounts, non-decreasing dates
            for pair in plan.windows(2) {
                assert!(pair[0].amount >= pair[1].amount);
                assert!(pair[0].due_date <= pair[1].due_date);
            }
        }
    }

    #[test]
    fn due_dates_clamp_at_short_months() {
        let plan =
            split_into_installments(MoneyCents::new(300_00), 3, date(2024, 1, 31)).unwrap();
        let due_dates: Vec<NaiveDate> = plan.iter().map(|p| p.due_date).collect();
        // chrono clamps Jan 31 + 1 month to the end of February
        assert_eq!(
            due_dates,
            [date(2024, 1, 31), date(2024, 2, 29), date(2024, 3, 31)]
        );
    }

    #[test]
    fn single_installment_is_rejected() {
        assert!(split_into_installments(MoneyCents::new(100_00), 1, date(2024, 1, 1)).is_err());
        assert!(split_into_installments(MoneyCents::new(100_00), 0, date(2024, 1, 1)).is_err());
    }
}
