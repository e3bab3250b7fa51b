use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    CategoryKind, DashboardFilter, EngineError, Expense, Installment, InstallmentStatus,
    MoneyCents, NewExpense, ResultEngine, UpdateExpense, UpdateInstallment, expenses,
    installments::{self, split_into_installments},
    period::resolve_periods,
    util::normalize_required_name,
};

use super::{Engine, period_condition, with_tx};

impl Engine {
    /// Creates an expense, generating its installment batch in the same
    /// database transaction when `installments_count > 1`.
    ///
    /// A count of 1 (or none) is a plain single-payment expense: no
    /// installment rows are written at all.
    pub async fn create_expense(&self, cmd: NewExpense) -> ResultEngine<Expense> {
        if cmd.amount_cents <= 0 {
            return Err(EngineError::InvalidAmount(
                "amount_cents must be > 0".to_string(),
            ));
        }

        with_tx!(self, |db_tx| {
            Self::require_user(&db_tx, cmd.user_id).await?;
            Self::require_payment_method(&db_tx, cmd.payment_method_id).await?;
            let category = Self::find_or_create_category(
                &db_tx,
                CategoryKind::Expense,
                &cmd.category,
                cmd.category_color.as_deref(),
            )
            .await?;

            let expense_id = Uuid::new_v4();
            let active = expenses::ActiveModel {
                id: ActiveValue::Set(expense_id),
                name: ActiveValue::Set(normalize_required_name(&cmd.name, "expense")?),
                amount_cents: ActiveValue::Set(cmd.amount_cents),
                spent_at: ActiveValue::Set(cmd.spent_at),
                status: ActiveValue::Set(cmd.status.as_str().to_string()),
                user_id: ActiveValue::Set(cmd.user_id),
                category_id: ActiveValue::Set(category.id),
                payment_method_id: ActiveValue::Set(cmd.payment_method_id),
                created_at: ActiveValue::Set(Utc::now()),
            };
            let model = active.insert(&db_tx).await?;

            if let Some(count) = cmd.installments_count
                && count > 1
            {
                let first_due_date = cmd
                    .first_due_date
                    .unwrap_or_else(|| cmd.spent_at.date_naive());
                let plan =
                    split_into_installments(MoneyCents::new(cmd.amount_cents), count, first_due_date)?;
                for draft in plan {
                    let installment = installments::ActiveModel {
                        id: ActiveValue::Set(Uuid::new_v4()),
                        expense_id: ActiveValue::Set(expense_id),
                        number: ActiveValue::Set(draft.number as i32),
                        amount_cents: ActiveValue::Set(draft.amount.cents()),
                        due_date: ActiveValue::Set(draft.due_date),
                        status: ActiveValue::Set(InstallmentStatus::Pending.as_str().to_string()),
                    };
                    installment.insert(&db_tx).await?;
                }
            }

            Expense::try_from(model)
        })
    }

    /// Lists expenses for the resolved filter period(s), newest first, each
    /// with its installments (empty for single-payment expenses).
    pub async fn list_expenses(
        &self,
        filter: &DashboardFilter,
        now: DateTime<Utc>,
    ) -> ResultEngine<Vec<(Expense, Vec<Installment>)>> {
        let periods = resolve_periods(filter.month.as_deref(), filter.year.as_deref(), now);
        let mut query = expenses::Entity::find()
            .filter(period_condition(expenses::Column::SpentAt, &periods))
            .order_by_desc(expenses::Column::SpentAt)
            .order_by_asc(expenses::Column::Id);
        if let Some(user_id) = filter.user_id {
            query = query.filter(expenses::Column::UserId.eq(user_id));
        }

        let rows = query
            .find_with_related(installments::Entity)
            .all(&self.database)
            .await?;

        rows.into_iter()
            .map(|(expense, related)| {
                let expense = Expense::try_from(expense)?;
                let mut parts = related
                    .into_iter()
                    .map(Installment::try_from)
                    .collect::<ResultEngine<Vec<_>>>()?;
                parts.sort_by_key(|installment| installment.number);
                Ok((expense, parts))
            })
            .collect()
    }

    pub async fn list_installments(&self, expense_id: Uuid) -> ResultEngine<Vec<Installment>> {
        with_tx!(self, |db_tx| {
            Self::require_expense(&db_tx, expense_id).await?;
            let rows = installments::Entity::find()
                .filter(installments::Column::ExpenseId.eq(expense_id))
                .order_by_asc(installments::Column::Number)
                .all(&db_tx)
                .await?;
            rows.into_iter().map(Installment::try_from).collect()
        })
    }

    /// Updates an expense; the installment batch is left untouched.
    pub async fn update_expense(
        &self,
        expense_id: Uuid,
        cmd: UpdateExpense,
    ) -> ResultEngine<Expense> {
        if let Some(amount_cents) = cmd.amount_cents
            && amount_cents <= 0
        {
            return Err(EngineError::InvalidAmount(
                "amount_cents must be > 0".to_string(),
            ));
        }

        with_tx!(self, |db_tx| {
            Self::require_expense(&db_tx, expense_id).await?;

            let mut active = expenses::ActiveModel {
                id: ActiveValue::Set(expense_id),
                ..Default::default()
            };
            if let Some(name) = cmd.name.as_deref() {
                active.name = ActiveValue::Set(normalize_required_name(name, "expense")?);
            }
            if let Some(amount_cents) = cmd.amount_cents {
                active.amount_cents = ActiveValue::Set(amount_cents);
            }
            if let Some(spent_at) = cmd.spent_at {
                active.spent_at = ActiveValue::Set(spent_at);
            }
            if let Some(status) = cmd.status {
                active.status = ActiveValue::Set(status.as_str().to_string());
            }
            if let Some(category) = cmd.category.as_deref() {
                let category =
                    Self::find_or_create_category(&db_tx, CategoryKind::Expense, category, None)
                        .await?;
                active.category_id = ActiveValue::Set(category.id);
            }
            if let Some(payment_method_id) = cmd.payment_method_id {
                Self::require_payment_method(&db_tx, payment_method_id).await?;
                active.payment_method_id = ActiveValue::Set(payment_method_id);
            }

            let updated = active.update(&db_tx).await?;
            Expense::try_from(updated)
        })
    }

    /// Patches a single installment row (status and/or due date).
    pub async fn update_installment(
        &self,
        expense_id: Uuid,
        number: u32,
        cmd: UpdateInstallment,
    ) -> ResultEngine<Installment> {
        with_tx!(self, |db_tx| {
            Self::require_expense(&db_tx, expense_id).await?;

            let model = installments::Entity::find()
                .filter(installments::Column::ExpenseId.eq(expense_id))
                .filter(installments::Column::Number.eq(number as i32))
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("installment not exists".to_string()))?;

            let mut active = installments::ActiveModel {
                id: ActiveValue::Set(model.id),
                ..Default::default()
            };
            if let Some(status) = cmd.status {
                active.status = ActiveValue::Set(status.as_str().to_string());
            }
            if let Some(due_date) = cmd.due_date {
                active.due_date = ActiveValue::Set(due_date);
            }

            let updated = active.update(&db_tx).await?;
            Installment::try_from(updated)
        })
    }

    /// Deletes an expense together with its installments.
    pub async fn delete_expense(&self, expense_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            Self::require_expense(&db_tx, expense_id).await?;
            installments::Entity::delete_many()
                .filter(installments::Column::ExpenseId.eq(expense_id))
                .exec(&db_tx)
                .await?;
            expenses::Entity::delete_by_id(expense_id)
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }
}
