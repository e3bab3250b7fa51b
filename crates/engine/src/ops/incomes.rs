use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    CategoryKind, DashboardFilter, EngineError, Income, NewIncome, ResultEngine, UpdateIncome,
    incomes, period::resolve_periods, util::normalize_required_name,
};

use super::{Engine, period_condition, with_tx};

impl Engine {
    pub async fn create_income(&self, cmd: NewIncome) -> ResultEngine<Income> {
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
                CategoryKind::Income,
                &cmd.category,
                cmd.category_color.as_deref(),
            )
            .await?;

            let active = incomes::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4()),
                name: ActiveValue::Set(normalize_required_name(&cmd.name, "income")?),
                amount_cents: ActiveValue::Set(cmd.amount_cents),
                received_at: ActiveValue::Set(cmd.received_at),
                status: ActiveValue::Set(cmd.status.as_str().to_string()),
                user_id: ActiveValue::Set(cmd.user_id),
                category_id: ActiveValue::Set(category.id),
                payment_method_id: ActiveValue::Set(cmd.payment_method_id),
                created_at: ActiveValue::Set(Utc::now()),
            };
            let model = active.insert(&db_tx).await?;
            Income::try_from(model)
        })
    }

    /// Lists incomes for the resolved filter period(s), newest first.
    pub async fn list_incomes(
        &self,
        filter: &DashboardFilter,
        now: DateTime<Utc>,
    ) -> ResultEngine<Vec<Income>> {
        let periods = resolve_periods(filter.month.as_deref(), filter.year.as_deref(), now);
        let mut query = incomes::Entity::find()
            .filter(period_condition(incomes::Column::ReceivedAt, &periods))
            .order_by_desc(incomes::Column::ReceivedAt)
            .order_by_asc(incomes::Column::Id);
        if let Some(user_id) = filter.user_id {
            query = query.filter(incomes::Column::UserId.eq(user_id));
        }
        query
            .all(&self.database)
            .await?
            .into_iter()
            .map(Income::try_from)
            .collect()
    }

    pub async fn update_income(&self, income_id: Uuid, cmd: UpdateIncome) -> ResultEngine<Income> {
        if let Some(amount_cents) = cmd.amount_cents
            && amount_cents <= 0
        {
            return Err(EngineError::InvalidAmount(
                "amount_cents must be > 0".to_string(),
            ));
        }

        with_tx!(self, |db_tx| {
            incomes::Entity::find_by_id(income_id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("income not exists".to_string()))?;

            let mut active = incomes::ActiveModel {
                id: ActiveValue::Set(income_id),
                ..Default::default()
            };
            if let Some(name) = cmd.name.as_deref() {
                active.name = ActiveValue::Set(normalize_required_name(name, "income")?);
            }
            if let Some(amount_cents) = cmd.amount_cents {
                active.amount_cents = ActiveValue::Set(amount_cents);
            }
            if let Some(received_at) = cmd.received_at {
                active.received_at = ActiveValue::Set(received_at);
            }
            if let Some(status) = cmd.status {
                active.status = ActiveValue::Set(status.as_str().to_string());
            }
            if let Some(category) = cmd.category.as_deref() {
                let category =
                    Self::find_or_create_category(&db_tx, CategoryKind::Income, category, None)
                        .await?;
                active.category_id = ActiveValue::Set(category.id);
            }
            if let Some(payment_method_id) = cmd.payment_method_id {
                Self::require_payment_method(&db_tx, payment_method_id).await?;
                active.payment_method_id = ActiveValue::Set(payment_method_id);
            }

            let updated = active.update(&db_tx).await?;
            Income::try_from(updated)
        })
    }

    pub async fn delete_income(&self, income_id: Uuid) -> ResultEngine<()> {
        let result = incomes::Entity::delete_by_id(income_id)
            .exec(&self.database)
            .await?;
        if result.rows_affected == 0 {
            return Err(EngineError::KeyNotFound("income not exists".to_string()));
        }
        Ok(())
    }
}
