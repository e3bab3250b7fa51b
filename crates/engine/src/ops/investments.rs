use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    CategoryKind, DashboardFilter, EngineError, Investment, NewInvestment, ResultEngine,
    UpdateInvestment, investments, period::resolve_periods, util::normalize_optional_text,
};

use super::{Engine, period_condition, with_tx};

impl Engine {
    pub async fn create_investment(&self, cmd: NewInvestment) -> ResultEngine<Investment> {
        if cmd.amount_cents <= 0 {
            return Err(EngineError::InvalidAmount(
                "amount_cents must be > 0".to_string(),
            ));
        }

        with_tx!(self, |db_tx| {
            Self::require_user(&db_tx, cmd.user_id).await?;
            let category = Self::find_or_create_category(
                &db_tx,
                CategoryKind::Investment,
                &cmd.category,
                cmd.category_color.as_deref(),
            )
            .await?;

            let active = investments::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4()),
                notes: ActiveValue::Set(normalize_optional_text(cmd.notes.as_deref())),
                amount_cents: ActiveValue::Set(cmd.amount_cents),
                invested_at: ActiveValue::Set(cmd.invested_at),
                user_id: ActiveValue::Set(cmd.user_id),
                category_id: ActiveValue::Set(category.id),
                created_at: ActiveValue::Set(Utc::now()),
            };
            let model = active.insert(&db_tx).await?;
            Ok(Investment::from(model))
        })
    }

    /// Lists investments for the resolved filter period(s), newest first.
    pub async fn list_investments(
        &self,
        filter: &DashboardFilter,
        now: DateTime<Utc>,
    ) -> ResultEngine<Vec<Investment>> {
        let periods = resolve_periods(filter.month.as_deref(), filter.year.as_deref(), now);
        let mut query = investments::Entity::find()
            .filter(period_condition(investments::Column::InvestedAt, &periods))
            .order_by_desc(investments::Column::InvestedAt)
            .order_by_asc(investments::Column::Id);
        if let Some(user_id) = filter.user_id {
            query = query.filter(investments::Column::UserId.eq(user_id));
        }
        Ok(query
            .all(&self.database)
            .await?
            .into_iter()
            .map(Investment::from)
            .collect())
    }

    pub async fn update_investment(
        &self,
        investment_id: Uuid,
        cmd: UpdateInvestment,
    ) -> ResultEngine<Investment> {
        if let Some(amount_cents) = cmd.amount_cents
            && amount_cents <= 0
        {
            return Err(EngineError::InvalidAmount(
                "amount_cents must be > 0".to_string(),
            ));
        }

        with_tx!(self, |db_tx| {
            investments::Entity::find_by_id(investment_id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("investment not exists".to_string()))?;

            let mut active = investments::ActiveModel {
                id: ActiveValue::Set(investment_id),
                ..Default::default()
            };
            if let Some(notes) = cmd.notes.as_deref() {
                active.notes = ActiveValue::Set(normalize_optional_text(Some(notes)));
            }
            if let Some(amount_cents) = cmd.amount_cents {
                active.amount_cents = ActiveValue::Set(amount_cents);
            }
            if let Some(invested_at) = cmd.invested_at {
                active.invested_at = ActiveValue::Set(invested_at);
            }
            if let Some(category) = cmd.category.as_deref() {
                let category = Self::find_or_create_category(
                    &db_tx,
                    CategoryKind::Investment,
                    category,
                    None,
                )
                .await?;
                active.category_id = ActiveValue::Set(category.id);
            }

            let updated = active.update(&db_tx).await?;
            Ok(Investment::from(updated))
        })
    }

    pub async fn delete_investment(&self, investment_id: Uuid) -> ResultEngine<()> {
        let result = investments::Entity::delete_by_id(investment_id)
            .exec(&self.database)
            .await?;
        if result.rows_affected == 0 {
            return Err(EngineError::KeyNotFound(
                "investment not exists".to_string(),
            ));
        }
        Ok(())
    }
}
