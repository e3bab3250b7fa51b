use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, PaymentMethod, ResultEngine, payment_methods,
    util::{normalize_name_key, normalize_required_name},
};

use super::{Engine, with_tx};

impl Engine {
    /// Creates a payment method; names are unique case-insensitively.
    pub async fn create_payment_method(&self, name: &str) -> ResultEngine<PaymentMethod> {
        with_tx!(self, |db_tx| {
            let display = normalize_required_name(name, "payment method")?;
            let name_norm = normalize_name_key(&display)?;

            let existing = payment_methods::Entity::find()
                .filter(payment_methods::Column::NameNorm.eq(name_norm.clone()))
                .one(&db_tx)
                .await?;
            if existing.is_some() {
                return Err(EngineError::ExistingKey(display));
            }

            let active = payment_methods::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4()),
                name: ActiveValue::Set(display),
                name_norm: ActiveValue::Set(name_norm),
                is_active: ActiveValue::Set(true),
            };
            let model = active.insert(&db_tx).await?;
            Ok(PaymentMethod::from(model))
        })
    }

    pub async fn list_payment_methods(&self, only_active: bool) -> ResultEngine<Vec<PaymentMethod>> {
        let mut query =
            payment_methods::Entity::find().order_by_asc(payment_methods::Column::Name);
        if only_active {
            query = query.filter(payment_methods::Column::IsActive.eq(true));
        }
        Ok(query
            .all(&self.database)
            .await?
            .into_iter()
            .map(PaymentMethod::from)
            .collect())
    }

    pub async fn update_payment_method(
        &self,
        payment_method_id: Uuid,
        name: Option<&str>,
        is_active: Option<bool>,
    ) -> ResultEngine<PaymentMethod> {
        with_tx!(self, |db_tx| {
            let model = payment_methods::Entity::find_by_id(payment_method_id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| {
                    EngineError::KeyNotFound("payment method not exists".to_string())
                })?;

            let mut active = payment_methods::ActiveModel {
                id: ActiveValue::Set(payment_method_id),
                ..Default::default()
            };
            if let Some(name) = name {
                let display = normalize_required_name(name, "payment method")?;
                let name_norm = normalize_name_key(&display)?;
                if name_norm != model.name_norm {
                    let taken = payment_methods::Entity::find()
                        .filter(payment_methods::Column::NameNorm.eq(name_norm.clone()))
                        .one(&db_tx)
                        .await?;
                    if taken.is_some() {
                        return Err(EngineError::ExistingKey(display));
                    }
                }
                active.name = ActiveValue::Set(display);
                active.name_norm = ActiveValue::Set(name_norm);
            }
            if let Some(is_active) = is_active {
                active.is_active = ActiveValue::Set(is_active);
            }

            let updated = active.update(&db_tx).await?;
            Ok(PaymentMethod::from(updated))
        })
    }

    pub async fn delete_payment_method(&self, payment_method_id: Uuid) -> ResultEngine<()> {
        let result = payment_methods::Entity::delete_by_id(payment_method_id)
            .exec(&self.database)
            .await?;
        if result.rows_affected == 0 {
            return Err(EngineError::KeyNotFound(
                "payment method not exists".to_string(),
            ));
        }
        Ok(())
    }
}
