use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, User, users, util::normalize_required_name};

use super::{Engine, with_tx};

impl Engine {
    /// Creates a household member; the e-mail address is unique.
    pub async fn create_user(&self, name: &str, email: &str) -> ResultEngine<User> {
        with_tx!(self, |db_tx| {
            let name = normalize_required_name(name, "user")?;
            let email = normalize_email(email)?;

            let existing = users::Entity::find()
                .filter(users::Column::Email.eq(email.clone()))
                .one(&db_tx)
                .await?;
            if existing.is_some() {
                return Err(EngineError::ExistingKey(email));
            }

            let active = users::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4()),
                name: ActiveValue::Set(name),
                email: ActiveValue::Set(email),
                created_at: ActiveValue::Set(Utc::now()),
            };
            let model = active.insert(&db_tx).await?;
            Ok(User::from(model))
        })
    }

    pub async fn list_users(&self) -> ResultEngine<Vec<User>> {
        Ok(users::Entity::find()
            .order_by_asc(users::Column::Name)
            .all(&self.database)
            .await?
            .into_iter()
            .map(User::from)
            .collect())
    }

    pub async fn update_user(
        &self,
        user_id: Uuid,
        name: Option<&str>,
        email: Option<&str>,
    ) -> ResultEngine<User> {
        with_tx!(self, |db_tx| {
            let model = Self::require_user(&db_tx, user_id).await?;

            let mut active = users::ActiveModel {
                id: ActiveValue::Set(user_id),
                ..Default::default()
            };
            if let Some(name) = name {
                active.name = ActiveValue::Set(normalize_required_name(name, "user")?);
            }
            if let Some(email) = email {
                let email = normalize_email(email)?;
                if email != model.email {
                    let taken = users::Entity::find()
                        .filter(users::Column::Email.eq(email.clone()))
                        .one(&db_tx)
                        .await?;
                    if taken.is_some() {
                        return Err(EngineError::ExistingKey(email));
                    }
                }
                active.email = ActiveValue::Set(email);
            }

            let updated = active.update(&db_tx).await?;
            Ok(User::from(updated))
        })
    }

    pub async fn delete_user(&self, user_id: Uuid) -> ResultEngine<()> {
        let result = users::Entity::delete_by_id(user_id)
            .exec(&self.database)
            .await?;
        if result.rows_affected == 0 {
            return Err(EngineError::KeyNotFound("user not exists".to_string()));
        }
        Ok(())
    }
}

fn normalize_email(email: &str) -> ResultEngine<String> {
    let email = email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(EngineError::InvalidName(format!(
            "invalid e-mail address: {email}"
        )));
    }
    Ok(email)
}
