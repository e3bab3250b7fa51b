//! Existence checks shared by the write paths.
//!
//! Foreign keys would reject dangling references anyway, but these lookups
//! turn the failure into a proper `KeyNotFound` instead of an opaque
//! database error.

use sea_orm::{DatabaseTransaction, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, expenses, payment_methods, users};

use super::Engine;

impl Engine {
    pub(super) async fn require_user(
        db_tx: &DatabaseTransaction,
        user_id: Uuid,
    ) -> ResultEngine<users::Model> {
        users::Entity::find_by_id(user_id)
            .one(db_tx)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))
    }

    pub(super) async fn require_payment_method(
        db_tx: &DatabaseTransaction,
        payment_method_id: Uuid,
    ) -> ResultEngine<payment_methods::Model> {
        payment_methods::Entity::find_by_id(payment_method_id)
            .one(db_tx)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("payment method not exists".to_string()))
    }

    pub(super) async fn require_expense(
        db_tx: &DatabaseTransaction,
        expense_id: Uuid,
    ) -> ResultEngine<expenses::Model> {
        expenses::Entity::find_by_id(expense_id)
            .one(db_tx)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("expense not exists".to_string()))
    }
}
