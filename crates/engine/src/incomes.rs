//! Income rows ("receitas").

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::EngineError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IncomeStatus {
    Received,
    Pending,
}

impl IncomeStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::Pending => "pending",
        }
    }
}

impl TryFrom<&str> for IncomeStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "received" => Ok(Self::Received),
            "pending" => Ok(Self::Pending),
            other => Err(EngineError::InvalidName(format!(
                "invalid income status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Income {
    pub id: Uuid,
    pub name: String,
    pub amount_cents: i64,
    pub received_at: DateTime<Utc>,
    pub status: IncomeStatus,
    pub user_id: Uuid,
    pub category_id: Uuid,
    pub payment_method_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "incomes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub amount_cents: i64,
    pub received_at: DateTimeUtc,
    pub status: String,
    pub user_id: Uuid,
    pub category_id: Uuid,
    pub payment_method_id: Uuid,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id"
    )]
    Category,
    #[sea_orm(
        belongs_to = "super::payment_methods::Entity",
        from = "Column::PaymentMethodId",
        to = "super::payment_methods::Column::Id"
    )]
    PaymentMethod,
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Income {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            name: model.name,
            amount_cents: model.amount_cents,
            received_at: model.received_at,
            status: IncomeStatus::try_from(model.status.as_str())?,
            user_id: model.user_id,
            category_id: model.category_id,
            payment_method_id: model.payment_method_id,
            created_at: model.created_at,
        })
    }
}
