//! Investment rows ("investimentos").
//!
//! Investments carry no status and no payment method; their display name in
//! the unified feed comes from the free-text notes, with a fixed fallback.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Feed display name used when an investment has no notes.
pub const INVESTMENT_FALLBACK_NAME: &str = "Investimento";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Investment {
    pub id: Uuid,
    pub notes: Option<String>,
    pub amount_cents: i64,
    pub invested_at: DateTime<Utc>,
    pub user_id: Uuid,
    pub category_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Investment {
    /// Display name for the unified feed.
    #[must_use]
    pub fn display_name(&self) -> String {
        display_name(self.notes.as_deref())
    }
}

/// Shared fallback logic for feed projection from raw models.
#[must_use]
pub(crate) fn display_name(notes: Option<&str>) -> String {
    match notes.map(str::trim) {
        Some(notes) if !notes.is_empty() => notes.to_string(),
        _ => INVESTMENT_FALLBACK_NAME.to_string(),
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "investments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub notes: Option<String>,
    pub amount_cents: i64,
    pub invested_at: DateTimeUtc,
    pub user_id: Uuid,
    pub category_id: Uuid,
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
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Investment {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            notes: model.notes,
            amount_cents: model.amount_cents,
            invested_at: model.invested_at,
            user_id: model.user_id,
            category_id: model.category_id,
            created_at: model.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_notes_fall_back_to_fixed_name() {
        assert_eq!(display_name(None), INVESTMENT_FALLBACK_NAME);
        assert_eq!(display_name(Some("")), INVESTMENT_FALLBACK_NAME);
        assert_eq!(display_name(Some("   ")), INVESTMENT_FALLBACK_NAME);
        assert_eq!(display_name(Some("Tesouro Direto")), "Tesouro Direto");
    }
}
