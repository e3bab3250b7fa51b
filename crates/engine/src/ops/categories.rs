use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
    sea_query::OnConflict,
};
use uuid::Uuid;

use crate::{
    Category, CategoryKind, EngineError, ResultEngine, categories,
    util::{normalize_name_key, normalize_required_name},
};

use super::{Engine, with_tx};

/// Color assigned to categories auto-provisioned without an explicit one.
pub(super) const DEFAULT_CATEGORY_COLOR: &str = "#7c3aed";

impl Engine {
    /// Case-insensitive find-or-create on `(kind, name)`.
    ///
    /// The insert goes through `ON CONFLICT DO NOTHING` on the unique
    /// `(kind, name_norm)` index, so two concurrent creates with the same
    /// name converge on a single row instead of duplicating it.
    pub(super) async fn find_or_create_category(
        db_tx: &DatabaseTransaction,
        kind: CategoryKind,
        name: &str,
        color: Option<&str>,
    ) -> ResultEngine<categories::Model> {
        let display = normalize_required_name(name, "category")?;
        let name_norm = normalize_name_key(&display)?;

        if let Some(model) = Self::category_by_norm(db_tx, kind, &name_norm).await? {
            return Ok(model);
        }

        let active = categories::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4()),
            name: ActiveValue::Set(display),
            name_norm: ActiveValue::Set(name_norm.clone()),
            kind: ActiveValue::Set(kind.as_str().to_string()),
            color: ActiveValue::Set(color.unwrap_or(DEFAULT_CATEGORY_COLOR).to_string()),
        };
        categories::Entity::insert(active)
            .on_conflict(
                OnConflict::columns([categories::Column::Kind, categories::Column::NameNorm])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(db_tx)
            .await?;

        Self::category_by_norm(db_tx, kind, &name_norm)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("category not exists".to_string()))
    }

    async fn category_by_norm(
        db_tx: &DatabaseTransaction,
        kind: CategoryKind,
        name_norm: &str,
    ) -> ResultEngine<Option<categories::Model>> {
        Ok(categories::Entity::find()
            .filter(categories::Column::Kind.eq(kind.as_str()))
            .filter(categories::Column::NameNorm.eq(name_norm))
            .one(db_tx)
            .await?)
    }

    /// Creates a category, returning the existing row when the name is
    /// already taken for that kind (find-or-create semantics).
    pub async fn create_category(
        &self,
        kind: CategoryKind,
        name: &str,
        color: Option<&str>,
    ) -> ResultEngine<Category> {
        with_tx!(self, |db_tx| {
            let model = Self::find_or_create_category(&db_tx, kind, name, color).await?;
            Category::try_from(model)
        })
    }

    pub async fn list_categories(&self, kind: Option<CategoryKind>) -> ResultEngine<Vec<Category>> {
        let mut query = categories::Entity::find().order_by_asc(categories::Column::Name);
        if let Some(kind) = kind {
            query = query.filter(categories::Column::Kind.eq(kind.as_str()));
        }
        query
            .all(&self.database)
            .await?
            .into_iter()
            .map(Category::try_from)
            .collect()
    }

    pub async fn update_category(
        &self,
        category_id: Uuid,
        name: Option<&str>,
        color: Option<&str>,
    ) -> ResultEngine<Category> {
        with_tx!(self, |db_tx| {
            let model = categories::Entity::find_by_id(category_id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("category not exists".to_string()))?;
            let kind = CategoryKind::try_from(model.kind.as_str())?;

            let mut active = categories::ActiveModel {
                id: ActiveValue::Set(category_id),
                ..Default::default()
            };
            if let Some(name) = name {
                let display = normalize_required_name(name, "category")?;
                let name_norm = normalize_name_key(&display)?;
                if name_norm != model.name_norm
                    && Self::category_by_norm(&db_tx, kind, &name_norm)
                        .await?
                        .is_some()
                {
                    return Err(EngineError::ExistingKey(display));
                }
                active.name = ActiveValue::Set(display);
                active.name_norm = ActiveValue::Set(name_norm);
            }
            if let Some(color) = color {
                active.color = ActiveValue::Set(color.to_string());
            }

            let updated = active.update(&db_tx).await?;
            Category::try_from(updated)
        })
    }

    pub async fn delete_category(&self, category_id: Uuid) -> ResultEngine<()> {
        let result = categories::Entity::delete_by_id(category_id)
            .exec(&self.database)
            .await?;
        if result.rows_affected == 0 {
            return Err(EngineError::KeyNotFound("category not exists".to_string()));
        }
        Ok(())
    }
}
