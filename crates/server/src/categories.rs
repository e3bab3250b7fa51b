//! Categories API endpoints.

use api_types::category::{
    CategoryCreated, CategoryKind as ApiKind, CategoryListResponse, CategoryNew, CategoryUpdate,
    CategoryView,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

#[derive(Debug, Default, Deserialize)]
pub struct CategoryListQuery {
    pub kind: Option<ApiKind>,
}

fn map_kind(kind: engine::CategoryKind) -> ApiKind {
    match kind {
        engine::CategoryKind::Income => ApiKind::Income,
        engine::CategoryKind::Expense => ApiKind::Expense,
        engine::CategoryKind::Investment => ApiKind::Investment,
    }
}

fn engine_kind(kind: ApiKind) -> engine::CategoryKind {
    match kind {
        ApiKind::Income => engine::CategoryKind::Income,
        ApiKind::Expense => engine::CategoryKind::Expense,
        ApiKind::Investment => engine::CategoryKind::Investment,
    }
}

fn map_category(category: engine::Category) -> CategoryView {
    CategoryView {
        id: category.id,
        name: category.name,
        kind: map_kind(category.kind),
        color: category.color,
    }
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CategoryNew>,
) -> Result<(StatusCode, Json<CategoryCreated>), ServerError> {
    let category = state
        .engine
        .create_category(
            engine_kind(payload.kind),
            &payload.name,
            payload.color.as_deref(),
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CategoryCreated {
            id: category.id,
            name: category.name,
        }),
    ))
}

pub async fn list(
    State(state): State<ServerState>,
    Query(params): Query<CategoryListQuery>,
) -> Result<Json<CategoryListResponse>, ServerError> {
    let categories = state
        .engine
        .list_categories(params.kind.map(engine_kind))
        .await?
        .into_iter()
        .map(map_category)
        .collect();

    Ok(Json(CategoryListResponse { categories }))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(category_id): Path<Uuid>,
    Json(payload): Json<CategoryUpdate>,
) -> Result<Json<CategoryView>, ServerError> {
    if payload.name.is_none() && payload.color.is_none() {
        return Err(ServerError::Generic(
            "provide at least one of name or color".to_string(),
        ));
    }

    let category = state
        .engine
        .update_category(
            category_id,
            payload.name.as_deref(),
            payload.color.as_deref(),
        )
        .await?;

    Ok(Json(map_category(category)))
}

pub async fn remove(
    State(state): State<ServerState>,
    Path(category_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_category(category_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
