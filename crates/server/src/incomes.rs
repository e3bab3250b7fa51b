//! Incomes API endpoints.

use api_types::dashboard::DashboardQuery;
use api_types::income::{
    IncomeCreated, IncomeListResponse, IncomeNew, IncomeStatus as ApiStatus, IncomeUpdate,
    IncomeView,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use engine::DashboardFilter;
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn map_status(status: engine::IncomeStatus) -> ApiStatus {
    match status {
        engine::IncomeStatus::Received => ApiStatus::Received,
        engine::IncomeStatus::Pending => ApiStatus::Pending,
    }
}

fn engine_status(status: ApiStatus) -> engine::IncomeStatus {
    match status {
        ApiStatus::Received => engine::IncomeStatus::Received,
        ApiStatus::Pending => engine::IncomeStatus::Pending,
    }
}

fn map_income(income: engine::Income) -> IncomeView {
    IncomeView {
        id: income.id,
        name: income.name,
        amount_cents: income.amount_cents,
        received_at: income.received_at.fixed_offset(),
        status: map_status(income.status),
        user_id: income.user_id,
        category_id: income.category_id,
        payment_method_id: income.payment_method_id,
        created_at: income.created_at.fixed_offset(),
    }
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<IncomeNew>,
) -> Result<(StatusCode, Json<IncomeCreated>), ServerError> {
    let income = state
        .engine
        .create_income(engine::NewIncome {
            name: payload.name,
            amount_cents: payload.amount_cents,
            received_at: payload.received_at.with_timezone(&Utc),
            status: engine_status(payload.status),
            user_id: payload.user_id,
            category: payload.category,
            category_color: payload.category_color,
            payment_method_id: payload.payment_method_id,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(IncomeCreated { id: income.id })))
}

pub async fn list(
    State(state): State<ServerState>,
    Query(params): Query<DashboardQuery>,
) -> Result<Json<IncomeListResponse>, ServerError> {
    let filter = DashboardFilter::from_raw(
        params.user_id.as_deref(),
        params.month.as_deref(),
        params.year.as_deref(),
    );
    let incomes = state
        .engine
        .list_incomes(&filter, Utc::now())
        .await?
        .into_iter()
        .map(map_income)
        .collect();

    Ok(Json(IncomeListResponse { incomes }))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(income_id): Path<Uuid>,
    Json(payload): Json<IncomeUpdate>,
) -> Result<Json<IncomeView>, ServerError> {
    if payload.name.is_none()
        && payload.amount_cents.is_none()
        && payload.received_at.is_none()
        && payload.status.is_none()
        && payload.category.is_none()
        && payload.payment_method_id.is_none()
    {
        return Err(ServerError::Generic(
            "provide at least one field to update".to_string(),
        ));
    }

    let income = state
        .engine
        .update_income(
            income_id,
            engine::UpdateIncome {
                name: payload.name,
                amount_cents: payload.amount_cents,
                received_at: payload.received_at.map(|dt| dt.with_timezone(&Utc)),
                status: payload.status.map(engine_status),
                category: payload.category,
                payment_method_id: payload.payment_method_id,
            },
        )
        .await?;

    Ok(Json(map_income(income)))
}

pub async fn remove(
    State(state): State<ServerState>,
    Path(income_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_income(income_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
