//! Investments API endpoints.

use api_types::dashboard::DashboardQuery;
use api_types::investment::{
    InvestmentCreated, InvestmentListResponse, InvestmentNew, InvestmentUpdate, InvestmentView,
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

fn map_investment(investment: engine::Investment) -> InvestmentView {
    InvestmentView {
        id: investment.id,
        notes: investment.notes,
        amount_cents: investment.amount_cents,
        invested_at: investment.invested_at.fixed_offset(),
        user_id: investment.user_id,
        category_id: investment.category_id,
        created_at: investment.created_at.fixed_offset(),
    }
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<InvestmentNew>,
) -> Result<(StatusCode, Json<InvestmentCreated>), ServerError> {
    let investment = state
        .engine
        .create_investment(engine::NewInvestment {
            notes: payload.notes,
            amount_cents: payload.amount_cents,
            invested_at: payload.invested_at.with_timezone(&Utc),
            user_id: payload.user_id,
            category: payload.category,
            category_color: payload.category_color,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(InvestmentCreated { id: investment.id }),
    ))
}

pub async fn list(
    State(state): State<ServerState>,
    Query(params): Query<DashboardQuery>,
) -> Result<Json<InvestmentListResponse>, ServerError> {
    let filter = DashboardFilter::from_raw(
        params.user_id.as_deref(),
        params.month.as_deref(),
        params.year.as_deref(),
    );
    let investments = state
        .engine
        .list_investments(&filter, Utc::now())
        .await?
        .into_iter()
        .map(map_investment)
        .collect();

    Ok(Json(InvestmentListResponse { investments }))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(investment_id): Path<Uuid>,
    Json(payload): Json<InvestmentUpdate>,
) -> Result<Json<InvestmentView>, ServerError> {
    if payload.notes.is_none()
        && payload.amount_cents.is_none()
        && payload.invested_at.is_none()
        && payload.category.is_none()
    {
        return Err(ServerError::Generic(
            "provide at least one field to update".to_string(),
        ));
    }

    let investment = state
        .engine
        .update_investment(
            investment_id,
            engine::UpdateInvestment {
                notes: payload.notes,
                amount_cents: payload.amount_cents,
                invested_at: payload.invested_at.map(|dt| dt.with_timezone(&Utc)),
                category: payload.category,
            },
        )
        .await?;

    Ok(Json(map_investment(investment)))
}

pub async fn remove(
    State(state): State<ServerState>,
    Path(investment_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_investment(investment_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
