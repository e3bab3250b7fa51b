//! Expenses API endpoints, including the per-installment patch.

use api_types::dashboard::DashboardQuery;
use api_types::expense::{
    ExpenseCreated, ExpenseListResponse, ExpenseNew, ExpenseStatus as ApiStatus, ExpenseUpdate,
    ExpenseView, InstallmentListResponse, InstallmentStatus as ApiInstallmentStatus,
    InstallmentUpdate, InstallmentView,
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

fn map_status(status: engine::ExpenseStatus) -> ApiStatus {
    match status {
        engine::ExpenseStatus::Paid => ApiStatus::Paid,
        engine::ExpenseStatus::Pending => ApiStatus::Pending,
    }
}

fn engine_status(status: ApiStatus) -> engine::ExpenseStatus {
    match status {
        ApiStatus::Paid => engine::ExpenseStatus::Paid,
        ApiStatus::Pending => engine::ExpenseStatus::Pending,
    }
}

fn map_installment_status(status: engine::InstallmentStatus) -> ApiInstallmentStatus {
    match status {
        engine::InstallmentStatus::Pending => ApiInstallmentStatus::Pending,
        engine::InstallmentStatus::Paid => ApiInstallmentStatus::Paid,
    }
}

fn engine_installment_status(status: ApiInstallmentStatus) -> engine::InstallmentStatus {
    match status {
        ApiInstallmentStatus::Pending => engine::InstallmentStatus::Pending,
        ApiInstallmentStatus::Paid => engine::InstallmentStatus::Paid,
    }
}

fn map_installment(installment: engine::Installment) -> InstallmentView {
    InstallmentView {
        id: installment.id,
        number: installment.number,
        amount_cents: installment.amount_cents,
        due_date: installment.due_date,
        status: map_installment_status(installment.status),
    }
}

fn map_expense(expense: engine::Expense, installments: Vec<engine::Installment>) -> ExpenseView {
    ExpenseView {
        id: expense.id,
        name: expense.name,
        amount_cents: expense.amount_cents,
        spent_at: expense.spent_at.fixed_offset(),
        status: map_status(expense.status),
        user_id: expense.user_id,
        category_id: expense.category_id,
        payment_method_id: expense.payment_method_id,
        created_at: expense.created_at.fixed_offset(),
        installments: installments.into_iter().map(map_installment).collect(),
    }
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ExpenseNew>,
) -> Result<(StatusCode, Json<ExpenseCreated>), ServerError> {
    let expense = state
        .engine
        .create_expense(engine::NewExpense {
            name: payload.name,
            amount_cents: payload.amount_cents,
            spent_at: payload.spent_at.with_timezone(&Utc),
            status: engine_status(payload.status),
            user_id: payload.user_id,
            category: payload.category,
            category_color: payload.category_color,
            payment_method_id: payload.payment_method_id,
            installments_count: payload.installments_count,
            first_due_date: payload.first_due_date,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(ExpenseCreated { id: expense.id })))
}

pub async fn list(
    State(state): State<ServerState>,
    Query(params): Query<DashboardQuery>,
) -> Result<Json<ExpenseListResponse>, ServerError> {
    let filter = DashboardFilter::from_raw(
        params.user_id.as_deref(),
        params.month.as_deref(),
        params.year.as_deref(),
    );
    let expenses = state
        .engine
        .list_expenses(&filter, Utc::now())
        .await?
        .into_iter()
        .map(|(expense, installments)| map_expense(expense, installments))
        .collect();

    Ok(Json(ExpenseListResponse { expenses }))
}

pub async fn list_installments(
    State(state): State<ServerState>,
    Path(expense_id): Path<Uuid>,
) -> Result<Json<InstallmentListResponse>, ServerError> {
    let installments = state
        .engine
        .list_installments(expense_id)
        .await?
        .into_iter()
        .map(map_installment)
        .collect();

    Ok(Json(InstallmentListResponse { installments }))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(expense_id): Path<Uuid>,
    Json(payload): Json<ExpenseUpdate>,
) -> Result<Json<ExpenseView>, ServerError> {
    if payload.name.is_none()
        && payload.amount_cents.is_none()
        && payload.spent_at.is_none()
        && payload.status.is_none()
        && payload.category.is_none()
        && payload.payment_method_id.is_none()
    {
        return Err(ServerError::Generic(
            "provide at least one field to update".to_string(),
        ));
    }

    let expense = state
        .engine
        .update_expense(
            expense_id,
            engine::UpdateExpense {
                name: payload.name,
                amount_cents: payload.amount_cents,
                spent_at: payload.spent_at.map(|dt| dt.with_timezone(&Utc)),
                status: payload.status.map(engine_status),
                category: payload.category,
                payment_method_id: payload.payment_method_id,
            },
        )
        .await?;
    let installments = state.engine.list_installments(expense_id).await?;

    Ok(Json(map_expense(expense, installments)))
}

pub async fn update_installment(
    State(state): State<ServerState>,
    Path((expense_id, number)): Path<(Uuid, u32)>,
    Json(payload): Json<InstallmentUpdate>,
) -> Result<Json<InstallmentView>, ServerError> {
    if payload.status.is_none() && payload.due_date.is_none() {
        return Err(ServerError::Generic(
            "provide at least one of status or due_date".to_string(),
        ));
    }

    let installment = state
        .engine
        .update_installment(
            expense_id,
            number,
            engine::UpdateInstallment {
                status: payload.status.map(engine_installment_status),
                due_date: payload.due_date,
            },
        )
        .await?;

    Ok(Json(map_installment(installment)))
}

pub async fn remove(
    State(state): State<ServerState>,
    Path(expense_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_expense(expense_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
