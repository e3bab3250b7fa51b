//! Dashboard API endpoints.
//!
//! All four endpoints accept the same lenient query parameters; malformed
//! month/year/user tokens fall back to defaults instead of failing.

use api_types::dashboard::{
    CategoryBreakdownResponse, CategoryRef, CategoryShare, DashboardQuery, MonthComparison,
    PaymentMethodRef, RevenuesVsExpensesResponse, SummaryCards, TransactionFeedResponse,
    TransactionKind as ApiKind, TransactionView, UserRef,
};
use axum::{
    Json,
    extract::{Query, State},
};
use chrono::Utc;
use engine::{DashboardFilter, PageRequest};

use crate::{ServerError, server::ServerState};

fn filter_from_query(params: &DashboardQuery) -> DashboardFilter {
    DashboardFilter::from_raw(
        params.user_id.as_deref(),
        params.month.as_deref(),
        params.year.as_deref(),
    )
}

fn map_kind(kind: engine::TransactionKind) -> ApiKind {
    match kind {
        engine::TransactionKind::Income => ApiKind::Income,
        engine::TransactionKind::Expense => ApiKind::Expense,
        engine::TransactionKind::Investment => ApiKind::Investment,
    }
}

fn map_transaction(tx: engine::NormalizedTransaction) -> TransactionView {
    TransactionView {
        id: tx.id,
        name: tx.name,
        amount_cents: tx.amount_cents,
        kind: map_kind(tx.kind),
        status: tx.status.map(|status| status.to_uppercase()),
        date: tx.date.fixed_offset(),
        category: CategoryRef {
            id: tx.category.id,
            name: tx.category.name,
            color: tx.category.color,
        },
        payment_method: tx.payment_method.map(|pm| PaymentMethodRef {
            id: pm.id,
            name: pm.name,
        }),
        user: tx.user.map(|user| UserRef {
            id: user.id,
            name: user.name,
        }),
        created_at: tx.created_at.fixed_offset(),
    }
}

pub async fn summary(
    State(state): State<ServerState>,
    Query(params): Query<DashboardQuery>,
) -> Result<Json<SummaryCards>, ServerError> {
    let filter = filter_from_query(&params);
    let cards = state.engine.summary_cards(&filter, Utc::now()).await?;

    Ok(Json(SummaryCards {
        total_revenues_cents: cards.total_revenues_cents,
        total_expenses_cents: cards.total_expenses_cents,
        total_investments_cents: cards.total_investments_cents,
        balance_cents: cards.balance_cents,
    }))
}

pub async fn expenses_by_category(
    State(state): State<ServerState>,
    Query(params): Query<DashboardQuery>,
) -> Result<Json<CategoryBreakdownResponse>, ServerError> {
    let filter = filter_from_query(&params);
    let categories = state
        .engine
        .expenses_by_category(&filter, Utc::now())
        .await?
        .into_iter()
        .map(|slice| CategoryShare {
            category_name: slice.category_name,
            amount_cents: slice.amount_cents,
            percentage: slice.percentage,
            category_color: slice.category_color,
        })
        .collect();

    Ok(Json(CategoryBreakdownResponse { categories }))
}

pub async fn revenues_vs_expenses(
    State(state): State<ServerState>,
    Query(params): Query<DashboardQuery>,
) -> Result<Json<RevenuesVsExpensesResponse>, ServerError> {
    let filter = filter_from_query(&params);
    let months = state
        .engine
        .revenues_vs_expenses(&filter, Utc::now())
        .await?
        .into_iter()
        .map(|row| MonthComparison {
            month: row.month,
            revenues_cents: row.revenues_cents,
            expenses_cents: row.expenses_cents,
        })
        .collect();

    Ok(Json(RevenuesVsExpensesResponse { months }))
}

pub async fn last_transactions(
    State(state): State<ServerState>,
    Query(params): Query<DashboardQuery>,
) -> Result<Json<TransactionFeedResponse>, ServerError> {
    let filter = filter_from_query(&params);
    let page = PageRequest::from_raw(params.init.as_deref(), params.limit.as_deref());
    let feed = state
        .engine
        .last_transactions(&filter, page, Utc::now())
        .await?;

    Ok(Json(TransactionFeedResponse {
        data: feed.data.into_iter().map(map_transaction).collect(),
        total_length: feed.total_length,
    }))
}
