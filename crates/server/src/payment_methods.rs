//! Payment methods API endpoints.

use api_types::payment_method::{
    PaymentMethodCreated, PaymentMethodListResponse, PaymentMethodNew, PaymentMethodUpdate,
    PaymentMethodView,
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
pub struct PaymentMethodListQuery {
    pub only_active: Option<bool>,
}

fn map_payment_method(payment_method: engine::PaymentMethod) -> PaymentMethodView {
    PaymentMethodView {
        id: payment_method.id,
        name: payment_method.name,
        is_active: payment_method.is_active,
    }
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<PaymentMethodNew>,
) -> Result<(StatusCode, Json<PaymentMethodCreated>), ServerError> {
    let payment_method = state.engine.create_payment_method(&payload.name).await?;

    Ok((
        StatusCode::CREATED,
        Json(PaymentMethodCreated {
            id: payment_method.id,
        }),
    ))
}

pub async fn list(
    State(state): State<ServerState>,
    Query(params): Query<PaymentMethodListQuery>,
) -> Result<Json<PaymentMethodListResponse>, ServerError> {
    let payment_methods = state
        .engine
        .list_payment_methods(params.only_active.unwrap_or(false))
        .await?
        .into_iter()
        .map(map_payment_method)
        .collect();

    Ok(Json(PaymentMethodListResponse { payment_methods }))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(payment_method_id): Path<Uuid>,
    Json(payload): Json<PaymentMethodUpdate>,
) -> Result<Json<PaymentMethodView>, ServerError> {
    if payload.name.is_none() && payload.is_active.is_none() {
        return Err(ServerError::Generic(
            "provide at least one of name or is_active".to_string(),
        ));
    }

    let payment_method = state
        .engine
        .update_payment_method(
            payment_method_id,
            payload.name.as_deref(),
            payload.is_active,
        )
        .await?;

    Ok(Json(map_payment_method(payment_method)))
}

pub async fn remove(
    State(state): State<ServerState>,
    Path(payment_method_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_payment_method(payment_method_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
