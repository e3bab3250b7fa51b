//! Users API endpoints.

use api_types::user::{UserCreated, UserListResponse, UserNew, UserUpdate, UserView};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn map_user(user: engine::User) -> UserView {
    UserView {
        id: user.id,
        name: user.name,
        email: user.email,
        created_at: user.created_at.fixed_offset(),
    }
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<UserNew>,
) -> Result<(StatusCode, Json<UserCreated>), ServerError> {
    let user = state.engine.create_user(&payload.name, &payload.email).await?;
    Ok((StatusCode::CREATED, Json(UserCreated { id: user.id })))
}

pub async fn list(State(state): State<ServerState>) -> Result<Json<UserListResponse>, ServerError> {
    let users = state
        .engine
        .list_users()
        .await?
        .into_iter()
        .map(map_user)
        .collect();

    Ok(Json(UserListResponse { users }))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<UserUpdate>,
) -> Result<Json<UserView>, ServerError> {
    if payload.name.is_none() && payload.email.is_none() {
        return Err(ServerError::Generic(
            "provide at least one of name or email".to_string(),
        ));
    }

    let user = state
        .engine
        .update_user(user_id, payload.name.as_deref(), payload.email.as_deref())
        .await?;

    Ok(Json(map_user(user)))
}

pub async fn remove(
    State(state): State<ServerState>,
    Path(user_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_user(user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
