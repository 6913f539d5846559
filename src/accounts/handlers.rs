use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::{
    accounts::{
        dto::{AuthResponse, LoginRequest, SignupRequest, UserQuery},
        repo_types::Account,
        services,
    },
    error::AppError,
    state::AppState,
};

pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/api/user", get(get_user))
        .route("/api/signup", post(signup))
        .route("/api/login", post(login))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    query: Result<Query<UserQuery>, QueryRejection>,
) -> Result<Json<Account>, AppError> {
    let Query(query) = query?;
    let account = services::lookup(&state.db, query.email.as_deref()).await?;
    Ok(Json(account))
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, AppError> {
    let Json(payload) = payload?;
    let user_id =
        services::create_account(&state.db, state.config.password_storage, payload).await?;
    Ok(Json(AuthResponse::ok(user_id)))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, AppError> {
    let Json(payload) = payload?;
    let user_id = services::authenticate(&state.db, payload).await?;
    Ok(Json(AuthResponse::ok(user_id)))
}
