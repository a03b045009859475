use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        claims::USER_ROLE,
        dto::{PublicUser, SigninRequest, SignupRequest, TokenResponse, UsersResponse},
        middleware::AuthUser,
        password,
    },
    error::{AppError, AppResult},
    state::AppState,
    validation::{ApiJson, Checks, MIN_PASSWORD_LEN},
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/signin", post(signin))
}

/// Routes that need a verified identity; the caller layers the auth check.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(get_me))
        .route("/users", get(list_users))
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<SignupRequest>,
) -> AppResult<Json<TokenResponse>> {
    let email = normalize_email(&payload.email);
    let name = payload.name.trim().to_string();

    Checks::new()
        .not_blank(&name, "name")
        .email(&email, "email")
        .require(
            payload.password.chars().count() >= MIN_PASSWORD_LEN,
            "password",
            "must be at least 8 characters",
        )
        .finish(&state)?;

    // Fast path; the store repeats the check and the unique index has the final word.
    if state.accounts.find_by_email(&email).await?.is_some() {
        warn!(email = %email, "email already registered");
        return Err(AppError::DuplicateEmail);
    }

    let hash = password::hash_password_blocking(payload.password).await?;
    let user = state.accounts.create(&email, &hash, &name).await.map_err(|e| {
        warn!(email = %email, error = %e, "create user failed");
        AppError::from(e)
    })?;

    let token = state.tokens.issue_default(user.id, Some(USER_ROLE))?;
    info!(user_id = %user.id, email = %user.email, "user signed up");
    Ok(Json(TokenResponse { token }))
}

#[instrument(skip(state, payload))]
pub async fn signin(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<SigninRequest>,
) -> AppResult<Json<TokenResponse>> {
    let email = normalize_email(&payload.email);

    Checks::new()
        .email(&email, "email")
        .require(!payload.password.is_empty(), "password", "must not be empty")
        .finish(&state)?;

    let Some(user) = state.accounts.find_by_email(&email).await? else {
        warn!(email = %email, "signin unknown email");
        password::verify_dummy_blocking(payload.password).await?;
        return Err(AppError::InvalidCredentials);
    };

    if !password::verify_password_blocking(payload.password, user.password_hash.clone()).await? {
        warn!(email = %email, user_id = %user.id, "signin invalid password");
        return Err(AppError::InvalidCredentials);
    }

    let token = state.tokens.issue_default(user.id, Some(USER_ROLE))?;
    info!(user_id = %user.id, email = %user.email, "user signed in");
    Ok(Json(TokenResponse { token }))
}

#[instrument(skip(state))]
pub async fn get_me(State(state): State<AppState>, auth: AuthUser) -> AppResult<Json<PublicUser>> {
    let user = state
        .accounts
        .find_by_id(auth.id)
        .await?
        .ok_or(AppError::NotFound("user"))?;
    Ok(Json(user.into()))
}

/// Lists every account. Any signed-in caller may use it: all tokens carry the
/// single "user" role and there is no separate admin role.
#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> AppResult<Json<UsersResponse>> {
    let users = state.accounts.list_all().await?;
    Ok(Json(UsersResponse {
        users_data: users.into_iter().map(PublicUser::from).collect(),
    }))
}
