//! Authentication routes: register, login, session and logout.

use axum::{
    extract::{Extension, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tracing::info;
use validator::Validate;

use domain::models::{AuthResponse, LoginRequest, MessageResponse, RegisterRequest};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::UserAuth;
use crate::services::AuthService;

/// POST /api/auth/register
///
/// Creates a user account with a hashed password, an empty personal list
/// and a bearer token for immediate use.
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request.validate()?;

    let auth = AuthService::new(state.pool.clone(), state.jwt.clone());
    let result = auth
        .register(&request.username, &request.email, &request.password)
        .await?;

    info!(user_id = %result.user.id, "User registered");

    let response = AuthResponse {
        user: result.user.to_response(),
        token: result.token,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/auth/login
///
/// Authenticates a user. Unknown email and wrong password both produce a
/// uniform 401.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request.validate()?;

    let auth = AuthService::new(state.pool.clone(), state.jwt.clone());
    let result = auth.login(&request.email, &request.password).await?;

    info!(user_id = %result.user.id, "User logged in");

    let response = AuthResponse {
        user: result.user.to_response(),
        token: result.token,
    };
    Ok(Json(response))
}

/// GET /api/auth/session
///
/// Resolves the caller from the bearer token. 404 if the user row is gone.
pub async fn session(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
) -> Result<impl IntoResponse, ApiError> {
    let service = AuthService::new(state.pool.clone(), state.jwt.clone());
    let user = service.current_user(auth.user_id).await?;
    Ok(Json(user.to_response()))
}

/// POST /api/auth/logout
///
/// Stateless acknowledgment. Tokens are discarded client-side.
pub async fn logout(
    Extension(auth): Extension<UserAuth>,
) -> Result<impl IntoResponse, ApiError> {
    info!(user_id = %auth.user_id, "User logged out");
    Ok(Json(MessageResponse::new("Logged out")))
}
