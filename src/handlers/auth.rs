use std::sync::Arc;

use axum::{extract::State, Json};

use crate::{
    config::Config,
    db::{self, DbPool},
    error::AppError,
    models::user::{AuthResponse, LoginPayload},
    utils::{jwt::issue_token, security::verify_password},
};

// POST /admin/login
pub async fn login_handler(
    State(pool): State<DbPool>,
    State(config): State<Arc<Config>>,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<AuthResponse>, AppError> {
    let user = db::user::find_by_username(&pool, payload.username.trim())
        .await?
        .ok_or(AppError::Unauthorized)?;

    if !verify_password(&payload.password, &user.password_hash) {
        tracing::warn!("Failed login for {}", user.username);
        return Err(AppError::Unauthorized);
    }

    let token = issue_token(&user, &config.jwt_secret)?;

    Ok(Json(AuthResponse {
        token,
        token_type: "Bearer".to_string(),
    }))
}
