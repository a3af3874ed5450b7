use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{authorization::Bearer, Authorization};
use axum_extra::TypedHeader;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::{config::Config, error::AppError, models::user::{Claims, User, ROLE_ADMIN}};

const TOKEN_TTL_HOURS: i64 = 24;

pub fn issue_token(user: &User, secret: &str) -> Result<String, AppError> {
    let now = Utc::now();
    let expiration = now + Duration::hours(TOKEN_TTL_HOURS);

    let claims = Claims {
        sub: user.username.clone(),
        exp: expiration.timestamp() as usize,
        iat: now.timestamp() as usize,
        user_id: user.id,
        role: user.role.clone(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("token encoding failed: {e}")))
}

pub fn verify_token(token: &str, secret: &str) -> Option<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .ok()
}

/// Lets a request through only when it carries a valid bearer token whose
/// role is admin. The decoded claims are attached as a request extension.
pub async fn admin_middleware(
    State(config): State<Arc<Config>>,
    auth: Option<TypedHeader<Authorization<Bearer>>>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let TypedHeader(auth) = auth.ok_or(StatusCode::UNAUTHORIZED)?;
    let claims = verify_token(auth.token(), &config.jwt_secret).ok_or(StatusCode::UNAUTHORIZED)?;

    if claims.role != ROLE_ADMIN {
        tracing::warn!("User {} without admin role hit the admin surface", claims.sub);
        return Err(StatusCode::FORBIDDEN);
    }

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}
