use axum::{extract::FromRequestParts, http::header};
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use uuid::Uuid;

use crate::{
    dto::auth::Claims,
    error::AppError,
    middleware::session::get_current_user,
    models::{Role, User},
    state::AppState,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub role: Role,
    pub shop_id: Option<Uuid>,
}

impl TryFrom<&User> for AuthUser {
    type Error = AppError;

    fn try_from(user: &User) -> Result<Self, Self::Error> {
        let role = user
            .role
            .parse::<Role>()
            .map_err(|_| AppError::Internal(anyhow::anyhow!("user {} has unknown role", user.id)))?;
        Ok(Self {
            user_id: user.id,
            role,
            shop_id: user.shop_id,
        })
    }
}

pub fn ensure_role(user: &AuthUser, role: Role) -> Result<(), AppError> {
    if user.role != role {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

pub fn ensure_super_admin(user: &AuthUser) -> Result<(), AppError> {
    ensure_role(user, Role::SuperAdmin)
}

/// Shop admins act only on their own shop; returns that shop's id.
pub fn ensure_shop_admin(user: &AuthUser) -> Result<Uuid, AppError> {
    ensure_role(user, Role::ShopAdmin)?;
    user.shop_id.ok_or(AppError::Forbidden)
}

fn bearer_token(parts: &axum::http::request::Parts) -> Result<Option<String>, AppError> {
    let Some(auth_header) = parts.headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };
    let auth_str = auth_header
        .to_str()
        .map_err(|_| AppError::bad_request("Invalid Authorization header"))?;

    if !auth_str.starts_with("Bearer ") {
        return Err(AppError::bad_request("Invalid Authorization scheme"));
    }
    Ok(Some(auth_str.trim_start_matches("Bearer ").trim().to_string()))
}

pub fn decode_claims(token: &str, secret: &str) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::Unauthorized)
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(parts)? else {
            let session = parts
                .extensions
                .get::<Session>()
                .ok_or(AppError::Unauthorized)?;
            return get_current_user(session).await.ok_or(AppError::Unauthorized);
        };

        let claims = decode_claims(&token, &state.config.jwt_secret)?;

        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AppError::Unauthorized)?;
        let role = claims.role.parse::<Role>().map_err(|_| AppError::Unauthorized)?;
        let shop_id = claims
            .shop_id
            .as_deref()
            .map(Uuid::parse_str)
            .transpose()
            .map_err(|_| AppError::Unauthorized)?;

        Ok(AuthUser {
            user_id,
            role,
            shop_id,
        })
    }
}
