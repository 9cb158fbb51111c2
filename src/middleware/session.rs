//! Server-side sessions. The cookie carries only an opaque session id; the
//! signed-in user lives in the `tower_sessions.session` table, so logout
//! revokes it immediately.

use sqlx::PgPool;
use tower_sessions::{
    Expiry, Session, SessionManagerLayer, SessionStore,
    cookie::{SameSite, time::Duration},
};
use tower_sessions_sqlx_store::PostgresStore;

use crate::{config::AppConfig, error::AppError, middleware::auth::AuthUser};

pub const SESSION_COOKIE_NAME: &str = "session";

pub mod session_keys {
    pub const CURRENT_USER: &str = "current_user";
}

/// Session layer backed by Postgres.
pub fn create_session_layer(
    pool: &PgPool,
    config: &AppConfig,
) -> SessionManagerLayer<PostgresStore> {
    session_layer(PostgresStore::new(pool.clone()), config)
}

/// Cookie settings shared by every store.
pub fn session_layer<S: SessionStore + Clone>(
    store: S,
    config: &AppConfig,
) -> SessionManagerLayer<S> {
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(Duration::hours(config.session_ttl_hours)))
        .with_secure(config.cookie_secure)
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

pub async fn get_current_user(session: &Session) -> Option<AuthUser> {
    session
        .get::<AuthUser>(session_keys::CURRENT_USER)
        .await
        .ok()
        .flatten()
}

/// Store the user under a fresh session id.
pub async fn set_current_user(session: &Session, user: &AuthUser) -> Result<(), AppError> {
    session.cycle_id().await.map_err(|e| {
        tracing::error!(error = %e, "failed to cycle session id");
        AppError::Internal(anyhow::anyhow!("session store unavailable"))
    })?;
    session
        .insert(session_keys::CURRENT_USER, user)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "failed to store session user");
            AppError::Internal(anyhow::anyhow!("session store unavailable"))
        })
}

/// Delete the session record and expire the cookie.
pub async fn end_session(session: &Session) {
    if let Err(e) = session.flush().await {
        tracing::error!(error = %e, "failed to flush session");
    }
}
