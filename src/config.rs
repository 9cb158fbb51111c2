use std::env;

use anyhow::Context;

pub const DEFAULT_SESSION_TTL_HOURS: i64 = 24;
/// One year; longer lifetimes overflow cookie and token expiry math.
pub const MAX_SESSION_TTL_HOURS: i64 = 8_760;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub session_ttl_hours: i64,
    pub cookie_secure: bool,
    pub ip_hash_salt: String,
    pub cors_allowed_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET is not set")?;
        let session_ttl_hours = parse_session_ttl(env::var("SESSION_TTL_HOURS").ok().as_deref());
        let cookie_secure = env::var("COOKIE_SECURE")
            .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);
        let ip_hash_salt = env::var("IP_HASH_SALT").context("IP_HASH_SALT is not set")?;
        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|o| !o.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();
        Ok(Self {
            port,
            database_url,
            host,
            jwt_secret,
            session_ttl_hours,
            cookie_secure,
            ip_hash_salt,
            cors_allowed_origins,
        })
    }
}

/// Unset or unparseable values fall back to the default; the rest are
/// clamped to `1..=MAX_SESSION_TTL_HOURS`.
pub fn parse_session_ttl(raw: Option<&str>) -> i64 {
    raw.and_then(|h| h.trim().parse::<i64>().ok())
        .map(|h| h.clamp(1, MAX_SESSION_TTL_HOURS))
        .unwrap_or(DEFAULT_SESSION_TTL_HOURS)
}
