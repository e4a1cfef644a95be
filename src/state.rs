// src/state.rs

use crate::config::Config;
use axum::extract::FromRef;
use sqlx::PgPool;

/// Shared application state: the Postgres pool all handlers query through,
/// plus the runtime configuration (JWT secret and expiry, request timeout).
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Config,
}

/// Most handlers only touch the store; let them extract `State<PgPool>`
/// without carrying the whole state.
impl FromRef<AppState> for PgPool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

/// The auth handlers additionally need `State<Config>` for token signing.
impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
