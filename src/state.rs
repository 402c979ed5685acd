use crate::config::Config;
use axum::extract::FromRef;
use sqlx::SqlitePool;

/// Shared handler state. Handlers extract the pool directly via `FromRef`.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Config,
}

impl FromRef<AppState> for SqlitePool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}
