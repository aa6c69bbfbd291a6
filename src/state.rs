use sqlx::PgPool;
use std::sync::Arc;

use crate::config::AppConfig;

/// Shared state handed to every handler: the startup configuration and the
/// connection pool. Cloning is cheap; both members are reference-counted.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub pool: PgPool,
}

impl AppState {
    pub fn new(config: AppConfig, pool: PgPool) -> Self {
        Self {
            config: Arc::new(config),
            pool,
        }
    }
}
