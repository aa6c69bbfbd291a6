use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Application configuration, built once at startup and passed to handlers
/// through shared state. Nothing reads the environment after this point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub feed: FeedConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Full connection URL. None when neither DATABASE_URL nor the discrete
    /// DB_* variables were provided; pool construction rejects that.
    pub url: Option<String>,
    pub max_connections: u32,
    pub connection_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// CSV file holding the annotated mock posts.
    pub source_path: PathBuf,
    /// Most-recent-N cap on the reshaped feed.
    pub max_posts: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Environment-based defaults first, then specific env var overrides
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        self.database.url = resolve_database_url();
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout_secs =
                v.parse().unwrap_or(self.database.connection_timeout_secs);
        }

        if let Ok(v) = env::var("FEED_SOURCE_PATH") {
            self.feed.source_path = PathBuf::from(v);
        }
        if let Ok(v) = env::var("FEED_MAX_POSTS") {
            self.feed.max_posts = v.parse().unwrap_or(self.feed.max_posts);
        }

        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
                connection_timeout_secs: 30,
            },
            feed: FeedConfig {
                source_path: PathBuf::from("data/mock_posts.csv"),
                max_posts: 15,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec![],
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            database: DatabaseConfig {
                url: None,
                max_connections: 20,
                connection_timeout_secs: 10,
            },
            ..Self::development()
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig {
                url: None,
                max_connections: 50,
                connection_timeout_secs: 5,
            },
            ..Self::development()
        }
    }
}

/// Prefer DATABASE_URL; fall back to the discrete DB_* variables some
/// deployments still export.
fn resolve_database_url() -> Option<String> {
    if let Ok(url) = env::var("DATABASE_URL") {
        return Some(url);
    }
    match (
        env::var("DB_HOST"),
        env::var("DB_USER"),
        env::var("DB_PASSWORD"),
        env::var("DB_DATABASE"),
    ) {
        (Ok(host), Ok(user), Ok(password), Ok(database)) => {
            crate::database::pool::url_from_parts(&host, &user, &password, &database).ok()
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn development_defaults() {
        let config = AppConfig::development();
        assert_eq!(config.feed.max_posts, 15);
        assert_eq!(config.database.max_connections, 10);
        assert!(config.security.enable_cors);
    }

    #[test]
    fn production_tightens_pool_settings() {
        let config = AppConfig::production();
        assert_eq!(config.database.max_connections, 50);
        assert_eq!(config.database.connection_timeout_secs, 5);
        assert_eq!(config.feed.max_posts, AppConfig::development().feed.max_posts);
    }
}
