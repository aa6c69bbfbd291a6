pub mod config;
pub mod database;
pub mod error;
pub mod feed;
pub mod handlers;
pub mod state;

use axum::extract::State;
use axum::http::HeaderValue;
use axum::routing::{delete, get, post, put};
use axum::Router;
use serde_json::{json, Value};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::SecurityConfig;
use crate::database::pool;
use crate::state::AppState;

/// Build the full router. Lives in the library so the server binary and the
/// integration tests share one wiring.
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.security);

    let router = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        // Authentication
        .route("/login", post(handlers::auth::login))
        // Account management
        .route("/get_user_details", get(handlers::users::get_user_details))
        .route("/get_all_users", get(handlers::users::get_all_users))
        .route("/add_user", post(handlers::users::add_user))
        .route("/update_user/:id", put(handlers::users::update_user))
        .route("/delete_users", delete(handlers::users::delete_users))
        // Feed
        .route("/get_mock_posts", get(handlers::feed::get_mock_posts));

    let router = match cors {
        Some(cors) => router.layer(cors),
        None => router,
    };

    router.layer(TraceLayer::new_for_http()).with_state(state)
}

/// CORS policy from the security config: disabled, permissive when no origin
/// list is configured, or restricted to the configured origins.
fn cors_layer(security: &SecurityConfig) -> Option<CorsLayer> {
    if !security.enable_cors {
        return None;
    }
    if security.cors_origins.is_empty() {
        return Some(CorsLayer::permissive());
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any),
    )
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "Responder API",
            "version": version,
            "endpoints": {
                "login": "POST /login",
                "user_details": "GET /get_user_details?email=",
                "all_users": "GET /get_all_users",
                "add_user": "POST /add_user",
                "update_user": "PUT /update_user/:id",
                "delete_users": "DELETE /delete_users",
                "mock_posts": "GET /get_mock_posts",
            }
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match pool::ping(&state.pool).await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "success": true,
                "data": { "status": "ok", "timestamp": now, "database": "ok" }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": { "status": "degraded", "timestamp": now, "database_error": e.to_string() }
            })),
        ),
    }
}
