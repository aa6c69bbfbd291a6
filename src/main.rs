use responder_api::config::AppConfig;
use responder_api::database::pool;
use responder_api::state::AppState;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = AppConfig::from_env();
    tracing::info!("starting responder API in {:?} mode", config.environment);

    let db_pool = pool::connect(&config.database)
        .unwrap_or_else(|e| panic!("failed to build database pool: {}", e));

    let state = AppState::new(config, db_pool);
    let app = responder_api::app(state);

    // Allow tests or deployments to override port via env
    let port = std::env::var("RESPONDER_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(5000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("responder API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}
