use axum::{extract::State, response::Json};

use crate::error::ApiError;
use crate::feed::{self, MockPost};
use crate::state::AppState;

/// GET /get_mock_posts - reshape the CSV source into the client feed.
///
/// The load is blocking file I/O over the whole file, so it runs on the
/// blocking pool rather than a worker thread.
pub async fn get_mock_posts(
    State(state): State<AppState>,
) -> Result<Json<Vec<MockPost>>, ApiError> {
    let path = state.config.feed.source_path.clone();
    let max_posts = state.config.feed.max_posts;

    let posts = tokio::task::spawn_blocking(move || feed::load_posts(&path, max_posts))
        .await
        .map_err(|e| {
            tracing::error!("feed task failed: {}", e);
            ApiError::internal("An internal server error occurred.")
        })??;

    Ok(Json(posts))
}
