pub mod error;
pub mod feed;
pub mod posts;
pub mod state;

use axum::{
    Router,
    routing::{any, get},
};

use crate::state::AppState;

/// All feed routes. Cross-cutting layers (CORS, tracing) are added by the binary.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", any(posts::dispatch))
        .route("/posts", get(posts::list_posts).post(posts::create_post))
        .route("/health", get(posts::health))
        .fallback(posts::not_found)
        .with_state(state)
}
