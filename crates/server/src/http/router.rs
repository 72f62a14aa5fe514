use super::handlers::{admin, challenge, comments};
use crate::state::AppState;
use axum::{
    http::{HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

pub fn build_router(state: AppState, allowed_origins: &str) -> Router {
    let cors = if allowed_origins == "*" {
        CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::PUT])
            .allow_origin(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .filter_map(|s| s.parse::<HeaderValue>().ok())
            .collect();

        if origins.is_empty() {
            tracing::warn!("CORS config is invalid or empty, falling back to allow ANY.");
            CorsLayer::new()
                .allow_methods([Method::GET, Method::POST, Method::PUT])
                .allow_origin(Any)
                .allow_headers(Any)
        } else {
            tracing::info!("CORS enabled for origins: {:?}", origins);
            CorsLayer::new()
                .allow_methods([Method::GET, Method::POST, Method::PUT])
                .allow_origin(origins)
                .allow_headers(Any)
        }
    };

    Router::new()
        .route("/api/challenge", get(challenge::get_challenge))
        .route(
            "/api/posts/:slug/comments",
            get(comments::list_comments).post(comments::post_comment),
        )
        .route("/api/comments/:id/like", post(comments::toggle_like))
        .route("/api/comments/:id", put(comments::edit_comment))
        .route("/api/admin/comments/pending", get(admin::list_pending))
        .route(
            "/api/admin/comments/:id/:action",
            post(admin::moderate_comment),
        )
        .route("/api/admin/posts/:slug", put(admin::upsert_post))
        .layer(cors)
        .with_state(state)
}
