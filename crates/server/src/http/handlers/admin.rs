use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use domain::{Comment, PendingComment, PostSlug};
use serde::Deserialize;

use super::map_storage_error;
use crate::state::AppState;

fn require_admin(headers: &HeaderMap, admin_token: &str) -> Result<(), (StatusCode, String)> {
    let auth_header = headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or((
            StatusCode::UNAUTHORIZED,
            "Missing Authorization header".to_string(),
        ))?;
    let expected_token = format!("Bearer {}", admin_token);
    if auth_header != expected_token {
        return Err((StatusCode::FORBIDDEN, "Invalid Admin Token".to_string()));
    }
    Ok(())
}

pub async fn list_pending(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<PendingComment>>, (StatusCode, String)> {
    require_admin(&headers, &state.admin_token)?;

    let queue = state.db.list_pending().await.map_err(map_storage_error)?;
    Ok(Json(queue))
}

#[derive(Deserialize)]
pub struct ModerateRequest {
    pub moderator_id: String,
    pub reason: Option<String>,
}

/// action 是 approve / reject / spam 之一；任意当前状态都接受迁移
pub async fn moderate_comment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((comment_id, action)): Path<(String, String)>,
    Json(payload): Json<ModerateRequest>,
) -> Result<Json<Comment>, (StatusCode, String)> {
    require_admin(&headers, &state.admin_token)?;

    let result = match action.as_str() {
        "approve" => {
            state
                .db
                .approve_comment(&comment_id, &payload.moderator_id, payload.reason)
                .await
        }
        "reject" => {
            state
                .db
                .reject_comment(&comment_id, &payload.moderator_id, payload.reason)
                .await
        }
        "spam" => {
            state
                .db
                .mark_comment_spam(&comment_id, &payload.moderator_id, payload.reason)
                .await
        }
        other => {
            return Err((
                StatusCode::BAD_REQUEST,
                format!("Unknown moderation action: {}", other),
            ))
        }
    };

    let comment = result.map_err(map_storage_error)?;
    tracing::info!(
        "comment {} moderated to {} by {}",
        comment.id,
        comment.status,
        payload.moderator_id
    );
    Ok(Json(comment))
}

#[derive(Deserialize)]
pub struct UpsertPostRequest {
    pub title: String,
}

pub async fn upsert_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(slug_str): Path<String>,
    Json(payload): Json<UpsertPostRequest>,
) -> Result<Json<&'static str>, (StatusCode, String)> {
    require_admin(&headers, &state.admin_token)?;

    let slug = PostSlug::new(slug_str).map_err(|e| (StatusCode::BAD_REQUEST, e))?;
    state
        .db
        .upsert_post(slug.as_str(), &payload.title)
        .await
        .map_err(map_storage_error)?;

    Ok(Json("Updated"))
}
