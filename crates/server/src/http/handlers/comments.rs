use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use domain::{Comment, CommentAuthor, CommentSubmission, CommentThread, PostSlug};
use serde::{Deserialize, Serialize};

use super::map_storage_error;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct AuthorPayload {
    pub name: String,
    pub email: String,
    pub website: Option<String>,
    pub user_id: Option<String>,
}

#[derive(Deserialize)]
pub struct SubmitCommentRequest {
    pub author: AuthorPayload,
    pub content: String,
    pub parent_id: Option<String>,
    pub mood: Option<String>,
    pub favorite_flower: Option<String>,

    pub challenge_response: String,
}

#[derive(Serialize)]
pub struct SubmitCommentResponse {
    pub id: String,
}

pub async fn list_comments(
    State(state): State<AppState>,
    Path(slug_str): Path<String>,
) -> Result<Json<Vec<CommentThread>>, (StatusCode, String)> {
    if PostSlug::new(&slug_str).is_err() {
        return Err((
            StatusCode::BAD_REQUEST,
            "Invalid post slug format".to_string(),
        ));
    }

    let threads = state
        .db
        .list_approved_for_post(&slug_str)
        .await
        .map_err(map_storage_error)?;

    Ok(Json(threads))
}

pub async fn post_comment(
    State(state): State<AppState>,
    Path(slug_str): Path<String>,
    headers: HeaderMap,
    Json(payload): Json<SubmitCommentRequest>,
) -> Result<Json<SubmitCommentResponse>, (StatusCode, String)> {
    let post_slug = PostSlug::new(slug_str).map_err(|e| (StatusCode::BAD_REQUEST, e))?;

    let parts: Vec<&str> = payload.challenge_response.split('|').collect();
    if parts.len() != 2 || !state.pow.verify(parts[0], parts[1]) {
        return Err((
            StatusCode::FORBIDDEN,
            "Invalid PoW Challenge".to_string(),
        ));
    }

    // 父评论必须存在且属于同一篇文章，否则回复树会断
    if let Some(ref parent_id) = payload.parent_id {
        let parent = state.db.get_comment(parent_id).await.map_err(|e| match e {
            storage::StorageError::CommentNotFound(_) => (
                StatusCode::BAD_REQUEST,
                format!("Parent comment not found: {}", parent_id),
            ),
            other => map_storage_error(other),
        })?;
        if parent.post_slug != post_slug {
            return Err((
                StatusCode::BAD_REQUEST,
                "Parent comment belongs to a different post".to_string(),
            ));
        }
    }

    let submission = CommentSubmission {
        post_slug,
        author: CommentAuthor {
            name: payload.author.name,
            email: payload.author.email,
            website: payload.author.website,
            user_id: payload.author.user_id,
        },
        content: payload.content,
        parent_id: payload.parent_id.clone(),
        mood: payload.mood,
        favorite_flower: payload.favorite_flower,
        ip_address: client_ip(&headers),
        user_agent: header_value(&headers, "user-agent"),
    };

    let comment = Comment::new(submission)
        .map_err(|e| (StatusCode::BAD_REQUEST, format!("{}: {}", e.field(), e)))?;

    state
        .db
        .insert_comment(&comment)
        .await
        .map_err(map_storage_error)?;

    if let Some(ref parent_id) = payload.parent_id {
        state
            .db
            .link_reply(parent_id, &comment.id)
            .await
            .map_err(map_storage_error)?;
    }

    // 软失败：即使被自动标成 spam，提交者也只看到成功回执
    Ok(Json(SubmitCommentResponse { id: comment.id }))
}

#[derive(Deserialize)]
pub struct ToggleLikeRequest {
    pub user_id: String,
}

#[derive(Serialize)]
pub struct ToggleLikeResponse {
    pub liked: bool,
    pub like_count: usize,
}

pub async fn toggle_like(
    State(state): State<AppState>,
    Path(comment_id): Path<String>,
    Json(payload): Json<ToggleLikeRequest>,
) -> Result<Json<ToggleLikeResponse>, (StatusCode, String)> {
    let (comment, liked) = state
        .db
        .toggle_like(&comment_id, &payload.user_id)
        .await
        .map_err(map_storage_error)?;

    Ok(Json(ToggleLikeResponse {
        liked,
        like_count: comment.likes.len(),
    }))
}

#[derive(Deserialize)]
pub struct EditCommentRequest {
    pub content: String,
}

pub async fn edit_comment(
    State(state): State<AppState>,
    Path(comment_id): Path<String>,
    Json(payload): Json<EditCommentRequest>,
) -> Result<Json<Comment>, (StatusCode, String)> {
    let comment = state
        .db
        .update_comment_content(&comment_id, payload.content)
        .await
        .map_err(map_storage_error)?;

    Ok(Json(comment))
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(String::from)
}

fn client_ip(headers: &HeaderMap) -> Option<String> {
    // 反向代理部署，取转发链里最早的地址
    header_value(headers, "x-forwarded-for")
        .and_then(|v| v.split(',').next().map(|s| s.trim().to_string()))
}
