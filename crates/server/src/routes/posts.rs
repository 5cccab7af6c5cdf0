use axum::{
    Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::{delete, get, post},
};
use db::models::post::{
    Comment, CommentWithReplies, CreatePost, Post, PostWithCounts, Reply,
};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, auth::AuthUser, error::ApiError};

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct LikeResponse {
    pub liked: bool,
    pub likes: i64,
}

#[derive(Debug, Clone, Deserialize, TS)]
pub struct CreateCommentRequest {
    pub content: String,
}

pub async fn list_posts(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<ResponseJson<ApiResponse<Vec<PostWithCounts>>>, ApiError> {
    let posts = Post::find_all_with_counts(&state.db.pool, user.id).await?;
    Ok(ResponseJson(ApiResponse::success(posts)))
}

pub async fn create_post(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    axum::Json(payload): axum::Json<CreatePost>,
) -> Result<ResponseJson<ApiResponse<Post>>, ApiError> {
    if payload.caption.trim().is_empty() && payload.image_url.is_none() {
        return Err(ApiError::BadRequest(
            "post needs a caption or an image".to_string(),
        ));
    }
    let post = Post::create(&state.db.pool, user.id, &payload, Uuid::new_v4()).await?;
    tracing::info!(post_id = %post.id, owner_id = %user.id, "post created");
    Ok(ResponseJson(ApiResponse::success(post)))
}

pub async fn delete_post(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(post_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let post = Post::find_by_id(&state.db.pool, post_id)
        .await?
        .ok_or(ApiError::NotFound("post"))?;
    if post.owner_id != user.id {
        return Err(ApiError::Forbidden);
    }
    Post::delete(&state.db.pool, post_id).await?;
    Ok(ResponseJson(ApiResponse::success(())))
}

pub async fn toggle_like(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(post_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<LikeResponse>>, ApiError> {
    Post::find_by_id(&state.db.pool, post_id)
        .await?
        .ok_or(ApiError::NotFound("post"))?;
    let (liked, likes) = Post::toggle_like(&state.db.pool, post_id, user.id).await?;
    Ok(ResponseJson(ApiResponse::success(LikeResponse {
        liked,
        likes,
    })))
}

pub async fn list_comments(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Path(post_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Vec<CommentWithReplies>>>, ApiError> {
    Post::find_by_id(&state.db.pool, post_id)
        .await?
        .ok_or(ApiError::NotFound("post"))?;
    let threads = Comment::find_by_post_id_with_replies(&state.db.pool, post_id).await?;
    Ok(ResponseJson(ApiResponse::success(threads)))
}

pub async fn create_comment(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(post_id): Path<Uuid>,
    axum::Json(payload): axum::Json<CreateCommentRequest>,
) -> Result<ResponseJson<ApiResponse<Comment>>, ApiError> {
    if payload.content.trim().is_empty() {
        return Err(ApiError::BadRequest("comment must not be empty".to_string()));
    }
    Post::find_by_id(&state.db.pool, post_id)
        .await?
        .ok_or(ApiError::NotFound("post"))?;
    let comment = Comment::create(
        &state.db.pool,
        post_id,
        user.id,
        payload.content.trim(),
        Uuid::new_v4(),
    )
    .await?;
    Ok(ResponseJson(ApiResponse::success(comment)))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(comment_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let comment = Comment::find_by_id(&state.db.pool, comment_id)
        .await?
        .ok_or(ApiError::NotFound("comment"))?;
    if comment.owner_id != user.id {
        return Err(ApiError::Forbidden);
    }
    Comment::delete(&state.db.pool, comment_id).await?;
    Ok(ResponseJson(ApiResponse::success(())))
}

pub async fn create_reply(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(comment_id): Path<Uuid>,
    axum::Json(payload): axum::Json<CreateCommentRequest>,
) -> Result<ResponseJson<ApiResponse<Reply>>, ApiError> {
    if payload.content.trim().is_empty() {
        return Err(ApiError::BadRequest("reply must not be empty".to_string()));
    }
    Comment::find_by_id(&state.db.pool, comment_id)
        .await?
        .ok_or(ApiError::NotFound("comment"))?;
    let reply = Reply::create(
        &state.db.pool,
        comment_id,
        user.id,
        payload.content.trim(),
        Uuid::new_v4(),
    )
    .await?;
    Ok(ResponseJson(ApiResponse::success(reply)))
}

pub async fn delete_reply(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(reply_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let reply = Reply::find_by_id(&state.db.pool, reply_id)
        .await?
        .ok_or(ApiError::NotFound("reply"))?;
    if reply.owner_id != user.id {
        return Err(ApiError::Forbidden);
    }
    Reply::delete(&state.db.pool, reply_id).await?;
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .nest(
            "/post",
            Router::new()
                .route("/", get(list_posts).post(create_post))
                .route("/{post_id}", delete(delete_post))
                .route("/{post_id}/like", post(toggle_like))
                .route("/{post_id}/comment", get(list_comments).post(create_comment)),
        )
        .route("/comment/{comment_id}", delete(delete_comment))
        .route("/comment/{comment_id}/reply", post(create_reply))
        .route("/reply/{reply_id}", delete(delete_reply))
}
