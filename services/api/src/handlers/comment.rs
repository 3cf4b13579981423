use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use critica_domain::pagination::{DEFAULT_LIMIT, PageRequest};

use crate::auth::Identity;
use crate::domain::types::Comment;
use crate::error::ApiServiceError;
use crate::state::AppState;
use crate::usecase::comment::{
    CreateCommentInput, CreateCommentUseCase, DeleteCommentUseCase, GetCommentUseCase,
    ListCommentsUseCase, UpdateCommentInput, UpdateCommentUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct CommentResponse {
    pub id: i32,
    pub text: String,
    /// Username of the comment author.
    pub author: String,
    #[serde(serialize_with = "crate::serde_ext::to_rfc3339_ms")]
    pub pub_date: chrono::DateTime<chrono::Utc>,
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            text: comment.text,
            author: comment.author_username,
            pub_date: comment.pub_date,
        }
    }
}

#[derive(Deserialize)]
pub struct CommentListQuery {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

// ── GET /titles/{title_id}/reviews/{review_id}/comments ──────────────────────

pub async fn list_comments(
    State(state): State<AppState>,
    Path((title_id, review_id)): Path<(i32, i32)>,
    Query(query): Query<CommentListQuery>,
) -> Result<Json<Vec<CommentResponse>>, ApiServiceError> {
    let usecase = ListCommentsUseCase {
        comments: state.comment_repo(),
        reviews: state.review_repo(),
    };
    let page = PageRequest {
        limit: query.limit.unwrap_or(DEFAULT_LIMIT),
        offset: query.offset.unwrap_or(0),
    };
    let comments = usecase.execute(title_id, review_id, page).await?;
    Ok(Json(
        comments.into_iter().map(CommentResponse::from).collect(),
    ))
}

// ── POST /titles/{title_id}/reviews/{review_id}/comments ─────────────────────

#[derive(Deserialize)]
pub struct CreateCommentRequest {
    pub text: String,
}

pub async fn create_comment(
    identity: Identity,
    State(state): State<AppState>,
    Path((title_id, review_id)): Path<(i32, i32)>,
    Json(body): Json<CreateCommentRequest>,
) -> Result<(StatusCode, Json<CommentResponse>), ApiServiceError> {
    let usecase = CreateCommentUseCase {
        comments: state.comment_repo(),
        reviews: state.review_repo(),
    };
    let comment = usecase
        .execute(
            &identity.actor,
            CreateCommentInput {
                title_id,
                review_id,
                text: body.text,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(comment.into())))
}

// ── GET /titles/{title_id}/reviews/{review_id}/comments/{comment_id} ─────────

pub async fn get_comment(
    State(state): State<AppState>,
    Path((title_id, review_id, comment_id)): Path<(i32, i32, i32)>,
) -> Result<Json<CommentResponse>, ApiServiceError> {
    let usecase = GetCommentUseCase {
        comments: state.comment_repo(),
        reviews: state.review_repo(),
    };
    let comment = usecase.execute(title_id, review_id, comment_id).await?;
    Ok(Json(comment.into()))
}

// ── PATCH /titles/{title_id}/reviews/{review_id}/comments/{comment_id} ───────

#[derive(Deserialize)]
pub struct UpdateCommentRequest {
    pub text: Option<String>,
}

pub async fn update_comment(
    identity: Identity,
    State(state): State<AppState>,
    Path((title_id, review_id, comment_id)): Path<(i32, i32, i32)>,
    Json(body): Json<UpdateCommentRequest>,
) -> Result<Json<CommentResponse>, ApiServiceError> {
    let usecase = UpdateCommentUseCase {
        comments: state.comment_repo(),
        reviews: state.review_repo(),
    };
    let comment = usecase
        .execute(
            &identity.actor,
            title_id,
            review_id,
            comment_id,
            UpdateCommentInput { text: body.text },
        )
        .await?;
    Ok(Json(comment.into()))
}

// ── DELETE /titles/{title_id}/reviews/{review_id}/comments/{comment_id} ──────

pub async fn delete_comment(
    identity: Identity,
    State(state): State<AppState>,
    Path((title_id, review_id, comment_id)): Path<(i32, i32, i32)>,
) -> Result<StatusCode, ApiServiceError> {
    let usecase = DeleteCommentUseCase {
        comments: state.comment_repo(),
        reviews: state.review_repo(),
    };
    usecase
        .execute(&identity.actor, title_id, review_id, comment_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
