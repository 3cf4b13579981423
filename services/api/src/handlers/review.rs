use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use critica_domain::pagination::{DEFAULT_LIMIT, PageRequest};

use crate::auth::Identity;
use crate::domain::types::Review;
use crate::error::ApiServiceError;
use crate::state::AppState;
use crate::usecase::review::{
    CreateReviewInput, CreateReviewUseCase, DeleteReviewUseCase, GetReviewUseCase,
    ListReviewsUseCase, ReviewOutput, UpdateReviewInput, UpdateReviewUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct ReviewResponse {
    pub id: i32,
    /// Name of the reviewed title.
    pub title: String,
    pub text: String,
    /// Username of the review author.
    pub author: String,
    pub score: i16,
    #[serde(serialize_with = "crate::serde_ext::to_rfc3339_ms")]
    pub pub_date: chrono::DateTime<chrono::Utc>,
}

impl ReviewResponse {
    fn from_parts(title_name: String, review: Review) -> Self {
        Self {
            id: review.id,
            title: title_name,
            text: review.text,
            author: review.author_username,
            score: review.score,
            pub_date: review.pub_date,
        }
    }
}

impl From<ReviewOutput> for ReviewResponse {
    fn from(out: ReviewOutput) -> Self {
        Self::from_parts(out.title_name, out.review)
    }
}

#[derive(Deserialize)]
pub struct ReviewListQuery {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

// ── GET /titles/{title_id}/reviews ───────────────────────────────────────────

pub async fn list_reviews(
    State(state): State<AppState>,
    Path(title_id): Path<i32>,
    Query(query): Query<ReviewListQuery>,
) -> Result<Json<Vec<ReviewResponse>>, ApiServiceError> {
    let usecase = ListReviewsUseCase {
        reviews: state.review_repo(),
        titles: state.title_repo(),
    };
    let page = PageRequest {
        limit: query.limit.unwrap_or(DEFAULT_LIMIT),
        offset: query.offset.unwrap_or(0),
    };
    let out = usecase.execute(title_id, page).await?;
    Ok(Json(
        out.reviews
            .into_iter()
            .map(|review| ReviewResponse::from_parts(out.title_name.clone(), review))
            .collect(),
    ))
}

// ── POST /titles/{title_id}/reviews ──────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateReviewRequest {
    pub text: String,
    pub score: i16,
}

pub async fn create_review(
    identity: Identity,
    State(state): State<AppState>,
    Path(title_id): Path<i32>,
    Json(body): Json<CreateReviewRequest>,
) -> Result<(StatusCode, Json<ReviewResponse>), ApiServiceError> {
    let usecase = CreateReviewUseCase {
        reviews: state.review_repo(),
        titles: state.title_repo(),
    };
    let out = usecase
        .execute(
            &identity.actor,
            CreateReviewInput {
                title_id,
                text: body.text,
                score: body.score,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(out.into())))
}

// ── GET /titles/{title_id}/reviews/{review_id} ───────────────────────────────

pub async fn get_review(
    State(state): State<AppState>,
    Path((title_id, review_id)): Path<(i32, i32)>,
) -> Result<Json<ReviewResponse>, ApiServiceError> {
    let usecase = GetReviewUseCase {
        reviews: state.review_repo(),
        titles: state.title_repo(),
    };
    let out = usecase.execute(title_id, review_id).await?;
    Ok(Json(out.into()))
}

// ── PATCH /titles/{title_id}/reviews/{review_id} ─────────────────────────────

#[derive(Deserialize)]
pub struct UpdateReviewRequest {
    pub text: Option<String>,
    pub score: Option<i16>,
}

pub async fn update_review(
    identity: Identity,
    State(state): State<AppState>,
    Path((title_id, review_id)): Path<(i32, i32)>,
    Json(body): Json<UpdateReviewRequest>,
) -> Result<Json<ReviewResponse>, ApiServiceError> {
    let usecase = UpdateReviewUseCase {
        reviews: state.review_repo(),
        titles: state.title_repo(),
    };
    let out = usecase
        .execute(
            &identity.actor,
            title_id,
            review_id,
            UpdateReviewInput {
                text: body.text,
                score: body.score,
            },
        )
        .await?;
    Ok(Json(out.into()))
}

// ── DELETE /titles/{title_id}/reviews/{review_id} ────────────────────────────

pub async fn delete_review(
    identity: Identity,
    State(state): State<AppState>,
    Path((title_id, review_id)): Path<(i32, i32)>,
) -> Result<StatusCode, ApiServiceError> {
    let usecase = DeleteReviewUseCase {
        reviews: state.review_repo(),
        titles: state.title_repo(),
    };
    usecase.execute(&identity.actor, title_id, review_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
