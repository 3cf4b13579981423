use critica_domain::pagination::PageRequest;

use crate::domain::policy::can_edit_authored;
use crate::domain::repository::{ReviewRepository, TitleRepository};
use crate::domain::types::{Actor, NewReview, Review, validate_score};
use crate::error::ApiServiceError;

/// Review plus the name of the title it belongs to, for response shaping.
#[derive(Debug)]
pub struct ReviewOutput {
    pub title_name: String,
    pub review: Review,
}

#[derive(Debug)]
pub struct ReviewListOutput {
    pub title_name: String,
    pub reviews: Vec<Review>,
}

// ── ListReviews ──────────────────────────────────────────────────────────────

pub struct ListReviewsUseCase<R: ReviewRepository, T: TitleRepository> {
    pub reviews: R,
    pub titles: T,
}

impl<R: ReviewRepository, T: TitleRepository> ListReviewsUseCase<R, T> {
    pub async fn execute(
        &self,
        title_id: i32,
        page: PageRequest,
    ) -> Result<ReviewListOutput, ApiServiceError> {
        let title_name = self
            .titles
            .find_name(title_id)
            .await?
            .ok_or(ApiServiceError::TitleNotFound)?;
        let reviews = self.reviews.list_by_title(title_id, page).await?;
        Ok(ReviewListOutput {
            title_name,
            reviews,
        })
    }
}

// ── GetReview ────────────────────────────────────────────────────────────────

pub struct GetReviewUseCase<R: ReviewRepository, T: TitleRepository> {
    pub reviews: R,
    pub titles: T,
}

impl<R: ReviewRepository, T: TitleRepository> GetReviewUseCase<R, T> {
    pub async fn execute(
        &self,
        title_id: i32,
        review_id: i32,
    ) -> Result<ReviewOutput, ApiServiceError> {
        let title_name = self
            .titles
            .find_name(title_id)
            .await?
            .ok_or(ApiServiceError::TitleNotFound)?;
        let review = self
            .reviews
            .find_scoped(title_id, review_id)
            .await?
            .ok_or(ApiServiceError::ReviewNotFound)?;
        Ok(ReviewOutput { title_name, review })
    }
}

// ── CreateReview ─────────────────────────────────────────────────────────────

pub struct CreateReviewInput {
    pub title_id: i32,
    pub text: String,
    pub score: i16,
}

pub struct CreateReviewUseCase<R: ReviewRepository, T: TitleRepository> {
    pub reviews: R,
    pub titles: T,
}

impl<R: ReviewRepository, T: TitleRepository> CreateReviewUseCase<R, T> {
    pub async fn execute(
        &self,
        actor: &Actor,
        input: CreateReviewInput,
    ) -> Result<ReviewOutput, ApiServiceError> {
        let title_name = self
            .titles
            .find_name(input.title_id)
            .await?
            .ok_or(ApiServiceError::TitleNotFound)?;
        if input.text.is_empty() {
            return Err(ApiServiceError::InvalidText);
        }
        if !validate_score(input.score) {
            return Err(ApiServiceError::InvalidScore);
        }

        // Cheap pre-check for the common case; the unique index still
        // catches two requests racing past it.
        if self
            .reviews
            .find_by_author(input.title_id, actor.id)
            .await?
            .is_some()
        {
            return Err(ApiServiceError::DuplicateReview);
        }

        let review = self
            .reviews
            .create(&NewReview {
                title_id: input.title_id,
                author_id: actor.id,
                text: input.text,
                score: input.score,
            })
            .await?;
        Ok(ReviewOutput { title_name, review })
    }
}

// ── UpdateReview ─────────────────────────────────────────────────────────────

pub struct UpdateReviewInput {
    pub text: Option<String>,
    pub score: Option<i16>,
}

pub struct UpdateReviewUseCase<R: ReviewRepository, T: TitleRepository> {
    pub reviews: R,
    pub titles: T,
}

impl<R: ReviewRepository, T: TitleRepository> UpdateReviewUseCase<R, T> {
    pub async fn execute(
        &self,
        actor: &Actor,
        title_id: i32,
        review_id: i32,
        input: UpdateReviewInput,
    ) -> Result<ReviewOutput, ApiServiceError> {
        let title_name = self
            .titles
            .find_name(title_id)
            .await?
            .ok_or(ApiServiceError::TitleNotFound)?;
        let review = self
            .reviews
            .find_scoped(title_id, review_id)
            .await?
            .ok_or(ApiServiceError::ReviewNotFound)?;
        if !can_edit_authored(actor, review.author_id) {
            return Err(ApiServiceError::Forbidden);
        }

        if let Some(text) = &input.text {
            if text.is_empty() {
                return Err(ApiServiceError::InvalidText);
            }
        }
        if let Some(score) = input.score {
            if !validate_score(score) {
                return Err(ApiServiceError::InvalidScore);
            }
        }
        if input.text.is_none() && input.score.is_none() {
            return Ok(ReviewOutput { title_name, review });
        }

        let review = self
            .reviews
            .update(review_id, input.text.as_deref(), input.score)
            .await?;
        Ok(ReviewOutput { title_name, review })
    }
}

// ── DeleteReview ─────────────────────────────────────────────────────────────

pub struct DeleteReviewUseCase<R: ReviewRepository, T: TitleRepository> {
    pub reviews: R,
    pub titles: T,
}

impl<R: ReviewRepository, T: TitleRepository> DeleteReviewUseCase<R, T> {
    pub async fn execute(
        &self,
        actor: &Actor,
        title_id: i32,
        review_id: i32,
    ) -> Result<(), ApiServiceError> {
        self.titles
            .find_name(title_id)
            .await?
            .ok_or(ApiServiceError::TitleNotFound)?;
        let review = self
            .reviews
            .find_scoped(title_id, review_id)
            .await?
            .ok_or(ApiServiceError::ReviewNotFound)?;
        if !can_edit_authored(actor, review.author_id) {
            return Err(ApiServiceError::Forbidden);
        }
        self.reviews.delete(review_id).await?;
        Ok(())
    }
}
