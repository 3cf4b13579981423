use critica_domain::pagination::PageRequest;

use crate::domain::policy::can_edit_authored;
use crate::domain::repository::{CommentRepository, ReviewRepository};
use crate::domain::types::{Actor, COMMENT_MAX_LEN, Comment, NewComment};
use crate::error::ApiServiceError;

fn validate_comment_text(text: &str) -> Result<(), ApiServiceError> {
    // The limit counts characters, not bytes.
    if text.is_empty() || text.chars().count() > COMMENT_MAX_LEN {
        return Err(ApiServiceError::InvalidText);
    }
    Ok(())
}

/// Comments are addressed as `/titles/{t}/reviews/{r}/comments/...`; the
/// review lookup scoped to the title covers both path segments, so a
/// mismatched pair is a 404 before any comment work happens.
async fn scoped_review<R: ReviewRepository>(
    reviews: &R,
    title_id: i32,
    review_id: i32,
) -> Result<(), ApiServiceError> {
    reviews
        .find_scoped(title_id, review_id)
        .await?
        .ok_or(ApiServiceError::ReviewNotFound)?;
    Ok(())
}

// ── ListComments ─────────────────────────────────────────────────────────────

pub struct ListCommentsUseCase<C: CommentRepository, R: ReviewRepository> {
    pub comments: C,
    pub reviews: R,
}

impl<C: CommentRepository, R: ReviewRepository> ListCommentsUseCase<C, R> {
    pub async fn execute(
        &self,
        title_id: i32,
        review_id: i32,
        page: PageRequest,
    ) -> Result<Vec<Comment>, ApiServiceError> {
        scoped_review(&self.reviews, title_id, review_id).await?;
        self.comments.list_by_review(review_id, page).await
    }
}

// ── GetComment ───────────────────────────────────────────────────────────────

pub struct GetCommentUseCase<C: CommentRepository, R: ReviewRepository> {
    pub comments: C,
    pub reviews: R,
}

impl<C: CommentRepository, R: ReviewRepository> GetCommentUseCase<C, R> {
    pub async fn execute(
        &self,
        title_id: i32,
        review_id: i32,
        comment_id: i32,
    ) -> Result<Comment, ApiServiceError> {
        scoped_review(&self.reviews, title_id, review_id).await?;
        self.comments
            .find_scoped(review_id, comment_id)
            .await?
            .ok_or(ApiServiceError::CommentNotFound)
    }
}

// ── CreateComment ────────────────────────────────────────────────────────────

pub struct CreateCommentInput {
    pub title_id: i32,
    pub review_id: i32,
    pub text: String,
}

pub struct CreateCommentUseCase<C: CommentRepository, R: ReviewRepository> {
    pub comments: C,
    pub reviews: R,
}

impl<C: CommentRepository, R: ReviewRepository> CreateCommentUseCase<C, R> {
    pub async fn execute(
        &self,
        actor: &Actor,
        input: CreateCommentInput,
    ) -> Result<Comment, ApiServiceError> {
        scoped_review(&self.reviews, input.title_id, input.review_id).await?;
        validate_comment_text(&input.text)?;
        self.comments
            .create(&NewComment {
                review_id: input.review_id,
                author_id: actor.id,
                text: input.text,
            })
            .await
    }
}

// ── UpdateComment ────────────────────────────────────────────────────────────

pub struct UpdateCommentInput {
    pub text: Option<String>,
}

pub struct UpdateCommentUseCase<C: CommentRepository, R: ReviewRepository> {
    pub comments: C,
    pub reviews: R,
}

impl<C: CommentRepository, R: ReviewRepository> UpdateCommentUseCase<C, R> {
    pub async fn execute(
        &self,
        actor: &Actor,
        title_id: i32,
        review_id: i32,
        comment_id: i32,
        input: UpdateCommentInput,
    ) -> Result<Comment, ApiServiceError> {
        scoped_review(&self.reviews, title_id, review_id).await?;
        let comment = self
            .comments
            .find_scoped(review_id, comment_id)
            .await?
            .ok_or(ApiServiceError::CommentNotFound)?;
        if !can_edit_authored(actor, comment.author_id) {
            return Err(ApiServiceError::Forbidden);
        }
        let Some(text) = input.text else {
            return Ok(comment);
        };
        validate_comment_text(&text)?;
        self.comments.update(comment_id, &text).await
    }
}

// ── DeleteComment ────────────────────────────────────────────────────────────

pub struct DeleteCommentUseCase<C: CommentRepository, R: ReviewRepository> {
    pub comments: C,
    pub reviews: R,
}

impl<C: CommentRepository, R: ReviewRepository> DeleteCommentUseCase<C, R> {
    pub async fn execute(
        &self,
        actor: &Actor,
        title_id: i32,
        review_id: i32,
        comment_id: i32,
    ) -> Result<(), ApiServiceError> {
        scoped_review(&self.reviews, title_id, review_id).await?;
        let comment = self
            .comments
            .find_scoped(review_id, comment_id)
            .await?
            .ok_or(ApiServiceError::CommentNotFound)?;
        if !can_edit_authored(actor, comment.author_id) {
            return Err(ApiServiceError::Forbidden);
        }
        self.comments.delete(comment_id).await?;
        Ok(())
    }
}
