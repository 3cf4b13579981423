#![allow(async_fn_in_trait)]

use uuid::Uuid;

use critica_domain::pagination::PageRequest;

use crate::domain::types::{
    Category, Comment, Genre, NewComment, NewReview, NewTitle, Review, TitleChanges, TitleDetail,
    TitleQuery, User, UserPatch,
};
use crate::error::ApiServiceError;

/// Repository for accounts.
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiServiceError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, ApiServiceError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiServiceError>;

    /// List accounts ordered by username, optionally filtered by a
    /// case-insensitive username substring.
    async fn list(
        &self,
        search: Option<&str>,
        page: PageRequest,
    ) -> Result<Vec<User>, ApiServiceError>;

    async fn create(&self, user: &User) -> Result<(), ApiServiceError>;

    async fn update(&self, id: Uuid, patch: &UserPatch) -> Result<User, ApiServiceError>;

    async fn set_confirmation_code(&self, id: Uuid, code: &str) -> Result<(), ApiServiceError>;

    /// Delete an account. Returns `true` if a row was deleted.
    async fn delete(&self, id: Uuid) -> Result<bool, ApiServiceError>;
}

/// Repository for categories.
pub trait CategoryRepository: Send + Sync {
    async fn list(
        &self,
        search: Option<&str>,
        page: PageRequest,
    ) -> Result<Vec<Category>, ApiServiceError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, ApiServiceError>;

    async fn create(&self, name: &str, slug: &str) -> Result<Category, ApiServiceError>;

    /// Delete a category by slug. Returns `true` if a row was deleted.
    async fn delete_by_slug(&self, slug: &str) -> Result<bool, ApiServiceError>;
}

/// Repository for genres.
pub trait GenreRepository: Send + Sync {
    async fn list(
        &self,
        search: Option<&str>,
        page: PageRequest,
    ) -> Result<Vec<Genre>, ApiServiceError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Genre>, ApiServiceError>;

    async fn create(&self, name: &str, slug: &str) -> Result<Genre, ApiServiceError>;

    /// Delete a genre by slug. Returns `true` if a row was deleted.
    async fn delete_by_slug(&self, slug: &str) -> Result<bool, ApiServiceError>;
}

/// Repository for titles.
pub trait TitleRepository: Send + Sync {
    /// List titles with category, genres and rating resolved. An unknown
    /// category or genre slug in the filter yields an empty list.
    async fn list(
        &self,
        query: &TitleQuery,
        page: PageRequest,
    ) -> Result<Vec<TitleDetail>, ApiServiceError>;

    async fn find_detail(&self, id: i32) -> Result<Option<TitleDetail>, ApiServiceError>;

    /// Fetch just the name, for review responses and existence checks.
    async fn find_name(&self, id: i32) -> Result<Option<String>, ApiServiceError>;

    /// Insert a title and its genre links. Returns the new id.
    async fn create(&self, title: &NewTitle) -> Result<i32, ApiServiceError>;

    async fn update(&self, id: i32, changes: &TitleChanges) -> Result<(), ApiServiceError>;

    /// Delete a title. Returns `true` if a row was deleted.
    async fn delete(&self, id: i32) -> Result<bool, ApiServiceError>;
}

/// Repository for reviews.
pub trait ReviewRepository: Send + Sync {
    async fn list_by_title(
        &self,
        title_id: i32,
        page: PageRequest,
    ) -> Result<Vec<Review>, ApiServiceError>;

    /// Find a review only if it belongs to the given title.
    async fn find_scoped(
        &self,
        title_id: i32,
        review_id: i32,
    ) -> Result<Option<Review>, ApiServiceError>;

    async fn find_by_author(
        &self,
        title_id: i32,
        author_id: Uuid,
    ) -> Result<Option<Review>, ApiServiceError>;

    /// Insert a review. A second review by the same author for the same
    /// title fails with [`ApiServiceError::DuplicateReview`], even when the
    /// two inserts race.
    async fn create(&self, review: &NewReview) -> Result<Review, ApiServiceError>;

    async fn update(
        &self,
        review_id: i32,
        text: Option<&str>,
        score: Option<i16>,
    ) -> Result<Review, ApiServiceError>;

    /// Delete a review. Returns `true` if a row was deleted.
    async fn delete(&self, review_id: i32) -> Result<bool, ApiServiceError>;
}

/// Repository for comments.
pub trait CommentRepository: Send + Sync {
    async fn list_by_review(
        &self,
        review_id: i32,
        page: PageRequest,
    ) -> Result<Vec<Comment>, ApiServiceError>;

    /// Find a comment only if it belongs to the given review.
    async fn find_scoped(
        &self,
        review_id: i32,
        comment_id: i32,
    ) -> Result<Option<Comment>, ApiServiceError>;

    async fn create(&self, comment: &NewComment) -> Result<Comment, ApiServiceError>;

    async fn update(&self, comment_id: i32, text: &str) -> Result<Comment, ApiServiceError>;

    /// Delete a comment. Returns `true` if a row was deleted.
    async fn delete(&self, comment_id: i32) -> Result<bool, ApiServiceError>;
}

/// Port for delivering confirmation-code emails.
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), ApiServiceError>;
}
