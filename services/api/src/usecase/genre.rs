use critica_domain::pagination::PageRequest;

use crate::domain::policy::can_write_catalog;
use crate::domain::repository::GenreRepository;
use crate::domain::types::{Actor, Genre, LABEL_NAME_MAX_LEN, validate_name, validate_slug};
use crate::error::ApiServiceError;

// ── ListGenres ───────────────────────────────────────────────────────────────

pub struct ListGenresUseCase<R: GenreRepository> {
    pub repo: R,
}

impl<R: GenreRepository> ListGenresUseCase<R> {
    pub async fn execute(
        &self,
        search: Option<&str>,
        page: PageRequest,
    ) -> Result<Vec<Genre>, ApiServiceError> {
        self.repo.list(search, page).await
    }
}

// ── CreateGenre ──────────────────────────────────────────────────────────────

pub struct CreateGenreInput {
    pub name: String,
    pub slug: String,
}

pub struct CreateGenreUseCase<R: GenreRepository> {
    pub repo: R,
}

impl<R: GenreRepository> CreateGenreUseCase<R> {
    pub async fn execute(
        &self,
        actor: &Actor,
        input: CreateGenreInput,
    ) -> Result<Genre, ApiServiceError> {
        if !can_write_catalog(actor) {
            return Err(ApiServiceError::Forbidden);
        }
        if !validate_name(&input.name, LABEL_NAME_MAX_LEN) {
            return Err(ApiServiceError::InvalidName);
        }
        if !validate_slug(&input.slug) {
            return Err(ApiServiceError::InvalidSlug);
        }
        self.repo.create(&input.name, &input.slug).await
    }
}

// ── DeleteGenre ──────────────────────────────────────────────────────────────

pub struct DeleteGenreUseCase<R: GenreRepository> {
    pub repo: R,
}

impl<R: GenreRepository> DeleteGenreUseCase<R> {
    pub async fn execute(&self, actor: &Actor, slug: &str) -> Result<(), ApiServiceError> {
        if !can_write_catalog(actor) {
            return Err(ApiServiceError::Forbidden);
        }
        let deleted = self.repo.delete_by_slug(slug).await?;
        if !deleted {
            return Err(ApiServiceError::GenreNotFound);
        }
        Ok(())
    }
}
