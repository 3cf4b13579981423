use anyhow::Context as _;

use critica_domain::pagination::PageRequest;

use crate::domain::policy::can_write_catalog;
use crate::domain::repository::{CategoryRepository, GenreRepository, TitleRepository};
use crate::domain::types::{
    Actor, NewTitle, TITLE_NAME_MAX_LEN, TitleChanges, TitleDetail, TitleQuery, validate_name,
    validate_year,
};
use crate::error::ApiServiceError;

// ── ListTitles ───────────────────────────────────────────────────────────────

pub struct ListTitlesUseCase<R: TitleRepository> {
    pub repo: R,
}

impl<R: TitleRepository> ListTitlesUseCase<R> {
    pub async fn execute(
        &self,
        query: &TitleQuery,
        page: PageRequest,
    ) -> Result<Vec<TitleDetail>, ApiServiceError> {
        self.repo.list(query, page).await
    }
}

// ── GetTitle ─────────────────────────────────────────────────────────────────

pub struct GetTitleUseCase<R: TitleRepository> {
    pub repo: R,
}

impl<R: TitleRepository> GetTitleUseCase<R> {
    pub async fn execute(&self, id: i32) -> Result<TitleDetail, ApiServiceError> {
        self.repo
            .find_detail(id)
            .await?
            .ok_or(ApiServiceError::TitleNotFound)
    }
}

// ── CreateTitle ──────────────────────────────────────────────────────────────

pub struct CreateTitleInput {
    pub name: String,
    pub year: i32,
    pub description: Option<String>,
    /// Category slug; must already exist.
    pub category: Option<String>,
    /// Genre slugs; each must already exist.
    pub genre: Vec<String>,
}

pub struct CreateTitleUseCase<T: TitleRepository, C: CategoryRepository, G: GenreRepository> {
    pub titles: T,
    pub categories: C,
    pub genres: G,
}

impl<T: TitleRepository, C: CategoryRepository, G: GenreRepository> CreateTitleUseCase<T, C, G> {
    pub async fn execute(
        &self,
        actor: &Actor,
        input: CreateTitleInput,
    ) -> Result<TitleDetail, ApiServiceError> {
        if !can_write_catalog(actor) {
            return Err(ApiServiceError::Forbidden);
        }
        if !validate_name(&input.name, TITLE_NAME_MAX_LEN) {
            return Err(ApiServiceError::InvalidName);
        }
        if !validate_year(input.year) {
            return Err(ApiServiceError::InvalidYear);
        }

        let category_id = match &input.category {
            Some(slug) => Some(
                self.categories
                    .find_by_slug(slug)
                    .await?
                    .ok_or(ApiServiceError::UnknownCategory)?
                    .id,
            ),
            None => None,
        };
        let genre_ids = self.resolve_genres(&input.genre).await?;

        let id = self
            .titles
            .create(&NewTitle {
                name: input.name,
                year: input.year,
                description: input.description,
                category_id,
                genre_ids,
            })
            .await?;

        let detail = self
            .titles
            .find_detail(id)
            .await?
            .context("created title missing")?;
        Ok(detail)
    }

    async fn resolve_genres(&self, slugs: &[String]) -> Result<Vec<i32>, ApiServiceError> {
        let mut genre_ids = Vec::with_capacity(slugs.len());
        for slug in slugs {
            let genre = self
                .genres
                .find_by_slug(slug)
                .await?
                .ok_or(ApiServiceError::UnknownGenre)?;
            // A repeated slug in the request maps to a single link row.
            if !genre_ids.contains(&genre.id) {
                genre_ids.push(genre.id);
            }
        }
        Ok(genre_ids)
    }
}

// ── UpdateTitle ──────────────────────────────────────────────────────────────

pub struct UpdateTitleInput {
    pub name: Option<String>,
    pub year: Option<i32>,
    pub description: Option<String>,
    pub category: Option<String>,
    /// `Some(vec![])` clears all genre links.
    pub genre: Option<Vec<String>>,
}

pub struct UpdateTitleUseCase<T: TitleRepository, C: CategoryRepository, G: GenreRepository> {
    pub titles: T,
    pub categories: C,
    pub genres: G,
}

impl<T: TitleRepository, C: CategoryRepository, G: GenreRepository> UpdateTitleUseCase<T, C, G> {
    pub async fn execute(
        &self,
        actor: &Actor,
        id: i32,
        input: UpdateTitleInput,
    ) -> Result<TitleDetail, ApiServiceError> {
        if !can_write_catalog(actor) {
            return Err(ApiServiceError::Forbidden);
        }
        self.titles
            .find_name(id)
            .await?
            .ok_or(ApiServiceError::TitleNotFound)?;

        if let Some(name) = &input.name {
            if !validate_name(name, TITLE_NAME_MAX_LEN) {
                return Err(ApiServiceError::InvalidName);
            }
        }
        if let Some(year) = input.year {
            if !validate_year(year) {
                return Err(ApiServiceError::InvalidYear);
            }
        }

        let category_id = match &input.category {
            Some(slug) => Some(
                self.categories
                    .find_by_slug(slug)
                    .await?
                    .ok_or(ApiServiceError::UnknownCategory)?
                    .id,
            ),
            None => None,
        };
        let genre_ids = match &input.genre {
            Some(slugs) => {
                let mut ids = Vec::with_capacity(slugs.len());
                for slug in slugs {
                    let genre = self
                        .genres
                        .find_by_slug(slug)
                        .await?
                        .ok_or(ApiServiceError::UnknownGenre)?;
                    if !ids.contains(&genre.id) {
                        ids.push(genre.id);
                    }
                }
                Some(ids)
            }
            None => None,
        };

        let changes = TitleChanges {
            name: input.name,
            year: input.year,
            description: input.description,
            category_id,
            genre_ids,
        };
        if !changes.is_empty() {
            self.titles.update(id, &changes).await?;
        }

        self.titles
            .find_detail(id)
            .await?
            .ok_or(ApiServiceError::TitleNotFound)
    }
}

// ── DeleteTitle ──────────────────────────────────────────────────────────────

pub struct DeleteTitleUseCase<R: TitleRepository> {
    pub repo: R,
}

impl<R: TitleRepository> DeleteTitleUseCase<R> {
    pub async fn execute(&self, actor: &Actor, id: i32) -> Result<(), ApiServiceError> {
        if !can_write_catalog(actor) {
            return Err(ApiServiceError::Forbidden);
        }
        let deleted = self.repo.delete(id).await?;
        if !deleted {
            return Err(ApiServiceError::TitleNotFound);
        }
        Ok(())
    }
}
