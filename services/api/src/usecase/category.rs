use critica_domain::pagination::PageRequest;

use crate::domain::policy::can_write_catalog;
use crate::domain::repository::CategoryRepository;
use crate::domain::types::{Actor, Category, LABEL_NAME_MAX_LEN, validate_name, validate_slug};
use crate::error::ApiServiceError;

// ── ListCategories ───────────────────────────────────────────────────────────

pub struct ListCategoriesUseCase<R: CategoryRepository> {
    pub repo: R,
}

impl<R: CategoryRepository> ListCategoriesUseCase<R> {
    pub async fn execute(
        &self,
        search: Option<&str>,
        page: PageRequest,
    ) -> Result<Vec<Category>, ApiServiceError> {
        self.repo.list(search, page).await
    }
}

// ── CreateCategory ───────────────────────────────────────────────────────────

pub struct CreateCategoryInput {
    pub name: String,
    pub slug: String,
}

pub struct CreateCategoryUseCase<R: CategoryRepository> {
    pub repo: R,
}

impl<R: CategoryRepository> CreateCategoryUseCase<R> {
    pub async fn execute(
        &self,
        actor: &Actor,
        input: CreateCategoryInput,
    ) -> Result<Category, ApiServiceError> {
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

// ── DeleteCategory ───────────────────────────────────────────────────────────

pub struct DeleteCategoryUseCase<R: CategoryRepository> {
    pub repo: R,
}

impl<R: CategoryRepository> DeleteCategoryUseCase<R> {
    pub async fn execute(&self, actor: &Actor, slug: &str) -> Result<(), ApiServiceError> {
        if !can_write_catalog(actor) {
            return Err(ApiServiceError::Forbidden);
        }
        let deleted = self.repo.delete_by_slug(slug).await?;
        if !deleted {
            return Err(ApiServiceError::CategoryNotFound);
        }
        Ok(())
    }
}
