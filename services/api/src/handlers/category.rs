use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use critica_domain::pagination::{DEFAULT_LIMIT, PageRequest};

use crate::auth::Identity;
use crate::domain::types::Category;
use crate::error::ApiServiceError;
use crate::state::AppState;
use crate::usecase::category::{
    CreateCategoryInput, CreateCategoryUseCase, DeleteCategoryUseCase, ListCategoriesUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

/// Categories are addressed by slug; the numeric id never leaves the service.
#[derive(Serialize)]
pub struct CategoryResponse {
    pub name: String,
    pub slug: String,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            name: category.name,
            slug: category.slug,
        }
    }
}

#[derive(Deserialize)]
pub struct LabelListQuery {
    pub search: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

// ── GET /categories ──────────────────────────────────────────────────────────

pub async fn list_categories(
    State(state): State<AppState>,
    Query(query): Query<LabelListQuery>,
) -> Result<Json<Vec<CategoryResponse>>, ApiServiceError> {
    let usecase = ListCategoriesUseCase {
        repo: state.category_repo(),
    };
    let page = PageRequest {
        limit: query.limit.unwrap_or(DEFAULT_LIMIT),
        offset: query.offset.unwrap_or(0),
    };
    let categories = usecase.execute(query.search.as_deref(), page).await?;
    Ok(Json(
        categories.into_iter().map(CategoryResponse::from).collect(),
    ))
}

// ── POST /categories ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub slug: String,
}

pub async fn create_category(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<CategoryResponse>), ApiServiceError> {
    let usecase = CreateCategoryUseCase {
        repo: state.category_repo(),
    };
    let category = usecase
        .execute(
            &identity.actor,
            CreateCategoryInput {
                name: body.name,
                slug: body.slug,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(category.into())))
}

// ── DELETE /categories/{slug} ────────────────────────────────────────────────

pub async fn delete_category(
    identity: Identity,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<StatusCode, ApiServiceError> {
    let usecase = DeleteCategoryUseCase {
        repo: state.category_repo(),
    };
    usecase.execute(&identity.actor, &slug).await?;
    Ok(StatusCode::NO_CONTENT)
}
