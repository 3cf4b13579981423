use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use critica_domain::pagination::{DEFAULT_LIMIT, PageRequest};

use crate::auth::Identity;
use crate::domain::types::{TitleDetail, TitleQuery};
use crate::error::ApiServiceError;
use crate::handlers::category::CategoryResponse;
use crate::handlers::genre::GenreResponse;
use crate::state::AppState;
use crate::usecase::title::{
    CreateTitleInput, CreateTitleUseCase, DeleteTitleUseCase, GetTitleUseCase, ListTitlesUseCase,
    UpdateTitleInput, UpdateTitleUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct TitleResponse {
    pub id: i32,
    pub name: String,
    pub year: i32,
    /// Mean review score, `null` until the first review lands.
    pub rating: Option<f64>,
    pub description: Option<String>,
    pub genre: Vec<GenreResponse>,
    pub category: Option<CategoryResponse>,
}

impl From<TitleDetail> for TitleResponse {
    fn from(title: TitleDetail) -> Self {
        Self {
            id: title.id,
            name: title.name,
            year: title.year,
            rating: title.rating,
            description: title.description,
            genre: title.genres.into_iter().map(GenreResponse::from).collect(),
            category: title.category.map(CategoryResponse::from),
        }
    }
}

// ── GET /titles ──────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct TitleListQuery {
    pub category: Option<String>,
    pub genre: Option<String>,
    pub name: Option<String>,
    pub year: Option<i32>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

pub async fn list_titles(
    State(state): State<AppState>,
    Query(query): Query<TitleListQuery>,
) -> Result<Json<Vec<TitleResponse>>, ApiServiceError> {
    let usecase = ListTitlesUseCase {
        repo: state.title_repo(),
    };
    let page = PageRequest {
        limit: query.limit.unwrap_or(DEFAULT_LIMIT),
        offset: query.offset.unwrap_or(0),
    };
    let filter = TitleQuery {
        category: query.category,
        genre: query.genre,
        name: query.name,
        year: query.year,
    };
    let titles = usecase.execute(&filter, page).await?;
    Ok(Json(titles.into_iter().map(TitleResponse::from).collect()))
}

// ── POST /titles ─────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateTitleRequest {
    pub name: String,
    pub year: i32,
    pub description: Option<String>,
    pub category: Option<String>,
    #[serde(default)]
    pub genre: Vec<String>,
}

pub async fn create_title(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<CreateTitleRequest>,
) -> Result<(StatusCode, Json<TitleResponse>), ApiServiceError> {
    let usecase = CreateTitleUseCase {
        titles: state.title_repo(),
        categories: state.category_repo(),
        genres: state.genre_repo(),
    };
    let title = usecase
        .execute(
            &identity.actor,
            CreateTitleInput {
                name: body.name,
                year: body.year,
                description: body.description,
                category: body.category,
                genre: body.genre,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(title.into())))
}

// ── GET /titles/{title_id} ───────────────────────────────────────────────────

pub async fn get_title(
    State(state): State<AppState>,
    Path(title_id): Path<i32>,
) -> Result<Json<TitleResponse>, ApiServiceError> {
    let usecase = GetTitleUseCase {
        repo: state.title_repo(),
    };
    let title = usecase.execute(title_id).await?;
    Ok(Json(title.into()))
}

// ── PATCH /titles/{title_id} ─────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateTitleRequest {
    pub name: Option<String>,
    pub year: Option<i32>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub genre: Option<Vec<String>>,
}

pub async fn update_title(
    identity: Identity,
    State(state): State<AppState>,
    Path(title_id): Path<i32>,
    Json(body): Json<UpdateTitleRequest>,
) -> Result<Json<TitleResponse>, ApiServiceError> {
    let usecase = UpdateTitleUseCase {
        titles: state.title_repo(),
        categories: state.category_repo(),
        genres: state.genre_repo(),
    };
    let title = usecase
        .execute(
            &identity.actor,
            title_id,
            UpdateTitleInput {
                name: body.name,
                year: body.year,
                description: body.description,
                category: body.category,
                genre: body.genre,
            },
        )
        .await?;
    Ok(Json(title.into()))
}

// ── DELETE /titles/{title_id} ────────────────────────────────────────────────

pub async fn delete_title(
    identity: Identity,
    State(state): State<AppState>,
    Path(title_id): Path<i32>,
) -> Result<StatusCode, ApiServiceError> {
    let usecase = DeleteTitleUseCase {
        repo: state.title_repo(),
    };
    usecase.execute(&identity.actor, title_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
