use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use critica_domain::pagination::{DEFAULT_LIMIT, PageRequest};

use crate::auth::Identity;
use crate::domain::types::Genre;
use crate::error::ApiServiceError;
use crate::handlers::category::LabelListQuery;
use crate::state::AppState;
use crate::usecase::genre::{
    CreateGenreInput, CreateGenreUseCase, DeleteGenreUseCase, ListGenresUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct GenreResponse {
    pub name: String,
    pub slug: String,
}

impl From<Genre> for GenreResponse {
    fn from(genre: Genre) -> Self {
        Self {
            name: genre.name,
            slug: genre.slug,
        }
    }
}

// ── GET /genres ──────────────────────────────────────────────────────────────

pub async fn list_genres(
    State(state): State<AppState>,
    Query(query): Query<LabelListQuery>,
) -> Result<Json<Vec<GenreResponse>>, ApiServiceError> {
    let usecase = ListGenresUseCase {
        repo: state.genre_repo(),
    };
    let page = PageRequest {
        limit: query.limit.unwrap_or(DEFAULT_LIMIT),
        offset: query.offset.unwrap_or(0),
    };
    let genres = usecase.execute(query.search.as_deref(), page).await?;
    Ok(Json(genres.into_iter().map(GenreResponse::from).collect()))
}

// ── POST /genres ─────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateGenreRequest {
    pub name: String,
    pub slug: String,
}

pub async fn create_genre(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<CreateGenreRequest>,
) -> Result<(StatusCode, Json<GenreResponse>), ApiServiceError> {
    let usecase = CreateGenreUseCase {
        repo: state.genre_repo(),
    };
    let genre = usecase
        .execute(
            &identity.actor,
            CreateGenreInput {
                name: body.name,
                slug: body.slug,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(genre.into())))
}

// ── DELETE /genres/{slug} ────────────────────────────────────────────────────

pub async fn delete_genre(
    identity: Identity,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<StatusCode, ApiServiceError> {
    let usecase = DeleteGenreUseCase {
        repo: state.genre_repo(),
    };
    usecase.execute(&identity.actor, &slug).await?;
    Ok(StatusCode::NO_CONTENT)
}
