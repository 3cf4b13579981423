use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use critica_domain::pagination::{DEFAULT_LIMIT, PageRequest};
use critica_domain::user::Role;

use crate::auth::Identity;
use crate::domain::types::{User, UserPatch};
use crate::error::ApiServiceError;
use crate::state::AppState;
use crate::usecase::user::{
    CreateUserInput, CreateUserUseCase, DeleteUserUseCase, GetMeUseCase, GetUserUseCase,
    ListUsersUseCase, UpdateMeUseCase, UpdateUserUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct UserResponse {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub bio: String,
    pub role: Role,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            bio: user.bio,
            role: user.role,
        }
    }
}

// ── GET /users ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UserListQuery {
    pub search: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

pub async fn list_users(
    identity: Identity,
    State(state): State<AppState>,
    Query(query): Query<UserListQuery>,
) -> Result<Json<Vec<UserResponse>>, ApiServiceError> {
    let usecase = ListUsersUseCase {
        repo: state.user_repo(),
    };
    let page = PageRequest {
        limit: query.limit.unwrap_or(DEFAULT_LIMIT),
        offset: query.offset.unwrap_or(0),
    };
    let users = usecase
        .execute(&identity.actor, query.search.as_deref(), page)
        .await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

// ── POST /users ──────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub role: Role,
}

pub async fn create_user(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiServiceError> {
    let usecase = CreateUserUseCase {
        repo: state.user_repo(),
    };
    let user = usecase
        .execute(
            &identity.actor,
            CreateUserInput {
                username: body.username,
                email: body.email,
                first_name: body.first_name,
                last_name: body.last_name,
                bio: body.bio,
                role: body.role,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

// ── GET /users/me ────────────────────────────────────────────────────────────

pub async fn get_me(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<Json<UserResponse>, ApiServiceError> {
    let usecase = GetMeUseCase {
        repo: state.user_repo(),
    };
    let user = usecase.execute(&identity.actor).await?;
    Ok(Json(user.into()))
}

// ── PATCH /users/me ──────────────────────────────────────────────────────────

/// No `role` field here: a caller cannot promote themselves, and an
/// attempted `role` key in the body is ignored rather than rejected.
#[derive(Deserialize)]
pub struct UpdateMeRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
}

pub async fn update_me(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<UpdateMeRequest>,
) -> Result<Json<UserResponse>, ApiServiceError> {
    let usecase = UpdateMeUseCase {
        repo: state.user_repo(),
    };
    let user = usecase
        .execute(
            &identity.actor,
            UserPatch {
                username: body.username,
                email: body.email,
                first_name: body.first_name,
                last_name: body.last_name,
                bio: body.bio,
                role: None,
            },
        )
        .await?;
    Ok(Json(user.into()))
}

// ── GET /users/{username} ────────────────────────────────────────────────────

pub async fn get_user(
    identity: Identity,
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<UserResponse>, ApiServiceError> {
    let usecase = GetUserUseCase {
        repo: state.user_repo(),
    };
    let user = usecase.execute(&identity.actor, &username).await?;
    Ok(Json(user.into()))
}

// ── PATCH /users/{username} ──────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub role: Option<Role>,
}

pub async fn update_user(
    identity: Identity,
    State(state): State<AppState>,
    Path(username): Path<String>,
    Json(body): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiServiceError> {
    let usecase = UpdateUserUseCase {
        repo: state.user_repo(),
    };
    let user = usecase
        .execute(
            &identity.actor,
            &username,
            UserPatch {
                username: body.username,
                email: body.email,
                first_name: body.first_name,
                last_name: body.last_name,
                bio: body.bio,
                role: body.role,
            },
        )
        .await?;
    Ok(Json(user.into()))
}

// ── DELETE /users/{username} ─────────────────────────────────────────────────

pub async fn delete_user(
    identity: Identity,
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<StatusCode, ApiServiceError> {
    let usecase = DeleteUserUseCase {
        repo: state.user_repo(),
    };
    usecase.execute(&identity.actor, &username).await?;
    Ok(StatusCode::NO_CONTENT)
}
