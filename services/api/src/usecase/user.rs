use chrono::Utc;
use uuid::Uuid;

use critica_domain::pagination::PageRequest;
use critica_domain::user::Role;

use crate::domain::policy::can_administer_users;
use crate::domain::repository::UserRepository;
use crate::domain::types::{
    Actor, User, UserPatch, generate_confirmation_code, validate_email, validate_profile_name,
    validate_username,
};
use crate::error::ApiServiceError;

fn validate_patch(patch: &UserPatch) -> Result<(), ApiServiceError> {
    if let Some(username) = &patch.username {
        if !validate_username(username) {
            return Err(ApiServiceError::InvalidUsername);
        }
    }
    if let Some(email) = &patch.email {
        if !validate_email(email) {
            return Err(ApiServiceError::InvalidEmail);
        }
    }
    if let Some(first_name) = &patch.first_name {
        if !validate_profile_name(first_name) {
            return Err(ApiServiceError::InvalidName);
        }
    }
    if let Some(last_name) = &patch.last_name {
        if !validate_profile_name(last_name) {
            return Err(ApiServiceError::InvalidName);
        }
    }
    Ok(())
}

// ── ListUsers (admin) ────────────────────────────────────────────────────────

pub struct ListUsersUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> ListUsersUseCase<R> {
    pub async fn execute(
        &self,
        actor: &Actor,
        search: Option<&str>,
        page: PageRequest,
    ) -> Result<Vec<User>, ApiServiceError> {
        if !can_administer_users(actor) {
            return Err(ApiServiceError::Forbidden);
        }
        self.repo.list(search, page).await
    }
}

// ── GetUser (admin) ──────────────────────────────────────────────────────────

pub struct GetUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> GetUserUseCase<R> {
    pub async fn execute(&self, actor: &Actor, username: &str) -> Result<User, ApiServiceError> {
        if !can_administer_users(actor) {
            return Err(ApiServiceError::Forbidden);
        }
        self.repo
            .find_by_username(username)
            .await?
            .ok_or(ApiServiceError::UserNotFound)
    }
}

// ── CreateUser (admin) ───────────────────────────────────────────────────────

pub struct CreateUserInput {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub bio: String,
    pub role: Role,
}

/// Admin-created accounts get a confirmation code like everyone else but no
/// email; the admin hands the code over out of band.
pub struct CreateUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> CreateUserUseCase<R> {
    pub async fn execute(
        &self,
        actor: &Actor,
        input: CreateUserInput,
    ) -> Result<User, ApiServiceError> {
        if !can_administer_users(actor) {
            return Err(ApiServiceError::Forbidden);
        }
        if !validate_username(&input.username) {
            return Err(ApiServiceError::InvalidUsername);
        }
        if !validate_email(&input.email) {
            return Err(ApiServiceError::InvalidEmail);
        }
        if !validate_profile_name(&input.first_name) || !validate_profile_name(&input.last_name) {
            return Err(ApiServiceError::InvalidName);
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::now_v7(),
            username: input.username,
            email: input.email,
            first_name: input.first_name,
            last_name: input.last_name,
            bio: input.bio,
            role: input.role,
            is_superuser: false,
            confirmation_code: generate_confirmation_code(),
            created_at: now,
            updated_at: now,
        };
        self.repo.create(&user).await?;
        Ok(user)
    }
}

// ── UpdateUser (admin) ───────────────────────────────────────────────────────

pub struct UpdateUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> UpdateUserUseCase<R> {
    pub async fn execute(
        &self,
        actor: &Actor,
        username: &str,
        patch: UserPatch,
    ) -> Result<User, ApiServiceError> {
        if !can_administer_users(actor) {
            return Err(ApiServiceError::Forbidden);
        }
        let user = self
            .repo
            .find_by_username(username)
            .await?
            .ok_or(ApiServiceError::UserNotFound)?;
        validate_patch(&patch)?;
        if patch.is_empty() {
            return Ok(user);
        }
        self.repo.update(user.id, &patch).await
    }
}

// ── DeleteUser (admin) ───────────────────────────────────────────────────────

pub struct DeleteUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> DeleteUserUseCase<R> {
    pub async fn execute(&self, actor: &Actor, username: &str) -> Result<(), ApiServiceError> {
        if !can_administer_users(actor) {
            return Err(ApiServiceError::Forbidden);
        }
        let user = self
            .repo
            .find_by_username(username)
            .await?
            .ok_or(ApiServiceError::UserNotFound)?;
        let deleted = self.repo.delete(user.id).await?;
        if !deleted {
            return Err(ApiServiceError::UserNotFound);
        }
        Ok(())
    }
}

// ── GetMe ────────────────────────────────────────────────────────────────────

pub struct GetMeUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> GetMeUseCase<R> {
    pub async fn execute(&self, actor: &Actor) -> Result<User, ApiServiceError> {
        self.repo
            .find_by_id(actor.id)
            .await?
            .ok_or(ApiServiceError::UserNotFound)
    }
}

// ── UpdateMe ─────────────────────────────────────────────────────────────────

/// Self-service profile edit. The handler never forwards a role change
/// here; the patch arrives with `role: None`.
pub struct UpdateMeUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> UpdateMeUseCase<R> {
    pub async fn execute(&self, actor: &Actor, patch: UserPatch) -> Result<User, ApiServiceError> {
        let user = self
            .repo
            .find_by_id(actor.id)
            .await?
            .ok_or(ApiServiceError::UserNotFound)?;
        validate_patch(&patch)?;
        if patch.is_empty() {
            return Ok(user);
        }
        self.repo.update(user.id, &patch).await
    }
}
