use chrono::Utc;
use uuid::Uuid;

use critica_domain::user::Role;

use crate::domain::repository::{Mailer, UserRepository};
use crate::domain::types::{User, generate_confirmation_code, validate_email, validate_username};
use crate::error::ApiServiceError;

pub const CONFIRMATION_SUBJECT: &str = "Confirmation code";

// ── Signup ───────────────────────────────────────────────────────────────────

pub struct SignupInput {
    pub email: String,
    pub username: String,
}

#[derive(Debug)]
pub struct SignupOutput {
    pub email: String,
    pub username: String,
}

/// Self-service registration. Repeating a signup with the same
/// `(username, email)` pair is not an error: it regenerates the code and
/// re-sends the email, so a lost message never locks anyone out.
pub struct SignupUseCase<R: UserRepository, M: Mailer> {
    pub repo: R,
    pub mailer: M,
}

impl<R: UserRepository, M: Mailer> SignupUseCase<R, M> {
    pub async fn execute(&self, input: SignupInput) -> Result<SignupOutput, ApiServiceError> {
        if !validate_username(&input.username) {
            return Err(ApiServiceError::InvalidUsername);
        }
        if !validate_email(&input.email) {
            return Err(ApiServiceError::InvalidEmail);
        }

        let by_username = self.repo.find_by_username(&input.username).await?;
        let by_email = self.repo.find_by_email(&input.email).await?;

        let (user_id, code) = match (by_username, by_email) {
            (Some(u), Some(e)) if u.id == e.id => {
                let code = generate_confirmation_code();
                self.repo.set_confirmation_code(u.id, &code).await?;
                (u.id, code)
            }
            (None, None) => {
                let now = Utc::now();
                let user = User {
                    id: Uuid::now_v7(),
                    username: input.username.clone(),
                    email: input.email.clone(),
                    first_name: String::new(),
                    last_name: String::new(),
                    bio: String::new(),
                    role: Role::User,
                    is_superuser: false,
                    confirmation_code: generate_confirmation_code(),
                    created_at: now,
                    updated_at: now,
                };
                self.repo.create(&user).await?;
                (user.id, user.confirmation_code)
            }
            // Username or email belongs to someone else.
            _ => return Err(ApiServiceError::UserAlreadyExists),
        };

        // Best effort. The code is already persisted, so a failed delivery
        // can be retried by signing up again.
        if let Err(e) = self
            .mailer
            .send(
                &input.email,
                CONFIRMATION_SUBJECT,
                &format!("Confirmation code: {code}!"),
            )
            .await
        {
            tracing::warn!(user_id = %user_id, error = %e, "confirmation email delivery failed");
        }

        Ok(SignupOutput {
            email: input.email,
            username: input.username,
        })
    }
}
