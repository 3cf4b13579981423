use crate::auth::issue_access_token;
use crate::domain::repository::UserRepository;
use crate::error::ApiServiceError;

// ── ExchangeToken ────────────────────────────────────────────────────────────

pub struct ExchangeTokenInput {
    pub username: String,
    pub confirmation_code: String,
}

#[derive(Debug)]
pub struct ExchangeTokenOutput {
    pub token: String,
}

/// Trade a confirmation code for a JWT access token.
///
/// An unknown username is 404, a wrong code for a known username is 400.
/// The code stays valid after the exchange; a new signup replaces it.
pub struct ExchangeTokenUseCase<R: UserRepository> {
    pub repo: R,
    pub jwt_secret: String,
}

impl<R: UserRepository> ExchangeTokenUseCase<R> {
    pub async fn execute(
        &self,
        input: ExchangeTokenInput,
    ) -> Result<ExchangeTokenOutput, ApiServiceError> {
        let user = self
            .repo
            .find_by_username(&input.username)
            .await?
            .ok_or(ApiServiceError::UserNotFound)?;

        if user.confirmation_code != input.confirmation_code {
            return Err(ApiServiceError::InvalidConfirmationCode);
        }

        let token = issue_access_token(&user, &self.jwt_secret)?;
        Ok(ExchangeTokenOutput { token })
    }
}
