use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::error::ApiServiceError;
use crate::state::AppState;
use crate::usecase::signup::{SignupInput, SignupUseCase};
use crate::usecase::token::{ExchangeTokenInput, ExchangeTokenUseCase};

// ── POST /auth/signup ────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub username: String,
}

#[derive(Serialize)]
pub struct SignupResponse {
    pub email: String,
    pub username: String,
}

pub async fn signup(
    State(state): State<AppState>,
    Json(body): Json<SignupRequest>,
) -> Result<Json<SignupResponse>, ApiServiceError> {
    let usecase = SignupUseCase {
        repo: state.user_repo(),
        mailer: state.mailer(),
    };
    let out = usecase
        .execute(SignupInput {
            email: body.email,
            username: body.username,
        })
        .await?;
    Ok(Json(SignupResponse {
        email: out.email,
        username: out.username,
    }))
}

// ── POST /auth/token ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ExchangeTokenRequest {
    pub username: String,
    pub confirmation_code: String,
}

#[derive(Serialize)]
pub struct TokenResponse {
    pub token: String,
}

pub async fn exchange_token(
    State(state): State<AppState>,
    Json(body): Json<ExchangeTokenRequest>,
) -> Result<Json<TokenResponse>, ApiServiceError> {
    let usecase = ExchangeTokenUseCase {
        repo: state.user_repo(),
        jwt_secret: state.jwt_secret.clone(),
    };
    let out = usecase
        .execute(ExchangeTokenInput {
            username: body.username,
            confirmation_code: body.confirmation_code,
        })
        .await?;
    Ok(Json(TokenResponse { token: out.token }))
}
