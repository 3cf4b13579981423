//! JWT access-token issuance and validation, plus the request extractor
//! that turns a `Authorization: Bearer` header into an [`Actor`].

use std::time::{SystemTime, UNIX_EPOCH};

use axum::extract::FromRequestParts;
use http::request::Parts;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use critica_domain::user::Role;

use crate::domain::types::{Actor, User};
use crate::error::ApiServiceError;
use crate::state::AppState;

/// Access-token lifetime: one day.
pub const ACCESS_TOKEN_TTL_SECS: u64 = 60 * 60 * 24;

/// JWT claims payload. The service is both the sole issuer and the sole
/// validator, so the claims carry everything authorization needs: role rank
/// and the superuser override. A role change takes effect at the next
/// token issuance.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    pub role: u8,
    pub su: bool,
    pub exp: u64,
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before UNIX epoch")
        .as_secs()
}

pub fn issue_access_token(user: &User, secret: &str) -> Result<String, ApiServiceError> {
    let claims = TokenClaims {
        sub: user.id.to_string(),
        role: user.role.as_u8(),
        su: user.is_superuser,
        exp: now_secs() + ACCESS_TOKEN_TTL_SECS,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| ApiServiceError::Internal(e.into()))
}

/// Validate a bearer token and return the caller's identity.
///
/// Validation: HS256, exp checked, required claims: `exp` + `sub`. Every
/// failure collapses to [`ApiServiceError::Unauthorized`]; the response
/// never says which part of the token was bad.
pub fn validate_access_token(token: &str, secret: &str) -> Result<Actor, ApiServiceError> {
    let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
    validation.validate_exp = true;
    validation.required_spec_claims.clear();
    validation.set_required_spec_claims(&["exp", "sub"]);

    let data = decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|_| ApiServiceError::Unauthorized)?;

    let id = data
        .claims
        .sub
        .parse::<Uuid>()
        .map_err(|_| ApiServiceError::Unauthorized)?;
    let role = Role::from_u8(data.claims.role).ok_or(ApiServiceError::Unauthorized)?;

    Ok(Actor {
        id,
        role,
        is_superuser: data.claims.su,
    })
}

/// Authenticated caller, extracted from the `Authorization: Bearer` header.
///
/// Returns 401 if the header is absent, not a bearer scheme, or the token
/// fails validation. Role enforcement (403) happens in the usecases.
#[derive(Debug, Clone)]
pub struct Identity {
    pub actor: Actor,
}

impl FromRequestParts<AppState> for Identity {
    type Rejection = ApiServiceError;

    // axum-core 0.5 defines this as `fn -> impl Future + Send` (not `async fn`).
    // In Rust 1.82+ precise capturing, `async fn` captures lifetimes differently,
    // causing E0195. Fix: extract values synchronously, return a 'static async move block.
    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let token = parts
            .headers
            .get(http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.strip_prefix("Bearer "))
            .map(str::to_owned);
        let secret = state.jwt_secret.clone();

        async move {
            let token = token.ok_or(ApiServiceError::Unauthorized)?;
            let actor = validate_access_token(&token, &secret)?;
            Ok(Self { actor })
        }
    }
}
