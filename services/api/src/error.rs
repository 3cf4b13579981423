use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Api service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum ApiServiceError {
    #[error("user not found")]
    UserNotFound,
    #[error("title not found")]
    TitleNotFound,
    #[error("category not found")]
    CategoryNotFound,
    #[error("genre not found")]
    GenreNotFound,
    #[error("review not found")]
    ReviewNotFound,
    #[error("comment not found")]
    CommentNotFound,
    #[error("user already exists")]
    UserAlreadyExists,
    #[error("category already exists")]
    CategoryAlreadyExists,
    #[error("genre already exists")]
    GenreAlreadyExists,
    #[error("review already exists for this title and author")]
    DuplicateReview,
    #[error("invalid username")]
    InvalidUsername,
    #[error("invalid email")]
    InvalidEmail,
    #[error("invalid slug")]
    InvalidSlug,
    #[error("invalid name")]
    InvalidName,
    #[error("score must be between 1 and 10")]
    InvalidScore,
    #[error("year must not be in the future")]
    InvalidYear,
    #[error("invalid text")]
    InvalidText,
    #[error("unknown category slug")]
    UnknownCategory,
    #[error("unknown genre slug")]
    UnknownGenre,
    #[error("invalid confirmation code")]
    InvalidConfirmationCode,
    #[error("unauthorized")]
    Unauthorized,
    #[error("forbidden")]
    Forbidden,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl ApiServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::TitleNotFound => "TITLE_NOT_FOUND",
            Self::CategoryNotFound => "CATEGORY_NOT_FOUND",
            Self::GenreNotFound => "GENRE_NOT_FOUND",
            Self::ReviewNotFound => "REVIEW_NOT_FOUND",
            Self::CommentNotFound => "COMMENT_NOT_FOUND",
            Self::UserAlreadyExists => "USER_ALREADY_EXISTS",
            Self::CategoryAlreadyExists => "CATEGORY_ALREADY_EXISTS",
            Self::GenreAlreadyExists => "GENRE_ALREADY_EXISTS",
            Self::DuplicateReview => "DUPLICATE_REVIEW",
            Self::InvalidUsername => "INVALID_USERNAME",
            Self::InvalidEmail => "INVALID_EMAIL",
            Self::InvalidSlug => "INVALID_SLUG",
            Self::InvalidName => "INVALID_NAME",
            Self::InvalidScore => "INVALID_SCORE",
            Self::InvalidYear => "INVALID_YEAR",
            Self::InvalidText => "INVALID_TEXT",
            Self::UnknownCategory => "UNKNOWN_CATEGORY",
            Self::UnknownGenre => "UNKNOWN_GENRE",
            Self::InvalidConfirmationCode => "INVALID_CONFIRMATION_CODE",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for ApiServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::UserNotFound
            | Self::TitleNotFound
            | Self::CategoryNotFound
            | Self::GenreNotFound
            | Self::ReviewNotFound
            | Self::CommentNotFound => StatusCode::NOT_FOUND,
            Self::UserAlreadyExists | Self::CategoryAlreadyExists | Self::GenreAlreadyExists => {
                StatusCode::CONFLICT
            }
            Self::DuplicateReview
            | Self::InvalidUsername
            | Self::InvalidEmail
            | Self::InvalidSlug
            | Self::InvalidName
            | Self::InvalidScore
            | Self::InvalidYear
            | Self::InvalidText
            | Self::UnknownCategory
            | Self::UnknownGenre
            | Self::InvalidConfirmationCode => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, kind = "INTERNAL", "internal error");
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
