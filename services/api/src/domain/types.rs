use chrono::{DateTime, Utc};
use rand::RngExt;
use uuid::Uuid;

use critica_domain::user::Role;

/// Maximum username length.
pub const USERNAME_MAX_LEN: usize = 30;

/// Maximum email length.
pub const EMAIL_MAX_LEN: usize = 254;

/// Maximum first/last name length.
pub const PROFILE_NAME_MAX_LEN: usize = 150;

/// Maximum slug length for categories and genres.
pub const SLUG_MAX_LEN: usize = 50;

/// Maximum name length for categories and genres.
pub const LABEL_NAME_MAX_LEN: usize = 150;

/// Maximum title name length.
pub const TITLE_NAME_MAX_LEN: usize = 200;

/// Maximum comment text length.
pub const COMMENT_MAX_LEN: usize = 300;

/// Review score bounds (inclusive).
pub const SCORE_MIN: i16 = 1;
pub const SCORE_MAX: i16 = 10;

/// Confirmation code length in characters.
pub const CONFIRMATION_CODE_LEN: usize = 24;

/// Charset for generating confirmation codes (uppercase alphanumeric).
const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Generate a fresh confirmation code. Regenerated on every signup.
pub fn generate_confirmation_code() -> String {
    let mut rng = rand::rng();
    (0..CONFIRMATION_CODE_LEN)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect()
}

// ── Accounts ─────────────────────────────────────────────────────────────────

/// Account record with role, profile fields and the current confirmation code.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub bio: String,
    pub role: Role,
    pub is_superuser: bool,
    pub confirmation_code: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update to a user record. `None` fields are left unchanged.
/// `role` stays `None` for self-service edits.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub role: Option<Role>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.email.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
            && self.bio.is_none()
            && self.role.is_none()
    }
}

/// Authenticated caller identity, decoded from the access token.
#[derive(Debug, Clone, Copy)]
pub struct Actor {
    pub id: Uuid,
    pub role: Role,
    pub is_superuser: bool,
}

impl Actor {
    /// Admin role or the superuser override.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin || self.is_superuser
    }

    /// Moderator rank or above, or the superuser override.
    pub fn is_moderator(&self) -> bool {
        self.role >= Role::Moderator || self.is_superuser
    }
}

impl From<&User> for Actor {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            role: user.role,
            is_superuser: user.is_superuser,
        }
    }
}

// ── Catalog ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone)]
pub struct Genre {
    pub id: i32,
    pub name: String,
    pub slug: String,
}

/// Title with its resolved category, genres and computed rating.
#[derive(Debug, Clone)]
pub struct TitleDetail {
    pub id: i32,
    pub name: String,
    pub year: i32,
    pub description: Option<String>,
    pub category: Option<Category>,
    pub genres: Vec<Genre>,
    pub rating: Option<f64>,
}

/// Title row to insert, with category and genres already resolved to ids.
#[derive(Debug, Clone)]
pub struct NewTitle {
    pub name: String,
    pub year: i32,
    pub description: Option<String>,
    pub category_id: Option<i32>,
    pub genre_ids: Vec<i32>,
}

/// Partial update to a title. `None` fields are left unchanged;
/// `genre_ids: Some(vec![])` clears all genre links.
#[derive(Debug, Clone, Default)]
pub struct TitleChanges {
    pub name: Option<String>,
    pub year: Option<i32>,
    pub description: Option<String>,
    pub category_id: Option<i32>,
    pub genre_ids: Option<Vec<i32>>,
}

impl TitleChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.year.is_none()
            && self.description.is_none()
            && self.category_id.is_none()
            && self.genre_ids.is_none()
    }
}

/// List filters for titles. Slugs are resolved by the repository; an unknown
/// slug yields an empty result, not an error.
#[derive(Debug, Clone, Default)]
pub struct TitleQuery {
    pub category: Option<String>,
    pub genre: Option<String>,
    pub name: Option<String>,
    pub year: Option<i32>,
}

// ── Reviews and comments ─────────────────────────────────────────────────────

/// Review with its author's username joined in.
#[derive(Debug, Clone)]
pub struct Review {
    pub id: i32,
    pub title_id: i32,
    pub author_id: Uuid,
    pub author_username: String,
    pub text: String,
    pub score: i16,
    pub pub_date: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewReview {
    pub title_id: i32,
    pub author_id: Uuid,
    pub text: String,
    pub score: i16,
}

/// Comment with its author's username joined in.
#[derive(Debug, Clone)]
pub struct Comment {
    pub id: i32,
    pub review_id: i32,
    pub author_id: Uuid,
    pub author_username: String,
    pub text: String,
    pub pub_date: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub review_id: i32,
    pub author_id: Uuid,
    pub text: String,
}

/// Arithmetic mean of review scores. `None` when there are no reviews,
/// never zero.
pub fn mean_rating(scores: &[i16]) -> Option<f64> {
    if scores.is_empty() {
        return None;
    }
    let sum: i64 = scores.iter().map(|s| i64::from(*s)).sum();
    Some(sum as f64 / scores.len() as f64)
}

// ── Validation ───────────────────────────────────────────────────────────────

/// Validate a username: 1-30 chars of `[A-Za-z0-9@.+_-]`.
/// Reserved: "me" (collides with the self-service route).
pub fn validate_username(username: &str) -> bool {
    if username.is_empty() || username.len() > USERNAME_MAX_LEN {
        return false;
    }
    if username == "me" {
        return false;
    }
    username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
}

/// Validate an email address: `local@domain` with non-empty sides.
/// Intentionally loose; delivery failures are handled downstream.
pub fn validate_email(email: &str) -> bool {
    if email.is_empty() || email.len() > EMAIL_MAX_LEN {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !domain.contains('@')
        }
        None => false,
    }
}

/// Validate a slug: 1-50 chars of `[A-Za-z0-9_-]`.
pub fn validate_slug(slug: &str) -> bool {
    if slug.is_empty() || slug.len() > SLUG_MAX_LEN {
        return false;
    }
    slug.chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Validate a display name against a per-resource length limit.
/// The limit counts characters, not bytes; names are not ASCII-only.
pub fn validate_name(name: &str, max_len: usize) -> bool {
    !name.is_empty() && name.chars().count() <= max_len
}

/// Validate a profile name (first/last). May be empty; the length cap
/// counts characters.
pub fn validate_profile_name(name: &str) -> bool {
    name.chars().count() <= PROFILE_NAME_MAX_LEN
}

pub fn validate_score(score: i16) -> bool {
    (SCORE_MIN..=SCORE_MAX).contains(&score)
}

/// Validate a release year: any past year up to the current UTC year.
pub fn validate_year(year: i32) -> bool {
    use chrono::Datelike;
    year <= Utc::now().year()
}
