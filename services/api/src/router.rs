use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{delete, get, patch, post},
};
use tower_http::request_id::{MakeRequestId, RequestId, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::handlers::{
    auth::{exchange_token, signup},
    category::{create_category, delete_category, list_categories},
    comment::{create_comment, delete_comment, get_comment, list_comments, update_comment},
    genre::{create_genre, delete_genre, list_genres},
    review::{create_review, delete_review, get_review, list_reviews, update_review},
    title::{create_title, delete_title, get_title, list_titles, update_title},
    user::{create_user, delete_user, get_me, get_user, list_users, update_me, update_user},
};
use crate::state::AppState;

// ── Health ───────────────────────────────────────────────────────────────────

/// Handler for `GET /healthz` — liveness check.
async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// Handler for `GET /readyz` — readiness check; verifies the database is
/// reachable.
async fn readyz(State(state): State<AppState>) -> StatusCode {
    match state.db.ping().await {
        Ok(()) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

// ── Request id ───────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
struct MakeUuidRequestId;

impl MakeRequestId for MakeUuidRequestId {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        Some(RequestId::new(id.parse().unwrap()))
    }
}

fn request_id_layer() -> SetRequestIdLayer<MakeUuidRequestId> {
    SetRequestIdLayer::new(
        axum::http::HeaderName::from_static("x-request-id"),
        MakeUuidRequestId,
    )
}

// ── Router ───────────────────────────────────────────────────────────────────

pub fn build_router(state: AppState) -> Router {
    let middleware = tower::ServiceBuilder::new()
        .layer(request_id_layer())
        .layer(TraceLayer::new_for_http());

    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Auth
        .route("/auth/signup", post(signup))
        .route("/auth/token", post(exchange_token))
        // Users
        .route("/users", get(list_users))
        .route("/users", post(create_user))
        .route("/users/me", get(get_me))
        .route("/users/me", patch(update_me))
        .route("/users/{username}", get(get_user))
        .route("/users/{username}", patch(update_user))
        .route("/users/{username}", delete(delete_user))
        // Categories
        .route("/categories", get(list_categories))
        .route("/categories", post(create_category))
        .route("/categories/{slug}", delete(delete_category))
        // Genres
        .route("/genres", get(list_genres))
        .route("/genres", post(create_genre))
        .route("/genres/{slug}", delete(delete_genre))
        // Titles
        .route("/titles", get(list_titles))
        .route("/titles", post(create_title))
        .route("/titles/{title_id}", get(get_title))
        .route("/titles/{title_id}", patch(update_title))
        .route("/titles/{title_id}", delete(delete_title))
        // Reviews
        .route("/titles/{title_id}/reviews", get(list_reviews))
        .route("/titles/{title_id}/reviews", post(create_review))
        .route("/titles/{title_id}/reviews/{review_id}", get(get_review))
        .route("/titles/{title_id}/reviews/{review_id}", patch(update_review))
        .route(
            "/titles/{title_id}/reviews/{review_id}",
            delete(delete_review),
        )
        // Comments
        .route(
            "/titles/{title_id}/reviews/{review_id}/comments",
            get(list_comments),
        )
        .route(
            "/titles/{title_id}/reviews/{review_id}/comments",
            post(create_comment),
        )
        .route(
            "/titles/{title_id}/reviews/{review_id}/comments/{comment_id}",
            get(get_comment),
        )
        .route(
            "/titles/{title_id}/reviews/{review_id}/comments/{comment_id}",
            patch(update_comment),
        )
        .route(
            "/titles/{title_id}/reviews/{review_id}/comments/{comment_id}",
            delete(delete_comment),
        )
        .layer(middleware)
        .with_state(state)
}
