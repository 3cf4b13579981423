use std::collections::HashMap;

use anyhow::Context as _;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, SqlErr, TransactionTrait,
    sea_query::{Expr, Func},
};
use uuid::Uuid;

use critica_api_schema::{categories, comments, genres, reviews, title_genres, titles, users};
use critica_domain::pagination::PageRequest;
use critica_domain::user::Role;

use crate::domain::repository::{
    CategoryRepository, CommentRepository, GenreRepository, ReviewRepository, TitleRepository,
    UserRepository,
};
use crate::domain::types::{
    Category, Comment, Genre, NewComment, NewReview, NewTitle, Review, TitleChanges, TitleDetail,
    TitleQuery, User, UserPatch, mean_rating,
};
use crate::error::ApiServiceError;

fn is_unique_violation(e: &sea_orm::DbErr) -> bool {
    matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// Escape `LIKE` metacharacters so a search term only ever matches literally.
fn escape_like(term: &str) -> String {
    // Backslash first, so inserted escapes are not themselves escaped.
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiServiceError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        Ok(model.map(user_from_model))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, ApiServiceError> {
        let model = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.db)
            .await
            .context("find user by username")?;
        Ok(model.map(user_from_model))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiServiceError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find user by email")?;
        Ok(model.map(user_from_model))
    }

    async fn list(
        &self,
        search: Option<&str>,
        page: PageRequest,
    ) -> Result<Vec<User>, ApiServiceError> {
        let PageRequest { limit, offset } = page.clamped();
        let mut query = users::Entity::find();
        if let Some(term) = search {
            query = query.filter(
                Expr::expr(Func::lower(Expr::col(users::Column::Username)))
                    .like(format!("%{}%", escape_like(&term.to_lowercase()))),
            );
        }
        let models = query
            .order_by_asc(users::Column::Username)
            .offset(offset as u64)
            .limit(limit as u64)
            .all(&self.db)
            .await
            .context("list users")?;
        Ok(models.into_iter().map(user_from_model).collect())
    }

    async fn create(&self, user: &User) -> Result<(), ApiServiceError> {
        let result = users::ActiveModel {
            id: Set(user.id),
            username: Set(user.username.clone()),
            email: Set(user.email.clone()),
            first_name: Set(user.first_name.clone()),
            last_name: Set(user.last_name.clone()),
            bio: Set(user.bio.clone()),
            role: Set(user.role.as_u8() as i16),
            is_superuser: Set(user.is_superuser),
            confirmation_code: Set(user.confirmation_code.clone()),
            created_at: Set(user.created_at),
            updated_at: Set(user.updated_at),
        }
        .insert(&self.db)
        .await;
        match result {
            Err(e) if is_unique_violation(&e) => Err(ApiServiceError::UserAlreadyExists),
            other => {
                other.context("create user")?;
                Ok(())
            }
        }
    }

    async fn update(&self, id: Uuid, patch: &UserPatch) -> Result<User, ApiServiceError> {
        let mut am = users::ActiveModel {
            id: Set(id),
            ..Default::default()
        };
        if let Some(username) = &patch.username {
            am.username = Set(username.clone());
        }
        if let Some(email) = &patch.email {
            am.email = Set(email.clone());
        }
        if let Some(first_name) = &patch.first_name {
            am.first_name = Set(first_name.clone());
        }
        if let Some(last_name) = &patch.last_name {
            am.last_name = Set(last_name.clone());
        }
        if let Some(bio) = &patch.bio {
            am.bio = Set(bio.clone());
        }
        if let Some(role) = patch.role {
            am.role = Set(role.as_u8() as i16);
        }
        am.updated_at = Set(Utc::now());

        let result = am.update(&self.db).await;
        let model = match result {
            Err(e) if is_unique_violation(&e) => return Err(ApiServiceError::UserAlreadyExists),
            other => other.context("update user")?,
        };
        Ok(user_from_model(model))
    }

    async fn set_confirmation_code(&self, id: Uuid, code: &str) -> Result<(), ApiServiceError> {
        users::ActiveModel {
            id: Set(id),
            confirmation_code: Set(code.to_owned()),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("set confirmation code")?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ApiServiceError> {
        let result = users::Entity::delete_many()
            .filter(users::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("delete user")?;
        Ok(result.rows_affected > 0)
    }
}

fn user_from_model(model: users::Model) -> User {
    User {
        id: model.id,
        username: model.username,
        email: model.email,
        first_name: model.first_name,
        last_name: model.last_name,
        bio: model.bio,
        role: Role::from_u8(model.role as u8).unwrap_or_default(),
        is_superuser: model.is_superuser,
        confirmation_code: model.confirmation_code,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── Category repository ──────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbCategoryRepository {
    pub db: DatabaseConnection,
}

impl CategoryRepository for DbCategoryRepository {
    async fn list(
        &self,
        search: Option<&str>,
        page: PageRequest,
    ) -> Result<Vec<Category>, ApiServiceError> {
        let PageRequest { limit, offset } = page.clamped();
        let mut query = categories::Entity::find();
        if let Some(term) = search {
            // Exact name match, case-insensitive. Substring search is a
            // users-list behavior only.
            query = query.filter(
                Expr::expr(Func::lower(Expr::col(categories::Column::Name)))
                    .eq(term.to_lowercase()),
            );
        }
        let models = query
            .order_by_asc(categories::Column::Id)
            .offset(offset as u64)
            .limit(limit as u64)
            .all(&self.db)
            .await
            .context("list categories")?;
        Ok(models.into_iter().map(category_from_model).collect())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, ApiServiceError> {
        let model = categories::Entity::find()
            .filter(categories::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .context("find category by slug")?;
        Ok(model.map(category_from_model))
    }

    async fn create(&self, name: &str, slug: &str) -> Result<Category, ApiServiceError> {
        let result = categories::ActiveModel {
            name: Set(name.to_owned()),
            slug: Set(slug.to_owned()),
            ..Default::default()
        }
        .insert(&self.db)
        .await;
        let model = match result {
            Err(e) if is_unique_violation(&e) => {
                return Err(ApiServiceError::CategoryAlreadyExists);
            }
            other => other.context("create category")?,
        };
        Ok(category_from_model(model))
    }

    async fn delete_by_slug(&self, slug: &str) -> Result<bool, ApiServiceError> {
        let result = categories::Entity::delete_many()
            .filter(categories::Column::Slug.eq(slug))
            .exec(&self.db)
            .await
            .context("delete category")?;
        Ok(result.rows_affected > 0)
    }
}

fn category_from_model(model: categories::Model) -> Category {
    Category {
        id: model.id,
        name: model.name,
        slug: model.slug,
    }
}

// ── Genre repository ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbGenreRepository {
    pub db: DatabaseConnection,
}

impl GenreRepository for DbGenreRepository {
    async fn list(
        &self,
        search: Option<&str>,
        page: PageRequest,
    ) -> Result<Vec<Genre>, ApiServiceError> {
        let PageRequest { limit, offset } = page.clamped();
        let mut query = genres::Entity::find();
        if let Some(term) = search {
            query = query.filter(
                Expr::expr(Func::lower(Expr::col(genres::Column::Name))).eq(term.to_lowercase()),
            );
        }
        let models = query
            .order_by_asc(genres::Column::Id)
            .offset(offset as u64)
            .limit(limit as u64)
            .all(&self.db)
            .await
            .context("list genres")?;
        Ok(models.into_iter().map(genre_from_model).collect())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Genre>, ApiServiceError> {
        let model = genres::Entity::find()
            .filter(genres::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .context("find genre by slug")?;
        Ok(model.map(genre_from_model))
    }

    async fn create(&self, name: &str, slug: &str) -> Result<Genre, ApiServiceError> {
        let result = genres::ActiveModel {
            name: Set(name.to_owned()),
            slug: Set(slug.to_owned()),
            ..Default::default()
        }
        .insert(&self.db)
        .await;
        let model = match result {
            Err(e) if is_unique_violation(&e) => {
                return Err(ApiServiceError::GenreAlreadyExists);
            }
            other => other.context("create genre")?,
        };
        Ok(genre_from_model(model))
    }

    async fn delete_by_slug(&self, slug: &str) -> Result<bool, ApiServiceError> {
        let result = genres::Entity::delete_many()
            .filter(genres::Column::Slug.eq(slug))
            .exec(&self.db)
            .await
            .context("delete genre")?;
        Ok(result.rows_affected > 0)
    }
}

fn genre_from_model(model: genres::Model) -> Genre {
    Genre {
        id: model.id,
        name: model.name,
        slug: model.slug,
    }
}

// ── Title repository ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbTitleRepository {
    pub db: DatabaseConnection,
}

impl DbTitleRepository {
    /// Attach genres and ratings to a page of title rows with one batch
    /// query per concern instead of one per row.
    async fn hydrate(
        &self,
        rows: Vec<(titles::Model, Option<categories::Model>)>,
    ) -> Result<Vec<TitleDetail>, ApiServiceError> {
        let title_ids: Vec<i32> = rows.iter().map(|(title, _)| title.id).collect();

        let links = title_genres::Entity::find()
            .find_also_related(genres::Entity)
            .filter(title_genres::Column::TitleId.is_in(title_ids.iter().copied()))
            .all(&self.db)
            .await
            .context("list title genres")?;
        let mut genres_by_title: HashMap<i32, Vec<Genre>> = HashMap::new();
        for (link, genre) in links {
            if let Some(genre) = genre {
                genres_by_title
                    .entry(link.title_id)
                    .or_default()
                    .push(genre_from_model(genre));
            }
        }

        let scores: Vec<(i32, i16)> = reviews::Entity::find()
            .select_only()
            .column(reviews::Column::TitleId)
            .column(reviews::Column::Score)
            .filter(reviews::Column::TitleId.is_in(title_ids.iter().copied()))
            .into_tuple()
            .all(&self.db)
            .await
            .context("list review scores")?;
        let mut scores_by_title: HashMap<i32, Vec<i16>> = HashMap::new();
        for (title_id, score) in scores {
            scores_by_title.entry(title_id).or_default().push(score);
        }

        Ok(rows
            .into_iter()
            .map(|(title, category)| TitleDetail {
                id: title.id,
                name: title.name,
                year: title.year,
                description: title.description,
                category: category.map(category_from_model),
                genres: genres_by_title.remove(&title.id).unwrap_or_default(),
                rating: mean_rating(
                    scores_by_title
                        .get(&title.id)
                        .map(Vec::as_slice)
                        .unwrap_or(&[]),
                ),
            })
            .collect())
    }
}

impl TitleRepository for DbTitleRepository {
    async fn list(
        &self,
        query: &TitleQuery,
        page: PageRequest,
    ) -> Result<Vec<TitleDetail>, ApiServiceError> {
        let PageRequest { limit, offset } = page.clamped();

        let mut select = titles::Entity::find().find_also_related(categories::Entity);

        if let Some(slug) = &query.category {
            let category = categories::Entity::find()
                .filter(categories::Column::Slug.eq(slug))
                .one(&self.db)
                .await
                .context("resolve category filter")?;
            let Some(category) = category else {
                return Ok(Vec::new());
            };
            select = select.filter(titles::Column::CategoryId.eq(category.id));
        }

        if let Some(slug) = &query.genre {
            let genre = genres::Entity::find()
                .filter(genres::Column::Slug.eq(slug))
                .one(&self.db)
                .await
                .context("resolve genre filter")?;
            let Some(genre) = genre else {
                return Ok(Vec::new());
            };
            select = select.filter(
                titles::Column::Id.in_subquery(
                    sea_orm::sea_query::Query::select()
                        .column(title_genres::Column::TitleId)
                        .from(title_genres::Entity)
                        .and_where(Expr::col(title_genres::Column::GenreId).eq(genre.id))
                        .to_owned(),
                ),
            );
        }

        if let Some(name) = &query.name {
            // Qualified column ref; the category join makes a bare `name` ambiguous.
            select = select.filter(
                Expr::expr(Func::lower(Expr::col((titles::Entity, titles::Column::Name))))
                    .like(format!("%{}%", escape_like(&name.to_lowercase()))),
            );
        }

        if let Some(year) = query.year {
            select = select.filter(titles::Column::Year.eq(year));
        }

        let rows = select
            .order_by_asc(titles::Column::Id)
            .offset(offset as u64)
            .limit(limit as u64)
            .all(&self.db)
            .await
            .context("list titles")?;

        self.hydrate(rows).await
    }

    async fn find_detail(&self, id: i32) -> Result<Option<TitleDetail>, ApiServiceError> {
        let row = titles::Entity::find_by_id(id)
            .find_also_related(categories::Entity)
            .one(&self.db)
            .await
            .context("find title")?;
        let Some(row) = row else {
            return Ok(None);
        };
        let mut details = self.hydrate(vec![row]).await?;
        Ok(details.pop())
    }

    async fn find_name(&self, id: i32) -> Result<Option<String>, ApiServiceError> {
        let name = titles::Entity::find()
            .select_only()
            .column(titles::Column::Name)
            .filter(titles::Column::Id.eq(id))
            .into_tuple::<String>()
            .one(&self.db)
            .await
            .context("find title name")?;
        Ok(name)
    }

    async fn create(&self, title: &NewTitle) -> Result<i32, ApiServiceError> {
        let id = self
            .db
            .transaction::<_, i32, sea_orm::DbErr>(|txn| {
                let title = title.clone();
                Box::pin(async move {
                    let model = titles::ActiveModel {
                        name: Set(title.name.clone()),
                        year: Set(title.year),
                        category_id: Set(title.category_id),
                        description: Set(title.description.clone()),
                        ..Default::default()
                    }
                    .insert(txn)
                    .await?;

                    for genre_id in &title.genre_ids {
                        title_genres::ActiveModel {
                            title_id: Set(model.id),
                            genre_id: Set(*genre_id),
                        }
                        .insert(txn)
                        .await?;
                    }
                    Ok(model.id)
                })
            })
            .await
            .context("create title")?;
        Ok(id)
    }

    async fn update(&self, id: i32, changes: &TitleChanges) -> Result<(), ApiServiceError> {
        self.db
            .transaction::<_, (), sea_orm::DbErr>(|txn| {
                let changes = changes.clone();
                Box::pin(async move {
                    let mut am = titles::ActiveModel {
                        id: Set(id),
                        ..Default::default()
                    };
                    let mut dirty = false;
                    if let Some(name) = &changes.name {
                        am.name = Set(name.clone());
                        dirty = true;
                    }
                    if let Some(year) = changes.year {
                        am.year = Set(year);
                        dirty = true;
                    }
                    if let Some(description) = &changes.description {
                        am.description = Set(Some(description.clone()));
                        dirty = true;
                    }
                    if let Some(category_id) = changes.category_id {
                        am.category_id = Set(Some(category_id));
                        dirty = true;
                    }
                    if dirty {
                        am.update(txn).await?;
                    }

                    if let Some(genre_ids) = &changes.genre_ids {
                        title_genres::Entity::delete_many()
                            .filter(title_genres::Column::TitleId.eq(id))
                            .exec(txn)
                            .await?;
                        for genre_id in genre_ids {
                            title_genres::ActiveModel {
                                title_id: Set(id),
                                genre_id: Set(*genre_id),
                            }
                            .insert(txn)
                            .await?;
                        }
                    }
                    Ok(())
                })
            })
            .await
            .context("update title")?;
        Ok(())
    }

    async fn delete(&self, id: i32) -> Result<bool, ApiServiceError> {
        let result = titles::Entity::delete_many()
            .filter(titles::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("delete title")?;
        Ok(result.rows_affected > 0)
    }
}

// ── Review repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbReviewRepository {
    pub db: DatabaseConnection,
}

impl ReviewRepository for DbReviewRepository {
    async fn list_by_title(
        &self,
        title_id: i32,
        page: PageRequest,
    ) -> Result<Vec<Review>, ApiServiceError> {
        let PageRequest { limit, offset } = page.clamped();
        let rows = reviews::Entity::find()
            .find_also_related(users::Entity)
            .filter(reviews::Column::TitleId.eq(title_id))
            .order_by_asc(reviews::Column::Id)
            .offset(offset as u64)
            .limit(limit as u64)
            .all(&self.db)
            .await
            .context("list reviews")?;
        Ok(rows
            .into_iter()
            .map(|(model, author)| {
                let username = author.map(|u| u.username).unwrap_or_default();
                review_from_parts(model, username)
            })
            .collect())
    }

    async fn find_scoped(
        &self,
        title_id: i32,
        review_id: i32,
    ) -> Result<Option<Review>, ApiServiceError> {
        let row = reviews::Entity::find()
            .find_also_related(users::Entity)
            .filter(reviews::Column::Id.eq(review_id))
            .filter(reviews::Column::TitleId.eq(title_id))
            .one(&self.db)
            .await
            .context("find review")?;
        Ok(row.map(|(model, author)| {
            let username = author.map(|u| u.username).unwrap_or_default();
            review_from_parts(model, username)
        }))
    }

    async fn find_by_author(
        &self,
        title_id: i32,
        author_id: Uuid,
    ) -> Result<Option<Review>, ApiServiceError> {
        let row = reviews::Entity::find()
            .find_also_related(users::Entity)
            .filter(reviews::Column::TitleId.eq(title_id))
            .filter(reviews::Column::AuthorId.eq(author_id))
            .one(&self.db)
            .await
            .context("find review by author")?;
        Ok(row.map(|(model, author)| {
            let username = author.map(|u| u.username).unwrap_or_default();
            review_from_parts(model, username)
        }))
    }

    async fn create(&self, review: &NewReview) -> Result<Review, ApiServiceError> {
        let result = reviews::ActiveModel {
            title_id: Set(review.title_id),
            author_id: Set(review.author_id),
            text: Set(review.text.clone()),
            score: Set(review.score),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await;
        let model = match result {
            // The unique index on (title_id, author_id) turns the losing
            // insert of a concurrent pair into this error.
            Err(e) if is_unique_violation(&e) => return Err(ApiServiceError::DuplicateReview),
            other => other.context("create review")?,
        };
        let username = author_username(&self.db, model.author_id).await?;
        Ok(review_from_parts(model, username))
    }

    async fn update(
        &self,
        review_id: i32,
        text: Option<&str>,
        score: Option<i16>,
    ) -> Result<Review, ApiServiceError> {
        let mut am = reviews::ActiveModel {
            id: Set(review_id),
            ..Default::default()
        };
        if let Some(text) = text {
            am.text = Set(text.to_owned());
        }
        if let Some(score) = score {
            am.score = Set(score);
        }
        let model = am.update(&self.db).await.context("update review")?;
        let username = author_username(&self.db, model.author_id).await?;
        Ok(review_from_parts(model, username))
    }

    async fn delete(&self, review_id: i32) -> Result<bool, ApiServiceError> {
        let result = reviews::Entity::delete_many()
            .filter(reviews::Column::Id.eq(review_id))
            .exec(&self.db)
            .await
            .context("delete review")?;
        Ok(result.rows_affected > 0)
    }
}

fn review_from_parts(model: reviews::Model, author_username: String) -> Review {
    Review {
        id: model.id,
        title_id: model.title_id,
        author_id: model.author_id,
        author_username,
        text: model.text,
        score: model.score,
        pub_date: model.created_at,
    }
}

// ── Comment repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbCommentRepository {
    pub db: DatabaseConnection,
}

impl CommentRepository for DbCommentRepository {
    async fn list_by_review(
        &self,
        review_id: i32,
        page: PageRequest,
    ) -> Result<Vec<Comment>, ApiServiceError> {
        let PageRequest { limit, offset } = page.clamped();
        let rows = comments::Entity::find()
            .find_also_related(users::Entity)
            .filter(comments::Column::ReviewId.eq(review_id))
            .order_by_asc(comments::Column::Id)
            .offset(offset as u64)
            .limit(limit as u64)
            .all(&self.db)
            .await
            .context("list comments")?;
        Ok(rows
            .into_iter()
            .map(|(model, author)| {
                let username = author.map(|u| u.username).unwrap_or_default();
                comment_from_parts(model, username)
            })
            .collect())
    }

    async fn find_scoped(
        &self,
        review_id: i32,
        comment_id: i32,
    ) -> Result<Option<Comment>, ApiServiceError> {
        let row = comments::Entity::find()
            .find_also_related(users::Entity)
            .filter(comments::Column::Id.eq(comment_id))
            .filter(comments::Column::ReviewId.eq(review_id))
            .one(&self.db)
            .await
            .context("find comment")?;
        Ok(row.map(|(model, author)| {
            let username = author.map(|u| u.username).unwrap_or_default();
            comment_from_parts(model, username)
        }))
    }

    async fn create(&self, comment: &NewComment) -> Result<Comment, ApiServiceError> {
        let model = comments::ActiveModel {
            review_id: Set(comment.review_id),
            author_id: Set(comment.author_id),
            text: Set(comment.text.clone()),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .context("create comment")?;
        let username = author_username(&self.db, model.author_id).await?;
        Ok(comment_from_parts(model, username))
    }

    async fn update(&self, comment_id: i32, text: &str) -> Result<Comment, ApiServiceError> {
        let model = comments::ActiveModel {
            id: Set(comment_id),
            text: Set(text.to_owned()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("update comment")?;
        let username = author_username(&self.db, model.author_id).await?;
        Ok(comment_from_parts(model, username))
    }

    async fn delete(&self, comment_id: i32) -> Result<bool, ApiServiceError> {
        let result = comments::Entity::delete_many()
            .filter(comments::Column::Id.eq(comment_id))
            .exec(&self.db)
            .await
            .context("delete comment")?;
        Ok(result.rows_affected > 0)
    }
}

fn comment_from_parts(model: comments::Model, author_username: String) -> Comment {
    Comment {
        id: model.id,
        review_id: model.review_id,
        author_id: model.author_id,
        author_username,
        text: model.text,
        pub_date: model.created_at,
    }
}

async fn author_username(
    db: &DatabaseConnection,
    author_id: Uuid,
) -> Result<String, ApiServiceError> {
    let user = users::Entity::find_by_id(author_id)
        .one(db)
        .await
        .context("find author")?;
    Ok(user.map(|u| u.username).unwrap_or_default())
}
