use sqlx::{Acquire, Any};

use crate::{
    db::DbPool,
    error::AppError,
    models::category::{Category, NAME_MAX_LENGTH},
    utils::slug::slugify,
};

const COLUMNS: &str = "id, name, views, likes, slug";

/// Checks a category name and derives its slug.
pub fn validate_name(name: &str) -> Result<String, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("Category name is required".into()));
    }
    if name.chars().count() > NAME_MAX_LENGTH {
        return Err(AppError::Validation(format!(
            "Category name must be at most {NAME_MAX_LENGTH} characters"
        )));
    }

    let slug = slugify(name);
    if slug.is_empty() {
        return Err(AppError::Validation(
            "Category name must contain at least one letter or digit".into(),
        ));
    }
    Ok(slug)
}

fn validate_counter(field: &str, value: i64) -> Result<i64, AppError> {
    if value < 0 {
        return Err(AppError::Validation(format!("{field} cannot be negative")));
    }
    Ok(value)
}

fn conflict(name: &str) -> String {
    format!("Category {name:?} clashes with an existing name or slug")
}

pub async fn create<'a, A>(conn: A, name: &str, views: i64, likes: i64) -> Result<Category, AppError>
where
    A: Acquire<'a, Database = Any>,
{
    let slug = validate_name(name)?;
    let name = name.trim();
    let views = validate_counter("views", views)?;
    let likes = validate_counter("likes", likes)?;

    let mut conn = conn.acquire().await?;

    sqlx::query_as::<_, Category>(&format!(
        "INSERT INTO categories (name, views, likes, slug) VALUES ($1, $2, $3, $4) RETURNING {COLUMNS}"
    ))
    .bind(name)
    .bind(views)
    .bind(likes)
    .bind(slug)
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| AppError::from_unique(e, conflict(name)))
}

/// Saves a category back to storage, re-deriving the slug from the name.
/// Saving an unchanged name leaves the slug untouched.
pub async fn save<'a, A>(conn: A, category: &Category) -> Result<Category, AppError>
where
    A: Acquire<'a, Database = Any>,
{
    let slug = validate_name(&category.name)?;
    let name = category.name.trim();
    let views = validate_counter("views", category.views)?;
    let likes = validate_counter("likes", category.likes)?;

    let mut conn = conn.acquire().await?;

    sqlx::query_as::<_, Category>(&format!(
        "UPDATE categories SET name = $1, views = $2, likes = $3, slug = $4 WHERE id = $5 RETURNING {COLUMNS}"
    ))
    .bind(name)
    .bind(views)
    .bind(likes)
    .bind(slug)
    .bind(category.id)
    .fetch_optional(&mut *conn)
    .await
    .map_err(|e| AppError::from_unique(e, conflict(name)))?
    .ok_or(AppError::NotFound("Category"))
}

pub async fn find_by_id(pool: &DbPool, id: i64) -> Result<Option<Category>, sqlx::Error> {
    sqlx::query_as::<_, Category>(&format!("SELECT {COLUMNS} FROM categories WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// `None` when no category has this name.
pub async fn find_by_name<'a, A>(conn: A, name: &str) -> Result<Option<Category>, sqlx::Error>
where
    A: Acquire<'a, Database = Any>,
{
    let mut conn = conn.acquire().await?;
    sqlx::query_as::<_, Category>(&format!("SELECT {COLUMNS} FROM categories WHERE name = $1"))
        .bind(name)
        .fetch_optional(&mut *conn)
        .await
}

pub async fn find_by_slug(pool: &DbPool, slug: &str) -> Result<Option<Category>, sqlx::Error> {
    sqlx::query_as::<_, Category>(&format!("SELECT {COLUMNS} FROM categories WHERE slug = $1"))
        .bind(slug)
        .fetch_optional(pool)
        .await
}

/// Categories by descending likes, ties in insertion order.
///
/// The value only describes the query; every `fetch_all` runs it afresh, so
/// the same value can be kept around and re-evaluated.
#[derive(Debug, Clone, Copy, Default)]
pub struct PopularCategories {
    limit: Option<i64>,
}

impl PopularCategories {
    pub fn all() -> Self {
        Self { limit: None }
    }

    pub fn top(limit: i64) -> Self {
        Self {
            limit: Some(limit.max(0)),
        }
    }

    pub async fn fetch_all(&self, pool: &DbPool) -> Result<Vec<Category>, sqlx::Error> {
        let sql = format!("SELECT {COLUMNS} FROM categories ORDER BY likes DESC, id ASC");
        match self.limit {
            Some(limit) => {
                sqlx::query_as::<_, Category>(&format!("{sql} LIMIT $1"))
                    .bind(limit)
                    .fetch_all(pool)
                    .await
            }
            None => sqlx::query_as::<_, Category>(&sql).fetch_all(pool).await,
        }
    }
}

pub async fn increment_likes(pool: &DbPool, id: i64) -> Result<Option<i64>, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("UPDATE categories SET likes = likes + 1 WHERE id = $1 RETURNING likes")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn increment_views(pool: &DbPool, id: i64) -> Result<Option<i64>, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("UPDATE categories SET views = views + 1 WHERE id = $1 RETURNING views")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Deletes a category together with all of its pages. Returns whether the
/// category existed.
pub async fn delete(pool: &DbPool, id: i64) -> Result<bool, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let pages = sqlx::query("DELETE FROM pages WHERE category_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    let category = sqlx::query("DELETE FROM categories WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    if category.rows_affected() > 0 {
        tracing::info!(
            "Deleted category {} and {} page(s)",
            id,
            pages.rows_affected()
        );
    }
    Ok(category.rows_affected() > 0)
}
