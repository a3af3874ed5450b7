use sqlx::{Acquire, Any, AnyConnection};
use url::Url;

use crate::{
    db::DbPool,
    error::AppError,
    models::page::{Page, PageWithCategory, TITLE_MAX_LENGTH, URL_MAX_LENGTH},
};

const COLUMNS: &str = "id, category_id, title, url, views";

pub fn validate_title(title: &str) -> Result<&str, AppError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(AppError::Validation("Page title is required".into()));
    }
    if title.chars().count() > TITLE_MAX_LENGTH {
        return Err(AppError::Validation(format!(
            "Page title must be at most {TITLE_MAX_LENGTH} characters"
        )));
    }
    Ok(title)
}

/// Trims the URL, prefixes `http://` when no scheme is given and returns the
/// normalized form (punycode host, percent-encoded path) that gets stored.
pub fn clean_url(url: &str) -> Result<String, AppError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(AppError::Validation("Page URL is required".into()));
    }
    // `Url::parse` silently strips tabs and newlines, so catch them first.
    if url.chars().any(char::is_control) {
        return Err(AppError::Validation("Page URL is not a valid URL".into()));
    }

    let url = if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("http://{url}")
    };

    let parsed = Url::parse(&url)
        .map_err(|e| AppError::Validation(format!("Page URL is not a valid URL: {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(AppError::Validation("Page URL is not a valid URL".into()));
    }

    let url = String::from(parsed);
    if url.chars().count() > URL_MAX_LENGTH {
        return Err(AppError::Validation(format!(
            "Page URL must be at most {URL_MAX_LENGTH} characters"
        )));
    }
    Ok(url)
}

fn validate_views(views: i64) -> Result<i64, AppError> {
    if views < 0 {
        return Err(AppError::Validation("views cannot be negative".into()));
    }
    Ok(views)
}

async fn ensure_category(conn: &mut AnyConnection, category_id: i64) -> Result<(), AppError> {
    let exists = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM categories WHERE id = $1")
        .bind(category_id)
        .fetch_one(&mut *conn)
        .await?;
    if exists == 0 {
        return Err(AppError::NotFound("Category"));
    }
    Ok(())
}

/// Accepts a pool or an open connection/transaction, like every writer used
/// by `populate`.
pub async fn create<'a, A>(
    conn: A,
    category_id: i64,
    title: &str,
    url: &str,
    views: i64,
) -> Result<Page, AppError>
where
    A: Acquire<'a, Database = Any>,
{
    let title = validate_title(title)?;
    let url = clean_url(url)?;
    let views = validate_views(views)?;

    let mut conn = conn.acquire().await?;
    ensure_category(&mut *conn, category_id).await?;

    let page = sqlx::query_as::<_, Page>(&format!(
        "INSERT INTO pages (category_id, title, url, views) VALUES ($1, $2, $3, $4) RETURNING {COLUMNS}"
    ))
    .bind(category_id)
    .bind(title)
    .bind(url)
    .bind(views)
    .fetch_one(&mut *conn)
    .await?;

    Ok(page)
}

pub async fn save<'a, A>(conn: A, page: &Page) -> Result<Page, AppError>
where
    A: Acquire<'a, Database = Any>,
{
    let title = validate_title(&page.title)?;
    let url = clean_url(&page.url)?;
    let views = validate_views(page.views)?;

    let mut conn = conn.acquire().await?;
    ensure_category(&mut *conn, page.category_id).await?;

    sqlx::query_as::<_, Page>(&format!(
        "UPDATE pages SET category_id = $1, title = $2, url = $3, views = $4 WHERE id = $5 RETURNING {COLUMNS}"
    ))
    .bind(page.category_id)
    .bind(title)
    .bind(url)
    .bind(views)
    .bind(page.id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or(AppError::NotFound("Page"))
}

pub async fn find_by_id(pool: &DbPool, id: i64) -> Result<Option<Page>, sqlx::Error> {
    sqlx::query_as::<_, Page>(&format!("SELECT {COLUMNS} FROM pages WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_title<'a, A>(
    conn: A,
    category_id: i64,
    title: &str,
) -> Result<Option<Page>, sqlx::Error>
where
    A: Acquire<'a, Database = Any>,
{
    let mut conn = conn.acquire().await?;
    sqlx::query_as::<_, Page>(&format!(
        "SELECT {COLUMNS} FROM pages WHERE category_id = $1 AND title = $2 ORDER BY id ASC LIMIT 1"
    ))
    .bind(category_id)
    .bind(title)
    .fetch_optional(&mut *conn)
    .await
}

/// Pages of one category, most viewed first.
pub async fn list_for_category(pool: &DbPool, category_id: i64) -> Result<Vec<Page>, sqlx::Error> {
    sqlx::query_as::<_, Page>(&format!(
        "SELECT {COLUMNS} FROM pages WHERE category_id = $1 ORDER BY views DESC, id ASC"
    ))
    .bind(category_id)
    .fetch_all(pool)
    .await
}

pub async fn most_viewed(pool: &DbPool, limit: i64) -> Result<Vec<Page>, sqlx::Error> {
    sqlx::query_as::<_, Page>(&format!(
        "SELECT {COLUMNS} FROM pages ORDER BY views DESC, id ASC LIMIT $1"
    ))
    .bind(limit.max(0))
    .fetch_all(pool)
    .await
}

pub async fn list_with_category(pool: &DbPool) -> Result<Vec<PageWithCategory>, sqlx::Error> {
    sqlx::query_as::<_, PageWithCategory>(
        r#"
        SELECT p.id, p.title, p.category_id, c.name AS category, p.url, p.views
        FROM pages p
        JOIN categories c ON c.id = p.category_id
        ORDER BY p.id ASC
        "#,
    )
    .fetch_all(pool)
    .await
}

pub async fn increment_views(pool: &DbPool, id: i64) -> Result<Option<Page>, sqlx::Error> {
    sqlx::query_as::<_, Page>(&format!(
        "UPDATE pages SET views = views + 1 WHERE id = $1 RETURNING {COLUMNS}"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn delete(pool: &DbPool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM pages WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn count_for_category(pool: &DbPool, category_id: i64) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM pages WHERE category_id = $1")
        .bind(category_id)
        .fetch_one(pool)
        .await
}

#[cfg(test)]
mod tests {
    use super::{clean_url, validate_title};
    use crate::error::AppError;

    #[test]
    fn clean_url_adds_missing_scheme() {
        assert_eq!(clean_url("www.djangorocks.com/").unwrap(), "http://www.djangorocks.com/");
        assert_eq!(clean_url(" https://docs.rs/axum ").unwrap(), "https://docs.rs/axum");
        assert_eq!(clean_url("http://flask.pocoo.org").unwrap(), "http://flask.pocoo.org/");
    }

    #[test]
    fn clean_url_rejects_empty_and_overlong() {
        assert!(matches!(clean_url("  "), Err(AppError::Validation(_))));
        let long = format!("http://example.com/{}", "a".repeat(182));
        assert!(matches!(clean_url(&long), Err(AppError::Validation(_))));
        let max = format!("http://example.com/{}", "a".repeat(181));
        assert!(clean_url(&max).is_ok());
    }

    #[test]
    fn clean_url_rejects_control_characters() {
        assert!(matches!(clean_url("http://example.com/a\nb"), Err(AppError::Validation(_))));
        assert!(matches!(clean_url("example.com/\tx"), Err(AppError::Validation(_))));
        assert!(matches!(clean_url("http://example.com/\u{7f}"), Err(AppError::Validation(_))));
    }

    #[test]
    fn clean_url_rejects_non_urls() {
        assert!(matches!(clean_url("http://"), Err(AppError::Validation(_))));
        assert!(matches!(clean_url("javascript:alert(1)"), Err(AppError::Validation(_))));
        assert!(matches!(clean_url("http://exa mple.com"), Err(AppError::Validation(_))));
    }

    #[test]
    fn clean_url_stores_ascii_form() {
        let url = clean_url("http://例え.jp/café").unwrap();
        assert!(url.is_ascii());
        assert!(url.starts_with("http://xn--"));
        assert!(url.ends_with("/caf%C3%A9"));
    }

    #[test]
    fn clean_url_length_counts_encoded_form() {
        // 100 two-byte characters encode to 600 ASCII characters.
        let url = format!("http://example.com/{}", "é".repeat(100));
        assert!(matches!(clean_url(&url), Err(AppError::Validation(_))));
    }

    #[test]
    fn validate_title_trims() {
        assert_eq!(validate_title("  Flask ").unwrap(), "Flask");
        assert!(validate_title("").is_err());
    }
}
