use std::sync::Arc;

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::Redirect};

use crate::{
    config::Config,
    db::{self, category::PopularCategories, DbPool},
    error::AppError,
    models::{category::Category, page::Page},
};

const MOST_VIEWED_PAGES: i64 = 5;

#[derive(Template, WebTemplate)]
#[template(path = "rango/index.html")]
pub struct IndexTemplate {
    pub boldmessage: &'static str,
    pub categories: Vec<Category>,
    pub pages: Vec<Page>,
}

#[derive(Template, WebTemplate)]
#[template(path = "rango/about.html")]
pub struct AboutTemplate {
    pub author: &'static str,
}

impl Default for AboutTemplate {
    fn default() -> Self {
        Self {
            author: "the Rango maintainers",
        }
    }
}

// GET /
pub async fn root_handler() -> Redirect {
    Redirect::permanent("/rango/")
}

/// Loads the context of the index page: the most liked categories and the
/// most viewed pages.
pub async fn index_context(pool: &DbPool, top_categories: i64) -> Result<IndexTemplate, AppError> {
    let categories = PopularCategories::top(top_categories).fetch_all(pool).await?;
    let pages = db::page::most_viewed(pool, MOST_VIEWED_PAGES).await?;

    Ok(IndexTemplate {
        boldmessage: "Crunchy, creamy, cookie, candy, cupcake!",
        categories,
        pages,
    })
}

// GET /rango/
pub async fn index_handler(
    State(pool): State<DbPool>,
    State(config): State<Arc<Config>>,
) -> Result<IndexTemplate, AppError> {
    index_context(&pool, config.top_categories).await
}

// GET /rango/about/
pub async fn about_handler() -> AboutTemplate {
    AboutTemplate::default()
}
