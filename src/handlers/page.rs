use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;

use crate::{
    db::{self, DbPool},
    error::AppError,
    forms::PageForm,
    models::category::Category,
};

#[derive(Template, WebTemplate)]
#[template(path = "rango/add_page.html")]
pub struct AddPageTemplate {
    pub category: Category,
    pub form: PageForm,
    pub errors: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct GotoParams {
    pub page_id: Option<String>,
}

async fn category_by_slug(pool: &DbPool, slug: &str) -> Result<Category, AppError> {
    db::category::find_by_slug(pool, slug)
        .await?
        .ok_or(AppError::NotFound("Category"))
}

// GET /rango/category/{slug}/add_page/
pub async fn add_page_form_handler(
    Path(slug): Path<String>,
    State(pool): State<DbPool>,
) -> Result<AddPageTemplate, AppError> {
    Ok(AddPageTemplate {
        category: category_by_slug(&pool, &slug).await?,
        form: PageForm::default(),
        errors: Vec::new(),
    })
}

// POST /rango/category/{slug}/add_page/
pub async fn add_page_handler(
    Path(slug): Path<String>,
    State(pool): State<DbPool>,
    Form(form): Form<PageForm>,
) -> Result<Response, AppError> {
    let category = category_by_slug(&pool, &slug).await?;

    let page = match form.clean() {
        Ok(page) => page,
        Err(errors) => {
            return Ok(AddPageTemplate {
                category,
                form,
                errors,
            }
            .into_response())
        }
    };

    let page = db::page::create(&pool, category.id, &page.title, &page.url, 0).await?;
    tracing::info!("Page {:?} added to {:?}", page.title, category.name);

    Ok(Redirect::to(&format!("/rango/category/{}/", category.slug)).into_response())
}

// GET /rango/goto/?page_id=N
// Unknown or missing ids fall back to the index page.
pub async fn goto_handler(
    Query(params): Query<GotoParams>,
    State(pool): State<DbPool>,
) -> Result<Redirect, AppError> {
    let Some(page_id) = params.page_id.and_then(|id| id.trim().parse::<i64>().ok()) else {
        return Ok(Redirect::to("/rango/"));
    };

    // Rows written before URLs were normalized may hold bytes a `Location`
    // header cannot carry; those fall back to the index uncounted.
    let Some(page) = db::page::find_by_id(&pool, page_id).await? else {
        return Ok(Redirect::to("/rango/"));
    };
    if page.url.is_empty() || !page.url.bytes().all(|b| b.is_ascii_graphic()) {
        tracing::warn!("Page {} has an unusable URL {:?}", page.id, page.url);
        return Ok(Redirect::to("/rango/"));
    }

    match db::page::increment_views(&pool, page_id).await? {
        Some(page) => Ok(Redirect::to(&page.url)),
        None => Ok(Redirect::to("/rango/")),
    }
}
