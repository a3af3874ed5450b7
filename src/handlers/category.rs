use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form,
};

use crate::{
    db::{self, DbPool},
    error::AppError,
    forms::CategoryForm,
    models::{category::Category, page::Page},
};

#[derive(Template, WebTemplate)]
#[template(path = "rango/category.html")]
pub struct CategoryTemplate {
    pub category: Option<Category>,
    pub pages: Vec<Page>,
}

#[derive(Template, WebTemplate)]
#[template(path = "rango/add_category.html")]
pub struct AddCategoryTemplate {
    pub form: CategoryForm,
    pub errors: Vec<String>,
}

// GET /rango/category/{slug}/
pub async fn show_category_handler(
    Path(slug): Path<String>,
    State(pool): State<DbPool>,
) -> Result<Response, AppError> {
    let Some(mut category) = db::category::find_by_slug(&pool, &slug).await? else {
        let page = CategoryTemplate {
            category: None,
            pages: Vec::new(),
        };
        return Ok((StatusCode::NOT_FOUND, page).into_response());
    };

    if let Some(views) = db::category::increment_views(&pool, category.id).await? {
        category.views = views;
    }
    let pages = db::page::list_for_category(&pool, category.id).await?;

    Ok(CategoryTemplate {
        category: Some(category),
        pages,
    }
    .into_response())
}

// GET /rango/add_category/
pub async fn add_category_form_handler() -> AddCategoryTemplate {
    AddCategoryTemplate {
        form: CategoryForm::default(),
        errors: Vec::new(),
    }
}

// POST /rango/add_category/
pub async fn add_category_handler(
    State(pool): State<DbPool>,
    Form(form): Form<CategoryForm>,
) -> Result<Response, AppError> {
    let name = match form.clean() {
        Ok(name) => name,
        Err(errors) => return Ok(AddCategoryTemplate { form, errors }.into_response()),
    };

    match db::category::create(&pool, &name, 0, 0).await {
        Ok(category) => {
            tracing::info!("Category {:?} created with slug {}", category.name, category.slug);
            Ok(Redirect::to("/rango/").into_response())
        }
        Err(AppError::Conflict(message)) => Ok(AddCategoryTemplate {
            form,
            errors: vec![message],
        }
        .into_response()),
        Err(e) => Err(e),
    }
}

// POST /rango/category/{slug}/like/
pub async fn like_category_handler(
    Path(slug): Path<String>,
    State(pool): State<DbPool>,
) -> Result<String, AppError> {
    let category = db::category::find_by_slug(&pool, &slug)
        .await?
        .ok_or(AppError::NotFound("Category"))?;

    let likes = db::category::increment_likes(&pool, category.id)
        .await?
        .ok_or(AppError::NotFound("Category"))?;

    Ok(likes.to_string())
}
