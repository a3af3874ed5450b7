//! JSON admin surface for categories and pages.
//!
//! Each model is described by a [`ModelAdmin`]: the columns its change list
//! shows and the fields a client should pre-fill from others. Every route in
//! here sits behind the admin middleware.

use std::collections::BTreeMap;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::{
    db::{self, category::PopularCategories, DbPool},
    error::AppError,
    models::{
        category::{Category, CreateCategorySchema, UpdateCategorySchema},
        page::{CreatePageSchema, Page, UpdatePageSchema},
    },
};

#[derive(Debug)]
pub struct ModelAdmin {
    pub model: &'static str,
    pub list_display: &'static [&'static str],
    pub prepopulated_fields: &'static [(&'static str, &'static [&'static str])],
}

pub const CATEGORY_ADMIN: ModelAdmin = ModelAdmin {
    model: "category",
    list_display: &["name", "views", "likes"],
    prepopulated_fields: &[("slug", &["name"])],
};

pub const PAGE_ADMIN: ModelAdmin = ModelAdmin {
    model: "page",
    list_display: &["title", "category", "url", "views"],
    prepopulated_fields: &[],
};

#[derive(Debug, Serialize)]
pub struct ChangeList {
    pub model: &'static str,
    pub columns: &'static [&'static str],
    pub prepopulated_fields: BTreeMap<&'static str, &'static [&'static str]>,
    pub rows: Vec<Map<String, Value>>,
}

impl ModelAdmin {
    /// Projects each row onto `id` plus the declared display columns.
    pub fn change_list<T: Serialize>(&self, rows: &[T]) -> Result<ChangeList, AppError> {
        let rows = rows
            .iter()
            .map(|row| {
                let Value::Object(mut fields) = serde_json::to_value(row)
                    .map_err(|e| AppError::Internal(format!("serializing {} row: {e}", self.model)))?
                else {
                    return Err(AppError::Internal(format!("{} row is not an object", self.model)));
                };

                let mut projected = Map::new();
                for column in std::iter::once("id").chain(self.list_display.iter().copied()) {
                    let value = fields.remove(column).unwrap_or(Value::Null);
                    projected.insert(column.to_string(), value);
                }
                Ok(projected)
            })
            .collect::<Result<Vec<_>, AppError>>()?;

        Ok(ChangeList {
            model: self.model,
            columns: self.list_display,
            prepopulated_fields: self.prepopulated_fields.iter().copied().collect(),
            rows,
        })
    }
}

// GET /admin/rango/category/
pub async fn list_categories_handler(State(pool): State<DbPool>) -> Result<Json<ChangeList>, AppError> {
    let categories = PopularCategories::all().fetch_all(&pool).await?;
    Ok(Json(CATEGORY_ADMIN.change_list(&categories)?))
}

// POST /admin/rango/category/
pub async fn create_category_handler(
    State(pool): State<DbPool>,
    Json(body): Json<CreateCategorySchema>,
) -> Result<(StatusCode, Json<Category>), AppError> {
    let category = db::category::create(
        &pool,
        &body.name,
        body.views.unwrap_or(0),
        body.likes.unwrap_or(0),
    )
    .await?;

    tracing::info!("Admin created category {:?}", category.name);
    Ok((StatusCode::CREATED, Json(category)))
}

// PUT /admin/rango/category/{id}/
pub async fn update_category_handler(
    Path(id): Path<i64>,
    State(pool): State<DbPool>,
    Json(body): Json<UpdateCategorySchema>,
) -> Result<Json<Category>, AppError> {
    let existing = db::category::find_by_id(&pool, id)
        .await?
        .ok_or(AppError::NotFound("Category"))?;

    let changed = Category {
        name: body.name.unwrap_or(existing.name),
        views: body.views.unwrap_or(existing.views),
        likes: body.likes.unwrap_or(existing.likes),
        ..existing
    };

    Ok(Json(db::category::save(&pool, &changed).await?))
}

// DELETE /admin/rango/category/{id}/
pub async fn delete_category_handler(
    Path(id): Path<i64>,
    State(pool): State<DbPool>,
) -> Result<StatusCode, AppError> {
    if db::category::delete(&pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound("Category"))
    }
}

// GET /admin/rango/page/
pub async fn list_pages_handler(State(pool): State<DbPool>) -> Result<Json<ChangeList>, AppError> {
    let pages = db::page::list_with_category(&pool).await?;
    Ok(Json(PAGE_ADMIN.change_list(&pages)?))
}

// POST /admin/rango/page/
pub async fn create_page_handler(
    State(pool): State<DbPool>,
    Json(body): Json<CreatePageSchema>,
) -> Result<(StatusCode, Json<Page>), AppError> {
    let page = db::page::create(
        &pool,
        body.category_id,
        &body.title,
        &body.url,
        body.views.unwrap_or(0),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(page)))
}

// PUT /admin/rango/page/{id}/
pub async fn update_page_handler(
    Path(id): Path<i64>,
    State(pool): State<DbPool>,
    Json(body): Json<UpdatePageSchema>,
) -> Result<Json<Page>, AppError> {
    let existing = db::page::find_by_id(&pool, id)
        .await?
        .ok_or(AppError::NotFound("Page"))?;

    let changed = Page {
        category_id: body.category_id.unwrap_or(existing.category_id),
        title: body.title.unwrap_or(existing.title),
        url: body.url.unwrap_or(existing.url),
        views: body.views.unwrap_or(existing.views),
        ..existing
    };

    Ok(Json(db::page::save(&pool, &changed).await?))
}

// DELETE /admin/rango/page/{id}/
pub async fn delete_page_handler(
    Path(id): Path<i64>,
    State(pool): State<DbPool>,
) -> Result<StatusCode, AppError> {
    if db::page::delete(&pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound("Page"))
    }
}
