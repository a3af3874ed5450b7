use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const TITLE_MAX_LENGTH: usize = 128;
pub const URL_MAX_LENGTH: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, FromRow)]
pub struct Page {
    pub id: i64,
    pub category_id: i64,
    pub title: String,
    pub url: String,
    pub views: i64,
}

/// A page joined with the name of its category, as the admin lists it.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PageWithCategory {
    pub id: i64,
    pub title: String,
    pub category_id: i64,
    pub category: String,
    pub url: String,
    pub views: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreatePageSchema {
    pub category_id: i64,
    pub title: String,
    pub url: String,
    pub views: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdatePageSchema {
    pub category_id: Option<i64>,
    pub title: Option<String>,
    pub url: Option<String>,
    pub views: Option<i64>,
}
