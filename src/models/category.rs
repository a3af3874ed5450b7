use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const NAME_MAX_LENGTH: usize = 128;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub views: i64,
    pub likes: i64,
    pub slug: String,
}

// Admin payload; the slug is always derived from the name.
#[derive(Debug, Deserialize)]
pub struct CreateCategorySchema {
    pub name: String,
    pub views: Option<i64>,
    pub likes: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateCategorySchema {
    pub name: Option<String>,
    pub views: Option<i64>,
    pub likes: Option<i64>,
}
