//! Demonstration data for a fresh database.
//!
//! The built-in data set is always available through [`SeedData::default`].
//! A JSON file with the same shape can replace it; [`locate`] tells a
//! missing file apart from a malformed one so callers can decide how loud
//! to be about each.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use sqlx::AnyConnection;
use thiserror::Error;

use crate::{
    db::{self, DbPool},
    error::AppError,
    models::{category::Category, page::Page},
};

#[derive(Debug, Clone, Deserialize)]
pub struct SeedData {
    pub categories: Vec<SeedCategory>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedCategory {
    pub name: String,
    #[serde(default)]
    pub views: i64,
    #[serde(default)]
    pub likes: i64,
    #[serde(default)]
    pub pages: Vec<SeedPage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedPage {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub views: i64,
}

fn page(title: &str, url: &str, views: i64) -> SeedPage {
    SeedPage {
        title: title.to_string(),
        url: url.to_string(),
        views,
    }
}

impl Default for SeedData {
    fn default() -> Self {
        Self {
            categories: vec![
                SeedCategory {
                    name: "Python".into(),
                    views: 128,
                    likes: 64,
                    pages: vec![
                        page("Official Python Tutorial", "http://docs.python.org/3/tutorial/", 42),
                        page(
                            "How to Think like a Computer Scientist",
                            "http://www.greenteapress.com/thinkpython/",
                            27,
                        ),
                        page(
                            "Learn Python in 10 Minutes",
                            "http://www.korokithakis.net/tutorials/python/",
                            19,
                        ),
                    ],
                },
                SeedCategory {
                    name: "Django".into(),
                    views: 64,
                    likes: 32,
                    pages: vec![
                        page(
                            "Official Django Tutorial",
                            "https://docs.djangoproject.com/en/stable/intro/tutorial01/",
                            36,
                        ),
                        page("Django Rocks", "http://www.djangorocks.com/", 12),
                        page("How to Tango with Django", "http://www.tangowithdjango.com/", 23),
                    ],
                },
                SeedCategory {
                    name: "Other Frameworks".into(),
                    views: 32,
                    likes: 16,
                    pages: vec![
                        page("Bottle", "http://bottlepy.org/docs/dev/", 8),
                        page("Flask", "http://flask.pocoo.org", 15),
                    ],
                },
            ],
        }
    }
}

#[derive(Debug)]
pub enum SeedSource {
    Present(SeedData),
    Missing(PathBuf),
}

#[derive(Error, Debug)]
pub enum SeedError {
    #[error("Seed file {path} is malformed: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Seed file {path} could not be read: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub fn locate(path: &Path) -> Result<SeedSource, SeedError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Ok(SeedSource::Missing(path.to_path_buf()))
        }
        Err(source) => {
            return Err(SeedError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    serde_json::from_str(&raw)
        .map(SeedSource::Present)
        .map_err(|source| SeedError::Malformed {
            path: path.to_path_buf(),
            source,
        })
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PopulateReport {
    pub categories: usize,
    pub pages: usize,
}

/// Writes `data` into the database in one transaction: either every entry
/// is written or none is. Running it twice leaves one row per category name
/// and per (category, page title).
pub async fn populate(pool: &DbPool, data: &SeedData) -> Result<PopulateReport, AppError> {
    let mut report = PopulateReport::default();
    let mut tx = pool.begin().await?;

    for seed in &data.categories {
        let category = add_category(&mut tx, seed).await?;
        report.categories += 1;

        for page in &seed.pages {
            add_page(&mut tx, &category, page).await?;
            report.pages += 1;
        }
    }

    tx.commit().await?;

    for category in db::category::PopularCategories::all().fetch_all(pool).await? {
        let pages = db::page::list_for_category(pool, category.id).await?;
        for page in pages {
            tracing::debug!("- {} - {}", category.name, page.title);
        }
    }

    Ok(report)
}

async fn add_category(conn: &mut AnyConnection, seed: &SeedCategory) -> Result<Category, AppError> {
    match db::category::find_by_name(&mut *conn, seed.name.trim()).await? {
        Some(existing) => {
            let updated = Category {
                views: seed.views,
                likes: seed.likes,
                ..existing
            };
            db::category::save(conn, &updated).await
        }
        None => db::category::create(conn, &seed.name, seed.views, seed.likes).await,
    }
}

async fn add_page(
    conn: &mut AnyConnection,
    category: &Category,
    seed: &SeedPage,
) -> Result<Page, AppError> {
    match db::page::find_by_title(&mut *conn, category.id, seed.title.trim()).await? {
        Some(existing) => {
            let updated = Page {
                url: seed.url.clone(),
                views: seed.views,
                ..existing
            };
            db::page::save(conn, &updated).await
        }
        None => db::page::create(conn, category.id, &seed.title, &seed.url, seed.views).await,
    }
}

/// Seeds from `path` when given, otherwise from the built-in data set.
/// A missing or malformed seed file is logged and skipped. A seed that fails
/// part way is rolled back, so the database is left as it was.
pub async fn populate_optional(pool: &DbPool, path: Option<&Path>) -> Option<PopulateReport> {
    let data = match path.map(locate) {
        None => SeedData::default(),
        Some(Ok(SeedSource::Present(data))) => data,
        Some(Ok(SeedSource::Missing(path))) => {
            tracing::warn!("Seed file {} does not exist, skipping populate", path.display());
            return None;
        }
        Some(Err(e)) => {
            tracing::warn!("{e}, skipping populate");
            return None;
        }
    };

    match populate(pool, &data).await {
        Ok(report) => {
            tracing::info!(
                "Populated {} categories and {} pages",
                report.categories,
                report.pages
            );
            Some(report)
        }
        Err(e) => {
            tracing::warn!("populate failed: {e}");
            None
        }
    }
}
