pub mod category;
pub mod page;
pub mod user;

use std::time::Duration;

use sqlx::{
    any::{install_default_drivers, AnyPoolOptions},
    AnyPool, Executor,
};

pub type DbPool = AnyPool;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Postgres,
    Sqlite,
}

impl Backend {
    pub fn from_url(url: &str) -> Self {
        if url.starts_with("sqlite:") {
            Backend::Sqlite
        } else {
            Backend::Postgres
        }
    }

    fn schema(self) -> &'static [&'static str] {
        match self {
            Backend::Postgres => POSTGRES_SCHEMA,
            Backend::Sqlite => SQLITE_SCHEMA,
        }
    }
}

const POSTGRES_SCHEMA: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS categories (
        id BIGSERIAL PRIMARY KEY,
        name VARCHAR(128) NOT NULL UNIQUE,
        views BIGINT NOT NULL DEFAULT 0 CHECK (views >= 0),
        likes BIGINT NOT NULL DEFAULT 0 CHECK (likes >= 0),
        slug TEXT NOT NULL UNIQUE
    )"#,
    r#"CREATE TABLE IF NOT EXISTS pages (
        id BIGSERIAL PRIMARY KEY,
        category_id BIGINT NOT NULL REFERENCES categories (id) ON DELETE CASCADE,
        title VARCHAR(128) NOT NULL,
        url VARCHAR(200) NOT NULL,
        views BIGINT NOT NULL DEFAULT 0 CHECK (views >= 0)
    )"#,
    "CREATE INDEX IF NOT EXISTS pages_category_id_idx ON pages (category_id)",
    r#"CREATE TABLE IF NOT EXISTS users (
        id BIGSERIAL PRIMARY KEY,
        username VARCHAR(150) NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        role VARCHAR(16) NOT NULL DEFAULT 'editor'
    )"#,
];

const SQLITE_SCHEMA: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS categories (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        views INTEGER NOT NULL DEFAULT 0 CHECK (views >= 0),
        likes INTEGER NOT NULL DEFAULT 0 CHECK (likes >= 0),
        slug TEXT NOT NULL UNIQUE
    )"#,
    r#"CREATE TABLE IF NOT EXISTS pages (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        category_id INTEGER NOT NULL REFERENCES categories (id) ON DELETE CASCADE,
        title TEXT NOT NULL,
        url TEXT NOT NULL,
        views INTEGER NOT NULL DEFAULT 0 CHECK (views >= 0)
    )"#,
    "CREATE INDEX IF NOT EXISTS pages_category_id_idx ON pages (category_id)",
    r#"CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        role TEXT NOT NULL DEFAULT 'editor'
    )"#,
];

/// Connects to `database_url` (Postgres or SQLite) and creates the schema.
pub async fn init_db(database_url: &str) -> Result<DbPool, sqlx::Error> {
    install_default_drivers();

    let backend = Backend::from_url(database_url);
    let options = match backend {
        Backend::Postgres => AnyPoolOptions::new().max_connections(5),
        // Every SQLite connection needs foreign keys switched on; an in-memory
        // database also lives only as long as its single connection.
        Backend::Sqlite => {
            let options = AnyPoolOptions::new().after_connect(|conn, _meta| {
                Box::pin(async move {
                    conn.execute("PRAGMA foreign_keys = ON").await?;
                    Ok(())
                })
            });
            if database_url.contains(":memory:") {
                options
                    .max_connections(1)
                    .min_connections(1)
                    .idle_timeout(None::<Duration>)
                    .max_lifetime(None::<Duration>)
            } else {
                options.max_connections(5)
            }
        }
    };

    let pool = options.connect(database_url).await?;
    migrate(&pool, backend).await?;
    Ok(pool)
}

pub async fn migrate(pool: &DbPool, backend: Backend) -> Result<(), sqlx::Error> {
    for statement in backend.schema() {
        sqlx::query(statement).execute(pool).await?;
    }
    tracing::debug!("Schema ready ({:?})", backend);
    Ok(())
}
