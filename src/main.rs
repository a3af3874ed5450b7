use std::net::SocketAddr;

use anyhow::Context;
use rango::{
    db,
    models::user::ROLE_ADMIN,
    populate::populate_optional,
    routes, AppState, Config,
};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load()?;

    let pool = db::init_db(&config.database_url)
        .await
        .with_context(|| format!("connecting to {}", config.database_url))?;
    tracing::info!("Database ready");

    if config.seed_on_start {
        populate_optional(&pool, config.seed_file.as_deref()).await;
    }

    if let (Some(username), Some(password)) = (&config.admin_username, &config.admin_password) {
        match db::user::upsert(&pool, username, password, ROLE_ADMIN).await {
            Ok(user) => tracing::info!("Admin account {} ready", user.username),
            Err(e) => tracing::warn!("Could not create admin account {username}: {e}"),
        }
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let app = routes::create_app(AppState::new(pool, config));

    tracing::info!("Rango listening on http://{}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    axum::serve(listener, app).await?;

    Ok(())
}
