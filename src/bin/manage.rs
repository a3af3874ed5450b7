use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use rango::{
    db,
    models::user::ROLE_ADMIN,
    populate::{self, SeedData, SeedSource},
    Config,
};

/// Administrative commands for a Rango database.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Database to operate on; defaults to DATABASE_URL.
    #[arg(long)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fills the database with the demonstration categories and pages.
    Populate {
        /// JSON seed file to use instead of the built-in data.
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Creates an admin account, or resets its password.
    CreateSuperuser {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .init();

    let args = Args::parse();
    let database_url = match args.database_url {
        Some(url) => url,
        None => Config::load()?.database_url,
    };
    let pool = db::init_db(&database_url)
        .await
        .with_context(|| format!("connecting to {database_url}"))?;

    match args.command {
        Command::Populate { file } => {
            let data = match file {
                None => SeedData::default(),
                Some(path) => match populate::locate(&path)? {
                    SeedSource::Present(data) => data,
                    SeedSource::Missing(path) => bail!("seed file {} does not exist", path.display()),
                },
            };

            println!("Starting Rango population script...");
            let report = populate::populate(&pool, &data).await?;
            println!(
                "Populated {} categories and {} pages",
                report.categories, report.pages
            );
        }
        Command::CreateSuperuser { username, password } => {
            let user = db::user::upsert(&pool, &username, &password, ROLE_ADMIN).await?;
            println!("Superuser {} created", user.username);
        }
    }

    Ok(())
}
