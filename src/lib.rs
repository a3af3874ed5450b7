pub mod config;
pub mod db;
pub mod error;
pub mod forms;
pub mod handlers;
pub mod models;
pub mod populate;
pub mod routes;
pub mod state;
pub mod utils;

pub use config::Config;
pub use error::AppError;
pub use state::AppState;
