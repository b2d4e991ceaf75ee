pub mod app;
pub mod config;
pub mod formatter;
pub mod models;
pub mod plugins;
pub mod runner;
pub mod scraper;
pub mod utils;

// Re-export commonly used types
pub use crate::config::AppConfig;
pub use utils::error::AppError;

pub type Result<T> = std::result::Result<T, AppError>;
