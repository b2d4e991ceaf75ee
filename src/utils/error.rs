use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration source error: {0}")]
    ConfigSource(#[from] config::ConfigError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid extraction pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Webhook rejected message: {}", describe_notify(.status, .message))]
    Notify { status: Option<u16>, message: String },

    #[error("Cancelled: {0}")]
    Cancelled(&'static str),

    #[error("Unknown source: {id}")]
    UnknownSource { id: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

fn describe_notify(status: &Option<u16>, message: &str) -> String {
    match status {
        Some(status) => format!("{} {}", status, message),
        None => message.to_string(),
    }
}

impl AppError {
    pub fn config(message: impl Into<String>) -> Self {
        AppError::Config(message.into())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
