use miette::{Diagnostic, Result};
use thiserror::Error;

/// Main error type for the application
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Discord API error: {0}")]
    #[diagnostic(code(roomfinder::discord_api))]
    DiscordApi(#[from] serenity::Error),

    #[error("Environment error: {0}")]
    #[diagnostic(code(roomfinder::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(roomfinder::config))]
    Config(String),

    #[error("Invalid time '{0}'")]
    #[diagnostic(
        code(roomfinder::invalid_time),
        help("Times look like 9:30am, 1:15pm or 1430")
    )]
    InvalidTime(String),

    #[error("Scrape error: {0}")]
    #[diagnostic(code(roomfinder::scrape))]
    Scrape(String),

    #[error("Room cache error: {0}")]
    #[diagnostic(code(roomfinder::cache))]
    Cache(String),

    #[error("Component error: {0}")]
    #[diagnostic(code(roomfinder::component))]
    Component(String),

    #[error(transparent)]
    #[diagnostic(code(roomfinder::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(roomfinder::serialization))]
    Serialization(String),

    #[error("Other error: {0}")]
    #[diagnostic(code(roomfinder::other))]
    Other(String),
}

// Implement From for TOML deserialization errors
impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Type alias for Result with our Error type
pub type BotResult<T> = Result<T, Error>;

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Missing environment variable: {}", var))
}

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create component errors
pub fn component_error(message: &str) -> Error {
    Error::Component(message.to_string())
}

/// Helper to create scrape errors
pub fn scrape_error(message: &str) -> Error {
    Error::Scrape(message.to_string())
}

/// Helper to create cache errors
pub fn cache_error(message: &str) -> Error {
    Error::Cache(message.to_string())
}

/// Helper to create invalid time errors
pub fn invalid_time(raw: &str) -> Error {
    Error::InvalidTime(raw.to_string())
}
