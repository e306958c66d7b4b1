//! Error types for the navigation facade.

use thiserror::Error;
use tilenav_core::GridError;

#[derive(Error, Debug)]
pub enum NavError {
    #[error("invalid grid: {0}")]
    Grid(#[from] GridError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for NavError {
    fn from(e: toml::de::Error) -> Self {
        NavError::Config(e.to_string())
    }
}

impl From<toml::ser::Error> for NavError {
    fn from(e: toml::ser::Error) -> Self {
        NavError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, NavError>;
