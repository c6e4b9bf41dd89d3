
use thiserror::Error;

use crate::engine::Rejection;

#[derive(Error, Debug)]
pub enum SigillError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("Fetch error: {0}")]
    Fetch(String),
    #[error("Malformed payload: {message}")]
    Payload { message: String },
    #[error("Validation failed: {0}")]
    Validation(Rejection),
    #[error("Internal invariant violated: {0}")]
    Invariant(String),
}

pub type Result<T> = std::result::Result<T, SigillError>;

// Helper conversions
impl From<config::ConfigError> for SigillError {
    fn from(e: config::ConfigError) -> Self { Self::Config(e.to_string()) }
}
impl From<reqwest::Error> for SigillError {
    fn from(e: reqwest::Error) -> Self { Self::Fetch(e.to_string()) }
}
impl From<Rejection> for SigillError {
    fn from(rejection: Rejection) -> Self { Self::Validation(rejection) }
}
