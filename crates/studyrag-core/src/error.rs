use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Index not built. Call build() first.")]
    NotBuilt,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, Error>;
