use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Authorization error: {0}")]
    Auth(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// NotFound with the conventional message shape,
    /// e.g. `HouseList with id 7 not found`.
    pub fn not_found(entity: &str, key: &str, value: impl std::fmt::Display) -> Self {
        Error::NotFound(format!("{entity} with {key} {value} not found"))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
