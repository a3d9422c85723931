use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A documented-domain violation the scoring core cannot default
    /// (non-finite duration, malformed date string, unknown widget key).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("store error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("settings error: {0}")]
    Settings(String),
}

pub type Result<T> = std::result::Result<T, Error>;
