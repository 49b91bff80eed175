use fieldcss::FieldCssError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Schema(#[from] FieldCssError),

    #[error("invalid block instance id `{0}`: use letters, digits, `-` or `_`")]
    InvalidInstanceId(String),

    #[error("invalid engine configuration: {0}")]
    Config(String),

    #[error("configuration JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("logger could not be installed: {0}")]
    Logger(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// Create a type alias for convenience
pub type Result<T> = std::result::Result<T, Error>;
