use thiserror::Error;

#[derive(Error, Debug)]
pub enum VitalsError {
    #[error("Probe error: {0}")]
    Probe(String),

    #[error("Invalid reading: {0}")]
    InvalidReading(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, VitalsError>;
