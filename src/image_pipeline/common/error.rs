use thiserror::Error;

#[derive(Error, Debug)]
pub enum FusionError {
    #[error("Camera configuration error: {0}")]
    Configuration(String),

    #[error("Missing or bad resource: {0}")]
    MissingResource(String),

    #[error("Alignment error: {0}")]
    Alignment(String),

    #[error("Malformed cached data: {0}")]
    Serialization(String),

    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Failed to encode image: {0}")]
    Encode(String),

    #[error("Failed to write output file: {0}")]
    OutputWrite(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FusionError>;
