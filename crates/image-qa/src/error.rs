use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImageQaError {
    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Malformed hash {0:?}: expected 16 hex characters")]
    MalformedHash(String),
}
