use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("no tables or text were extracted from the document")]
    NoContent,

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid registry: {0}")]
    InvalidRegistry(String),
}
