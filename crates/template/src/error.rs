use sablon_jpath::JPathError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Template JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid path in mapping: {0}")]
    Path(#[from] JPathError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
