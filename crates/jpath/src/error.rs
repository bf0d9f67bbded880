use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum JPathError {
    #[error("Path parse error in '{input}': {message}")]
    Parse { input: String, message: String },

    #[error("Path '{0}' is empty")]
    Empty(String),
}
