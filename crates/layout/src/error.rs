use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error("Field '{0}' has a non-finite or negative position or size")]
    InvalidGeometry(String),

    #[error("Field '{field}' has an invalid row height: {value}")]
    InvalidRowHeight { field: String, value: f32 },

    #[error("Usable page height must be finite and positive, got {0}")]
    InvalidUsableHeight(f32),
}
