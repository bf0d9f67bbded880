use sablon_template::FieldKind;
use sablon_traits::ResourceError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("No painter is registered for field '{field}' of kind '{kind}'")]
    UnsupportedFieldKind { field: String, kind: FieldKind },

    #[error("Field '{field}' expects {expected} but resolved to {found}")]
    RenderType {
        field: String,
        expected: &'static str,
        found: String,
    },

    #[error("Resource error: {0}")]
    Resource(#[from] ResourceError),

    #[error("PDF generation error: {0}")]
    Pdf(String),

    #[error("Backdrop error: {0}")]
    Backdrop(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Other rendering error: {0}")]
    Other(String),
}

impl RenderError {
    pub(crate) fn type_mismatch(
        field: &str,
        expected: &'static str,
        found: impl Into<String>,
    ) -> Self {
        RenderError::RenderType {
            field: field.to_string(),
            expected,
            found: found.into(),
        }
    }
}

impl From<&str> for RenderError {
    fn from(s: &str) -> Self {
        RenderError::Other(s.to_string())
    }
}
