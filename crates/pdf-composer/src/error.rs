use thiserror::Error;

#[derive(Error, Debug)]
pub enum ComposerError {
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Backdrop PDF is encrypted")]
    Encrypted,

    #[error("Backdrop PDF has no pages")]
    NoPages,
}
