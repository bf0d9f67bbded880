use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransformError {
    #[error("Transform '{transform}' got invalid input: {message}")]
    InvalidInput { transform: String, message: String },

    #[error("Transform '{transform}' has invalid option '{option}': {message}")]
    InvalidOption {
        transform: String,
        option: String,
        message: String,
    },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolveError {
    #[error("Required fields resolved to nothing: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    #[error("Field '{field}' uses unknown transform '{transform}'")]
    UnknownTransform { field: String, transform: String },

    #[error("Transform failed for field '{field}': {source}")]
    Transform {
        field: String,
        #[source]
        source: TransformError,
    },
}
