use crate::pipeline::{RenderStage, ValidationIssue, ValidationReport};
use crate::registry::StoreError;
use sablon_layout::LayoutError;
use sablon_render_core::RenderError;
use sablon_resolve::{ResolveError, TransformError};
use sablon_template::FieldKind;
use thiserror::Error;

/// Every way a render request can fail.
///
/// All variants are fatal: a failed render returns no bytes. Overflow is not
/// an error and is reported through `RenderOutput::warnings` instead.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Validation failed: {0}")]
    Validation(ValidationReport),

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

    #[error("Layout failed: {0}")]
    Layout(#[from] LayoutError),

    #[error("No renderer for field '{field}' of kind '{kind}'")]
    UnsupportedFieldKind { field: String, kind: FieldKind },

    #[error("Field '{field}' expects {expected} but resolved to {found}")]
    RenderType {
        field: String,
        expected: &'static str,
        found: String,
    },

    #[error("Rendering failed: {0}")]
    Render(RenderError),

    #[error("Render cancelled before {0}")]
    Cancelled(RenderStage),

    #[error("Template store error: {0}")]
    Store(#[from] StoreError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PipelineError {
    /// The stage the request was in when it failed, or `None` for failures
    /// outside a render (configuration, store access, output I/O).
    pub fn stage(&self) -> Option<RenderStage> {
        match self {
            PipelineError::Validation(_) | PipelineError::UnknownTransform { .. } => {
                Some(RenderStage::Validating)
            }
            PipelineError::MissingFields(_) | PipelineError::Transform { .. } => {
                Some(RenderStage::Resolving)
            }
            PipelineError::Layout(_) => Some(RenderStage::LayingOut),
            PipelineError::UnsupportedFieldKind { .. }
            | PipelineError::RenderType { .. }
            | PipelineError::Render(_) => Some(RenderStage::Rendering),
            PipelineError::Cancelled(stage) => Some(*stage),
            PipelineError::Store(_)
            | PipelineError::Config(_)
            | PipelineError::Io(_)
            | PipelineError::Json(_) => None,
        }
    }

    /// Field names the error is about, for reporting.
    pub fn field_names(&self) -> Vec<&str> {
        match self {
            PipelineError::Validation(report) => report.field_names(),
            PipelineError::MissingFields(fields) => fields.iter().map(String::as_str).collect(),
            PipelineError::UnknownTransform { field, .. }
            | PipelineError::Transform { field, .. }
            | PipelineError::UnsupportedFieldKind { field, .. }
            | PipelineError::RenderType { field, .. } => vec![field.as_str()],
            _ => Vec::new(),
        }
    }

    pub(crate) fn from_report(report: ValidationReport) -> Self {
        if report.only_unknown_transforms()
            && let Some(ValidationIssue::UnknownTransform { field, transform }) = report.issues.first()
        {
            return PipelineError::UnknownTransform {
                field: field.clone(),
                transform: transform.clone(),
            };
        }
        PipelineError::Validation(report)
    }
}

impl From<ResolveError> for PipelineError {
    fn from(e: ResolveError) -> Self {
        match e {
            ResolveError::MissingFields(fields) => PipelineError::MissingFields(fields),
            ResolveError::UnknownTransform { field, transform } => {
                PipelineError::UnknownTransform { field, transform }
            }
            ResolveError::Transform { field, source } => PipelineError::Transform { field, source },
        }
    }
}

impl From<RenderError> for PipelineError {
    fn from(e: RenderError) -> Self {
        match e {
            RenderError::UnsupportedFieldKind { field, kind } => {
                PipelineError::UnsupportedFieldKind { field, kind }
            }
            RenderError::RenderType {
                field,
                expected,
                found,
            } => PipelineError::RenderType {
                field,
                expected,
                found,
            },
            other => PipelineError::Render(other),
        }
    }
}
