//! # sablon
//!
//! Fills positioned page templates (quotes, invoices, proposals, service
//! slips) with values from business records and renders them to PDF.
//!
//! A render goes through four stages:
//!
//! 1. **Validating**: the template and its field mappings are checked
//!    against each other; every problem is reported at once.
//! 2. **Resolving**: each field's mapping is evaluated against the record
//!    (`sablon-resolve`).
//! 3. **Laying out**: tables grow or shrink to their row count and the
//!    fields below them move with them (`sablon-layout`).
//! 4. **Rendering**: pages are painted independently, possibly in parallel,
//!    and assembled in declared order (`sablon-render-lopdf`).
//!
//! ## Quick Start
//!
//! ```ignore
//! use sablon::{PipelineBuilder, Template, FieldMapping};
//!
//! let template = Template::from_json(&std::fs::read_to_string("teklif.json")?)?;
//! let mappings = FieldMapping::list_from_json(&std::fs::read_to_string("eslemeler.json")?)?;
//! let record: serde_json::Value = serde_json::from_str(&std::fs::read_to_string("kayit.json")?)?;
//!
//! let pipeline = PipelineBuilder::new().build()?;
//! let output = pipeline.render(&template, &mappings, &record)?;
//! output.save(output.suggested_file_name(&template))?;
//! ```
//!
//! ## Crate Architecture
//!
//! | Crate | Purpose |
//! |-------|---------|
//! | `sablon-types` | Geometry, colors, page sizes, ids |
//! | `sablon-jpath` | Record path expressions |
//! | `sablon-template` | Templates, schemas, field mappings |
//! | `sablon-resolve` | Value resolution and transforms |
//! | `sablon-layout` | Dynamic vertical-flow layout |
//! | `sablon-render-core` | Painters and the renderer trait |
//! | `sablon-render-lopdf` | PDF backend |
//! | `sablon-pdf-composer` | Backdrop page import |
//! | `sablon-executor` | Parallel page rendering |
//! | `sablon-resource` | Filesystem resource provider |

pub mod error;
pub mod pipeline;
pub mod registry;

pub use error::PipelineError;
pub use pipeline::{
    CancellationToken, DocumentPipeline, EngineConfig, OverflowWarning, PipelineBuilder,
    RenderOutput, RenderStage, ValidationIssue, ValidationReport,
};
pub use registry::{StoreError, TemplateRegistry, TemplateStore};

// Re-exports from member crates so callers need only one dependency.
pub use sablon_executor::{Executor, ExecutorImpl, SyncExecutor};
pub use sablon_layout::{FieldPlacement, LayoutConfig, LayoutPlan, compute_layout_plan};
pub use sablon_render_core::{DocumentRenderer, PageJob, PainterRegistry, RenderError};
pub use sablon_render_lopdf::{LopdfRenderer, PDF_MEDIA_TYPE, PdfPage};
pub use sablon_resolve::{
    ResolvedValue, ResolvedValues, TransformArgs, TransformError, TransformFn, TransformRegistry,
};
pub use sablon_resource::FilesystemResourceProvider;
pub use sablon_template::{
    BaseSurface, DocumentType, Field, FieldKind, FieldMapping, MappingSource, Schema, Template,
};
pub use sablon_traits::{InMemoryResourceProvider, ResourceProvider};
pub use sablon_types::{Point, ResourceUri, Size, TemplateId};

#[cfg(feature = "rayon-executor")]
pub use sablon_executor::RayonExecutor;
