//! Render request orchestration.
//!
//! - [`PipelineBuilder`]: fluent builder for a PDF pipeline
//! - [`DocumentPipeline`]: runs `Validating → Resolving → LayingOut → Rendering`
//! - [`CancellationToken`]: abandons a render between stages
//! - [`RenderOutput`]: bytes plus page count and overflow flags
//!
//! # Example
//!
//! ```ignore
//! use sablon::PipelineBuilder;
//!
//! let pipeline = PipelineBuilder::new().with_worker_threads(4).build()?;
//! let output = pipeline.render(&template, &mappings, &record)?;
//! output.save("teklif.pdf")?;
//! ```

mod builder;
pub mod config;
mod orchestrator;
mod output;
mod stage;
mod validate;

pub use builder::PipelineBuilder;
pub use config::EngineConfig;
pub use orchestrator::DocumentPipeline;
pub use output::{OverflowWarning, RenderOutput};
pub use stage::{CancellationToken, RenderStage};
pub use validate::{ValidationIssue, ValidationReport, validate};
