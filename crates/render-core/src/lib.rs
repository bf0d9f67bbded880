//! Renderer abstractions for sablon documents.
//!
//! This crate sits between the layout engine and concrete backends:
//! - [`Canvas`]: the drawing primitives a backend implements
//! - [`PainterRegistry`]: one painter per field kind, dispatched by lookup
//! - [`DocumentRenderer`]: page rendering and document assembly
//! - Helvetica metrics for measuring and wrapping text

pub mod canvas;
mod error;
pub mod metrics;
pub mod painters;
mod traits;

pub use canvas::{Canvas, DrawOp, ImageData, RecordingCanvas, TextRun};
pub use error::RenderError;
pub use painters::{PaintContext, PaintFn, PainterRegistry};
pub use traits::{DocumentRenderer, PageJob};
