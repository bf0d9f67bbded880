//! The template model: what a document looks like and where its values come from.
//!
//! - [`Template`] owns one [`Schema`] per physical page plus the base surface
//!   the fields are overlaid on.
//! - [`FieldMapping`] binds a field name to a [`MappingSource`] (record path,
//!   literal, computed transform, skip, or table rows).
//!
//! Both are plain serde data so they round-trip through whatever store holds them.

pub mod error;
pub mod mapping;
pub mod schema;
pub mod style;
pub mod template;

pub use error::TemplateError;
pub use mapping::{CellSource, ComputedSource, FieldMapping, MappingSource, TableMapping};
pub use schema::{Anchor, Field, FieldKind, Schema};
pub use style::{
    BarcodeFormat, BarcodeStyle, Border, FieldStyle, TableColumn, TableStyle, TextAlign,
};
pub use template::{BaseSurface, DocumentType, StructuralIssue, Template};
