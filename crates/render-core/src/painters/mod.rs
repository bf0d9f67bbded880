//! One painter per field kind.
//!
//! A painter takes a field, its final placement and its resolved value and
//! turns them into [`Canvas`] operations. Painters never compute positions or
//! look at the business record; everything they need arrives in the
//! [`PaintContext`].

mod barcode;
mod image;
mod shapes;
mod table;
mod text;

pub use barcode::{encode_linear, paint_barcode};
pub use image::paint_image;
pub use shapes::{paint_checkbox, paint_line, paint_rect};
pub use table::paint_table;
pub use text::{draw_text_box, paint_date_time, paint_text};

use crate::canvas::Canvas;
use crate::error::RenderError;
use sablon_layout::{FieldPlacement, LayoutPlan};
use sablon_resolve::{ResolvedValue, ResolvedValues};
use sablon_template::{Field, FieldKind, Schema};
use sablon_traits::ResourceProvider;
use std::collections::BTreeMap;

/// Everything a painter may look at for one field.
#[derive(Clone, Copy)]
pub struct PaintContext<'a> {
    pub field: &'a Field,
    pub placement: &'a FieldPlacement,
    pub value: &'a ResolvedValue,
    pub resources: Option<&'a dyn ResourceProvider>,
}

pub type PaintFn = fn(&mut dyn Canvas, &PaintContext<'_>) -> Result<(), RenderError>;

/// Lookup table from field kind to painter.
#[derive(Debug, Clone)]
pub struct PainterRegistry {
    painters: BTreeMap<FieldKind, PaintFn>,
}

impl Default for PainterRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        for kind in FieldKind::ALL {
            registry.register(kind, builtin(kind));
        }
        registry
    }
}

/// The stock painter for `kind`. The match keeps the set exhaustive.
fn builtin(kind: FieldKind) -> PaintFn {
    match kind {
        FieldKind::Text => paint_text,
        FieldKind::Image => paint_image,
        FieldKind::Table => paint_table,
        FieldKind::Barcode => paint_barcode,
        FieldKind::Line => paint_line,
        FieldKind::Rect => paint_rect,
        FieldKind::Checkbox => paint_checkbox,
        FieldKind::DateTime => paint_date_time,
    }
}

impl PainterRegistry {
    /// A registry without painters; every field is unsupported until one is
    /// registered.
    pub fn empty() -> Self {
        Self {
            painters: BTreeMap::new(),
        }
    }

    /// Adds or replaces the painter for `kind`.
    pub fn register(&mut self, kind: FieldKind, painter: PaintFn) {
        self.painters.insert(kind, painter);
    }

    pub fn supports(&self, kind: FieldKind) -> bool {
        self.painters.contains_key(&kind)
    }

    pub fn paint(&self, canvas: &mut dyn Canvas, ctx: &PaintContext<'_>) -> Result<(), RenderError> {
        let painter = self
            .painters
            .get(&ctx.field.kind)
            .ok_or_else(|| RenderError::UnsupportedFieldKind {
                field: ctx.field.name.clone(),
                kind: ctx.field.kind,
            })?;
        painter(canvas, ctx)
    }

    /// Paints every field of `schema` in declaration order.
    ///
    /// `plan` must have been computed from `schema`. The first failing field
    /// aborts the page.
    pub fn paint_page(
        &self,
        canvas: &mut dyn Canvas,
        schema: &Schema,
        plan: &LayoutPlan,
        values: &ResolvedValues,
        resources: Option<&dyn ResourceProvider>,
    ) -> Result<(), RenderError> {
        if schema.len() != plan.len() {
            return Err(RenderError::Other(format!(
                "layout plan has {} placements for {} fields",
                plan.len(),
                schema.len()
            )));
        }
        for (field, placement) in schema.iter().zip(plan.iter()) {
            if field.name != placement.name {
                return Err(RenderError::Other(format!(
                    "layout plan places '{}' where '{}' was declared",
                    placement.name, field.name
                )));
            }
            let ctx = PaintContext {
                field,
                placement,
                value: values.get(&field.name),
                resources,
            };
            self.paint(canvas, &ctx)?;
        }
        Ok(())
    }
}

/// Text for kinds that print a scalar. `None` leaves the field blank.
pub(crate) fn scalar_text(
    ctx: &PaintContext<'_>,
    expected: &'static str,
) -> Result<Option<String>, RenderError> {
    if ctx.value.is_absent() {
        return Ok(None);
    }
    match ctx.value.display_text() {
        Some(text) => Ok(Some(text)),
        None => Err(RenderError::type_mismatch(
            &ctx.field.name,
            expected,
            ctx.value.shape(),
        )),
    }
}
