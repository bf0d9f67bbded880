//! Output types from the layout engine.

use sablon_template::{Anchor, FieldKind};
use sablon_types::Rect;
use serde::Serialize;
use std::collections::BTreeMap;

/// Rows per variable-height field, keyed by field name.
pub type RowCounts = BTreeMap<String, usize>;

/// Row heights a table is drawn with, as used to size it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowMetrics {
    /// Zero when the header is hidden.
    pub header_height: f32,
    pub row_height: f32,
}

/// Final box of one field after flow adjustment.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldPlacement {
    pub name: String,
    pub kind: FieldKind,
    pub anchor: Anchor,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub declared_y: f32,
    pub declared_height: f32,
    /// Present for table fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<RowMetrics>,
}

impl FieldPlacement {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// How far the field moved from its declared position.
    pub fn shift(&self) -> f32 {
        self.y - self.declared_y
    }
}

/// Positions for every field of one page.
///
/// Placements keep the schema's declaration order, which is also the paint
/// order. The plan owns all of its data, so later edits to the schema it was
/// computed from cannot change it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutPlan {
    pub placements: Vec<FieldPlacement>,
    pub content_bottom: f32,
    pub usable_height: f32,
    pub overflow: bool,
}

impl LayoutPlan {
    pub fn get(&self, name: &str) -> Option<&FieldPlacement> {
        self.placements.iter().find(|p| p.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldPlacement> {
        self.placements.iter()
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    /// Final y and height per field name.
    pub fn positions(&self) -> BTreeMap<&str, (f32, f32)> {
        self.placements
            .iter()
            .map(|p| (p.name.as_str(), (p.y, p.height)))
            .collect()
    }
}
