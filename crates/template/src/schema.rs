use crate::style::FieldStyle;
use itertools::Itertools;
use sablon_types::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a field draws. The set is closed: every kind has exactly one painter
/// in the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKind {
    Text,
    Image,
    Table,
    Barcode,
    Line,
    Rect,
    Checkbox,
    DateTime,
}

impl FieldKind {
    pub const ALL: [FieldKind; 8] = [
        FieldKind::Text,
        FieldKind::Image,
        FieldKind::Table,
        FieldKind::Barcode,
        FieldKind::Line,
        FieldKind::Rect,
        FieldKind::Checkbox,
        FieldKind::DateTime,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Image => "image",
            FieldKind::Table => "table",
            FieldKind::Barcode => "barcode",
            FieldKind::Line => "line",
            FieldKind::Rect => "rect",
            FieldKind::Checkbox => "checkbox",
            FieldKind::DateTime => "dateTime",
        }
    }

    /// Static decorations that never take a value from a mapping.
    pub fn is_decoration(&self) -> bool {
        matches!(self, FieldKind::Line | FieldKind::Rect)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Anchor {
    /// Keeps its declared position apart from the offset of growing blocks above it.
    #[default]
    Fixed,
    /// Positioned relative to the nearest preceding flow or variable field.
    Flow,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub name: String,
    pub kind: FieldKind,
    pub position: Point,
    pub size: Size,
    #[serde(default)]
    pub anchor: Anchor,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub variable_height: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
    #[serde(default)]
    pub style: FieldStyle,
}

impl Field {
    pub fn new(name: impl Into<String>, kind: FieldKind, position: Point, size: Size) -> Self {
        Self {
            name: name.into(),
            kind,
            position,
            size,
            anchor: Anchor::Fixed,
            variable_height: false,
            required: false,
            style: FieldStyle::default(),
        }
    }

    pub fn with_anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn with_style(mut self, style: FieldStyle) -> Self {
        self.style = style;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn variable_height(mut self) -> Self {
        self.variable_height = true;
        self
    }

    pub fn declared_rect(&self) -> Rect {
        Rect::from_parts(self.position, self.size)
    }

    pub fn has_valid_geometry(&self) -> bool {
        let values = [
            self.position.x,
            self.position.y,
            self.size.width,
            self.size.height,
        ];
        values.iter().all(|v| v.is_finite()) && self.size.width >= 0.0 && self.size.height >= 0.0
    }
}

/// One page's fields, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    pub fields: Vec<Field>,
}

impl Schema {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Names that occur more than once, each reported once in first-seen order.
    pub fn duplicate_names(&self) -> Vec<&str> {
        self.fields
            .iter()
            .map(|f| f.name.as_str())
            .duplicates()
            .collect()
    }

    pub fn variable_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.variable_height)
    }
}
