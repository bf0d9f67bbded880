//! Presentation settings attached to a field.
//!
//! Layout only reads the table row heights; everything else is passed
//! through untouched to the renderer.

use sablon_types::Color;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Border {
    #[serde(default)]
    pub color: Color,
    #[serde(default = "default_stroke_width")]
    pub width: f32,
}

fn default_stroke_width() -> f32 {
    1.0
}

fn default_font_size() -> f32 {
    10.0
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldStyle {
    pub font_size: f32,
    pub bold: bool,
    pub color: Color,
    pub align: TextAlign,
    /// Multiplier applied to the font size; defaults to 1.2 in the renderer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_height: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border: Option<Border>,
    /// Stroke for `line` and `rect` fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke: Option<Border>,
    /// Fill for `rect` fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<Color>,
    /// chrono format string used by `dateTime` fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<TableStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barcode: Option<BarcodeStyle>,
}

impl Default for FieldStyle {
    fn default() -> Self {
        Self {
            font_size: default_font_size(),
            bold: false,
            color: Color::BLACK,
            align: TextAlign::Left,
            line_height: None,
            background: None,
            border: None,
            stroke: None,
            fill: None,
            format: None,
            table: None,
            barcode: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableColumn {
    #[serde(default)]
    pub title: String,
    /// Fraction of the table width; columns without one share what is left.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    #[serde(default)]
    pub align: TextAlign,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_row_height: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_row_height: Option<f32>,
    #[serde(default = "default_true")]
    pub show_header: bool,
    #[serde(default)]
    pub columns: Vec<TableColumn>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_background: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid: Option<Border>,
}

impl Default for TableStyle {
    fn default() -> Self {
        Self {
            header_row_height: None,
            data_row_height: None,
            show_header: true,
            columns: Vec::new(),
            header_background: None,
            grid: None,
        }
    }
}

impl TableStyle {
    /// Column widths in points for a table `total_width` wide.
    pub fn column_widths(&self, total_width: f32) -> Vec<f32> {
        if self.columns.is_empty() {
            return Vec::new();
        }
        let claimed: f32 = self.columns.iter().filter_map(|c| c.width).sum();
        let open = self.columns.iter().filter(|c| c.width.is_none()).count();
        let share = if open > 0 {
            (1.0 - claimed).max(0.0) / open as f32
        } else {
            0.0
        };
        self.columns
            .iter()
            .map(|c| c.width.unwrap_or(share) * total_width)
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BarcodeFormat {
    #[default]
    Code128,
    Code39,
    Ean13,
    #[serde(alias = "qr")]
    QrCode,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarcodeStyle {
    #[serde(default)]
    pub format: BarcodeFormat,
}
