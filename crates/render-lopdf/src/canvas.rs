//! Canvas implementation that records PDF content stream operations.

use crate::encoding::encode_text;
use crate::images::{DecodedImage, decode};
use lopdf::content::{Content, Operation};
use lopdf::{Object, StringFormat};
use sablon_render_core::{Canvas, ImageData, RenderError, TextRun};
use sablon_types::{Color, Point, Rect};

pub const REGULAR_FONT: &str = "F1";
pub const BOLD_FONT: &str = "F2";

#[derive(Debug, Default, Clone, PartialEq)]
struct GraphicsState {
    fill_color: Option<Color>,
    stroke_color: Option<Color>,
    line_width: Option<f32>,
}

/// Collects the operations of one page.
///
/// Coordinates arrive with a top-left origin and are flipped against the
/// page height. Fill and stroke settings are only emitted when they change;
/// the cache is saved and restored with the `q`/`Q` pairs used for clipping.
pub struct PdfCanvas {
    page_height: f32,
    operations: Vec<Operation>,
    images: Vec<DecodedImage>,
    state: GraphicsState,
    saved: Vec<GraphicsState>,
}

/// The output of one page: content operations plus the images they name.
#[derive(Debug, Clone)]
pub struct PageContent {
    pub operations: Vec<Operation>,
    /// Referenced from the content as `/Im1`, `/Im2`, ...
    pub images: Vec<DecodedImage>,
}

pub fn image_name(index: usize) -> String {
    format!("Im{}", index + 1)
}

fn color_operands(color: Color) -> Vec<Object> {
    color.to_unit_rgb().iter().map(|c| (*c).into()).collect()
}

impl PdfCanvas {
    pub fn new(page_height: f32) -> Self {
        Self {
            page_height,
            operations: Vec::new(),
            images: Vec::new(),
            state: GraphicsState::default(),
            saved: Vec::new(),
        }
    }

    pub fn finish(mut self) -> PageContent {
        // Unbalanced clips would leak state into the next content stream.
        while self.saved.pop().is_some() {
            self.op("Q", vec![]);
        }
        PageContent {
            operations: self.operations,
            images: self.images,
        }
    }

    fn op(&mut self, operator: &str, operands: Vec<Object>) {
        self.operations.push(Operation::new(operator, operands));
    }

    fn flip(&self, y: f32) -> f32 {
        self.page_height - y
    }

    fn rect_operands(&self, rect: Rect) -> Vec<Object> {
        vec![
            rect.x.into(),
            self.flip(rect.bottom()).into(),
            rect.width.into(),
            rect.height.into(),
        ]
    }

    fn set_fill_color(&mut self, color: Color) {
        if self.state.fill_color != Some(color) {
            self.op("rg", color_operands(color));
            self.state.fill_color = Some(color);
        }
    }

    fn set_stroke(&mut self, color: Color, width: f32) {
        if self.state.stroke_color != Some(color) {
            self.op("RG", color_operands(color));
            self.state.stroke_color = Some(color);
        }
        if self.state.line_width != Some(width) {
            self.op("w", vec![width.into()]);
            self.state.line_width = Some(width);
        }
    }

    fn save(&mut self) {
        self.op("q", vec![]);
        self.saved.push(self.state.clone());
    }

    fn restore(&mut self) {
        if let Some(state) = self.saved.pop() {
            self.op("Q", vec![]);
            self.state = state;
        }
    }
}

impl Canvas for PdfCanvas {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.set_fill_color(color);
        let operands = self.rect_operands(rect);
        self.op("re", operands);
        self.op("f", vec![]);
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f32) {
        self.set_stroke(color, width);
        let operands = self.rect_operands(rect);
        self.op("re", operands);
        self.op("S", vec![]);
    }

    fn line(&mut self, from: Point, to: Point, color: Color, width: f32) {
        self.set_stroke(color, width);
        self.op("m", vec![from.x.into(), self.flip(from.y).into()]);
        self.op("l", vec![to.x.into(), self.flip(to.y).into()]);
        self.op("S", vec![]);
    }

    fn text(&mut self, run: &TextRun) {
        if run.text.trim().is_empty() {
            return;
        }
        let font = if run.bold { BOLD_FONT } else { REGULAR_FONT };
        self.op("BT", vec![]);
        self.op("Tf", vec![font.into(), run.font_size.into()]);
        self.set_fill_color(run.color);
        self.op("Td", vec![run.x.into(), self.flip(run.baseline_y).into()]);
        self.op(
            "Tj",
            vec![Object::String(encode_text(&run.text), StringFormat::Literal)],
        );
        self.op("ET", vec![]);
    }

    fn image(&mut self, rect: Rect, image: &ImageData) -> Result<(), RenderError> {
        let decoded = decode(&image.bytes)?;
        let name = image_name(self.images.len());
        self.images.push(decoded);

        self.save();
        self.op(
            "cm",
            vec![
                rect.width.into(),
                0.into(),
                0.into(),
                rect.height.into(),
                rect.x.into(),
                self.flip(rect.bottom()).into(),
            ],
        );
        self.op("Do", vec![Object::Name(name.into_bytes())]);
        self.restore();
        Ok(())
    }

    fn push_clip(&mut self, rect: Rect) {
        self.save();
        let operands = self.rect_operands(rect);
        self.op("re", operands);
        self.op("W", vec![]);
        self.op("n", vec![]);
    }

    fn pop_clip(&mut self) {
        self.restore();
    }
}

impl PageContent {
    pub fn encode(&self) -> Result<Vec<u8>, RenderError> {
        Content {
            operations: self.operations.clone(),
        }
        .encode()
        .map_err(|e| RenderError::Pdf(e.to_string()))
    }
}
