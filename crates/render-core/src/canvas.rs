//! Drawing primitives shared by every backend.
//!
//! Painters work in page coordinates with the origin at the top-left corner
//! and y growing downwards, the same space the layout plan uses. Backends
//! convert to their own coordinate system.

use crate::error::RenderError;
use sablon_types::{Color, Point, Rect};
use std::sync::Arc;

/// One line of text positioned by its left edge and baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub x: f32,
    pub baseline_y: f32,
    pub font_size: f32,
    pub bold: bool,
    pub color: Color,
}

/// Encoded image bytes (PNG or JPEG) ready to be placed.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageData {
    pub bytes: Arc<Vec<u8>>,
    /// Source label for log messages.
    pub label: String,
}

pub trait Canvas {
    fn fill_rect(&mut self, rect: Rect, color: Color);

    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f32);

    fn line(&mut self, from: Point, to: Point, color: Color, width: f32);

    fn text(&mut self, run: &TextRun);

    /// Draws an image scaled to `rect`. Undecodable data is an error.
    fn image(&mut self, rect: Rect, image: &ImageData) -> Result<(), RenderError>;

    /// Restricts following operations to `rect` until the matching
    /// [`pop_clip`](Canvas::pop_clip).
    fn push_clip(&mut self, rect: Rect);

    fn pop_clip(&mut self);
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    FillRect { rect: Rect, color: Color },
    StrokeRect { rect: Rect, color: Color, width: f32 },
    Line { from: Point, to: Point, color: Color, width: f32 },
    Text(TextRun),
    Image { rect: Rect, label: String },
    PushClip(Rect),
    PopClip,
}

/// A canvas that keeps every operation in order.
#[derive(Debug, Default, Clone)]
pub struct RecordingCanvas {
    pub ops: Vec<DrawOp>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn texts(&self) -> Vec<&TextRun> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text(run) => Some(run),
                _ => None,
            })
            .collect()
    }

    pub fn filled_rects(&self) -> Vec<Rect> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::FillRect { rect, .. } => Some(*rect),
                _ => None,
            })
            .collect()
    }

    pub fn clip_depth(&self) -> isize {
        self.ops.iter().fold(0, |depth, op| match op {
            DrawOp::PushClip(_) => depth + 1,
            DrawOp::PopClip => depth - 1,
            _ => depth,
        })
    }
}

impl Canvas for RecordingCanvas {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.ops.push(DrawOp::FillRect { rect, color });
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f32) {
        self.ops.push(DrawOp::StrokeRect { rect, color, width });
    }

    fn line(&mut self, from: Point, to: Point, color: Color, width: f32) {
        self.ops.push(DrawOp::Line { from, to, color, width });
    }

    fn text(&mut self, run: &TextRun) {
        self.ops.push(DrawOp::Text(run.clone()));
    }

    fn image(&mut self, rect: Rect, image: &ImageData) -> Result<(), RenderError> {
        self.ops.push(DrawOp::Image {
            rect,
            label: image.label.clone(),
        });
        Ok(())
    }

    fn push_clip(&mut self, rect: Rect) {
        self.ops.push(DrawOp::PushClip(rect));
    }

    fn pop_clip(&mut self) {
        self.ops.push(DrawOp::PopClip);
    }
}
