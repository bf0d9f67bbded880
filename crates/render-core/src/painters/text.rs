use super::{PaintContext, scalar_text};
use crate::canvas::{Canvas, TextRun};
use crate::error::RenderError;
use crate::metrics::{text_width, wrap_lines};
use sablon_resolve::{ResolvedValue, reformat_date};
use sablon_template::{FieldStyle, TextAlign};
use sablon_types::Rect;

const BOX_PADDING: f32 = 2.0;
const DEFAULT_LINE_HEIGHT: f32 = 1.2;
/// Distance from the top of a line box to the baseline, in ems.
const ASCENT: f32 = 0.8;

pub fn paint_text(canvas: &mut dyn Canvas, ctx: &PaintContext<'_>) -> Result<(), RenderError> {
    let text = scalar_text(ctx, "text, number or boolean")?;
    draw_text_box(
        canvas,
        &ctx.field.style,
        ctx.placement.rect(),
        text.as_deref().unwrap_or(""),
    );
    Ok(())
}

/// Like text, but date strings are re-rendered with the style's `format`.
pub fn paint_date_time(canvas: &mut dyn Canvas, ctx: &PaintContext<'_>) -> Result<(), RenderError> {
    let text = scalar_text(ctx, "date text")?.map(|raw| {
        match (&ctx.field.style.format, ctx.value) {
            (Some(format), ResolvedValue::Text(_)) => {
                reformat_date(&raw, format).unwrap_or(raw)
            }
            _ => raw,
        }
    });
    draw_text_box(
        canvas,
        &ctx.field.style,
        ctx.placement.rect(),
        text.as_deref().unwrap_or(""),
    );
    Ok(())
}

/// Draws the box decoration and the wrapped text, clipped to `rect`.
pub fn draw_text_box(canvas: &mut dyn Canvas, style: &FieldStyle, rect: Rect, text: &str) {
    if let Some(background) = style.background {
        canvas.fill_rect(rect, background);
    }
    if let Some(border) = &style.border {
        canvas.stroke_rect(rect, border.color, border.width);
    }
    if text.is_empty() {
        return;
    }

    let padding = if style.border.is_some() || style.background.is_some() {
        BOX_PADDING
    } else {
        0.0
    };
    let inner = rect.inset(padding);
    let line_height = style.font_size * style.line_height.unwrap_or(DEFAULT_LINE_HEIGHT);

    canvas.push_clip(rect);
    for (i, line) in wrap_lines(text, inner.width, style.font_size, style.bold)
        .into_iter()
        .enumerate()
    {
        let top = inner.y + i as f32 * line_height;
        if top >= rect.bottom() {
            break;
        }
        if line.is_empty() {
            continue;
        }
        let x = aligned_x(inner, &line, style.align, style.font_size, style.bold);
        canvas.text(&TextRun {
            text: line,
            x,
            baseline_y: top + style.font_size * ASCENT,
            font_size: style.font_size,
            bold: style.bold,
            color: style.color,
        });
    }
    canvas.pop_clip();
}

pub(crate) fn aligned_x(area: Rect, line: &str, align: TextAlign, font_size: f32, bold: bool) -> f32 {
    match align {
        TextAlign::Left => area.x,
        TextAlign::Center => area.x + (area.width - text_width(line, font_size, bold)) / 2.0,
        TextAlign::Right => area.right() - text_width(line, font_size, bold),
    }
}
