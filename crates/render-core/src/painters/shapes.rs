use super::PaintContext;
use crate::canvas::Canvas;
use crate::error::RenderError;
use sablon_resolve::ResolvedValue;
use sablon_types::Point;

const DEFAULT_STROKE: f32 = 1.0;

/// A line across the middle of the field box, or down it when the box is
/// taller than it is wide.
pub fn paint_line(canvas: &mut dyn Canvas, ctx: &PaintContext<'_>) -> Result<(), RenderError> {
    let style = &ctx.field.style;
    let (color, width) = style
        .stroke
        .as_ref()
        .map(|s| (s.color, s.width))
        .unwrap_or((style.color, DEFAULT_STROKE));
    let r = ctx.placement.rect();
    let (from, to) = if r.height > r.width {
        let x = r.x + r.width / 2.0;
        (Point::new(x, r.y), Point::new(x, r.bottom()))
    } else {
        let y = r.y + r.height / 2.0;
        (Point::new(r.x, y), Point::new(r.right(), y))
    };
    canvas.line(from, to, color, width);
    Ok(())
}

pub fn paint_rect(canvas: &mut dyn Canvas, ctx: &PaintContext<'_>) -> Result<(), RenderError> {
    let style = &ctx.field.style;
    let rect = ctx.placement.rect();
    if let Some(fill) = style.fill {
        canvas.fill_rect(rect, fill);
    }
    match &style.stroke {
        Some(stroke) => canvas.stroke_rect(rect, stroke.color, stroke.width),
        None if style.fill.is_none() => canvas.stroke_rect(rect, style.color, DEFAULT_STROKE),
        None => {}
    }
    Ok(())
}

/// A square box in the field's top-left corner, ticked when the value is truthy.
pub fn paint_checkbox(canvas: &mut dyn Canvas, ctx: &PaintContext<'_>) -> Result<(), RenderError> {
    let checked = match ctx.value {
        ResolvedValue::Bool(_) | ResolvedValue::Number(_) | ResolvedValue::Text(_) => {
            ctx.value.is_truthy()
        }
        v if v.is_absent() => false,
        other => {
            return Err(RenderError::type_mismatch(
                &ctx.field.name,
                "boolean, number or text",
                other.shape(),
            ));
        }
    };

    let style = &ctx.field.style;
    let (color, width) = style
        .border
        .as_ref()
        .map(|b| (b.color, b.width))
        .unwrap_or((style.color, DEFAULT_STROKE));
    let r = ctx.placement.rect();
    let side = r.width.min(r.height);
    let square = sablon_types::Rect::new(r.x, r.y, side, side);
    canvas.stroke_rect(square, color, width);

    if checked {
        let mark = width.max(side * 0.1);
        canvas.line(
            Point::new(r.x + side * 0.2, r.y + side * 0.55),
            Point::new(r.x + side * 0.42, r.y + side * 0.78),
            style.color,
            mark,
        );
        canvas.line(
            Point::new(r.x + side * 0.42, r.y + side * 0.78),
            Point::new(r.x + side * 0.82, r.y + side * 0.22),
            style.color,
            mark,
        );
    }
    Ok(())
}
