use super::PaintContext;
use super::text::aligned_x;
use crate::canvas::{Canvas, TextRun};
use crate::error::RenderError;
use sablon_layout::{LayoutConfig, RowMetrics};
use sablon_resolve::{ResolvedValue, TableValue};
use sablon_template::{Border, TableStyle, TextAlign};
use sablon_types::{Color, Point, Rect};

const CELL_PADDING: f32 = 2.0;

fn default_grid() -> Border {
    Border {
        color: Color::gray(0x99),
        width: 0.5,
    }
}

/// Draws a header row and one row per resolved data row.
///
/// Rows use the heights the layout engine sized the field with. Rows past a
/// fixed-height box are clipped away.
pub fn paint_table(canvas: &mut dyn Canvas, ctx: &PaintContext<'_>) -> Result<(), RenderError> {
    let empty = TableValue::default();
    let table = match ctx.value {
        ResolvedValue::Absent => &empty,
        ResolvedValue::Table(table) => table,
        other => {
            return Err(RenderError::type_mismatch(
                &ctx.field.name,
                "table rows",
                other.shape(),
            ));
        }
    };

    let default_style = TableStyle::default();
    let style = ctx.field.style.table.as_ref().unwrap_or(&default_style);
    let metrics = ctx.placement.rows.unwrap_or_else(|| {
        let config = LayoutConfig::default();
        RowMetrics {
            header_height: if style.show_header { config.header_row_height } else { 0.0 },
            row_height: config.data_row_height,
        }
    });

    // Without declared columns the first row sets the width of the table.
    let (column_count, expected) = if style.columns.is_empty() {
        (
            table.rows.first().map(Vec::len).unwrap_or(0),
            "as many cells as the first row",
        )
    } else {
        (style.columns.len(), "one cell per declared column")
    };
    if let Some((index, row)) = table
        .rows
        .iter()
        .enumerate()
        .find(|(_, row)| row.len() != column_count)
    {
        return Err(RenderError::type_mismatch(
            &ctx.field.name,
            expected,
            format!("row {} with {} cells for {} columns", index, row.len(), column_count),
        ));
    }

    let area = ctx.placement.rect();
    let widths = if style.columns.is_empty() {
        vec![area.width / column_count.max(1) as f32; column_count]
    } else {
        style.column_widths(area.width)
    };
    let aligns: Vec<TextAlign> = (0..column_count)
        .map(|i| style.columns.get(i).map(|c| c.align).unwrap_or_default())
        .collect();
    let font_size = ctx.field.style.font_size;
    let color = ctx.field.style.color;

    canvas.push_clip(area);

    let mut y = area.y;
    if metrics.header_height > 0.0 {
        let header = Rect::new(area.x, y, area.width, metrics.header_height);
        if let Some(background) = style.header_background {
            canvas.fill_rect(header, background);
        }
        let titles: Vec<&str> = style.columns.iter().map(|c| c.title.as_str()).collect();
        draw_row(canvas, header, &widths, &aligns, &titles, font_size, true, color);
        y += metrics.header_height;
    }

    for row in &table.rows {
        if y >= area.bottom() {
            break;
        }
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        let rect = Rect::new(area.x, y, area.width, metrics.row_height);
        draw_row(canvas, rect, &widths, &aligns, &cells, font_size, false, color);
        y += metrics.row_height;
    }

    let grid = style.grid.clone().unwrap_or_else(default_grid);
    let grid_bottom = y.min(area.bottom());
    if grid_bottom > area.y && grid.width > 0.0 {
        draw_grid(canvas, &grid, area, grid_bottom, &widths, metrics, table.rows.len());
    }

    canvas.pop_clip();
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn draw_row(
    canvas: &mut dyn Canvas,
    row: Rect,
    widths: &[f32],
    aligns: &[TextAlign],
    cells: &[&str],
    font_size: f32,
    bold: bool,
    color: Color,
) {
    let mut x = row.x;
    for ((width, align), cell) in widths.iter().zip(aligns).zip(cells) {
        let cell_rect = Rect::new(x, row.y, *width, row.height);
        x += width;
        if cell.is_empty() {
            continue;
        }
        let inner = Rect::new(
            cell_rect.x + CELL_PADDING,
            cell_rect.y,
            (cell_rect.width - 2.0 * CELL_PADDING).max(0.0),
            cell_rect.height,
        );
        canvas.push_clip(cell_rect);
        canvas.text(&TextRun {
            text: (*cell).to_string(),
            x: aligned_x(inner, cell, *align, font_size, bold),
            // Vertically centred on the cap height.
            baseline_y: cell_rect.y + (cell_rect.height + font_size * 0.7) / 2.0,
            font_size,
            bold,
            color,
        });
        canvas.pop_clip();
    }
}

fn draw_grid(
    canvas: &mut dyn Canvas,
    grid: &Border,
    area: Rect,
    bottom: f32,
    widths: &[f32],
    metrics: RowMetrics,
    row_count: usize,
) {
    let outline = Rect::new(area.x, area.y, area.width, bottom - area.y);
    canvas.stroke_rect(outline, grid.color, grid.width);

    let mut y = area.y + metrics.header_height;
    let boundaries = if metrics.header_height > 0.0 { row_count + 1 } else { row_count };
    for _ in 1..boundaries {
        if y >= bottom {
            break;
        }
        canvas.line(Point::new(area.x, y), Point::new(area.right(), y), grid.color, grid.width);
        y += metrics.row_height;
    }

    let mut x = area.x;
    for width in widths.iter().take(widths.len().saturating_sub(1)) {
        x += width;
        canvas.line(Point::new(x, area.y), Point::new(x, bottom), grid.color, grid.width);
    }
}
