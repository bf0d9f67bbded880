use crate::config::LayoutConfig;
use crate::error::LayoutError;
use crate::plan::{FieldPlacement, LayoutPlan, RowCounts, RowMetrics};
use sablon_template::{Anchor, Field, FieldKind, Schema};

fn anchor_rank(anchor: Anchor) -> u8 {
    match anchor {
        Anchor::Flow => 0,
        Anchor::Fixed => 1,
    }
}

/// Processing order: declared y ascending; at equal y flow fields come
/// before fixed ones, then declaration order.
fn flow_order(fields: &[Field]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..fields.len()).collect();
    order.sort_by(|&a, &b| {
        let (fa, fb) = (&fields[a], &fields[b]);
        fa.position
            .y
            .total_cmp(&fb.position.y)
            .then_with(|| anchor_rank(fa.anchor).cmp(&anchor_rank(fb.anchor)))
            .then(a.cmp(&b))
    });
    order
}

fn checked_height(field: &Field, value: f32) -> Result<f32, LayoutError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(LayoutError::InvalidRowHeight {
            field: field.name.clone(),
            value,
        })
    }
}

/// Header and row heights from the field's table style, falling back to the config.
fn row_metrics(field: &Field, config: &LayoutConfig) -> Result<RowMetrics, LayoutError> {
    let table = field.style.table.as_ref();
    let header = match table {
        Some(t) if !t.show_header => 0.0,
        _ => table
            .and_then(|t| t.header_row_height)
            .unwrap_or(config.header_row_height),
    };
    let data = table
        .and_then(|t| t.data_row_height)
        .unwrap_or(config.data_row_height);
    Ok(RowMetrics {
        header_height: checked_height(field, header)?,
        row_height: checked_height(field, data)?,
    })
}

/// Computes final positions for every field of `schema`.
///
/// Fields are visited top to bottom by declared y while a running offset
/// accumulates the growth (or shrinkage) of each variable-height field; every
/// field is moved down by the offset accumulated before it. The function is
/// pure: the same schema and row counts always produce the same plan.
pub fn compute_layout_plan(
    schema: &Schema,
    row_counts: &RowCounts,
    usable_height: f32,
    config: &LayoutConfig,
) -> Result<LayoutPlan, LayoutError> {
    if !(usable_height.is_finite() && usable_height > 0.0) {
        return Err(LayoutError::InvalidUsableHeight(usable_height));
    }
    if let Some(bad) = schema.iter().find(|f| !f.has_valid_geometry()) {
        return Err(LayoutError::InvalidGeometry(bad.name.clone()));
    }

    let fields = &schema.fields;
    let mut slots: Vec<Option<FieldPlacement>> = vec![None; fields.len()];
    let mut cumulative_offset = 0.0_f32;

    for index in flow_order(fields) {
        let field = &fields[index];
        let declared_height = field.size.height;
        let final_y = field.position.y + cumulative_offset;

        let metrics = if field.variable_height || field.kind == FieldKind::Table {
            Some(row_metrics(field, config)?)
        } else {
            None
        };

        let final_height = match (field.variable_height, metrics) {
            (true, Some(m)) => {
                let rows = row_counts.get(&field.name).copied().unwrap_or(0);
                let actual = m.header_height + rows as f32 * m.row_height;
                let delta = actual - declared_height;
                log::trace!(
                    "Field '{}' holds {} rows: height {} -> {} (delta {})",
                    field.name,
                    rows,
                    declared_height,
                    actual,
                    delta
                );
                cumulative_offset += delta;
                actual
            }
            _ => declared_height,
        };

        slots[index] = Some(FieldPlacement {
            name: field.name.clone(),
            kind: field.kind,
            anchor: field.anchor,
            x: field.position.x,
            y: final_y,
            width: field.size.width,
            height: final_height,
            declared_y: field.position.y,
            declared_height,
            rows: metrics,
        });
    }

    let placements: Vec<FieldPlacement> = slots.into_iter().flatten().collect();
    let content_bottom = placements
        .iter()
        .map(FieldPlacement::bottom)
        .max_by(f32::total_cmp)
        .unwrap_or(0.0);
    let overflow = content_bottom > usable_height;

    Ok(LayoutPlan {
        placements,
        content_bottom,
        usable_height,
        overflow,
    })
}
