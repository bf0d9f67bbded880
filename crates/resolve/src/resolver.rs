use crate::error::{ResolveError, TransformError};
use crate::transforms::{TransformArgs, TransformRegistry};
use crate::value::{ImageRef, ResolvedValue, ResolvedValues, TableValue, json_display};
use sablon_jpath::{PathExpr, Selected, select};
use sablon_template::{
    CellSource, ComputedSource, Field, FieldKind, FieldMapping, MappingSource, TableMapping,
    Template,
};
use serde_json::Value;
use std::collections::HashMap;

/// Turns a template's mappings and a business record into resolved values.
///
/// Every field of every page gets an entry, in declaration order of first
/// appearance. Unmapped and skipped fields resolve to absent. Required fields
/// that end up absent are all collected into a single
/// [`ResolveError::MissingFields`]; transform failures abort immediately.
pub fn resolve(
    template: &Template,
    mappings: &[FieldMapping],
    record: &Value,
    transforms: &TransformRegistry,
) -> Result<ResolvedValues, ResolveError> {
    // First mapping wins; duplicates are a validation issue upstream.
    let mut by_field: HashMap<&str, &FieldMapping> = HashMap::new();
    for mapping in mappings {
        by_field.entry(mapping.field_name.as_str()).or_insert(mapping);
    }

    let mut values = ResolvedValues::new();
    let mut missing = Vec::new();

    for (_, field) in template.fields() {
        if values.contains(&field.name) {
            continue;
        }
        let value = match by_field.get(field.name.as_str()) {
            Some(mapping) => resolve_field(field, &mapping.source, record, transforms)?,
            None => absent_for(field.kind),
        };
        if field.required && value.is_absent() {
            missing.push(field.name.clone());
        }
        values.insert(field.name.clone(), value);
    }

    if !missing.is_empty() {
        log::debug!("Required fields absent after resolution: {:?}", missing);
        return Err(ResolveError::MissingFields(missing));
    }
    Ok(values)
}

fn absent_for(kind: FieldKind) -> ResolvedValue {
    match kind {
        FieldKind::Image => ResolvedValue::Image(ImageRef::Missing),
        FieldKind::Table => ResolvedValue::Table(TableValue::default()),
        _ => ResolvedValue::Absent,
    }
}

fn resolve_field(
    field: &Field,
    source: &MappingSource,
    record: &Value,
    transforms: &TransformRegistry,
) -> Result<ResolvedValue, ResolveError> {
    let raw = match source {
        MappingSource::Skip => return Ok(absent_for(field.kind)),
        MappingSource::Table(table) => {
            return resolve_table(&field.name, table, record, transforms).map(ResolvedValue::Table);
        }
        MappingSource::Computed(computed) => {
            let value = run_transform(&field.name, computed, record, transforms)?;
            return Ok(coerce_for_kind(field.kind, value));
        }
        MappingSource::Path { path } => match select(path, record) {
            Selected::Absent => return Ok(absent_for(field.kind)),
            Selected::One(v) => ResolvedValue::from_json(v, field.kind == FieldKind::Table),
            Selected::Many(values) => ResolvedValue::Structured(Value::Array(
                values.into_iter().cloned().collect(),
            )),
        },
        MappingSource::Literal { value } => {
            ResolvedValue::from_json(value, field.kind == FieldKind::Table)
        }
    };
    Ok(coerce_for_kind(field.kind, raw))
}

/// Image fields read strings as image references; other shapes pass through
/// and are judged by the renderer.
fn coerce_for_kind(kind: FieldKind, value: ResolvedValue) -> ResolvedValue {
    match (kind, value) {
        (FieldKind::Image, ResolvedValue::Text(uri)) => ResolvedValue::Image(ImageRef::from_uri(&uri)),
        (FieldKind::Image, ResolvedValue::Absent) => ResolvedValue::Image(ImageRef::Missing),
        (_, other) => other,
    }
}

fn run_transform(
    field: &str,
    computed: &ComputedSource,
    context: &Value,
    transforms: &TransformRegistry,
) -> Result<ResolvedValue, ResolveError> {
    let func = transforms
        .get(&computed.transform)
        .ok_or_else(|| ResolveError::UnknownTransform {
            field: field.to_string(),
            transform: computed.transform.clone(),
        })?;
    let args = TransformArgs {
        name: &computed.transform,
        inputs: computed
            .inputs
            .iter()
            .map(|path| select(path, context).into_values())
            .collect(),
        options: &computed.options,
    };
    func(&args).map_err(|source: TransformError| ResolveError::Transform {
        field: field.to_string(),
        source,
    })
}

fn rows_of<'a>(path: &PathExpr, record: &'a Value, field: &str) -> Vec<&'a Value> {
    match select(path, record) {
        Selected::Absent => Vec::new(),
        Selected::One(Value::Array(items)) => items.iter().collect(),
        Selected::One(other) => {
            log::warn!(
                "Row source '{}' for table '{}' is not an array ({}); rendering no rows",
                path,
                field,
                json_kind(other)
            );
            Vec::new()
        }
        Selected::Many(values) => values,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn resolve_table(
    field: &str,
    table: &TableMapping,
    record: &Value,
    transforms: &TransformRegistry,
) -> Result<TableValue, ResolveError> {
    let rows = rows_of(&table.rows, record, field);
    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        let mut cells = Vec::with_capacity(table.columns.len());
        for column in &table.columns {
            let cell = match column {
                CellSource::Path { path } => select(path, row).first().map(json_display).unwrap_or_default(),
                CellSource::Literal { value } => json_display(value),
                CellSource::Computed(computed) => run_transform(field, computed, row, transforms)?
                    .display_text()
                    .unwrap_or_default(),
            };
            cells.push(cell);
        }
        out.push(cells);
    }
    Ok(TableValue::new(out))
}
