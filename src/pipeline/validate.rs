//! Pre-flight checks run before any value is resolved.
//!
//! Every problem is collected so the caller sees the whole list at once.

use itertools::Itertools;
use sablon_resolve::TransformRegistry;
use sablon_template::{FieldKind, FieldMapping, MappingSource, StructuralIssue, Template};
use sablon_types::TemplateId;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "issue", rename_all = "camelCase")]
pub enum ValidationIssue {
    TemplateNotFound { id: TemplateId },
    NoPages,
    DuplicateFieldName { page: usize, field: String },
    InvalidGeometry { page: usize, field: String },
    VariableHeightNonTable { page: usize, field: String },
    /// A required field has no mapping at all.
    UnmappedRequiredField { field: String },
    /// A required field is mapped to `skip`.
    SkippedRequiredField { field: String },
    UnknownMappingField { field: String },
    /// More than one mapping targets the same field.
    DuplicateMapping { field: String },
    /// The mapping was written for a different template.
    ForeignMapping { field: String, template_id: TemplateId },
    TableMappingForNonTable { field: String, kind: FieldKind },
    UnknownTransform { field: String, transform: String },
}

impl ValidationIssue {
    /// The field the issue is about, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            ValidationIssue::TemplateNotFound { .. } | ValidationIssue::NoPages => None,
            ValidationIssue::DuplicateFieldName { field, .. }
            | ValidationIssue::InvalidGeometry { field, .. }
            | ValidationIssue::VariableHeightNonTable { field, .. }
            | ValidationIssue::UnmappedRequiredField { field }
            | ValidationIssue::SkippedRequiredField { field }
            | ValidationIssue::UnknownMappingField { field }
            | ValidationIssue::DuplicateMapping { field }
            | ValidationIssue::ForeignMapping { field, .. }
            | ValidationIssue::TableMappingForNonTable { field, .. }
            | ValidationIssue::UnknownTransform { field, .. } => Some(field),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::TemplateNotFound { id } => write!(f, "template '{}' not found", id),
            ValidationIssue::NoPages => f.write_str("template has no pages"),
            ValidationIssue::DuplicateFieldName { page, field } => {
                write!(f, "page {}: field name '{}' is used more than once", page + 1, field)
            }
            ValidationIssue::InvalidGeometry { page, field } => {
                write!(f, "page {}: field '{}' has invalid position or size", page + 1, field)
            }
            ValidationIssue::VariableHeightNonTable { page, field } => write!(
                f,
                "page {}: field '{}' is variable-height but not a table",
                page + 1,
                field
            ),
            ValidationIssue::UnmappedRequiredField { field } => {
                write!(f, "required field '{}' has no mapping", field)
            }
            ValidationIssue::SkippedRequiredField { field } => {
                write!(f, "required field '{}' is mapped to skip", field)
            }
            ValidationIssue::UnknownMappingField { field } => {
                write!(f, "mapping targets unknown field '{}'", field)
            }
            ValidationIssue::DuplicateMapping { field } => {
                write!(f, "field '{}' is mapped more than once", field)
            }
            ValidationIssue::ForeignMapping { field, template_id } => {
                write!(f, "mapping for '{}' belongs to template '{}'", field, template_id)
            }
            ValidationIssue::TableMappingForNonTable { field, kind } => {
                write!(f, "table mapping on '{}' field '{}'", kind, field)
            }
            ValidationIssue::UnknownTransform { field, transform } => {
                write!(f, "field '{}' uses unknown transform '{}'", field, transform)
            }
        }
    }
}

/// Everything wrong with a template and its mappings.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub template_id: Option<TemplateId>,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn not_found(id: TemplateId) -> Self {
        Self {
            template_id: Some(id.clone()),
            issues: vec![ValidationIssue::TemplateNotFound { id }],
        }
    }

    pub fn is_ok(&self) -> bool {
        self.issues.is_empty()
    }

    /// Names of every field mentioned by an issue, without repeats.
    pub fn field_names(&self) -> Vec<&str> {
        self.issues.iter().filter_map(ValidationIssue::field).unique().collect()
    }

    /// True when the only problems are unknown transform names.
    pub fn only_unknown_transforms(&self) -> bool {
        !self.issues.is_empty()
            && self
                .issues
                .iter()
                .all(|i| matches!(i, ValidationIssue::UnknownTransform { .. }))
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(id) = &self.template_id {
            write!(f, "template '{}': ", id)?;
        }
        write!(f, "{}", self.issues.iter().join("; "))
    }
}

/// Checks a template and its mappings against each other.
pub fn validate(
    template: &Template,
    mappings: &[FieldMapping],
    transforms: &TransformRegistry,
) -> ValidationReport {
    let mut issues: Vec<ValidationIssue> = template
        .structural_issues()
        .into_iter()
        .map(|issue| match issue {
            StructuralIssue::NoPages => ValidationIssue::NoPages,
            StructuralIssue::DuplicateFieldName { page, name } => {
                ValidationIssue::DuplicateFieldName { page, field: name }
            }
            StructuralIssue::VariableHeightNonTable { page, name } => {
                ValidationIssue::VariableHeightNonTable { page, field: name }
            }
            StructuralIssue::InvalidGeometry { page, name } => {
                ValidationIssue::InvalidGeometry { page, field: name }
            }
        })
        .collect();

    let mut by_field: HashMap<&str, &FieldMapping> = HashMap::new();
    for mapping in mappings {
        by_field.entry(mapping.field_name.as_str()).or_insert(mapping);
    }

    for name in template.required_fields() {
        match by_field.get(name).map(|m| &m.source) {
            None => issues.push(ValidationIssue::UnmappedRequiredField {
                field: name.to_string(),
            }),
            Some(MappingSource::Skip) => issues.push(ValidationIssue::SkippedRequiredField {
                field: name.to_string(),
            }),
            Some(_) => {}
        }
    }

    issues.extend(
        mappings
            .iter()
            .map(|m| m.field_name.as_str())
            .duplicates()
            .map(|field| ValidationIssue::DuplicateMapping {
                field: field.to_string(),
            }),
    );

    for mapping in mappings {
        let field = mapping.field_name.as_str();
        if mapping.template_id != template.id {
            issues.push(ValidationIssue::ForeignMapping {
                field: field.to_string(),
                template_id: mapping.template_id.clone(),
            });
        }
        match template.field(field) {
            None => issues.push(ValidationIssue::UnknownMappingField {
                field: field.to_string(),
            }),
            Some(f) if matches!(mapping.source, MappingSource::Table(_)) && f.kind != FieldKind::Table => {
                issues.push(ValidationIssue::TableMappingForNonTable {
                    field: field.to_string(),
                    kind: f.kind,
                });
            }
            Some(_) => {}
        }
        for transform in mapping.source.transforms() {
            if !transforms.contains(transform) {
                issues.push(ValidationIssue::UnknownTransform {
                    field: field.to_string(),
                    transform: transform.to_string(),
                });
            }
        }
    }

    ValidationReport {
        template_id: Some(template.id.clone()),
        issues,
    }
}
