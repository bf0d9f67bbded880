//! How each schema field gets its value from a business record.

use crate::error::TemplateError;
use sablon_jpath::{JPathError, PathExpr};
use sablon_types::TemplateId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A named transform applied to one or more record paths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputedSource {
    pub transform: String,
    #[serde(default)]
    pub inputs: Vec<PathExpr>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub options: Map<String, Value>,
}

impl ComputedSource {
    pub fn new(transform: impl Into<String>, inputs: &[&str]) -> Result<Self, JPathError> {
        Ok(Self {
            transform: transform.into(),
            inputs: inputs.iter().map(|p| p.parse()).collect::<Result<_, _>>()?,
            options: Map::new(),
        })
    }

    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }
}

/// Rule for one table column. Paths are relative to the row element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CellSource {
    Path { path: PathExpr },
    Literal { value: Value },
    Computed(ComputedSource),
}

impl CellSource {
    pub fn path(path: &str) -> Result<Self, JPathError> {
        Ok(CellSource::Path { path: path.parse()? })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableMapping {
    /// Path to the array whose elements become rows.
    pub rows: PathExpr,
    pub columns: Vec<CellSource>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum MappingSource {
    Path { path: PathExpr },
    Literal { value: Value },
    Computed(ComputedSource),
    /// The field is left blank.
    Skip,
    Table(TableMapping),
}

impl MappingSource {
    pub fn path(path: &str) -> Result<Self, JPathError> {
        Ok(MappingSource::Path { path: path.parse()? })
    }

    pub fn literal(value: impl Into<Value>) -> Self {
        MappingSource::Literal {
            value: value.into(),
        }
    }

    pub fn is_skip(&self) -> bool {
        matches!(self, MappingSource::Skip)
    }

    /// Names of every transform this source uses, table cells included.
    pub fn transforms(&self) -> Vec<&str> {
        match self {
            MappingSource::Computed(c) => vec![c.transform.as_str()],
            MappingSource::Table(table) => table
                .columns
                .iter()
                .filter_map(|cell| match cell {
                    CellSource::Computed(c) => Some(c.transform.as_str()),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldMapping {
    pub template_id: TemplateId,
    pub field_name: String,
    pub source: MappingSource,
}

impl FieldMapping {
    pub fn new(
        template_id: impl Into<TemplateId>,
        field_name: impl Into<String>,
        source: MappingSource,
    ) -> Self {
        Self {
            template_id: template_id.into(),
            field_name: field_name.into(),
            source,
        }
    }

    pub fn list_from_json(json: &str) -> Result<Vec<FieldMapping>, TemplateError> {
        Ok(serde_json::from_str(json)?)
    }
}
