use crate::error::TemplateError;
use crate::schema::{Field, FieldKind, Schema};
use sablon_types::{Padding, PageSize, ResourceUri, Size, TemplateId};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DocumentType {
    Quote,
    Invoice,
    Proposal,
    ServiceSlip,
    Other,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Quote => "quote",
            DocumentType::Invoice => "invoice",
            DocumentType::Proposal => "proposal",
            DocumentType::ServiceSlip => "serviceSlip",
            DocumentType::Other => "other",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The page the fields are drawn over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BaseSurface {
    Blank {
        #[serde(default)]
        size: PageSize,
        #[serde(default)]
        padding: Padding,
    },
    /// An existing PDF whose pages are used as backgrounds. Template page `n`
    /// sits on backdrop page `n`, or on the last one when the backdrop is shorter.
    Backdrop {
        source: ResourceUri,
        #[serde(default)]
        size: PageSize,
        #[serde(default)]
        padding: Padding,
    },
}

impl Default for BaseSurface {
    fn default() -> Self {
        BaseSurface::Blank {
            size: PageSize::A4,
            padding: Padding::default(),
        }
    }
}

impl BaseSurface {
    pub fn page_size(&self) -> PageSize {
        match self {
            BaseSurface::Blank { size, .. } | BaseSurface::Backdrop { size, .. } => *size,
        }
    }

    pub fn padding(&self) -> Padding {
        match self {
            BaseSurface::Blank { padding, .. } | BaseSurface::Backdrop { padding, .. } => *padding,
        }
    }

    pub fn dimensions(&self) -> Size {
        self.page_size().size()
    }

    /// Height available to fields before a page counts as overflowing.
    pub fn usable_height(&self) -> f32 {
        self.dimensions().height - self.padding().bottom
    }

    pub fn backdrop(&self) -> Option<&ResourceUri> {
        match self {
            BaseSurface::Backdrop { source, .. } => Some(source),
            BaseSurface::Blank { .. } => None,
        }
    }
}

/// Structural problems a template can have on its own, before any mappings
/// are considered.
#[derive(Debug, Clone, PartialEq)]
pub enum StructuralIssue {
    NoPages,
    DuplicateFieldName { page: usize, name: String },
    VariableHeightNonTable { page: usize, name: String },
    InvalidGeometry { page: usize, name: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: TemplateId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub document_type: DocumentType,
    #[serde(default)]
    pub base_surface: BaseSurface,
    pub pages: Vec<Schema>,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub version: u32,
}

impl Template {
    pub fn new(id: impl Into<TemplateId>, name: impl Into<String>, document_type: DocumentType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            document_type,
            base_surface: BaseSurface::default(),
            pages: Vec::new(),
            is_default: false,
            version: 1,
        }
    }

    pub fn with_page(mut self, schema: Schema) -> Self {
        self.pages.push(schema);
        self
    }

    pub fn with_base_surface(mut self, surface: BaseSurface) -> Self {
        self.base_surface = surface;
        self
    }

    pub fn from_json(json: &str) -> Result<Self, TemplateError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, TemplateError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Every field of every page, tagged with its page index.
    pub fn fields(&self) -> impl Iterator<Item = (usize, &Field)> {
        self.pages
            .iter()
            .enumerate()
            .flat_map(|(page, schema)| schema.iter().map(move |f| (page, f)))
    }

    /// The first field with this name on any page.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields().map(|(_, f)| f).find(|f| f.name == name)
    }

    /// Names of required fields in declaration order, without repeats.
    pub fn required_fields(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for (_, field) in self.fields().filter(|(_, f)| f.required) {
            if !names.contains(&field.name.as_str()) {
                names.push(&field.name);
            }
        }
        names
    }

    pub fn structural_issues(&self) -> Vec<StructuralIssue> {
        if self.pages.is_empty() {
            return vec![StructuralIssue::NoPages];
        }
        let mut issues = Vec::new();
        for (page, schema) in self.pages.iter().enumerate() {
            for name in schema.duplicate_names() {
                issues.push(StructuralIssue::DuplicateFieldName {
                    page,
                    name: name.to_string(),
                });
            }
            for field in schema.iter() {
                if field.variable_height && field.kind != FieldKind::Table {
                    issues.push(StructuralIssue::VariableHeightNonTable {
                        page,
                        name: field.name.clone(),
                    });
                }
                if !field.has_valid_geometry() {
                    issues.push(StructuralIssue::InvalidGeometry {
                        page,
                        name: field.name.clone(),
                    });
                }
            }
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sablon_types::Point;

    const QUOTE_JSON: &str = r##"{
        "id": "teklif-standart",
        "name": "Standart Teklif",
        "documentType": "quote",
        "baseSurface": { "type": "blank", "size": "A4", "padding": [40, 30, 40, 30] },
        "pages": [
            { "fields": [
                { "name": "customerName", "kind": "text", "required": true,
                  "position": { "x": 30, "y": 40 }, "size": { "width": 300, "height": 14 },
                  "style": { "fontSize": 12, "bold": true } },
                { "name": "items", "kind": "table", "variableHeight": true,
                  "position": { "x": 30, "y": 120 }, "size": { "width": 535, "height": 200 },
                  "style": { "table": { "headerRowHeight": 15, "dataRowHeight": 15,
                    "columns": [ { "title": "Ürün", "width": 0.6 }, { "title": "Tutar" } ] } } },
                { "name": "totalAmount", "kind": "text", "anchor": "flow",
                  "position": { "x": 400, "y": 340 }, "size": { "width": 165, "height": 14 },
                  "style": { "align": "right", "color": "#1a1a1a" } }
            ] }
        ],
        "isDefault": true,
        "version": 3
    }"##;

    #[test]
    fn template_json_round_trips_losslessly() {
        let template = Template::from_json(QUOTE_JSON).unwrap();
        assert_eq!(template.id.as_str(), "teklif-standart");
        assert_eq!(template.document_type, DocumentType::Quote);
        assert_eq!(template.page_count(), 1);
        assert_eq!(template.base_surface.usable_height(), 841.89 - 40.0);

        let json = template.to_json_pretty().unwrap();
        let again = Template::from_json(&json).unwrap();
        assert_eq!(again, template);
    }

    #[test]
    fn required_fields_follow_declaration_order() {
        let size = Size::new(10.0, 10.0);
        let template = Template::new("t", "T", DocumentType::Invoice)
            .with_page(Schema::new(vec![
                Field::new("b", FieldKind::Text, Point::new(0.0, 50.0), size).required(),
                Field::new("a", FieldKind::Text, Point::new(0.0, 10.0), size).required(),
            ]))
            .with_page(Schema::new(vec![
                Field::new("b", FieldKind::Text, Point::new(0.0, 0.0), size).required(),
            ]));
        assert_eq!(template.required_fields(), vec!["b", "a"]);
    }

    #[test]
    fn structural_issues_are_collected() {
        let size = Size::new(10.0, 10.0);
        let empty = Template::new("t", "T", DocumentType::Other);
        assert_eq!(empty.structural_issues(), vec![StructuralIssue::NoPages]);

        let template = Template::new("t", "T", DocumentType::Other).with_page(Schema::new(vec![
            Field::new("x", FieldKind::Text, Point::new(0.0, 0.0), size).variable_height(),
            Field::new("x", FieldKind::Text, Point::new(0.0, 20.0), size),
        ]));
        assert_eq!(
            template.structural_issues(),
            vec![
                StructuralIssue::DuplicateFieldName { page: 0, name: "x".into() },
                StructuralIssue::VariableHeightNonTable { page: 0, name: "x".into() },
            ]
        );
    }
}
