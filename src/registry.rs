//! Where templates and their mappings come from.
//!
//! The pipeline only reads templates. [`TemplateStore`] is the seam to
//! whatever holds them (a database, an HTTP service); [`TemplateRegistry`] is
//! an in-memory store owned by the caller and handed to the pipeline
//! explicitly, so concurrent renders never share registrations by accident.

use sablon_template::{DocumentType, FieldMapping, Template};
use sablon_types::TemplateId;
use std::collections::BTreeMap;
use std::future::Future;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("Template store unavailable: {0}")]
    Unavailable(String),

    #[error("Template '{0}' is not registered")]
    NotRegistered(TemplateId),

    #[error("Stored data for template '{id}' is corrupt: {message}")]
    Corrupt { id: TemplateId, message: String },
}

/// Read access to stored templates and mappings.
///
/// Fetching may suspend; everything after it is synchronous.
pub trait TemplateStore: Send + Sync {
    /// `Ok(None)` when no template has this id.
    fn fetch_template(
        &self,
        id: &TemplateId,
    ) -> impl Future<Output = Result<Option<Template>, StoreError>> + Send;

    fn fetch_mappings(
        &self,
        id: &TemplateId,
    ) -> impl Future<Output = Result<Vec<FieldMapping>, StoreError>> + Send;
}

/// An in-memory catalog of templates and their mappings.
///
/// At most one template per [`DocumentType`] is the default; registering or
/// promoting a new default demotes the previous one.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: BTreeMap<TemplateId, Template>,
    mappings: BTreeMap<TemplateId, Vec<FieldMapping>>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a template together with its mappings.
    ///
    /// Mappings are stored under the template's id whatever their own
    /// `template_id` says.
    pub fn register(&mut self, template: Template, mappings: Vec<FieldMapping>) {
        let id = template.id.clone();
        if template.is_default {
            self.demote_defaults(template.document_type, &id);
        }
        let mappings = mappings
            .into_iter()
            .map(|mut m| {
                m.template_id = id.clone();
                m
            })
            .collect();
        log::debug!("Registered template '{}' ({})", id, template.document_type);
        self.templates.insert(id.clone(), template);
        self.mappings.insert(id, mappings);
    }

    /// Builder-style variant of [`register`](Self::register).
    pub fn with(mut self, template: Template, mappings: Vec<FieldMapping>) -> Self {
        self.register(template, mappings);
        self
    }

    pub fn remove(&mut self, id: &TemplateId) -> Option<Template> {
        self.mappings.remove(id);
        self.templates.remove(id)
    }

    pub fn get(&self, id: &TemplateId) -> Option<&Template> {
        self.templates.get(id)
    }

    pub fn mappings(&self, id: &TemplateId) -> &[FieldMapping] {
        self.mappings.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Makes `id` the default for its document type.
    pub fn set_default(&mut self, id: &TemplateId) -> Result<(), StoreError> {
        let document_type = self
            .templates
            .get(id)
            .map(|t| t.document_type)
            .ok_or_else(|| StoreError::NotRegistered(id.clone()))?;
        self.demote_defaults(document_type, id);
        if let Some(template) = self.templates.get_mut(id) {
            template.is_default = true;
        }
        Ok(())
    }

    pub fn default_for(&self, document_type: DocumentType) -> Option<&Template> {
        self.templates
            .values()
            .find(|t| t.document_type == document_type && t.is_default)
    }

    pub fn templates_for(&self, document_type: DocumentType) -> impl Iterator<Item = &Template> {
        self.templates
            .values()
            .filter(move |t| t.document_type == document_type)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    fn demote_defaults(&mut self, document_type: DocumentType, keep: &TemplateId) {
        for (id, template) in self.templates.iter_mut() {
            if template.document_type == document_type && template.is_default && id != keep {
                log::info!("Template '{}' is no longer the default {}", id, document_type);
                template.is_default = false;
            }
        }
    }
}

impl TemplateStore for TemplateRegistry {
    fn fetch_template(
        &self,
        id: &TemplateId,
    ) -> impl Future<Output = Result<Option<Template>, StoreError>> + Send {
        let template = self.templates.get(id).cloned();
        async move { Ok(template) }
    }

    fn fetch_mappings(
        &self,
        id: &TemplateId,
    ) -> impl Future<Output = Result<Vec<FieldMapping>, StoreError>> + Send {
        let mappings = self.mappings(id).to_vec();
        async move { Ok(mappings) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sablon_template::MappingSource;

    fn template(id: &str, document_type: DocumentType, is_default: bool) -> Template {
        let mut t = Template::new(id, id, document_type);
        t.is_default = is_default;
        t
    }

    #[test]
    fn one_default_per_document_type() {
        let mut registry = TemplateRegistry::new()
            .with(template("teklif-a", DocumentType::Quote, true), vec![])
            .with(template("fatura", DocumentType::Invoice, true), vec![]);
        registry.register(template("teklif-b", DocumentType::Quote, true), vec![]);

        assert_eq!(
            registry.default_for(DocumentType::Quote).map(|t| t.id.as_str()),
            Some("teklif-b")
        );
        assert_eq!(
            registry.default_for(DocumentType::Invoice).map(|t| t.id.as_str()),
            Some("fatura")
        );
        assert_eq!(registry.templates_for(DocumentType::Quote).count(), 2);

        registry.set_default(&"teklif-a".into()).unwrap();
        let defaults: Vec<&str> = registry
            .templates_for(DocumentType::Quote)
            .filter(|t| t.is_default)
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(defaults, vec!["teklif-a"]);
    }

    #[test]
    fn set_default_requires_a_registered_template() {
        let mut registry = TemplateRegistry::new();
        assert_eq!(
            registry.set_default(&"yok".into()),
            Err(StoreError::NotRegistered("yok".into()))
        );
        assert!(registry.default_for(DocumentType::Proposal).is_none());
    }

    #[test]
    fn mappings_follow_their_template() {
        let mapping = FieldMapping::new("baska", "customerName", MappingSource::Skip);
        let mut registry =
            TemplateRegistry::new().with(template("servis", DocumentType::ServiceSlip, false), vec![mapping]);

        let id: TemplateId = "servis".into();
        assert_eq!(registry.mappings(&id).len(), 1);
        assert_eq!(registry.mappings(&id)[0].template_id, id);

        assert!(registry.remove(&id).is_some());
        assert!(registry.mappings(&id).is_empty());
        assert!(registry.is_empty());
    }
}
