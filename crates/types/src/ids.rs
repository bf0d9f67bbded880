//! Newtype wrappers for template identifiers and resource URIs
//!
//! These keep template ids, field names and image locations from being mixed
//! up as bare strings across the store, registry and renderer boundaries.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

/// Identifier of a stored template.
#[derive(Debug, Clone, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct TemplateId(Arc<str>);

impl TemplateId {
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for TemplateId {
    fn from(s: String) -> Self {
        Self(s.into())
    }
}

impl From<&str> for TemplateId {
    fn from(s: &str) -> Self {
        Self(s.into())
    }
}

impl From<TemplateId> for String {
    fn from(id: TemplateId) -> Self {
        id.0.to_string()
    }
}

impl AsRef<str> for TemplateId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A URI for an image or backdrop document.
///
/// `data:` URIs carry their payload inline; anything else is handed to a
/// resource provider.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct ResourceUri(Arc<str>);

impl ResourceUri {
    pub fn new(uri: impl Into<Arc<str>>) -> Self {
        Self(uri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_data_uri(&self) -> bool {
        self.0.starts_with("data:")
    }
}

impl From<String> for ResourceUri {
    fn from(s: String) -> Self {
        Self(s.into())
    }
}

impl From<&str> for ResourceUri {
    fn from(s: &str) -> Self {
        Self(s.into())
    }
}

impl From<ResourceUri> for String {
    fn from(uri: ResourceUri) -> Self {
        uri.0.to_string()
    }
}

impl AsRef<str> for ResourceUri {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_id_creation() {
        let id1 = TemplateId::new("teklif-standart");
        let id2 = TemplateId::from("teklif-standart");
        let id3 = TemplateId::from(String::from("teklif-standart"));

        assert_eq!(id1, id2);
        assert_eq!(id2, id3);
        assert_eq!(id1.as_str(), "teklif-standart");
    }

    #[test]
    fn test_ids_serialize_as_plain_strings() {
        let id = TemplateId::new("fatura-1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"fatura-1\"");

        let uri: ResourceUri = serde_json::from_str("\"data:image/png;base64,AAAA\"").unwrap();
        assert!(uri.is_data_uri());
        assert!(!ResourceUri::new("logo.png").is_data_uri());
    }

    #[test]
    fn test_hash_map_usage() {
        use std::collections::HashMap;

        let mut templates = HashMap::new();
        templates.insert(TemplateId::new("a"), 1);
        templates.insert(TemplateId::new("b"), 2);

        assert_eq!(templates.get(&TemplateId::new("a")), Some(&1));
    }
}
