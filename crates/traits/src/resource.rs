//! ResourceProvider trait for loading images and backdrop documents.
//!
//! Image fields and backdrop surfaces may reference external files by URI.
//! The renderer never touches the filesystem or network itself; it asks the
//! provider configured on the pipeline.

use sablon_types::ResourceUri;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::{Arc, RwLock};
use thiserror::Error;

/// Error type for resource loading operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResourceError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Failed to load resource '{uri}': {message}")]
    LoadFailed { uri: String, message: String },

    #[error("Resource '{uri}' is not a {expected} file")]
    UnexpectedFormat { uri: String, expected: &'static str },
}

/// Shared resource data type (reference-counted bytes).
pub type SharedResourceData = Arc<Vec<u8>>;

/// File formats the renderer knows how to place on a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Png,
    Jpeg,
    Pdf,
}

impl MediaType {
    /// Detects the format from leading magic bytes.
    pub fn sniff(bytes: &[u8]) -> Option<MediaType> {
        if bytes.starts_with(&[0x89, b'P', b'N', b'G']) {
            Some(MediaType::Png)
        } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(MediaType::Jpeg)
        } else if bytes.starts_with(b"%PDF-") {
            Some(MediaType::Pdf)
        } else {
            None
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            MediaType::Png => "image/png",
            MediaType::Jpeg => "image/jpeg",
            MediaType::Pdf => "application/pdf",
        }
    }
}

/// A source of image and backdrop bytes.
///
/// # Implementations
///
/// - `FilesystemResourceProvider` (in `sablon-resource`): files under a base directory
/// - [`InMemoryResourceProvider`]: pre-populated bytes, useful for tests and servers
pub trait ResourceProvider: Send + Sync + Debug {
    fn load(&self, uri: &ResourceUri) -> Result<SharedResourceData, ResourceError>;

    fn exists(&self, uri: &ResourceUri) -> bool;

    /// Returns a human-readable name for this provider (for logging/debugging).
    fn name(&self) -> &'static str;

    /// Loads the resource and checks it is of the `expected` format.
    fn load_as(
        &self,
        uri: &ResourceUri,
        expected: MediaType,
    ) -> Result<SharedResourceData, ResourceError> {
        let data = self.load(uri)?;
        if MediaType::sniff(&data) == Some(expected) {
            Ok(data)
        } else {
            Err(ResourceError::UnexpectedFormat {
                uri: uri.to_string(),
                expected: expected.mime(),
            })
        }
    }
}

/// An in-memory resource provider keyed by URI.
#[derive(Debug, Default)]
pub struct InMemoryResourceProvider {
    resources: RwLock<HashMap<ResourceUri, SharedResourceData>>,
}

impl InMemoryResourceProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a resource.
    ///
    /// # Errors
    ///
    /// Returns `ResourceError::LoadFailed` if the internal lock is poisoned.
    pub fn add(&self, uri: impl Into<ResourceUri>, data: Vec<u8>) -> Result<(), ResourceError> {
        let uri = uri.into();
        let mut resources = self
            .resources
            .write()
            .map_err(|_| ResourceError::LoadFailed {
                uri: uri.to_string(),
                message: "resource store lock poisoned".to_string(),
            })?;
        resources.insert(uri, Arc::new(data));
        Ok(())
    }

    /// Builder-style variant of [`add`](Self::add) for setting up fixtures.
    pub fn with(self, uri: impl Into<ResourceUri>, data: Vec<u8>) -> Result<Self, ResourceError> {
        self.add(uri, data)?;
        Ok(self)
    }

    /// Returns 0 if the lock is poisoned.
    pub fn len(&self) -> usize {
        self.resources.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ResourceProvider for InMemoryResourceProvider {
    fn load(&self, uri: &ResourceUri) -> Result<SharedResourceData, ResourceError> {
        let resources = self
            .resources
            .read()
            .map_err(|_| ResourceError::LoadFailed {
                uri: uri.to_string(),
                message: "resource store lock poisoned".to_string(),
            })?;
        resources
            .get(uri)
            .cloned()
            .ok_or_else(|| ResourceError::NotFound(uri.to_string()))
    }

    fn exists(&self, uri: &ResourceUri) -> bool {
        self.resources
            .read()
            .map(|r| r.contains_key(uri))
            .unwrap_or(false)
    }

    fn name(&self) -> &'static str {
        "InMemoryResourceProvider"
    }
}
