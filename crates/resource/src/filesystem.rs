//! Loads template resources from a directory.
//!
//! URIs are plain relative paths (`logos/firma.png`) or `file:` URIs with a
//! relative path. Anything that would leave the base directory is refused.

use sablon_traits::{ResourceError, ResourceProvider, SharedResourceData};
use sablon_types::ResourceUri;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

#[derive(Debug)]
pub struct FilesystemResourceProvider {
    base_path: PathBuf,
    canonical_base: Option<PathBuf>,
}

impl FilesystemResourceProvider {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        let base = base_path.as_ref().to_path_buf();
        let canonical = base.canonicalize().ok();
        Self {
            base_path: base,
            canonical_base: canonical,
        }
    }

    pub fn base(&self) -> &Path {
        &self.base_path
    }

    /// Maps a URI to a path inside the base directory, or `None` when it
    /// points elsewhere.
    fn resolve(&self, uri: &ResourceUri) -> Option<PathBuf> {
        let raw = uri.as_str();
        let relative = raw.strip_prefix("file://").or_else(|| raw.strip_prefix("file:")).unwrap_or(raw);
        if relative.contains("://") {
            return None;
        }
        let relative = Path::new(relative);
        if relative.is_absolute()
            || relative
                .components()
                .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)))
        {
            return None;
        }

        let full_path = self.base_path.join(relative);
        match (full_path.canonicalize(), &self.canonical_base) {
            (Ok(canonical), Some(base)) if canonical.starts_with(base) => Some(canonical),
            (Ok(_), Some(_)) => None,
            _ => Some(full_path),
        }
    }
}

impl ResourceProvider for FilesystemResourceProvider {
    fn load(&self, uri: &ResourceUri) -> Result<SharedResourceData, ResourceError> {
        let Some(path) = self.resolve(uri) else {
            log::warn!("Refusing resource outside {}: {}", self.base_path.display(), uri);
            return Err(ResourceError::NotFound(format!("{} (outside base directory)", uri)));
        };

        std::fs::read(&path).map(Arc::new).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ResourceError::NotFound(uri.to_string())
            } else {
                ResourceError::LoadFailed {
                    uri: uri.to_string(),
                    message: e.to_string(),
                }
            }
        })
    }

    fn exists(&self, uri: &ResourceUri) -> bool {
        self.resolve(uri).is_some_and(|p| p.is_file())
    }

    fn name(&self) -> &'static str {
        "FilesystemResourceProvider"
    }
}
