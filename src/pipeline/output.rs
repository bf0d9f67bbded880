use crate::error::PipelineError;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use sablon_template::Template;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// A page whose content ran past its usable height after layout.
///
/// The page is still rendered; whatever lies below the usable height is
/// simply cut off by the page edge or sits in the bottom padding.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverflowWarning {
    pub page_index: usize,
    pub content_bottom: f32,
    pub usable_height: f32,
}

/// A finished document.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOutput {
    pub bytes: Vec<u8>,
    pub media_type: &'static str,
    pub page_count: usize,
    /// Zero-based indexes of overflowing pages, ascending.
    pub overflow_pages: Vec<usize>,
    pub warnings: Vec<OverflowWarning>,
}

impl RenderOutput {
    pub fn has_overflow(&self) -> bool {
        !self.overflow_pages.is_empty()
    }

    /// The document as a `data:` URI, for previews.
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.media_type, STANDARD.encode(&self.bytes))
    }

    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<(), PipelineError> {
        writer.write_all(&self.bytes)?;
        writer.flush()?;
        Ok(())
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), PipelineError> {
        let path = path.as_ref();
        std::fs::write(path, &self.bytes).map_err(|e| {
            PipelineError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to write '{}': {}", path.display(), e),
            ))
        })?;
        log::info!("Saved {} bytes to {}", self.bytes.len(), path.display());
        Ok(())
    }

    /// A download name such as `standart-teklif-quote.pdf`.
    pub fn suggested_file_name(&self, template: &Template) -> String {
        let extension = match self.media_type {
            "application/pdf" => "pdf",
            _ => "bin",
        };
        let stem = slug::slugify(&template.name);
        let stem = if stem.is_empty() { slug::slugify(template.id.as_str()) } else { stem };
        format!("{}-{}.{}", stem, slug::slugify(template.document_type.as_str()), extension)
    }
}
