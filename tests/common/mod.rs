#![allow(dead_code)]

pub mod fixtures;
pub mod pdf_assertions;

use lopdf::Document as LopdfDocument;
use sablon::{DocumentPipeline, PipelineBuilder, PipelineError, RenderOutput};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Wrapper around a generated PDF with helper methods
pub struct GeneratedPdf {
    pub output: RenderOutput,
    pub doc: LopdfDocument,
}

impl GeneratedPdf {
    pub fn from_output(output: RenderOutput) -> Result<Self, Box<dyn std::error::Error>> {
        let doc = LopdfDocument::load_mem(&output.bytes)?;
        Ok(Self { output, doc })
    }

    /// Get the number of pages in the PDF
    pub fn page_count(&self) -> usize {
        self.doc.get_pages().len()
    }

    /// Save PDF to a file for manual debugging
    pub fn save_for_debug(&self, name: &str) -> std::io::Result<()> {
        std::fs::write(format!("test_output_{}.pdf", name), &self.output.bytes)
    }
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A pipeline whose content streams are left uncompressed so tests can
/// search them.
pub fn readable_pipeline() -> Result<DocumentPipeline, PipelineError> {
    PipelineBuilder::new().with_compression(false).build()
}
