use crate::canvas::{BOLD_FONT, PageContent, PdfCanvas, REGULAR_FONT, image_name};
use crate::deflate;
use crate::encoding::{font_encoding, text_string};
use lopdf::{Dictionary, Document, Object, Stream, dictionary};
use sablon_pdf_composer::{ImportedPage, PageImporter, load_backdrop};
use sablon_render_core::{DocumentRenderer, PageJob, PainterRegistry, RenderError};
use sablon_resolve::decode_data_uri;
use sablon_template::Template;
use sablon_traits::{MediaType, ResourceProvider};
use sablon_types::{ResourceUri, Size};
use std::sync::Arc;

pub const PDF_MEDIA_TYPE: &str = "application/pdf";
const BACKDROP_NAME: &str = "Bg";

/// A drawn page waiting to be assembled.
#[derive(Debug, Clone)]
pub struct PdfPage {
    pub size: Size,
    pub content: PageContent,
}

/// Renders templates to PDF using the base-14 Helvetica fonts.
///
/// Output is deterministic: no timestamps or random ids are written, so the
/// same inputs always produce the same bytes.
#[derive(Debug, Clone)]
pub struct LopdfRenderer {
    painters: PainterRegistry,
    resources: Option<Arc<dyn ResourceProvider>>,
    compress: bool,
}

impl Default for LopdfRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl LopdfRenderer {
    pub fn new() -> Self {
        Self {
            painters: PainterRegistry::default(),
            resources: None,
            compress: true,
        }
    }

    /// Provider used for image URIs and backdrop documents.
    pub fn with_resources(mut self, resources: Arc<dyn ResourceProvider>) -> Self {
        self.resources = Some(resources);
        self
    }

    pub fn with_painters(mut self, painters: PainterRegistry) -> Self {
        self.painters = painters;
        self
    }

    /// Whether content streams are Flate-compressed (on by default).
    pub fn with_compression(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    fn load_backdrop_bytes(&self, uri: &ResourceUri) -> Result<Arc<Vec<u8>>, RenderError> {
        if uri.is_data_uri() {
            return decode_data_uri(uri.as_str())
                .map(|(_, bytes)| Arc::new(bytes))
                .ok_or_else(|| RenderError::Backdrop(format!("malformed data URI for backdrop {}", uri)));
        }
        let resources = self.resources.as_ref().ok_or_else(|| {
            RenderError::Backdrop(format!("no resource provider configured to load '{}'", uri))
        })?;
        Ok(resources.load_as(uri, MediaType::Pdf)?)
    }

    fn encode_page(&self, page: &PdfPage, backdrop: Option<&ImportedPage>) -> Result<Vec<u8>, RenderError> {
        let mut bytes = backdrop
            .map(|b| b.draw_operators(BACKDROP_NAME))
            .unwrap_or_default();
        bytes.extend(page.content.encode()?);
        if self.compress { deflate(&bytes) } else { Ok(bytes) }
    }
}

impl DocumentRenderer for LopdfRenderer {
    type Page = PdfPage;

    fn media_type(&self) -> &'static str {
        PDF_MEDIA_TYPE
    }

    fn render_page(&self, job: &PageJob) -> Result<PdfPage, RenderError> {
        let schema = job.schema()?;
        let size = job.template.base_surface.dimensions();
        let mut canvas = PdfCanvas::new(size.height);
        self.painters.paint_page(
            &mut canvas,
            schema,
            &job.plan,
            &job.values,
            self.resources.as_deref(),
        )?;
        let content = canvas.finish();
        log::debug!(
            "Rendered page {} of '{}': {} operations, {} images",
            job.page_index + 1,
            job.template.id,
            content.operations.len(),
            content.images.len()
        );
        Ok(PdfPage { size, content })
    }

    fn assemble(&self, template: &Template, pages: Vec<PdfPage>) -> Result<Vec<u8>, RenderError> {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();

        let encoding_id = doc.add_object(font_encoding());
        let regular_id = doc.add_object(dictionary! {
            "Type" => "Font", "Subtype" => "Type1", "BaseFont" => "Helvetica", "Encoding" => encoding_id,
        });
        let bold_id = doc.add_object(dictionary! {
            "Type" => "Font", "Subtype" => "Type1", "BaseFont" => "Helvetica-Bold", "Encoding" => encoding_id,
        });
        let fonts = dictionary! { REGULAR_FONT => regular_id, BOLD_FONT => bold_id };

        let backdrop_doc = match template.base_surface.backdrop() {
            Some(uri) => {
                let bytes = self.load_backdrop_bytes(uri)?;
                Some(load_backdrop(&bytes).map_err(|e| RenderError::Backdrop(e.to_string()))?)
            }
            None => None,
        };
        let mut importer = backdrop_doc
            .as_ref()
            .map(PageImporter::new)
            .transpose()
            .map_err(|e| RenderError::Backdrop(e.to_string()))?;

        let contents = encode_all(self, &pages, importer.as_mut(), &mut doc)?;

        let mut page_ids: Vec<Object> = Vec::with_capacity(pages.len());
        for ((page, content), backdrop) in pages.iter().zip(contents.0).zip(contents.1) {
            let mut xobjects = Dictionary::new();
            if let Some(form) = backdrop {
                xobjects.set(BACKDROP_NAME, form.form_id);
            }
            for (index, image) in page.content.images.iter().enumerate() {
                let id = image.write_xobject(&mut doc)?;
                xobjects.set(image_name(index), id);
            }

            let stream_dict = if self.compress {
                dictionary! { "Filter" => "FlateDecode" }
            } else {
                dictionary! {}
            };
            let content_id = doc.add_object(Stream::new(stream_dict, content));

            let mut resources = dictionary! { "Font" => fonts.clone() };
            if !xobjects.is_empty() {
                resources.set("XObject", xobjects);
            }
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), page.size.width.into(), page.size.height.into()],
                "Contents" => content_id,
                "Resources" => resources,
            });
            page_ids.push(page_id.into());
        }

        let count = page_ids.len() as i64;
        doc.objects.insert(
            pages_id,
            dictionary! { "Type" => "Pages", "Kids" => page_ids, "Count" => count }.into(),
        );
        let catalog_id = doc.add_object(dictionary! { "Type" => "Catalog", "Pages" => pages_id });
        let info_id = doc.add_object(dictionary! {
            "Title" => text_string(&template.name),
            "Producer" => Object::string_literal("sablon"),
        });
        doc.trailer.set("Root", catalog_id);
        doc.trailer.set("Info", info_id);

        let mut out = Vec::new();
        doc.save_to(&mut out)
            .map_err(|e| RenderError::Pdf(e.to_string()))?;
        Ok(out)
    }
}

type EncodedPages = (Vec<Vec<u8>>, Vec<Option<ImportedPage>>);

/// Imports backdrop pages in order, then encodes every content stream.
fn encode_all(
    renderer: &LopdfRenderer,
    pages: &[PdfPage],
    mut importer: Option<&mut PageImporter<'_>>,
    doc: &mut Document,
) -> Result<EncodedPages, RenderError> {
    let mut backdrops = Vec::with_capacity(pages.len());
    for index in 0..pages.len() {
        let form = match importer.as_deref_mut() {
            Some(importer) => Some(
                importer
                    .import(doc, index)
                    .map_err(|e| RenderError::Backdrop(e.to_string()))?,
            ),
            None => None,
        };
        backdrops.push(form);
    }

    #[cfg(feature = "parallel-render")]
    let encoded: Result<Vec<Vec<u8>>, RenderError> = {
        use rayon::prelude::*;
        pages
            .par_iter()
            .zip(backdrops.par_iter())
            .map(|(page, backdrop)| renderer.encode_page(page, backdrop.as_ref()))
            .collect()
    };
    #[cfg(not(feature = "parallel-render"))]
    let encoded: Result<Vec<Vec<u8>>, RenderError> = pages
        .iter()
        .zip(&backdrops)
        .map(|(page, backdrop)| renderer.encode_page(page, backdrop.as_ref()))
        .collect();

    Ok((encoded?, backdrops))
}
