//! PDF composition utilities for drawing over existing documents.
//!
//! Templates may use a pre-printed PDF (letterhead, form) as their
//! background. This crate provides:
//! - Deep object copying between documents with cycle detection
//! - Importing a page of another document as a Form XObject that can be
//!   painted with a single `Do` operator

mod error;

pub use error::ComposerError;

use flate2::Compression;
use flate2::write::ZlibEncoder;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};
use std::collections::HashMap;
use std::io::Write;

/// Manages the state of copying objects between documents.
struct ObjectCopier<'a> {
    source_doc: &'a Document,
    id_map: HashMap<ObjectId, ObjectId>,
}

impl<'a> ObjectCopier<'a> {
    fn new(source_doc: &'a Document) -> Self {
        Self {
            source_doc,
            id_map: HashMap::new(),
        }
    }

    /// Deep copies an object and everything it references into `target`.
    /// Each source object is copied once, however often it is referenced.
    fn copy_object(&mut self, target: &mut Document, source_id: ObjectId) -> Result<ObjectId, lopdf::Error> {
        if let Some(target_id) = self.id_map.get(&source_id) {
            return Ok(*target_id);
        }

        // Reserve the id before recursing so cycles (Page -> Parent -> Kids)
        // resolve to it instead of looping.
        let new_id = target.add_object(Object::Null);
        self.id_map.insert(source_id, new_id);

        let obj = self.source_doc.get_object(source_id)?.clone();
        let new_obj = self.remap_references(target, obj)?;

        match target.objects.get_mut(&new_id) {
            Some(slot) => *slot = new_obj,
            None => return Err(lopdf::Error::ObjectNotFound(new_id)),
        }
        Ok(new_id)
    }

    /// Replaces every reference inside `obj` with the id of its copy.
    fn remap_references(&mut self, target: &mut Document, obj: Object) -> Result<Object, lopdf::Error> {
        match obj {
            Object::Reference(id) => Ok(Object::Reference(self.copy_object(target, id)?)),
            Object::Array(arr) => arr
                .into_iter()
                .map(|o| self.remap_references(target, o))
                .collect::<Result<Vec<_>, _>>()
                .map(Object::Array),
            Object::Dictionary(dict) => Ok(Object::Dictionary(self.remap_dict(target, dict)?)),
            Object::Stream(mut stream) => {
                stream.dict = self.remap_dict(target, stream.dict)?;
                Ok(Object::Stream(stream))
            }
            _ => Ok(obj),
        }
    }

    fn remap_dict(&mut self, target: &mut Document, mut dict: Dictionary) -> Result<Dictionary, lopdf::Error> {
        for (_, value) in dict.iter_mut() {
            *value = self.remap_references(target, value.clone())?;
        }
        Ok(dict)
    }
}

/// A backdrop page placed in the target document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImportedPage {
    pub form_id: ObjectId,
    /// `[llx, lly, urx, ury]` of the source page.
    pub bbox: [f32; 4],
}

impl ImportedPage {
    /// Content operators that paint the form at the page origin as `/name`.
    pub fn draw_operators(&self, name: &str) -> Vec<u8> {
        format!(
            "q 1 0 0 1 {} {} cm /{} Do Q\n",
            0.0 - self.bbox[0],
            0.0 - self.bbox[1],
            name
        ).into_bytes()
    }
}

/// Imports pages of one source document into a target, sharing copied
/// resources between pages and importing each source page once.
pub struct PageImporter<'a> {
    source: &'a Document,
    pages: Vec<ObjectId>,
    copier: ObjectCopier<'a>,
    forms: HashMap<usize, ImportedPage>,
}

impl<'a> PageImporter<'a> {
    pub fn new(source: &'a Document) -> Result<Self, ComposerError> {
        if source.is_encrypted() {
            return Err(ComposerError::Encrypted);
        }
        let pages: Vec<ObjectId> = source.get_pages().into_values().collect();
        if pages.is_empty() {
            return Err(ComposerError::NoPages);
        }
        Ok(Self {
            source,
            pages,
            copier: ObjectCopier::new(source),
            forms: HashMap::new(),
        })
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Imports the page at `index` (0-based) as a Form XObject. Indexes past
    /// the end reuse the last page.
    pub fn import(&mut self, target: &mut Document, index: usize) -> Result<ImportedPage, ComposerError> {
        let index = index.min(self.pages.len() - 1);
        if let Some(form) = self.forms.get(&index) {
            return Ok(*form);
        }

        let page_id = self.pages[index];
        let content = self.source.get_page_content(page_id)?;
        let bbox = inherited(self.source, page_id, b"CropBox")
            .or_else(|| inherited(self.source, page_id, b"MediaBox"))
            .and_then(|o| page_box(self.source, &o))
            .unwrap_or([0.0, 0.0, 612.0, 792.0]);
        let resources = match inherited(self.source, page_id, b"Resources") {
            Some(res) => self.copier.remap_references(target, res)?,
            None => Object::Dictionary(Dictionary::new()),
        };

        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&content)?;
        let compressed = encoder.finish()?;

        let form = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Form",
                "FormType" => 1,
                "BBox" => bbox.iter().map(|v| Object::Real(*v)).collect::<Vec<_>>(),
                "Resources" => resources,
                "Filter" => "FlateDecode",
            },
            compressed,
        );
        let imported = ImportedPage {
            form_id: target.add_object(form),
            bbox,
        };
        log::debug!(
            "Imported backdrop page {} as form {:?} ({} content bytes)",
            index + 1,
            imported.form_id,
            content.len()
        );
        self.forms.insert(index, imported);
        Ok(imported)
    }
}

/// Loads a backdrop document and checks it can be imported.
pub fn load_backdrop(bytes: &[u8]) -> Result<Document, ComposerError> {
    let doc = Document::load_mem(bytes)?;
    if doc.is_encrypted() {
        return Err(ComposerError::Encrypted);
    }
    if doc.get_pages().is_empty() {
        return Err(ComposerError::NoPages);
    }
    Ok(doc)
}

/// Imports a single page of `source` into `target` as a Form XObject.
pub fn import_page_as_form(
    target: &mut Document,
    source: &Document,
    index: usize,
) -> Result<ImportedPage, ComposerError> {
    PageImporter::new(source)?.import(target, index)
}

/// Looks `key` up on the page dictionary, then up its parent chain.
fn inherited(doc: &Document, page_id: ObjectId, key: &[u8]) -> Option<Object> {
    let mut current = doc.get_object(page_id).and_then(Object::as_dict).ok()?;
    // Page trees are shallow; the bound guards against malformed cycles.
    for _ in 0..32 {
        if let Ok(value) = current.get(key) {
            return match value {
                Object::Reference(id) => doc.get_object(*id).ok().cloned(),
                other => Some(other.clone()),
            };
        }
        let parent = current.get(b"Parent").and_then(Object::as_reference).ok()?;
        current = doc.get_object(parent).and_then(Object::as_dict).ok()?;
    }
    None
}

fn page_box(doc: &Document, obj: &Object) -> Option<[f32; 4]> {
    let values: Vec<f32> = obj
        .as_array()
        .ok()?
        .iter()
        .map(|o| match o {
            Object::Reference(id) => doc.get_object(*id).and_then(Object::as_float).ok(),
            other => other.as_float().ok(),
        })
        .collect::<Option<_>>()?;
    match values.as_slice() {
        [a, b, c, d] => Some([*a, *b, *c, *d]),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{Document, Object, StringFormat};

    /// Builds a document whose pages each print "<prefix> <n>" and inherit
    /// their MediaBox and Resources from the page tree.
    fn create_backdrop(num_pages: u32, text_prefix: &str) -> Document {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut page_ids = vec![];
        for i in 1..=num_pages {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Td", vec![100.into(), 700.into()]),
                    Operation::new(
                        "Tj",
                        vec![Object::String(
                            format!("{} {}", text_prefix, i).into_bytes(),
                            StringFormat::Literal,
                        )],
                    ),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            page_ids.push(page_id.into());
        }

        doc.objects.insert(
            pages_id,
            dictionary! {
                "Type" => "Pages",
                "Kids" => page_ids,
                "Count" => num_pages as i64,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
                "Resources" => resources_id,
            }
            .into(),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc
    }

    fn form_content(doc: &Document, id: ObjectId) -> String {
        let stream = doc.get_object(id).unwrap().as_stream().unwrap();
        String::from_utf8_lossy(&stream.decompressed_content().unwrap()).into_owned()
    }

    #[test]
    fn imports_a_page_with_inherited_box_and_resources() {
        let source = create_backdrop(2, "Antet");
        let mut target = Document::with_version("1.7");

        let form = import_page_as_form(&mut target, &source, 1).unwrap();
        assert_eq!(form.bbox, [0.0, 0.0, 595.0, 842.0]);

        let dict = &target.get_object(form.form_id).unwrap().as_stream().unwrap().dict;
        assert_eq!(dict.get(b"Subtype").unwrap().as_name().unwrap(), b"Form");
        let resources = dict.get(b"Resources").unwrap().as_dict().unwrap();
        let font_ref = resources
            .get(b"Font")
            .unwrap()
            .as_dict()
            .unwrap()
            .get(b"F1")
            .unwrap()
            .as_reference()
            .unwrap();
        assert!(target.get_object(font_ref).is_ok());
        assert!(form_content(&target, form.form_id).contains("Antet 2"));
    }

    #[test]
    fn pages_past_the_end_reuse_the_last_one() {
        let source = create_backdrop(2, "Sayfa");
        let mut target = Document::with_version("1.7");
        let mut importer = PageImporter::new(&source).unwrap();

        let second = importer.import(&mut target, 1).unwrap();
        let fifth = importer.import(&mut target, 4).unwrap();
        assert_eq!(second, fifth);
        assert_eq!(importer.page_count(), 2);
    }

    #[test]
    fn shared_resources_are_copied_once() {
        let source = create_backdrop(3, "Form");
        let mut target = Document::with_version("1.7");
        let mut importer = PageImporter::new(&source).unwrap();

        let before = target.objects.len();
        importer.import(&mut target, 0).unwrap();
        let after_first = target.objects.len();
        importer.import(&mut target, 1).unwrap();
        // The second page only adds its own form stream.
        assert_eq!(target.objects.len() - after_first, 1);
        assert!(after_first - before > 1);
    }

    #[test]
    fn draw_operators_offset_by_the_box_origin() {
        let page = ImportedPage {
            form_id: (7, 0),
            bbox: [10.0, 20.0, 605.0, 862.0],
        };
        assert_eq!(
            String::from_utf8(page.draw_operators("Bg")).unwrap(),
            "q 1 0 0 1 -10 -20 cm /Bg Do Q\n"
        );
    }

    #[test]
    fn empty_and_garbage_documents_are_rejected() {
        assert!(matches!(load_backdrop(b"not a pdf"), Err(ComposerError::Pdf(_))));

        let mut empty = create_backdrop(0, "");
        let mut bytes = Vec::new();
        empty.save_to(&mut bytes).unwrap();
        assert!(matches!(load_backdrop(&bytes), Err(ComposerError::NoPages)));
        assert!(matches!(PageImporter::new(&empty), Err(ComposerError::NoPages)));
    }
}
