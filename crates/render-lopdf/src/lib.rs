//! PDF backend built on lopdf.
//!
//! Pages are drawn into [`PdfCanvas`] operation lists (safe to do on several
//! threads) and assembled into a single document afterwards, optionally on
//! top of pages imported from a backdrop PDF.

mod canvas;
mod encoding;
mod images;
mod renderer;

pub use canvas::{PageContent, PdfCanvas};
pub use encoding::{encode_text, font_encoding, text_string};
pub use images::{DecodedImage, decode as decode_image};
pub use renderer::{LopdfRenderer, PDF_MEDIA_TYPE, PdfPage};

use flate2::Compression;
use flate2::write::ZlibEncoder;
use sablon_render_core::RenderError;
use std::io::Write;

/// Zlib-compresses `bytes` for a `FlateDecode` stream.
pub(crate) fn deflate(bytes: &[u8]) -> Result<Vec<u8>, RenderError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes)?;
    Ok(encoder.finish()?)
}
