//! Image decoding and XObject construction.

use crate::deflate;
use image::GenericImageView;
use lopdf::{Document, Object, ObjectId, Stream, dictionary};
use sablon_render_core::RenderError;

/// Decoded pixels of one placed image.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    /// 8-bit RGB samples.
    pub rgb: Vec<u8>,
    /// 8-bit alpha samples, present only when some pixel is translucent.
    pub alpha: Option<Vec<u8>>,
}

/// Decodes PNG or JPEG bytes.
pub fn decode(bytes: &[u8]) -> Result<DecodedImage, RenderError> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| RenderError::Other(format!("cannot decode image: {}", e)))?;
    let (width, height) = img.dimensions();

    let alpha = if img.color().has_alpha() {
        let rgba = img.to_rgba8();
        let alpha: Vec<u8> = rgba.pixels().map(|p| p.0[3]).collect();
        alpha.iter().any(|&a| a < u8::MAX).then_some(alpha)
    } else {
        None
    };

    Ok(DecodedImage {
        width,
        height,
        rgb: img.to_rgb8().into_raw(),
        alpha,
    })
}

impl DecodedImage {
    /// Adds the image (and its soft mask) to `doc`, returning the image id.
    pub fn write_xobject(&self, doc: &mut Document) -> Result<ObjectId, RenderError> {
        let mut dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => self.width as i64,
            "Height" => self.height as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
            "Filter" => "FlateDecode",
        };
        if let Some(alpha) = &self.alpha {
            let mask = Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => self.width as i64,
                    "Height" => self.height as i64,
                    "ColorSpace" => "DeviceGray",
                    "BitsPerComponent" => 8,
                    "Filter" => "FlateDecode",
                },
                deflate(alpha)?,
            );
            let mask_id = doc.add_object(mask);
            dict.set("SMask", Object::Reference(mask_id));
        }
        Ok(doc.add_object(Stream::new(dict, deflate(&self.rgb)?)))
    }
}
