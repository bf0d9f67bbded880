use super::PaintContext;
use crate::canvas::{Canvas, ImageData};
use crate::error::RenderError;
use sablon_resolve::{ImageRef, ResolvedValue};

/// Places the referenced image scaled to the field box.
///
/// Images that cannot be loaded or decoded are skipped with a warning so a
/// missing logo never blocks a document.
pub fn paint_image(canvas: &mut dyn Canvas, ctx: &PaintContext<'_>) -> Result<(), RenderError> {
    let image_ref = match ctx.value {
        ResolvedValue::Absent => return Ok(()),
        ResolvedValue::Image(image_ref) => image_ref,
        other => {
            return Err(RenderError::type_mismatch(
                &ctx.field.name,
                "image reference",
                other.shape(),
            ));
        }
    };

    let data = match image_ref {
        ImageRef::Missing => return Ok(()),
        ImageRef::Inline { media_type, data } => ImageData {
            bytes: data.clone(),
            label: format!("inline {}", media_type),
        },
        ImageRef::Uri(uri) => {
            let Some(resources) = ctx.resources else {
                log::warn!(
                    "Image field '{}' references '{}' but no resource provider is configured",
                    ctx.field.name,
                    uri
                );
                return Ok(());
            };
            match resources.load(uri) {
                Ok(bytes) => ImageData {
                    bytes,
                    label: uri.to_string(),
                },
                Err(e) => {
                    log::warn!("Skipping image field '{}': {}", ctx.field.name, e);
                    return Ok(());
                }
            }
        }
    };

    if let Err(e) = canvas.image(ctx.placement.rect(), &data) {
        log::warn!(
            "Skipping image field '{}' ({}): {}",
            ctx.field.name,
            data.label,
            e
        );
    }
    Ok(())
}
