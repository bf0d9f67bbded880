use super::{PaintContext, scalar_text};
use crate::canvas::Canvas;
use crate::error::RenderError;
use barcoders::sym::code39::Code39;
use barcoders::sym::code128::Code128;
use barcoders::sym::ean13::EAN13;
use qrcode::{EcLevel, QrCode};
use sablon_template::BarcodeFormat;
use sablon_types::{Color, Rect};

/// Bar modules (1 = bar) for a one-dimensional format.
///
/// Code 128 uses character set B. EAN-13 accepts the 12 data digits or all
/// 13 digits with a correct check digit.
pub fn encode_linear(format: BarcodeFormat, data: &str) -> Result<Vec<u8>, String> {
    match format {
        BarcodeFormat::Code128 => Code128::new(&format!("\u{0181}{}", data))
            .map(|b| b.encode())
            .map_err(|e| e.to_string()),
        BarcodeFormat::Code39 => Code39::new(data)
            .map(|b| b.encode())
            .map_err(|e| e.to_string()),
        BarcodeFormat::Ean13 => {
            let digits = ean13_payload(data)?;
            EAN13::new(digits)
                .map(|b| b.encode())
                .map_err(|e| e.to_string())
        }
        BarcodeFormat::QrCode => Err("QR codes are not linear".to_string()),
    }
}

fn ean13_payload(data: &str) -> Result<&str, String> {
    if !data.chars().all(|c| c.is_ascii_digit()) {
        return Err(format!("EAN-13 takes digits only, got '{}'", data));
    }
    match data.len() {
        12 => Ok(data),
        13 => {
            let (payload, check) = data.split_at(12);
            let expected = ean13_check_digit(payload);
            if check.as_bytes()[0] - b'0' == expected {
                Ok(payload)
            } else {
                Err(format!("check digit of '{}' should be {}", data, expected))
            }
        }
        n => Err(format!("EAN-13 takes 12 or 13 digits, got {}", n)),
    }
}

fn ean13_check_digit(payload: &str) -> u8 {
    let sum: u32 = payload
        .bytes()
        .enumerate()
        .map(|(i, b)| {
            let digit = (b - b'0') as u32;
            if i % 2 == 0 { digit } else { digit * 3 }
        })
        .sum();
    ((10 - sum % 10) % 10) as u8
}

pub fn paint_barcode(canvas: &mut dyn Canvas, ctx: &PaintContext<'_>) -> Result<(), RenderError> {
    let Some(data) = scalar_text(ctx, "barcode text")? else {
        return Ok(());
    };
    let format = ctx
        .field
        .style
        .barcode
        .as_ref()
        .map(|b| b.format)
        .unwrap_or_default();
    let area = ctx.placement.rect();
    let color = ctx.field.style.color;
    let invalid = |reason: String| {
        RenderError::type_mismatch(
            &ctx.field.name,
            "content the barcode format can encode",
            reason,
        )
    };

    if format == BarcodeFormat::QrCode {
        let code = QrCode::with_error_correction_level(data.as_bytes(), EcLevel::M)
            .map_err(|e| invalid(e.to_string()))?;
        draw_matrix(canvas, &code, area, color);
        return Ok(());
    }

    let modules = encode_linear(format, &data).map_err(invalid)?;
    draw_bars(canvas, &modules, area, color);
    Ok(())
}

/// Fills each run of adjacent bars with one rectangle.
fn draw_bars(canvas: &mut dyn Canvas, modules: &[u8], area: Rect, color: Color) {
    if modules.is_empty() {
        return;
    }
    let module_width = area.width / modules.len() as f32;
    let mut run_start: Option<usize> = None;
    for (i, &module) in modules.iter().chain(std::iter::once(&0)).enumerate() {
        match (module == 1, run_start) {
            (true, None) => run_start = Some(i),
            (false, Some(start)) => {
                canvas.fill_rect(
                    Rect::new(
                        area.x + start as f32 * module_width,
                        area.y,
                        (i - start) as f32 * module_width,
                        area.height,
                    ),
                    color,
                );
                run_start = None;
            }
            _ => {}
        }
    }
}

/// Draws a square QR matrix centred in `area`.
fn draw_matrix(canvas: &mut dyn Canvas, code: &QrCode, area: Rect, color: Color) {
    let width = code.width();
    if width == 0 {
        return;
    }
    let side = area.width.min(area.height);
    let cell = side / width as f32;
    let origin_x = area.x + (area.width - side) / 2.0;
    let origin_y = area.y + (area.height - side) / 2.0;

    for y in 0..width {
        let mut run_start: Option<usize> = None;
        for x in 0..=width {
            let dark = x < width && code[(x, y)] == qrcode::Color::Dark;
            match (dark, run_start) {
                (true, None) => run_start = Some(x),
                (false, Some(start)) => {
                    canvas.fill_rect(
                        Rect::new(
                            origin_x + start as f32 * cell,
                            origin_y + y as f32 * cell,
                            (x - start) as f32 * cell,
                            cell,
                        ),
                        color,
                    );
                    run_start = None;
                }
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::canvas::RecordingCanvas;
    use sablon_resolve::ResolvedValue;
    use sablon_template::{BarcodeStyle, FieldKind, FieldStyle};

    fn style(format: BarcodeFormat) -> FieldStyle {
        FieldStyle {
            barcode: Some(BarcodeStyle { format }),
            ..FieldStyle::default()
        }
    }

    #[test]
    fn linear_formats_produce_bars() {
        for (format, data) in [
            (BarcodeFormat::Code128, "TKL-2024-0042"),
            (BarcodeFormat::Code39, "TKL2024"),
            (BarcodeFormat::Ean13, "869000000001"),
        ] {
            let modules = encode_linear(format, data).unwrap();
            assert!(modules.contains(&1), "{format:?} produced no bars");
        }
    }

    #[test]
    fn ean13_check_digit_is_verified() {
        assert_eq!(ean13_check_digit("400638133393"), 1);
        assert!(encode_linear(BarcodeFormat::Ean13, "4006381333931").is_ok());
        assert!(encode_linear(BarcodeFormat::Ean13, "4006381333932").is_err());
        assert!(encode_linear(BarcodeFormat::Ean13, "12345").is_err());
        assert!(encode_linear(BarcodeFormat::Ean13, "40063813339x").is_err());
    }

    #[test]
    fn bars_stay_inside_the_field() {
        let field = field(FieldKind::Barcode, style(BarcodeFormat::Code128));
        let placement = placement(&field);
        let value = ResolvedValue::Text("TKL-0042".into());
        let mut canvas = RecordingCanvas::new();

        paint_barcode(&mut canvas, &ctx(&field, &placement, &value)).unwrap();
        let bars = canvas.filled_rects();
        assert!(!bars.is_empty());
        for bar in bars {
            assert!(bar.x >= 10.0 && bar.right() <= 210.0 + 0.01);
            assert_eq!(bar.height, 40.0);
        }
    }

    #[test]
    fn qr_codes_are_square_and_centred() {
        let field = field(FieldKind::Barcode, style(BarcodeFormat::QrCode));
        let placement = placement(&field);
        let value = ResolvedValue::Text("https://example.com/teklif/42".into());
        let mut canvas = RecordingCanvas::new();

        paint_barcode(&mut canvas, &ctx(&field, &placement, &value)).unwrap();
        let cells = canvas.filled_rects();
        assert!(!cells.is_empty());
        let left = cells.iter().map(|r| r.x).fold(f32::MAX, f32::min);
        let right = cells.iter().map(|r| r.right()).fold(f32::MIN, f32::max);
        assert!(left >= 90.0 - 0.01);
        assert!(right <= 130.0 + 0.01);
    }

    #[test]
    fn unencodable_content_is_a_type_error() {
        let field = field(FieldKind::Barcode, style(BarcodeFormat::Ean13));
        let placement = placement(&field);
        let value = ResolvedValue::Text("ABC".into());
        let mut canvas = RecordingCanvas::new();
        assert!(matches!(
            paint_barcode(&mut canvas, &ctx(&field, &placement, &value)),
            Err(RenderError::RenderType { .. })
        ));
    }

    #[test]
    fn absent_values_draw_nothing() {
        let field = field(FieldKind::Barcode, style(BarcodeFormat::Code39));
        let placement = placement(&field);
        let mut canvas = RecordingCanvas::new();
        paint_barcode(&mut canvas, &ctx(&field, &placement, &ResolvedValue::Absent)).unwrap();
        assert!(canvas.ops.is_empty());
    }
}
