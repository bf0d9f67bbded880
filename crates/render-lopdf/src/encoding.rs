//! Text encoding for the built-in Helvetica fonts.
//!
//! Fonts use WinAnsiEncoding with a `Differences` array that places the
//! Turkish letters missing from it (ğ Ğ ş Ş ı İ) on unused codes. Letters
//! WinAnsi already has (ç ö ü and their capitals) keep their Latin-1 codes.

use lopdf::{Dictionary, Object, StringFormat, dictionary};

const TURKISH_DIFFERENCES: [(u8, &str); 6] = [
    (127, "dotlessi"),
    (129, "Gbreve"),
    (141, "gbreve"),
    (143, "Scedilla"),
    (144, "scedilla"),
    (157, "Idotaccent"),
];

/// The `/Encoding` dictionary shared by both fonts.
pub fn font_encoding() -> Dictionary {
    let mut differences = Vec::with_capacity(TURKISH_DIFFERENCES.len() * 2);
    for (code, glyph) in TURKISH_DIFFERENCES {
        differences.push(Object::Integer(code as i64));
        differences.push(Object::Name(glyph.as_bytes().to_vec()));
    }
    dictionary! {
        "Type" => "Encoding",
        "BaseEncoding" => "WinAnsiEncoding",
        "Differences" => differences,
    }
}

fn encode_char(c: char, out: &mut Vec<u8>) {
    let byte = match c {
        'ı' => 127,
        'Ğ' => 129,
        'ğ' => 141,
        'Ş' => 143,
        'ş' => 144,
        'İ' => 157,
        '€' => 0x80,
        '…' => 0x85,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '₺' => {
            out.extend_from_slice(b"TL");
            return;
        }
        '\t' => {
            out.extend_from_slice(b"    ");
            return;
        }
        c if (' '..='~').contains(&c) => c as u8,
        c if ('\u{A0}'..='\u{FF}').contains(&c) => c as u32 as u8,
        _ => b'?',
    };
    out.push(byte);
}

/// Encodes `text` as bytes for a `Tj` operand.
pub fn encode_text(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    for c in text.chars() {
        encode_char(c, &mut out);
    }
    out
}

/// A PDF text string for document metadata such as `/Title`.
///
/// ASCII is written as a literal; anything else as UTF-16BE with a byte
/// order mark, which every viewer decodes.
pub fn text_string(text: &str) -> Object {
    if text.is_ascii() {
        return Object::string_literal(text);
    }
    let mut bytes = Vec::with_capacity(2 + text.len() * 2);
    bytes.extend_from_slice(&[0xFE, 0xFF]);
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}
