//! Number, currency and case formatting that never consults the process locale.

/// Thousands and decimal separators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grouping {
    pub group: char,
    pub decimal: char,
}

impl Grouping {
    /// `8.260,00`
    pub const TR: Grouping = Grouping {
        group: '.',
        decimal: ',',
    };
    /// `8,260.00`
    pub const EN: Grouping = Grouping {
        group: ',',
        decimal: '.',
    };
}

/// Formats `value` with `decimals` fraction digits and grouped thousands.
/// Returns whether the result is negative separately so callers can place
/// the sign in front of a currency symbol.
pub fn format_grouped(value: f64, decimals: usize, grouping: Grouping) -> (bool, String) {
    let rendered = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match rendered.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (rendered.as_str(), None),
    };

    let digits = int_part.len();
    let mut out = String::with_capacity(rendered.len() + digits / 3 + 1);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (digits - i) % 3 == 0 {
            out.push(grouping.group);
        }
        out.push(ch);
    }
    if let Some(frac) = frac_part {
        out.push(grouping.decimal);
        out.push_str(frac);
    }

    let negative = value < 0.0 && rendered.chars().any(|c| c.is_ascii_digit() && c != '0');
    (negative, out)
}

pub fn format_number(value: f64, decimals: usize, grouping: Grouping) -> String {
    let (negative, body) = format_grouped(value, decimals, grouping);
    if negative { format!("-{}", body) } else { body }
}

/// Symbol placement and separators for the currencies the documents use.
struct CurrencyFormat {
    symbol: &'static str,
    grouping: Grouping,
}

fn currency_format(code: &str) -> Option<CurrencyFormat> {
    let (symbol, grouping) = match code {
        "TRY" | "TL" => ("₺", Grouping::TR),
        "EUR" => ("€", Grouping::TR),
        "USD" => ("$", Grouping::EN),
        "GBP" => ("£", Grouping::EN),
        _ => return None,
    };
    Some(CurrencyFormat { symbol, grouping })
}

/// `₺8.260,00` for `TRY`, `$8,260.00` for `USD`; unknown codes are appended
/// after a Turkish-grouped amount (`8.260,00 XYZ`).
pub fn format_currency(value: f64, code: &str, decimals: usize) -> String {
    let code = code.trim().to_ascii_uppercase();
    match currency_format(&code) {
        Some(fmt) => {
            let (negative, body) = format_grouped(value, decimals, fmt.grouping);
            let sign = if negative { "-" } else { "" };
            format!("{}{}{}", sign, fmt.symbol, body)
        }
        None => format!("{} {}", format_number(value, decimals, Grouping::TR), code),
    }
}

/// `%18` with Turkish separators when decimals are requested.
pub fn format_percent(value: f64, decimals: usize) -> String {
    let (negative, body) = format_grouped(value, decimals, Grouping::TR);
    if negative {
        format!("-%{}", body)
    } else {
        format!("%{}", body)
    }
}

/// Upper-cases with Turkish dotted and dotless i.
pub fn turkish_upper(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            'i' => out.push('İ'),
            'ı' => out.push('I'),
            other => out.extend(other.to_uppercase()),
        }
    }
    out
}

/// Lower-cases with Turkish dotted and dotless i.
pub fn turkish_lower(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            'I' => out.push('ı'),
            'İ' => out.push('i'),
            other => out.extend(other.to_lowercase()),
        }
    }
    out
}
