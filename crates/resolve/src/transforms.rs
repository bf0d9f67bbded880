//! Named, pure transforms used by `computed` mappings.
use crate::error::TransformError;
use crate::format::{
    Grouping, format_currency, format_number, format_percent, turkish_lower, turkish_upper,
};
use crate::value::{ResolvedValue, is_truthy_text, json_display};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt::Write;

/// Inputs handed to a transform: one list of present values per input path
/// (wildcard paths contribute every element, absent paths an empty list).
pub struct TransformArgs<'a> {
    pub name: &'a str,
    pub inputs: Vec<Vec<&'a Value>>,
    pub options: &'a Map<String, Value>,
}

impl<'a> TransformArgs<'a> {
    /// The first present value of the first input.
    pub fn first(&self) -> Option<&'a Value> {
        self.inputs.first().and_then(|v| v.first().copied())
    }

    /// Every present value across all inputs, in input order.
    pub fn all(&self) -> impl Iterator<Item = &'a Value> + '_ {
        self.inputs.iter().flat_map(|v| v.iter().copied())
    }

    pub fn option_str(&self, key: &str) -> Option<&'a str> {
        self.options.get(key).and_then(Value::as_str)
    }

    pub fn option_usize(&self, key: &str, default: usize) -> Result<usize, TransformError> {
        match self.options.get(key) {
            None => Ok(default),
            Some(v) => v
                .as_u64()
                .filter(|n| *n <= 12)
                .map(|n| n as usize)
                .ok_or_else(|| self.invalid_option(key, format!("expected 0..=12, got {}", v))),
        }
    }

    pub fn invalid_input(&self, message: impl Into<String>) -> TransformError {
        TransformError::InvalidInput {
            transform: self.name.to_string(),
            message: message.into(),
        }
    }

    pub fn invalid_option(&self, option: &str, message: impl Into<String>) -> TransformError {
        TransformError::InvalidOption {
            transform: self.name.to_string(),
            option: option.to_string(),
            message: message.into(),
        }
    }

    fn number(&self, value: &Value) -> Result<f64, TransformError> {
        as_number(value).ok_or_else(|| self.invalid_input(format!("'{}' is not a number", value)))
    }
}

/// The signature for a transform implementation.
pub type TransformFn = fn(args: &TransformArgs<'_>) -> Result<ResolvedValue, TransformError>;

/// A registry of transforms, looked up case-insensitively.
#[derive(Clone)]
pub struct TransformRegistry {
    transforms: HashMap<String, TransformFn>,
}

impl TransformRegistry {
    /// Creates a new, empty registry.
    pub fn new() -> Self {
        Self {
            transforms: HashMap::new(),
        }
    }

    /// Registers a transform, replacing any existing one with the same name.
    pub fn register(&mut self, name: &str, func: TransformFn) {
        self.transforms.insert(name.to_lowercase(), func);
    }

    pub fn get(&self, name: &str) -> Option<&TransformFn> {
        self.transforms.get(&name.to_lowercase())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.transforms.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl std::fmt::Debug for TransformRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransformRegistry")
            .field("transforms", &self.names())
            .finish()
    }
}

impl Default for TransformRegistry {
    /// Creates a registry populated with all built-in transforms.
    fn default() -> Self {
        let mut registry = Self::new();
        registry.register("currency", currency);
        registry.register("number", number);
        registry.register("percent", percent);
        registry.register("date", date);
        registry.register("dateTime", date_time);
        registry.register("concat", concat);
        registry.register("upper", upper);
        registry.register("lower", lower);
        registry.register("sum", sum);
        registry.register("count", count);
        registry.register("default", default_value);
        registry.register("yesNo", yes_no);
        registry
    }
}

// --- Helpers ---

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

fn parse_date_time(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Formats a parsed date with a chrono format string, rejecting bad specifiers
/// instead of panicking on them.
pub fn format_date(dt: &NaiveDateTime, format: &str) -> Option<String> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return None;
    }
    let mut out = String::new();
    write!(out, "{}", dt.format(format)).ok()?;
    Some(out)
}

/// Parses `raw` as a date or date-time and formats it; `None` when it is not one.
pub fn reformat_date(raw: &str, format: &str) -> Option<String> {
    parse_date_time(raw).and_then(|dt| format_date(&dt, format))
}

fn date_with_default(args: &TransformArgs<'_>, default_format: &str) -> Result<ResolvedValue, TransformError> {
    let Some(value) = args.first() else {
        return Ok(ResolvedValue::Absent);
    };
    let raw = value
        .as_str()
        .ok_or_else(|| args.invalid_input(format!("'{}' is not a date string", value)))?;
    let format = args.option_str("format").unwrap_or(default_format);
    let dt = parse_date_time(raw)
        .ok_or_else(|| args.invalid_input(format!("'{}' is not a recognised date", raw)))?;
    format_date(&dt, format)
        .map(ResolvedValue::Text)
        .ok_or_else(|| args.invalid_option("format", format!("bad format string '{}'", format)))
}

fn grouping_option(args: &TransformArgs<'_>) -> Result<Grouping, TransformError> {
    match args.option_str("grouping") {
        None | Some("tr") => Ok(Grouping::TR),
        Some("en") => Ok(Grouping::EN),
        Some(other) => Err(args.invalid_option("grouping", format!("expected 'tr' or 'en', got '{}'", other))),
    }
}

// --- Built-in Transform Implementations ---

fn currency(args: &TransformArgs<'_>) -> Result<ResolvedValue, TransformError> {
    let Some(value) = args.first() else {
        return Ok(ResolvedValue::Absent);
    };
    let amount = args.number(value)?;
    let code = args.option_str("currency").unwrap_or("TRY");
    let decimals = args.option_usize("decimals", 2)?;
    Ok(ResolvedValue::Text(format_currency(amount, code, decimals)))
}

fn number(args: &TransformArgs<'_>) -> Result<ResolvedValue, TransformError> {
    let Some(value) = args.first() else {
        return Ok(ResolvedValue::Absent);
    };
    let n = args.number(value)?;
    let decimals = args.option_usize("decimals", 2)?;
    Ok(ResolvedValue::Text(format_number(n, decimals, grouping_option(args)?)))
}

fn percent(args: &TransformArgs<'_>) -> Result<ResolvedValue, TransformError> {
    let Some(value) = args.first() else {
        return Ok(ResolvedValue::Absent);
    };
    let n = args.number(value)?;
    let decimals = args.option_usize("decimals", 0)?;
    Ok(ResolvedValue::Text(format_percent(n, decimals)))
}

fn date(args: &TransformArgs<'_>) -> Result<ResolvedValue, TransformError> {
    date_with_default(args, "%d.%m.%Y")
}

fn date_time(args: &TransformArgs<'_>) -> Result<ResolvedValue, TransformError> {
    date_with_default(args, "%d.%m.%Y %H:%M")
}

fn concat(args: &TransformArgs<'_>) -> Result<ResolvedValue, TransformError> {
    let separator = args.option_str("separator").unwrap_or("");
    let parts: Vec<String> = args
        .all()
        .map(json_display)
        .filter(|s| !s.is_empty())
        .collect();
    if parts.is_empty() {
        return Ok(ResolvedValue::Absent);
    }
    Ok(ResolvedValue::Text(parts.join(separator)))
}

fn upper(args: &TransformArgs<'_>) -> Result<ResolvedValue, TransformError> {
    Ok(args
        .first()
        .map(|v| ResolvedValue::Text(turkish_upper(&json_display(v))))
        .unwrap_or(ResolvedValue::Absent))
}

fn lower(args: &TransformArgs<'_>) -> Result<ResolvedValue, TransformError> {
    Ok(args
        .first()
        .map(|v| ResolvedValue::Text(turkish_lower(&json_display(v))))
        .unwrap_or(ResolvedValue::Absent))
}

fn sum(args: &TransformArgs<'_>) -> Result<ResolvedValue, TransformError> {
    let mut total = 0.0;
    let mut seen = false;
    for value in args.all() {
        total += args.number(value)?;
        seen = true;
    }
    Ok(if seen {
        ResolvedValue::Number(total)
    } else {
        ResolvedValue::Absent
    })
}

fn count(args: &TransformArgs<'_>) -> Result<ResolvedValue, TransformError> {
    let n = match args.inputs.first().map(Vec::as_slice) {
        None | Some([]) => 0,
        Some([Value::Array(items)]) => items.len(),
        Some(values) => values.len(),
    };
    Ok(ResolvedValue::Number(n as f64))
}

fn default_value(args: &TransformArgs<'_>) -> Result<ResolvedValue, TransformError> {
    if let Some(value) = args.all().next() {
        return Ok(ResolvedValue::from_json(value, false));
    }
    Ok(args
        .options
        .get("value")
        .map(|v| ResolvedValue::from_json(v, false))
        .unwrap_or(ResolvedValue::Absent))
}

fn yes_no(args: &TransformArgs<'_>) -> Result<ResolvedValue, TransformError> {
    let Some(value) = args.first() else {
        return Ok(ResolvedValue::Absent);
    };
    let truthy = match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => is_truthy_text(s),
        other => return Err(args.invalid_input(format!("'{}' is not a yes/no value", other))),
    };
    let text = if truthy {
        args.option_str("yes").unwrap_or("Evet")
    } else {
        args.option_str("no").unwrap_or("Hayır")
    };
    Ok(ResolvedValue::Text(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn run(name: &str, inputs: Vec<Vec<&Value>>, options: Value) -> Result<ResolvedValue, TransformError> {
        let registry = TransformRegistry::default();
        let options = options.as_object().cloned().unwrap_or_default();
        let args = TransformArgs {
            name,
            inputs,
            options: &options,
        };
        let f = registry.get(name).expect("builtin transform");
        f(&args)
    }

    fn text(s: &str) -> ResolvedValue {
        ResolvedValue::Text(s.to_string())
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let registry = TransformRegistry::default();
        assert!(registry.contains("dateTime"));
        assert!(registry.contains("DATETIME"));
        assert!(registry.contains("yesno"));
        assert!(!registry.contains("roman"));
    }

    #[test]
    fn currency_defaults_to_lira_and_accepts_numeric_strings() {
        let amount = json!(8260);
        assert_eq!(run("currency", vec![vec![&amount]], json!({})).unwrap(), text("₺8.260,00"));
        let amount = json!("1499.9");
        assert_eq!(
            run("currency", vec![vec![&amount]], json!({ "currency": "USD" })).unwrap(),
            text("$1,499.90")
        );
        let bad = json!("on bin");
        assert!(matches!(
            run("currency", vec![vec![&bad]], json!({})),
            Err(TransformError::InvalidInput { .. })
        ));
        assert_eq!(run("currency", vec![vec![]], json!({})).unwrap(), ResolvedValue::Absent);
    }

    #[test]
    fn number_and_percent_options() {
        let v = json!(1234.5);
        assert_eq!(
            run("number", vec![vec![&v]], json!({ "decimals": 1, "grouping": "en" })).unwrap(),
            text("1,234.5")
        );
        assert!(run("number", vec![vec![&v]], json!({ "grouping": "fr" })).is_err());
        assert!(run("number", vec![vec![&v]], json!({ "decimals": -1 })).is_err());
        let vat = json!(18);
        assert_eq!(run("percent", vec![vec![&vat]], json!({})).unwrap(), text("%18"));
    }

    #[test]
    fn dates_parse_common_shapes() {
        let d = json!("2024-03-09");
        assert_eq!(run("date", vec![vec![&d]], json!({})).unwrap(), text("09.03.2024"));
        let dt = json!("2024-03-09T14:05:00+03:00");
        assert_eq!(run("dateTime", vec![vec![&dt]], json!({})).unwrap(), text("09.03.2024 14:05"));
        assert_eq!(
            run("date", vec![vec![&dt]], json!({ "format": "%Y/%m" })).unwrap(),
            text("2024/03")
        );
        assert!(run("date", vec![vec![&d]], json!({ "format": "%Q" })).is_err());
        let junk = json!("yarın");
        assert!(run("date", vec![vec![&junk]], json!({})).is_err());
    }

    #[test]
    fn concat_skips_absent_inputs() {
        let first = json!("Ayşe");
        let last = json!("Yılmaz");
        assert_eq!(
            run("concat", vec![vec![&first], vec![], vec![&last]], json!({ "separator": " " })).unwrap(),
            text("Ayşe Yılmaz")
        );
        assert_eq!(run("concat", vec![vec![], vec![]], json!({})).unwrap(), ResolvedValue::Absent);
    }

    #[test]
    fn aggregates_over_wildcard_inputs() {
        let (a, b, c) = (json!(10), json!("2.5"), json!(7.5));
        assert_eq!(
            run("sum", vec![vec![&a, &b, &c]], json!({})).unwrap(),
            ResolvedValue::Number(20.0)
        );
        let items = json!([1, 2, 3]);
        assert_eq!(run("count", vec![vec![&items]], json!({})).unwrap(), ResolvedValue::Number(3.0));
        assert_eq!(run("count", vec![vec![&a, &c]], json!({})).unwrap(), ResolvedValue::Number(2.0));
        assert_eq!(run("count", vec![vec![]], json!({})).unwrap(), ResolvedValue::Number(0.0));
    }

    #[test]
    fn default_and_yes_no() {
        assert_eq!(
            run("default", vec![vec![]], json!({ "value": "-" })).unwrap(),
            text("-")
        );
        let t = json!(true);
        let zero = json!(0);
        assert_eq!(run("yesNo", vec![vec![&t]], json!({})).unwrap(), text("Evet"));
        assert_eq!(run("yesNo", vec![vec![&zero]], json!({ "no": "Yok" })).unwrap(), text("Yok"));
    }
}
