use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use sablon_types::ResourceUri;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Where an image field's pixels come from.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageRef {
    /// Loaded through the renderer's resource provider.
    Uri(ResourceUri),
    /// Decoded from a `data:` URI.
    Inline {
        media_type: String,
        data: Arc<Vec<u8>>,
    },
    /// Nothing resolved; the renderer leaves the box empty.
    Missing,
}

impl ImageRef {
    /// Builds a reference from a record string. Undecodable `data:` URIs
    /// become [`ImageRef::Missing`].
    pub fn from_uri(uri: &str) -> ImageRef {
        if uri.trim().is_empty() {
            return ImageRef::Missing;
        }
        if uri.starts_with("data:") {
            return match decode_data_uri(uri) {
                Some((media_type, data)) => ImageRef::Inline {
                    media_type,
                    data: Arc::new(data),
                },
                None => {
                    log::warn!("Ignoring malformed data URI for image");
                    ImageRef::Missing
                }
            };
        }
        ImageRef::Uri(ResourceUri::new(uri))
    }
}

/// Splits a `data:[<media type>][;base64],<payload>` URI into its media type
/// and decoded bytes.
pub fn decode_data_uri(uri: &str) -> Option<(String, Vec<u8>)> {
    let rest = uri.strip_prefix("data:")?;
    let (header, payload) = rest.split_once(',')?;
    let (media_type, is_base64) = match header.strip_suffix(";base64") {
        Some(media) => (media, true),
        None => (header, false),
    };
    let media_type = if media_type.is_empty() {
        "text/plain".to_string()
    } else {
        media_type.to_string()
    };
    let data = if is_base64 {
        STANDARD.decode(payload.trim()).ok()?
    } else {
        payload.as_bytes().to_vec()
    };
    Some((media_type, data))
}

/// A resolved table: formatted cell strings and the authoritative row count.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableValue {
    pub rows: Vec<Vec<String>>,
    pub row_count: usize,
}

impl TableValue {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        let row_count = rows.len();
        Self { rows, row_count }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum ResolvedValue {
    #[default]
    Absent,
    Text(String),
    Number(f64),
    Bool(bool),
    Image(ImageRef),
    Table(TableValue),
    /// A record object or array that fits no field kind as-is.
    Structured(Value),
}

impl ResolvedValue {
    /// Converts a record value. Arrays whose elements are all arrays become
    /// tables when `as_table` is set.
    pub fn from_json(value: &Value, as_table: bool) -> ResolvedValue {
        match value {
            Value::Null => ResolvedValue::Absent,
            Value::Bool(b) => ResolvedValue::Bool(*b),
            Value::Number(n) => n
                .as_f64()
                .map_or(ResolvedValue::Absent, ResolvedValue::Number),
            Value::String(s) => ResolvedValue::Text(s.clone()),
            Value::Array(rows) if as_table && rows.iter().all(Value::is_array) => {
                let rows = rows
                    .iter()
                    .filter_map(Value::as_array)
                    .map(|cells| cells.iter().map(json_display).collect())
                    .collect();
                ResolvedValue::Table(TableValue::new(rows))
            }
            other => ResolvedValue::Structured(other.clone()),
        }
    }

    /// True for values that leave a field blank.
    pub fn is_absent(&self) -> bool {
        matches!(
            self,
            ResolvedValue::Absent | ResolvedValue::Image(ImageRef::Missing)
        )
    }

    /// Short shape name used in type errors.
    pub fn shape(&self) -> &'static str {
        match self {
            ResolvedValue::Absent => "absent",
            ResolvedValue::Text(_) => "text",
            ResolvedValue::Number(_) => "number",
            ResolvedValue::Bool(_) => "boolean",
            ResolvedValue::Image(_) => "image",
            ResolvedValue::Table(_) => "table",
            ResolvedValue::Structured(Value::Array(_)) => "array",
            ResolvedValue::Structured(_) => "object",
        }
    }

    /// The text a scalar value prints as.
    pub fn display_text(&self) -> Option<String> {
        match self {
            ResolvedValue::Text(s) => Some(s.clone()),
            ResolvedValue::Number(n) => Some(format_plain_number(*n)),
            ResolvedValue::Bool(b) => Some(bool_text(*b).to_string()),
            _ => None,
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            ResolvedValue::Bool(b) => *b,
            ResolvedValue::Number(n) => *n != 0.0,
            ResolvedValue::Text(s) => is_truthy_text(s),
            _ => false,
        }
    }

    pub fn as_table(&self) -> Option<&TableValue> {
        match self {
            ResolvedValue::Table(t) => Some(t),
            _ => None,
        }
    }
}

pub(crate) fn bool_text(b: bool) -> &'static str {
    if b { "Evet" } else { "Hayır" }
}

pub(crate) fn is_truthy_text(s: &str) -> bool {
    let s = s.trim();
    !(s.is_empty() || s == "0" || s.eq_ignore_ascii_case("false") || s == "Hayır")
}

/// Integers print without a fractional part; everything else uses the
/// shortest round-tripping representation.
pub fn format_plain_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Cell text for a raw record value.
pub(crate) fn json_display(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => bool_text(*b).to_string(),
        Value::Number(n) => n.as_f64().map(format_plain_number).unwrap_or_default(),
        other => other.to_string(),
    }
}

/// The per-render map from field name to resolved value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedValues {
    values: BTreeMap<String, ResolvedValue>,
}

static ABSENT: ResolvedValue = ResolvedValue::Absent;

impl ResolvedValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, value: ResolvedValue) {
        self.values.insert(field.into(), value);
    }

    /// The value for `field`, or [`ResolvedValue::Absent`] when it has none.
    pub fn get(&self, field: &str) -> &ResolvedValue {
        self.values.get(field).unwrap_or(&ABSENT)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.values.contains_key(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ResolvedValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Row counts of every table value, keyed by field name.
    pub fn table_row_counts(&self) -> BTreeMap<String, usize> {
        self.values
            .iter()
            .filter_map(|(name, v)| v.as_table().map(|t| (name.clone(), t.row_count)))
            .collect()
    }
}

impl FromIterator<(String, ResolvedValue)> for ResolvedValues {
    fn from_iter<I: IntoIterator<Item = (String, ResolvedValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
