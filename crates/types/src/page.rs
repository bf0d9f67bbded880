use serde::{Deserialize, Deserializer, Serialize, Serializer, de, ser::SerializeMap};
use std::hash::{Hash, Hasher};

use crate::geometry::Size;

/// Physical page dimensions of a blank base surface.
///
/// Named sizes serialize as their name (`"A4"`), custom sizes as a
/// `{ "width": .., "height": .. }` map in points.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PageSize {
    #[default]
    A4,
    A5,
    Letter,
    Legal,
    Custom {
        width: f32,
        height: f32,
    },
}

impl Eq for PageSize {}

impl Hash for PageSize {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            PageSize::A4 => 0u8.hash(state),
            PageSize::A5 => 1u8.hash(state),
            PageSize::Letter => 2u8.hash(state),
            PageSize::Legal => 3u8.hash(state),
            PageSize::Custom { width, height } => {
                4u8.hash(state);
                width.to_bits().hash(state);
                height.to_bits().hash(state);
            }
        }
    }
}

impl PageSize {
    pub fn dimensions_pt(&self) -> (f32, f32) {
        match self {
            PageSize::A4 => (595.28, 841.89),
            PageSize::A5 => (419.53, 595.28),
            PageSize::Letter => (612.0, 792.0),
            PageSize::Legal => (612.0, 1008.0),
            PageSize::Custom { width, height } => (*width, *height),
        }
    }

    pub fn size(&self) -> Size {
        let (width, height) = self.dimensions_pt();
        Size::new(width, height)
    }

    fn name(&self) -> Option<&'static str> {
        match self {
            PageSize::A4 => Some("A4"),
            PageSize::A5 => Some("A5"),
            PageSize::Letter => Some("Letter"),
            PageSize::Legal => Some("Legal"),
            PageSize::Custom { .. } => None,
        }
    }

    fn parse(s: &str) -> Result<Self, String> {
        match s.to_ascii_lowercase().as_str() {
            "a4" => Ok(PageSize::A4),
            "a5" => Ok(PageSize::A5),
            "letter" => Ok(PageSize::Letter),
            "legal" => Ok(PageSize::Legal),
            _ => Err(format!("Unknown page size: {}", s)),
        }
    }
}

impl Serialize for PageSize {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if let PageSize::Custom { width, height } = self {
            let mut map = serializer.serialize_map(Some(2))?;
            map.serialize_entry("width", width)?;
            map.serialize_entry("height", height)?;
            return map.end();
        }
        serializer.serialize_str(self.name().unwrap_or_default())
    }
}

impl<'de> Deserialize<'de> for PageSize {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum PageSizeDef {
            Named(String),
            Custom { width: f32, height: f32 },
        }

        match PageSizeDef::deserialize(deserializer)? {
            PageSizeDef::Named(name) => PageSize::parse(&name).map_err(de::Error::custom),
            PageSizeDef::Custom { width, height } => {
                if !(width > 0.0 && height > 0.0) {
                    return Err(de::Error::custom(format!(
                        "page size must be positive, got {}x{}",
                        width, height
                    )));
                }
                Ok(PageSize::Custom { width, height })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_sizes_round_trip_by_name() {
        let json = serde_json::to_string(&PageSize::A4).unwrap();
        assert_eq!(json, "\"A4\"");
        let back: PageSize = serde_json::from_str("\"letter\"").unwrap();
        assert_eq!(back, PageSize::Letter);
    }

    #[test]
    fn custom_size_requires_positive_dimensions() {
        let custom: PageSize = serde_json::from_str(r#"{"width": 300, "height": 400}"#).unwrap();
        assert_eq!(custom.dimensions_pt(), (300.0, 400.0));
        assert!(serde_json::from_str::<PageSize>(r#"{"width": 0, "height": 400}"#).is_err());
        assert!(serde_json::from_str::<PageSize>("\"B7\"").is_err());
    }
}
