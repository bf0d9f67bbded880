//! Typed paths into JSON business records.
//!
//! Mappings address record values with strings like `customer.name` or
//! `items[].unit_price`. They are parsed once into a [`PathExpr`] and then
//! evaluated with [`select`], which reports a missing value as
//! [`Selected::Absent`] instead of failing.

pub mod ast;
pub mod engine;
pub mod error;
mod parser;

// --- Public API ---
pub use ast::{PathExpr, PathSegment};
pub use engine::{Selected, select, select_one};
pub use error::JPathError;
pub use parser::parse_path;

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use std::str::FromStr;

impl FromStr for PathExpr {
    type Err = JPathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_path(s)
    }
}

impl Serialize for PathExpr {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PathExpr {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_path(&s).map_err(de::Error::custom)
    }
}
