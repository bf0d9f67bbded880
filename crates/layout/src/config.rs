use serde::{Deserialize, Serialize};

/// Row heights used for variable-height tables whose style does not set its own.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutConfig {
    /// Height of the header row in points. Defaults to `18.0`.
    pub header_row_height: f32,
    /// Height of every data row in points. Defaults to `18.0`.
    pub data_row_height: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            header_row_height: 18.0,
            data_row_height: 18.0,
        }
    }
}
