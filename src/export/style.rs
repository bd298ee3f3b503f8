use serde::{Deserialize, Serialize};

/// Line weights that mean "by layer", "by block" and "default" in DXF.
pub const LINE_WEIGHT_SENTINELS: [i16; 3] = [-1, -2, -3];

/// Layer and pen applied to every exported line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerStyle {
    pub layer_name: String,
    /// AutoCAD color index, 1..=255.
    pub color: u8,
    /// Line weight in 1/100 mm, or one of [`LINE_WEIGHT_SENTINELS`].
    pub line_weight: i16,
}

impl Default for LayerStyle {
    fn default() -> Self {
        Self {
            layer_name: "LINES".to_string(),
            color: 7,
            line_weight: 25,
        }
    }
}

impl LayerStyle {
    pub fn is_valid_line_weight(weight: i16) -> bool {
        weight >= 0 || LINE_WEIGHT_SENTINELS.contains(&weight)
    }
}
