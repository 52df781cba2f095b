//! The palette of named color groups days can be tagged with

use serde::{Deserialize, Serialize};

/// One group: a color and a display label.
///
/// The palette order is meaningful (the first item is the default brush color).
/// Color uniqueness is not enforced.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PaletteItem {
    pub color: String,
    #[serde(default)]
    pub label: String,
}

impl PaletteItem {
    pub fn new<C: Into<String>, L: Into<String>>(color: C, label: L) -> Self {
        Self { color: color.into(), label: label.into() }
    }
}

/// The fixed starter palette a fresh document gets
pub fn default_palette() -> Vec<PaletteItem> {
    vec![
        PaletteItem::new("#FFB3BA", ""),
        PaletteItem::new("#BFFCC6", ""),
        PaletteItem::new("#B3E5FC", ""),
        PaletteItem::new("#FFD180", ""),
    ]
}

/// The legacy `"palettes"` object older documents carry.
///
/// Two shapes exist in the wild: a bare list of colors, and a list of `{color, label}`
/// items. Both are folded into the canonical palette when a document is deserialized.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub(crate) struct LegacyPalettes {
    #[serde(default)]
    pub colors: Option<Vec<String>>,
    #[serde(default)]
    pub items: Option<Vec<PaletteItem>>,
}
