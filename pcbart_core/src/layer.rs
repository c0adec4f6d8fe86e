use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

use crate::{Color, Error};

/// The manufacturing stratum a pixel belongs to.
///
/// Discriminants are stable: they index [`CategoryMap`] and are the raw
/// labels stored in layer files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum LayerCategory {
    /// Exposed base material: mask opening, no copper.
    Substrate = 0,
    /// Mask over base material, no copper.
    Deep = 1,
    /// Mask over copper trace.
    Light = 2,
    /// Exposed copper carrying the surface finish.
    Pad = 3,
    /// Ink, topmost.
    Silkscreen = 4,
}

impl LayerCategory {
    pub const COUNT: usize = 5;

    /// All categories in discriminant order.
    pub const ALL: [LayerCategory; Self::COUNT] = [
        LayerCategory::Substrate,
        LayerCategory::Deep,
        LayerCategory::Light,
        LayerCategory::Pad,
        LayerCategory::Silkscreen,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn from_label(label: u8) -> Option<Self> {
        Self::ALL.get(label as usize).copied()
    }

    /// No solder-mask ink covers this category.
    pub fn is_mask_opening(self) -> bool {
        matches!(self, LayerCategory::Pad | LayerCategory::Substrate)
    }

    /// Copper lies beneath this category.
    pub fn has_copper(self) -> bool {
        matches!(self, LayerCategory::Pad | LayerCategory::Light)
    }

    /// Short name used by brush tools and edit scripts.
    pub fn tool_name(self) -> &'static str {
        match self {
            LayerCategory::Silkscreen => "silk",
            LayerCategory::Pad => "pad",
            LayerCategory::Light => "trace",
            LayerCategory::Deep => "mask",
            LayerCategory::Substrate => "substrate",
        }
    }

    /// Localized label shown on brush tool buttons.
    pub fn tool_label(self) -> &'static str {
        match self {
            LayerCategory::Silkscreen => "丝印",
            LayerCategory::Pad => "焊盘",
            LayerCategory::Light => "线路",
            LayerCategory::Deep => "阻焊",
            LayerCategory::Substrate => "基材",
        }
    }

    /// Fixed swatch for brush tool buttons. These are the green/gold
    /// defaults, not the resolved palette.
    pub fn swatch(self) -> Color {
        match self {
            LayerCategory::Silkscreen => Color::from_u32(0xffffff),
            LayerCategory::Pad => Color::from_u32(0xbf9a39),
            LayerCategory::Light => Color::from_u32(0x266f36),
            LayerCategory::Deep => Color::from_u32(0x16612e),
            LayerCategory::Substrate => Color::from_u32(0xa7a763),
        }
    }

    /// Accepts tool names, category names, or the numeric label.
    pub fn parse(text: &str) -> Option<Self> {
        let low = text.to_lowercase();
        match low.as_str() {
            "silk" | "silkscreen" => Some(LayerCategory::Silkscreen),
            "pad" => Some(LayerCategory::Pad),
            "trace" | "light" => Some(LayerCategory::Light),
            "mask" | "deep" => Some(LayerCategory::Deep),
            "substrate" => Some(LayerCategory::Substrate),
            _ => low.parse::<u8>().ok().and_then(Self::from_label),
        }
    }
}

impl From<LayerCategory> for u8 {
    fn from(category: LayerCategory) -> u8 {
        category as u8
    }
}

impl TryFrom<u8> for LayerCategory {
    type Error = Error;

    fn try_from(label: u8) -> Result<Self, Self::Error> {
        Self::from_label(label).ok_or(Error::InvalidLabel(label))
    }
}

/// A fixed table with one slot per [`LayerCategory`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CategoryMap<T>([T; LayerCategory::COUNT]);

impl<T> CategoryMap<T> {
    pub fn from_fn(mut f: impl FnMut(LayerCategory) -> T) -> Self {
        Self(LayerCategory::ALL.map(&mut f))
    }

    pub fn iter(&self) -> impl Iterator<Item = (LayerCategory, &T)> {
        LayerCategory::ALL.into_iter().zip(self.0.iter())
    }
}

impl<T> Index<LayerCategory> for CategoryMap<T> {
    type Output = T;

    fn index(&self, category: LayerCategory) -> &T {
        &self.0[category.index()]
    }
}

impl<T> IndexMut<LayerCategory> for CategoryMap<T> {
    fn index_mut(&mut self, category: LayerCategory) -> &mut T {
        &mut self.0[category.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_stable() {
        assert_eq!(u8::from(LayerCategory::Substrate), 0);
        assert_eq!(u8::from(LayerCategory::Deep), 1);
        assert_eq!(u8::from(LayerCategory::Light), 2);
        assert_eq!(u8::from(LayerCategory::Pad), 3);
        assert_eq!(u8::from(LayerCategory::Silkscreen), 4);
    }

    #[test]
    fn rejects_unknown_label() {
        assert!(matches!(
            LayerCategory::try_from(5),
            Err(Error::InvalidLabel(5))
        ));
    }

    #[test]
    fn parses_tool_names_and_numbers() {
        assert_eq!(LayerCategory::parse("PAD"), Some(LayerCategory::Pad));
        assert_eq!(LayerCategory::parse("trace"), Some(LayerCategory::Light));
        assert_eq!(LayerCategory::parse("1"), Some(LayerCategory::Deep));
        assert_eq!(LayerCategory::parse("9"), None);
        assert_eq!(LayerCategory::parse("ink"), None);
    }

    #[test]
    fn tool_buttons_have_labels_and_swatches() {
        assert_eq!(LayerCategory::Pad.tool_label(), "焊盘");
        assert_eq!(LayerCategory::Substrate.tool_label(), "基材");
        assert_eq!(LayerCategory::Silkscreen.swatch(), Color::WHITE);
        assert_eq!(LayerCategory::Pad.swatch().to_hex(), "#bf9a39");
        assert_eq!(LayerCategory::Light.swatch().to_hex(), "#266f36");
        assert_eq!(LayerCategory::Substrate.swatch(), crate::catalog::SUBSTRATE_COLOR);
    }

    #[test]
    fn derived_layer_membership() {
        let openings: Vec<_> = LayerCategory::ALL
            .into_iter()
            .filter(|c| c.is_mask_opening())
            .collect();
        let copper: Vec<_> = LayerCategory::ALL
            .into_iter()
            .filter(|c| c.has_copper())
            .collect();

        assert_eq!(openings, vec![LayerCategory::Substrate, LayerCategory::Pad]);
        assert_eq!(copper, vec![LayerCategory::Light, LayerCategory::Pad]);
    }

    #[test]
    fn category_map_indexes_by_variant() {
        let mut table = CategoryMap::from_fn(|c| c.index() * 10);
        table[LayerCategory::Pad] += 1;
        assert_eq!(table[LayerCategory::Pad], 31);
        assert_eq!(table[LayerCategory::Substrate], 0);
        assert_eq!(table.iter().count(), LayerCategory::COUNT);
    }
}
