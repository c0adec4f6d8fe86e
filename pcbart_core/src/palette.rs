use std::ops::Index;

use crate::catalog::{self, SILKSCREEN_NORMAL, SILKSCREEN_ON_WHITE, SUBSTRATE_COLOR, WHITE_BOARD_KEY};
use crate::{CategoryMap, Color, LayerCategory};

/// The five reference colors for one board/finish combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    colors: CategoryMap<Color>,
}

impl Palette {
    /// Resolve a palette from catalog keys. Unknown keys fall back to the
    /// first catalog entry.
    pub fn resolve(board_key: &str, finish_key: &str) -> Self {
        let board = catalog::board_color(board_key);
        let finish = catalog::surface_finish(finish_key);

        let silkscreen = if board_key == WHITE_BOARD_KEY {
            SILKSCREEN_ON_WHITE
        } else {
            SILKSCREEN_NORMAL
        };

        Self::from_fn(|category| match category {
            LayerCategory::Substrate => SUBSTRATE_COLOR,
            LayerCategory::Deep => board.deep,
            LayerCategory::Light => board.light,
            LayerCategory::Pad => finish.color,
            LayerCategory::Silkscreen => silkscreen,
        })
    }

    pub fn from_fn(f: impl FnMut(LayerCategory) -> Color) -> Self {
        Self {
            colors: CategoryMap::from_fn(f),
        }
    }

    pub fn color(&self, category: LayerCategory) -> Color {
        self.colors[category]
    }

    pub fn iter(&self) -> impl Iterator<Item = (LayerCategory, Color)> + '_ {
        self.colors.iter().map(|(c, &color)| (c, color))
    }
}

impl Index<LayerCategory> for Palette {
    type Output = Color;

    fn index(&self, category: LayerCategory) -> &Color {
        &self.colors[category]
    }
}
