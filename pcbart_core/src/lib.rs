//! Classify photographs of printed-circuit boards into manufacturing layers,
//! render the layers, and hand-correct the result with a brush.
//!
//! Pipeline: [`SourceImage`] -> [`LayerMap::build`] (with a [`Palette`] from
//! [`ProcessingOptions`]) -> [`RenderedLayers::render`]. Brush edits change the
//! [`LayerMap`] and repaint only what they touched; they never reclassify.

pub mod brush;
pub mod catalog;
pub mod classify;
pub mod color;
pub mod damage;
pub mod editcmd;
pub mod layer;
pub mod layer_map;
pub mod options;
pub mod palette;
pub mod raster;
pub mod render;

mod error;
mod session;

pub use brush::{BrushState, Stroke};
pub use catalog::{BoardColorDef, SurfaceFinishDef};
pub use classify::{Classifier, classify};
pub use color::Color;
pub use damage::{Damage, PixelRect};
pub use error::{Error, Result};
pub use layer::{CategoryMap, LayerCategory};
pub use layer_map::{CancelToken, LayerMap};
pub use options::ProcessingOptions;
pub use palette::Palette;
pub use raster::{RgbaBuffer, SourceImage};
pub use render::RenderedLayers;
pub use session::Session;

/// Resolve the palette for a board/finish pair. Unknown keys fall back to
/// the first catalog entry.
pub fn resolve_palette(board_key: &str, finish_key: &str) -> Palette {
    Palette::resolve(board_key, finish_key)
}

/// Classify every pixel of `image`.
pub fn build_layer_map(image: &SourceImage, palette: &Palette, sensitivity: u8) -> LayerMap {
    LayerMap::build(image, palette, sensitivity)
}

/// Composite plus silkscreen, solder-mask-opening, and copper masks.
pub fn render(map: &LayerMap, palette: &Palette) -> RenderedLayers {
    RenderedLayers::render(map, palette)
}

/// Stamp a disc of `target` onto a copy of `map`.
pub fn paint(map: &LayerMap, cx: i64, cy: i64, radius: u32, target: LayerCategory) -> Stroke {
    brush::paint(map, cx, cy, radius, target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipeline_end_to_end() -> anyhow::Result<()> {
        let palette = resolve_palette("green", "gold");
        let gold = palette[LayerCategory::Pad];
        let white = palette[LayerCategory::Silkscreen];
        let image = SourceImage::new(2, 2, vec![gold, white, white, gold])?;

        let map = build_layer_map(&image, &palette, 50);
        assert_eq!(
            map.categories(),
            &[
                LayerCategory::Pad,
                LayerCategory::Silkscreen,
                LayerCategory::Silkscreen,
                LayerCategory::Pad
            ]
        );

        let stroke = paint(&map, 0, 0, 0, LayerCategory::Pad);
        assert!(!stroke.changed);
        assert_eq!(stroke.map, map);

        let out = render(&map, &palette);
        assert_eq!(out.composite.pixel(0, 0), Some([191, 154, 57, 255]));
        assert_eq!(out.silkscreen.pixel(1, 0), Some([255, 255, 255, 255]));
        assert_eq!(out.copper.pixel(1, 0), Some([255, 255, 255, 0]));
        Ok(())
    }
}
