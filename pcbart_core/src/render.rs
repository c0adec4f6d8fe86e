//! Layer map to composite preview and per-layer masks.
//!
//! Masks are white everywhere; alpha is 255 where the layer is present and
//! 0 elsewhere. The composite is always opaque.

use rayon::prelude::*;
use tracing::{debug, trace};

use crate::{Damage, LayerCategory, LayerMap, Palette, PixelRect, RgbaBuffer};

const OPAQUE: u8 = 255;
const TRANSPARENT: u8 = 0;

/// The four rasters derived from one layer map.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RenderedLayers {
    /// Final visual appearance.
    pub composite: RgbaBuffer,
    /// Opaque where silkscreen ink is printed.
    pub silkscreen: RgbaBuffer,
    /// Opaque where the solder mask is open.
    pub solder_mask_opening: RgbaBuffer,
    /// Opaque where copper is present.
    pub copper: RgbaBuffer,
}

impl RenderedLayers {
    /// Render every pixel of `map`.
    pub fn render(map: &LayerMap, palette: &Palette) -> Self {
        let (w, h) = (map.width(), map.height());
        let mut layers = Self {
            composite: RgbaBuffer::new(w, h),
            silkscreen: RgbaBuffer::new(w, h),
            solder_mask_opening: RgbaBuffer::new(w, h),
            copper: RgbaBuffer::new(w, h),
        };
        layers.fill(map, palette, PixelRect::new(0, 0, w, h));
        debug!(width = w, height = h, "rendered layers");
        layers
    }

    /// Bring the rasters up to date with `map` after `damage`.
    ///
    /// The result is identical to a fresh [`RenderedLayers::render`] as long
    /// as `damage` covers every pixel that changed since the last render.
    pub fn repaint(&mut self, map: &LayerMap, palette: &Palette, damage: &Damage) {
        let resized = self.composite.width() != map.width()
            || self.composite.height() != map.height();

        match damage {
            Damage::None if !resized => {}
            Damage::Region(rect) if !resized => {
                let rect = rect.clamp_to(map.width(), map.height());
                trace!(?rect, "repainting region");
                self.fill(map, palette, rect);
            }
            _ => *self = Self::render(map, palette),
        }
    }

    /// Named outputs in export order.
    pub fn outputs(&self) -> [(&'static str, &RgbaBuffer); 4] {
        [
            ("composite", &self.composite),
            ("silkscreen", &self.silkscreen),
            ("soldermask", &self.solder_mask_opening),
            ("copper", &self.copper),
        ]
    }

    /// Single pass over `rect`, rows in parallel, one write per output.
    fn fill(&mut self, map: &LayerMap, palette: &Palette, rect: PixelRect) {
        if rect.is_empty() {
            return;
        }

        let width = map.width() as usize;
        let row_len = self.composite.row_len();
        let rows = rect.y as usize..rect.bottom() as usize;
        let bytes = rows.start * row_len..rows.end * row_len;
        let columns = rect.x as usize..rect.right() as usize;
        let labels = &map.categories()[rows.start * width..rows.end * width];

        self.composite.data_mut()[bytes.clone()]
            .par_chunks_mut(row_len)
            .zip(self.silkscreen.data_mut()[bytes.clone()].par_chunks_mut(row_len))
            .zip(self.solder_mask_opening.data_mut()[bytes.clone()].par_chunks_mut(row_len))
            .zip(self.copper.data_mut()[bytes].par_chunks_mut(row_len))
            .zip(labels.par_chunks(width))
            .for_each(|((((composite, silk), opening), copper), row)| {
                for x in columns.clone() {
                    let category = row[x];
                    let px = x * RgbaBuffer::CHANNELS..(x + 1) * RgbaBuffer::CHANNELS;

                    let color = palette[category];
                    composite[px.clone()].copy_from_slice(&[color.r, color.g, color.b, OPAQUE]);
                    silk[px.clone()]
                        .copy_from_slice(&mask_pixel(category == LayerCategory::Silkscreen));
                    opening[px.clone()].copy_from_slice(&mask_pixel(category.is_mask_opening()));
                    copper[px].copy_from_slice(&mask_pixel(category.has_copper()));
                }
            });
    }
}

fn mask_pixel(present: bool) -> [u8; 4] {
    let alpha = if present { OPAQUE } else { TRANSPARENT };
    [255, 255, 255, alpha]
}
