use tracing::{debug, info};

use crate::{
    BrushState, CancelToken, Damage, LayerMap, Palette, PixelRect, ProcessingOptions,
    RenderedLayers, Result, SourceImage,
};

/// Owns everything derived from one loaded image.
///
/// Edits always finish against the layer map before the rasters are
/// repainted, so `rendered()` never shows a half-applied stroke.
#[derive(Debug)]
pub struct Session {
    image: Option<SourceImage>,
    options: ProcessingOptions,
    palette: Palette,
    layers: LayerMap,
    rendered: RenderedLayers,
    pub brush: BrushState,
}

impl Session {
    /// Analyze `image` and render the result.
    pub fn new(image: SourceImage, options: ProcessingOptions) -> Self {
        let palette = options.palette();
        let layers = LayerMap::build(&image, &palette, options.sensitivity);
        info!(
            width = image.width(),
            height = image.height(),
            board = %options.board_color_key,
            finish = %options.finish_key,
            sensitivity = options.sensitivity,
            "analyzed image"
        );
        Self::assemble(Some(image), options, palette, layers)
    }

    /// Resume editing a saved layer map. There is no source image, so
    /// option changes recolor but never reclassify.
    pub fn from_layer_map(layers: LayerMap, options: ProcessingOptions) -> Self {
        let palette = options.palette();
        Self::assemble(None, options, palette, layers)
    }

    fn assemble(
        image: Option<SourceImage>,
        options: ProcessingOptions,
        palette: Palette,
        layers: LayerMap,
    ) -> Self {
        let rendered = RenderedLayers::render(&layers, &palette);
        Self {
            image,
            options,
            palette,
            layers,
            rendered,
            brush: BrushState::new(),
        }
    }

    pub fn options(&self) -> &ProcessingOptions {
        &self.options
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn layer_map(&self) -> &LayerMap {
        &self.layers
    }

    pub fn rendered(&self) -> &RenderedLayers {
        &self.rendered
    }

    /// Replace the source image; always reclassifies.
    pub fn load_image(&mut self, image: SourceImage) {
        let layers = LayerMap::build(&image, &self.palette, self.options.sensitivity);
        self.image = Some(image);
        self.commit_layers(layers);
    }

    /// Apply new options. Reclassifies only when board, finish, or
    /// sensitivity changed. Returns whether a reclassification happened.
    pub fn set_options(&mut self, options: ProcessingOptions) -> bool {
        let reanalyze = self.options.needs_reanalysis(&options) && self.image.is_some();
        let repaint = self.options.needs_repaint(&options);
        self.options = options;
        self.palette = self.options.palette();

        if reanalyze && let Some(image) = &self.image {
            let layers = LayerMap::build(image, &self.palette, self.options.sensitivity);
            self.commit_layers(layers);
        } else if repaint {
            self.rendered.repaint(&self.layers, &self.palette, &Damage::Full);
        }
        reanalyze
    }

    /// Like [`Session::set_options`], but the analysis can be abandoned.
    /// On [`crate::Error::Cancelled`] the session is unchanged.
    pub fn set_options_cancellable(
        &mut self,
        options: ProcessingOptions,
        cancel: &CancelToken,
    ) -> Result<bool> {
        let Some(image) = &self.image else {
            return Ok(self.set_options(options));
        };
        if !self.options.needs_reanalysis(&options) {
            return Ok(self.set_options(options));
        }

        let palette = options.palette();
        let layers = LayerMap::build_cancellable(image, &palette, options.sensitivity, cancel)?;

        self.options = options;
        self.palette = palette;
        self.commit_layers(layers);
        Ok(true)
    }

    /// Swap in an externally edited or loaded map.
    pub fn replace_layer_map(&mut self, layers: LayerMap) {
        self.commit_layers(layers);
    }

    fn commit_layers(&mut self, layers: LayerMap) {
        self.layers = layers;
        self.rendered = RenderedLayers::render(&self.layers, &self.palette);
        debug!(pixels = self.layers.len(), "layer map replaced");
    }

    /// Single stamp with the current brush. Returns whether anything changed.
    pub fn paint_at(&mut self, x: i64, y: i64) -> bool {
        let dirty = crate::brush::paint_in_place(
            &mut self.layers,
            x,
            y,
            self.brush.radius(),
            self.brush.category,
        );
        self.apply_damage(dirty)
    }

    /// Stamp along a segment with the current brush.
    pub fn paint_line(&mut self, from: (i64, i64), to: (i64, i64)) -> bool {
        let dirty = crate::brush::paint_line_in_place(
            &mut self.layers,
            from,
            to,
            self.brush.radius(),
            self.brush.category,
        );
        self.apply_damage(dirty)
    }

    pub fn pointer_down(&mut self, x: i64, y: i64) -> bool {
        let dirty = self.brush.begin(&mut self.layers, (x, y));
        self.apply_damage(dirty)
    }

    pub fn pointer_move(&mut self, x: i64, y: i64) -> bool {
        let dirty = self.brush.drag_to(&mut self.layers, (x, y));
        self.apply_damage(dirty)
    }

    pub fn pointer_up(&mut self) {
        self.brush.end();
    }

    fn apply_damage(&mut self, dirty: Option<PixelRect>) -> bool {
        let damage = Damage::from_rect(dirty);
        if damage.is_empty() {
            return false;
        }
        self.rendered.repaint(&self.layers, &self.palette, &damage);
        true
    }
}
