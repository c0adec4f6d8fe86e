use anyhow::Context;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

use crate::raster::pixel_count;
use crate::{CategoryMap, Classifier, Error, LayerCategory, Palette, Result, SourceImage};

/// Cooperative cancellation flag for a running analysis.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// One layer label per pixel, row-major.
///
/// Index `p` is pixel `(p % width, p / width)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawLayerMap", into = "RawLayerMap")]
pub struct LayerMap {
    width: u32,
    height: u32,
    labels: Vec<LayerCategory>,
}

/// On-disk shape: dimensions plus raw labels.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawLayerMap {
    width: u32,
    height: u32,
    labels: Vec<u8>,
}

impl LayerMap {
    pub fn filled(width: u32, height: u32, category: LayerCategory) -> Self {
        Self {
            width,
            height,
            labels: vec![category; pixel_count(width, height)],
        }
    }

    pub fn from_labels(width: u32, height: u32, labels: &[u8]) -> Result<Self> {
        let expected = pixel_count(width, height);
        if labels.len() != expected {
            return Err(Error::LabelCountMismatch {
                expected,
                actual: labels.len(),
            });
        }
        let labels = labels
            .iter()
            .map(|&l| LayerCategory::try_from(l))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            width,
            height,
            labels,
        })
    }

    /// Classify every pixel of `image`.
    pub fn build(image: &SourceImage, palette: &Palette, sensitivity: u8) -> Self {
        let mut map = Self::filled(image.width(), image.height(), LayerCategory::Substrate);
        map.classify_rows(image, palette, sensitivity, || true);
        map
    }

    /// Like [`LayerMap::build`], but gives up with [`Error::Cancelled`] once
    /// `cancel` is set. Partial results are dropped.
    pub fn build_cancellable(
        image: &SourceImage,
        palette: &Palette,
        sensitivity: u8,
        cancel: &CancelToken,
    ) -> Result<Self> {
        let mut map = Self::filled(image.width(), image.height(), LayerCategory::Substrate);
        let finished = map.classify_rows(image, palette, sensitivity, || !cancel.is_cancelled());
        if !finished || cancel.is_cancelled() {
            debug!("layer map analysis cancelled");
            return Err(Error::Cancelled);
        }
        Ok(map)
    }

    /// Rows are classified in parallel into disjoint slices of `labels`.
    /// Returns false if `keep_going` stopped the pass early.
    fn classify_rows(
        &mut self,
        image: &SourceImage,
        palette: &Palette,
        sensitivity: u8,
        keep_going: impl Fn() -> bool + Sync,
    ) -> bool {
        if self.is_empty() {
            return true;
        }

        let classifier = Classifier::new(sensitivity);
        let width = image.width() as usize;

        let finished = self
            .labels
            .par_chunks_mut(width)
            .zip(image.pixels().par_chunks(width))
            .try_for_each(|(out, row)| {
                if !keep_going() {
                    return None;
                }
                for (slot, &px) in out.iter_mut().zip(row) {
                    *slot = classifier.classify(px, palette);
                }
                Some(())
            })
            .is_some();

        debug!(
            width = image.width(),
            height = image.height(),
            sensitivity,
            finished,
            "classified layer map"
        );
        finished
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn categories(&self) -> &[LayerCategory] {
        &self.labels
    }

    pub fn get(&self, x: u32, y: u32) -> Option<LayerCategory> {
        self.index_of(x, y).map(|i| self.labels[i])
    }

    pub fn to_label_bytes(&self) -> Vec<u8> {
        self.labels.iter().map(|&c| c.into()).collect()
    }

    /// Pixel count per category.
    pub fn histogram(&self) -> CategoryMap<usize> {
        let mut counts = CategoryMap::default();
        for &c in &self.labels {
            counts[c] += 1;
        }
        counts
    }

    pub fn save_json_file(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let json = serde_json::to_string(self).context("serialize layer map to json")?;
        fs::write(path.as_ref(), json).context("write layer map file")?;
        Ok(())
    }

    pub fn load_json_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path.as_ref()).context("read layer map file")?;
        let map = serde_json::from_str::<LayerMap>(&text).context("parse layer map json")?;
        Ok(map)
    }

    pub(crate) fn index_of(&self, x: u32, y: u32) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    pub(crate) fn labels_mut(&mut self) -> &mut [LayerCategory] {
        &mut self.labels
    }
}

impl TryFrom<RawLayerMap> for LayerMap {
    type Error = Error;

    fn try_from(raw: RawLayerMap) -> Result<Self> {
        Self::from_labels(raw.width, raw.height, &raw.labels)
    }
}

impl From<LayerMap> for RawLayerMap {
    fn from(map: LayerMap) -> Self {
        Self {
            width: map.width,
            height: map.height,
            labels: map.to_label_bytes(),
        }
    }
}
