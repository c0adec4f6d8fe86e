use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::classify::{MAX_SENSITIVITY, NEUTRAL_SENSITIVITY};
use crate::{Palette, catalog};

/// Analysis settings chosen by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProcessingOptions {
    pub board_color_key: String,
    pub finish_key: String,
    /// Reserved; no effect on analysis or rendering.
    pub dither: bool,
    /// 0 (strict) ..= 100 (loose). Clamped on construction and load.
    pub sensitivity: u8,
}

impl Default for ProcessingOptions {
    fn default() -> Self {
        Self {
            board_color_key: catalog::BOARD_COLORS[0].key.to_string(),
            finish_key: catalog::SURFACE_FINISHES[0].key.to_string(),
            dither: false,
            sensitivity: NEUTRAL_SENSITIVITY,
        }
    }
}

impl ProcessingOptions {
    pub fn new(
        board_color_key: impl Into<String>,
        finish_key: impl Into<String>,
        sensitivity: u8,
    ) -> Self {
        Self {
            board_color_key: board_color_key.into(),
            finish_key: finish_key.into(),
            dither: false,
            sensitivity: clamp_sensitivity(sensitivity),
        }
    }

    pub fn with_sensitivity(mut self, sensitivity: u8) -> Self {
        self.sensitivity = clamp_sensitivity(sensitivity);
        self
    }

    pub fn palette(&self) -> Palette {
        Palette::resolve(&self.board_color_key, &self.finish_key)
    }

    /// Whether switching from `self` to `other` invalidates a layer map.
    pub fn needs_reanalysis(&self, other: &ProcessingOptions) -> bool {
        self.board_color_key != other.board_color_key
            || self.finish_key != other.finish_key
            || self.sensitivity != other.sensitivity
    }

    /// Whether switching from `self` to `other` changes the palette.
    pub fn needs_repaint(&self, other: &ProcessingOptions) -> bool {
        self.board_color_key != other.board_color_key || self.finish_key != other.finish_key
    }

    pub fn save_json_file(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self).context("serialize options to json")?;
        fs::write(path.as_ref(), json).context("write options json file")?;
        Ok(())
    }

    pub fn load_json_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path.as_ref()).context("read options json file")?;
        let mut options =
            serde_json::from_str::<ProcessingOptions>(&text).context("parse options json")?;
        options.sensitivity = clamp_sensitivity(options.sensitivity);
        Ok(options)
    }
}

pub fn clamp_sensitivity(sensitivity: u8) -> u8 {
    sensitivity.min(MAX_SENSITIVITY)
}
