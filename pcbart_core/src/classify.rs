//! Biased nearest-color classification of pixels into layer categories.
//!
//! Each category's squared distance is scaled by a bias. Biases above 1.0
//! are penalties (Pad), below 1.0 are bonuses (Light, Deep). Sensitivity
//! 0..=100 reshapes them around the neutral value 50:
//!
//! - penalty: `max(1.0, 1.0 + (base - 1.0) * (2 - s))`
//! - bonus:   `max(0.1, 1.0 - (1.0 - base) * s)`
//!
//! where `s = sensitivity / 50`. Sensitivity must be clamped to 0..=100 by
//! the caller; nothing here validates it.

use crate::{CategoryMap, Color, LayerCategory, Palette};

pub const MAX_SENSITIVITY: u8 = 100;
pub const NEUTRAL_SENSITIVITY: u8 = 50;

/// Categories are scored in this order; the first minimum wins ties.
pub const EVALUATION_ORDER: [LayerCategory; LayerCategory::COUNT] = [
    LayerCategory::Silkscreen,
    LayerCategory::Pad,
    LayerCategory::Light,
    LayerCategory::Deep,
    LayerCategory::Substrate,
];

const MIN_PENALTY: f64 = 1.0;
const MIN_BONUS: f64 = 0.1;

/// Unadjusted bias of a category.
pub const fn base_bias(category: LayerCategory) -> f64 {
    match category {
        LayerCategory::Silkscreen => 1.0,
        LayerCategory::Pad => 1.5,
        LayerCategory::Light => 0.6,
        LayerCategory::Deep => 0.8,
        LayerCategory::Substrate => 1.0,
    }
}

/// Reshape a base bias for the given sensitivity.
pub fn adjusted_bias(base: f64, sensitivity: u8) -> f64 {
    let s = sensitivity as f64 / NEUTRAL_SENSITIVITY as f64;

    if base > 1.0 {
        (1.0 + (base - 1.0) * (2.0 - s)).max(MIN_PENALTY)
    } else if base < 1.0 {
        (1.0 - (1.0 - base) * s).max(MIN_BONUS)
    } else {
        base
    }
}

/// Per-category biases for one sensitivity setting, computed once per pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classifier {
    biases: CategoryMap<f64>,
}

impl Classifier {
    pub fn new(sensitivity: u8) -> Self {
        Self {
            biases: CategoryMap::from_fn(|c| adjusted_bias(base_bias(c), sensitivity)),
        }
    }

    pub fn bias(&self, category: LayerCategory) -> f64 {
        self.biases[category]
    }

    pub fn score(&self, pixel: Color, palette: &Palette, category: LayerCategory) -> f64 {
        pixel.distance_sq(palette[category]) * self.biases[category]
    }

    pub fn classify(&self, pixel: Color, palette: &Palette) -> LayerCategory {
        let mut best = EVALUATION_ORDER[0];
        let mut best_score = f64::INFINITY;

        for category in EVALUATION_ORDER {
            let score = self.score(pixel, palette, category);
            if score < best_score {
                best_score = score;
                best = category;
            }
        }

        best
    }
}

/// Classify one pixel. Prefer [`Classifier`] when classifying many pixels.
pub fn classify(pixel: Color, palette: &Palette, sensitivity: u8) -> LayerCategory {
    Classifier::new(sensitivity).classify(pixel, palette)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_classify(pixel: Color, palette: &Palette) -> LayerCategory {
        EVALUATION_ORDER
            .iter()
            .copied()
            .fold((LayerCategory::Silkscreen, f64::INFINITY), |(best, min), c| {
                let d = pixel.distance_sq(palette[c]) * base_bias(c);
                if d < min { (c, d) } else { (best, min) }
            })
            .0
    }

    #[test]
    fn neutral_sensitivity_uses_base_biases() {
        for category in LayerCategory::ALL {
            assert_eq!(
                adjusted_bias(base_bias(category), NEUTRAL_SENSITIVITY),
                base_bias(category)
            );
        }
    }

    #[test]
    fn neutral_matches_brute_force_reference() {
        let classifier = Classifier::new(NEUTRAL_SENSITIVITY);
        for board in ["green", "blue", "white", "black", "copper"] {
            for finish in ["gold", "silver"] {
                let palette = Palette::resolve(board, finish);
                for r in (0..=255u8).step_by(17) {
                    for g in (0..=255u8).step_by(17) {
                        for b in (0..=255u8).step_by(17) {
                            let px = Color::rgb(r, g, b);
                            assert_eq!(
                                classifier.classify(px, &palette),
                                reference_classify(px, &palette),
                                "{board}/{finish} at {px}"
                            );
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn pad_penalty_shrinks_with_sensitivity() {
        let mut prev = f64::INFINITY;
        for s in 0..=MAX_SENSITIVITY {
            let bias = Classifier::new(s).bias(LayerCategory::Pad);
            assert!(bias <= prev, "pad bias rose at sensitivity {s}");
            assert!(bias >= 1.0);
            prev = bias;
        }
        assert_eq!(Classifier::new(0).bias(LayerCategory::Pad), 2.0);
        assert_eq!(Classifier::new(100).bias(LayerCategory::Pad), 1.0);
    }

    #[test]
    fn light_bonus_strengthens_with_sensitivity() {
        let mut prev = f64::INFINITY;
        for s in 0..=MAX_SENSITIVITY {
            let bias = Classifier::new(s).bias(LayerCategory::Light);
            assert!(bias <= prev, "light bias rose at sensitivity {s}");
            assert!(bias >= 0.1);
            prev = bias;
        }
        assert_eq!(Classifier::new(0).bias(LayerCategory::Light), 1.0);
        assert!((Classifier::new(100).bias(LayerCategory::Light) - 0.2).abs() < 1e-12);
    }

    #[test]
    fn neutral_categories_ignore_sensitivity() {
        for s in [0, 25, 50, 75, 100] {
            let c = Classifier::new(s);
            assert_eq!(c.bias(LayerCategory::Silkscreen), 1.0);
            assert_eq!(c.bias(LayerCategory::Substrate), 1.0);
        }
    }

    #[test]
    fn bonus_floor_applies_past_range() {
        // 255 / 50 = 5.1; 1 - 0.4 * 5.1 is negative
        assert_eq!(adjusted_bias(0.6, 255), 0.1);
    }

    #[test]
    fn exact_gold_is_pad() {
        let palette = Palette::resolve("green", "gold");
        assert_eq!(
            classify(Color::rgb(191, 154, 57), &palette, 50),
            LayerCategory::Pad
        );
    }

    #[test]
    fn exact_palette_colors_classify_to_themselves() {
        let palette = Palette::resolve("red", "silver");
        for s in [0, 50, 100] {
            for (category, color) in palette.iter() {
                assert_eq!(classify(color, &palette, s), category);
            }
        }
    }

    #[test]
    fn ties_go_to_first_evaluated() {
        // Silkscreen and Substrate share color and bias, Silkscreen is scored first.
        let palette = Palette::from_fn(|c| match c {
            LayerCategory::Silkscreen | LayerCategory::Substrate => Color::rgb(100, 100, 100),
            _ => Color::rgb(0, 0, 255),
        });
        assert_eq!(
            classify(Color::rgb(110, 100, 100), &palette, 50),
            LayerCategory::Silkscreen
        );
    }
}
