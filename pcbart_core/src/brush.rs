//! Circular brush stamps on a layer map.
//!
//! A stamp covers every pixel with `(x - cx)^2 + (y - cy)^2 <= r^2`, clipped
//! to the map. Out-of-bounds centers and oversized radii are not errors.

use tracing::trace;

use crate::{Damage, LayerCategory, LayerMap, PixelRect};

/// Quick-pick radii offered by brush toolbars.
pub const BRUSH_SIZES: [u32; 5] = [2, 5, 10, 20, 40];
pub const MIN_RADIUS: u32 = 1;
pub const MAX_RADIUS: u32 = 50;
pub const DEFAULT_RADIUS: u32 = 10;

/// Result of painting onto a copy of a layer map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stroke {
    pub map: LayerMap,
    /// At least one pixel changed category.
    pub changed: bool,
    pub damage: Damage,
}

/// Stamp `target` onto a copy of `map`; `map` itself is left untouched.
pub fn paint(map: &LayerMap, cx: i64, cy: i64, radius: u32, target: LayerCategory) -> Stroke {
    let mut map = map.clone();
    let dirty = paint_in_place(&mut map, cx, cy, radius, target);
    Stroke {
        map,
        changed: dirty.is_some(),
        damage: Damage::from_rect(dirty),
    }
}

/// Stamp `target` onto `map`, returning the bounds of the pixels that
/// actually changed.
pub fn paint_in_place(
    map: &mut LayerMap,
    cx: i64,
    cy: i64,
    radius: u32,
    target: LayerCategory,
) -> Option<PixelRect> {
    let (w, h) = (map.width() as i64, map.height() as i64);
    let r = radius as i64;
    // |dx|, |dy| <= r inside the clipped box, so the sum fits in i128.
    let r_sq = (r as i128).pow(2);

    let min_x = cx.saturating_sub(r).max(0);
    let max_x = cx.saturating_add(r).min(w - 1);
    let min_y = cy.saturating_sub(r).max(0);
    let max_y = cy.saturating_add(r).min(h - 1);

    let mut dirty: Option<PixelRect> = None;
    let labels = map.labels_mut();

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let (dx, dy) = ((x - cx) as i128, (y - cy) as i128);
            if dx * dx + dy * dy > r_sq {
                continue;
            }
            let idx = (y * w + x) as usize;
            if labels[idx] != target {
                labels[idx] = target;
                let px = PixelRect::new(x as u32, y as u32, 1, 1);
                dirty = Some(dirty.map_or(px, |d| d.union(&px)));
            }
        }
    }

    trace!(cx, cy, radius, ?target, changed = dirty.is_some(), "brush stamp");
    dirty
}

/// Stamp along the segment `from -> to`, one stamp per pixel step, as a
/// pointer drag would. Only the part of the segment whose stamps can reach
/// the map is walked.
pub fn paint_line_in_place(
    map: &mut LayerMap,
    from: (i64, i64),
    to: (i64, i64),
    radius: u32,
    target: LayerCategory,
) -> Option<PixelRect> {
    if map.is_empty() {
        return None;
    }
    let reach = radius as f64;
    let (w, h) = (map.width() as f64, map.height() as f64);
    let (from, to) = clip_segment(
        from,
        to,
        (-reach, -reach),
        (w - 1.0 + reach, h - 1.0 + reach),
    )?;

    let mut dirty: Option<PixelRect> = None;
    for (x, y) in line_points(from, to) {
        if let Some(rect) = paint_in_place(map, x, y, radius, target) {
            dirty = Some(dirty.map_or(rect, |d| d.union(&rect)));
        }
        if covers_map(map, x, y, radius) {
            break;
        }
    }
    dirty
}

/// Copying variant of [`paint_line_in_place`].
pub fn paint_line(
    map: &LayerMap,
    from: (i64, i64),
    to: (i64, i64),
    radius: u32,
    target: LayerCategory,
) -> Stroke {
    let mut map = map.clone();
    let dirty = paint_line_in_place(&mut map, from, to, radius, target);
    Stroke {
        map,
        changed: dirty.is_some(),
        damage: Damage::from_rect(dirty),
    }
}

/// Evenly spaced integer points from `from` to `to`, both included.
fn line_points(from: (i64, i64), to: (i64, i64)) -> impl Iterator<Item = (i64, i64)> {
    let (dx, dy) = (
        to.0 as i128 - from.0 as i128,
        to.1 as i128 - from.1 as i128,
    );
    let steps = dx.unsigned_abs().max(dy.unsigned_abs());
    (0..=steps).map(move |i| {
        if steps == 0 {
            return from;
        }
        let t = i as f64 / steps as f64;
        (
            (from.0 as f64 + dx as f64 * t).round() as i64,
            (from.1 as f64 + dy as f64 * t).round() as i64,
        )
    })
}

/// Liang-Barsky clip of `from -> to` against the inclusive box `min..=max`.
/// Endpoints already inside the box are returned unchanged; clipped ones sit
/// exactly on the boundary they were clipped against.
fn clip_segment(
    from: (i64, i64),
    to: (i64, i64),
    min: (f64, f64),
    max: (f64, f64),
) -> Option<((i64, i64), (i64, i64))> {
    let (x0, y0) = (from.0 as f64, from.1 as f64);
    let (dx, dy) = (to.0 as f64 - x0, to.1 as f64 - y0);
    let (mut t0, mut t1) = (0.0f64, 1.0f64);
    // (is_x_axis, boundary) that last moved each end.
    let mut enter: Option<(bool, f64)> = None;
    let mut exit: Option<(bool, f64)> = None;

    for (p, q, is_x, bound) in [
        (-dx, x0 - min.0, true, min.0),
        (dx, max.0 - x0, true, max.0),
        (-dy, y0 - min.1, false, min.1),
        (dy, max.1 - y0, false, max.1),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 && t > t0 {
            t0 = t;
            enter = Some((is_x, bound));
        } else if p > 0.0 && t < t1 {
            t1 = t;
            exit = Some((is_x, bound));
        }
    }
    if t0 > t1 {
        return None;
    }

    let snap = |t: f64, edge: Option<(bool, f64)>, end: (i64, i64)| match edge {
        None => end,
        Some((is_x, bound)) => {
            let (x, y) = ((x0 + dx * t).round() as i64, (y0 + dy * t).round() as i64);
            if is_x {
                (bound as i64, y)
            } else {
                (x, bound as i64)
            }
        }
    };
    Some((snap(t0, enter, from), snap(t1, exit, to)))
}

/// The disc at `(cx, cy)` contains every pixel of `map`.
fn covers_map(map: &LayerMap, cx: i64, cy: i64, radius: u32) -> bool {
    let r_sq = (radius as i128).pow(2);
    let (w, h) = (map.width() as i128, map.height() as i128);
    [(0, 0), (w - 1, 0), (0, h - 1), (w - 1, h - 1)]
        .into_iter()
        .all(|(x, y)| {
            let (dx, dy) = (x - cx as i128, y - cy as i128);
            dx * dx + dy * dy <= r_sq
        })
}

/// Transient brush session state: tool, size, and the pointer while drawing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrushState {
    pub category: LayerCategory,
    radius: u32,
    last_point: Option<(i64, i64)>,
}

impl Default for BrushState {
    fn default() -> Self {
        Self {
            category: LayerCategory::Pad,
            radius: DEFAULT_RADIUS,
            last_point: None,
        }
    }
}

impl BrushState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn radius(&self) -> u32 {
        self.radius
    }

    pub fn set_radius(&mut self, radius: u32) {
        self.radius = radius.clamp(MIN_RADIUS, MAX_RADIUS);
    }

    pub fn is_drawing(&self) -> bool {
        self.last_point.is_some()
    }

    /// Pointer down: stamps at `point`.
    pub fn begin(&mut self, map: &mut LayerMap, point: (i64, i64)) -> Option<PixelRect> {
        self.last_point = Some(point);
        paint_in_place(map, point.0, point.1, self.radius, self.category)
    }

    /// Pointer move: stamps from the previous point. Ignored unless drawing.
    pub fn drag_to(&mut self, map: &mut LayerMap, point: (i64, i64)) -> Option<PixelRect> {
        let from = self.last_point?;
        self.last_point = Some(point);
        paint_line_in_place(map, from, point, self.radius, self.category)
    }

    /// Pointer up or leave.
    pub fn end(&mut self) {
        self.last_point = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stamp_is_a_disc() {
        let map = LayerMap::filled(9, 9, LayerCategory::Deep);
        let stroke = paint(&map, 4, 4, 2, LayerCategory::Pad);

        assert!(stroke.changed);
        for y in 0..9u32 {
            for x in 0..9u32 {
                let (dx, dy) = (x as i64 - 4, y as i64 - 4);
                let expected = if dx * dx + dy * dy <= 4 {
                    LayerCategory::Pad
                } else {
                    LayerCategory::Deep
                };
                assert_eq!(stroke.map.get(x, y), Some(expected), "({x}, {y})");
            }
        }
        assert_eq!(stroke.damage, Damage::Region(PixelRect::new(2, 2, 5, 5)));
    }

    #[test]
    fn input_map_is_untouched() {
        let map = LayerMap::filled(4, 4, LayerCategory::Deep);
        let stroke = paint(&map, 1, 1, 1, LayerCategory::Silkscreen);
        assert!(stroke.changed);
        assert_eq!(map, LayerMap::filled(4, 4, LayerCategory::Deep));
    }

    #[test]
    fn repainting_same_category_is_no_op() {
        let map = LayerMap::filled(6, 6, LayerCategory::Light);
        let stroke = paint(&map, 3, 3, 4, LayerCategory::Light);
        assert!(!stroke.changed);
        assert!(stroke.damage.is_empty());
        assert_eq!(stroke.map, map);
    }

    #[test]
    fn out_of_bounds_center_is_clipped() {
        let map = LayerMap::filled(4, 4, LayerCategory::Deep);

        let corner = paint(&map, -1, 0, 1, LayerCategory::Pad);
        assert_eq!(corner.map.get(0, 0), Some(LayerCategory::Pad));
        assert_eq!(corner.map.histogram()[LayerCategory::Pad], 1);

        let far = paint(&map, 100, -50, 3, LayerCategory::Pad);
        assert!(!far.changed);

        let huge = paint(&map, 2, 2, 1000, LayerCategory::Pad);
        assert_eq!(huge.map, LayerMap::filled(4, 4, LayerCategory::Pad));
    }

    #[test]
    fn empty_map_is_fine() {
        let map = LayerMap::filled(0, 0, LayerCategory::Deep);
        assert!(!paint(&map, 0, 0, 5, LayerCategory::Pad).changed);
    }

    #[test]
    fn zero_radius_paints_center_only() {
        let map = LayerMap::filled(3, 3, LayerCategory::Deep);
        let stroke = paint(&map, 1, 1, 0, LayerCategory::Substrate);
        assert_eq!(stroke.map.histogram()[LayerCategory::Substrate], 1);
    }

    #[test]
    fn line_covers_every_step() {
        let map = LayerMap::filled(10, 3, LayerCategory::Deep);
        let stroke = paint_line(&map, (0, 1), (9, 1), 0, LayerCategory::Light);
        for x in 0..10 {
            assert_eq!(stroke.map.get(x, 1), Some(LayerCategory::Light));
        }
        assert_eq!(stroke.map.histogram()[LayerCategory::Light], 10);
        assert_eq!(stroke.damage, Damage::Region(PixelRect::new(0, 1, 10, 1)));
    }

    #[test]
    fn huge_radius_fills_without_overflow() {
        let map = LayerMap::filled(4, 4, LayerCategory::Deep);
        let all = paint(&map, 1, 1, u32::MAX, LayerCategory::Pad);
        assert_eq!(all.map, LayerMap::filled(4, 4, LayerCategory::Pad));

        let far = paint(&map, -3_000_000_000, 0, 3_100_000_000, LayerCategory::Pad);
        assert_eq!(far.map, LayerMap::filled(4, 4, LayerCategory::Pad));

        let edge = paint(&map, i64::MIN, i64::MAX, u32::MAX, LayerCategory::Pad);
        assert!(!edge.changed);
    }

    #[test]
    fn extreme_line_endpoints_are_clipped() {
        let map = LayerMap::filled(5, 3, LayerCategory::Deep);
        let stroke = paint_line(&map, (i64::MIN, 1), (i64::MAX, 1), 0, LayerCategory::Pad);
        for x in 0..5 {
            assert_eq!(stroke.map.get(x, 1), Some(LayerCategory::Pad));
        }
        assert_eq!(stroke.map.histogram()[LayerCategory::Pad], 5);

        let diagonal = paint_line(
            &map,
            (i64::MIN, i64::MIN),
            (i64::MAX, i64::MAX),
            1,
            LayerCategory::Pad,
        );
        assert!(diagonal.changed);
    }

    #[test]
    fn long_off_canvas_line_only_walks_the_canvas() {
        let map = LayerMap::filled(6, 2, LayerCategory::Deep);
        let stroke = paint_line(&map, (0, 0), (100_000_000_000, 0), 0, LayerCategory::Light);
        assert_eq!(stroke.map.histogram()[LayerCategory::Light], 6);
        assert_eq!(stroke.damage, Damage::Region(PixelRect::new(0, 0, 6, 1)));

        let missed = paint_line(
            &map,
            (0, 50),
            (100_000_000_000, 50),
            3,
            LayerCategory::Light,
        );
        assert!(!missed.changed);
    }

    #[test]
    fn clip_keeps_inner_endpoints() {
        let inside = clip_segment((1, 2), (3, 4), (0.0, 0.0), (9.0, 9.0));
        assert_eq!(inside, Some(((1, 2), (3, 4))));
        assert_eq!(
            clip_segment((-10, 5), (20, 5), (0.0, 0.0), (9.0, 9.0)),
            Some(((0, 5), (9, 5)))
        );
        assert_eq!(
            clip_segment((-10, 20), (20, 20), (0.0, 0.0), (9.0, 9.0)),
            None
        );
    }

    #[test]
    fn line_points_include_endpoints() {
        let pts: Vec<_> = line_points((0, 0), (3, -2)).collect();
        assert_eq!(pts.first(), Some(&(0, 0)));
        assert_eq!(pts.last(), Some(&(3, -2)));
        assert_eq!(pts.len(), 4);
        assert_eq!(line_points((5, 5), (5, 5)).collect::<Vec<_>>(), vec![(5, 5)]);
    }

    #[test]
    fn brush_state_drag_composes_stamps() {
        let mut map = LayerMap::filled(8, 8, LayerCategory::Deep);
        let mut brush = BrushState::new();
        brush.set_radius(1);
        brush.category = LayerCategory::Silkscreen;

        assert!(brush.drag_to(&mut map, (3, 3)).is_none());
        assert!(brush.begin(&mut map, (1, 1)).is_some());
        assert!(brush.is_drawing());
        assert!(brush.drag_to(&mut map, (6, 1)).is_some());
        brush.end();
        assert!(!brush.is_drawing());

        for x in 1..=6 {
            assert_eq!(map.get(x, 1), Some(LayerCategory::Silkscreen));
        }
    }

    #[test]
    fn radius_is_clamped() {
        let mut brush = BrushState::new();
        assert_eq!(brush.radius(), DEFAULT_RADIUS);
        brush.set_radius(0);
        assert_eq!(brush.radius(), MIN_RADIUS);
        brush.set_radius(500);
        assert_eq!(brush.radius(), MAX_RADIUS);
    }
}
