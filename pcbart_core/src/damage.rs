//! Damaged pixel regions for partial re-rendering.

/// An axis-aligned pixel rectangle; `width`/`height` of zero is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Exclusive right edge.
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    /// Smallest rectangle containing both.
    pub fn union(&self, other: &Self) -> Self {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Self::new(
            x,
            y,
            self.right().max(other.right()) - x,
            self.bottom().max(other.bottom()) - y,
        )
    }

    /// Clip to a `width` x `height` canvas anchored at the origin.
    pub fn clamp_to(&self, width: u32, height: u32) -> Self {
        let x = self.x.min(width);
        let y = self.y.min(height);
        Self::new(
            x,
            y,
            self.right().min(width) - x,
            self.bottom().min(height) - y,
        )
    }
}

/// The part of the rendered layers that is stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Damage {
    /// Everything needs re-rendering.
    #[default]
    Full,
    /// Only this rectangle changed.
    Region(PixelRect),
    /// Nothing changed.
    None,
}

impl Damage {
    pub fn from_rect(rect: Option<PixelRect>) -> Self {
        match rect {
            Some(r) if !r.is_empty() => Self::Region(r),
            _ => Self::None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::None)
    }

    pub fn merge(&mut self, other: &Self) {
        *self = match (*self, *other) {
            (Self::Full, _) | (_, Self::Full) => Self::Full,
            (Self::None, o) => o,
            (s, Self::None) => s,
            (Self::Region(a), Self::Region(b)) => Self::Region(a.union(&b)),
        };
    }
}
