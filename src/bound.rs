use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in screen pixels.
///
/// Buffering may push `xmin` past `xmax` (or `ymin` past `ymax`) when a
/// negative buffer is larger than the span; such inverted ranges are kept as
/// they are and the overlap test below remains symmetric for them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bound {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
}

impl Bound {
    pub fn new(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Self {
        Self {
            xmin,
            ymin,
            xmax,
            ymax,
        }
    }

    pub fn from_center(cx: f64, cy: f64, width: f64, height: f64) -> Self {
        Self::new(
            cx - width / 2.0,
            cy - height / 2.0,
            cx + width / 2.0,
            cy + height / 2.0,
        )
    }

    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }

    pub fn center(&self) -> (f64, f64) {
        (
            (self.xmin + self.xmax) / 2.0,
            (self.ymin + self.ymax) / 2.0,
        )
    }

    /// Expands every edge outward by `px`, in place.
    pub fn buffer(&mut self, px: f64) -> &mut Self {
        self.xmin -= px;
        self.ymin -= px;
        self.xmax += px;
        self.ymax += px;
        self
    }

    pub fn buffered(mut self, px: f64) -> Self {
        self.buffer(px);
        self
    }

    /// Returns true when the rectangles overlap. Edges that exactly touch
    /// count as overlapping.
    pub fn intersect(&self, other: &Bound) -> bool {
        !(self.xmax < other.xmin
            || self.xmin > other.xmax
            || self.ymax < other.ymin
            || self.ymin > other.ymax)
    }

    pub fn intersects_any(&self, others: &[Bound]) -> bool {
        others.iter().any(|other| self.intersect(other))
    }

    pub fn is_finite(&self) -> bool {
        self.xmin.is_finite() && self.ymin.is_finite() && self.xmax.is_finite() && self.ymax.is_finite()
    }

    pub fn to_array(&self) -> [f64; 4] {
        [self.xmin, self.ymin, self.xmax, self.ymax]
    }
}
