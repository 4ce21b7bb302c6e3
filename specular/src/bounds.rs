use crate::{Float, Ray, Vector};

/// One of the four axis-aligned border edges.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Edge {
    Left,
    Right,
    Top,
    Bottom,
}

/// An axis-aligned rectangle, used as the absorbing border of a 2D scene.
///
/// `Top` is the minimum-y edge and `Bottom` the maximum-y edge, matching a
/// y-down canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    pub min: Vector<2>,
    pub max: Vector<2>,
}

impl Bounds {
    #[inline]
    #[must_use]
    pub fn new(min: impl Into<Vector<2>>, max: impl Into<Vector<2>>) -> Self {
        Self {
            min: min.into(),
            max: max.into(),
        }
    }

    /// A rectangle spanning `(0, 0)` to `(width, height)`.
    #[inline]
    #[must_use]
    pub fn from_size(width: Float, height: Float) -> Self {
        Self::new([0.0, 0.0], [width, height])
    }

    #[inline]
    #[must_use]
    pub fn width(&self) -> Float {
        self.max.x - self.min.x
    }

    #[inline]
    #[must_use]
    pub fn height(&self) -> Float {
        self.max.y - self.min.y
    }

    #[inline]
    #[must_use]
    pub fn center(&self) -> Vector<2> {
        (self.min + self.max) * 0.5
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, p: &Vector<2>) -> bool {
        (self.min.x..=self.max.x).contains(&p.x) && (self.min.y..=self.max.y).contains(&p.y)
    }

    /// The rectangle shrunk by `margin` on every side.
    #[inline]
    #[must_use]
    pub fn inset(&self, margin: Float) -> Self {
        Self {
            min: Vector::<2>::new(self.min.x + margin, self.min.y + margin),
            max: Vector::<2>::new(self.max.x - margin, self.max.y - margin),
        }
    }

    /// The nearest positive-distance intersection of `ray` with the border.
    ///
    /// Each edge is a candidate only when the ray heads toward it, and only
    /// when the hit's perpendicular coordinate lies within the edge's extent
    /// (inclusive). Returns `None` for rays that never meet the rectangle.
    #[must_use]
    pub fn hit(&self, ray: &Ray<2>) -> Option<(Float, Edge)> {
        let o = &ray.origin;
        let d = ray.dir.as_ref();

        let mut best: Option<(Float, Edge)> = None;
        let mut consider = |t: Float, cross: Float, lo: Float, hi: Float, edge: Edge| {
            if t > 0.0
                && (lo..=hi).contains(&cross)
                && best.map_or(true, |(best_t, _)| best_t > t)
            {
                best = Some((t, edge));
            }
        };

        if d.x > 0.0 {
            let t = (self.max.x - o.x) / d.x;
            consider(t, o.y + d.y * t, self.min.y, self.max.y, Edge::Right);
        }
        if d.x < 0.0 {
            let t = (self.min.x - o.x) / d.x;
            consider(t, o.y + d.y * t, self.min.y, self.max.y, Edge::Left);
        }
        if d.y > 0.0 {
            let t = (self.max.y - o.y) / d.y;
            consider(t, o.x + d.x * t, self.min.x, self.max.x, Edge::Bottom);
        }
        if d.y < 0.0 {
            let t = (self.min.y - o.y) / d.y;
            consider(t, o.x + d.x * t, self.min.x, self.max.x, Edge::Top);
        }

        best
    }
}
