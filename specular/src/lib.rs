pub use nalgebra;

use nalgebra::{SVector, Unit};

mod angle;
mod bounds;
mod trace;

pub use angle::Angle;
pub use bounds::{Bounds, Edge};
pub use trace::{trace, RayPath, Termination, Trace, TraceSettings};

pub type Float = f64;
pub type Vector<const D: usize> = SVector<Float, D>;
pub type UnitVector<const D: usize> = Unit<SVector<Float, D>>;

/// Orthogonally reflect the unit vector `v` off a surface with unit normal `n`:
/// `v - 2(v.n)n`.
#[inline]
#[must_use]
pub fn reflect<const D: usize>(v: &UnitVector<D>, n: &UnitVector<D>) -> UnitVector<D> {
    let (v, n) = (v.as_ref(), n.as_ref());
    // orthogonal symmetry preserves the norm
    Unit::new_unchecked(v - 2.0 * v.dot(n) * n)
}

/// A light ray, represented as a half-line.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ray<const D: usize> {
    /// The starting point of the half-line
    pub origin: Vector<D>,
    /// The direction of the half-line
    pub dir: UnitVector<D>,
}

impl<const D: usize> Ray<D> {
    /// # Panics
    ///
    /// If `dir` is the zero vector.
    #[inline]
    #[must_use]
    pub fn new(origin: impl Into<Vector<D>>, dir: impl Into<Vector<D>>) -> Self {
        Self::try_new(origin, dir).expect("direction must be non-zero")
    }

    /// Returns `None` if `dir` is the zero vector.
    #[inline]
    #[must_use]
    pub fn try_new(origin: impl Into<Vector<D>>, dir: impl Into<Vector<D>>) -> Option<Self> {
        Unit::try_new(dir.into(), Float::EPSILON).map(|dir| Self {
            origin: origin.into(),
            dir,
        })
    }

    #[inline]
    #[must_use]
    pub fn new_unit_dir(origin: impl Into<Vector<D>>, dir: UnitVector<D>) -> Self {
        Self {
            origin: origin.into(),
            dir,
        }
    }

    /// Get the point at distance `t` (can be negative) from the ray's origin
    #[inline]
    #[must_use]
    pub fn at(&self, t: Float) -> Vector<D> {
        self.origin + self.dir.as_ref() * t
    }

    /// Move the ray's position forward (or backward if `t < 0.0`) by `t`
    #[inline]
    pub fn advance(&mut self, t: Float) {
        self.origin += self.dir.as_ref() * t;
    }

    /// Reflect the ray's direction off a surface with unit normal `n`
    #[inline]
    pub fn reflect_off(&mut self, n: &UnitVector<D>) {
        self.dir = reflect(&self.dir, n);
    }
}

impl Ray<2> {
    /// A ray entering horizontally from the left, heading right, at height `y`.
    #[inline]
    #[must_use]
    pub fn entering_left(bounds: &Bounds, y: Float) -> Self {
        Self::new([bounds.min.x, y], [1.0, 0.0])
    }
}

/// A hit reported by a mirror: the travel distance along the ray and the
/// mirror's unit normal at the intersection point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MirrorHit<const D: usize> {
    pub dist: Float,
    pub normal: UnitVector<D>,
    /// Index of the reporting mirror in the traced slice.
    pub index: usize,
}

/// Closest-hit accumulator handed to [`Mirror::add_tangents`].
///
/// Keeps the nearest tangent whose travel distance is at least `min_dist`,
/// replacing the stored one only on a strictly smaller distance. Since the
/// tracer visits mirrors in slice order, equidistant hits resolve to the
/// lowest mirror index.
pub struct SimulationCtx<'a, const D: usize> {
    ray: &'a Ray<D>,
    min_dist: Float,
    source: usize,
    closest: Option<MirrorHit<D>>,
}

impl<'a, const D: usize> SimulationCtx<'a, D> {
    #[inline]
    #[must_use]
    pub fn new(ray: &'a Ray<D>, min_dist: Float) -> Self {
        Self {
            ray,
            min_dist: min_dist.abs(),
            source: 0,
            closest: None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn ray(&self) -> &Ray<D> {
        self.ray
    }

    /// Stamp the index attached to tangents reported next.
    #[inline]
    pub fn visit_mirror(&mut self, index: usize) {
        self.source = index;
    }

    /// Store `dist` and the tangent normal along with it, if `dist` is at
    /// least the minimum travel distance and strictly smaller than the
    /// stored hit.
    pub fn add_tangent(&mut self, dist: Float, normal: UnitVector<D>) {
        if dist >= self.min_dist && self.closest.as_ref().map_or(true, |hit| hit.dist > dist) {
            self.closest = Some(MirrorHit {
                dist,
                normal,
                index: self.source,
            });
        }
    }

    #[inline]
    #[must_use]
    pub fn into_closest(self) -> Option<MirrorHit<D>> {
        self.closest
    }
}

/// A reflective surface in `D`-dimensional euclidean space.
///
/// Implementors report the tangent planes at their intersections with the
/// ray held by `ctx`, through [`ctx.add_tangent(...)`](SimulationCtx::add_tangent).
/// The ray itself is available through [`ctx.ray()`](SimulationCtx::ray).
///
/// Nothing is added when the ray misses the surface. Tangents "behind" the
/// ray's origin may be reported; the accumulator discards them. This method
/// must be deterministic with respect to the ray: for a given `ray` it
/// reports the same tangents every time, regardless of external state.
pub trait Mirror<const D: usize> {
    fn add_tangents(&self, ctx: &mut SimulationCtx<D>);
}

impl<const D: usize, T: Mirror<D> + ?Sized> Mirror<D> for &T {
    #[inline]
    fn add_tangents(&self, ctx: &mut SimulationCtx<D>) {
        (*self).add_tangents(ctx);
    }
}

impl<const D: usize, T: Mirror<D> + ?Sized> Mirror<D> for Box<T> {
    #[inline]
    fn add_tangents(&self, ctx: &mut SimulationCtx<D>) {
        self.as_ref().add_tangents(ctx);
    }
}

/// Find the closest mirror intersection for `ray` among `mirrors`, visiting
/// them in index order.
#[must_use]
pub fn closest_hit<const D: usize, M: Mirror<D>>(
    mirrors: &[M],
    ray: &Ray<D>,
    min_dist: Float,
) -> Option<MirrorHit<D>> {
    let mut ctx = SimulationCtx::new(ray, min_dist);
    for (index, mirror) in mirrors.iter().enumerate() {
        ctx.visit_mirror(index);
        mirror.add_tangents(&mut ctx);
    }
    ctx.into_closest()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(x: Float, y: Float) -> UnitVector<2> {
        Unit::new_normalize(Vector::<2>::new(x, y))
    }

    #[test]
    fn reflection_preserves_norm() {
        let d = unit(0.3, -0.8);
        let n = unit(-1.0, 0.4);
        let r = reflect(&d, &n);
        assert!((r.as_ref().norm() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn reflection_is_self_inverse() {
        let d = unit(1.0, 2.0);
        let n = unit(0.5, -1.5);
        let twice = reflect(&reflect(&d, &n), &n);
        assert!((twice.as_ref() - d.as_ref()).norm() < 1e-12);
    }

    #[test]
    fn head_on_reflection_reverses() {
        let d = unit(1.0, 0.0);
        let n = unit(-1.0, 0.0);
        let r = reflect(&d, &n);
        assert!((r.as_ref() + d.as_ref()).norm() < 1e-12);
    }

    #[test]
    fn zero_direction_is_rejected() {
        assert!(Ray::<2>::try_new([0.0, 0.0], [0.0, 0.0]).is_none());
    }

    #[test]
    fn accumulator_keeps_lowest_index_on_ties() {
        let ray = Ray::<2>::new([0.0, 0.0], [1.0, 0.0]);
        let mut ctx = SimulationCtx::new(&ray, 0.01);
        let n = unit(0.0, 1.0);
        ctx.visit_mirror(0);
        ctx.add_tangent(5.0, n);
        ctx.visit_mirror(1);
        ctx.add_tangent(5.0, n);
        ctx.visit_mirror(2);
        ctx.add_tangent(4.0, n);
        ctx.visit_mirror(3);
        ctx.add_tangent(4.0, n);
        assert_eq!(ctx.into_closest().unwrap().index, 2);
    }

    #[test]
    fn accumulator_discards_short_travel() {
        let ray = Ray::<2>::new([0.0, 0.0], [1.0, 0.0]);
        let mut ctx = SimulationCtx::new(&ray, 0.01);
        ctx.add_tangent(0.001, unit(0.0, 1.0));
        ctx.add_tangent(-3.0, unit(0.0, 1.0));
        assert!(ctx.into_closest().is_none());
    }
}
