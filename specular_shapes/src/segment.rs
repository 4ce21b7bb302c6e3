use specular::{Angle, Float, Mirror, SimulationCtx, Vector};

/// Determinant threshold below which a ray and a segment count as parallel.
const PARALLEL_EPS: Float = 1e-4;

/// A flat mirror: a finite line segment with a rotatable orientation.
///
/// Identity is positional; a layout rebuild replaces the whole set, while
/// interaction mutates `angle` in place.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineSegment {
    pub center: Vector<2>,
    pub angle: Angle,
    pub half_length: Float,
}

impl LineSegment {
    #[inline]
    #[must_use]
    pub fn new(center: impl Into<Vector<2>>, angle: Angle, length: Float) -> Self {
        Self {
            center: center.into(),
            angle,
            half_length: length * 0.5,
        }
    }

    #[inline]
    #[must_use]
    pub fn length(&self) -> Float {
        self.half_length * 2.0
    }

    #[must_use]
    pub fn endpoints(&self) -> [Vector<2>; 2] {
        let offset = self.angle.direction().as_ref() * self.half_length;
        [self.center - offset, self.center + offset]
    }

    /// Rotate the mirror so its normal faces `target`.
    #[inline]
    pub fn aim_at(&mut self, target: &Vector<2>) {
        let to_target = target - self.center;
        self.angle = Angle::from_degrees(Angle::of_vector(&to_target).degrees() - 90.0);
    }

    /// Whether the open interior of this mirror crosses the open interior
    /// of the segment `(a, b)`.
    #[inline]
    #[must_use]
    pub fn crosses(&self, a: &Vector<2>, b: &Vector<2>) -> bool {
        let [s0, s1] = self.endpoints();
        segments_cross(&s0, &s1, a, b)
    }
}

impl Mirror<2> for LineSegment {
    fn add_tangents(&self, ctx: &mut SimulationCtx<2>) {
        let ray = ctx.ray();
        let rd = ray.dir.as_ref();
        let sd = self.angle.direction();

        let cross = rd.x * sd.y - rd.y * sd.x;
        if cross.abs() < PARALLEL_EPS {
            return;
        }

        let start = self.center - sd.as_ref() * self.half_length;
        let delta = start - ray.origin;

        // ray parameter (distance along the unit direction) and segment parameter
        let t = (delta.x * sd.y - delta.y * sd.x) / cross;
        let u = (delta.x * rd.y - delta.y * rd.x) / cross;

        if t >= 0.0 && (0.0..=self.length()).contains(&u) {
            ctx.add_tangent(t, self.angle.normal());
        }
    }
}

/// Parametric fraction kept clear of each segment end when testing for a
/// crossing, so shared endpoints don't count.
const CROSS_MARGIN: Float = 0.01;

/// Whether segments `(a0, a1)` and `(b0, b1)` cross in their interiors.
#[must_use]
pub fn segments_cross(a0: &Vector<2>, a1: &Vector<2>, b0: &Vector<2>, b1: &Vector<2>) -> bool {
    let denom = (a0.x - a1.x) * (b0.y - b1.y) - (a0.y - a1.y) * (b0.x - b1.x);
    if denom.abs() < PARALLEL_EPS {
        return false;
    }

    let t = ((a0.x - b0.x) * (b0.y - b1.y) - (a0.y - b0.y) * (b0.x - b1.x)) / denom;
    let u = -((a0.x - a1.x) * (a0.y - b0.y) - (a0.y - a1.y) * (a0.x - b0.x)) / denom;

    let interior = CROSS_MARGIN..(1.0 - CROSS_MARGIN);
    interior.contains(&t) && interior.contains(&u)
}

#[cfg(test)]
mod tests {
    use super::*;
    use specular::{closest_hit, Ray};

    fn v(x: Float, y: Float) -> Vector<2> {
        Vector::<2>::new(x, y)
    }

    #[test]
    fn perpendicular_hit_distance_is_along_unit_dir() {
        // vertical mirror of length 50 centered at (40, 0)
        let seg = LineSegment::new([40.0, 0.0], Angle::from_degrees(90.0), 50.0);
        let ray = Ray::new([0.0, 0.0], [1.0, 0.0]);
        let hit = closest_hit(&[seg], &ray, 1e-2).expect("must hit");
        assert!((hit.dist - 40.0).abs() < 1e-9);
    }

    #[test]
    fn misses_beyond_the_finite_extent() {
        let seg = LineSegment::new([40.0, 0.0], Angle::from_degrees(90.0), 50.0);
        // passes 30 above the top endpoint
        let ray = Ray::new([0.0, 55.0], [1.0, 0.0]);
        assert!(closest_hit(&[seg], &ray, 1e-2).is_none());
    }

    #[test]
    fn misses_behind_the_origin() {
        let seg = LineSegment::new([-40.0, 0.0], Angle::from_degrees(90.0), 50.0);
        let ray = Ray::new([0.0, 0.0], [1.0, 0.0]);
        assert!(closest_hit(&[seg], &ray, 1e-2).is_none());
    }

    #[test]
    fn misses_when_parallel() {
        let seg = LineSegment::new([40.0, 10.0], Angle::from_degrees(0.0), 50.0);
        let ray = Ray::new([0.0, 0.0], [1.0, 0.0]);
        assert!(closest_hit(&[seg], &ray, 1e-2).is_none());
    }

    #[test]
    fn endpoints_straddle_the_center() {
        let seg = LineSegment::new([10.0, 10.0], Angle::from_degrees(0.0), 60.0);
        let [a, b] = seg.endpoints();
        assert!((a - v(-20.0, 10.0)).norm() < 1e-9);
        assert!((b - v(40.0, 10.0)).norm() < 1e-9);
    }

    #[test]
    fn aim_at_turns_the_normal_toward_the_target() {
        let mut seg = LineSegment::new([0.0, 0.0], Angle::from_degrees(0.0), 10.0);
        seg.aim_at(&v(0.0, 100.0));
        // target is straight down (y-down canvas): heading 90, mirror at 0
        assert!((seg.angle.degrees() - 0.0).abs() < 1e-9);
        seg.aim_at(&v(-100.0, 0.0));
        assert!((seg.angle.degrees() - 90.0).abs() < 1e-9);
    }

    #[test]
    fn crossing_segments_are_detected() {
        assert!(segments_cross(
            &v(0.0, 0.0),
            &v(10.0, 10.0),
            &v(0.0, 10.0),
            &v(10.0, 0.0)
        ));
        // parallel
        assert!(!segments_cross(
            &v(0.0, 0.0),
            &v(10.0, 0.0),
            &v(0.0, 5.0),
            &v(10.0, 5.0)
        ));
        // disjoint
        assert!(!segments_cross(
            &v(0.0, 0.0),
            &v(10.0, 0.0),
            &v(20.0, -5.0),
            &v(20.0, 5.0)
        ));
    }

    #[test]
    fn shared_endpoints_do_not_count_as_crossing() {
        assert!(!segments_cross(
            &v(0.0, 0.0),
            &v(10.0, 10.0),
            &v(10.0, 10.0),
            &v(20.0, 0.0)
        ));
    }
}
