use crate::{closest_hit, Bounds, Edge, Float, Mirror, Ray, Vector};

/// Knobs of the bounce loop.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TraceSettings {
    /// Maximum number of path segments, so cyclic configurations terminate.
    pub max_bounces: usize,
    /// Hits closer than this along the ray are discarded, so a freshly
    /// reflected ray doesn't bump into the mirror it just left.
    pub min_hit_dist: Float,
    /// Forward translation applied after each mirror interaction.
    pub nudge: Float,
    /// Incidence within this many degrees of the mirror line passes
    /// through un-reflected.
    pub parallel_tol_deg: Float,
}

impl Default for TraceSettings {
    fn default() -> Self {
        Self {
            max_bounces: 50,
            min_hit_dist: 1e-2,
            nudge: 0.1,
            parallel_tol_deg: 1.0,
        }
    }
}

/// Why a trace stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Termination {
    /// The ray reached the absorbing border.
    Boundary(Edge),
    /// No candidate hit remained; nothing further is drawn.
    Escaped,
    /// The segment budget ran out (cyclic mirror configuration).
    Capped,
}

/// A completed trace pass: the polyline the renderer draws, and why it ended.
#[derive(Clone, Debug, PartialEq)]
pub struct Trace {
    /// Ray start followed by every hit point, in travel order.
    pub points: Vec<Vector<2>>,
    pub termination: Termination,
}

impl Trace {
    /// Consecutive point pairs, for renderers that draw individual segments.
    pub fn segments(&self) -> impl Iterator<Item = (Vector<2>, Vector<2>)> + '_ {
        self.points.windows(2).map(|w| (w[0], w[1]))
    }
}

/// Iterator over the hit points of a ray bouncing among `mirrors` inside
/// `bounds`.
///
/// Each step finds the closest candidate among all mirrors (ties go to the
/// lowest mirror index) and the border. A mirror hit reflects the ray, or
/// lets it pass when the incidence is near-parallel; either way the origin
/// is nudged forward so the same surface isn't hit again. A border hit
/// yields the final point.
pub struct RayPath<'a, M> {
    mirrors: &'a [M],
    bounds: &'a Bounds,
    ray: Ray<2>,
    settings: TraceSettings,
    steps: usize,
    termination: Option<Termination>,
}

impl<'a, M: Mirror<2>> RayPath<'a, M> {
    #[inline]
    #[must_use]
    pub fn new(mirrors: &'a [M], bounds: &'a Bounds, ray: Ray<2>, settings: TraceSettings) -> Self {
        Self {
            mirrors,
            bounds,
            ray,
            settings,
            steps: 0,
            termination: None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn ray(&self) -> &Ray<2> {
        &self.ray
    }

    /// `Some` once the iterator is exhausted.
    #[inline]
    #[must_use]
    pub const fn termination(&self) -> Option<Termination> {
        self.termination
    }
}

impl<M: Mirror<2>> Iterator for RayPath<'_, M> {
    type Item = Vector<2>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.termination.is_some() {
            return None;
        }
        if self.steps >= self.settings.max_bounces {
            self.termination = Some(Termination::Capped);
            return None;
        }
        self.steps += 1;

        let mirror_hit = closest_hit(self.mirrors, &self.ray, self.settings.min_hit_dist);
        let border_hit = self.bounds.hit(&self.ray);

        // the border absorbs only when it is strictly nearest
        let border_first = match (&mirror_hit, &border_hit) {
            (None, Some(_)) => true,
            (Some(hit), Some((t, _))) => *t < hit.dist,
            _ => false,
        };

        if border_first {
            let (t, edge) = border_hit.expect("border_first implies a border hit");
            self.termination = Some(Termination::Boundary(edge));
            return Some(self.ray.at(t));
        }

        let Some(hit) = mirror_hit else {
            self.termination = Some(Termination::Escaped);
            return None;
        };

        let point = self.ray.at(hit.dist);
        let grazing = self.ray.dir.dot(&hit.normal).abs()
            < self.settings.parallel_tol_deg.to_radians().sin();

        self.ray.origin = point;
        if !grazing {
            self.ray.reflect_off(&hit.normal);
        }
        self.ray.advance(self.settings.nudge);
        Some(point)
    }
}

/// Run a full trace pass and collect the polyline.
#[must_use]
pub fn trace<M: Mirror<2>>(
    mirrors: &[M],
    bounds: &Bounds,
    ray: Ray<2>,
    settings: TraceSettings,
) -> Trace {
    let start = ray.origin;
    let mut path = RayPath::new(mirrors, bounds, ray, settings);
    let mut points = vec![start];
    points.extend(&mut path);
    Trace {
        points,
        termination: path.termination().unwrap_or(Termination::Escaped),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SimulationCtx, UnitVector};
    use nalgebra::Unit;

    /// An infinite vertical mirror line, for driving the loop without
    /// pulling in a shape crate.
    struct VerticalMirror {
        x: Float,
    }

    impl Mirror<2> for VerticalMirror {
        fn add_tangents(&self, ctx: &mut SimulationCtx<2>) {
            let ray = ctx.ray();
            let d = ray.dir.as_ref();
            if d.x.abs() > Float::EPSILON {
                let normal: UnitVector<2> = Unit::new_unchecked(Vector::<2>::new(-1.0, 0.0));
                ctx.add_tangent((self.x - ray.origin.x) / d.x, normal);
            }
        }
    }

    /// An infinite horizontal mirror line.
    struct HorizontalMirror {
        y: Float,
    }

    impl Mirror<2> for HorizontalMirror {
        fn add_tangents(&self, ctx: &mut SimulationCtx<2>) {
            let ray = ctx.ray();
            let d = ray.dir.as_ref();
            if d.y.abs() > Float::EPSILON {
                let normal: UnitVector<2> = Unit::new_unchecked(Vector::<2>::new(0.0, 1.0));
                ctx.add_tangent((self.y - ray.origin.y) / d.y, normal);
            }
        }
    }

    #[test]
    fn single_bounce_back_to_the_left_edge() {
        let bounds = Bounds::from_size(100.0, 100.0);
        let mirrors = [VerticalMirror { x: 80.0 }];
        let ray = Ray::new([0.0, 50.0], [1.0, 0.0]);
        let out = trace(&mirrors, &bounds, ray, TraceSettings::default());

        assert_eq!(out.termination, Termination::Boundary(Edge::Left));
        assert_eq!(out.points.len(), 3);
        assert!((out.points[1] - Vector::<2>::new(80.0, 50.0)).norm() < 1e-9);
        assert!((out.points[2] - Vector::<2>::new(0.0, 50.0)).norm() < 1e-9);
    }

    #[test]
    fn facing_mirrors_hit_the_segment_cap() {
        let bounds = Bounds::from_size(100.0, 100.0);
        let mirrors = [VerticalMirror { x: 20.0 }, VerticalMirror { x: 80.0 }];
        let ray = Ray::new([50.0, 50.0], [1.0, 0.0]);
        let settings = TraceSettings {
            max_bounces: 20,
            ..TraceSettings::default()
        };
        let out = trace(&mirrors, &bounds, ray, settings);

        assert_eq!(out.termination, Termination::Capped);
        // start point plus one point per budgeted segment
        assert_eq!(out.points.len(), 21);
    }

    #[test]
    fn grazing_incidence_passes_through() {
        let bounds = Bounds::from_size(1000.0, 100.0);
        let mirrors = [HorizontalMirror { y: 50.0 }];
        let dir = crate::Angle::from_degrees(0.5).direction();
        let ray = Ray::new_unit_dir([0.0, 49.0], dir);
        let out = trace(&mirrors, &bounds, ray, TraceSettings::default());

        assert_eq!(out.termination, Termination::Boundary(Edge::Right));
        assert_eq!(out.points.len(), 3);
        let before = (out.points[1] - out.points[0]).normalize();
        let after = (out.points[2] - out.points[1]).normalize();
        assert!((before - after).norm() < 1e-9, "direction unchanged");
    }

    #[test]
    fn no_candidates_escapes() {
        let bounds = Bounds::from_size(100.0, 100.0);
        let mirrors: [VerticalMirror; 0] = [];
        let ray = Ray::new([150.0, 50.0], [1.0, 0.0]);
        let out = trace(&mirrors, &bounds, ray, TraceSettings::default());

        assert_eq!(out.termination, Termination::Escaped);
        assert_eq!(out.points.len(), 1);
    }
}
