use specular::{nalgebra::Unit, Float, UnitVector, Vector};

/// The unit normal of the plane that reflects `in_dir` onto `out_dir`:
/// the angle-bisector direction `normalize(-in + out)`.
///
/// When the beam continues straight (`out ≈ in`) the bisector vanishes;
/// the fallback is a normal perpendicular to the beam, i.e. a mirror the
/// beam passes along without deviating.
#[must_use]
pub fn solve_normal(in_dir: &UnitVector<3>, out_dir: &UnitVector<3>) -> UnitVector<3> {
    let sum = -in_dir.as_ref() + out_dir.as_ref();
    if sum.norm() < 1e-6 {
        let mut perp = Vector::<3>::x();
        if in_dir.as_ref().dot(&perp).abs() > 0.99 {
            perp = Vector::<3>::y();
        }
        Unit::new_normalize(perp.cross(in_dir.as_ref()))
    } else {
        Unit::new_normalize(sum)
    }
}

/// A square mirror in 3D space, oriented by its unit normal.
///
/// `hidden` marks lattice positions the no-crossing filter skipped; they
/// are rendered as low-opacity ghosts and never touched by the beam.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Facet {
    pub center: Vector<3>,
    pub normal: UnitVector<3>,
    pub size: Float,
    pub hidden: bool,
}

impl Facet {
    #[inline]
    #[must_use]
    pub fn new(center: impl Into<Vector<3>>, normal: UnitVector<3>, size: Float) -> Self {
        Self {
            center: center.into(),
            normal,
            size,
            hidden: false,
        }
    }

    /// The facet at `center` that steers a beam arriving along `in_dir`
    /// onward along `out_dir`.
    #[inline]
    #[must_use]
    pub fn between(
        center: impl Into<Vector<3>>,
        in_dir: &UnitVector<3>,
        out_dir: &UnitVector<3>,
        size: Float,
    ) -> Self {
        Self::new(center, solve_normal(in_dir, out_dir), size)
    }

    #[inline]
    #[must_use]
    pub fn ghost(center: impl Into<Vector<3>>, normal: UnitVector<3>, size: Float) -> Self {
        Self {
            hidden: true,
            ..Self::new(center, normal, size)
        }
    }
}
