use nalgebra::Unit;

use crate::{Float, UnitVector, Vector};

/// An orientation in degrees, normalized to `[0, 360)` at construction.
///
/// Mirror orientations and ray headings are stored this way so that
/// equality and parallelism checks don't trip over 0/360 wraparound.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "Float", into = "Float"))]
pub struct Angle(Float);

impl Angle {
    #[inline]
    #[must_use]
    pub fn from_degrees(deg: Float) -> Self {
        Self(deg.rem_euclid(360.0))
    }

    #[inline]
    #[must_use]
    pub fn from_radians(rad: Float) -> Self {
        Self::from_degrees(rad.to_degrees())
    }

    /// The heading of `v`, measured counter-clockwise from the positive x axis.
    #[inline]
    #[must_use]
    pub fn of_vector(v: &Vector<2>) -> Self {
        Self::from_degrees(v.y.atan2(v.x).to_degrees())
    }

    /// The orientation of a mirror line whose unit normal is `n`.
    ///
    /// Inverse of [`Self::normal`].
    #[inline]
    #[must_use]
    pub fn of_normal(n: &UnitVector<2>) -> Self {
        Self::from_degrees((-n.x).atan2(n.y).to_degrees())
    }

    #[inline]
    #[must_use]
    pub fn degrees(self) -> Float {
        self.0
    }

    #[inline]
    #[must_use]
    pub fn radians(self) -> Float {
        self.0.to_radians()
    }

    /// The unit vector along this heading.
    #[inline]
    #[must_use]
    pub fn direction(self) -> UnitVector<2> {
        let (sin, cos) = self.radians().sin_cos();
        Unit::new_unchecked(Vector::<2>::new(cos, sin))
    }

    /// The unit normal of a mirror line at this orientation: `(-sin, cos)`.
    #[inline]
    #[must_use]
    pub fn normal(self) -> UnitVector<2> {
        let (sin, cos) = self.radians().sin_cos();
        Unit::new_unchecked(Vector::<2>::new(-sin, cos))
    }

    /// Whether the lines at `self` and `other` are parallel within
    /// `tol_deg` degrees, comparing orientations modulo 180 with
    /// wraparound taken into account.
    #[inline]
    #[must_use]
    pub fn line_parallel_to(self, other: Self, tol_deg: Float) -> bool {
        let diff = (self.0 - other.0).rem_euclid(180.0);
        diff < tol_deg || diff > 180.0 - tol_deg
    }
}

impl From<Float> for Angle {
    #[inline]
    fn from(deg: Float) -> Self {
        Self::from_degrees(deg)
    }
}

impl From<Angle> for Float {
    #[inline]
    fn from(angle: Angle) -> Self {
        angle.0
    }
}
