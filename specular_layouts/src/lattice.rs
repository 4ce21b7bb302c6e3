use rand::{seq::SliceRandom, Rng};
use specular::{nalgebra::Unit, Float, UnitVector, Vector};
use specular_shapes::Facet;

/// A cubic lattice of reflective facets threaded by a single beam.
///
/// Cells are visited in a random permutation; a candidate is skipped (and
/// rendered as a ghost facet) whenever the beam segment reaching it would
/// pass too close to a facet already committed.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Lattice {
    /// Cells per axis.
    pub n: usize,
    /// Distance between neighboring cell centers.
    pub spacing: Float,
    /// Edge length of each facet.
    pub facet_size: Float,
    /// Minimum distance the beam must keep from committed facet centers;
    /// `None` disables the skip rule entirely.
    pub clearance: Option<Float>,
}

/// How far beyond the first and last facet the entry and exit legs extend,
/// as a multiple of the lattice spacing.
const ENTRY_REACH: Float = 3.5;

impl Default for Lattice {
    fn default() -> Self {
        Self {
            n: 3,
            spacing: 2.5,
            facet_size: 0.7,
            clearance: Some(0.6),
        }
    }
}

/// A generated lattice: facets (visited ones aimed, skipped ones ghosts)
/// and the beam polyline, entry and exit legs included.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LatticeScene {
    pub facets: Vec<Facet>,
    pub beam: Vec<Vector<3>>,
}

impl Lattice {
    pub fn generate(&self, rng: &mut (impl Rng + ?Sized)) -> LatticeScene {
        let mut cells = self.cell_centers();
        cells.shuffle(rng);

        let mut path: Vec<Vector<3>> = Vec::with_capacity(cells.len());
        let mut ghosts: Vec<Vector<3>> = Vec::new();
        for center in cells {
            if self.blocked(&path, center) {
                ghosts.push(center);
            } else {
                path.push(center);
            }
        }

        // a beam needs two points to have a direction; lattices with fewer
        // cells than that get ghosts only
        if path.len() < 2 {
            let facets = path
                .into_iter()
                .chain(ghosts)
                .map(|center| Facet::ghost(center, ghost_normal(rng), self.facet_size))
                .collect();
            return LatticeScene {
                facets,
                beam: Vec::new(),
            };
        }

        let beam = self.with_entry_and_exit(&path);
        let mut facets = Vec::with_capacity(path.len() + ghosts.len());
        // path[i] sits at beam[i + 1], between an incoming and outgoing leg
        for (i, &center) in path.iter().enumerate() {
            let in_dir = Unit::new_normalize(beam[i + 1] - beam[i]);
            let out_dir = Unit::new_normalize(beam[i + 2] - beam[i + 1]);
            facets.push(Facet::between(center, &in_dir, &out_dir, self.facet_size));
        }
        for center in ghosts {
            facets.push(Facet::ghost(center, ghost_normal(rng), self.facet_size));
        }

        LatticeScene { facets, beam }
    }

    /// Cell centers of the N³ lattice, centered on the origin.
    fn cell_centers(&self) -> Vec<Vector<3>> {
        let offset = (self.n as Float - 1.0) * 0.5;
        let mut cells = Vec::with_capacity(self.n * self.n * self.n);
        for x in 0..self.n {
            for y in 0..self.n {
                for z in 0..self.n {
                    cells.push(
                        Vector::<3>::new(
                            x as Float - offset,
                            y as Float - offset,
                            z as Float - offset,
                        ) * self.spacing,
                    );
                }
            }
        }
        cells
    }

    /// Whether the beam leg from the last committed facet to `candidate`
    /// would graze a committed facet along the way.
    fn blocked(&self, path: &[Vector<3>], candidate: Vector<3>) -> bool {
        let Some(clearance) = self.clearance else {
            return false;
        };
        let Some(&from) = path.last() else {
            return false;
        };
        path[..path.len() - 1]
            .iter()
            .any(|&center| dist_point_segment(center, from, candidate) < clearance)
    }

    fn with_entry_and_exit(&self, path: &[Vector<3>]) -> Vec<Vector<3>> {
        let reach = ENTRY_REACH * self.spacing;
        let entry_dir = Unit::new_normalize(path[1] - path[0]);
        let exit_dir = Unit::new_normalize(path[path.len() - 1] - path[path.len() - 2]);

        let mut beam = Vec::with_capacity(path.len() + 2);
        beam.push(path[0] - entry_dir.as_ref() * reach);
        beam.extend_from_slice(path);
        beam.push(path[path.len() - 1] + exit_dir.as_ref() * reach);
        beam
    }
}

fn ghost_normal(rng: &mut (impl Rng + ?Sized)) -> UnitVector<3> {
    // rejection-sample a uniform direction
    loop {
        let v = Vector::<3>::new(
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
        );
        let norm = v.norm();
        if norm > 1e-3 && norm <= 1.0 {
            return Unit::new_unchecked(v / norm);
        }
    }
}

/// Distance from `point` to the segment `a`..`b`.
fn dist_point_segment(point: Vector<3>, a: Vector<3>, b: Vector<3>) -> Float {
    let ab = b - a;
    let len_sq = ab.norm_squared();
    if len_sq < Float::EPSILON {
        return (point - a).norm();
    }
    let t = ((point - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
    (point - (a + ab * t)).norm()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn every_cell_becomes_a_facet() {
        let scene = Lattice::default().generate(&mut StdRng::seed_from_u64(1));
        assert_eq!(scene.facets.len(), 27);
        let visited = scene.facets.iter().filter(|f| !f.hidden).count();
        assert_eq!(scene.beam.len(), visited + 2);
    }

    #[test]
    fn visited_facets_reflect_the_beam_onward() {
        let scene = Lattice::default().generate(&mut StdRng::seed_from_u64(7));
        for i in 1..scene.beam.len() - 1 {
            let in_dir = Unit::new_normalize(scene.beam[i] - scene.beam[i - 1]);
            let out_dir = Unit::new_normalize(scene.beam[i + 1] - scene.beam[i]);
            let facet = &scene.facets[i - 1];
            assert!(!facet.hidden);
            assert!((facet.center - scene.beam[i]).norm() < 1e-12);
            let reflected = specular::reflect(&in_dir, &facet.normal);
            assert!(
                (reflected.as_ref() - out_dir.as_ref()).norm() < 1e-9,
                "facet {i} does not steer the beam onto its next leg"
            );
        }
    }

    #[test]
    fn beam_keeps_clearance_from_earlier_facets() {
        let lattice = Lattice::default();
        let clearance = lattice.clearance.unwrap();
        for seed in 0..5 {
            let scene = lattice.generate(&mut StdRng::seed_from_u64(seed));
            // interior legs only; entry and exit run outside the lattice
            for i in 2..scene.beam.len() - 2 {
                let (a, b) = (scene.beam[i], scene.beam[i + 1]);
                for earlier in &scene.beam[1..i] {
                    assert!(
                        dist_point_segment(*earlier, a, b) >= clearance - 1e-9,
                        "seed {seed}: leg {i} grazes an earlier facet"
                    );
                }
            }
        }
    }

    #[test]
    fn entry_and_exit_legs_have_the_configured_reach() {
        let lattice = Lattice::default();
        let scene = lattice.generate(&mut StdRng::seed_from_u64(3));
        let reach = 3.5 * lattice.spacing;
        assert!(((scene.beam[1] - scene.beam[0]).norm() - reach).abs() < 1e-9);
        let last = scene.beam.len() - 1;
        assert!(((scene.beam[last] - scene.beam[last - 1]).norm() - reach).abs() < 1e-9);
    }

    #[test]
    fn undersized_lattices_yield_ghosts_and_no_beam() {
        let tiny = Lattice {
            n: 1,
            ..Lattice::default()
        };
        let scene = tiny.generate(&mut StdRng::seed_from_u64(0));
        assert_eq!(scene.facets.len(), 1);
        assert!(scene.facets[0].hidden);
        assert!(scene.beam.is_empty());

        let empty = Lattice {
            n: 0,
            ..Lattice::default()
        };
        let scene = empty.generate(&mut StdRng::seed_from_u64(0));
        assert!(scene.facets.is_empty());
        assert!(scene.beam.is_empty());
    }

    #[test]
    fn disabling_clearance_visits_every_cell() {
        let lattice = Lattice {
            clearance: None,
            ..Lattice::default()
        };
        let scene = lattice.generate(&mut StdRng::seed_from_u64(0));
        assert!(scene.facets.iter().all(|f| !f.hidden));
        assert_eq!(scene.beam.len(), 29);
    }
}
