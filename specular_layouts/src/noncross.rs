use rand::Rng;
use specular::{nalgebra::Unit, Angle, Float, UnitVector, Vector};
use specular_shapes::LineSegment;

use crate::walk::{bisector_angle, random_exit_angle, Cell, WalkGrid, WalkLayout};

/// Orientations sampled when testing whether a future mirror at a candidate
/// cell could cross the beam laid down so far.
const PROBE_ANGLES_DEG: [Float; 12] = [
    0.0, 15.0, 30.0, 45.0, 60.0, 75.0, 90.0, 105.0, 120.0, 135.0, 150.0, 165.0,
];

/// Walk that may jump to any unvisited cell, committing only moves whose
/// beam segment avoids every placed mirror and whose destination can still
/// hold a mirror without cutting the beam.
///
/// Unlike [`crate::GridWalk`] this never restarts: a dead end simply ends
/// the walk, so layouts of any length are valid output.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NonCrossingWalk {
    pub grid: WalkGrid,
}

impl NonCrossingWalk {
    #[inline]
    #[must_use]
    pub fn new(grid: WalkGrid) -> Self {
        Self { grid }
    }

    pub fn generate(&self, rng: &mut (impl Rng + ?Sized)) -> WalkLayout {
        let grid = &self.grid;
        let length = grid.mirror_length();
        let start = grid.start_cell();

        let mut remaining: Vec<Cell> = grid
            .active_cells()
            .into_iter()
            .filter(|cell| *cell != start)
            .collect();

        let mut order = vec![start];
        let mut mirrors: Vec<LineSegment> = Vec::new();
        let mut beam: Vec<(Vector<2>, Vector<2>)> = Vec::new();
        let mut current = start;
        let mut in_dir: UnitVector<2> = Unit::new_unchecked(Vector::<2>::new(1.0, 0.0));

        while !remaining.is_empty() {
            let from = grid.cell_center(current);
            let Some(pick) = self.pick_candidate(rng, &remaining, from, &mirrors, &beam, length)
            else {
                break;
            };
            let next = remaining.swap_remove(pick);
            let to = grid.cell_center(next);

            let out_dir = Unit::new_normalize(to - from);
            let angle = bisector_angle(&in_dir, &out_dir);
            mirrors.push(LineSegment::new(from, angle, length));
            beam.push((from, to));
            in_dir = specular::reflect(&in_dir, &angle.normal());

            order.push(next);
            current = next;
        }

        // the final cell reflects the beam off the sheet at a random heading
        mirrors.push(LineSegment::new(
            grid.cell_center(current),
            random_exit_angle(rng),
            length,
        ));

        WalkLayout { order, mirrors }
    }

    /// Index into `remaining` of a uniformly random acceptable move, if any.
    fn pick_candidate(
        &self,
        rng: &mut (impl Rng + ?Sized),
        remaining: &[Cell],
        from: Vector<2>,
        mirrors: &[LineSegment],
        beam: &[(Vector<2>, Vector<2>)],
        length: Float,
    ) -> Option<usize> {
        let acceptable: Vec<usize> = (0..remaining.len())
            .filter(|&i| {
                let to = self.grid.cell_center(remaining[i]);
                beam_clears_mirrors(from, to, mirrors)
                    && cell_can_hold_mirror(to, length, beam)
            })
            .collect();
        if acceptable.is_empty() {
            None
        } else {
            Some(acceptable[rng.gen_range(0..acceptable.len())])
        }
    }
}

fn beam_clears_mirrors(from: Vector<2>, to: Vector<2>, mirrors: &[LineSegment]) -> bool {
    mirrors.iter().all(|mirror| !mirror.crosses(&from, &to))
}

/// Whatever orientation the cell's mirror ends up with, it must not cut a
/// beam segment already laid down; probed at 15° increments.
fn cell_can_hold_mirror(center: Vector<2>, length: Float, beam: &[(Vector<2>, Vector<2>)]) -> bool {
    PROBE_ANGLES_DEG.iter().all(|&deg| {
        let probe = LineSegment::new(center, Angle::from_degrees(deg), length);
        beam.iter().all(|(b0, b1)| !probe.crosses(b0, b1))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};
    use specular::Bounds;
    use specular_shapes::segments_cross;

    fn walk() -> NonCrossingWalk {
        NonCrossingWalk::new(WalkGrid::in_canvas(7, &Bounds::from_size(840.0, 594.0)))
    }

    #[test]
    fn visits_are_unique_active_cells() {
        for seed in 0..10 {
            let layout = walk().generate(&mut StdRng::seed_from_u64(seed));
            assert_eq!(layout.mirrors.len(), layout.order.len());
            assert!(layout.order.len() >= 2, "walk stalled immediately");

            let mut seen = std::collections::HashSet::new();
            for cell in &layout.order {
                assert!(seen.insert((cell.row, cell.col)), "duplicate {cell:?}");
                assert!(*cell != Cell::new(3, 3), "visited the excluded center");
            }
        }
    }

    #[test]
    fn beam_segments_never_cut_mirrors() {
        let grid = walk().grid;
        for seed in 0..10 {
            let layout = walk().generate(&mut StdRng::seed_from_u64(seed));
            for pair in layout.order.windows(2) {
                let from = grid.cell_center(pair[0]);
                let to = grid.cell_center(pair[1]);
                for mirror in &layout.mirrors {
                    let [m0, m1] = mirror.endpoints();
                    assert!(
                        !segments_cross(&from, &to, &m0, &m1),
                        "seed {seed}: beam {pair:?} cuts a mirror"
                    );
                }
            }
        }
    }

    #[test]
    fn mirrors_never_cross_each_other() {
        for seed in 0..10 {
            let layout = walk().generate(&mut StdRng::seed_from_u64(seed));
            for (i, a) in layout.mirrors.iter().enumerate() {
                for b in &layout.mirrors[i + 1..] {
                    let [a0, a1] = a.endpoints();
                    let [b0, b1] = b.endpoints();
                    assert!(!segments_cross(&a0, &a1, &b0, &b1));
                }
            }
        }
    }

    #[test]
    fn committed_mirrors_steer_the_beam_onto_each_next_cell() {
        let grid = walk().grid;
        let layout = walk().generate(&mut StdRng::seed_from_u64(4));
        let mut dir: UnitVector<2> = Unit::new_unchecked(Vector::<2>::new(1.0, 0.0));
        for (i, pair) in layout.order.windows(2).enumerate() {
            dir = specular::reflect(&dir, &layout.mirrors[i].angle.normal());
            let toward =
                Unit::new_normalize(grid.cell_center(pair[1]) - grid.cell_center(pair[0]));
            assert!(dir.dot(&toward) > 1.0 - 1e-9);
        }
    }
}
