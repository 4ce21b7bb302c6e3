use rand::{seq::SliceRandom, Rng};
use specular::{Bounds, Float};

use crate::walk::{commit_mirrors, Cell, WalkGrid, WalkLayout};

/// A 3×3 grid visited in a fully random order: no adjacency requirement
/// and no crossing checks, so the beam sprawls freely across the canvas.
///
/// The middle-left and middle-center cells stay empty; the beam enters
/// horizontally and meets its first mirror at the middle-right cell, so
/// the entry leg passes straight over the empty ones.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PermutationWalk {
    pub grid: WalkGrid,
}

impl PermutationWalk {
    /// Fraction of the margined canvas this grid covers, smaller than the
    /// walk layouts' so the longer jumps stay on the sheet.
    pub const FILL: Float = 0.7;

    const EMPTY: [Cell; 2] = [Cell::new(1, 0), Cell::new(1, 1)];
    const START: Cell = Cell::new(1, 2);

    #[must_use]
    pub fn in_canvas(canvas: &Bounds) -> Self {
        Self {
            grid: WalkGrid::in_canvas_filling(3, canvas, Self::FILL),
        }
    }

    /// Every populated cell, the fixed start first.
    #[must_use]
    pub fn active_cells() -> Vec<Cell> {
        let mut cells = vec![Self::START];
        cells.extend(
            (0..3)
                .flat_map(|row| (0..3).map(move |col| Cell::new(row, col)))
                .filter(|cell| *cell != Self::START && !Self::EMPTY.contains(cell)),
        );
        cells
    }

    pub fn generate(&self, rng: &mut (impl Rng + ?Sized)) -> WalkLayout {
        let mut order = Self::active_cells();
        order[1..].shuffle(rng);
        let mirrors = commit_mirrors(&self.grid, &order, rng);
        WalkLayout { order, mirrors }
    }
}
