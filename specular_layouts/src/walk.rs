use core::fmt;

use rand::Rng;
use specular::{nalgebra::Unit, Angle, Bounds, Float, UnitVector, Vector};
use specular_shapes::LineSegment;

/// A cell of an N×N mirror grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    #[inline]
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Whether `other` shares an edge with `self` (4-connectivity).
    #[must_use]
    pub fn adjacent_to(&self, other: &Self) -> bool {
        let dr = self.row.abs_diff(other.row);
        let dc = self.col.abs_diff(other.col);
        (dr == 1 && dc == 0) || (dr == 0 && dc == 1)
    }
}

/// Geometry of an N×N cell grid with the center cell excluded, fitted into
/// a canvas: the grid occupies a centered square covering `fill` of the
/// canvas inside `margin`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WalkGrid {
    pub n: usize,
    region: Bounds,
}

impl WalkGrid {
    /// Default canvas margin, in canvas units.
    pub const MARGIN: Float = 30.0;
    /// Fraction of the margined canvas the grid square covers.
    pub const FILL: Float = 0.85;
    /// Mirror length as a fraction of the cell size.
    pub const MIRROR_FRACTION: Float = 0.6;

    #[must_use]
    pub fn in_canvas(n: usize, canvas: &Bounds) -> Self {
        Self::in_canvas_filling(n, canvas, Self::FILL)
    }

    /// Like [`Self::in_canvas`] with an explicit fill fraction.
    #[must_use]
    pub fn in_canvas_filling(n: usize, canvas: &Bounds, fill: Float) -> Self {
        let inner = canvas.inset(Self::MARGIN);
        let side = inner.width().min(inner.height()) * fill;
        let half = Vector::<2>::new(side, side) * 0.5;
        let center = canvas.center();
        Self {
            n,
            region: Bounds::new(center - half, center + half),
        }
    }

    #[inline]
    #[must_use]
    pub fn cell_size(&self) -> Float {
        self.region.width() / self.n as Float
    }

    #[inline]
    #[must_use]
    pub fn mirror_length(&self) -> Float {
        self.cell_size() * Self::MIRROR_FRACTION
    }

    #[must_use]
    pub fn cell_center(&self, cell: Cell) -> Vector<2> {
        let size = self.cell_size();
        self.region.min
            + Vector::<2>::new(
                cell.col as Float * size + size * 0.5,
                cell.row as Float * size + size * 0.5,
            )
    }

    /// The excluded center cell.
    #[inline]
    #[must_use]
    pub fn excluded(&self) -> Cell {
        Cell::new(self.n / 2, self.n / 2)
    }

    /// The fixed seed cell of the walks: leftmost cell of the middle row.
    #[inline]
    #[must_use]
    pub fn start_cell(&self) -> Cell {
        Cell::new(self.n / 2, 0)
    }

    /// All cells except the excluded center, in row-major order.
    #[must_use]
    pub fn active_cells(&self) -> Vec<Cell> {
        let excluded = self.excluded();
        (0..self.n)
            .flat_map(|row| (0..self.n).map(move |col| Cell::new(row, col)))
            .filter(|cell| *cell != excluded)
            .collect()
    }

    #[must_use]
    pub fn contains(&self, cell: Cell) -> bool {
        cell.row < self.n && cell.col < self.n && cell != self.excluded()
    }
}

/// The orientation of the mirror that reflects a beam arriving along
/// `in_dir` onward along `out_dir`: the angle of the bisector-plane,
/// computed in vector form so wraparound across the ±180° boundary can't
/// produce a wrong mirror.
///
/// When the beam continues straight the bisector vanishes and the mirror
/// is laid parallel to the beam, which the reflection leaves unchanged.
#[must_use]
pub fn bisector_angle(in_dir: &UnitVector<2>, out_dir: &UnitVector<2>) -> Angle {
    let sum = -in_dir.as_ref() + out_dir.as_ref();
    if sum.norm() < 1e-6 {
        Angle::of_vector(in_dir.as_ref())
    } else {
        Angle::of_normal(&Unit::new_normalize(sum))
    }
}

/// A committed walk: the visit order and the mirrors that steer the beam
/// from cell to cell, one per visited cell.
#[derive(Clone, Debug, PartialEq)]
pub struct WalkLayout {
    pub order: Vec<Cell>,
    pub mirrors: Vec<LineSegment>,
}

/// The walk's step budget ran out before every active cell was visited.
///
/// The partial layout is still valid (duplicate-free, committed mirrors
/// consistent with its order); callers wanting the original truncating
/// behavior can use it directly.
#[derive(Clone, Debug)]
pub struct Incomplete {
    pub partial: WalkLayout,
    pub active_cells: usize,
}

impl fmt::Display for Incomplete {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "grid walk step budget exhausted after visiting {} of {} cells",
            self.partial.order.len(),
            self.active_cells
        )
    }
}

impl std::error::Error for Incomplete {}

/// Randomized walk over 4-connected unvisited cells, restarting from the
/// seed cell on dead ends, bounded by a step budget.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridWalk {
    pub grid: WalkGrid,
    pub max_steps: usize,
}

impl GridWalk {
    #[inline]
    #[must_use]
    pub fn new(grid: WalkGrid) -> Self {
        Self {
            grid,
            max_steps: 1000,
        }
    }

    /// Build a visit order covering every active cell, then commit mirror
    /// orientations along it.
    ///
    /// Returns [`Incomplete`] when the step budget runs out first.
    pub fn generate(&self, rng: &mut (impl Rng + ?Sized)) -> Result<WalkLayout, Incomplete> {
        let grid = &self.grid;
        let n = grid.n;
        let start = grid.start_cell();
        let target = n * n - 1;

        let mut order = vec![start];
        let mut visited = vec![false; n * n];
        visited[start.row * n + start.col] = true;
        let mut current = start;

        for _ in 0..self.max_steps {
            if order.len() == target {
                break;
            }
            let moves = self.unvisited_neighbors(current, &visited);
            if moves.is_empty() {
                // dead end: restart from the seed cell
                visited.fill(false);
                visited[start.row * n + start.col] = true;
                order.clear();
                order.push(start);
                current = start;
                continue;
            }
            let next = moves[rng.gen_range(0..moves.len())];
            visited[next.row * n + next.col] = true;
            order.push(next);
            current = next;
        }

        let mirrors = commit_mirrors(grid, &order, rng);
        let layout = WalkLayout { order, mirrors };
        if layout.order.len() == target {
            Ok(layout)
        } else {
            Err(Incomplete {
                partial: layout,
                active_cells: target,
            })
        }
    }

    fn unvisited_neighbors(&self, cell: Cell, visited: &[bool]) -> Vec<Cell> {
        let n = self.grid.n;
        let mut moves = Vec::with_capacity(4);
        let mut push = |row: usize, col: usize| {
            let cand = Cell::new(row, col);
            if self.grid.contains(cand) && !visited[row * n + col] {
                moves.push(cand);
            }
        };
        if cell.row > 0 {
            push(cell.row - 1, cell.col);
        }
        if cell.row + 1 < n {
            push(cell.row + 1, cell.col);
        }
        if cell.col > 0 {
            push(cell.row, cell.col - 1);
        }
        if cell.col + 1 < n {
            push(cell.row, cell.col + 1);
        }
        moves
    }
}

/// Assign a mirror to every cell of `order`: the bisector orientation
/// toward the next cell, except the last, which gets a random exit
/// orientation (a multiple of 30°).
pub(crate) fn commit_mirrors(
    grid: &WalkGrid,
    order: &[Cell],
    rng: &mut (impl Rng + ?Sized),
) -> Vec<LineSegment> {
    let length = grid.mirror_length();
    let mut mirrors = Vec::with_capacity(order.len());
    let mut in_dir: UnitVector<2> = Unit::new_unchecked(Vector::<2>::new(1.0, 0.0));

    for (i, &cell) in order.iter().enumerate() {
        let center = grid.cell_center(cell);
        let angle = if let Some(&next) = order.get(i + 1) {
            let out_dir = Unit::new_normalize(grid.cell_center(next) - center);
            let angle = bisector_angle(&in_dir, &out_dir);
            in_dir = specular::reflect(&in_dir, &angle.normal());
            angle
        } else {
            random_exit_angle(rng)
        };
        mirrors.push(LineSegment::new(center, angle, length));
    }
    mirrors
}

pub(crate) fn random_exit_angle(rng: &mut (impl Rng + ?Sized)) -> Angle {
    Angle::from_degrees(rng.gen_range(0..12) as Float * 30.0)
}
