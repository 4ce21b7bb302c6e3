use rand::Rng;
use specular::{Angle, Bounds, Float};
use specular_shapes::LineSegment;

/// The discrete orientation set the randomized grid draws from.
pub const ANGLE_STEPS: [Float; 9] = [0.0, 20.0, 40.0, 60.0, 80.0, 100.0, 120.0, 140.0, 160.0];

fn grid_positions(
    canvas: &Bounds,
    rows: usize,
    cols: usize,
    extent: Float,
) -> impl Iterator<Item = (usize, usize, specular::Vector<2>)> + '_ {
    let spacing_x = extent / (cols + 1) as Float;
    let spacing_y = extent / (rows + 1) as Float;
    let start = canvas.center() - specular::Vector::<2>::new(extent, extent) * 0.5;

    (0..rows).flat_map(move |row| {
        (0..cols).map(move |col| {
            let x = start.x + (col + 1) as Float * spacing_x;
            let y = start.y + (row + 1) as Float * spacing_y;
            (row, col, specular::Vector::<2>::new(x, y))
        })
    })
}

/// An R×C grid of mirrors with a predefined orientation per cell.
///
/// Positions are evenly spaced (`extent / (count + 1)`) inside a square
/// region centered on the canvas.
#[derive(Clone, Debug, PartialEq)]
pub struct FixedGrid {
    pub rows: usize,
    pub cols: usize,
    /// Side of the centered square region the grid occupies.
    pub extent: Float,
    pub mirror_length: Float,
    /// Row-major orientation matrix, in degrees.
    pub angles: Vec<Vec<Float>>,
}

impl Default for FixedGrid {
    fn default() -> Self {
        Self {
            rows: 3,
            cols: 3,
            extent: 500.0,
            mirror_length: 50.0,
            angles: vec![
                vec![120.0, 37.0, 90.0],
                vec![45.0, 70.0, 120.0],
                vec![45.0, -45.0, 0.0],
            ],
        }
    }
}

impl FixedGrid {
    #[must_use]
    pub fn build(&self, canvas: &Bounds) -> Vec<LineSegment> {
        grid_positions(canvas, self.rows, self.cols, self.extent)
            .map(|(row, col, center)| {
                let angle = Angle::from_degrees(self.angles[row][col]);
                LineSegment::new(center, angle, self.mirror_length)
            })
            .collect()
    }
}

/// Like [`FixedGrid`], but every orientation is drawn uniformly from a
/// discrete step set, re-drawable on demand.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomGrid {
    pub rows: usize,
    pub cols: usize,
    pub extent: Float,
    pub mirror_length: Float,
    pub steps: Vec<Float>,
}

impl Default for RandomGrid {
    fn default() -> Self {
        Self {
            rows: 5,
            cols: 5,
            extent: 500.0,
            mirror_length: 50.0,
            steps: ANGLE_STEPS.to_vec(),
        }
    }
}

impl RandomGrid {
    #[must_use]
    pub fn generate(&self, canvas: &Bounds, rng: &mut (impl Rng + ?Sized)) -> Vec<LineSegment> {
        grid_positions(canvas, self.rows, self.cols, self.extent)
            .map(|(_, _, center)| {
                LineSegment::new(center, self.draw_angle(rng), self.mirror_length)
            })
            .collect()
    }

    /// Re-draw every orientation in place, keeping positions.
    pub fn reroll(&self, mirrors: &mut [LineSegment], rng: &mut (impl Rng + ?Sized)) {
        for mirror in mirrors {
            mirror.angle = self.draw_angle(rng);
        }
    }

    fn draw_angle(&self, rng: &mut (impl Rng + ?Sized)) -> Angle {
        Angle::from_degrees(self.steps[rng.gen_range(0..self.steps.len())])
    }
}
