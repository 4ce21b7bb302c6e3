pub use rand;

mod grid;
mod lattice;
mod noncross;
mod permutation;
mod scene;
mod walk;

pub use grid::{FixedGrid, RandomGrid, ANGLE_STEPS};
pub use lattice::{Lattice, LatticeScene};
pub use noncross::NonCrossingWalk;
pub use permutation::PermutationWalk;
pub use scene::{Scene, Solo};
pub use walk::{bisector_angle, Cell, GridWalk, Incomplete, WalkGrid, WalkLayout};
