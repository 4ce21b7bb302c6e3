mod facet;
mod segment;

pub use facet::{solve_normal, Facet};
pub use segment::{segments_cross, LineSegment};
