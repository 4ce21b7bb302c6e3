use rand::Rng;
use specular::{Angle, Bounds, Float, Ray, UnitVector, Vector};
use specular_shapes::LineSegment;

use crate::{RandomGrid, WalkGrid, WalkLayout};

/// A single centered mirror with a horizontal entry ray, the smallest
/// interesting scene.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Solo {
    pub angle: Angle,
    pub length: Float,
}

impl Default for Solo {
    fn default() -> Self {
        Self {
            angle: Angle::from_degrees(45.0),
            length: 200.0,
        }
    }
}

/// Everything a plot needs: the canvas, the mirrors, and the rays entering
/// it. Layouts that commit a beam during generation also carry the finished
/// polyline so plotting can skip the closest-hit search.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Scene {
    pub bounds: Bounds,
    pub mirrors: Vec<LineSegment>,
    pub rays: Vec<Ray<2>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beam: Option<Vec<Vector<2>>>,
}

impl Scene {
    /// How far from a pointer position [`Scene::aim_nearest`] looks for a
    /// mirror to re-orient.
    pub const AIM_RADIUS: Float = 50.0;

    #[must_use]
    pub fn new(bounds: Bounds, mirrors: Vec<LineSegment>, rays: Vec<Ray<2>>) -> Self {
        Self {
            bounds,
            mirrors,
            rays,
            beam: None,
        }
    }

    #[must_use]
    pub fn solo(bounds: Bounds, solo: &Solo) -> Self {
        let mirror = LineSegment::new(bounds.center(), solo.angle, solo.length);
        let entry = Ray::entering_left(&bounds, bounds.center().y);
        Self::new(bounds, vec![mirror], vec![entry])
    }

    /// A grid layout (fixed or random) with the standard mid-height entry.
    #[must_use]
    pub fn grid(bounds: Bounds, mirrors: Vec<LineSegment>) -> Self {
        let entry = Ray::entering_left(&bounds, bounds.center().y);
        Self::new(bounds, mirrors, vec![entry])
    }

    /// A visit-order walk layout. The beam is already decided by the walk,
    /// so it is committed here: entry from the left edge at the start
    /// cell's height, one vertex per visited cell, and a final leg from
    /// the last mirror out to the canvas border.
    #[must_use]
    pub fn from_walk(bounds: Bounds, grid: &WalkGrid, layout: &WalkLayout) -> Self {
        let start = grid.cell_center(grid.start_cell());
        let entry = Ray::entering_left(&bounds, start.y);

        let mut beam = Vec::with_capacity(layout.order.len() + 2);
        beam.push(entry.origin);
        beam.extend(layout.order.iter().map(|&cell| grid.cell_center(cell)));

        let mut dir: UnitVector<2> = entry.dir;
        for mirror in &layout.mirrors {
            dir = specular::reflect(&dir, &mirror.angle.normal());
        }
        let last = *beam.last().unwrap_or(&entry.origin);
        let exit_ray = Ray::new_unit_dir(last, dir);
        if let Some((t, _)) = bounds.hit(&exit_ray) {
            beam.push(exit_ray.at(t));
        }

        Self {
            bounds,
            mirrors: layout.mirrors.clone(),
            rays: vec![entry],
            beam: Some(beam),
        }
    }

    /// Re-orient the mirror nearest to `point` (within `max_dist`) so its
    /// face turns toward the point. Returns the mirror's index.
    pub fn aim_nearest(&mut self, point: &Vector<2>, max_dist: Float) -> Option<usize> {
        let (index, dist) = self
            .mirrors
            .iter()
            .enumerate()
            .map(|(i, mirror)| (i, (mirror.center - point).norm()))
            .min_by(|a, b| a.1.total_cmp(&b.1))?;
        if dist > max_dist {
            return None;
        }
        self.mirrors[index].aim_at(point);
        // a hand-aimed beam no longer matches a committed polyline
        self.beam = None;
        Some(index)
    }

    /// Redraw every mirror's angle in place, keeping positions.
    pub fn reroll(&mut self, grid: &RandomGrid, rng: &mut (impl Rng + ?Sized)) {
        grid.reroll(&mut self.mirrors, rng);
        self.beam = None;
    }
}
