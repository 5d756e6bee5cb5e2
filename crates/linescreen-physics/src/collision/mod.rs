//! Collision detection module.
//!
//! Provides the per-step detection pipeline:
//! - Broad-phase: swept-AABB quadtree spatial index
//! - Candidate generation: de-duplicated pair query
//! - Narrow-phase: exact swept-parallelogram pair tester
//! - Aggregation: event sink with reducer semantics
//! - Response: elastic velocity-component exchange

pub mod brute;
pub mod index;
pub mod intersect;
pub mod query;
pub mod resolver;
pub mod sink;

pub use brute::detect_events_brute;
pub use index::{IndexStats, SpatialIndex, StatsSnapshot};
pub use intersect::intersect;
pub use query::{collect_candidates, query_events, query_events_parallel, PairSeenSet};
pub use resolver::resolve_event;
pub use sink::EventSink;

use crate::geometry::Point;
use crate::simulation::Line;
use linescreen_core::config::IndexConfig;
use serde::{Deserialize, Serialize};

/// Kind of contact reported by the pair tester.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// An endpoint of the first line enters the second line's swept region
    L1TouchesL2,
    /// An endpoint of the second line reaches the first line's segment
    L2TouchesL1,
    /// The two segments cross
    LineCross,
}

impl EventKind {
    /// Returns the kind with the roles of the two lines exchanged.
    pub fn mirrored(self) -> Self {
        match self {
            Self::L1TouchesL2 => Self::L2TouchesL1,
            Self::L2TouchesL1 => Self::L1TouchesL2,
            Self::LineCross => Self::LineCross,
        }
    }
}

/// An intersection event between two lines during one step.
///
/// `id1 < id2` always holds; constructors normalize the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IntersectionEvent {
    /// Id of the line with the smaller id
    pub id1: u32,
    /// Id of the line with the larger id
    pub id2: u32,
    /// Contact kind, expressed with `id1` in the first role
    pub kind: EventKind,
}

impl IntersectionEvent {
    /// Creates an event, normalizing so the smaller id comes first.
    pub fn new(id1: u32, id2: u32, kind: EventKind) -> Self {
        if id1 <= id2 {
            Self { id1, id2, kind }
        } else {
            Self {
                id1: id2,
                id2: id1,
                kind: kind.mirrored(),
            }
        }
    }

    /// Sort key giving the canonical deterministic event order.
    pub fn sort_key(&self) -> (u32, u32) {
        (self.id1, self.id2)
    }
}

/// Axis-aligned bounding box for broad-phase collision detection.
///
/// Overlap is inclusive: boxes sharing a single boundary coordinate
/// intersect.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Aabb {
    /// Minimum corner
    pub min: Point,
    /// Maximum corner
    pub max: Point,
}

impl Aabb {
    /// Creates a new AABB from min and max corners.
    pub fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    /// Creates the smallest AABB containing all given points.
    ///
    /// Returns an inverted (empty) box when the iterator is empty.
    pub fn from_points<I: IntoIterator<Item = Point>>(points: I) -> Self {
        let mut aabb = Self::empty();
        for point in points {
            aabb.expand_to_include(point);
        }
        aabb
    }

    /// Returns the identity element for `merge`: an inverted box that any
    /// real box swallows.
    pub fn empty() -> Self {
        Self {
            min: Point::new(f64::INFINITY, f64::INFINITY),
            max: Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// Checks if this AABB intersects with another (inclusive).
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    /// Returns the center of the AABB.
    pub fn center(&self) -> Point {
        Point::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
        )
    }

    /// Returns the width along x.
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// Returns the height along y.
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Expands the AABB to include a point.
    pub fn expand_to_include(&mut self, point: Point) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
    }

    /// Merges with another AABB.
    pub fn merge(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: Point::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Point::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }

    /// Returns a copy grown by `margin` on every side.
    pub fn padded(&self, margin: f64) -> Aabb {
        Aabb {
            min: Point::new(self.min.x - margin, self.min.y - margin),
            max: Point::new(self.max.x + margin, self.max.y + margin),
        }
    }

    /// True when all corners are finite and `min <= max` on both axes.
    pub fn is_valid(&self) -> bool {
        self.min.x.is_finite()
            && self.min.y.is_finite()
            && self.max.x.is_finite()
            && self.max.y.is_finite()
            && self.min.x <= self.max.x
            && self.min.y <= self.max.y
    }
}

/// Expansion margin applied to every swept AABB for one step.
///
/// `k_rel` absorbs relative motion between two moving lines (each sees the
/// other under up to twice the maximum speed), `k_gap` guarantees that
/// boxes separated by less than a small fraction of a cell still land in a
/// common cell, and `eps_prec` absorbs floating-point jitter. `max_speed`
/// is the step-wide maximum so the build and query sides compute the same
/// margin bit for bit.
pub fn expansion_margin(config: &IndexConfig, max_speed: f64, dt: f64) -> f64 {
    (config.k_rel * max_speed * dt).max(config.k_gap * config.min_cell_size) + config.eps_prec
}

/// AABB of the parallelogram swept by `line` over one timestep.
pub fn swept_aabb(line: &Line, dt: f64) -> Aabb {
    let delta = line.velocity() * dt;
    Aabb::from_points([line.p1, line.p2, line.p1 + delta, line.p2 + delta])
}

/// Swept AABB expanded by the step margin; the box the index operates on.
pub fn expanded_aabb(line: &Line, dt: f64, margin: f64) -> Aabb {
    swept_aabb(line, dt).padded(margin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Vector;

    #[test]
    fn test_aabb_intersection_inclusive() {
        let a = Aabb::new(Point::new(0.0, 0.0), Point::new(1.0, 1.0));
        let b = Aabb::new(Point::new(1.0, 0.0), Point::new(2.0, 1.0));
        let c = Aabb::new(Point::new(1.1, 0.0), Point::new(2.0, 1.0));

        // Shared boundary coordinate counts as overlap.
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_aabb_merge() {
        let a = Aabb::new(Point::new(0.0, 0.0), Point::new(1.0, 1.0));
        let b = Aabb::new(Point::new(2.0, -1.0), Point::new(3.0, 0.5));
        let merged = a.merge(&b);
        assert_eq!(merged.min, Point::new(0.0, -1.0));
        assert_eq!(merged.max, Point::new(3.0, 1.0));
    }

    #[test]
    fn test_swept_aabb_covers_motion() {
        let line = Line::new(
            1,
            Point::new(0.2, 0.5),
            Point::new(0.3, 0.5),
            Vector::new(0.5, -0.2),
        );
        let aabb = swept_aabb(&line, 0.5);
        assert_eq!(aabb.min, Point::new(0.2, 0.4));
        assert_eq!(aabb.max, Point::new(0.55, 0.5));
    }

    #[test]
    fn test_expansion_margin_takes_dominant_term() {
        let config = IndexConfig::default();

        // Fast line: the relative-motion term dominates.
        let fast = expansion_margin(&config, 1.0, 0.5);
        assert!((fast - (0.3 * 0.5 + 1e-6)).abs() < 1e-15);

        // Static world: the cell-gap floor holds.
        let still = expansion_margin(&config, 0.0, 0.5);
        assert!((still - (0.15 * 1e-3 + 1e-6)).abs() < 1e-15);
    }

    #[test]
    fn test_event_normalization() {
        let event = IntersectionEvent::new(9, 4, EventKind::L1TouchesL2);
        assert_eq!(event.id1, 4);
        assert_eq!(event.id2, 9);
        assert_eq!(event.kind, EventKind::L2TouchesL1);

        let cross = IntersectionEvent::new(9, 4, EventKind::LineCross);
        assert_eq!(cross.kind, EventKind::LineCross);
    }
}
