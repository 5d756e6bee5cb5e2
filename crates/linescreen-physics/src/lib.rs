//! LineScreen Physics - Deterministic Collision Detection for Moving Line Segments
//!
//! This crate implements the per-step collision pipeline of the LineScreen
//! simulator. It includes:
//!
//! - **Spatial Index**: Swept-AABB quadtree rebuilt every step with dynamic root bounds
//! - **Candidate Query**: De-duplicated pair generation with an atomic seen set
//! - **Pair Tester**: Exact swept-parallelogram intersection classification
//! - **Event Sink**: Reducer-style accumulation for lock-free parallel queries
//! - **Response**: Elastic velocity-component exchange and unit-square wall bounces
//! - **Parallel Processing**: Worker-count-independent results using Rayon
//!
//! # Examples
//!
//! ## One detection step
//!
//! ```
//! use linescreen_physics::{Line, SpatialIndex, EventSink, query_events};
//! use linescreen_core::IndexConfig;
//! use nalgebra::{Point2, Vector2};
//!
//! let lines = vec![
//!     Line::new(1, Point2::new(0.2, 0.5), Point2::new(0.3, 0.5), Vector2::new(0.5, 0.0)),
//!     Line::new(2, Point2::new(0.7, 0.5), Point2::new(0.8, 0.5), Vector2::new(-0.5, 0.0)),
//! ];
//!
//! let index = SpatialIndex::build(&lines, 0.5, &IndexConfig::default()).unwrap();
//! let mut sink = EventSink::new();
//! query_events(&index, 0.5, &mut sink).unwrap();
//! assert_eq!(sink.collisions(), 1);
//! ```
//!
//! ## Running frames
//!
//! ```
//! use linescreen_physics::{EngineConfig, SimulationEngine, World};
//!
//! let mut engine = SimulationEngine::new(EngineConfig::default(), World::new()).unwrap();
//! engine.run(10).unwrap();
//! assert_eq!(engine.frame(), 10);
//! ```

// Re-export core dependencies for convenience
pub use linescreen_core;
pub use nalgebra;

// Module declarations
pub mod collision;
pub mod engine;
pub mod geometry;
pub mod parallel;
pub mod simulation;
pub mod walls;

// Re-export commonly used types
pub use collision::{
    collect_candidates, detect_events_brute, expanded_aabb, expansion_margin, intersect,
    query_events, query_events_parallel, resolve_event, swept_aabb, Aabb, EventKind, EventSink,
    IndexStats, IntersectionEvent, PairSeenSet, SpatialIndex, StatsSnapshot,
};

pub use engine::{Algorithm, EngineConfig, SimulationEngine, StepSummary};

pub use geometry::{Point, Vector};

pub use simulation::{Line, World};

pub use walls::{resolve_wall_collisions, WORLD_MAX, WORLD_MIN};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Returns version information
pub fn version() -> String {
    format!("{} v{}", NAME, VERSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        let v = version();
        assert!(v.contains("linescreen-physics"));
    }
}
