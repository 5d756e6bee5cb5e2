//! Frame engine: detect, resolve, advance.
//!
//! One step runs the detection pipeline (quadtree or brute force), sorts
//! the events into their canonical `(min id, max id)` order, applies the
//! elastic response, reflects wall crossings, and advances positions.
//! The post-sort is what makes the physics worker-count independent: the
//! parallel query emits a deterministic event *set* but an unspecified
//! order, and resolution mutates velocities in sequence.

use crate::collision::{
    detect_events_brute, query_events, query_events_parallel, resolve_event, EventSink,
    SpatialIndex, StatsSnapshot,
};
use crate::parallel::{build_pool, run_in_pool};
use crate::simulation::World;
use crate::walls::resolve_wall_collisions;
use linescreen_core::config::IndexConfig;
use linescreen_core::error::{LineScreenError, Result};
use linescreen_core::traits::Validatable;
use parking_lot::RwLock;
use rayon::ThreadPool;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// Detection algorithm selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Algorithm {
    /// O(n²) all-pairs reference
    BruteForce,
    /// Quadtree broad phase
    #[default]
    Quadtree,
}

/// Configuration for the simulation engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Simulation timestep (s)
    pub dt: f64,
    /// Detection algorithm
    pub algorithm: Algorithm,
    /// Spatial index configuration
    pub index: IndexConfig,
    /// Worker count for the parallel query; 0 uses the global pool,
    /// 1 forces the sequential path
    pub num_threads: usize,
    /// Sort events by `(min id, max id)` before resolution
    pub sort_events: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            dt: 0.5, // the classic screensaver step
            algorithm: Algorithm::Quadtree,
            index: IndexConfig::default(),
            num_threads: 0,
            sort_events: true,
        }
    }
}

impl Validatable for EngineConfig {
    fn validate(&self) -> Result<()> {
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(LineScreenError::validation_field(
                "Timestep must be positive and finite",
                "dt",
            ));
        }
        self.index.validate()
    }
}

/// Result of a single simulation step.
#[derive(Debug, Clone, Serialize)]
pub struct StepSummary {
    /// Frame number just completed (1-based)
    pub frame: u64,
    /// Line-line events resolved this step
    pub events: usize,
    /// Wall collisions this step
    pub wall_collisions: u64,
    /// Index statistics, when debug stats are enabled
    pub index_stats: Option<StatsSnapshot>,
}

/// Main simulation engine.
pub struct SimulationEngine {
    /// Engine configuration
    config: EngineConfig,
    /// Current simulation state
    state: Arc<RwLock<World>>,
    /// Dedicated worker pool when a thread count is pinned
    pool: Option<ThreadPool>,
    /// Frames completed
    frame: u64,
    /// Cumulative line-line collision count
    line_line_collisions: u64,
    /// Cumulative line-wall collision count
    line_wall_collisions: u64,
}

impl SimulationEngine {
    /// Creates a new engine over a world.
    pub fn new(config: EngineConfig, world: World) -> Result<Self> {
        config.validate()?;
        let pool = build_pool(config.num_threads)?;
        Ok(Self {
            config,
            state: Arc::new(RwLock::new(world)),
            pool,
            frame: 0,
            line_line_collisions: 0,
            line_wall_collisions: 0,
        })
    }

    /// Executes one simulation step.
    pub fn step(&mut self) -> Result<StepSummary> {
        let mut world = self.state.write();
        let dt = self.config.dt;

        let (mut sink, index_stats) = match self.config.algorithm {
            Algorithm::BruteForce => {
                let mut sink = EventSink::new();
                detect_events_brute(world.lines(), dt, &mut sink);
                (sink, None)
            }
            Algorithm::Quadtree => {
                let index = SpatialIndex::build(world.lines(), dt, &self.config.index)?;
                let sink = if self.config.num_threads == 1 {
                    let mut sink = EventSink::new();
                    query_events(&index, dt, &mut sink)?;
                    sink
                } else {
                    run_in_pool(self.pool.as_ref(), || query_events_parallel(&index, dt))?
                };
                let stats = index.stats_snapshot();
                (sink, stats)
            }
        };

        if self.config.sort_events {
            sink.sort_events();
        }
        let events = sink.drain();

        for event in &events {
            let (l1, l2) = world.line_pair_mut(event.id1, event.id2)?;
            resolve_event(event.kind, l1, l2);
        }

        let wall_collisions = resolve_wall_collisions(world.lines_mut(), dt);
        world.advance(dt);

        self.frame += 1;
        self.line_line_collisions += events.len() as u64;
        self.line_wall_collisions += wall_collisions;

        debug!(
            frame = self.frame,
            events = events.len(),
            wall_collisions,
            "completed step"
        );

        Ok(StepSummary {
            frame: self.frame,
            events: events.len(),
            wall_collisions,
            index_stats,
        })
    }

    /// Runs a fixed number of frames.
    pub fn run(&mut self, frames: u64) -> Result<()> {
        for _ in 0..frames {
            self.step()?;
        }
        info!(
            frames,
            line_line = self.line_line_collisions,
            line_wall = self.line_wall_collisions,
            "simulation finished"
        );
        Ok(())
    }

    /// Cumulative line-line collision count.
    pub fn line_line_collisions(&self) -> u64 {
        self.line_line_collisions
    }

    /// Cumulative line-wall collision count.
    pub fn line_wall_collisions(&self) -> u64 {
        self.line_wall_collisions
    }

    /// Frames completed so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Shared handle to the simulation state.
    pub fn state(&self) -> Arc<RwLock<World>> {
        Arc::clone(&self.state)
    }

    /// The engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
