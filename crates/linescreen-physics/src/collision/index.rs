//! Swept-AABB quadtree spatial index.
//!
//! The index is rebuilt every step from the borrowed line slice. Nodes
//! live in a flat arena (`Vec<QuadNode>`) and refer to their children by
//! pool index, which keeps parallel read traversals trivially safe and
//! concentrates allocation in one place. The root cell is a square
//! recomputed each step to enclose every line's expanded AABB; the
//! nominal unit square plays no role in the index bounds.

use super::{expanded_aabb, expansion_margin, Aabb};
use crate::geometry::Point;
use crate::simulation::Line;
use linescreen_core::config::IndexConfig;
use linescreen_core::error::{LineScreenError, Result};
use linescreen_core::traits::Validatable;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, warn};

/// Children are stored SW, SE, NW, NE.
const CHILD_COUNT: usize = 4;

/// One cell of the quadtree.
#[derive(Debug)]
struct QuadNode {
    /// Square bounds of this cell
    bounds: Aabb,
    /// Subdivision depth (root is 0)
    depth: u32,
    /// Indices into the line slice; empty once the node is internal
    lines: Vec<u32>,
    /// Pool indices of the four children, present only for internal nodes
    children: Option<[u32; CHILD_COUNT]>,
}

impl QuadNode {
    fn leaf(bounds: Aabb, depth: u32) -> Self {
        Self {
            bounds,
            depth,
            lines: Vec::new(),
            children: None,
        }
    }
}

/// Debug statistics tallied when `enable_debug_stats` is set.
///
/// Build-side numbers are plain fields; the query-side counters are
/// atomics because queries run on a shared reference, possibly from many
/// workers at once.
#[derive(Debug, Default)]
pub struct IndexStats {
    /// Total nodes in the pool
    pub total_nodes: usize,
    /// Leaf count
    pub leaf_count: usize,
    /// Deepest subdivision reached
    pub deepest_depth: u32,
    /// Largest line list held by any node
    pub max_lines_in_node: usize,
    /// Leaf cells visited across all queries on this index
    pub cells_visited: AtomicU64,
    /// Candidate pairs emitted across all queries on this index
    pub pairs_emitted: AtomicU64,
}

/// Plain-data copy of [`IndexStats`] for reporting.
#[derive(Debug, Clone, Serialize)]
pub struct StatsSnapshot {
    /// Total nodes in the pool
    pub total_nodes: usize,
    /// Leaf count
    pub leaf_count: usize,
    /// Deepest subdivision reached
    pub deepest_depth: u32,
    /// Largest line list held by any node
    pub max_lines_in_node: usize,
    /// Leaf cells visited across all queries on this index
    pub cells_visited: u64,
    /// Candidate pairs emitted across all queries on this index
    pub pairs_emitted: u64,
}

impl IndexStats {
    fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            total_nodes: self.total_nodes,
            leaf_count: self.leaf_count,
            deepest_depth: self.deepest_depth,
            max_lines_in_node: self.max_lines_in_node,
            cells_visited: self.cells_visited.load(Ordering::Relaxed),
            pairs_emitted: self.pairs_emitted.load(Ordering::Relaxed),
        }
    }
}

/// Quadtree spatial index over a borrowed line slice.
///
/// Built once per step; the cached timestep, maximum speed, and per-line
/// expanded AABBs make the query side bit-identical with the build side
/// by construction.
#[derive(Debug)]
pub struct SpatialIndex<'a> {
    lines: &'a [Line],
    nodes: Vec<QuadNode>,
    config: IndexConfig,
    /// Timestep the index was built with
    dt: f64,
    /// Step-wide maximum velocity magnitude
    max_speed: f64,
    /// Expansion margin derived from `max_speed` and the config
    margin: f64,
    /// Cached expanded AABB per line, in line-slice order
    line_aabbs: Vec<Aabb>,
    stats: Option<IndexStats>,
}

impl<'a> SpatialIndex<'a> {
    /// Builds the index for one step.
    ///
    /// # Errors
    /// `ConfigError` for an invalid configuration or timestep,
    /// `InvalidBounds` when the root square collapses, and
    /// `AllocationError` when the AABB cache cannot be reserved.
    pub fn build(lines: &'a [Line], dt: f64, config: &IndexConfig) -> Result<Self> {
        config.validate()?;
        for warning in config.validation_warnings() {
            warn!("index config: {warning}");
        }
        if !dt.is_finite() || dt < 0.0 {
            return Err(LineScreenError::config(format!(
                "Timestep must be finite and non-negative, got {dt}"
            )));
        }

        let max_speed = lines.iter().map(Line::speed).fold(0.0f64, f64::max);
        let margin = expansion_margin(config, max_speed, dt);

        let mut line_aabbs = Vec::new();
        line_aabbs
            .try_reserve_exact(lines.len())
            .map_err(|e| LineScreenError::allocation(format!("AABB cache: {e}")))?;
        for line in lines {
            line_aabbs.push(expanded_aabb(line, dt, margin));
        }

        let root_bounds = Self::root_square(&line_aabbs, config)?;
        let mut index = Self {
            lines,
            nodes: vec![QuadNode::leaf(root_bounds, 0)],
            config: config.clone(),
            dt,
            max_speed,
            margin,
            line_aabbs,
            stats: None,
        };

        for i in 0..index.lines.len() {
            index.insert_line(0, i as u32);
        }

        if config.enable_debug_stats {
            index.stats = Some(index.tally_stats());
        }

        debug!(
            lines = lines.len(),
            nodes = index.nodes.len(),
            max_speed,
            margin,
            "built spatial index"
        );
        Ok(index)
    }

    /// Smallest square (plus precision padding) enclosing every expanded
    /// AABB, centred on the union's centre. Empty inputs fall back to the
    /// nominal unit square.
    fn root_square(line_aabbs: &[Aabb], config: &IndexConfig) -> Result<Aabb> {
        if line_aabbs.is_empty() {
            return Ok(Aabb::new(Point::new(0.0, 0.0), Point::new(1.0, 1.0)));
        }

        let union = line_aabbs
            .iter()
            .fold(Aabb::empty(), |acc, aabb| acc.merge(aabb))
            .padded(config.eps_prec);
        if !union.is_valid() {
            return Err(LineScreenError::invalid_bounds(
                "Union of line AABBs is non-finite",
            ));
        }

        let side = union.width().max(union.height());
        if !(side > 0.0) || !side.is_finite() {
            return Err(LineScreenError::invalid_bounds(format!(
                "Root square collapsed (side = {side})"
            )));
        }

        let center = union.center();
        let half = side / 2.0;
        Ok(Aabb::new(
            Point::new(center.x - half, center.y - half),
            Point::new(center.x + half, center.y + half),
        ))
    }

    fn insert_line(&mut self, node_idx: u32, line_idx: u32) {
        let aabb = self.line_aabbs[line_idx as usize];
        if !self.nodes[node_idx as usize].bounds.intersects(&aabb) {
            return;
        }

        match self.nodes[node_idx as usize].children {
            Some(children) => {
                for child in children {
                    self.insert_line(child, line_idx);
                }
            }
            None => {
                let node = &mut self.nodes[node_idx as usize];
                node.lines.push(line_idx);

                let should_split = node.lines.len() > self.config.max_lines_per_node
                    && node.depth < self.config.max_depth
                    && node.bounds.width() >= 2.0 * self.config.min_cell_size;
                if should_split {
                    self.split(node_idx);
                }
            }
        }
    }

    /// Splits a leaf into four equal squares and redistributes its lines
    /// by the same overlap rule. A line may enter multiple children.
    fn split(&mut self, node_idx: u32) {
        let (bounds, depth) = {
            let node = &self.nodes[node_idx as usize];
            (node.bounds, node.depth)
        };
        let center = bounds.center();
        let child_bounds = [
            // SW
            Aabb::new(bounds.min, center),
            // SE
            Aabb::new(
                Point::new(center.x, bounds.min.y),
                Point::new(bounds.max.x, center.y),
            ),
            // NW
            Aabb::new(
                Point::new(bounds.min.x, center.y),
                Point::new(center.x, bounds.max.y),
            ),
            // NE
            Aabb::new(center, bounds.max),
        ];

        let first = self.nodes.len() as u32;
        for cb in child_bounds {
            self.nodes.push(QuadNode::leaf(cb, depth + 1));
        }

        let node = &mut self.nodes[node_idx as usize];
        let pending = std::mem::take(&mut node.lines);
        node.children = Some([first, first + 1, first + 2, first + 3]);

        for line_idx in pending {
            for child in first..first + CHILD_COUNT as u32 {
                self.insert_line(child, line_idx);
            }
        }
    }

    /// Collects every leaf whose square overlaps `aabb` into `out`.
    ///
    /// `out` is the caller's scratch buffer; it is cleared first. Each
    /// worker must use its own buffer.
    pub fn collect_leaves(&self, aabb: &Aabb, out: &mut Vec<u32>) {
        out.clear();
        self.descend(0, aabb, out);
        if let Some(stats) = &self.stats {
            stats
                .cells_visited
                .fetch_add(out.len() as u64, Ordering::Relaxed);
        }
    }

    fn descend(&self, node_idx: u32, aabb: &Aabb, out: &mut Vec<u32>) {
        let node = &self.nodes[node_idx as usize];
        if !node.bounds.intersects(aabb) {
            return;
        }
        match node.children {
            Some(children) => {
                for child in children {
                    self.descend(child, aabb, out);
                }
            }
            None => out.push(node_idx),
        }
    }

    /// Line indices held by a leaf.
    pub(crate) fn leaf_lines(&self, node_idx: u32) -> &[u32] {
        &self.nodes[node_idx as usize].lines
    }

    /// The borrowed line slice.
    pub fn lines(&self) -> &'a [Line] {
        self.lines
    }

    /// Number of indexed lines.
    pub fn num_lines(&self) -> usize {
        self.lines.len()
    }

    /// Timestep cached at build.
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Step-wide maximum speed cached at build.
    pub fn max_speed(&self) -> f64 {
        self.max_speed
    }

    /// Expansion margin applied to every AABB of this step.
    pub fn margin(&self) -> f64 {
        self.margin
    }

    /// Cached expanded AABB for a line index.
    pub fn line_aabb(&self, line_idx: u32) -> &Aabb {
        &self.line_aabbs[line_idx as usize]
    }

    /// Root cell bounds.
    pub fn bounds(&self) -> &Aabb {
        &self.nodes[0].bounds
    }

    /// Configuration the index was built with.
    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Live statistics handle, when enabled.
    pub fn stats(&self) -> Option<&IndexStats> {
        self.stats.as_ref()
    }

    /// Plain-data statistics copy, when enabled.
    pub fn stats_snapshot(&self) -> Option<StatsSnapshot> {
        self.stats.as_ref().map(IndexStats::snapshot)
    }

    fn tally_stats(&self) -> IndexStats {
        let mut stats = IndexStats {
            total_nodes: self.nodes.len(),
            ..IndexStats::default()
        };
        for node in &self.nodes {
            if node.children.is_none() {
                stats.leaf_count += 1;
            }
            stats.deepest_depth = stats.deepest_depth.max(node.depth);
            stats.max_lines_in_node = stats.max_lines_in_node.max(node.lines.len());
        }
        stats
    }

    #[cfg(test)]
    fn leaves(&self) -> impl Iterator<Item = &QuadNode> {
        self.nodes.iter().filter(|n| n.children.is_none())
    }
}
