//! Candidate-pair query over the spatial index.
//!
//! Candidates are unordered line pairs that share at least one leaf.
//! De-duplication uses a packed atomic bitset over the upper triangle of
//! array-index pairs: emission is an atomic test-and-set, so exactly one
//! worker owns any pair no matter how many leaves or workers see it. The
//! owning worker runs the pair tester and pushes into its private sink
//! view; views merge at the join. The emitted pair *set* is therefore
//! identical for the sequential and parallel paths and for any worker
//! count.

use super::{intersect, EventSink, IntersectionEvent, SpatialIndex};
use crate::simulation::Line;
use linescreen_core::error::{LineScreenError, Result};
use rayon::prelude::*;
use std::sync::atomic::{AtomicU64, Ordering};

/// Pair de-duplication set with test-and-set claim semantics.
///
/// One bit per ordered index pair `(min, max)`; the claim is a
/// `fetch_or` with acquire-release ordering, so the first worker to set
/// the bit is the unique owner of the pair.
#[derive(Debug)]
pub struct PairSeenSet {
    n: usize,
    bits: Vec<AtomicU64>,
}

impl PairSeenSet {
    /// Creates a set sized for `n` lines.
    ///
    /// # Errors
    /// `AllocationError` when the dense bitmap cannot be reserved.
    pub fn new(n: usize) -> Result<Self> {
        let nbits = n
            .checked_mul(n)
            .ok_or_else(|| LineScreenError::allocation("Seen-set bitmap overflows usize"))?;
        let words = nbits / 64 + 1;
        let mut bits = Vec::new();
        bits.try_reserve_exact(words)
            .map_err(|e| LineScreenError::allocation(format!("Seen-set bitmap: {e}")))?;
        bits.resize_with(words, || AtomicU64::new(0));
        Ok(Self { n, bits })
    }

    fn bit_of(&self, i: usize, j: usize) -> (usize, u64) {
        let (lo, hi) = if i < j { (i, j) } else { (j, i) };
        let bit = lo * self.n + hi;
        (bit / 64, 1u64 << (bit % 64))
    }

    /// Atomically claims the unordered pair `{i, j}`.
    ///
    /// Returns true when the caller is the unique owner; false when
    /// another claim already succeeded.
    pub fn try_claim(&self, i: usize, j: usize) -> bool {
        let (word, mask) = self.bit_of(i, j);
        self.bits[word].fetch_or(mask, Ordering::AcqRel) & mask == 0
    }

    /// Checks whether the pair has been claimed.
    pub fn contains(&self, i: usize, j: usize) -> bool {
        let (word, mask) = self.bit_of(i, j);
        self.bits[word].load(Ordering::Acquire) & mask != 0
    }
}

fn check_timestep(index: &SpatialIndex<'_>, dt: f64) -> Result<()> {
    // Bitwise comparison: the query must reuse the exact build timestep
    // or the expansion policy desynchronizes between phases.
    debug_assert_eq!(
        dt.to_bits(),
        index.dt().to_bits(),
        "query dt must match build dt"
    );
    if dt.to_bits() != index.dt().to_bits() {
        return Err(LineScreenError::TimestepMismatch {
            built: index.dt(),
            queried: dt,
        });
    }
    Ok(())
}

/// Scans one line's overlapping leaves, claiming each neighbour pair
/// exactly once and handing owned pairs to `emit` as array indices.
fn scan_line(
    index: &SpatialIndex<'_>,
    i: usize,
    seen: &PairSeenSet,
    scratch: &mut Vec<u32>,
    mut emit: impl FnMut(usize, usize),
) {
    let aabb = *index.line_aabb(i as u32);
    index.collect_leaves(&aabb, scratch);

    for &leaf in scratch.iter() {
        for &j in index.leaf_lines(leaf) {
            let j = j as usize;
            if j == i || !seen.try_claim(i, j) {
                continue;
            }
            if let Some(stats) = index.stats() {
                stats
                    .pairs_emitted
                    .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
            }
            emit(i, j);
        }
    }
}

fn ordered_by_id<'l>(a: &'l Line, b: &'l Line) -> (&'l Line, &'l Line) {
    if a.id <= b.id {
        (a, b)
    } else {
        (b, a)
    }
}

/// Enumerates the candidate pairs as `(min id, max id)` tuples.
///
/// Exposed for the equivalence and completeness checks; the event query
/// below runs the pair tester in the same scan instead of materializing
/// the list.
pub fn collect_candidates(index: &SpatialIndex<'_>) -> Result<Vec<(u32, u32)>> {
    let n = index.num_lines();
    let seen = PairSeenSet::new(n)?;
    let lines = index.lines();

    let mut candidates = Vec::new();
    let mut scratch = Vec::new();
    for i in 0..n {
        scan_line(index, i, &seen, &mut scratch, |i, j| {
            let (a, b) = ordered_by_id(&lines[i], &lines[j]);
            candidates.push((a.id, b.id));
        });
    }
    Ok(candidates)
}

/// Sequential query: runs the pair tester on every candidate and appends
/// the resulting events to `sink`.
///
/// # Errors
/// `TimestepMismatch` when `dt` differs bitwise from the build timestep;
/// `AllocationError` when the seen set cannot be allocated.
pub fn query_events(index: &SpatialIndex<'_>, dt: f64, sink: &mut EventSink) -> Result<()> {
    check_timestep(index, dt)?;
    let n = index.num_lines();
    let seen = PairSeenSet::new(n)?;
    let lines = index.lines();

    let mut scratch = Vec::new();
    for i in 0..n {
        scan_line(index, i, &seen, &mut scratch, |i, j| {
            let (a, b) = ordered_by_id(&lines[i], &lines[j]);
            if let Some(kind) = intersect(a, b, dt) {
                sink.push(IntersectionEvent::new(a.id, b.id, kind));
            }
        });
    }
    Ok(())
}

/// Parallel query across lines using a rayon fold/reduce.
///
/// Every worker folds into a private sink (scratch buffers are
/// per-iteration); the seen set arbitrates pair ownership; sinks merge
/// by ordered concatenation at the join. The event *set* and the
/// collision count equal the sequential result for any worker count.
pub fn query_events_parallel(index: &SpatialIndex<'_>, dt: f64) -> Result<EventSink> {
    check_timestep(index, dt)?;
    let n = index.num_lines();
    let seen = PairSeenSet::new(n)?;
    let lines = index.lines();

    let sink = (0..n)
        .into_par_iter()
        .fold(EventSink::new, |mut sink, i| {
            let mut scratch = Vec::new();
            scan_line(index, i, &seen, &mut scratch, |i, j| {
                let (a, b) = ordered_by_id(&lines[i], &lines[j]);
                if let Some(kind) = intersect(a, b, dt) {
                    sink.push(IntersectionEvent::new(a.id, b.id, kind));
                }
            });
            sink
        })
        .reduce(EventSink::new, EventSink::concat);
    Ok(sink)
}
