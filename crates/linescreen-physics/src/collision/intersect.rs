//! Exact pairwise intersection test using swept parallelograms.
//!
//! The tester is a pure function: the same pair and timestep always
//! produce the same answer, which is what makes the parallel query
//! deterministic. All work happens in the frame of the first line, where
//! the second line sweeps the parallelogram
//! `P = { p + t*(v2 - v1) : p in segment(l2), t in [0, dt] }`.

use super::EventKind;
use crate::geometry::{point_in_parallelogram, segments_intersect};
use crate::simulation::Line;

/// Tests two lines for intersection during one timestep.
///
/// Returns `None` when `segment(l1)` and the swept parallelogram of `l2`
/// are disjoint; otherwise the kind of contact, expressed with `l1` in
/// the first role. Boundary contact is inclusive throughout.
pub fn intersect(l1: &Line, l2: &Line, dt: f64) -> Option<EventKind> {
    let u = (l2.velocity() - l1.velocity()) * dt;
    let q1 = l2.p1 + u;
    let q2 = l2.p2 + u;

    // Already touching at the start of the step.
    if segments_intersect(&l1.p1, &l1.p2, &l2.p1, &l2.p2) {
        return Some(EventKind::LineCross);
    }

    let side1 = segments_intersect(&l1.p1, &l1.p2, &l2.p1, &q1);
    let side2 = segments_intersect(&l1.p1, &l1.p2, &l2.p2, &q2);

    // Both endpoint sweep paths cross l1: l2 passes fully across it.
    if side1 && side2 {
        return Some(EventKind::LineCross);
    }

    let in1 = point_in_parallelogram(&l1.p1, &l2.p1, &l2.p2, &u);
    let in2 = point_in_parallelogram(&l1.p2, &l2.p1, &l2.p2, &u);

    if in1 && in2 {
        return Some(EventKind::L1TouchesL2);
    }
    if side1 || side2 {
        return Some(EventKind::L2TouchesL1);
    }
    if in1 || in2 {
        return Some(EventKind::L1TouchesL2);
    }

    // l1 crosses only the far edge of the parallelogram: it cuts through
    // l2's end-of-step position without holding an endpoint inside P.
    if segments_intersect(&l1.p1, &l1.p2, &q1, &q2) {
        return Some(EventKind::LineCross);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Point, Vector};

    fn line(id: u32, p1: (f64, f64), p2: (f64, f64), v: (f64, f64)) -> Line {
        Line::new(
            id,
            Point::new(p1.0, p1.1),
            Point::new(p2.0, p2.1),
            Vector::new(v.0, v.1),
        )
    }

    #[test]
    fn test_parallel_static_lines_disjoint() {
        let l1 = line(1, (0.1, 0.5), (0.2, 0.5), (0.0, 0.0));
        let l2 = line(2, (0.4, 0.5), (0.5, 0.5), (0.0, 0.0));
        assert_eq!(intersect(&l1, &l2, 0.5), None);
    }

    #[test]
    fn test_head_on_crossing() {
        let l1 = line(1, (0.2, 0.5), (0.3, 0.5), (0.5, 0.0));
        let l2 = line(2, (0.7, 0.5), (0.8, 0.5), (-0.5, 0.0));
        assert_eq!(intersect(&l1, &l2, 0.5), Some(EventKind::LineCross));
    }

    #[test]
    fn test_already_intersecting() {
        let l1 = line(1, (0.0, 0.0), (1.0, 1.0), (0.0, 0.0));
        let l2 = line(2, (0.0, 1.0), (1.0, 0.0), (0.0, 0.0));
        assert_eq!(intersect(&l1, &l2, 0.1), Some(EventKind::LineCross));
    }

    #[test]
    fn test_endpoint_sweeps_onto_segment() {
        // Only l2's left endpoint path crosses l1; the right one misses.
        let l1 = line(1, (0.0, 1.0), (1.0, 1.0), (0.0, 0.0));
        let l2 = line(2, (0.5, 0.2), (1.5, 0.2), (0.0, 1.0));
        assert_eq!(intersect(&l1, &l2, 1.0), Some(EventKind::L2TouchesL1));
    }

    #[test]
    fn test_segment_swallowed_by_sweep() {
        // l2 sweeps a tall band that engulfs the short l1 entirely.
        let l1 = line(1, (0.9, 0.5), (1.1, 0.5), (0.0, 0.0));
        let l2 = line(2, (0.0, 0.0), (2.0, 0.0), (0.0, 1.0));
        assert_eq!(intersect(&l1, &l2, 1.0), Some(EventKind::L1TouchesL2));
    }

    #[test]
    fn test_sweep_passes_fully_across() {
        // Both endpoint paths of l2 cross l1's long segment.
        let l1 = line(1, (-1.0, 0.5), (3.0, 0.5), (0.0, 0.0));
        let l2 = line(2, (0.5, 0.0), (1.5, 0.0), (0.0, 1.0));
        assert_eq!(intersect(&l1, &l2, 1.0), Some(EventKind::LineCross));
    }

    #[test]
    fn test_near_miss_stays_disjoint() {
        let l1 = line(1, (0.0, 1.0), (1.0, 1.0), (0.0, 0.0));
        let l2 = line(2, (0.0, 0.0), (1.0, 0.0), (0.0, 0.5));
        // Sweep stops short of y = 1.
        assert_eq!(intersect(&l1, &l2, 1.0), None);
    }

    #[test]
    fn test_touch_at_step_boundary_is_inclusive() {
        let l1 = line(1, (0.0, 1.0), (1.0, 1.0), (0.0, 0.0));
        let l2 = line(2, (0.0, 0.0), (1.0, 0.0), (0.0, 1.0));
        // Sweep ends exactly on l1.
        assert!(intersect(&l1, &l2, 1.0).is_some());
    }

    #[test]
    fn test_determinism() {
        let l1 = line(1, (0.2, 0.5), (0.3, 0.5), (0.5, 0.0));
        let l2 = line(2, (0.7, 0.5), (0.8, 0.5), (-0.5, 0.0));
        let first = intersect(&l1, &l2, 0.5);
        for _ in 0..100 {
            assert_eq!(intersect(&l1, &l2, 0.5), first);
        }
    }

    #[test]
    fn test_zero_timestep_only_current_positions() {
        let l1 = line(1, (0.0, 0.0), (1.0, 0.0), (0.0, 5.0));
        let l2 = line(2, (0.0, 1.0), (1.0, 1.0), (0.0, -5.0));
        // With dt = 0 there is no sweep at all.
        assert_eq!(intersect(&l1, &l2, 0.0), None);
    }
}
