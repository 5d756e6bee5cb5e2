//! Brute-force O(n²) detection reference.
//!
//! Visits every pair in array-index order and runs the same pair tester
//! as the indexed path. The spatial index must produce the same event
//! set and a bitwise-equal collision count on every input; this module
//! is the oracle for that property and the `brute` CLI path.

use super::{intersect, EventSink, IntersectionEvent};
use crate::simulation::Line;

/// Detects all intersection events by testing every pair.
pub fn detect_events_brute(lines: &[Line], dt: f64, sink: &mut EventSink) {
    for i in 0..lines.len() {
        for j in (i + 1)..lines.len() {
            let (a, b) = if lines[i].id <= lines[j].id {
                (&lines[i], &lines[j])
            } else {
                (&lines[j], &lines[i])
            };
            if let Some(kind) = intersect(a, b, dt) {
                sink.push(IntersectionEvent::new(a.id, b.id, kind));
            }
        }
    }
}
