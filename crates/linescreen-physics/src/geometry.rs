//! 2D geometric predicates shared by the collision pipeline.
//!
//! All predicates are inclusive: touching at an endpoint or lying on a
//! boundary counts as intersection/containment. Collinear overlap is
//! handled explicitly. Every function is pure and deterministic.

use nalgebra::{Point2, Vector2};

/// 2D point with f64 coordinates.
pub type Point = Point2<f64>;

/// 2D vector with f64 components.
pub type Vector = Vector2<f64>;

/// 2D cross (perp) product of two vectors.
pub fn perp(a: &Vector, b: &Vector) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Signed orientation of the turn `a -> b -> c`.
///
/// Positive for counter-clockwise, negative for clockwise, zero for
/// collinear points.
pub fn orientation(a: &Point, b: &Point, c: &Point) -> f64 {
    perp(&(b - a), &(c - a))
}

/// Checks whether `q` lies within the coordinate bounds of the segment
/// `[a, b]`. Only meaningful when `q` is already known collinear with it.
fn within_segment_bounds(a: &Point, b: &Point, q: &Point) -> bool {
    q.x >= a.x.min(b.x) && q.x <= a.x.max(b.x) && q.y >= a.y.min(b.y) && q.y <= a.y.max(b.y)
}

/// Checks whether `q` lies on the closed segment `[a, b]`.
pub fn point_on_segment(a: &Point, b: &Point, q: &Point) -> bool {
    orientation(a, b, q) == 0.0 && within_segment_bounds(a, b, q)
}

/// Inclusive segment-segment intersection test.
///
/// Returns true when the closed segments `[p1, p2]` and `[q1, q2]` share
/// at least one point, including endpoint touches and collinear overlap.
pub fn segments_intersect(p1: &Point, p2: &Point, q1: &Point, q2: &Point) -> bool {
    let d1 = orientation(q1, q2, p1);
    let d2 = orientation(q1, q2, p2);
    let d3 = orientation(p1, p2, q1);
    let d4 = orientation(p1, p2, q2);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }

    (d1 == 0.0 && within_segment_bounds(q1, q2, p1))
        || (d2 == 0.0 && within_segment_bounds(q1, q2, p2))
        || (d3 == 0.0 && within_segment_bounds(p1, p2, q1))
        || (d4 == 0.0 && within_segment_bounds(p1, p2, q2))
}

/// Checks whether `p` lies inside (or on the boundary of) the
/// parallelogram spanned by the segment `[a, b]` swept along `u`.
///
/// The vertices are `a`, `b`, `a + u`, `b + u`. A degenerate
/// parallelogram (zero-area sweep) reduces to the union of its edges.
pub fn point_in_parallelogram(p: &Point, a: &Point, b: &Point, u: &Vector) -> bool {
    let e = b - a;
    let det = perp(&e, u);

    if det == 0.0 {
        // Degenerate sweep: the region is the union of the four edges.
        let a2 = a + u;
        let b2 = b + u;
        return point_on_segment(a, b, p)
            || point_on_segment(&a2, &b2, p)
            || point_on_segment(a, &a2, p)
            || point_on_segment(b, &b2, p);
    }

    // Solve p - a = s*e + t*u for barycentric-style coordinates.
    let rel = p - a;
    let s = perp(&rel, u) / det;
    let t = perp(&e, &rel) / det;

    (0.0..=1.0).contains(&s) && (0.0..=1.0).contains(&t)
}
