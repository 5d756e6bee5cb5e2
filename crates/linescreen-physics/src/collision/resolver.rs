//! Collision response: elastic velocity-component exchange.
//!
//! Lines have equal mass, so an elastic contact exchanges the velocity
//! components along the contact normal and preserves the tangential
//! components. The contact normal comes from the touched segment: when
//! an endpoint of one line reaches the other's segment, that segment's
//! normal carries the impulse; a full crossing exchanges the complete
//! velocities.

use super::EventKind;
use crate::geometry::Vector;
use crate::simulation::Line;

/// Unit normal of a line's segment, `None` for degenerate segments.
fn unit_normal(line: &Line) -> Option<Vector> {
    let d = line.direction();
    let len = d.norm();
    if len == 0.0 {
        return None;
    }
    Some(Vector::new(-d.y, d.x) / len)
}

/// Exchanges the velocity components of both lines along `normal`.
fn exchange_along(normal: &Vector, l1: &mut Line, l2: &mut Line) {
    let v1 = l1.velocity();
    let v2 = l2.velocity();
    let v1n = v1.dot(normal);
    let v2n = v2.dot(normal);

    l1.set_velocity(v1 + normal * (v2n - v1n));
    l2.set_velocity(v2 + normal * (v1n - v2n));
}

/// Swaps the full velocities of both lines.
fn swap_velocities(l1: &mut Line, l2: &mut Line) {
    let v1 = l1.velocity();
    l1.set_velocity(l2.velocity());
    l2.set_velocity(v1);
}

/// Resolves one intersection event.
///
/// `l1` must be the line in the event's first role (the smaller id).
/// Degenerate contact segments fall back to the full swap.
pub fn resolve_event(kind: EventKind, l1: &mut Line, l2: &mut Line) {
    match kind {
        EventKind::LineCross => swap_velocities(l1, l2),
        EventKind::L2TouchesL1 => match unit_normal(l1) {
            Some(normal) => exchange_along(&normal, l1, l2),
            None => swap_velocities(l1, l2),
        },
        EventKind::L1TouchesL2 => match unit_normal(l2) {
            Some(normal) => exchange_along(&normal, l1, l2),
            None => swap_velocities(l1, l2),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use approx::assert_relative_eq;

    fn line(id: u32, p1: (f64, f64), p2: (f64, f64), v: (f64, f64)) -> Line {
        Line::new(
            id,
            Point::new(p1.0, p1.1),
            Point::new(p2.0, p2.1),
            Vector::new(v.0, v.1),
        )
    }

    #[test]
    fn test_cross_swaps_velocities() {
        let mut l1 = line(1, (0.2, 0.5), (0.3, 0.5), (0.5, 0.0));
        let mut l2 = line(2, (0.7, 0.5), (0.8, 0.5), (-0.5, 0.0));

        resolve_event(EventKind::LineCross, &mut l1, &mut l2);
        assert_eq!(l1.velocity(), Vector::new(-0.5, 0.0));
        assert_eq!(l2.velocity(), Vector::new(0.5, 0.0));
        assert_relative_eq!(l1.speed(), 0.5);
    }

    #[test]
    fn test_touch_exchanges_normal_component_only() {
        // l1 is horizontal: its unit normal is (0, 1). The x components
        // are tangential and must survive the exchange.
        let mut l1 = line(1, (0.0, 1.0), (1.0, 1.0), (0.3, 0.0));
        let mut l2 = line(2, (0.4, 0.2), (0.6, 0.2), (-0.2, 1.0));

        resolve_event(EventKind::L2TouchesL1, &mut l1, &mut l2);
        assert_relative_eq!(l1.velocity().x, 0.3);
        assert_relative_eq!(l1.velocity().y, 1.0);
        assert_relative_eq!(l2.velocity().x, -0.2);
        assert_relative_eq!(l2.velocity().y, 0.0);
    }

    #[test]
    fn test_exchange_conserves_momentum_and_energy() {
        let mut l1 = line(1, (0.0, 0.0), (0.7, 0.4), (0.31, -0.12));
        let mut l2 = line(2, (0.5, 0.1), (0.9, 0.8), (-0.05, 0.27));

        let momentum_before = l1.velocity() + l2.velocity();
        let energy_before = l1.velocity().norm_squared() + l2.velocity().norm_squared();

        resolve_event(EventKind::L1TouchesL2, &mut l1, &mut l2);

        let momentum_after = l1.velocity() + l2.velocity();
        let energy_after = l1.velocity().norm_squared() + l2.velocity().norm_squared();
        assert_relative_eq!(momentum_before.x, momentum_after.x, epsilon = 1e-12);
        assert_relative_eq!(momentum_before.y, momentum_after.y, epsilon = 1e-12);
        assert_relative_eq!(energy_before, energy_after, epsilon = 1e-12);
    }

    #[test]
    fn test_degenerate_segment_falls_back_to_swap() {
        let mut l1 = line(1, (0.5, 0.5), (0.5, 0.5), (0.1, 0.2));
        let mut l2 = line(2, (0.6, 0.5), (0.7, 0.5), (-0.3, 0.0));

        resolve_event(EventKind::L2TouchesL1, &mut l1, &mut l2);
        assert_eq!(l1.velocity(), Vector::new(-0.3, 0.0));
        assert_eq!(l2.velocity(), Vector::new(0.1, 0.2));
    }
}
