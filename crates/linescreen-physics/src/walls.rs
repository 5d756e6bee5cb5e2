//! Line-wall collisions at the unit-square boundary.
//!
//! The simulation world is the unit square. A line about to cross a wall
//! during the next timestep has the corresponding velocity component
//! reflected before positions advance; each reflected axis counts as one
//! wall collision. The spatial index deliberately ignores these bounds
//! (its root is recomputed from the line set every step), so lines that
//! drift outside are still simulated and steered back.

use crate::simulation::Line;

/// Lower world bound on both axes.
pub const WORLD_MIN: f64 = 0.0;

/// Upper world bound on both axes.
pub const WORLD_MAX: f64 = 1.0;

/// Reflects lines that would cross a wall within `dt`.
///
/// Returns the number of wall collisions (one per reflected axis).
pub fn resolve_wall_collisions(lines: &mut [Line], dt: f64) -> u64 {
    let mut count = 0;

    for line in lines {
        let v = line.velocity();
        let mut vx = v.x;
        let mut vy = v.y;

        let min_x = line.p1.x.min(line.p2.x) + vx * dt;
        let max_x = line.p1.x.max(line.p2.x) + vx * dt;
        let min_y = line.p1.y.min(line.p2.y) + vy * dt;
        let max_y = line.p1.y.max(line.p2.y) + vy * dt;

        if (min_x < WORLD_MIN && vx < 0.0) || (max_x > WORLD_MAX && vx > 0.0) {
            vx = -vx;
            count += 1;
        }
        if (min_y < WORLD_MIN && vy < 0.0) || (max_y > WORLD_MAX && vy > 0.0) {
            vy = -vy;
            count += 1;
        }

        if vx != v.x || vy != v.y {
            line.set_velocity(crate::geometry::Vector::new(vx, vy));
        }
    }

    count
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
    fn test_left_wall_reflects() {
        let mut lines = vec![line(1, (0.05, 0.5), (0.1, 0.5), (-0.2, 0.0))];
        let count = resolve_wall_collisions(&mut lines, 0.5);
        assert_eq!(count, 1);
        assert_eq!(lines[0].velocity(), Vector::new(0.2, 0.0));
    }

    #[test]
    fn test_interior_line_untouched() {
        let mut lines = vec![line(1, (0.4, 0.4), (0.5, 0.5), (0.05, 0.05))];
        let count = resolve_wall_collisions(&mut lines, 0.5);
        assert_eq!(count, 0);
        assert_eq!(lines[0].velocity(), Vector::new(0.05, 0.05));
    }

    #[test]
    fn test_corner_counts_both_axes() {
        let mut lines = vec![line(1, (0.95, 0.95), (0.99, 0.99), (0.3, 0.3))];
        let count = resolve_wall_collisions(&mut lines, 0.5);
        assert_eq!(count, 2);
        assert_eq!(lines[0].velocity(), Vector::new(-0.3, -0.3));
    }

    #[test]
    fn test_receding_line_not_reflected() {
        // Already outside but moving back in: leave it alone.
        let mut lines = vec![line(1, (-0.1, 0.5), (-0.05, 0.5), (0.2, 0.0))];
        let count = resolve_wall_collisions(&mut lines, 0.5);
        assert_eq!(count, 0);
        assert_eq!(lines[0].velocity(), Vector::new(0.2, 0.0));
    }
}
